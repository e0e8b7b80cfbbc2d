//! Ephemeral Notices
//!
//! Short-lived messages flashed after a rollback. Time is passed in as
//! milliseconds so the board stays independent of any clock source.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub text: String,
    pub expires_at_ms: u64,
}

#[derive(Debug, Clone)]
pub struct NoticeBoard {
    ttl_ms: u64,
    next_id: u64,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new(ttl_ms: u64) -> Self {
        Self {
            ttl_ms,
            next_id: 1,
            notices: Vec::new(),
        }
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    /// Add a notice expiring `ttl_ms` after `now_ms`; returns its id
    pub fn push(&mut self, level: NoticeLevel, text: impl Into<String>, now_ms: u64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            level,
            text: text.into(),
            expires_at_ms: now_ms.saturating_add(self.ttl_ms),
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    /// Drop every notice whose time is up; returns how many were removed
    pub fn expire(&mut self, now_ms: u64) -> usize {
        let before = self.notices.len();
        self.notices.retain(|n| n.expires_at_ms > now_ms);
        before - self.notices.len()
    }

    pub fn active(&self) -> &[Notice] {
        &self.notices
    }
}
