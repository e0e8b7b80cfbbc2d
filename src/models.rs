//! Frontend Models
//!
//! Data structures matching backend entities.

use ordered_sync::OrderedItem;
use serde::{Deserialize, Serialize};

/// Profile link (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub display_order: i32,
}

impl OrderedItem for Link {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn display_order(&self) -> i32 {
        self.display_order
    }

    fn set_display_order(&mut self, order: i32) {
        self.display_order = order;
    }
}

/// Profile badge (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub earned: bool,
    #[serde(default)]
    pub is_showcased: bool,
    #[serde(default)]
    pub showcase_order: Option<i32>,
}

impl Badge {
    /// Belongs in the public showcase
    pub fn is_displayable(&self) -> bool {
        self.earned && self.is_showcased
    }
}

impl OrderedItem for Badge {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }

    // Badges without a slot sort last
    fn display_order(&self) -> i32 {
        self.showcase_order.unwrap_or(i32::MAX)
    }

    fn set_display_order(&mut self, order: i32) {
        self.showcase_order = Some(order);
    }
}

/// Body of a list endpoint: either a bare array or `{success, data, message?}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    Bare(Vec<T>),
    Envelope {
        success: bool,
        #[serde(default = "Vec::new")]
        data: Vec<T>,
        #[serde(default)]
        message: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_decodes_camel_case() {
        let link: Link = serde_json::from_str(
            r#"{"id":"l1","title":"Blog","url":"https://example.com","displayOrder":3}"#,
        )
        .unwrap();
        assert_eq!(link.display_order(), 3);
        assert_eq!(link.icon, None);
    }

    #[test]
    fn test_badge_showcase_order_drives_display_order() {
        let mut badge: Badge = serde_json::from_str(
            r#"{"id":"b1","name":"Early Adopter","earned":true,"isShowcased":true,"showcaseOrder":null}"#,
        )
        .unwrap();
        assert!(badge.is_displayable());
        assert_eq!(badge.display_order(), i32::MAX);

        badge.set_display_order(1);
        assert_eq!(badge.showcase_order, Some(1));
    }

    #[test]
    fn test_list_body_accepts_both_shapes() {
        let bare: ListBody<Link> = serde_json::from_str("[]").unwrap();
        assert!(matches!(bare, ListBody::Bare(v) if v.is_empty()));

        let wrapped: ListBody<Link> =
            serde_json::from_str(r#"{"success":false,"message":"Not logged in"}"#).unwrap();
        assert!(matches!(
            wrapped,
            ListBody::Envelope { success: false, message: Some(_), .. }
        ));
    }
}
