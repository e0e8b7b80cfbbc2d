//! UI Components
//!
//! Leptos components for the profile editor.

mod sortable_list;
mod link_list;
mod badge_showcase;
mod toast_stack;
mod delete_confirm_button;

pub use sortable_list::sortable_list;
pub use link_list::LinkList;
pub use badge_showcase::BadgeShowcase;
pub use toast_stack::ToastStack;
pub use delete_confirm_button::DeleteConfirmButton;
