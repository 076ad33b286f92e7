pub mod input_bar;
pub mod message_list;
pub mod status_bar;

pub use input_bar::{InputAction, InputBar};
pub use message_list::{accessible_label, MessageList};
pub use status_bar::{show_loading_overlay, StatusBar};
