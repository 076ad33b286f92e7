//! egui/eframe front-end

mod app;
pub mod components;
mod presenter;
mod theme;

pub use app::VoicebotApp;
pub use components::InputAction;
pub use presenter::EguiPresenter;
pub use theme::Theme;
