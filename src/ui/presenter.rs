use crate::controller::{Presenter, Surface};
use crate::messages::Message;
use tracing::trace;

/// Presenter backing the egui window.
///
/// Keeps the latest [`Surface`] for rendering; the log itself is read from
/// the controller's shared [`MessageLog`](crate::messages::MessageLog).
#[derive(Default)]
pub struct EguiPresenter {
    surface: Surface,
    ctx: Option<egui::Context>,
    scroll_to_bottom: bool,
}

impl EguiPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(ctx: egui::Context) -> Self {
        Self {
            ctx: Some(ctx),
            ..Self::default()
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// True once after each append or clear
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_bottom)
    }

    fn repaint(&self) {
        if let Some(ctx) = &self.ctx {
            ctx.request_repaint();
        }
    }
}

impl Presenter for EguiPresenter {
    fn present(&mut self, surface: &Surface) {
        trace!("Presenting {}", surface.state);
        self.surface = surface.clone();
        self.repaint();
    }

    fn message_appended(&mut self, _message: &Message) {
        self.scroll_to_bottom = true;
        self.repaint();
    }

    fn log_cleared(&mut self, _seed: &Message) {
        self.scroll_to_bottom = true;
        self.repaint();
    }
}
