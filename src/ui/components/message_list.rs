//! Conversation transcript

use crate::messages::{Message, Sender};
use crate::ui::theme::Theme;
use egui::{self, Align, Color32, RichText};

pub struct MessageList<'a> {
    messages: &'a [Message],
    theme: &'a Theme,
    scroll_to_bottom: bool,
}

impl<'a> MessageList<'a> {
    pub fn new(messages: &'a [Message], theme: &'a Theme) -> Self {
        Self {
            messages,
            theme,
            scroll_to_bottom: false,
        }
    }

    pub fn scroll_to_bottom(mut self, scroll: bool) -> Self {
        self.scroll_to_bottom = scroll;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .id_salt("messages")
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing_sm);
                for message in self.messages {
                    self.show_message(ui, message);
                    ui.add_space(self.theme.spacing_sm);
                }
                if self.scroll_to_bottom {
                    ui.scroll_to_cursor(Some(Align::BOTTOM));
                }
            });
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &Message) {
        let is_user = message.is_user();
        let (bubble, text_color) = if is_user {
            (self.theme.user_bubble, Color32::WHITE)
        } else {
            (self.theme.bot_bubble, self.theme.text_primary)
        };
        let align = if is_user { Align::RIGHT } else { Align::LEFT };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            ui.label(
                RichText::new(message.sender().label())
                    .size(12.0)
                    .strong()
                    .color(self.theme.text_muted),
            );

            let max_width = ui.available_width() * 0.75;
            egui::Frame::none()
                .fill(bubble)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    let response =
                        ui.label(RichText::new(message.text()).color(text_color).size(14.0));
                    let label = accessible_label(message);
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label)
                    });
                });

            ui.label(
                RichText::new(message.timestamp())
                    .small()
                    .color(self.theme.text_muted),
            );
        });
    }
}

/// Label exposed to assistive technology for one message
pub fn accessible_label(message: &Message) -> String {
    match message.sender() {
        Sender::User => format!("User message: {}", message.text()),
        Sender::Bot => format!("Bot message: {}", message.text()),
    }
}
