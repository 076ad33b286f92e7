//! Input bar component
//!
//! Text entry, send, capture start/stop and clear controls. The bar only
//! reports what the user asked for; the app forwards it to the controller.

use crate::controller::Surface;
use crate::ui::theme::Theme;
use egui::{self, Key, RichText, Vec2};

/// A user request raised by the input bar this frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputAction {
    Submit(String),
    StartCapture,
    StopCapture,
    Clear,
}

pub struct InputBar<'a> {
    text: &'a mut String,
    surface: &'a Surface,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(text: &'a mut String, surface: &'a Surface, theme: &'a Theme) -> Self {
        Self {
            text,
            surface,
            theme,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) -> Option<InputAction> {
        let mut action = None;

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    if let Some(a) = self.show_capture_buttons(ui) {
                        action = Some(a);
                    }

                    let available = (ui.available_width() - 150.0).max(80.0);
                    let text_response = ui.add(
                        egui::TextEdit::singleline(self.text)
                            .hint_text("Type your message...")
                            .desired_width(available)
                            .margin(egui::Margin::symmetric(12.0, 8.0))
                            .id(egui::Id::new("message_input")),
                    );
                    text_response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, true, "Message input")
                    });

                    let enter = text_response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));

                    let can_send = !self.text.trim().is_empty();
                    let send = ui.add_enabled(
                        can_send,
                        egui::Button::new(RichText::new("Send").color(egui::Color32::WHITE))
                            .fill(self.theme.primary)
                            .rounding(self.theme.button_rounding),
                    );
                    send.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Button, can_send, "Send message")
                    });

                    if (send.clicked() || enter) && can_send {
                        action = Some(InputAction::Submit(self.text.clone()));
                        if enter {
                            text_response.request_focus();
                        }
                    }

                    let clear = ui.add(
                        egui::Button::new("Clear").rounding(self.theme.button_rounding),
                    );
                    clear.widget_info(|| {
                        egui::WidgetInfo::labeled(
                            egui::WidgetType::Button,
                            true,
                            "Clear conversation",
                        )
                    });
                    if clear.clicked() {
                        action = Some(InputAction::Clear);
                    }
                });
            });

        action
    }

    fn show_capture_buttons(&self, ui: &mut egui::Ui) -> Option<InputAction> {
        let start_enabled = self.surface.capture_start_enabled;
        let stop_enabled = self.surface.capture_stop_enabled;

        let start = ui.add_enabled(
            start_enabled,
            egui::Button::new(RichText::new("🎤").size(18.0))
                .min_size(Vec2::splat(36.0))
                .rounding(self.theme.button_rounding),
        );
        start.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, start_enabled, "Start listening")
        });

        let stop = ui.add_enabled(
            stop_enabled,
            egui::Button::new(RichText::new("⏹").size(18.0))
                .min_size(Vec2::splat(36.0))
                .rounding(self.theme.button_rounding)
                .fill(if stop_enabled {
                    self.theme.danger.gamma_multiply(0.3)
                } else {
                    self.theme.bg_tertiary
                }),
        );
        stop.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, stop_enabled, "Stop listening")
        });

        if start.clicked() {
            Some(InputAction::StartCapture)
        } else if stop.clicked() {
            Some(InputAction::StopCapture)
        } else {
            None
        }
    }
}
