//! Status indicator and loading overlay

use crate::controller::Surface;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

pub struct StatusBar<'a> {
    surface: &'a Surface,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(surface: &'a Surface, theme: &'a Theme) -> Self {
        Self { surface, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let color = self.theme.tone_color(self.surface.tone);
        let status = self.surface.status;

        let inner = ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(Vec2::splat(10.0), egui::Sense::hover());
            ui.painter().circle_filled(rect.center(), 5.0, color);

            let response = ui.label(RichText::new(status).size(13.0).strong().color(color));
            response.widget_info(|| {
                egui::WidgetInfo::labeled(
                    egui::WidgetType::Label,
                    true,
                    format!("Status: {}", status),
                )
            });
        });
        inner.response
    }
}

/// Dimmed overlay with a spinner, shown while a query is in flight.
///
/// Non-interactive, so the controls underneath keep working.
pub fn show_loading_overlay(ctx: &egui::Context, theme: &Theme) {
    let screen = ctx.screen_rect();
    ctx.layer_painter(egui::LayerId::new(
        egui::Order::Middle,
        egui::Id::new("loading_dim"),
    ))
    .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(40));

    egui::Area::new(egui::Id::new("loading_overlay"))
        .order(egui::Order::Foreground)
        .interactable(false)
        .fixed_pos(screen.center() - Vec2::new(70.0, 24.0))
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(theme.bg_secondary)
                .rounding(theme.card_rounding)
                .inner_margin(theme.spacing_sm)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new().size(24.0).color(theme.primary));
                        let response =
                            ui.label(RichText::new("Processing...").color(theme.text_secondary));
                        response.widget_info(|| {
                            egui::WidgetInfo::labeled(egui::WidgetType::Label, true, "Loading")
                        });
                    });
                });
        });
}
