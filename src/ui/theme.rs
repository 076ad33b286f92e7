//! Colors and spacing for the chat window

use crate::controller::StatusTone;
use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

#[derive(Clone, Debug)]
pub struct Theme {
    pub primary: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub info: Color32,
    pub danger: Color32,

    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,

    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    pub user_bubble: Color32,
    pub bot_bubble: Color32,

    pub button_rounding: Rounding,
    pub card_rounding: Rounding,
    pub bubble_rounding: Rounding,

    pub spacing: f32,
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    /// Light chat page palette
    pub fn light() -> Self {
        Self {
            primary: Color32::from_rgb(13, 110, 253),
            success: Color32::from_rgb(25, 135, 84),
            warning: Color32::from_rgb(255, 193, 7),
            info: Color32::from_rgb(13, 202, 240),
            danger: Color32::from_rgb(220, 53, 69),

            bg_primary: Color32::from_rgb(248, 249, 250),
            bg_secondary: Color32::WHITE,
            bg_tertiary: Color32::from_rgb(233, 236, 239),

            text_primary: Color32::from_rgb(33, 37, 41),
            text_secondary: Color32::from_rgb(73, 80, 87),
            text_muted: Color32::from_rgb(108, 117, 125),

            user_bubble: Color32::from_rgb(13, 110, 253),
            bot_bubble: Color32::from_rgb(233, 236, 239),

            button_rounding: Rounding::same(8.0),
            card_rounding: Rounding::same(12.0),
            bubble_rounding: Rounding::same(16.0),

            spacing: 16.0,
            spacing_sm: 8.0,
        }
    }

    pub fn tone_color(&self, tone: StatusTone) -> Color32 {
        match tone {
            StatusTone::Success => self.success,
            StatusTone::Warning => self.warning,
            StatusTone::Info => self.info,
            StatusTone::Danger => self.danger,
        }
    }

    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::light();
        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.extreme_bg_color = self.bg_secondary;

        visuals.widgets.inactive.bg_fill = self.bg_tertiary;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_secondary);
        visuals.widgets.hovered.bg_fill = self.primary.gamma_multiply(0.8);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Color32::WHITE);
        visuals.widgets.active.bg_fill = self.primary;

        visuals.selection.bg_fill = self.primary.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.primary);
        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.button_padding = Vec2::new(self.spacing, self.spacing_sm);
        style
            .text_styles
            .insert(egui::TextStyle::Body, FontId::new(14.0, FontFamily::Proportional));
        style
            .text_styles
            .insert(egui::TextStyle::Small, FontId::new(11.0, FontFamily::Proportional));
        ctx.set_style(style);
    }
}
