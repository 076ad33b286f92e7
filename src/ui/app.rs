//! Main application struct and eframe integration

use crate::controller::Controller;
use crate::integration::{VoicebotBuilder, VoicebotConfig};
use crate::lifecycle::{LifecycleHooks, Visibility};
use crate::ui::components::{show_loading_overlay, InputAction, InputBar, MessageList, StatusBar};
use crate::ui::presenter::EguiPresenter;
use crate::ui::theme::Theme;
use crate::Result;
use egui::{self, CentralPanel, RichText, TopBottomPanel};
use tokio::runtime::Handle;
use tracing::info;

pub struct VoicebotApp {
    controller: Controller<EguiPresenter>,
    hooks: LifecycleHooks,
    theme: Theme,
    input: String,
}

impl VoicebotApp {
    /// Build the controller for this window
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: VoicebotConfig,
        runtime: Handle,
    ) -> Result<Self> {
        let theme = Theme::light();
        theme.apply(&cc.egui_ctx);

        let hooks = LifecycleHooks::new();
        let waker_ctx = cc.egui_ctx.clone();
        let controller = VoicebotBuilder::new(config)
            .with_hooks(hooks.clone())
            .with_runtime(runtime)
            .with_waker(move || waker_ctx.request_repaint())
            .build(EguiPresenter::with_context(cc.egui_ctx.clone()))?;

        info!("Voicebot window ready");
        Ok(Self {
            controller,
            hooks,
            theme,
            input: String::new(),
        })
    }

    /// Wrap an already built controller
    pub fn from_controller(controller: Controller<EguiPresenter>, hooks: LifecycleHooks) -> Self {
        Self {
            controller,
            hooks,
            theme: Theme::light(),
            input: String::new(),
        }
    }

    pub fn controller(&self) -> &Controller<EguiPresenter> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller<EguiPresenter> {
        &mut self.controller
    }

    pub fn hooks(&self) -> &LifecycleHooks {
        &self.hooks
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// One frame: drain channel events, publish visibility, render, apply input
    pub fn show(&mut self, ctx: &egui::Context) {
        self.controller.poll_events();
        self.publish_visibility(ctx);

        let surface = self.controller.presenter().surface().clone();
        let messages = self.controller.log().get_all();
        let scroll = self.controller.presenter_mut().take_scroll_request();

        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(self.theme.spacing_sm),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Voice Assistant")
                            .size(18.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        StatusBar::new(&surface, &self.theme).show(ui);
                    });
                });
            });

        let mut action = None;
        TopBottomPanel::bottom("input_area")
            .frame(egui::Frame::none().inner_margin(self.theme.spacing_sm))
            .show(ctx, |ui| {
                action = InputBar::new(&mut self.input, &surface, &self.theme).show(ui);
            });

        CentralPanel::default().show(ctx, |ui| {
            MessageList::new(&messages, &self.theme)
                .scroll_to_bottom(scroll)
                .show(ui);
        });

        if surface.loading {
            show_loading_overlay(ctx, &self.theme);
        }

        if let Some(action) = action {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: InputAction) {
        match action {
            InputAction::Submit(text) => {
                if self.controller.submit_text(&text) {
                    self.input.clear();
                }
            }
            InputAction::StartCapture => self.controller.request_capture(),
            InputAction::StopCapture => self.controller.cancel_capture(),
            InputAction::Clear => self.controller.clear_log(),
        }
    }

    fn publish_visibility(&self, ctx: &egui::Context) {
        if let Some(minimized) = ctx.input(|i| i.viewport().minimized) {
            self.hooks.notify(if minimized {
                Visibility::Hidden
            } else {
                Visibility::Visible
            });
        }
    }
}

impl eframe::App for VoicebotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Voicebot shutting down");
    }
}
