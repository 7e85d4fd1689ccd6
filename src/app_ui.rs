use eframe::egui;
use std::time::Duration;

use crate::app::{ChatApp, Phase, Sender, SAMPLE_PROMPTS};

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0x2c, 0x3e, 0x50);
const ACCENT: egui::Color32 = egui::Color32::from_rgb(0x34, 0x98, 0xdb);
const PANEL: egui::Color32 = egui::Color32::from_rgb(0xec, 0xf0, 0xf1);
const ERROR_RED: egui::Color32 = egui::Color32::from_rgb(0xe7, 0x44, 0x3c);

pub(crate) fn apply_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = BACKGROUND;
    visuals.window_fill = BACKGROUND;
    visuals.selection.bg_fill = ACCENT;
    visuals.hyperlink_color = ACCENT;
    ctx.set_visuals(visuals);
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply any finished request before rendering this frame.
        self.poll_pending();

        // Keeps the spinner advancing; once idle, no further repaints are
        // scheduled from here.
        if self.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        if matches!(self.phase, Phase::KeyPrompt) {
            self.render_key_prompt(ctx);
        } else {
            self.render_chat(ctx);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.on_window_close();
    }
}

impl ChatApp {
    fn render_key_prompt(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |_ui| {});

        egui::Window::new("🔑 Cortex AI Access")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("Enter your API key to access Cortex AI:");
                ui.add_space(4.0);

                let input = ui.add(
                    egui::TextEdit::singleline(&mut self.key_input)
                        .password(true)
                        .desired_width(260.0),
                );
                if self.focus_input {
                    input.request_focus();
                    self.focus_input = false;
                }
                let submitted =
                    input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() || submitted {
                        self.confirm_key(ctx);
                    }
                    if ui.button("Cancel").clicked() {
                        self.deny_access(ctx);
                    }
                });
            });
    }

    fn render_chat(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(ACCENT)
                    .inner_margin(egui::style::Margin::symmetric(15.0, 12.0)),
            )
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new("CORTEX AI")
                        .heading()
                        .strong()
                        .color(egui::Color32::WHITE),
                );
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available_height = ui.available_height();
            let input_area_height = 90.0;

            ui.vertical(|ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .stick_to_bottom(true)
                    .max_height(available_height - input_area_height)
                    .show(ui, |ui| self.render_transcript(ui));

                ui.add_space(8.0);

                let busy = self.is_busy();
                ui.horizontal(|ui| {
                    let input = ui.add_enabled(
                        !busy,
                        egui::TextEdit::singleline(&mut self.input)
                            .hint_text("Type your message here...")
                            .desired_width(ui.available_width() - 180.0),
                    );
                    if self.focus_input && !busy {
                        input.request_focus();
                        self.focus_input = false;
                    }
                    let submitted =
                        input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                    if ui.add_enabled(!busy, egui::Button::new("SEND")).clicked() || submitted {
                        self.send_message();
                    }

                    if busy {
                        let glyph = self.tick_spinner();
                        ui.colored_label(ACCENT, format!("Cortex Processing {glyph}"));
                    }
                });

                ui.add_space(6.0);
                ui.horizontal_wrapped(|ui| {
                    for sample in SAMPLE_PROMPTS {
                        if ui.add_enabled(!busy, egui::Button::new(sample)).clicked() {
                            self.input = sample.to_string();
                            self.send_message();
                        }
                    }
                });
            });
        });
    }

    fn render_transcript(&self, ui: &mut egui::Ui) {
        for message in &self.transcript {
            match message.sender {
                Sender::User => {
                    ui.label(egui::RichText::new("You:").strong().color(ACCENT));
                    ui.label(&message.text);
                }
                Sender::Assistant => {
                    ui.label(egui::RichText::new("Cortex:").strong().color(PANEL));
                    ui.label(&message.text);
                }
                Sender::Error => {
                    ui.label(egui::RichText::new("Error:").strong().color(ERROR_RED));
                    ui.label(egui::RichText::new(&message.text).color(ERROR_RED));
                }
            }
            ui.add_space(8.0);
        }
    }
}
