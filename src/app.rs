use std::{sync::Arc, time::Duration};

use eframe::egui::{self, Color32, RichText, Sense};
use serde::{Deserialize, Serialize};

use crate::{
    circuits::ComponentKind,
    config::Settings,
    paint::Screen,
    save::SaveOutcome,
    sink::{PowerState, RecordSink},
    theme::Theme,
    workbench::{NoticeKind, Placement, Workbench},
};

/// What survives a restart, through eframe's storage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub theme: Option<Theme>,
    pub show_log: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            theme: None,
            show_log: true,
        }
    }
}

pub struct CircuitApp {
    workbench: Workbench,
    view: ViewState,
}

impl CircuitApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: &Settings, sink: Arc<dyn RecordSink>) -> Self {
        let view: ViewState = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        let theme = view.theme.unwrap_or(settings.theme);
        let workbench = Workbench::new(settings.circuit_name.clone(), theme, sink, Placement::from_entropy());
        Self { workbench, view }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.workbench.circuit_name());
        ui.label(RichText::new(self.workbench.canvas().theme().name()).small());
        ui.separator();

        ui.label("Add component");
        for kind in ComponentKind::ALL {
            if ui.button(format!("+ {kind}")).clicked() {
                self.workbench.add_component(kind);
            }
        }
        ui.separator();

        let power = self.workbench.canvas().power();
        let label = RichText::new(format!("Power: {}", PowerState::from(power))).color(if power {
            Color32::from_rgb(60, 200, 90)
        } else {
            Color32::from_gray(160)
        });
        if ui.button(label).clicked() {
            self.workbench.toggle_power();
        }
        ui.label(format!("Components: {}", self.workbench.canvas().component_count()));
        ui.separator();

        let saving = self.workbench.is_saving();
        if ui.add_enabled(!saving, egui::Button::new("Save to database")).clicked() {
            self.workbench.save();
        }
        if saving {
            ui.horizontal(|ui| {
                ui.spinner();
                if ui.button("Cancel").clicked() {
                    self.workbench.cancel_save();
                }
            });
        } else if let Some(outcome) = self.workbench.last_outcome() {
            let status = match outcome {
                SaveOutcome::Saved(record) => format!("last save: {}", record.timestamp.format("%H:%M:%S")),
                SaveOutcome::Failed(..) => "last save failed".to_owned(),
                SaveOutcome::Cancelled(_) => "last save cancelled".to_owned(),
            };
            ui.label(RichText::new(status).small());
        }
        ui.label(RichText::new(self.workbench.sink_description()).small().weak());
        ui.separator();

        let current = self.workbench.canvas().theme();
        let mut selected = current;
        egui::ComboBox::from_label("Theme")
            .selected_text(selected.name())
            .show_ui(ui, |ui| {
                for theme in Theme::ALL {
                    ui.selectable_value(&mut selected, theme, theme.name());
                }
            });
        if selected != current {
            self.workbench.change_theme(selected);
            self.view.theme = Some(selected);
        }
        if ui.button("Reset board").clicked() {
            self.workbench.change_theme(current);
        }

        ui.checkbox(&mut self.view.show_log, "Show event log");
    }

    fn event_log(&self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical().stick_to_bottom(true).show(ui, |ui| {
            egui::Grid::new("event_log").striped(true).num_columns(3).show(ui, |ui| {
                ui.strong("Time");
                ui.strong("Event");
                ui.strong("Detail");
                ui.end_row();
                for entry in self.workbench.events().entries() {
                    ui.monospace(entry.timestamp.format("%H:%M:%S").to_string());
                    ui.monospace(entry.tag.as_str());
                    ui.label(entry.detail.as_str());
                    ui.end_row();
                }
            });
        });
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (response, mut painter) = ui.allocate_painter(ui.available_size(), Sense::click());
        let screen = Screen::fit(response.rect);

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.workbench.click(screen.to_canvas(pos));
            }
        }

        self.workbench.canvas_mut().render(&mut painter, screen);
    }

    fn notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.workbench.notice().cloned() else {
            return;
        };
        let mut open = true;
        let mut dismissed = false;
        egui::Window::new(notice.title.as_str())
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let text = RichText::new(&notice.message);
                match notice.kind {
                    NoticeKind::Error => ui.label(text.color(Color32::from_rgb(230, 80, 80))),
                    NoticeKind::Info => ui.label(text),
                };
                dismissed = ui.button("OK").clicked();
            });
        if !open || dismissed {
            self.workbench.dismiss_notice();
        }
    }
}

impl eframe::App for CircuitApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.workbench.poll_save();
        if self.workbench.is_saving() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::SidePanel::left("controls").resizable(false).show(ctx, |ui| self.controls(ui));

        if self.view.show_log {
            egui::TopBottomPanel::bottom("log_panel")
                .resizable(true)
                .default_height(160.0)
                .show(ctx, |ui| self.event_log(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| self.canvas(ui));

        self.notice(ctx);

        if self.workbench.canvas_mut().take_redraw() {
            ctx.request_repaint();
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.view);
    }
}
