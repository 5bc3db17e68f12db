use std::{sync::Arc, time::Duration};

use chrono::Local;
use rand_xoshiro::{
    rand_core::{RngCore, SeedableRng},
    Xoshiro256PlusPlus,
};
use tracing::{info, warn};

use crate::{
    canvas::{Canvas, CanvasPos, CANVAS_HEIGHT, CANVAS_WIDTH},
    circuits::{wire, Component, ComponentKind},
    events::{EventLog, EventTag},
    save::{SaveOutcome, SaveTask},
    sink::{CircuitRecord, PowerState, RecordSink},
    theme::Theme,
};

/// Distance kept between a new component and the canvas edge.
pub const PLACEMENT_MARGIN: i32 = 40;

/// Random positions for new components.
pub struct Placement {
    rng: Xoshiro256PlusPlus,
}

impl Placement {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Seeds from the operating system, falling back to the clock.
    pub fn from_entropy() -> Self {
        let mut seed = [0u8; 8];
        let seed = match getrandom::getrandom(&mut seed) {
            Ok(()) => u64::from_le_bytes(seed),
            Err(err) => {
                warn!(%err, "no os randomness, seeding placement from the clock");
                Local::now().timestamp_nanos_opt().unwrap_or_default() as u64
            }
        };
        Self::from_seed(seed)
    }

    fn range(&mut self, min: i32, max: i32) -> i32 {
        let span = (max - min).max(0) as u32 + 1;
        min + (self.rng.next_u32() % span) as i32
    }

    /// A point where a component of `kind` fits entirely inside the canvas.
    pub fn position_for(&mut self, kind: ComponentKind) -> CanvasPos {
        let right_reach = match kind {
            ComponentKind::Wire => wire::END_OFFSET.0,
            _ => 0,
        };
        let x = self.range(PLACEMENT_MARGIN, CANVAS_WIDTH - PLACEMENT_MARGIN - right_reach);
        let y = self.range(PLACEMENT_MARGIN, CANVAS_HEIGHT - PLACEMENT_MARGIN);
        CanvasPos::new(x, y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Message waiting to be shown to the user.
#[derive(Clone, Debug)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

/// Everything the window shows and mutates, without any window.
pub struct Workbench {
    canvas: Canvas,
    events: EventLog,
    placement: Placement,
    circuit_name: String,
    sink: Arc<dyn RecordSink>,
    save: Option<SaveTask>,
    last_outcome: Option<SaveOutcome>,
    notice: Option<Notice>,
}

impl Workbench {
    pub fn new(circuit_name: impl Into<String>, theme: Theme, sink: Arc<dyn RecordSink>, placement: Placement) -> Self {
        Self {
            canvas: Canvas::new(theme),
            events: EventLog::default(),
            placement,
            circuit_name: circuit_name.into(),
            sink,
            save: None,
            last_outcome: None,
            notice: None,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn circuit_name(&self) -> &str {
        &self.circuit_name
    }

    pub fn sink_description(&self) -> String {
        self.sink.describe()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Adds a component of `kind` at a random spot and returns where it went.
    pub fn add_component(&mut self, kind: ComponentKind) -> CanvasPos {
        let position = self.placement.position_for(kind);
        self.canvas.add_component(Component::new(kind, position));
        self.events.push(EventTag::Add, format!("{kind} at ({}, {})", position.x, position.y));
        position
    }

    pub fn set_power(&mut self, power: bool) {
        self.canvas.set_power(power);
        self.events.push(EventTag::Power, format!("power {}", PowerState::from(power)));
    }

    pub fn toggle_power(&mut self) -> bool {
        let power = !self.canvas.power();
        self.set_power(power);
        power
    }

    /// Switches theme, clearing the board.
    pub fn change_theme(&mut self, theme: Theme) {
        let removed = self.canvas.component_count();
        self.canvas.reset_theme(theme);
        self.events.push(EventTag::Theme, format!("{theme} ({removed} components cleared)"));
    }

    pub fn click(&mut self, at: CanvasPos) -> Option<usize> {
        let hit = self.canvas.hit_test(at)?;
        let component = &self.canvas.components()[hit];
        let detail = format!(
            "{} #{} at ({}, {}), {}",
            component.kind(),
            hit + 1,
            component.position().x,
            component.position().y,
            PowerState::from(component.is_powered()),
        );
        self.events.push(EventTag::Click, detail);
        Some(hit)
    }

    /// Snapshot of what a save would send right now.
    pub fn record(&self) -> CircuitRecord {
        CircuitRecord {
            circuit_name: self.circuit_name.clone(),
            theme: self.canvas.theme().name().to_owned(),
            component_count: self.canvas.component_count(),
            power_state: self.canvas.power().into(),
            timestamp: Local::now().naive_local(),
        }
    }

    pub fn last_outcome(&self) -> Option<&SaveOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn is_saving(&self) -> bool {
        self.save.is_some()
    }

    /// Starts a background save. Refused while another save is running.
    pub fn save(&mut self) -> bool {
        if self.save.is_some() {
            return false;
        }
        let record = self.record();
        info!(
            count = record.component_count,
            power = %record.power_state,
            sink = %self.sink.describe(),
            "saving circuit"
        );
        self.save = Some(SaveTask::spawn(self.sink.clone(), record));
        true
    }

    /// Stops waiting for the running save. Returns false if none was running.
    pub fn cancel_save(&mut self) -> bool {
        let Some(task) = self.save.take() else {
            return false;
        };
        self.events.push(EventTag::Save, "save cancelled");
        self.last_outcome = Some(task.cancel());
        true
    }

    /// Picks up a finished save, if any. Never blocks.
    pub fn poll_save(&mut self) -> Option<&SaveOutcome> {
        let task = self.save.take()?;
        match task.poll() {
            Ok(outcome) => Some(self.settle(outcome)),
            Err(task) => {
                self.save = Some(task);
                None
            }
        }
    }

    /// Like [`Workbench::poll_save`] but waits up to `timeout`.
    pub fn wait_for_save(&mut self, timeout: Duration) -> Option<&SaveOutcome> {
        let task = self.save.take()?;
        match task.wait(timeout) {
            Ok(outcome) => Some(self.settle(outcome)),
            Err(task) => {
                self.save = Some(task);
                None
            }
        }
    }

    fn settle(&mut self, outcome: SaveOutcome) -> &SaveOutcome {
        match &outcome {
            SaveOutcome::Saved(record) => {
                let message = format!(
                    "{} saved: {} components, power {}",
                    record.circuit_name, record.component_count, record.power_state
                );
                self.events.push(EventTag::Db, message.clone());
                self.notice = Some(Notice {
                    kind: NoticeKind::Info,
                    title: "Circuit saved".into(),
                    message,
                });
            }
            SaveOutcome::Failed(_, err) => {
                warn!(%err, "saving circuit failed");
                self.events.push(EventTag::Db, format!("save failed: {err}"));
                self.notice = Some(Notice {
                    kind: NoticeKind::Error,
                    title: "Database error".into(),
                    message: err.to_string(),
                });
            }
            SaveOutcome::Cancelled(_) => {}
        }
        self.last_outcome.insert(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn bench() -> Workbench {
        Workbench::new("Casco F32", Theme::default(), Arc::new(MemorySink::default()), Placement::from_seed(7))
    }

    #[test]
    fn placement_stays_inside_margins() {
        let mut placement = Placement::from_seed(42);
        for _ in 0..500 {
            for kind in ComponentKind::ALL {
                let p = placement.position_for(kind);
                let component = Component::new(kind, p);
                assert!(p.x >= PLACEMENT_MARGIN && p.y >= PLACEMENT_MARGIN, "{p:?}");
                assert!(p.x <= CANVAS_WIDTH - PLACEMENT_MARGIN && p.y <= CANVAS_HEIGHT - PLACEMENT_MARGIN);
                if let Some(end) = component.end() {
                    assert!(end.x <= CANVAS_WIDTH - PLACEMENT_MARGIN, "{end:?}");
                }
            }
        }
    }

    #[test]
    fn same_seed_same_positions() {
        let mut a = Placement::from_seed(9);
        let mut b = Placement::from_seed(9);
        for _ in 0..10 {
            assert_eq!(a.position_for(ComponentKind::Led), b.position_for(ComponentKind::Led));
        }
    }

    #[test]
    fn add_logs_and_counts() {
        let mut bench = bench();
        let at = bench.add_component(ComponentKind::Resistor);
        assert_eq!(bench.canvas().component_count(), 1);
        assert_eq!(bench.canvas().components()[0].position(), at);
        assert_eq!(bench.events().count_tagged(EventTag::Add), 1);
    }

    #[test]
    fn click_reports_hit_and_logs() {
        let mut bench = bench();
        let at = bench.add_component(ComponentKind::Led);
        assert_eq!(bench.click(at), Some(0));
        assert_eq!(bench.events().last().map(|e| e.tag), Some(EventTag::Click));
        let before = bench.events().len();
        assert_eq!(bench.click(CanvasPos::new(-500, -500)), None);
        assert_eq!(bench.events().len(), before);
    }

    #[test]
    fn change_theme_clears_and_records_theme() {
        let mut bench = bench();
        bench.add_component(ComponentKind::Led);
        bench.change_theme(Theme::Workshop);
        assert_eq!(bench.canvas().component_count(), 0);
        assert_eq!(bench.record().theme, Theme::Workshop.name());
    }

    #[test]
    fn record_reflects_live_state() {
        let mut bench = bench();
        bench.add_component(ComponentKind::Wire);
        bench.add_component(ComponentKind::Wire);
        bench.set_power(true);
        let record = bench.record();
        assert_eq!(record.component_count, 2);
        assert_eq!(record.power_state, PowerState::On);
        assert_eq!(record.circuit_name, "Casco F32");
    }
}
