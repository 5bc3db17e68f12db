use std::fmt;

use eframe::egui::{Color32, Pos2};

use crate::{canvas::CanvasPos, paint::PaintContext};

pub mod led;
pub mod resistor;
pub mod wire;

pub use led::Led;
pub use resistor::Resistor;
pub use wire::Wire;

/// Per-kind behavior. Implemented by zero-sized marker types, one per kind.
pub trait ComponentImpl {
    fn id() -> &'static str;

    fn display_name() -> &'static str;

    fn draw(ctx: &mut ComponentRenderingContext);
}

pub struct ComponentRenderingContext<'p, 'a> {
    pub paint: &'p mut PaintContext<'a>,
    pub position: Pos2,
    pub end: Option<Pos2>,
    pub powered: bool,
}

impl ComponentRenderingContext<'_, '_> {
    /// Picks the powered or unpowered variant of a color.
    pub fn tint(&self, on: Color32, off: Color32) -> Color32 {
        if self.powered {
            on
        } else {
            off
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Led,
    Resistor,
    Wire,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 3] = [ComponentKind::Led, ComponentKind::Resistor, ComponentKind::Wire];

    pub fn id(self) -> &'static str {
        match self {
            ComponentKind::Led => Led::id(),
            ComponentKind::Resistor => Resistor::id(),
            ComponentKind::Wire => Wire::id(),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ComponentKind::Led => Led::display_name(),
            ComponentKind::Resistor => Resistor::display_name(),
            ComponentKind::Wire => Wire::display_name(),
        }
    }

    fn draw(self, ctx: &mut ComponentRenderingContext) {
        match self {
            ComponentKind::Led => Led::draw(ctx),
            ComponentKind::Resistor => Resistor::draw(ctx),
            ComponentKind::Wire => Wire::draw(ctx),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Component {
    kind: ComponentKind,
    position: CanvasPos,
    end: Option<CanvasPos>,
    powered: bool,
}

impl Component {
    pub fn new(kind: ComponentKind, position: CanvasPos) -> Self {
        let end = match kind {
            ComponentKind::Wire => Some(position.offset(wire::END_OFFSET)),
            _ => None,
        };
        Self {
            kind,
            position,
            end,
            powered: false,
        }
    }

    pub fn led(position: CanvasPos) -> Self {
        Self::new(ComponentKind::Led, position)
    }

    pub fn resistor(position: CanvasPos) -> Self {
        Self::new(ComponentKind::Resistor, position)
    }

    pub fn wire(start: CanvasPos) -> Self {
        Self::new(ComponentKind::Wire, start)
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn position(&self) -> CanvasPos {
        self.position
    }

    /// Second endpoint, wires only.
    pub fn end(&self) -> Option<CanvasPos> {
        self.end
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    pub(crate) fn set_powered(&mut self, powered: bool) {
        self.powered = powered;
    }

    /// Draws with an explicit power state.
    pub fn draw(&self, paint: &mut PaintContext, powered: bool) {
        let mut ctx = ComponentRenderingContext {
            paint,
            position: self.position.to_pos2(),
            end: self.end.map(CanvasPos::to_pos2),
            powered,
        };
        self.kind.draw(&mut ctx);
    }

    /// Draws with the cached power state.
    pub fn render(&self, paint: &mut PaintContext) {
        self.draw(paint, self.powered)
    }

    /// Squared distance from `point` to this component's anchor, or to the
    /// segment for wires.
    pub fn distance_sq(&self, point: CanvasPos) -> i64 {
        match self.end {
            Some(end) => segment_distance_sq(self.position, end, point),
            None => self.position.distance_sq(point),
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {}{})",
            self.kind.id(),
            self.position.x,
            self.position.y,
            if self.powered { ", on" } else { "" }
        )
    }
}

fn segment_distance_sq(a: CanvasPos, b: CanvasPos, p: CanvasPos) -> i64 {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (dx, dy) = ((b.x - a.x) as f64, (b.y - a.y) as f64);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return a.distance_sq(p);
    }
    let t = (((p.x as f64 - ax) * dx + (p.y as f64 - ay) * dy) / len_sq).clamp(0.0, 1.0);
    let cx = ax + t * dx - p.x as f64;
    let cy = ay + t * dy - p.y as f64;
    (cx * cx + cy * cy).round() as i64
}
