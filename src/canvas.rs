use eframe::egui::{Pos2, Rect};
use tracing::debug;

use crate::{
    circuits::Component,
    paint::{PaintContext, Screen, Surface},
    theme::Theme,
};

pub const CANVAS_WIDTH: i32 = 820;
pub const CANVAS_HEIGHT: i32 = 540;
pub const GRID_SPACING: i32 = 20;

/// Clicks within this many canvas units of a component select it.
pub const HIT_RADIUS: i32 = 15;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CanvasPos {
    pub x: i32,
    pub y: i32,
}

impl CanvasPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_sq(self, other: CanvasPos) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    pub fn to_pos2(self) -> Pos2 {
        Pos2::new(self.x as f32, self.y as f32)
    }

    pub fn in_bounds(self) -> bool {
        (0..=CANVAS_WIDTH).contains(&self.x) && (0..=CANVAS_HEIGHT).contains(&self.y)
    }
}

/// Owns the components, the authoritative power flag and the theme.
pub struct Canvas {
    components: Vec<Component>,
    power: bool,
    theme: Theme,
    needs_redraw: bool,
}

impl Canvas {
    pub fn new(theme: Theme) -> Self {
        Self {
            components: Vec::new(),
            power: false,
            theme,
            needs_redraw: true,
        }
    }

    pub fn add_component(&mut self, mut component: Component) {
        component.set_powered(self.power);
        debug!(?component, "component added");
        self.components.push(component);
        self.needs_redraw = true;
    }

    pub fn set_power(&mut self, power: bool) {
        self.power = power;
        for component in &mut self.components {
            component.set_powered(power);
        }
        self.needs_redraw = true;
    }

    /// Flips the power flag and returns the new value.
    pub fn toggle_power(&mut self) -> bool {
        self.set_power(!self.power);
        self.power
    }

    pub fn power(&self) -> bool {
        self.power
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Switches theme and drops every component. Power is left as is.
    pub fn reset_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.components.clear();
        self.needs_redraw = true;
    }

    /// Index of the first component within [`HIT_RADIUS`] of `point`.
    pub fn hit_test(&self, point: CanvasPos) -> Option<usize> {
        let radius_sq = (HIT_RADIUS as i64) * (HIT_RADIUS as i64);
        self.components.iter().position(|c| c.distance_sq(point) <= radius_sq)
    }

    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn render(&mut self, surface: &mut dyn Surface, screen: Screen) {
        let mut paint = PaintContext::new(surface, screen);
        let palette = self.theme.palette();

        let bounds = Rect::from_min_max(Pos2::ZERO, CanvasPos::new(CANVAS_WIDTH, CANVAS_HEIGHT).to_pos2());
        paint.rect(bounds, 6.0, palette.background, Some((1.0, palette.grid)));

        for x in (GRID_SPACING..CANVAS_WIDTH).step_by(GRID_SPACING as usize) {
            paint.line(
                CanvasPos::new(x, 0).to_pos2(),
                CanvasPos::new(x, CANVAS_HEIGHT).to_pos2(),
                0.5,
                palette.grid,
            );
        }
        for y in (GRID_SPACING..CANVAS_HEIGHT).step_by(GRID_SPACING as usize) {
            paint.line(
                CanvasPos::new(0, y).to_pos2(),
                CanvasPos::new(CANVAS_WIDTH, y).to_pos2(),
                0.5,
                palette.grid,
            );
        }

        self.theme.draw_illustration(&mut paint, self.power);

        for component in &self.components {
            component.render(&mut paint);
        }

        self.needs_redraw = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{circuits::ComponentKind, paint::testing::Recording};

    fn filled() -> Canvas {
        let mut canvas = Canvas::new(Theme::default());
        canvas.add_component(Component::led(CanvasPos::new(100, 100)));
        canvas.add_component(Component::resistor(CanvasPos::new(300, 200)));
        canvas.add_component(Component::wire(CanvasPos::new(500, 300)));
        canvas
    }

    #[test]
    fn count_tracks_adds() {
        let mut canvas = Canvas::new(Theme::default());
        for i in 0..25 {
            assert_eq!(canvas.component_count(), i);
            let kind = ComponentKind::ALL[i % 3];
            canvas.add_component(Component::new(kind, CanvasPos::new(50 + i as i32, 60)));
        }
        assert_eq!(canvas.component_count(), 25);
    }

    #[test]
    fn set_power_reaches_earlier_components() {
        let mut canvas = filled();
        assert!(canvas.components().iter().all(|c| !c.is_powered()));
        canvas.set_power(true);
        assert!(canvas.components().iter().all(Component::is_powered));
    }

    #[test]
    fn new_component_takes_current_power() {
        let mut canvas = Canvas::new(Theme::default());
        canvas.set_power(true);
        canvas.add_component(Component::led(CanvasPos::new(10, 10)));
        assert!(canvas.components()[0].is_powered());
    }

    #[test]
    fn double_toggle_restores_flags() {
        let mut canvas = filled();
        let before: Vec<bool> = canvas.components().iter().map(Component::is_powered).collect();
        assert!(canvas.toggle_power());
        assert!(!canvas.toggle_power());
        let after: Vec<bool> = canvas.components().iter().map(Component::is_powered).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn hit_test_returns_first_match() {
        let mut canvas = filled();
        canvas.add_component(Component::resistor(CanvasPos::new(105, 100)));
        assert_eq!(canvas.hit_test(CanvasPos::new(104, 104)), Some(0));
        assert_eq!(canvas.hit_test(CanvasPos::new(302, 210)), Some(1));
        assert_eq!(canvas.hit_test(CanvasPos::new(560, 305)), Some(2));
        assert_eq!(canvas.hit_test(CanvasPos::new(700, 20)), None);
    }

    #[test]
    fn hit_radius_is_inclusive() {
        let canvas = filled();
        assert_eq!(canvas.hit_test(CanvasPos::new(100 + HIT_RADIUS, 100)), Some(0));
        assert_eq!(canvas.hit_test(CanvasPos::new(100 + HIT_RADIUS + 1, 100)), None);
    }

    #[test]
    fn reset_theme_clears_components_only() {
        let mut canvas = filled();
        canvas.set_power(true);
        canvas.reset_theme(Theme::Workshop);
        assert_eq!(canvas.component_count(), 0);
        assert!(canvas.power());
        assert_eq!(canvas.theme(), Theme::Workshop);
    }

    #[test]
    fn mutations_request_redraw() {
        let mut canvas = Canvas::new(Theme::default());
        assert!(canvas.take_redraw());
        assert!(!canvas.take_redraw());
        canvas.add_component(Component::led(CanvasPos::new(10, 10)));
        assert!(canvas.take_redraw());
        canvas.set_power(false);
        assert!(canvas.take_redraw());
    }

    #[test]
    fn render_draws_components_last() {
        let mut canvas = filled();
        let mut empty = Recording::default();
        Canvas::new(Theme::default()).render(&mut empty, Screen::IDENTITY);

        let mut rec = Recording::default();
        canvas.render(&mut rec, Screen::IDENTITY);
        assert!(rec.shapes.len() > empty.shapes.len());
        assert_eq!(rec.shapes[..empty.shapes.len()], empty.shapes[..]);
        assert!(rec.texts.contains(&Theme::default().name().to_owned()));
        assert!(!canvas.take_redraw());
    }

    #[test]
    fn render_tints_by_cached_flag() {
        let lit = eframe::egui::Color32::from_rgb(255, 60, 40);
        let mut canvas = Canvas::new(Theme::default());
        canvas.add_component(Component::led(CanvasPos::new(400, 60)));

        let mut off = Recording::default();
        canvas.render(&mut off, Screen::IDENTITY);
        assert!(!off.fills().contains(&lit));

        canvas.set_power(true);
        let mut on = Recording::default();
        canvas.render(&mut on, Screen::IDENTITY);
        assert!(on.fills().contains(&lit));
    }
}
