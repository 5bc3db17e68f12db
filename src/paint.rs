use eframe::{
    egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Rounding, Stroke, Vec2},
    epaint::{CircleShape, RectShape, Shape},
};

use crate::canvas::{CanvasPos, CANVAS_HEIGHT, CANVAS_WIDTH};

/// Something shapes can be drawn onto.
///
/// `egui::Painter` is the real target; tests record into a plain struct.
pub trait Surface {
    fn shape(&mut self, shape: Shape);

    fn text(&mut self, pos: Pos2, anchor: Align2, text: &str, size: f32, color: Color32);
}

impl Surface for Painter {
    fn shape(&mut self, shape: Shape) {
        self.add(shape);
    }

    fn text(&mut self, pos: Pos2, anchor: Align2, text: &str, size: f32, color: Color32) {
        Painter::text(self, pos, anchor, text, FontId::proportional(size), color);
    }
}

/// Maps canvas coordinates onto a screen rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screen {
    pub origin: Pos2,
    pub scale: f32,
}

impl Screen {
    pub const IDENTITY: Screen = Screen {
        origin: Pos2::ZERO,
        scale: 1.0,
    };

    /// Largest uniform scale that fits the whole canvas inside `rect`, centered.
    pub fn fit(rect: Rect) -> Self {
        let scale = (rect.width() / CANVAS_WIDTH as f32)
            .min(rect.height() / CANVAS_HEIGHT as f32)
            .max(0.05);
        let used = Vec2::new(CANVAS_WIDTH as f32, CANVAS_HEIGHT as f32) * scale;
        let origin = rect.min + (rect.size() - used) / 2.0;
        Self { origin, scale }
    }

    pub fn transform_pos(&self, pos: Pos2) -> Pos2 {
        self.origin + pos.to_vec2() * self.scale
    }

    pub fn transform_rect(&self, rect: Rect) -> Rect {
        Rect::from_min_max(self.transform_pos(rect.min), self.transform_pos(rect.max))
    }

    pub fn to_canvas(&self, screen_pos: Pos2) -> CanvasPos {
        let local = (screen_pos - self.origin) / self.scale;
        CanvasPos::new(local.x.round() as i32, local.y.round() as i32)
    }
}

/// A surface plus the transform used to reach it. All positions and sizes
/// passed to the helpers below are in canvas units.
pub struct PaintContext<'a> {
    pub surface: &'a mut dyn Surface,
    pub screen: Screen,
}

impl<'a> PaintContext<'a> {
    pub fn new(surface: &'a mut dyn Surface, screen: Screen) -> Self {
        Self { surface, screen }
    }

    fn stroke(&self, width: f32, color: Color32) -> Stroke {
        Stroke::new(width * self.screen.scale, color)
    }

    fn border(&self, border: Option<(f32, Color32)>) -> Stroke {
        border.map_or(Stroke::NONE, |(width, color)| self.stroke(width, color))
    }

    pub fn rect(&mut self, rect: Rect, rounding: f32, fill: Color32, border: Option<(f32, Color32)>) {
        let rect = self.screen.transform_rect(rect);
        let rounding = Rounding::same(rounding * self.screen.scale);
        let stroke = self.border(border);
        self.surface.shape(Shape::Rect(RectShape::new(rect, rounding, fill, stroke)));
    }

    pub fn circle(&mut self, center: Pos2, radius: f32, fill: Color32, border: Option<(f32, Color32)>) {
        let stroke = self.border(border);
        self.surface.shape(Shape::Circle(CircleShape {
            center: self.screen.transform_pos(center),
            radius: radius * self.screen.scale,
            fill,
            stroke,
        }));
    }

    pub fn line(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32) {
        let points = [self.screen.transform_pos(from), self.screen.transform_pos(to)];
        let stroke = self.stroke(width, color);
        self.surface.shape(Shape::line_segment(points, stroke));
    }

    pub fn polygon(&mut self, points: &[Pos2], fill: Color32, border: (f32, Color32)) {
        let points = points.iter().map(|p| self.screen.transform_pos(*p)).collect();
        let stroke = self.stroke(border.0, border.1);
        self.surface.shape(Shape::convex_polygon(points, fill, stroke));
    }

    pub fn text(&mut self, pos: Pos2, anchor: Align2, text: &str, size: f32, color: Color32) {
        let pos = self.screen.transform_pos(pos);
        let size = size * self.screen.scale;
        self.surface.text(pos, anchor, text, size, color);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_keeps_aspect_and_centers() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(1640.0, 2000.0));
        let screen = Screen::fit(rect);
        assert_eq!(screen.scale, 2.0);
        assert_eq!(screen.origin.x, 10.0);
        // 2000 - 540 * 2 = 920 spare pixels, half above
        assert_eq!(screen.origin.y, 20.0 + 460.0);
    }

    #[test]
    fn to_canvas_inverts_transform() {
        let screen = Screen {
            origin: Pos2::new(100.0, 50.0),
            scale: 1.5,
        };
        let p = screen.transform_pos(Pos2::new(200.0, 40.0));
        assert_eq!(screen.to_canvas(p), CanvasPos::new(200, 40));
    }
}
