use eframe::egui::Color32;

use super::{ComponentImpl, ComponentRenderingContext};

/// Where a new wire's second endpoint lands relative to its first.
pub const END_OFFSET: (i32, i32) = (80, 0);

#[derive(Clone)]
pub struct Wire;

impl ComponentImpl for Wire {
    fn id() -> &'static str {
        "wire"
    }

    fn display_name() -> &'static str {
        "Wire"
    }

    fn draw(ctx: &mut ComponentRenderingContext) {
        let start = ctx.position;
        let end = ctx.end.unwrap_or(start);
        let color = ctx.tint(Color32::from_rgb(255, 200, 0), Color32::from_gray(90));

        ctx.paint.line(start, end, 3.0, color);
        for p in [start, end] {
            ctx.paint.circle(p, 3.5, color, Some((1.0, Color32::BLACK)));
        }
    }
}
