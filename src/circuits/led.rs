use eframe::egui::{Color32, Pos2, Vec2};

use super::{ComponentImpl, ComponentRenderingContext};

const RADIUS: f32 = 10.0;
const LEG_LENGTH: f32 = 14.0;

#[derive(Clone)]
pub struct Led;

impl ComponentImpl for Led {
    fn id() -> &'static str {
        "led"
    }

    fn display_name() -> &'static str {
        "LED"
    }

    fn draw(ctx: &mut ComponentRenderingContext) {
        let center = ctx.position;
        let border_color = Color32::BLACK;
        let lens = ctx.tint(Color32::from_rgb(255, 60, 40), Color32::from_rgb(110, 20, 20));
        let leg = ctx.tint(Color32::from_gray(220), Color32::from_gray(150));

        // anode and cathode legs
        for dx in [-4.0, 4.0] {
            let top = center + Vec2::new(dx, RADIUS * 0.6);
            let bottom = Pos2::new(top.x, center.y + RADIUS + LEG_LENGTH);
            ctx.paint.line(top, bottom, 1.5, leg);
        }

        if ctx.powered {
            ctx.paint.circle(center, RADIUS * 2.0, Color32::from_rgba_unmultiplied(255, 80, 40, 60), None);
        }

        ctx.paint.circle(center, RADIUS, lens, Some((1.5, border_color)));

        // highlight
        let shine = ctx.tint(Color32::from_rgb(255, 200, 180), Color32::from_rgb(160, 60, 60));
        ctx.paint.circle(center + Vec2::new(-3.5, -3.5), RADIUS * 0.25, shine, None);
    }
}
