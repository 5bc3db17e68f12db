use eframe::egui::{Color32, Rect, Vec2};

use super::{ComponentImpl, ComponentRenderingContext};

const BODY: Vec2 = Vec2::new(36.0, 12.0);
const LEAD_LENGTH: f32 = 14.0;

// brown black red: 1 kΩ
const BANDS: [Color32; 3] = [
    Color32::from_rgb(120, 70, 30),
    Color32::BLACK,
    Color32::from_rgb(200, 30, 30),
];

#[derive(Clone)]
pub struct Resistor;

impl ComponentImpl for Resistor {
    fn id() -> &'static str {
        "resistor"
    }

    fn display_name() -> &'static str {
        "Resistor"
    }

    fn draw(ctx: &mut ComponentRenderingContext) {
        let center = ctx.position;
        let half = BODY / 2.0;
        let lead = ctx.tint(Color32::from_rgb(255, 150, 40), Color32::from_gray(140));
        let body_fill = ctx.tint(Color32::from_rgb(230, 190, 120), Color32::from_rgb(170, 145, 105));

        let left = center - Vec2::new(half.x, 0.0);
        let right = center + Vec2::new(half.x, 0.0);
        ctx.paint.line(left - Vec2::new(LEAD_LENGTH, 0.0), left, 2.0, lead);
        ctx.paint.line(right, right + Vec2::new(LEAD_LENGTH, 0.0), 2.0, lead);

        let body = Rect::from_center_size(center, BODY);
        ctx.paint.rect(body, 4.0, body_fill, Some((1.0, Color32::BLACK)));

        for (i, band) in BANDS.into_iter().enumerate() {
            let x = body.left() + 8.0 + i as f32 * 7.0;
            let stripe = Rect::from_min_max([x, body.top()].into(), [x + 3.0, body.bottom()].into());
            ctx.paint.rect(stripe, 0.0, band, None);
        }
    }
}
