use std::fmt;

use eframe::egui::{Align2, Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::paint::PaintContext;

const COLOMBIA_YELLOW: Color32 = Color32::from_rgb(252, 209, 22);
const COLOMBIA_BLUE: Color32 = Color32::from_rgb(0, 56, 147);
const COLOMBIA_RED: Color32 = Color32::from_rgb(206, 17, 38);

#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub background: Color32,
    pub grid: Color32,
    pub board: Color32,
    pub trace: Color32,
    pub shell: Color32,
    pub visor: Color32,
    pub text: Color32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    HelmetColombia,
    Workshop,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::HelmetColombia, Theme::Workshop];

    /// Name shown in the UI and written to the database.
    pub fn name(self) -> &'static str {
        match self {
            Theme::HelmetColombia => "Casco Colombia 2026 - F32 Piloto de Combate",
            Theme::Workshop => "Taller Clásico",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::HelmetColombia => Palette {
                background: Color32::from_rgb(18, 24, 38),
                grid: Color32::from_rgb(34, 44, 66),
                board: Color32::from_rgb(0, 98, 110),
                trace: Color32::from_rgb(120, 200, 190),
                shell: Color32::from_rgb(70, 78, 70),
                visor: Color32::from_rgb(30, 30, 36),
                text: Color32::from_gray(230),
            },
            Theme::Workshop => Palette {
                background: Color32::from_rgb(236, 232, 220),
                grid: Color32::from_rgb(210, 204, 190),
                board: Color32::from_rgb(30, 110, 60),
                trace: Color32::from_rgb(200, 170, 80),
                shell: Color32::from_rgb(150, 150, 150),
                visor: Color32::from_rgb(60, 70, 90),
                text: Color32::from_gray(40),
            },
        }
    }

    /// Static background art: a title, a controller board and a pilot helmet.
    /// The board's status LED follows `power`.
    pub fn draw_illustration(self, paint: &mut PaintContext, power: bool) {
        let palette = self.palette();

        paint.text(Pos2::new(20.0, 16.0), Align2::LEFT_TOP, self.name(), 16.0, palette.text);

        draw_board(paint, &palette, power);
        draw_helmet(paint, &palette, self == Theme::HelmetColombia);
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn draw_board(paint: &mut PaintContext, palette: &Palette, power: bool) {
    let board = Rect::from_min_size(Pos2::new(40.0, 370.0), Vec2::new(260.0, 140.0));
    paint.rect(board, 8.0, palette.board, Some((2.0, Color32::BLACK)));

    // digital header
    for i in 0..14 {
        let x = board.left() + 24.0 + i as f32 * 15.0;
        let pin = Rect::from_min_size(Pos2::new(x, board.top() + 8.0), Vec2::splat(8.0));
        paint.rect(pin, 1.0, Color32::from_gray(20), None);
    }

    // traces from the header down to the chip
    let chip = Rect::from_min_size(Pos2::new(110.0, 430.0), Vec2::new(90.0, 34.0));
    for i in 0..5 {
        let x = chip.left() + 10.0 + i as f32 * 17.0;
        paint.line(Pos2::new(x, board.top() + 16.0), Pos2::new(x, chip.top()), 1.5, palette.trace);
    }
    paint.rect(chip, 2.0, Color32::from_gray(25), Some((1.0, Color32::from_gray(90))));
    paint.text(chip.center(), Align2::CENTER_CENTER, "F32 CTRL", 11.0, Color32::from_gray(200));

    // usb socket
    let usb = Rect::from_min_size(Pos2::new(board.left() - 12.0, board.top() + 30.0), Vec2::new(28.0, 26.0));
    paint.rect(usb, 2.0, Color32::from_gray(170), Some((1.0, Color32::BLACK)));

    let status = if power {
        Color32::from_rgb(60, 230, 90)
    } else {
        Color32::from_rgb(20, 60, 30)
    };
    paint.circle(Pos2::new(board.right() - 24.0, board.bottom() - 20.0), 5.0, status, Some((1.0, Color32::BLACK)));
    paint.text(
        Pos2::new(board.right() - 34.0, board.bottom() - 20.0),
        Align2::RIGHT_CENTER,
        "PWR",
        10.0,
        palette.trace,
    );
}

fn draw_helmet(paint: &mut PaintContext, palette: &Palette, flag_band: bool) {
    let center = Pos2::new(640.0, 210.0);

    paint.circle(center, 110.0, palette.shell, Some((3.0, Color32::BLACK)));

    // chin guard
    let jaw = [
        center + Vec2::new(-95.0, 50.0),
        center + Vec2::new(95.0, 50.0),
        center + Vec2::new(70.0, 125.0),
        center + Vec2::new(-70.0, 125.0),
    ];
    paint.polygon(&jaw, palette.shell, (3.0, Color32::BLACK));

    let visor = [
        center + Vec2::new(-85.0, -20.0),
        center + Vec2::new(85.0, -20.0),
        center + Vec2::new(70.0, 45.0),
        center + Vec2::new(-70.0, 45.0),
    ];
    paint.polygon(&visor, palette.visor, (2.0, Color32::from_gray(200)));

    if flag_band {
        // yellow band is twice as tall as blue and red
        let left = center.x - 60.0;
        let mut top = center.y - 95.0;
        for (color, height) in [(COLOMBIA_YELLOW, 20.0), (COLOMBIA_BLUE, 10.0), (COLOMBIA_RED, 10.0)] {
            let stripe = Rect::from_min_size(Pos2::new(left, top), Vec2::new(120.0, height));
            paint.rect(stripe, 0.0, color, None);
            top += height;
        }
    }

    paint.text(center + Vec2::new(0.0, 95.0), Align2::CENTER_CENTER, "F32", 14.0, palette.text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{testing::Recording, Screen};

    #[test]
    fn flag_band_only_on_colombia_theme() {
        for (theme, expected) in [(Theme::HelmetColombia, true), (Theme::Workshop, false)] {
            let mut rec = Recording::default();
            let mut paint = PaintContext::new(&mut rec, Screen::IDENTITY);
            theme.draw_illustration(&mut paint, false);
            assert_eq!(rec.fills().contains(&COLOMBIA_BLUE), expected);
            assert_eq!(rec.texts[0], theme.name());
        }
    }

    #[test]
    fn status_led_follows_power() {
        let on = Color32::from_rgb(60, 230, 90);
        let mut rec = Recording::default();
        let mut paint = PaintContext::new(&mut rec, Screen::IDENTITY);
        Theme::Workshop.draw_illustration(&mut paint, true);
        assert!(rec.fills().contains(&on));
    }

    #[test]
    fn theme_round_trips_through_ron() {
        let text = ron::to_string(&Theme::Workshop).unwrap();
        assert_eq!(text, "Workshop");
        assert_eq!(ron::from_str::<Theme>("HelmetColombia").unwrap(), Theme::HelmetColombia);
    }
}
