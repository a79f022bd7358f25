//! Braille rendering of the wheel.

use std::f64::consts::TAU;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders};

use fortuna_engine::{SectorTable, SpinEngine};

use crate::theme::{Glyphs, Palette};

const RADIAL_STEPS: usize = 28;
/// Angular samples on the outer ring; inner rings scale down with radius.
const RIM_SAMPLES: usize = 240;
/// Canvases narrower than this skip wedge labels.
const LABEL_MIN_WIDTH: u16 = 44;

/// Sample points for every wedge of `table` rotated by `angle`, in canvas
/// coordinates of a unit wheel centered on the origin. Index `i` of the
/// result holds the points of sector `i`.
///
/// Screen angles run clockwise from the top, matching the pointer: a wheel
/// point at local angle `θ` is drawn at `θ + angle`.
#[must_use]
pub fn wedge_points(table: &SectorTable, angle: f64) -> Vec<Vec<(f64, f64)>> {
    let mut wedges = vec![Vec::new(); table.len()];
    if table.is_empty() {
        return wedges;
    }
    let wedge = table.wedge();
    for ring in 1..=RADIAL_STEPS {
        let radius = ring as f64 / RADIAL_STEPS as f64;
        let samples = ((RIM_SAMPLES as f64 * radius).ceil() as usize).max(table.len());
        for step in 0..samples {
            let local = (step as f64 + 0.5) / samples as f64 * TAU;
            let index = ((local / wedge) as usize).min(table.len() - 1);
            wedges[index].push(to_canvas(radius, local + angle));
        }
    }
    wedges
}

fn to_canvas(radius: f64, screen_angle: f64) -> (f64, f64) {
    (radius * screen_angle.sin(), radius * screen_angle.cos())
}

pub(crate) fn draw_wheel(
    frame: &mut Frame,
    engine: &SpinEngine,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let table = engine.table();
    let angle = engine.angle();
    let wedges = wedge_points(table, angle);
    let show_labels = area.width >= LABEL_MIN_WIDTH;
    let pointer = glyphs.pointer;

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.bg_border))
                .title(" Wheel "),
        )
        .background_color(palette.bg_dark)
        .marker(Marker::Braille)
        .x_bounds([-1.15, 1.15])
        .y_bounds([-1.15, 1.25])
        .paint(move |ctx| {
            for (sector, coords) in table.iter().zip(&wedges) {
                ctx.draw(&Points {
                    coords,
                    color: palette.sector(sector.color(), sector.index()),
                });
            }
            ctx.layer();
            for (x1, x2) in [(-0.08, 0.0), (0.0, 0.08)] {
                ctx.draw(&CanvasLine {
                    x1,
                    y1: 1.18,
                    x2,
                    y2: 1.0,
                    color: palette.pointer,
                });
            }
            if show_labels {
                for sector in table.iter() {
                    let center = table.center_angle(sector.index());
                    let local = TAU - center;
                    let (x, y) = to_canvas(0.68, local + angle);
                    ctx.print(
                        x - 0.05,
                        y,
                        Span::styled(
                            sector.label().to_string(),
                            Style::default().fg(palette.text_primary),
                        ),
                    );
                }
            }
            ctx.print(
                -0.02,
                1.22,
                Span::styled(pointer, Style::default().fg(palette.pointer)),
            );
        });
    frame.render_widget(canvas, area);
}
