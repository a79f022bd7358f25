//! Overlay popups drawn over the game screen.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

use fortuna_engine::{App, OverlayKind, OverlaySlot};

use crate::effects::apply_overlay_effect;
use crate::theme::{Glyphs, Palette, styles};

const MIN_WIDTH: u16 = 28;
const MAX_WIDTH: u16 = 60;

pub(crate) fn draw_overlay(frame: &mut Frame, app: &App, palette: &Palette, glyphs: &Glyphs) {
    let Some(slot) = app.overlay() else {
        return;
    };
    let viewport = frame.area();
    let lines = overlay_lines(slot, app, palette, glyphs);
    let content_width = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
    let width = (content_width + 6)
        .clamp(MIN_WIDTH, MAX_WIDTH)
        .min(viewport.width);
    let height = (lines.len() as u16 + 4).min(viewport.height);
    let base = Rect {
        x: viewport.x + viewport.width.saturating_sub(width) / 2,
        y: viewport.y + viewport.height.saturating_sub(height) / 2,
        width,
        height,
    };
    let area = app
        .view()
        .overlay_effect
        .as_ref()
        .map_or(base, |effect| apply_overlay_effect(effect, base, viewport));

    let border = border_color(slot, palette);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(palette.bg_popup))
        .padding(Padding::new(2, 2, 1, 1));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn border_color(slot: &OverlaySlot, palette: &Palette) -> Color {
    match slot.kind {
        _ if slot.is_error => palette.error,
        OverlayKind::TurnChange => palette.accent,
        OverlayKind::Error => palette.error,
        OverlayKind::Victory => palette.gold,
        OverlayKind::Confirm => palette.primary,
    }
}

fn overlay_lines(
    slot: &OverlaySlot,
    app: &App,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Vec<Line<'static>> {
    let headline = Style::default()
        .fg(palette.text_primary)
        .add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled(slot.message.to_string(), headline))];

    if let Some(target) = &slot.target_player {
        lines.push(Line::from(Span::styled(
            target.clone(),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )));
    }

    match slot.kind {
        OverlayKind::Victory => {
            lines.push(Line::from(""));
            for (rank, (name, score)) in app.mirror().ranking().into_iter().enumerate() {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{}. {name} ", rank + 1),
                        Style::default().fg(palette.text_secondary),
                    ),
                    Span::styled(
                        score.to_string(),
                        Style::default()
                            .fg(palette.gold)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]));
            }
            lines.push(Line::from(""));
            lines.push(hint_line(
                &[("Enter", "close"), ("Ctrl-N", "new game")],
                palette,
                glyphs,
            ));
        }
        OverlayKind::Confirm => {
            lines.push(Line::from(""));
            lines.push(hint_line(
                &[("y", "change players"), ("s", "same players"), ("Esc", "cancel")],
                palette,
                glyphs,
            ));
        }
        OverlayKind::TurnChange | OverlayKind::Error => {}
    }
    lines
}

pub(crate) fn hint_line(
    hints: &[(&'static str, &'static str)],
    palette: &Palette,
    glyphs: &Glyphs,
) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, label)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(
                format!(" {} ", glyphs.separator),
                styles::key_hint(palette),
            ));
        }
        spans.push(Span::styled(*key, styles::key_highlight(palette)));
        spans.push(Span::styled(format!(" {label}"), styles::key_hint(palette)));
    }
    Line::from(spans)
}
