//! TUI rendering for Fortuna using ratatui.

mod effects;
mod input;
mod overlay;
mod theme;
mod wheel;

pub use effects::apply_overlay_effect;
pub use input::{InputPump, apply_event, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};
pub use wheel::wedge_points;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use fortuna_engine::{App, LetterState, Screen, SpinPhase};
use fortuna_types::ui::PulseDirection;
use fortuna_types::{MAX_PLAYERS, SpinValue, VOWEL_PRICE, is_vowel, sanitize_terminal_text};

use self::overlay::{draw_overlay, hint_line};
use self::wheel::draw_wheel;

const SCOREBOARD_WIDTH: u16 = 28;
const SETUP_WIDTH: u16 = 52;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let options = app.view().ui_options;
    let palette = palette(options);
    let glyphs = glyphs(options);
    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    match app.screen() {
        Screen::Setup => draw_setup(frame, app, &palette, &glyphs),
        Screen::Game => {
            draw_game(frame, app, &palette, &glyphs);
            draw_overlay(frame, app, &palette, &glyphs);
        }
    }
}

// ============================================================================
// Setup screen
// ============================================================================

fn draw_setup(frame: &mut Frame, app: &App, palette: &Palette, glyphs: &Glyphs) {
    let form = app.setup();
    let mut lines = vec![
        Line::from(Span::styled(
            "Wheel of Fortune",
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Players ", Style::default().fg(palette.text_secondary)),
            Span::styled(
                format!("< {} >", form.player_count()),
                styles::key_highlight(palette),
            ),
            Span::styled(
                format!("  (1-{MAX_PLAYERS})"),
                Style::default().fg(palette.text_muted),
            ),
        ]),
        Line::from(""),
    ];

    for (seat, name) in form.names().iter().enumerate() {
        let focused = seat == form.focused();
        let marker = if focused { glyphs.active } else { " " };
        let field_style = if focused {
            Style::default()
                .fg(palette.text_primary)
                .bg(palette.bg_field)
        } else {
            Style::default().fg(palette.text_secondary)
        };
        let cursor = if focused { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker} Player {} ", seat + 1), styles::key_hint(palette)),
            Span::styled(format!("{name}{cursor}"), field_style),
        ]));
    }

    lines.push(Line::from(""));
    if let Some(error) = form.error() {
        lines.push(Line::from(Span::styled(
            sanitize_terminal_text(error).into_owned(),
            Style::default().fg(palette.error),
        )));
    } else if form.player_count() == 1 {
        lines.push(Line::from(Span::styled(
            "A blank name plays as \"Player\"",
            Style::default().fg(palette.text_muted),
        )));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(""));
    lines.push(hint_line(
        &[("Tab", "next"), ("←/→", "seats"), ("Enter", "start"), ("Esc", "quit")],
        palette,
        glyphs,
    ));

    let area = frame.area();
    let height = (lines.len() as u16 + 4).min(area.height);
    let width = SETUP_WIDTH.min(area.width);
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.primary))
        .style(Style::default().bg(palette.bg_panel))
        .title(" New game ")
        .padding(Padding::new(2, 2, 1, 1));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

// ============================================================================
// Game screen
// ============================================================================

fn draw_game(frame: &mut Frame, app: &App, palette: &Palette, glyphs: &Glyphs) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(SCOREBOARD_WIDTH),
            Constraint::Min(30),
            Constraint::Percentage(42),
        ])
        .split(rows[0]);

    draw_scoreboard(frame, app, columns[0], palette, glyphs);
    draw_board(frame, app, columns[1], palette, glyphs);
    if let Some(engine) = app.spin_engine() {
        let wheel_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(3)])
            .split(columns[2]);
        draw_wheel(frame, engine, wheel_rows[0], palette, glyphs);
        draw_spin_label(frame, app, wheel_rows[1], palette);
    }
    draw_status_bar(frame, app, rows[1], palette, glyphs);
}

fn panel<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.bg_border))
        .style(Style::default().bg(palette.bg_panel))
        .title(title)
}

fn draw_scoreboard(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let mirror = app.mirror();
    let active = mirror.active_player_name();
    let pulse = app.view().score_pulse.as_ref();
    let inner_width = usize::from(area.width.saturating_sub(2));

    let mut lines = Vec::new();
    for name in &mirror.player_names {
        let is_active = active == Some(name.as_str());
        let marker = if is_active { glyphs.active } else { " " };
        let score = mirror.score_of(name).to_string();
        let label = format!("{marker} {name}");
        let pad = inner_width.saturating_sub(label.width() + score.width() + 1);
        let style = if is_active {
            styles::active_player(palette)
        } else {
            Style::default().fg(palette.text_secondary)
        };
        lines.push(Line::from(vec![
            Span::styled(label, style),
            Span::styled(" ".repeat(pad + 1), style),
            Span::styled(score, style),
        ]));

        if let Some(pulse) = pulse.filter(|p| p.player() == name.as_str()) {
            let color = match pulse.direction() {
                PulseDirection::Gain => palette.gain,
                PulseDirection::Loss => palette.error,
            };
            lines.push(Line::from(Span::styled(
                format!("  {}", pulse.label()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
        }
    }

    frame.render_widget(
        Paragraph::new(lines).block(panel(" Players ", palette)),
        area,
    );
}

fn draw_board(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let draft_height = if app.phrase_draft().is_some() { 3 } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(4),
            Constraint::Length(draft_height),
            Constraint::Length(3),
        ])
        .split(area);

    let mirror = app.mirror();
    let topic = if mirror.topic.is_empty() {
        "…".to_string()
    } else {
        mirror.topic.clone()
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            topic,
            Style::default()
                .fg(palette.gold)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(panel(" Topic ", palette)),
        rows[0],
    );

    let phrase: String = mirror
        .masked_phrase
        .chars()
        .map(|c| match c {
            '_' => glyphs.hidden_letter.to_string(),
            c => c.to_string(),
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            phrase,
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(panel(" Phrase ", palette).padding(Padding::top(1))),
        rows[1],
    );

    draw_letters(frame, app, rows[2], palette);

    if let Some(draft) = app.phrase_draft() {
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!("{draft}_"), Style::default().fg(palette.text_primary)),
            ]))
            .block(
                panel(" Solve (Enter submit, Esc cancel) ", palette)
                    .border_style(Style::default().fg(palette.accent)),
            ),
            rows[3],
        );
    }

    draw_hints(frame, app, rows[4], palette, glyphs);
}

fn draw_letters(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let flash = app.view().letter_flash.as_ref().map(|f| f.letter());
    let vowel_mode = app.vowel_mode();
    let row = |letters: &mut dyn Iterator<Item = char>| {
        let spans: Vec<Span> = letters
            .map(|letter| {
                let mut style = match app.letter_state(letter) {
                    LetterState::Available => styles::letter_available(palette),
                    LetterState::Used => styles::letter_used(palette),
                    LetterState::Disabled => Style::default().fg(palette.text_disabled),
                };
                if vowel_mode && is_vowel(letter) {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                if flash == Some(letter) {
                    style = styles::letter_wrong(palette);
                }
                Span::styled(format!(" {letter} "), style)
            })
            .collect();
        Line::from(spans)
    };
    let lines = vec![row(&mut ('A'..='M')), row(&mut ('N'..='Z'))];
    let title = if vowel_mode {
        " Letters - choose a vowel "
    } else {
        " Letters "
    };
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(panel(title, palette)),
        area,
    );
}

fn draw_hints(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let hint = |key: &'static str, label: String, enabled: bool| {
        let (key_style, label_style) = if enabled {
            (styles::key_highlight(palette), styles::key_hint(palette))
        } else {
            let off = Style::default().fg(palette.text_disabled);
            (off, off)
        };
        [
            Span::styled(key, key_style),
            Span::styled(format!(" {label}"), label_style),
        ]
    };
    let separator = || Span::styled(format!(" {} ", glyphs.separator), styles::key_hint(palette));

    let mut spans = Vec::new();
    spans.extend(hint("Space", "spin".into(), app.spin_enabled()));
    spans.push(separator());
    if app.vowel_mode() {
        spans.extend(hint("Esc", "skip vowel".into(), true));
    } else {
        spans.extend(hint(
            "Ctrl-V",
            format!("vowel ({VOWEL_PRICE})"),
            app.buy_vowel_enabled(),
        ));
    }
    spans.push(separator());
    spans.extend(hint("Ctrl-P", "solve".into(), app.phrase_enabled()));
    spans.push(separator());
    spans.extend(hint("Ctrl-N", "new game".into(), true));
    spans.push(separator());
    spans.extend(hint("Ctrl-Q", "quit".into(), true));

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(panel("", palette)),
        area,
    );
}

fn draw_spin_label(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let Some(engine) = app.spin_engine() else {
        return;
    };
    let (label, style) = match engine.phase() {
        SpinPhase::AwaitingOutcome | SpinPhase::Landing => (
            engine.sector_under_pointer().label().to_string(),
            Style::default().fg(palette.text_secondary),
        ),
        SpinPhase::Idle | SpinPhase::Released => match &app.mirror().last_spin {
            Some(value) => (
                spin_label(value),
                Style::default()
                    .fg(palette.gold)
                    .add_modifier(Modifier::BOLD),
            ),
            None => (String::new(), Style::default()),
        },
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(label, style)))
            .alignment(Alignment::Center)
            .block(panel(" Last spin ", palette)),
        area,
    );
}

/// Display label of a spin value. Unknown server values are shown as sent.
#[must_use]
pub fn spin_label(value: &SpinValue) -> String {
    match value {
        SpinValue::Known(tag) => tag.label(),
        SpinValue::Unrecognized(raw) => sanitize_terminal_text(raw).into_owned(),
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let options = app.view().ui_options;
    let waiting = app.is_starting()
        || app
            .spin_engine()
            .is_some_and(|e| e.phase() == SpinPhase::AwaitingOutcome);

    let mut spans = Vec::new();
    if waiting {
        spans.push(Span::styled(
            format!("{} waiting for the server", spinner_frame(frame.count(), options)),
            Style::default().fg(palette.accent),
        ));
    } else if let Some(active) = app.mirror().active_player_name() {
        let status = if app.mirror().complete {
            "game over".to_string()
        } else if app.mirror().can_guess {
            format!("{active}: pick a consonant or solve")
        } else {
            format!("{active}: spin, buy a vowel or solve")
        };
        spans.push(Span::styled(status, Style::default().fg(palette.text_secondary)));
    }
    if let Some(id) = app.game_id() {
        spans.push(Span::styled(
            format!(" {} game {id}", glyphs.separator),
            Style::default().fg(palette.text_muted),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
