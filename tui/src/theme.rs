//! Color theme and glyphs for the Fortuna TUI.
//!
//! Uses Kanagawa Wave palette by default with an optional high-contrast override.

use ratatui::style::{Color, Modifier, Style};

use fortuna_types::Rgb;
use fortuna_types::ui::UiOptions;

/// Kanagawa Wave colors.
mod kanagawa {
    use super::Color;

    pub const SUMI_INK_0: Color = Color::Rgb(22, 22, 29);
    pub const SUMI_INK_3: Color = Color::Rgb(31, 31, 40);
    pub const SUMI_INK_4: Color = Color::Rgb(42, 42, 55);
    pub const SUMI_INK_5: Color = Color::Rgb(54, 54, 70);
    pub const SUMI_INK_6: Color = Color::Rgb(84, 84, 109);

    pub const FUJI_WHITE: Color = Color::Rgb(220, 215, 186);
    pub const OLD_WHITE: Color = Color::Rgb(200, 192, 147);
    pub const FUJI_GRAY: Color = Color::Rgb(114, 113, 105);
    pub const KATANA_GRAY: Color = Color::Rgb(113, 124, 124);

    pub const ONI_VIOLET: Color = Color::Rgb(149, 127, 184);
    pub const SPRING_BLUE: Color = Color::Rgb(127, 180, 202);
    pub const SPRING_GREEN: Color = Color::Rgb(152, 187, 108);
    pub const CARP_YELLOW: Color = Color::Rgb(230, 195, 132);
    pub const SURIMI_ORANGE: Color = Color::Rgb(255, 160, 102);
    pub const PEACH_RED: Color = Color::Rgb(255, 93, 98);
}

/// Colors by role on the game screens.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    /// Focused setup field.
    pub bg_field: Color,
    pub bg_popup: Color,
    pub bg_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub text_disabled: Color,
    /// Titles and the new-game prompt.
    pub primary: Color,
    /// Active player, turn changes, phrase draft.
    pub accent: Color,
    /// Points won.
    pub gain: Color,
    /// Topic, spin values, victory.
    pub gold: Color,
    /// Errors and points lost.
    pub error: Color,
    pub hotkey: Color,
    /// Wheel pointer.
    pub pointer: Color,
    /// Whether wheel wedges keep their own colors.
    pub sector_colors: bool,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: kanagawa::SUMI_INK_0,
            bg_panel: kanagawa::SUMI_INK_3,
            bg_field: kanagawa::SUMI_INK_4,
            bg_popup: kanagawa::SUMI_INK_5,
            bg_border: kanagawa::SUMI_INK_6,
            text_primary: kanagawa::FUJI_WHITE,
            text_secondary: kanagawa::OLD_WHITE,
            text_muted: kanagawa::FUJI_GRAY,
            text_disabled: kanagawa::KATANA_GRAY,
            primary: kanagawa::ONI_VIOLET,
            accent: kanagawa::SPRING_BLUE,
            gain: kanagawa::SPRING_GREEN,
            gold: kanagawa::CARP_YELLOW,
            error: kanagawa::PEACH_RED,
            hotkey: kanagawa::SURIMI_ORANGE,
            pointer: kanagawa::FUJI_WHITE,
            sector_colors: true,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            bg_field: Color::DarkGray,
            bg_popup: Color::Black,
            bg_border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,
            text_disabled: Color::DarkGray,
            primary: Color::White,
            accent: Color::Cyan,
            gain: Color::Green,
            gold: Color::Yellow,
            error: Color::Red,
            hotkey: Color::Yellow,
            pointer: Color::Yellow,
            sector_colors: false,
        }
    }

    /// Fill color of a wheel wedge. High contrast alternates two colors by
    /// position so neighbours stay distinguishable.
    #[must_use]
    pub fn sector(&self, rgb: Rgb, index: usize) -> Color {
        if self.sector_colors {
            let Rgb(r, g, b) = rgb;
            Color::Rgb(r, g, b)
        } else if index % 2 == 0 {
            Color::White
        } else {
            Color::DarkGray
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// Glyphs for markers, hidden letters and spinners.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub active: &'static str,
    pub pointer: &'static str,
    pub separator: &'static str,
    pub hidden_letter: &'static str,
    pub spinner_frames: &'static [&'static str],
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_FRAMES_ASCII: &[&str] = &["|", "/", "-", "\\"];

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            active: ">",
            pointer: "v",
            separator: "|",
            hidden_letter: "_",
            spinner_frames: SPINNER_FRAMES_ASCII,
        }
    } else {
        Glyphs {
            active: "▸",
            pointer: "▼",
            separator: "·",
            hidden_letter: "▁",
            spinner_frames: SPINNER_FRAMES,
        }
    }
}

/// When `reduced_motion` is enabled, returns a static glyph instead of cycling.
#[must_use]
pub fn spinner_frame(tick: usize, options: UiOptions) -> &'static str {
    let frames = glyphs(options).spinner_frames;
    if options.reduced_motion {
        frames[0]
    } else {
        frames[tick % frames.len()]
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn active_player(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.bg_dark)
            .bg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn letter_available(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn letter_used(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_muted)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    #[must_use]
    pub fn letter_wrong(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.bg_dark)
            .bg(palette.error)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.hotkey)
            .add_modifier(Modifier::BOLD)
    }
}
