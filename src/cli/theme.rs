use std::io::IsTerminal;

use crossterm::style::{Color, Stylize};

use crate::model::config::Theme;
use crate::model::task::Priority;

/// What a piece of output text represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Heading,
    Dim,
    Done,
    Overdue,
    Priority(Priority),
    Label,
}

/// Terminal colors for the configured theme
#[derive(Debug, Clone)]
pub struct Palette {
    enabled: bool,
    heading: Color,
    dim: Color,
    done: Color,
    overdue: Color,
    high: Color,
    medium: Color,
    low: Color,
    label: Color,
}

impl Palette {
    /// Colors for `theme`, enabled only when stdout is a terminal and
    /// `NO_COLOR` is unset.
    pub fn for_terminal(theme: Theme) -> Palette {
        let enabled = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Palette::new(theme, enabled)
    }

    pub fn new(theme: Theme, enabled: bool) -> Palette {
        match theme {
            Theme::Dark => Palette {
                enabled,
                heading: Color::Rgb { r: 0xFB, g: 0x41, b: 0x96 },
                dim: Color::Rgb { r: 0x7D, g: 0x78, b: 0xBF },
                done: Color::Rgb { r: 0x44, g: 0xFF, b: 0x88 },
                overdue: Color::Rgb { r: 0xFF, g: 0x44, b: 0x44 },
                high: Color::Rgb { r: 0xFF, g: 0x44, b: 0x44 },
                medium: Color::Rgb { r: 0xFF, g: 0xD7, b: 0x00 },
                low: Color::Rgb { r: 0x44, g: 0xDD, b: 0xFF },
                label: Color::Rgb { r: 0xCC, g: 0x66, b: 0xFF },
            },
            Theme::Light => Palette {
                enabled,
                heading: Color::Rgb { r: 0x8A, g: 0x10, b: 0x50 },
                dim: Color::Rgb { r: 0x6A, g: 0x6A, b: 0x6A },
                done: Color::Rgb { r: 0x1A, g: 0x7F, b: 0x37 },
                overdue: Color::Rgb { r: 0xC0, g: 0x1C, b: 0x1C },
                high: Color::Rgb { r: 0xC0, g: 0x1C, b: 0x1C },
                medium: Color::Rgb { r: 0x9A, g: 0x67, b: 0x00 },
                low: Color::Rgb { r: 0x05, g: 0x50, b: 0xAE },
                label: Color::Rgb { r: 0x6F, g: 0x42, b: 0xC1 },
            },
        }
    }

    /// No colors at all
    pub fn plain() -> Palette {
        Palette::new(Theme::default(), false)
    }

    pub fn paint(&self, text: &str, role: Role) -> String {
        if !self.enabled {
            return text.to_string();
        }
        let color = match role {
            Role::Heading => self.heading,
            Role::Dim => self.dim,
            Role::Done => self.done,
            Role::Overdue => self.overdue,
            Role::Priority(Priority::High) => self.high,
            Role::Priority(Priority::Medium) => self.medium,
            Role::Priority(Priority::Low) => self.low,
            Role::Label => self.label,
        };
        let styled = text.with(color);
        if role == Role::Heading {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_palette_is_identity() {
        let p = Palette::plain();
        assert_eq!(p.paint("hello", Role::Heading), "hello");
        assert_eq!(p.paint("x", Role::Priority(Priority::High)), "x");
    }

    #[test]
    fn enabled_palette_wraps_in_escape_codes() {
        let p = Palette::new(Theme::Light, true);
        let out = p.paint("hello", Role::Done);
        assert!(out.contains("hello"));
        assert!(out.starts_with('\u{1b}'));
    }
}
