use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Mocha,
    TokyoNightStorm,
    Terminal,
}

impl Theme {
    pub fn label(self) -> &'static str {
        match self {
            Theme::Mocha => "Mocha",
            Theme::TokyoNightStorm => "Tokyo Night",
            Theme::Terminal => "Terminal",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub accent_primary: Color,
    pub border_inactive: Color,
    pub selection_bg: Color,
    pub selection_inactive_bg: Color,
    pub muted_fg: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Mocha => Palette {
            bg: Color::Rgb(30, 30, 46),
            fg: Color::Rgb(248, 248, 255),
            accent_primary: Color::Rgb(203, 166, 247),
            border_inactive: Color::Rgb(120, 124, 150),
            selection_bg: Color::Rgb(78, 82, 110),
            selection_inactive_bg: Color::Rgb(49, 50, 68),
            muted_fg: Color::Rgb(147, 153, 178),
        },
        Theme::TokyoNightStorm => Palette {
            bg: Color::Rgb(36, 40, 59),
            fg: Color::Rgb(192, 202, 245),
            accent_primary: Color::Rgb(122, 162, 247),
            border_inactive: Color::Rgb(65, 72, 104),
            selection_bg: Color::Rgb(46, 60, 100),
            selection_inactive_bg: Color::Rgb(41, 46, 66),
            muted_fg: Color::Rgb(86, 95, 137),
        },
        // Defer to the terminal's own colours.
        Theme::Terminal => Palette {
            bg: Color::Reset,
            fg: Color::Reset,
            accent_primary: Color::Cyan,
            border_inactive: Color::DarkGray,
            selection_bg: Color::Blue,
            selection_inactive_bg: Color::DarkGray,
            muted_fg: Color::Gray,
        },
    }
}
