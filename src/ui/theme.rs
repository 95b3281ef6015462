use crate::ui::style::{Color, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub hint: Style,
    pub error: Style,
    pub success: Style,
    pub label: Style,
    pub muted: Style,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            title: Style::new().with_bold(),
            hint: Style::new().with_color(Color::DarkGrey),
            error: Style::new().with_color(Color::Red).with_bold(),
            success: Style::new().with_color(Color::Green).with_bold(),
            label: Style::new().with_color(Color::Cyan),
            muted: Style::new().with_color(Color::DarkGrey),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
