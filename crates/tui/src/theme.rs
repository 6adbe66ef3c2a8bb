use ratatui::style::Color;

/// Colour palette shared by both screens.
#[derive(Debug, Clone, Copy)]
pub struct TuiTheme {
    pub text_strong: Color,
    pub text_base: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub border_normal: Color,
    pub border_active: Color,
    pub bar_bg: Color,
}

impl TuiTheme {
    pub fn default_dark() -> Self {
        Self {
            text_strong: Color::White,
            text_base: Color::Gray,
            text_muted: Color::DarkGray,
            primary: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
            border_normal: Color::DarkGray,
            border_active: Color::Cyan,
            bar_bg: Color::Rgb(30, 30, 30),
        }
    }
}
