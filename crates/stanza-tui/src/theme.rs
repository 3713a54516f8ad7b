use ratatui::style::Color;

/// Nord palette reduced to the roles the shelf actually uses.
pub struct Theme {
    pub bg: Color,
    pub bg_row: Color,
    pub border: Color,
    pub border_active: Color,
    pub fg: Color,
    pub fg_bright: Color,
    pub muted: Color,
    /// Selection bars and panel titles.
    pub accent: Color,
    /// Rating stars.
    pub star: Color,
    /// Read markers.
    pub read: Color,
    /// Save failures in the status bar.
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::Rgb(46, 52, 64),
            bg_row: Color::Rgb(59, 66, 82),
            border: Color::Rgb(76, 86, 106),
            border_active: Color::Rgb(136, 192, 208),
            fg: Color::Rgb(216, 222, 233),
            fg_bright: Color::Rgb(236, 239, 244),
            muted: Color::Rgb(97, 110, 136),
            accent: Color::Rgb(136, 192, 208),
            star: Color::Rgb(235, 203, 139),
            read: Color::Rgb(163, 190, 140),
            error: Color::Rgb(191, 97, 106),
        }
    }
}
