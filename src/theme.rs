use ratatui::style::Color;

pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub status: Color,
  pub error: Color,
  pub rating: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub const THEMES: [Theme; 3] = [
  Theme {
    name: "marquee",
    bg: Color::Rgb(18, 16, 20),
    fg: Color::Rgb(232, 226, 218),
    accent: Color::Rgb(229, 9, 20),
    muted: Color::Rgb(128, 120, 124),
    border: Color::Rgb(64, 56, 60),
    highlight_fg: Color::Rgb(255, 255, 255),
    highlight_bg: Color::Rgb(92, 20, 28),
    stripe_bg: Color::Rgb(26, 23, 28),
    status: Color::Rgb(240, 190, 80),
    error: Color::Rgb(255, 99, 99),
    rating: Color::Rgb(245, 197, 24),
    key_fg: Color::Rgb(18, 16, 20),
    key_bg: Color::Rgb(200, 190, 180),
  },
  Theme {
    name: "noir",
    bg: Color::Rgb(10, 10, 10),
    fg: Color::Rgb(220, 220, 220),
    accent: Color::Rgb(255, 255, 255),
    muted: Color::Rgb(120, 120, 120),
    border: Color::Rgb(60, 60, 60),
    highlight_fg: Color::Rgb(10, 10, 10),
    highlight_bg: Color::Rgb(210, 210, 210),
    stripe_bg: Color::Rgb(20, 20, 20),
    status: Color::Rgb(180, 180, 180),
    error: Color::Rgb(230, 120, 120),
    rating: Color::Rgb(230, 230, 230),
    key_fg: Color::Rgb(10, 10, 10),
    key_bg: Color::Rgb(160, 160, 160),
  },
  Theme {
    name: "matinee",
    bg: Color::Rgb(16, 24, 40),
    fg: Color::Rgb(214, 222, 235),
    accent: Color::Rgb(97, 175, 239),
    muted: Color::Rgb(110, 124, 148),
    border: Color::Rgb(48, 62, 88),
    highlight_fg: Color::Rgb(16, 24, 40),
    highlight_bg: Color::Rgb(97, 175, 239),
    stripe_bg: Color::Rgb(22, 31, 50),
    status: Color::Rgb(229, 192, 123),
    error: Color::Rgb(224, 108, 117),
    rating: Color::Rgb(229, 192, 123),
    key_fg: Color::Rgb(16, 24, 40),
    key_bg: Color::Rgb(152, 195, 121),
  },
];
