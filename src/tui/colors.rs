//! Palette shared by every screen

use ratatui::style::Color;

pub const BG_DARK: Color = Color::Rgb(24, 26, 33);
pub const BORDER_COLOR: Color = Color::Rgb(68, 75, 92);
pub const TEXT_PRIMARY: Color = Color::Rgb(220, 223, 228);
pub const TEXT_SECONDARY: Color = Color::Rgb(140, 147, 160);
/// Destructive actions and errors
pub const ACCENT_PRIMARY: Color = Color::Rgb(224, 108, 117);
/// Confirmations and success
pub const ACCENT_SECONDARY: Color = Color::Rgb(152, 195, 121);
/// Titles, focus and selection
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(97, 175, 239);
pub const ACCENT_WARNING: Color = Color::Rgb(229, 192, 123);
