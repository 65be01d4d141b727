//! Farbtabelle
//!
//! Feste Zuordnung Farbname → RGB, wie sie im LED-Topic verwendet wird.

use rgb::RGB8;

/// Benannte Farbe aus der festen Tabelle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub name: &'static str,
    pub rgb: RGB8,
}

const fn color(name: &'static str, r: u8, g: u8, b: u8) -> Color {
    Color {
        name,
        rgb: RGB8 { r, g, b },
    }
}

pub const WHITE: Color = color("white", 255, 255, 255);
pub const OFF: Color = color("off", 0, 0, 0);

/// Alle bekannten Farben (alphabetisch, inkl. "off")
pub const COLORS: [Color; 17] = [
    color("amber", 255, 100, 0),
    color("aqua", 50, 255, 255),
    color("blue", 0, 0, 255),
    color("cyan", 0, 255, 255),
    color("gold", 255, 222, 30),
    color("jade", 0, 255, 40),
    color("green", 0, 255, 0),
    color("magenta", 255, 0, 20),
    OFF,
    color("orange", 255, 40, 0),
    color("pink", 255, 51, 119),
    color("purple", 180, 0, 255),
    color("red", 255, 0, 0),
    color("teal", 0, 255, 120),
    color("violet", 153, 0, 255),
    WHITE,
    color("yellow", 255, 150, 0),
];

/// Sucht eine Farbe per Name (exakter Vergleich, Name bereits lowercase)
pub fn lookup(name: &str) -> Option<Color> {
    COLORS.iter().copied().find(|c| c.name == name)
}

/// Wie `lookup`, fällt aber bei unbekannten Namen auf Weiß zurück
///
/// ```
/// # use panel_core::colors::{lookup_or_white, WHITE};
/// assert_eq!(lookup_or_white("puce"), WHITE);
/// assert_eq!(lookup_or_white("red").rgb.r, 255);
/// ```
pub fn lookup_or_white(name: &str) -> Color {
    lookup(name).unwrap_or(WHITE)
}

/// Wandelt eine 24-Bit Farbe `0xRRGGBB` in RGB8
pub const fn from_hex(hex: u32) -> RGB8 {
    RGB8 {
        r: ((hex >> 16) & 0xFF) as u8,
        g: ((hex >> 8) & 0xFF) as u8,
        b: (hex & 0xFF) as u8,
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Color {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "{} ({}, {}, {})",
            self.name,
            self.rgb.r,
            self.rgb.g,
            self.rgb.b
        )
    }
}
