//! Core Types für LED-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies, inklusive Parser für das
//! LED-Topic (`command` oder `command:option`).

use heapless::String;

use crate::colors::{self, Color};

/// Maximale Länge eines LED-Kommandos nach Normalisierung
pub const MAX_COMMAND_LEN: usize = 32;

/// Laufrichtung für Chase-Animationen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

/// Art der aktiven Animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnimationKind {
    /// Keine Animation aktiv
    #[default]
    None,
    Fill,
    Chase,
    Bounce,
    Pulse,
    Rainbow,
    Off,
}

impl AnimationKind {
    /// One-Shot Effekte laufen genau einen Frame und deaktivieren sich dann
    pub fn is_one_shot(self) -> bool {
        matches!(self, AnimationKind::Fill | AnimationKind::Off)
    }

    /// Looping Effekte laufen bis sie ersetzt werden; nur sie werden nach
    /// Touch-Feedback wieder aufgenommen
    pub fn is_looping(self) -> bool {
        matches!(
            self,
            AnimationKind::Chase
                | AnimationKind::Bounce
                | AnimationKind::Pulse
                | AnimationKind::Rainbow
        )
    }
}

/// Dekodiertes Kommando aus dem LED-Topic
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LedDirective {
    /// Startet eine Animation
    Animate {
        kind: AnimationKind,
        color: Color,
        direction: Direction,
    },
    /// Setzt die Grund-Helligkeit (0.0 ..= 1.0)
    Brightness(f32),
}

/// Fehler beim Dekodieren eines LED-Kommandos
///
/// Alle Varianten sind für das Panel ein No-Op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Leere Nachricht (nach Normalisierung)
    Empty,
    /// Nachricht länger als `MAX_COMMAND_LEN`
    TooLong,
    UnknownCommand,
    /// `bright` mit nicht-numerischem oder ungültigem Wert
    InvalidBrightness,
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CommandError::Empty => write!(f, "empty command"),
            CommandError::TooLong => write!(f, "command too long"),
            CommandError::UnknownCommand => write!(f, "unknown command"),
            CommandError::InvalidBrightness => write!(f, "invalid brightness value"),
        }
    }
}

impl LedDirective {
    /// Dekodiert eine rohe Nachricht aus dem LED-Topic
    ///
    /// Anführungszeichen werden entfernt, Whitespace getrimmt und alles
    /// kleingeschrieben. Ohne Option wird "white" angenommen, unbekannte
    /// Farben fallen ebenfalls auf Weiß zurück.
    ///
    /// ```
    /// # use panel_core::{AnimationKind, Direction, LedDirective};
    /// let d = LedDirective::parse("\"CHASELEFT:Red\"").unwrap();
    /// match d {
    ///     LedDirective::Animate { kind, color, direction } => {
    ///         assert_eq!(kind, AnimationKind::Chase);
    ///         assert_eq!(color.name, "red");
    ///         assert_eq!(direction, Direction::Reverse);
    ///     }
    ///     _ => panic!("expected Animate"),
    /// }
    /// ```
    pub fn parse(raw: &str) -> Result<Self, CommandError> {
        let normalized = normalize(raw)?;
        let text = normalized.trim();
        if text.is_empty() {
            return Err(CommandError::Empty);
        }

        let (command, option) = match text.split_once(':') {
            Some((command, option)) => (command.trim(), option.trim()),
            None => (text, ""),
        };
        if command.is_empty() {
            return Err(CommandError::Empty);
        }
        let option = if option.is_empty() { "white" } else { option };

        let animate = |kind, direction| LedDirective::Animate {
            kind,
            color: colors::lookup_or_white(option),
            direction,
        };

        match command {
            "chase" => Ok(animate(AnimationKind::Chase, Direction::Forward)),
            "chaseleft" => Ok(animate(AnimationKind::Chase, Direction::Reverse)),
            "bounce" => Ok(animate(AnimationKind::Bounce, Direction::Forward)),
            "pulse" => Ok(animate(AnimationKind::Pulse, Direction::Forward)),
            "fill" => Ok(animate(AnimationKind::Fill, Direction::Forward)),
            "rainbow" => Ok(LedDirective::Animate {
                kind: AnimationKind::Rainbow,
                color: colors::WHITE,
                direction: Direction::Forward,
            }),
            "off" => Ok(LedDirective::Animate {
                kind: AnimationKind::Off,
                color: colors::OFF,
                direction: Direction::Forward,
            }),
            "bright" => parse_brightness(option).map(LedDirective::Brightness),
            _ => Err(CommandError::UnknownCommand),
        }
    }
}

impl core::convert::TryFrom<&str> for LedDirective {
    type Error = CommandError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        LedDirective::parse(raw)
    }
}

/// Entfernt Anführungszeichen und wandelt in Kleinbuchstaben
fn normalize(raw: &str) -> Result<String<MAX_COMMAND_LEN>, CommandError> {
    let mut out = String::new();
    for c in raw.trim().chars().filter(|&c| c != '"') {
        out.push(c.to_ascii_lowercase()).map_err(|_| CommandError::TooLong)?;
    }
    Ok(out)
}

/// Werte ≤ 1 sind bereits ein Anteil, Werte bis 10 eine Skala 0..10
fn parse_brightness(option: &str) -> Result<f32, CommandError> {
    let value: f32 = option
        .parse()
        .map_err(|_| CommandError::InvalidBrightness)?;
    if !value.is_finite() || !(0.0..=10.0).contains(&value) {
        return Err(CommandError::InvalidBrightness);
    }
    Ok(if value <= 1.0 { value } else { value / 10.0 })
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for LedDirective {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LedDirective::Animate {
                kind,
                color,
                direction,
            } => {
                defmt::write!(
                    fmt,
                    "Animate {{ kind: {}, color: {}, direction: {} }}",
                    kind,
                    color,
                    direction
                )
            }
            LedDirective::Brightness(level) => {
                defmt::write!(fmt, "Brightness({})", level)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CommandError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CommandError::Empty => defmt::write!(fmt, "Empty"),
            CommandError::TooLong => defmt::write!(fmt, "TooLong"),
            CommandError::UnknownCommand => defmt::write!(fmt, "UnknownCommand"),
            CommandError::InvalidBrightness => defmt::write!(fmt, "InvalidBrightness"),
        }
    }
}
