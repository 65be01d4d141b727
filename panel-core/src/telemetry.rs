//! Telemetrie-Anzeige
//!
//! Ordnet MQTT-Topics festen Display-Zeilen zu, formatiert den Payload mit
//! dem Template der Zeile und berechnet die x-Position je nach Ausrichtung
//! bei jedem Update neu (die Textlänge variiert).

use heapless::{String, Vec};

use crate::logic::glyph_count;
use crate::traits::TextLabel;

/// Maximale Anzahl Display-Zeilen
pub const MAX_LINES: usize = 16;

/// Kapazität eines Label-Texts in Bytes
pub const LABEL_CAPACITY: usize = 48;

/// Payload, der als leeres Feld angezeigt wird
pub const UNAVAILABLE: &str = "unavailable";

/// Horizontale Ausrichtung relativ zum Anker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alignment {
    /// Text beginnt am Anker
    Left,
    /// Textmitte liegt am Anker
    Center,
    /// Textende liegt am Anker
    Right,
}

/// Statische Beschreibung einer Display-Zeile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayLine {
    /// Anfangstext vor der ersten Nachricht
    pub caption: &'static str,
    /// Topic der Zeile; leer = reine Beschriftung
    pub topic: &'static str,
    /// Template mit genau einem `{}` Platzhalter
    pub template: &'static str,
    pub align: Alignment,
    pub anchor: (i32, i32),
}

impl DisplayLine {
    pub const fn new(
        caption: &'static str,
        topic: &'static str,
        template: &'static str,
        align: Alignment,
        anchor: (i32, i32),
    ) -> Self {
        Self {
            caption,
            topic,
            template,
            align,
            anchor,
        }
    }

    /// Setzt den Payload in das Template ein (gekürzt auf `LABEL_CAPACITY`)
    pub fn format(&self, payload: &str) -> String<LABEL_CAPACITY> {
        let mut out = String::new();
        match self.template.split_once("{}") {
            Some((prefix, suffix)) => {
                push_truncated(&mut out, prefix);
                push_truncated(&mut out, payload);
                push_truncated(&mut out, suffix);
            }
            None => push_truncated(&mut out, self.template),
        }
        out
    }

    /// x-Position für einen Text gegebener Länge
    pub fn x_for(&self, text: &str, font_width: i32) -> i32 {
        let glyphs = glyph_count(text);
        match self.align {
            Alignment::Left => self.anchor.0,
            Alignment::Center => self.anchor.0 - font_width * ((glyphs + 1) / 2),
            Alignment::Right => self.anchor.0 - font_width * glyphs,
        }
    }
}

/// Hängt Zeichen an bis die Kapazität erreicht ist
fn push_truncated<const N: usize>(out: &mut String<N>, text: &str) {
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
}

/// Veränderlicher Zustand eines Labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelState {
    pub text: String<LABEL_CAPACITY>,
    pub x: i32,
    pub y: i32,
    /// Seit dem letzten `flush` geändert
    pub dirty: bool,
}

/// Fehler beim Aufbau des Boards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    TooManyLines,
}

pub struct TelemetryBoard<'a> {
    lines: &'a [DisplayLine],
    labels: Vec<LabelState, MAX_LINES>,
    font_width: i32,
}

impl<'a> TelemetryBoard<'a> {
    pub fn new(lines: &'a [DisplayLine], font_width: i32) -> Result<Self, LayoutError> {
        let mut labels = Vec::new();
        for line in lines {
            let mut text = String::new();
            push_truncated(&mut text, line.caption);
            labels
                .push(LabelState {
                    text,
                    x: line.anchor.0,
                    y: line.anchor.1,
                    dirty: true,
                })
                .map_err(|_| LayoutError::TooManyLines)?;
        }
        Ok(Self {
            lines,
            labels,
            font_width,
        })
    }

    pub fn label(&self, index: usize) -> Option<&LabelState> {
        self.labels.get(index)
    }

    /// Alle Topics mit Zeilen-Zuordnung (für Subscriptions)
    pub fn topics(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.lines
            .iter()
            .map(|line| -> &'a str { line.topic })
            .filter(|topic| !topic.is_empty())
    }

    /// Wendet eine Nachricht auf alle passenden Zeilen an
    ///
    /// Gibt die Anzahl aktualisierter Labels zurück; 0 wenn kein Topic passt.
    pub fn on_message(&mut self, topic: &str, payload: &str) -> usize {
        if topic.is_empty() {
            return 0;
        }
        let payload = if payload == UNAVAILABLE { " " } else { payload };

        let mut updated = 0;
        for (line, label) in self.lines.iter().zip(self.labels.iter_mut()) {
            if line.topic != topic {
                continue;
            }
            let text = line.format(payload);
            label.x = line.x_for(&text, self.font_width);
            label.text = text;
            label.dirty = true;
            updated += 1;
        }
        updated
    }

    pub fn has_dirty(&self) -> bool {
        self.labels.iter().any(|label| label.dirty)
    }

    /// Überträgt geänderte Labels auf die Anzeige-Objekte
    ///
    /// `targets[i]` gehört zu Zeile `i`. Gibt die Anzahl übertragener Labels zurück.
    pub fn flush<L: TextLabel>(&mut self, targets: &mut [L]) -> usize {
        let mut flushed = 0;
        for (label, target) in self.labels.iter_mut().zip(targets.iter_mut()) {
            if !label.dirty {
                continue;
            }
            target.set_text(&label.text);
            target.set_position(label.x, label.y);
            label.dirty = false;
            flushed += 1;
        }
        flushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: DisplayLine =
        DisplayLine::new("", "t", "CO2: {} ppm", Alignment::Left, (10, 20));

    #[test]
    fn test_format_inserts_payload() {
        assert_eq!(LINE.format("415").as_str(), "CO2: 415 ppm");
    }

    #[test]
    fn test_format_without_slot() {
        let line = DisplayLine::new("", "", "static", Alignment::Left, (0, 0));
        assert_eq!(line.format("x").as_str(), "static");
    }

    #[test]
    fn test_format_truncates() {
        let long = "0123456789012345678901234567890123456789012345678901234567890";
        let text = LINE.format(long);
        assert_eq!(text.len(), LABEL_CAPACITY);
        assert!(text.starts_with("CO2: 0123"));
    }

    #[test]
    fn test_center_rounds_half_up() {
        let line = DisplayLine::new("", "t", "{}", Alignment::Center, (100, 0));
        assert_eq!(line.x_for("abc", 8), 100 - 16);
        assert_eq!(line.x_for("abcd", 8), 100 - 16);
        assert_eq!(line.x_for("", 8), 100);
    }
}
