//! Touch-Buttons mit Press-Count
//!
//! Ein Button löst erst nach `TRIGGER_THRESHOLD` aufeinanderfolgenden
//! Treffern aus. Ein Touch außerhalb des Buttons setzt dessen Zähler zurück.
//! Gehaltener Kontakt zählt nicht erneut (flankengesteuert).

use rgb::RGB8;

use crate::animation::{AnimationEngine, CONFIRM_PULSES};
use crate::colors;
use crate::types::AnimationKind;

/// Anzahl Treffer bis zum Auslösen
pub const TRIGGER_THRESHOLD: u8 = 2;

/// Payload beim Auslösen
pub const PRESS_PAYLOAD: &[u8] = b"1";

/// Achsenparalleles Rechteck in Bildschirm-Pixeln
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, (x, y): (i32, i32)) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Zustand eines einzelnen Buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    #[default]
    Idle,
    /// Treffer im aktuellen Poll
    Pressed,
    /// Kontakt besteht weiter
    Held,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonInfo {
    pub label: &'static str,
    pub rect: Rect,
    pub fill_color: RGB8,
    /// Publish-Topic; leer = kein Publish
    pub topic: &'static str,
    /// Farbname für Chase- und Pulse-Feedback
    pub led_color: &'static str,
    pub press_count: u8,
    /// Visuelles Feedback, solange der Button gedrückt ist
    pub selected: bool,
    pub state: ButtonState,
    /// Ausgelöst; Bestätigungs-Pulse folgt beim Loslassen
    confirm_pending: bool,
}

impl ButtonInfo {
    pub const fn new(
        label: &'static str,
        rect: Rect,
        fill_color: RGB8,
        topic: &'static str,
        led_color: &'static str,
    ) -> Self {
        Self {
            label,
            rect,
            fill_color,
            topic,
            led_color,
            press_count: 0,
            selected: false,
            state: ButtonState::Idle,
            confirm_pending: false,
        }
    }
}

/// Ergebnis eines Polls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadEvent {
    /// Neuer Treffer, Schwelle noch nicht erreicht
    Pressed { index: usize, count: u8 },
    /// Schwelle erreicht: `topic` muss mit `PRESS_PAYLOAD` gepublished werden
    Triggered { index: usize, topic: &'static str },
    Held { index: usize },
    Released { index: usize },
}

pub struct ButtonPad<const N: usize> {
    buttons: [ButtonInfo; N],
}

impl<const N: usize> ButtonPad<N> {
    pub fn new(buttons: [ButtonInfo; N]) -> Self {
        Self { buttons }
    }

    pub fn buttons(&self) -> &[ButtonInfo; N] {
        &self.buttons
    }

    /// Index des gerade gehaltenen Buttons
    pub fn held(&self) -> Option<usize> {
        self.buttons
            .iter()
            .position(|b| b.state != ButtonState::Idle)
    }

    /// Verarbeitet einen Touch-Sample
    ///
    /// Startet bei einem Treffer einen Chase in der Button-Farbe, der beim
    /// Loslassen endet. Nach dem Loslassen eines ausgelösten Buttons folgen
    /// stattdessen `CONFIRM_PULSES` Pulse als Bestätigung.
    pub fn poll(
        &mut self,
        touch: Option<(i32, i32)>,
        engine: &mut AnimationEngine,
    ) -> Option<PadEvent> {
        if let Some(index) = self.held() {
            let button = &mut self.buttons[index];
            return match touch {
                Some(_) => {
                    button.state = ButtonState::Held;
                    Some(PadEvent::Held { index })
                }
                None => {
                    button.state = ButtonState::Idle;
                    button.selected = false;
                    if button.confirm_pending {
                        button.confirm_pending = false;
                        engine.start_confirm_pulses(
                            colors::lookup_or_white(button.led_color),
                            CONFIRM_PULSES,
                        );
                    } else {
                        engine.end_feedback();
                    }
                    Some(PadEvent::Released { index })
                }
            };
        }

        // Ohne Kontakt bleiben die Zähler erhalten
        let point = touch?;

        // Nur der erste passende Button wird bedient
        let hit = self.buttons.iter().position(|b| b.rect.contains(point));
        for (i, button) in self.buttons.iter_mut().enumerate() {
            if Some(i) != hit {
                button.press_count = 0;
            }
        }

        let index = hit?;
        let button = &mut self.buttons[index];
        button.selected = true;
        button.state = ButtonState::Pressed;
        button.press_count += 1;
        engine.start_feedback(
            AnimationKind::Chase,
            colors::lookup_or_white(button.led_color),
        );

        if button.press_count < TRIGGER_THRESHOLD {
            return Some(PadEvent::Pressed {
                index,
                count: button.press_count,
            });
        }

        button.press_count = 0;
        if button.topic.is_empty() {
            return Some(PadEvent::Pressed {
                index,
                count: TRIGGER_THRESHOLD,
            });
        }
        button.confirm_pending = true;
        Some(PadEvent::Triggered {
            index,
            topic: button.topic,
        })
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PadEvent {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PadEvent::Pressed { index, count } => {
                defmt::write!(fmt, "Pressed {{ index: {}, count: {} }}", index, count)
            }
            PadEvent::Triggered { index, topic } => {
                defmt::write!(fmt, "Triggered {{ index: {}, topic: {} }}", index, topic)
            }
            PadEvent::Held { index } => defmt::write!(fmt, "Held {{ index: {} }}", index),
            PadEvent::Released { index } => defmt::write!(fmt, "Released {{ index: {} }}", index),
        }
    }
}
