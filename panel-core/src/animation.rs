//! Animations-Engine
//!
//! Hält den Zustand der aktiven LED-Animation und rendert pro Tick höchstens
//! einen Frame auf Strip und Status-Pixel. Die Frame-Rate ist unabhängig von
//! der Loop-Geschwindigkeit auf `FRAME_INTERVAL_MS` begrenzt.

use crate::colors::{self, Color};
use crate::logic::{PULSE_PERIOD, bounce_position, chase_position, color_wheel, pulse_level};
use crate::traits::{LedError, LedStrip};
use crate::types::{AnimationKind, Direction};

/// Minimaler Abstand zwischen zwei Frames (~25 FPS)
pub const FRAME_INTERVAL_MS: u64 = 40;

/// Grund-Helligkeit nach dem Start
pub const DEFAULT_BRIGHTNESS: f32 = 0.5;

/// Anzahl Pulse als Bestätigung nach dem Auslösen eines Buttons
pub const CONFIRM_PULSES: u8 = 5;

/// Zustand der aktiven Animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub kind: AnimationKind,
    pub step: u32,
    pub color: Color,
    pub direction: Direction,
    /// Zeitpunkt des letzten gerenderten Frames (ms)
    pub last_update: u64,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            kind: AnimationKind::None,
            step: 0,
            color: colors::WHITE,
            direction: Direction::Forward,
            last_update: 0,
        }
    }
}

pub struct AnimationEngine {
    state: AnimationState,
    brightness: f32,
    /// Pulse hat die Hardware-Helligkeit verändert
    brightness_dirty: bool,
    /// Verbleibende Pulse; `None` = endlos
    pulses_left: Option<u8>,
    /// Von Touch-Feedback verdrängte Animation; `Some` solange Feedback läuft
    background: Option<AnimationState>,
}

impl Default for AnimationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_BRIGHTNESS)
    }
}

impl AnimationEngine {
    pub fn new(brightness: f32) -> Self {
        Self {
            state: AnimationState::default(),
            brightness: brightness.clamp(0.0, 1.0),
            brightness_dirty: false,
            pulses_left: None,
            background: None,
        }
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    pub fn is_active(&self) -> bool {
        self.state.kind != AnimationKind::None
    }

    /// Touch-Feedback überlagert gerade die eigentliche Animation
    pub fn in_feedback(&self) -> bool {
        self.background.is_some()
    }

    /// Startet eine neue Animation mit frischem Zustand (step = 0)
    ///
    /// Der Frame-Zeitstempel bleibt erhalten, damit das Frame-Gate auch
    /// über Animationswechsel hinweg gilt. Laufendes Touch-Feedback wird
    /// verworfen; die neue Animation bleibt nach dem Loslassen bestehen.
    pub fn start(&mut self, kind: AnimationKind, color: Color, direction: Direction) {
        self.background = None;
        self.replace(kind, color, direction);
    }

    /// Wie `start`, aber mit Farbname (unbekannt → Weiß)
    pub fn start_named(&mut self, kind: AnimationKind, color_name: &str, direction: Direction) {
        self.start(kind, colors::lookup_or_white(color_name), direction);
    }

    /// Startet Touch-Feedback über der aktuellen Animation
    ///
    /// Die verdrängte Animation wird gemerkt und von `end_feedback` wieder
    /// aufgenommen.
    pub fn start_feedback(&mut self, kind: AnimationKind, color: Color) {
        if self.background.is_none() {
            self.background = Some(self.state);
        }
        self.replace(kind, color, Direction::Forward);
    }

    /// Feedback-Pulse, die nach `count` Durchläufen enden
    pub fn start_confirm_pulses(&mut self, color: Color, count: u8) {
        self.start_feedback(AnimationKind::Pulse, color);
        self.pulses_left = Some(count);
    }

    /// Beendet das Touch-Feedback
    ///
    /// Eine verdrängte Endlos-Animation läuft weiter, sonst werden die LEDs
    /// ausgeschaltet. Ohne aktives Feedback passiert nichts.
    pub fn end_feedback(&mut self) {
        match self.background.take() {
            None => {}
            Some(prev) if prev.kind.is_looping() => {
                self.pulses_left = None;
                self.state = AnimationState {
                    last_update: self.state.last_update,
                    ..prev
                };
            }
            Some(_) => self.replace(AnimationKind::Off, colors::OFF, Direction::Forward),
        }
    }

    fn replace(&mut self, kind: AnimationKind, color: Color, direction: Direction) {
        self.pulses_left = None;
        self.state = AnimationState {
            kind,
            step: 0,
            color,
            direction,
            last_update: self.state.last_update,
        };
    }

    /// Setzt die Grund-Helligkeit sofort auf beiden Outputs
    pub fn set_brightness<S: LedStrip, P: LedStrip>(
        &mut self,
        level: f32,
        strip: &mut S,
        status: &mut P,
    ) -> Result<(), LedError> {
        self.brightness = level.clamp(0.0, 1.0);
        self.brightness_dirty = false;
        strip.set_brightness(self.brightness);
        status.set_brightness(self.brightness);
        strip.show()?;
        status.show()
    }

    /// Rendert höchstens einen Frame
    ///
    /// Gibt `Ok(true)` zurück wenn ein Frame gerendert wurde. Vor Ablauf von
    /// `FRAME_INTERVAL_MS` seit dem letzten Frame passiert nichts.
    pub fn tick<S: LedStrip, P: LedStrip>(
        &mut self,
        now_ms: u64,
        strip: &mut S,
        status: &mut P,
    ) -> Result<bool, LedError> {
        if self.state.kind == AnimationKind::None {
            return Ok(false);
        }
        if now_ms.saturating_sub(self.state.last_update) < FRAME_INTERVAL_MS {
            return Ok(false);
        }
        self.state.last_update = now_ms;

        let mut status_changed = false;
        if self.state.kind != AnimationKind::Pulse && self.brightness_dirty {
            strip.set_brightness(self.brightness);
            status.set_brightness(self.brightness);
            self.brightness_dirty = false;
            status_changed = true;
        }

        let one_shot = self.state.kind.is_one_shot();
        let color = self.state.color.rgb;
        let step = self.state.step;
        let len = strip.len();

        match self.state.kind {
            AnimationKind::None => return Ok(false),
            AnimationKind::Fill | AnimationKind::Off => {
                strip.fill(color);
                status.fill(color);
                status_changed = true;
            }
            AnimationKind::Chase => {
                strip.fill(colors::OFF.rgb);
                if len > 0 {
                    strip.set_pixel(chase_position(step, len, self.state.direction), color);
                }
                status.fill(color);
                status_changed = true;
                self.state.step = step.wrapping_add(1);
            }
            AnimationKind::Bounce => {
                strip.fill(colors::OFF.rgb);
                if len > 0 {
                    strip.set_pixel(bounce_position(step, len), color);
                }
                status.fill(color);
                status_changed = true;
                self.state.step = step.wrapping_add(1);
            }
            AnimationKind::Pulse => {
                let level = pulse_level(step, self.brightness);
                strip.set_brightness(level);
                status.set_brightness(level);
                self.brightness_dirty = true;
                strip.fill(color);
                status.fill(color);
                status_changed = true;
                self.state.step = (step + 2) % PULSE_PERIOD;
                if self.state.step == 0 {
                    self.count_pulse();
                }
            }
            AnimationKind::Rainbow => {
                strip.fill(color_wheel((step % 255) as u8));
                self.state.step = step.wrapping_add(2);
            }
        }

        if one_shot {
            self.state.kind = AnimationKind::None;
        }

        strip.show()?;
        // Rainbow lässt das Status-Pixel unverändert
        if status_changed {
            status.show()?;
        }
        Ok(true)
    }

    /// Ein Pulse-Durchlauf ist beendet
    fn count_pulse(&mut self) {
        if let Some(left) = self.pulses_left {
            let left = left.saturating_sub(1);
            self.pulses_left = Some(left);
            if left == 0 {
                if self.background.is_some() {
                    self.end_feedback();
                } else {
                    self.replace(AnimationKind::Off, colors::OFF, Direction::Forward);
                }
            }
        }
    }
}
