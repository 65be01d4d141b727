//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

use crate::types::Direction;

/// Pulse-Halbperiode in Schritten (0 → Peak)
pub const PULSE_HALF_PERIOD: u32 = 50;

/// Pulse-Periode in Schritten (0 → Peak → 0)
pub const PULSE_PERIOD: u32 = 2 * PULSE_HALF_PERIOD;

/// Position des Chase-Pixels für einen Schritt
///
/// # Beispiele
///
/// ```
/// # use panel_core::logic::chase_position;
/// # use panel_core::Direction;
/// assert_eq!(chase_position(13, 12, Direction::Forward), 1);
/// assert_eq!(chase_position(0, 12, Direction::Reverse), 11);
/// ```
pub fn chase_position(step: u32, len: usize, direction: Direction) -> usize {
    if len == 0 {
        return 0;
    }
    let p = step as usize % len;
    match direction {
        Direction::Forward => p,
        Direction::Reverse => (len - 1) - p,
    }
}

/// Position des Bounce-Pixels (Dreieckswelle mit Periode 2*(N-1))
///
/// # Beispiele
///
/// ```
/// # use panel_core::logic::bounce_position;
/// let seq: Vec<usize> = (0..8).map(|s| bounce_position(s, 4)).collect();
/// assert_eq!(seq, [0, 1, 2, 3, 2, 1, 0, 1]);
/// ```
pub fn bounce_position(step: u32, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let p = step as usize % period;
    if p < len { p } else { period - p }
}

/// Pulse-Helligkeit für einen Schritt, skaliert mit `base` und auf [0, 1] begrenzt
///
/// Rampe 0 → 1 über Schritte 0..50, dann 1 → 0 über 50..100.
pub fn pulse_level(step: u32, base: f32) -> f32 {
    let step = step.min(PULSE_PERIOD);
    let ramp = if step <= PULSE_HALF_PERIOD {
        step as f32 / PULSE_HALF_PERIOD as f32
    } else {
        (PULSE_PERIOD - step) as f32 / PULSE_HALF_PERIOD as f32
    };
    (ramp * base).clamp(0.0, 1.0)
}

/// Farbrad 0..=255: Rot → Grün → Blau → Rot
///
/// # Beispiele
///
/// ```
/// # use rgb::RGB8;
/// # use panel_core::logic::color_wheel;
/// assert_eq!(color_wheel(0), RGB8 { r: 255, g: 0, b: 0 });
/// assert_eq!(color_wheel(85), RGB8 { r: 0, g: 255, b: 0 });
/// assert_eq!(color_wheel(170), RGB8 { r: 0, g: 0, b: 255 });
/// ```
pub fn color_wheel(pos: u8) -> RGB8 {
    match pos {
        0..=84 => RGB8 {
            r: 255 - pos * 3,
            g: pos * 3,
            b: 0,
        },
        85..=169 => {
            let pos = pos - 85;
            RGB8 {
                r: 0,
                g: 255 - pos * 3,
                b: pos * 3,
            }
        }
        _ => {
            let pos = pos - 170;
            RGB8 {
                r: pos * 3,
                g: 0,
                b: 255 - pos * 3,
            }
        }
    }
}

/// Anzahl Zeichen (Glyphen) eines Texts, nicht Bytes
pub fn glyph_count(text: &str) -> i32 {
    text.chars().count() as i32
}
