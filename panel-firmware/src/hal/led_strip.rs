// WS2812 Strip über das RMT Peripheral
//
// Implementiert `LedStrip` aus panel-core. Pixel-Operationen ändern nur den
// Frame-Buffer; `show()` skaliert mit der Helligkeit und schreibt via RMT.

use esp_hal_smartled::SmartLedsAdapter;
use panel_core::{LedError, LedStrip};
use rgb::RGB8;
use smart_leds_trait::SmartLedsWrite;

/// RMT-gesteuerter Strip mit `N` LEDs
///
/// `BUFFER_SIZE` ist die Anzahl RMT-Pulse, wie von `smart_led_buffer!(N)`
/// erzeugt.
pub struct RmtLedStrip<'a, const N: usize, const BUFFER_SIZE: usize> {
    led: SmartLedsAdapter<'a, BUFFER_SIZE>,
    frame: [RGB8; N],
    brightness: f32,
}

impl<'a, const N: usize, const BUFFER_SIZE: usize> RmtLedStrip<'a, N, BUFFER_SIZE> {
    /// Erstellt einen Strip aus einem fertig konfigurierten Adapter
    ///
    /// Der Adapter kapselt RMT-Channel, GPIO und Puls-Buffer (erstellt mit
    /// `smart_led_buffer!(N)`).
    pub fn new(led: SmartLedsAdapter<'a, BUFFER_SIZE>, brightness: f32) -> Self {
        Self {
            led,
            frame: [RGB8::default(); N],
            brightness: brightness.clamp(0.0, 1.0),
        }
    }
}

/// Skaliert einen Kanal mit der Helligkeit (0.0 - 1.0)
fn scale(channel: u8, level: f32) -> u8 {
    (channel as f32 * level) as u8
}

impl<'a, const N: usize, const BUFFER_SIZE: usize> LedStrip for RmtLedStrip<'a, N, BUFFER_SIZE> {
    fn set_pixel(&mut self, index: usize, color: RGB8) {
        if let Some(pixel) = self.frame.get_mut(index) {
            *pixel = color;
        }
    }

    fn fill(&mut self, color: RGB8) {
        self.frame = [color; N];
    }

    fn set_brightness(&mut self, level: f32) {
        self.brightness = level.clamp(0.0, 1.0);
    }

    fn len(&self) -> usize {
        N
    }

    fn show(&mut self) -> Result<(), LedError> {
        let level = self.brightness;
        self.led
            .write(self.frame.iter().map(|c| RGB8 {
                r: scale(c.r, level),
                g: scale(c.g, level),
                b: scale(c.b, level),
            }))
            .map_err(|_| LedError::WriteFailed)
    }
}
