//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware- und Netzwerk-Zugriff
//! ohne konkrete Implementierung. Die Firmware implementiert sie auf dem
//! ESP32, die Tests mit In-Memory Mocks.

use rgb::RGB8;

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedError {
    WriteFailed,
}

impl core::fmt::Display for LedError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LedError::WriteFailed => write!(f, "LED write failed"),
        }
    }
}

/// Trait für adressierbare LED-Strips (WS2812/Neopixel)
///
/// Pixel-Operationen ändern nur den Frame-Buffer. Erst `show()` schreibt
/// den Frame (mit Helligkeit skaliert) auf die Hardware.
///
/// # Implementierungen
/// - **Production:** RmtLedStrip (ESP32 RMT Peripheral)
/// - **Testing:** MockStrip (in-memory Mock)
pub trait LedStrip {
    /// Setzt ein einzelnes Pixel; Indizes außerhalb des Strips werden ignoriert
    fn set_pixel(&mut self, index: usize, color: RGB8);

    /// Setzt alle Pixel auf dieselbe Farbe
    fn fill(&mut self, color: RGB8);

    /// Globale Helligkeit 0.0 ..= 1.0
    fn set_brightness(&mut self, level: f32);

    /// Anzahl der Pixel
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Schreibt den aktuellen Frame auf die LEDs
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn show(&mut self) -> Result<(), LedError>;
}

/// Touch-Oberfläche (Digitizer)
pub trait TouchSurface {
    /// Aktueller Berührungspunkt in Bildschirm-Pixeln, `None` ohne Kontakt
    fn current_touch(&mut self) -> Option<(i32, i32)>;
}

/// Text-Label auf dem Display
pub trait TextLabel {
    fn set_text(&mut self, text: &str);
    fn set_position(&mut self, x: i32, y: i32);
}

/// Fehler-Typ für Transport-Operationen (MQTT)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    ConnectionClosed,
    Protocol,
    PublishFailed,
    Timeout,
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransportError::ConnectionClosed => write!(f, "connection closed"),
            TransportError::Protocol => write!(f, "protocol error"),
            TransportError::PublishFailed => write!(f, "publish failed"),
            TransportError::Timeout => write!(f, "timeout"),
        }
    }
}

/// Empfänger für eingehende Nachrichten
///
/// Entspricht dem `on_message` Callback des Transports.
pub trait MessageHandler {
    fn on_message(&mut self, topic: &str, payload: &str);
}

/// Publish/Subscribe Transport
///
/// # Implementierungen
/// - **Production:** MqttTransport (rust-mqtt über embassy-net)
/// - **Testing:** ScriptedTransport (Queue mit vorbereiteten Nachrichten)
/// - **Ohne Verbindung:** Offline
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Wartet höchstens `timeout_ms` auf eingehende Nachrichten und
    /// übergibt jede empfangene Nachricht an `handler`.
    ///
    /// Ein Timeout ohne Nachricht ist kein Fehler.
    async fn poll<H: MessageHandler>(
        &mut self,
        timeout_ms: u64,
        handler: &mut H,
    ) -> Result<(), TransportError>;

    /// Sendet `payload` auf `topic`
    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError>;
}

/// Transport ohne Verbindung
///
/// Hält den Zyklus am Laufen, solange kein Broker erreichbar ist: jeder
/// Poll und jeder Publish schlägt sofort mit `ConnectionClosed` fehl.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl Transport for Offline {
    async fn poll<H: MessageHandler>(
        &mut self,
        _timeout_ms: u64,
        _handler: &mut H,
    ) -> Result<(), TransportError> {
        Err(TransportError::ConnectionClosed)
    }

    async fn publish(&mut self, _topic: &str, _payload: &[u8]) -> Result<(), TransportError> {
        Err(TransportError::ConnectionClosed)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LedError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LedError::WriteFailed => defmt::write!(fmt, "WriteFailed"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransportError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TransportError::ConnectionClosed => defmt::write!(fmt, "ConnectionClosed"),
            TransportError::Protocol => defmt::write!(fmt, "Protocol"),
            TransportError::PublishFailed => defmt::write!(fmt, "PublishFailed"),
            TransportError::Timeout => defmt::write!(fmt, "Timeout"),
        }
    }
}
