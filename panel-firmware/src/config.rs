// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
//
// Pins und Peripherals selbst werden in main.rs vergeben, hier stehen
// nur die Werte, die sich ohne Verdrahtungsänderung anpassen lassen.

// ============================================================================
// LED Konfiguration
// ============================================================================

/// Anzahl der LEDs im Strip
pub const LED_COUNT: usize = 12;

/// Status-Pixel auf dem Board (GPIO8)
pub const STATUS_LED_COUNT: usize = 1;

/// Grund-Helligkeit nach dem Start (0.0 - 1.0)
pub const LED_BRIGHTNESS: f32 = 0.5;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

// ============================================================================
// Touch Konfiguration
// ============================================================================

/// I2C-Adresse des FT6x06 Touch-Controllers
pub const TOUCH_I2C_ADDR: u8 = 0x38;

/// I2C-Takt in kHz
pub const TOUCH_I2C_KHZ: u32 = 400;

/// Controller liefert Portrait-Koordinaten; das Panel läuft im Querformat
pub const TOUCH_SWAP_XY: bool = true;

/// Achse nach dem Tauschen spiegeln
pub const TOUCH_INVERT_X: bool = false;
pub const TOUCH_INVERT_Y: bool = true;

// ============================================================================
// Display Konfiguration
// ============================================================================

pub const SCREEN_WIDTH: i32 = 320;
pub const SCREEN_HEIGHT: i32 = 240;

/// Bitmap-Font 8x16 (Spleen)
pub const FONT_WIDTH: i32 = 8;
pub const FONT_HEIGHT: i32 = 16;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file"
);

/// Heap-Größe für WiFi (Bytes)
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// MQTT Konfiguration
// ============================================================================

/// MQTT Broker Hostname oder IP-Adresse
pub const MQTT_BROKER: &str = env!(
    "MQTT_BROKER",
    "MQTT Broker nicht gesetzt! Erstelle .env file"
);

/// MQTT Broker Port
pub const MQTT_PORT: u16 = 1883;

/// MQTT Client ID
pub const MQTT_CLIENT_ID: &str = env!(
    "MQTT_CLIENT_ID",
    "MQTT Client ID nicht gesetzt! Erstelle .env file"
);

/// Broker-Login, leer = anonym
pub const MQTT_USERNAME: &str = env!("MQTT_USERNAME");
pub const MQTT_PASSWORD: &str = env!("MQTT_PASSWORD");

/// Topic für LED-Kommandos
pub const MQTT_TOPIC_LEDS: &str = "pyportal/leds";

/// Keep-Alive in Sekunden; gepingt wird nach der Hälfte
pub const MQTT_KEEP_ALIVE_SECS: u16 = 60;

/// MQTT Reconnect Delay in Sekunden (das Panel läuft währenddessen offline)
pub const MQTT_RECONNECT_DELAY_SECS: u64 = 5;

/// Aufeinanderfolgende Poll-Fehler bis zum Reconnect
pub const MQTT_MAX_POLL_ERRORS: u8 = 3;

/// Maximale Anzahl abonnierter Topics (LED-Topic + Telemetrie)
pub const MQTT_MAX_SUBSCRIPTIONS: usize = 16;

/// Maximale Nachrichten pro Poll
pub const MQTT_MAX_MESSAGES_PER_POLL: usize = 8;

/// MQTT Buffer-Größe in Bytes
pub const MQTT_BUFFER_SIZE: usize = 1024;

/// TCP Buffer-Größe (RX und TX) in Bytes
pub const TCP_BUFFER_SIZE: usize = 4096;

/// TCP Socket Timeout in Sekunden
pub const TCP_TIMEOUT_SECS: u64 = 10;

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 10;
