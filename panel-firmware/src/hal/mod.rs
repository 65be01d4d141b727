// Hardware Abstraction Layer (HAL) Module
//
// Implementiert die Capability-Traits aus panel-core auf dem ESP32-C6.

pub mod label;
pub mod led_strip;
pub mod touch;

pub use label::LogLabel;
pub use led_strip::RmtLedStrip;
pub use touch::Ft6x06Touch;
