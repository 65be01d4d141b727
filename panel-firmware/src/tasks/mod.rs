// Task-Modul: Enthält alle Embassy Tasks
//
// Der Panel-Task besitzt LEDs, Touch und die MQTT-Verbindung; die WiFi-Tasks
// halten Link und Netzwerk-Stack am Laufen.

pub mod mqtt;
pub mod panel;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use panel::{PanelPeripherals, panel_task};
pub use wifi::{connection_task, dhcp_task, net_task};
