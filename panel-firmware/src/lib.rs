// Library-Root: Firmware-Module für das Control Panel
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod layout;
pub mod tasks;

// ============================================================================
// Testing-Strategie
// ============================================================================
//
// Diese Crate kompiliert nur für riscv32imac-unknown-none-elf (esp-hal,
// embassy-net, esp-radio). Die komplette Panel-Logik liegt deshalb in
// panel-core und wird in panel-tests gegen Mocks getestet:
//
// - LedStrip    → MockStrip        (RmtLedStrip auf Hardware)
// - TouchSurface → ScriptedTouch   (Ft6x06Touch auf Hardware)
// - Transport   → ScriptedTransport (MqttTransport auf Hardware,
//                 Offline ohne Broker-Verbindung)
// - TextLabel   → RecordingLabel   (LogLabel auf Hardware)
//
// Hier bleibt nur Hardware-Glue, der auf dem Board verifiziert wird.
