//! Panel Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, die Animations-Engine, die Telemetrie-Anzeige,
//! die Button-Zustandsmaschine und den kooperativen Main-Loop-Zyklus.

#![no_std]

pub mod animation;
pub mod buttons;
pub mod colors;
pub mod keepalive;
pub mod logic;
pub mod panel;
pub mod telemetry;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use animation::{AnimationEngine, AnimationState, CONFIRM_PULSES, FRAME_INTERVAL_MS};
pub use buttons::{ButtonInfo, ButtonPad, ButtonState, PadEvent, Rect, TRIGGER_THRESHOLD};
pub use colors::Color;
pub use keepalive::{KeepAlive, KeepAliveAction};
pub use panel::{ControlPanel, CycleReport, PanelConfig, RESTART_AFTER_MS};
pub use telemetry::{Alignment, DisplayLine, LabelState, TelemetryBoard};
pub use traits::{
    LedError, LedStrip, MessageHandler, Offline, TextLabel, TouchSurface, Transport,
    TransportError,
};
pub use types::{AnimationKind, CommandError, Direction, LedDirective};
