//! Main-Loop Zyklus
//!
//! Ein Zyklus in fester Reihenfolge:
//! 1. Neustart-Prüfung (Uptime-Obergrenze)
//! 2. Transport pollen, Nachrichten anwenden (Fehler werden geschluckt)
//! 3. Animations-Frame rendern
//! 4. Touch samplen und Buttons auswerten, ggf. publishen
//!
//! Alle Mutationen laufen seriell im einzigen Kontroll-Thread.

use crate::animation::{AnimationEngine, DEFAULT_BRIGHTNESS};
use crate::buttons::{ButtonPad, PRESS_PAYLOAD, PadEvent};
use crate::telemetry::TelemetryBoard;
use crate::traits::{
    LedError, LedStrip, MessageHandler, TextLabel, TouchSurface, Transport, TransportError,
};
use crate::types::{CommandError, LedDirective};

/// Nach dieser Uptime wird ein harter Neustart angefordert (1 Stunde)
pub const RESTART_AFTER_MS: u64 = 3_600_000;

/// Standard-Timeout für den Transport-Poll
pub const POLL_TIMEOUT_MS: u64 = 10;

/// Panel-Konfiguration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelConfig<'a> {
    /// Topic für LED-Kommandos
    pub led_topic: &'a str,
    pub brightness: f32,
    pub poll_timeout_ms: u64,
}

impl<'a> PanelConfig<'a> {
    pub const fn new(led_topic: &'a str) -> Self {
        Self {
            led_topic,
            brightness: DEFAULT_BRIGHTNESS,
            poll_timeout_ms: POLL_TIMEOUT_MS,
        }
    }
}

/// Ergebnis eines Zyklus
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CycleReport {
    /// Uptime-Obergrenze erreicht; sonst wurde nichts ausgeführt
    pub restart: bool,
    pub messages: usize,
    pub labels_updated: usize,
    /// Ergebnis des letzten Kommandos auf dem LED-Topic
    pub last_command: Option<Result<LedDirective, CommandError>>,
    pub frame_rendered: bool,
    pub pad_event: Option<PadEvent>,
    pub transport_error: Option<TransportError>,
    pub publish_error: Option<TransportError>,
    pub led_error: Option<LedError>,
}

pub struct ControlPanel<'a, S, P, T, const N: usize> {
    led_topic: &'a str,
    poll_timeout_ms: u64,
    engine: AnimationEngine,
    board: TelemetryBoard<'a>,
    pad: ButtonPad<N>,
    strip: S,
    status: P,
    touch: T,
    report: CycleReport,
}

impl<'a, S, P, T, const N: usize> ControlPanel<'a, S, P, T, N>
where
    S: LedStrip,
    P: LedStrip,
    T: TouchSurface,
{
    pub fn new(
        config: PanelConfig<'a>,
        board: TelemetryBoard<'a>,
        pad: ButtonPad<N>,
        strip: S,
        status: P,
        touch: T,
    ) -> Self {
        Self {
            led_topic: config.led_topic,
            poll_timeout_ms: config.poll_timeout_ms,
            engine: AnimationEngine::new(config.brightness),
            board,
            pad,
            strip,
            status,
            touch,
            report: CycleReport::default(),
        }
    }

    pub fn engine(&self) -> &AnimationEngine {
        &self.engine
    }

    pub fn board(&self) -> &TelemetryBoard<'a> {
        &self.board
    }

    pub fn pad(&self) -> &ButtonPad<N> {
        &self.pad
    }

    pub fn strip(&self) -> &S {
        &self.strip
    }

    pub fn status(&self) -> &P {
        &self.status
    }

    /// Alle Topics, die abonniert werden müssen (LED-Topic zuerst)
    pub fn topics(&self) -> impl Iterator<Item = &'a str> + 'a {
        core::iter::once(self.led_topic).chain(self.board.topics())
    }

    /// Bringt die LEDs in einen definierten Startzustand (aus, Grund-Helligkeit)
    pub fn reset_leds(&mut self) -> Result<(), LedError> {
        let off = crate::colors::OFF.rgb;
        self.strip.fill(off);
        self.status.fill(off);
        let level = self.engine.brightness();
        self.engine.set_brightness(level, &mut self.strip, &mut self.status)
    }

    /// Überträgt geänderte Labels auf die Anzeige
    pub fn flush_labels<L: TextLabel>(&mut self, targets: &mut [L]) -> usize {
        self.board.flush(targets)
    }

    /// Führt einen kooperativen Zyklus aus
    ///
    /// `clock` liefert die monotone Zeit in ms; sie wird vor dem Poll und
    /// erneut vor dem Rendern gelesen, da der Poll bis zum Timeout warten kann.
    /// Ohne Broker-Verbindung läuft der Zyklus mit `Offline` weiter: Frames,
    /// Touch und Neustart-Prüfung bleiben aktiv.
    pub async fn cycle<X, C>(&mut self, transport: &mut X, clock: C) -> CycleReport
    where
        X: Transport,
        C: Fn() -> u64,
    {
        self.report = CycleReport::default();

        if clock() > RESTART_AFTER_MS {
            self.report.restart = true;
            return self.report;
        }

        let timeout = self.poll_timeout_ms;
        if let Err(e) = transport.poll(timeout, self).await {
            self.report.transport_error = Some(e);
        }

        match self.engine.tick(clock(), &mut self.strip, &mut self.status) {
            Ok(rendered) => self.report.frame_rendered = rendered,
            Err(e) => self.report.led_error = Some(e),
        }

        let touch = self.touch.current_touch();
        if let Some(event) = self.pad.poll(touch, &mut self.engine) {
            self.report.pad_event = Some(event);
            if let PadEvent::Triggered { topic, .. } = event {
                if let Err(e) = transport.publish(topic, PRESS_PAYLOAD).await {
                    self.report.publish_error = Some(e);
                }
            }
        }

        self.report
    }

    fn apply_command(&mut self, payload: &str) {
        let result = LedDirective::parse(payload);
        match result {
            Ok(LedDirective::Animate {
                kind,
                color,
                direction,
            }) => self.engine.start(kind, color, direction),
            Ok(LedDirective::Brightness(level)) => {
                if let Err(e) = self
                    .engine
                    .set_brightness(level, &mut self.strip, &mut self.status)
                {
                    self.report.led_error = Some(e);
                }
            }
            // Unbekannte oder ungültige Kommandos sind ein No-Op
            Err(_) => {}
        }
        self.report.last_command = Some(result);
    }
}

impl<'a, S, P, T, const N: usize> MessageHandler for ControlPanel<'a, S, P, T, N>
where
    S: LedStrip,
    P: LedStrip,
    T: TouchSurface,
{
    /// LED-Topic und Telemetrie schließen sich nicht gegenseitig aus
    fn on_message(&mut self, topic: &str, payload: &str) {
        self.report.messages += 1;
        if topic == self.led_topic {
            self.apply_command(payload);
        }
        self.report.labels_updated += self.board.on_message(topic, payload);
    }
}
