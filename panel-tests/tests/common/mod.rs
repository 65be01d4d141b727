//! Gemeinsame Mocks für die Integration Tests
//!
//! Jede Capability-Schnittstelle aus panel-core hat hier eine
//! In-Memory-Implementierung, die ihre Aufrufe protokolliert.

#![allow(dead_code)] // Jede Test-Datei nutzt nur einen Teil der Mocks

use std::collections::VecDeque;

use panel_core::{
    Alignment, ButtonInfo, DisplayLine, LedError, LedStrip, MessageHandler, Rect, TextLabel,
    TouchSurface, Transport, TransportError,
};
use rgb::RGB8;

pub const OFF: RGB8 = RGB8 { r: 0, g: 0, b: 0 };
pub const WHITE: RGB8 = RGB8 { r: 255, g: 255, b: 255 };
pub const RED: RGB8 = RGB8 { r: 255, g: 0, b: 0 };
pub const GREEN: RGB8 = RGB8 { r: 0, g: 255, b: 0 };
pub const BLUE: RGB8 = RGB8 { r: 0, g: 0, b: 255 };

pub const FONT_WIDTH: i32 = 8;
pub const LED_TOPIC: &str = "pyportal/leds";

// ============================================================================
// Mock LED Strip
// ============================================================================

pub struct MockStrip {
    pub pixels: Vec<RGB8>,
    pub brightness: f32,
    /// Jeder `show()` Aufruf speichert den Frame
    pub frames: Vec<Vec<RGB8>>,
    /// Helligkeit zum Zeitpunkt jedes Frames
    pub frame_brightness: Vec<f32>,
    pub fail_next_show: bool,
}

impl MockStrip {
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![OFF; len],
            brightness: 0.5,
            frames: Vec::new(),
            frame_brightness: Vec::new(),
            fail_next_show: false,
        }
    }

    /// Index des einzigen leuchtenden Pixels im letzten Frame
    pub fn lit_pixel(&self) -> Option<usize> {
        let frame = self.frames.last()?;
        let lit: Vec<usize> = frame
            .iter()
            .enumerate()
            .filter(|(_, c)| **c != OFF)
            .map(|(i, _)| i)
            .collect();
        match lit.as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }

    pub fn show_count(&self) -> usize {
        self.frames.len()
    }
}

impl LedStrip for MockStrip {
    fn set_pixel(&mut self, index: usize, color: RGB8) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    fn fill(&mut self, color: RGB8) {
        self.pixels.iter_mut().for_each(|p| *p = color);
    }

    fn set_brightness(&mut self, level: f32) {
        self.brightness = level;
    }

    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn show(&mut self) -> Result<(), LedError> {
        if self.fail_next_show {
            self.fail_next_show = false;
            return Err(LedError::WriteFailed);
        }
        self.frames.push(self.pixels.clone());
        self.frame_brightness.push(self.brightness);
        Ok(())
    }
}

// ============================================================================
// Mock Touch Surface
// ============================================================================

/// Liefert vorbereitete Samples, danach `None`
#[derive(Default)]
pub struct ScriptedTouch {
    pub samples: VecDeque<Option<(i32, i32)>>,
}

impl ScriptedTouch {
    pub fn new(samples: &[Option<(i32, i32)>]) -> Self {
        Self {
            samples: samples.iter().copied().collect(),
        }
    }

    pub fn push(&mut self, sample: Option<(i32, i32)>) {
        self.samples.push_back(sample);
    }
}

impl TouchSurface for ScriptedTouch {
    fn current_touch(&mut self) -> Option<(i32, i32)> {
        self.samples.pop_front().flatten()
    }
}

// ============================================================================
// Mock Transport
// ============================================================================

/// Jeder Poll liefert den nächsten Batch aus `inbound`
#[derive(Default)]
pub struct ScriptedTransport {
    pub inbound: VecDeque<Vec<(String, String)>>,
    pub published: Vec<(String, Vec<u8>)>,
    pub poll_errors: VecDeque<TransportError>,
    pub fail_publish: bool,
    pub polls: usize,
    pub last_timeout_ms: Option<u64>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&mut self, topic: &str, payload: &str) {
        self.inbound
            .push_back(vec![(topic.to_string(), payload.to_string())]);
    }

    pub fn queue_batch(&mut self, batch: &[(&str, &str)]) {
        self.inbound.push_back(
            batch
                .iter()
                .map(|(t, p)| (t.to_string(), p.to_string()))
                .collect(),
        );
    }
}

impl Transport for ScriptedTransport {
    async fn poll<H: MessageHandler>(
        &mut self,
        timeout_ms: u64,
        handler: &mut H,
    ) -> Result<(), TransportError> {
        self.polls += 1;
        self.last_timeout_ms = Some(timeout_ms);
        if let Some(e) = self.poll_errors.pop_front() {
            return Err(e);
        }
        if let Some(batch) = self.inbound.pop_front() {
            for (topic, payload) in batch {
                handler.on_message(&topic, &payload);
            }
        }
        Ok(())
    }

    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        if self.fail_publish {
            return Err(TransportError::PublishFailed);
        }
        self.published.push((topic.to_string(), payload.to_vec()));
        Ok(())
    }
}

// ============================================================================
// Mock Label
// ============================================================================

#[derive(Default, Debug, Clone)]
pub struct RecordingLabel {
    pub text: String,
    pub position: (i32, i32),
    pub updates: usize,
}

impl TextLabel for RecordingLabel {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.updates += 1;
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }
}

// ============================================================================
// Layout Fixtures
// ============================================================================

pub const LINES: [DisplayLine; 4] = [
    DisplayLine::new("", "pyportal/out_temp", "{}°", Alignment::Right, (204, 22)),
    DisplayLine::new("", "pyportal/out_humid", "{}%", Alignment::Left, (212, 22)),
    DisplayLine::new("", "pyportal/out_status", "{}", Alignment::Center, (208, 44)),
    DisplayLine::new("CO2:", "pyportal/office_co2", "CO2: {} ppm", Alignment::Left, (172, 110)),
];

pub const BUTTON_ADS: Rect = Rect::new(8, 8, 80, 70);
pub const BUTTON_GOLF: Rect = Rect::new(8, 86, 80, 70);
pub const BUTTON_GYM: Rect = Rect::new(8, 164, 80, 70);

pub fn buttons() -> [ButtonInfo; 3] {
    [
        ButtonInfo::new("Ads", BUTTON_ADS, RED, "pyportal/button_ads", "red"),
        ButtonInfo::new("Golf", BUTTON_GOLF, GREEN, "pyportal/button_golf", "green"),
        ButtonInfo::new("Gym", BUTTON_GYM, BLUE, "pyportal/button_gym", "blue"),
    ]
}

/// Punkt innerhalb eines Buttons
pub fn inside(rect: Rect) -> Option<(i32, i32)> {
    Some((rect.x + rect.width / 2, rect.y + rect.height / 2))
}

/// Punkt außerhalb aller Buttons (Telemetrie-Bereich)
pub const MISS: Option<(i32, i32)> = Some((250, 120));
