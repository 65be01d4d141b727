// Label-Oberfläche über defmt
//
// Ohne Font-Rendering werden Label-Änderungen als Log-Zeilen ausgegeben.

use defmt::{debug, info};
use heapless::String;
use panel_core::TextLabel;
use panel_core::telemetry::LABEL_CAPACITY;

pub struct LogLabel {
    line: usize,
    text: String<LABEL_CAPACITY>,
    position: (i32, i32),
}

impl LogLabel {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            text: String::new(),
            position: (0, 0),
        }
    }
}

impl TextLabel for LogLabel {
    fn set_text(&mut self, text: &str) {
        self.text.clear();
        for c in text.chars() {
            if self.text.push(c).is_err() {
                break;
            }
        }
        info!("Panel: line {} = '{}'", self.line, self.text.as_str());
    }

    fn set_position(&mut self, x: i32, y: i32) {
        if self.position != (x, y) {
            self.position = (x, y);
            debug!("Panel: line {} at ({}, {})", self.line, x, y);
        }
    }
}
