// FT6x06 kapazitiver Touch-Controller (I2C)
//
// Implementiert `TouchSurface` aus panel-core. Gelesen wird pro Poll ein
// Block ab Register TD_STATUS; Lesefehler zählen als "kein Kontakt".

use defmt::{debug, warn};
use esp_hal::Blocking;
use esp_hal::i2c::master::I2c;
use panel_core::TouchSurface;

use crate::config::{
    SCREEN_HEIGHT, SCREEN_WIDTH, TOUCH_I2C_ADDR, TOUCH_INVERT_X, TOUCH_INVERT_Y, TOUCH_SWAP_XY,
};

/// Register mit Anzahl aktiver Touchpunkte
const REG_TD_STATUS: u8 = 0x02;

/// Event-Flag "Lift Up" in P1_XH (Bits 7:6)
const EVENT_LIFT_UP: u8 = 0b01;

/// Fehler werden nur jedes n-te Mal geloggt
const ERROR_LOG_INTERVAL: u32 = 100;

pub struct Ft6x06Touch<'a> {
    i2c: I2c<'a, Blocking>,
    err_count: u32,
    touching: bool,
}

impl<'a> Ft6x06Touch<'a> {
    pub fn new(i2c: I2c<'a, Blocking>) -> Self {
        Self {
            i2c,
            err_count: 0,
            touching: false,
        }
    }

    /// Rohe Controller-Koordinaten (Portrait), `None` ohne Kontakt
    fn read_raw(&mut self) -> Option<(i32, i32)> {
        // TD_STATUS, P1_XH, P1_XL, P1_YH, P1_YL
        let mut data = [0u8; 5];
        if self
            .i2c
            .write_read(TOUCH_I2C_ADDR, &[REG_TD_STATUS], &mut data)
            .is_err()
        {
            if self.err_count % ERROR_LOG_INTERVAL == 0 {
                warn!("Touch: I2C read failed ({} errors)", self.err_count + 1);
            }
            self.err_count = self.err_count.wrapping_add(1);
            return None;
        }

        let points = data[0] & 0x0F;
        if points == 0 || points > 2 {
            return None;
        }
        if data[1] >> 6 == EVENT_LIFT_UP {
            return None;
        }

        let x = (((data[1] & 0x0F) as i32) << 8) | data[2] as i32;
        let y = (((data[3] & 0x0F) as i32) << 8) | data[4] as i32;
        Some((x, y))
    }
}

/// Dreht Controller-Koordinaten in Bildschirm-Koordinaten
fn map_point((raw_x, raw_y): (i32, i32)) -> (i32, i32) {
    let (mut x, mut y) = if TOUCH_SWAP_XY {
        (raw_y, raw_x)
    } else {
        (raw_x, raw_y)
    };
    if TOUCH_INVERT_X {
        x = SCREEN_WIDTH - 1 - x;
    }
    if TOUCH_INVERT_Y {
        y = SCREEN_HEIGHT - 1 - y;
    }
    (x, y)
}

impl<'a> TouchSurface for Ft6x06Touch<'a> {
    fn current_touch(&mut self) -> Option<(i32, i32)> {
        let point = self.read_raw().map(map_point);
        match (self.touching, point) {
            (false, Some((x, y))) => debug!("Touch: down at ({}, {})", x, y),
            (true, None) => debug!("Touch: up"),
            _ => {}
        }
        self.touching = point.is_some();
        point
    }
}
