// Bildschirm-Layout: Buttons links, Telemetrie-Zeilen rechts
//
// 320x240 Querformat, Spleen 8x16 Font.

use panel_core::colors::from_hex;
use panel_core::{Alignment, ButtonInfo, DisplayLine, Rect};

use crate::config::{FONT_HEIGHT, FONT_WIDTH, SCREEN_WIDTH};

pub const BUTTON_WIDTH: i32 = 80;
pub const BUTTON_HEIGHT: i32 = 70;
pub const BUTTON_MARGIN: i32 = 8;

/// Linker Rand der Textspalte
pub const TEXT_X: i32 = BUTTON_WIDTH + 2 * BUTTON_MARGIN;

/// Mitte der Textspalte
pub const TEXT_X_MID: i32 = (SCREEN_WIDTH - TEXT_X) / 2 + TEXT_X;

const LINE_MARGIN: i32 = 7;

/// Baseline der n-ten Zeile
pub const fn line_y(line: i32) -> i32 {
    line * (FONT_HEIGHT + LINE_MARGIN) - line
}

const HALF_GLYPH: i32 = FONT_WIDTH / 2;

/// Links eingerückte Messwerte unter den Temperaturen
const VALUE_X: i32 = TEXT_X_MID - HALF_GLYPH - 4 * FONT_WIDTH;

pub const LINE_COUNT: usize = 13;

pub static LINES: [DisplayLine; LINE_COUNT] = [
    DisplayLine::new(
        "",
        "pyportal/out_temp",
        "{}°",
        Alignment::Right,
        (TEXT_X_MID - HALF_GLYPH, line_y(1)),
    ),
    DisplayLine::new(
        "",
        "pyportal/out_humid",
        "{}%",
        Alignment::Left,
        (TEXT_X_MID + HALF_GLYPH, line_y(1)),
    ),
    DisplayLine::new(
        "",
        "pyportal/out_status",
        "{}",
        Alignment::Center,
        (TEXT_X_MID, line_y(2)),
    ),
    DisplayLine::new(
        "",
        "pyportal/office_temp",
        "{}°",
        Alignment::Right,
        (TEXT_X_MID - HALF_GLYPH, line_y(4)),
    ),
    DisplayLine::new(
        "",
        "pyportal/office_humid",
        "{}%",
        Alignment::Left,
        (TEXT_X_MID + HALF_GLYPH, line_y(4)),
    ),
    DisplayLine::new(
        "CO2:",
        "pyportal/office_co2",
        "CO2: {} ppm",
        Alignment::Left,
        (VALUE_X, line_y(5)),
    ),
    DisplayLine::new(
        "VOC:",
        "pyportal/office_voc",
        "VOC: {} ppb",
        Alignment::Left,
        (VALUE_X, line_y(6)),
    ),
    DisplayLine::new(
        "AQI:",
        "pyportal/office_aqi",
        "AQI: {}",
        Alignment::Left,
        (VALUE_X, line_y(7)),
    ),
    // Reine Überschrift ohne Topic
    DisplayLine::new(
        "Particulate Matter (µg/m³)",
        "",
        "",
        Alignment::Left,
        (TEXT_X_MID - HALF_GLYPH - 13 * FONT_WIDTH, line_y(8)),
    ),
    DisplayLine::new(
        "< 1µm:",
        "pyportal/office_pm_1",
        "< 1µm: {}",
        Alignment::Left,
        (TEXT_X, line_y(9)),
    ),
    DisplayLine::new(
        "< 2.5µm:",
        "pyportal/office_pm_2_5",
        "< 2.5µm: {}",
        Alignment::Left,
        (TEXT_X_MID - FONT_WIDTH, line_y(9)),
    ),
    DisplayLine::new(
        "< 4µm:",
        "pyportal/office_pm_4",
        "< 4µm: {}",
        Alignment::Left,
        (TEXT_X, line_y(10)),
    ),
    DisplayLine::new(
        "< 10µm:",
        "pyportal/office_pm_10",
        "< 10µm: {}",
        Alignment::Left,
        (TEXT_X_MID, line_y(10)),
    ),
];

pub const BUTTON_COUNT: usize = 3;

const fn button_rect(row: i32) -> Rect {
    Rect::new(
        BUTTON_MARGIN,
        BUTTON_MARGIN * (row + 1) + BUTTON_HEIGHT * row,
        BUTTON_WIDTH,
        BUTTON_HEIGHT,
    )
}

/// Button-Tabelle mit Publish-Topics und LED-Feedback-Farben
pub const fn buttons() -> [ButtonInfo; BUTTON_COUNT] {
    [
        ButtonInfo::new(
            "Ads",
            button_rect(0),
            from_hex(0xDC143C),
            "pyportal/button_ads",
            "red",
        ),
        ButtonInfo::new(
            "Golf",
            button_rect(1),
            from_hex(0x008000),
            "pyportal/button_golf",
            "green",
        ),
        ButtonInfo::new(
            "Gym",
            button_rect(2),
            from_hex(0x187BCD),
            "pyportal/button_gym",
            "blue",
        ),
    ]
}
