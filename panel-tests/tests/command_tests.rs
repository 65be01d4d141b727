//! Integration Tests für den LED-Kommando-Parser

use panel_core::colors;
use panel_core::{AnimationKind, CommandError, Direction, LedDirective};

fn animate(raw: &str) -> (AnimationKind, &'static str, Direction) {
    match LedDirective::parse(raw) {
        Ok(LedDirective::Animate {
            kind,
            color,
            direction,
        }) => (kind, color.name, direction),
        other => panic!("expected Animate for {raw:?}, got {other:?}"),
    }
}

#[test]
fn test_parse_is_case_insensitive() {
    assert_eq!(LedDirective::parse("CHASE:Red"), LedDirective::parse("chase:red"));
    assert_eq!(
        animate("CHASE:Red"),
        (AnimationKind::Chase, "red", Direction::Forward)
    );
}

#[test]
fn test_parse_strips_quotes_and_whitespace() {
    assert_eq!(
        animate("  \"fill:blue\"  "),
        (AnimationKind::Fill, "blue", Direction::Forward)
    );
    assert_eq!(
        animate("pulse : green"),
        (AnimationKind::Pulse, "green", Direction::Forward)
    );
}

#[test]
fn test_option_defaults_to_white() {
    assert_eq!(animate("bounce"), (AnimationKind::Bounce, "white", Direction::Forward));
    assert_eq!(animate("chase:"), (AnimationKind::Chase, "white", Direction::Forward));
}

#[test]
fn test_unknown_color_falls_back_to_white() {
    match LedDirective::parse("fill:puce").unwrap() {
        LedDirective::Animate { color, .. } => assert_eq!(color.rgb, colors::WHITE.rgb),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_chaseleft_is_reverse_chase() {
    assert_eq!(
        animate("chaseleft:amber"),
        (AnimationKind::Chase, "amber", Direction::Reverse)
    );
}

#[test]
fn test_off_and_rainbow_ignore_option() {
    assert_eq!(animate("off:red"), (AnimationKind::Off, "off", Direction::Forward));
    assert_eq!(animate("rainbow:red").0, AnimationKind::Rainbow);
}

#[test]
fn test_empty_inputs_are_no_ops() {
    assert_eq!(LedDirective::parse(""), Err(CommandError::Empty));
    assert_eq!(LedDirective::parse(":"), Err(CommandError::Empty));
    assert_eq!(LedDirective::parse("\"\""), Err(CommandError::Empty));
    assert_eq!(LedDirective::parse("   "), Err(CommandError::Empty));
}

#[test]
fn test_unknown_command_is_dropped() {
    assert_eq!(LedDirective::parse("sparkle:red"), Err(CommandError::UnknownCommand));
}

#[test]
fn test_bright_scales() {
    assert_eq!(LedDirective::parse("bright:5"), Ok(LedDirective::Brightness(0.5)));
    assert_eq!(LedDirective::parse("BRIGHT:0.25"), Ok(LedDirective::Brightness(0.25)));
    assert_eq!(LedDirective::parse("bright:0"), Ok(LedDirective::Brightness(0.0)));
}

#[test]
fn test_bright_invalid_values() {
    for raw in ["bright", "bright:high", "bright:12", "bright:-3", "bright:inf"] {
        assert_eq!(
            LedDirective::parse(raw),
            Err(CommandError::InvalidBrightness),
            "{raw}"
        );
    }
}

#[test]
fn test_try_from_matches_parse() {
    use core::convert::TryFrom;
    assert_eq!(LedDirective::try_from("fill:red"), LedDirective::parse("fill:red"));
    assert!(LedDirective::try_from("nope").is_err());
}

#[test]
fn test_every_table_color_is_accepted() {
    for color in colors::COLORS {
        let raw = format!("fill:{}", color.name.to_uppercase());
        assert_eq!(animate(&raw).1, color.name);
    }
}
