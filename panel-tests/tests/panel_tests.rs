//! Integration Tests für den kooperativen Main-Loop-Zyklus

mod common;

use std::cell::Cell;

use common::{
    BUTTON_ADS, BUTTON_GOLF, FONT_WIDTH, LED_TOPIC, LINES, MISS, MockStrip, OFF, RED,
    RecordingLabel, ScriptedTouch, ScriptedTransport, buttons, inside,
};
use embassy_futures::block_on;
use panel_core::{
    AnimationKind, ButtonPad, CONFIRM_PULSES, CommandError, ControlPanel, CycleReport,
    FRAME_INTERVAL_MS, LedDirective, Offline, PadEvent, PanelConfig, RESTART_AFTER_MS,
    TelemetryBoard, Transport, TransportError,
};

type TestPanel = ControlPanel<'static, MockStrip, MockStrip, ScriptedTouch, 3>;

fn panel_with(config: PanelConfig<'static>, touch: ScriptedTouch) -> TestPanel {
    let board = TelemetryBoard::new(&LINES, FONT_WIDTH).unwrap();
    ControlPanel::new(
        config,
        board,
        ButtonPad::new(buttons()),
        MockStrip::new(12),
        MockStrip::new(1),
        touch,
    )
}

fn panel(touch: ScriptedTouch) -> TestPanel {
    panel_with(PanelConfig::new(LED_TOPIC), touch)
}

fn run<X: Transport>(panel: &mut TestPanel, transport: &mut X, now_ms: u64) -> CycleReport {
    let clock = Cell::new(now_ms);
    block_on(panel.cycle(transport, || clock.get()))
}

#[test]
fn test_restart_after_uptime_limit() {
    let mut panel = panel(ScriptedTouch::new(&[inside(BUTTON_ADS)]));
    let mut transport = ScriptedTransport::new();
    transport.queue(LED_TOPIC, "fill:red");

    let report = run(&mut panel, &mut transport, RESTART_AFTER_MS + 1);
    assert!(report.restart);
    assert_eq!(transport.polls, 0);
    assert_eq!(panel.strip().show_count(), 0);
    assert_eq!(report.pad_event, None);
}

#[test]
fn test_no_restart_at_exact_limit() {
    let mut panel = panel(ScriptedTouch::default());
    let mut transport = ScriptedTransport::new();
    let report = run(&mut panel, &mut transport, RESTART_AFTER_MS);
    assert!(!report.restart);
    assert_eq!(transport.polls, 1);
}

#[test]
fn test_poll_uses_configured_timeout() {
    let mut config = PanelConfig::new(LED_TOPIC);
    config.poll_timeout_ms = 25;
    let mut panel = panel_with(config, ScriptedTouch::default());
    let mut transport = ScriptedTransport::new();
    run(&mut panel, &mut transport, 1_000);
    assert_eq!(transport.last_timeout_ms, Some(25));
}

#[test]
fn test_command_applied_and_rendered_in_same_cycle() {
    let mut panel = panel(ScriptedTouch::default());
    let mut transport = ScriptedTransport::new();
    transport.queue(LED_TOPIC, "FILL:\"red\"");

    let report = run(&mut panel, &mut transport, 1_000);
    assert_eq!(report.messages, 1);
    assert!(report.frame_rendered);
    assert!(matches!(
        report.last_command,
        Some(Ok(LedDirective::Animate {
            kind: AnimationKind::Fill,
            ..
        }))
    ));
    assert!(panel.strip().pixels.iter().all(|p| *p == RED));
    assert_eq!(panel.status().pixels[0], RED);
    assert!(!panel.engine().is_active());
}

#[test]
fn test_frame_gate_across_cycles() {
    let mut panel = panel(ScriptedTouch::default());
    let mut transport = ScriptedTransport::new();
    transport.queue(LED_TOPIC, "chase:blue");

    assert!(run(&mut panel, &mut transport, 1_000).frame_rendered);
    assert!(!run(&mut panel, &mut transport, 1_020).frame_rendered);
    assert!(run(&mut panel, &mut transport, 1_040).frame_rendered);
    assert_eq!(panel.strip().lit_pixel(), Some(1));
}

#[test]
fn test_brightness_command() {
    let mut config = PanelConfig::new(LED_TOPIC);
    config.brightness = 0.2;
    let mut panel = panel_with(config, ScriptedTouch::default());
    let mut transport = ScriptedTransport::new();
    transport.queue(LED_TOPIC, "bright:5");

    let report = run(&mut panel, &mut transport, 1_000);
    assert_eq!(report.last_command, Some(Ok(LedDirective::Brightness(0.5))));
    assert_eq!(panel.engine().brightness(), 0.5);
    assert_eq!(panel.strip().brightness, 0.5);
    assert_eq!(panel.status().brightness, 0.5);
}

#[test]
fn test_invalid_commands_are_noop() {
    let mut panel = panel(ScriptedTouch::default());
    let mut transport = ScriptedTransport::new();
    transport.queue(LED_TOPIC, "sparkle:red");
    transport.queue(LED_TOPIC, "bright:abc");

    let report = run(&mut panel, &mut transport, 1_000);
    assert_eq!(report.last_command, Some(Err(CommandError::UnknownCommand)));
    let report = run(&mut panel, &mut transport, 1_100);
    assert_eq!(report.last_command, Some(Err(CommandError::InvalidBrightness)));

    assert!(!panel.engine().is_active());
    assert_eq!(panel.engine().brightness(), 0.5);
    assert_eq!(panel.strip().show_count(), 0);
}

#[test]
fn test_telemetry_updates_labels() {
    let mut panel = panel(ScriptedTouch::default());
    let mut transport = ScriptedTransport::new();
    transport.queue_batch(&[("pyportal/out_temp", "72"), ("pyportal/unknown", "x")]);

    let report = run(&mut panel, &mut transport, 1_000);
    assert_eq!(report.messages, 2);
    assert_eq!(report.labels_updated, 1);
    assert_eq!(report.last_command, None);
    let label = panel.board().label(0).unwrap();
    assert_eq!(label.text.as_str(), "72°");
    assert_eq!(label.x, 204 - FONT_WIDTH * 3);
}

#[test]
fn test_transport_error_does_not_stop_cycle() {
    let mut panel = panel(ScriptedTouch::new(&[inside(BUTTON_ADS)]));
    let mut transport = ScriptedTransport::new();
    transport.poll_errors.push_back(TransportError::Timeout);

    let report = run(&mut panel, &mut transport, 1_000);
    assert_eq!(report.transport_error, Some(TransportError::Timeout));
    assert_eq!(report.pad_event, Some(PadEvent::Pressed { index: 0, count: 1 }));
    assert_eq!(panel.engine().state().kind, AnimationKind::Chase);
}

#[test]
fn test_double_tap_publishes_once() {
    let touch = ScriptedTouch::new(&[inside(BUTTON_GOLF), None, inside(BUTTON_GOLF), None]);
    let mut panel = panel(touch);
    let mut transport = ScriptedTransport::new();

    let mut now = 1_000;
    for _ in 0..4 {
        run(&mut panel, &mut transport, now);
        now += 50;
    }
    assert_eq!(
        transport.published,
        vec![("pyportal/button_golf".to_string(), b"1".to_vec())]
    );
    // Bestätigungs-Pulse nach dem Loslassen
    assert_eq!(panel.engine().state().kind, AnimationKind::Pulse);
}

#[test]
fn test_miss_between_taps_publishes_nothing() {
    let touch = ScriptedTouch::new(&[inside(BUTTON_GOLF), None, MISS, None, inside(BUTTON_GOLF)]);
    let mut panel = panel(touch);
    let mut transport = ScriptedTransport::new();
    for i in 0..5 {
        run(&mut panel, &mut transport, 1_000 + i * 50);
    }
    assert!(transport.published.is_empty());
}

#[test]
fn test_publish_error_is_reported() {
    let touch = ScriptedTouch::new(&[inside(BUTTON_ADS), None, inside(BUTTON_ADS)]);
    let mut panel = panel(touch);
    let mut transport = ScriptedTransport::new();
    transport.fail_publish = true;

    run(&mut panel, &mut transport, 1_000);
    run(&mut panel, &mut transport, 1_050);
    let report = run(&mut panel, &mut transport, 1_100);
    assert!(matches!(report.pad_event, Some(PadEvent::Triggered { index: 0, .. })));
    assert_eq!(report.publish_error, Some(TransportError::PublishFailed));
    assert!(transport.published.is_empty());
}

#[test]
fn test_topics_led_first() {
    let panel = panel(ScriptedTouch::default());
    let topics: Vec<&str> = panel.topics().collect();
    assert_eq!(
        topics,
        vec![
            LED_TOPIC,
            "pyportal/out_temp",
            "pyportal/out_humid",
            "pyportal/out_status",
            "pyportal/office_co2",
        ]
    );
}

#[test]
fn test_flush_labels_only_dirty() {
    let mut panel = panel(ScriptedTouch::default());
    let mut transport = ScriptedTransport::new();
    let mut labels: [RecordingLabel; 4] = Default::default();

    assert_eq!(panel.flush_labels(&mut labels), 4);
    assert_eq!(labels[3].text, "CO2:");
    assert_eq!(panel.flush_labels(&mut labels), 0);

    transport.queue(LED_TOPIC, "off");
    transport.queue("pyportal/office_co2", "415");
    run(&mut panel, &mut transport, 1_000);
    run(&mut panel, &mut transport, 1_100);
    assert_eq!(panel.flush_labels(&mut labels), 1);
    assert_eq!(labels[3].text, "CO2: 415 ppm");
    assert_eq!(labels[3].position, (172, 110));
    assert_eq!(labels[0].updates, 1);
}

#[test]
fn test_reset_leds() {
    let mut panel = panel(ScriptedTouch::default());
    panel.reset_leds().unwrap();
    assert_eq!(panel.strip().show_count(), 1);
    assert_eq!(panel.status().show_count(), 1);
    assert!(panel.strip().pixels.iter().all(|p| *p == OFF));
    assert_eq!(panel.strip().brightness, 0.5);
}

// ============================================================================
// Tests: Betrieb ohne Broker-Verbindung
// ============================================================================

#[test]
fn test_offline_cycles_keep_rendering() {
    let mut panel = panel(ScriptedTouch::default());
    let mut transport = ScriptedTransport::new();
    transport.queue(LED_TOPIC, "chase:red");
    run(&mut panel, &mut transport, 1_000);

    let mut now = 1_000;
    for _ in 0..5 {
        now += FRAME_INTERVAL_MS;
        let report = run(&mut panel, &mut Offline, now);
        assert_eq!(report.transport_error, Some(TransportError::ConnectionClosed));
        assert!(report.frame_rendered);
        assert!(!report.restart);
    }
    assert_eq!(panel.engine().state().step, 6);
    assert_eq!(panel.strip().lit_pixel(), Some(5));
}

#[test]
fn test_offline_restart_still_fires() {
    let mut panel = panel(ScriptedTouch::default());
    assert!(!run(&mut panel, &mut Offline, RESTART_AFTER_MS).restart);
    assert!(run(&mut panel, &mut Offline, RESTART_AFTER_MS + 1).restart);
}

#[test]
fn test_offline_trigger_reports_publish_error() {
    let touch = ScriptedTouch::new(&[inside(BUTTON_ADS), None, inside(BUTTON_ADS), None]);
    let mut panel = panel(touch);

    run(&mut panel, &mut Offline, 1_000);
    run(&mut panel, &mut Offline, 1_050);
    let report = run(&mut panel, &mut Offline, 1_100);
    assert!(matches!(report.pad_event, Some(PadEvent::Triggered { index: 0, .. })));
    assert_eq!(report.publish_error, Some(TransportError::ConnectionClosed));

    let report = run(&mut panel, &mut Offline, 1_150);
    assert_eq!(report.pad_event, Some(PadEvent::Released { index: 0 }));
    assert_eq!(panel.engine().state().kind, AnimationKind::Pulse);
}

// ============================================================================
// Tests: Ende des Touch-Feedbacks
// ============================================================================

#[test]
fn test_tap_chase_ends_after_release() {
    let touch = ScriptedTouch::new(&[inside(BUTTON_GOLF), None]);
    let mut panel = panel(touch);
    let mut transport = ScriptedTransport::new();

    run(&mut panel, &mut transport, 1_000);
    assert_eq!(panel.engine().state().kind, AnimationKind::Chase);

    let mut now = 1_000;
    for _ in 0..100 {
        now += FRAME_INTERVAL_MS;
        run(&mut panel, &mut transport, now);
    }
    assert!(!panel.engine().is_active());
    assert!(panel.strip().pixels.iter().all(|p| *p == OFF));
}

#[test]
fn test_confirm_pulses_end_and_restore_brightness() {
    let touch = ScriptedTouch::new(&[inside(BUTTON_GOLF), None, inside(BUTTON_GOLF), None]);
    let mut panel = panel(touch);
    let mut transport = ScriptedTransport::new();

    let mut now = 1_000;
    for _ in 0..4 {
        run(&mut panel, &mut transport, now);
        now += FRAME_INTERVAL_MS;
    }
    assert_eq!(panel.engine().state().kind, AnimationKind::Pulse);

    // 50 Frames pro Pulse, danach ein Off-Frame
    for _ in 0..(CONFIRM_PULSES as usize * 50 + 1) {
        run(&mut panel, &mut transport, now);
        now += FRAME_INTERVAL_MS;
    }
    assert!(!panel.engine().is_active());
    assert!(panel.strip().pixels.iter().all(|p| *p == OFF));
    assert_eq!(panel.strip().brightness, 0.5);
    assert_eq!(transport.published.len(), 1);
}
