// Panel Task - Kooperativer Main-Loop für LEDs, Touch und Telemetrie
use defmt::{debug, error, info, warn};
use embassy_futures::select::{Either, select};
use embassy_futures::yield_now;
use embassy_net::Stack;
use embassy_time::{Duration, Instant, Timer};
use esp_hal::Blocking;
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::rmt::Rmt;
use esp_hal::time::Rate;
use esp_hal_smartled::{SmartLedsAdapter, smart_led_buffer};
use heapless::Vec;

use panel_core::panel::POLL_TIMEOUT_MS;
use panel_core::{
    ButtonPad, CommandError, ControlPanel, CycleReport, LedStrip, Offline, PadEvent,
    PanelConfig, TelemetryBoard, TouchSurface,
};

use crate::config::*;
use crate::hal::{Ft6x06Touch, LogLabel, RmtLedStrip};
use crate::layout::{LINE_COUNT, LINES, buttons};
use crate::tasks::mqtt::{MqttBuffers, MqttTransport, wait_for_network};

/// Peripherals, die der Panel-Task exklusiv besitzt
pub struct PanelPeripherals {
    pub rmt: esp_hal::peripherals::RMT<'static>,
    /// On-Board Status-Pixel
    pub status_pin: esp_hal::peripherals::GPIO8<'static>,
    /// Datenleitung des LED-Strips
    pub strip_pin: esp_hal::peripherals::GPIO4<'static>,
    pub i2c: esp_hal::peripherals::I2C0<'static>,
    pub sda: esp_hal::peripherals::GPIO6<'static>,
    pub scl: esp_hal::peripherals::GPIO7<'static>,
}

/// Panel Task
///
/// Initialisiert LEDs, Touch und Labels und führt dann den Panel-Zyklus aus.
/// Solange keine Broker-Verbindung besteht (Start, Reconnect), läuft der
/// Zyklus offline weiter: Animationen, Touch und der stündliche Neustart
/// bleiben aktiv. Nach einem Reconnect wird neu abonniert.
#[embassy_executor::task]
pub async fn panel_task(stack: &'static Stack<'static>, peripherals: PanelPeripherals) {
    info!("Panel: Task started");

    let rmt: Rmt<'_, Blocking> =
        Rmt::new(peripherals.rmt, Rate::from_mhz(RMT_CLOCK_MHZ)).expect("RMT init failed");

    let mut status_buffer = smart_led_buffer!(STATUS_LED_COUNT);
    let mut strip_buffer = smart_led_buffer!(LED_COUNT);
    let status: RmtLedStrip<'_, STATUS_LED_COUNT, _> = RmtLedStrip::new(
        SmartLedsAdapter::new(rmt.channel0, peripherals.status_pin, &mut status_buffer),
        LED_BRIGHTNESS,
    );
    let strip: RmtLedStrip<'_, LED_COUNT, _> = RmtLedStrip::new(
        SmartLedsAdapter::new(rmt.channel1, peripherals.strip_pin, &mut strip_buffer),
        LED_BRIGHTNESS,
    );

    let i2c = I2c::new(
        peripherals.i2c,
        I2cConfig::default().with_frequency(Rate::from_khz(TOUCH_I2C_KHZ)),
    )
    .expect("I2C init failed")
    .with_sda(peripherals.sda)
    .with_scl(peripherals.scl);
    let touch = Ft6x06Touch::new(i2c);

    let board = TelemetryBoard::new(&LINES, FONT_WIDTH).expect("Layout exceeds label capacity");
    let mut config = PanelConfig::new(MQTT_TOPIC_LEDS);
    config.brightness = LED_BRIGHTNESS;
    let mut panel = ControlPanel::new(
        config,
        board,
        ButtonPad::new(buttons()),
        strip,
        status,
        touch,
    );

    if let Err(e) = panel.reset_leds() {
        warn!("LED: Initial reset failed: {}", e);
    }
    for button in panel.pad().buttons() {
        info!("Panel: Button '{}' -> '{}'", button.label, button.topic);
    }
    let mut labels: [LogLabel; LINE_COUNT] = core::array::from_fn(LogLabel::new);
    panel.flush_labels(&mut labels);

    let mut topics: Vec<&'static str, MQTT_MAX_SUBSCRIPTIONS> = Vec::new();
    for topic in panel.topics() {
        if topics.push(topic).is_err() {
            warn!("MQTT: Too many topics, '{}' not subscribed", topic);
        }
    }

    info!("Panel: Waiting for network...");
    if let Either::Second(never) = select(
        wait_for_network(*stack),
        run_offline(&mut panel, &mut labels),
    )
    .await
    {
        match never {}
    }
    info!("Panel: Network ready");

    let mut buffers = MqttBuffers::new();
    loop {
        let mut socket = None;
        let connected = select(
            MqttTransport::connect(*stack, &mut buffers, &mut socket, &topics),
            run_offline(&mut panel, &mut labels),
        )
        .await;
        match connected {
            Either::First(Ok(mut transport)) => {
                run_cycles(&mut panel, &mut transport, &mut labels).await
            }
            Either::First(Err(e)) => error!("MQTT: {}", e),
            Either::Second(never) => match never {},
        }

        info!("MQTT: Reconnecting in {}s...", MQTT_RECONNECT_DELAY_SECS);
        if let Either::Second(never) = select(
            Timer::after(Duration::from_secs(MQTT_RECONNECT_DELAY_SECS)),
            run_offline(&mut panel, &mut labels),
        )
        .await
        {
            match never {}
        }
    }
}

/// Führt Zyklen aus, bis die Verbindung als verloren gilt
async fn run_cycles<S, P, T, const N: usize>(
    panel: &mut ControlPanel<'static, S, P, T, N>,
    transport: &mut MqttTransport<'_, '_>,
    labels: &mut [LogLabel],
) where
    S: LedStrip,
    P: LedStrip,
    T: TouchSurface,
{
    let mut poll_errors: u8 = 0;
    loop {
        let report = panel.cycle(transport, || Instant::now().as_millis()).await;
        finish_cycle(panel, &report, labels);

        match report.transport_error {
            Some(e) => {
                poll_errors += 1;
                warn!("MQTT: Poll failed: {} ({}/{})", e, poll_errors, MQTT_MAX_POLL_ERRORS);
                if poll_errors >= MQTT_MAX_POLL_ERRORS {
                    error!("MQTT: Connection lost");
                    return;
                }
            }
            None => poll_errors = 0,
        }

        // Netzwerk-Stack zum Zug kommen lassen, falls der Poll sofort zurückkam
        yield_now().await;
    }
}

/// Zyklen ohne Broker-Verbindung
///
/// Endet nie; der umgebende `select` bricht sie ab, sobald Netzwerk oder
/// Verbindung bereit sind. Abgebrochen wird nur am Timer zwischen zwei
/// Zyklen, da `Offline` sofort zurückkehrt.
async fn run_offline<S, P, T, const N: usize>(
    panel: &mut ControlPanel<'static, S, P, T, N>,
    labels: &mut [LogLabel],
) -> !
where
    S: LedStrip,
    P: LedStrip,
    T: TouchSurface,
{
    loop {
        let report = panel.cycle(&mut Offline, || Instant::now().as_millis()).await;
        finish_cycle(panel, &report, labels);
        // Ersetzt die Wartezeit des Polls
        Timer::after(Duration::from_millis(POLL_TIMEOUT_MS)).await;
    }
}

/// Neustart bei Uptime-Obergrenze, sonst Report loggen und Labels übertragen
fn finish_cycle<S, P, T, const N: usize>(
    panel: &mut ControlPanel<'static, S, P, T, N>,
    report: &CycleReport,
    labels: &mut [LogLabel],
) where
    S: LedStrip,
    P: LedStrip,
    T: TouchSurface,
{
    if report.restart {
        warn!("Panel: Uptime limit reached, restarting");
        esp_hal::system::software_reset();
    }
    log_report(report);
    panel.flush_labels(labels);
}

fn log_report(report: &CycleReport) {
    match report.last_command {
        Some(Ok(directive)) => info!("LED: {}", directive),
        Some(Err(CommandError::InvalidBrightness)) => warn!("LED: Invalid bright value"),
        Some(Err(e)) => debug!("LED: Ignored command ({})", e),
        None => {}
    }

    if let Some(e) = report.led_error {
        warn!("LED: Write failed: {}", e);
    }

    match report.pad_event {
        Some(PadEvent::Pressed { index, count }) => {
            info!("Panel: Button {} selected (press {})", index, count)
        }
        Some(PadEvent::Triggered { topic, .. }) => match report.publish_error {
            Some(e) => warn!("MQTT: Publish to '{}' failed: {}", topic, e),
            None => info!("MQTT: Published '1' to '{}'", topic),
        },
        Some(PadEvent::Released { index }) => debug!("Panel: Button {} released", index),
        Some(PadEvent::Held { .. }) | None => {}
    }
}
