// WiFi Tasks - Station-Verbindung, Netzwerk-Runner und DHCP-Log
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent};

use crate::config::{WIFI_PASSWORD, WIFI_SSID};

/// Wartezeit nach einem fehlgeschlagenen Versuch
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// WiFi Connection Task
///
/// Startet den Station-Modus, verbindet mit dem Access Point und
/// verbindet nach jedem Disconnect erneut.
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>) {
    info!("WiFi: Starting connection task");

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            if let Err(e) = start_station(&mut controller).await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                Timer::after(RETRY_DELAY).await;
                continue;
            }
            info!("WiFi: Started");
        }

        info!("WiFi: Connecting to '{}'...", WIFI_SSID);
        if let Err(e) = controller.connect_async().await {
            error!("WiFi: Connection failed: {}", Debug2Format(&e));
            Timer::after(RETRY_DELAY).await;
            continue;
        }
        info!("WiFi: Connected");

        controller.wait_for_event(WifiEvent::StaDisconnected).await;
        warn!("WiFi: Disconnected from AP, will retry...");
        Timer::after(Duration::from_secs(2)).await;
    }
}

async fn start_station(
    controller: &mut WifiController<'static>,
) -> Result<(), esp_radio::wifi::WifiError> {
    let client_config = ModeConfig::Client(
        ClientConfig::default()
            .with_ssid(WIFI_SSID.into())
            .with_password(WIFI_PASSWORD.into()),
    );
    controller.set_config(&client_config)?;
    controller.start_async().await
}

/// Network Task
///
/// Prozessiert die Pakete des embassy-net Stacks.
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// DHCP Monitor Task
///
/// Loggt die Netzwerk-Konfiguration, sobald eine Adresse vergeben wurde.
#[embassy_executor::task]
pub async fn dhcp_task(stack: &'static Stack<'static>) {
    stack.wait_config_up().await;

    if let Some(config) = stack.config_v4() {
        info!("WiFi: Got IP address!");
        info!("  IP:      {}", Debug2Format(&config.address.address()));
        info!("  Gateway: {}", Debug2Format(&config.gateway));
        info!("  DNS:     {}", Debug2Format(&config.dns_servers));
    }
}
