// MQTT Transport - Subscriptions und Publishes für das Panel
use core::cell::RefCell;

use defmt::{Debug2Format, info, warn};
use embassy_net::tcp::{self, TcpSocket};
use embassy_net::{IpAddress, Stack, dns::DnsQueryType};
use embassy_time::{Duration, Instant, Timer, with_timeout};
use embedded_io_async::{ErrorType, Read, Write};

use panel_core::{KeepAlive, KeepAliveAction, MessageHandler, Transport, TransportError};
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::client::raw_client::{Event, RawMqttClient};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::packet::v5::reason_codes::ReasonCode;
use rust_mqtt::utils::rng_generator::CountingRng;
use rust_mqtt::utils::types::EncodedString;

use crate::config::*;

/// Maximale Anzahl MQTT v5 Properties pro Paket
const MAX_PROPERTIES: usize = 5;

const KEEP_ALIVE_MS: u64 = MQTT_KEEP_ALIVE_SECS as u64 * 1000;

/// Speicher für eine Broker-Verbindung
///
/// Lebt im Panel-Task und wird bei jedem Reconnect neu ausgeliehen.
pub struct MqttBuffers {
    rx: [u8; TCP_BUFFER_SIZE],
    tx: [u8; TCP_BUFFER_SIZE],
    send: [u8; MQTT_BUFFER_SIZE],
    recv: [u8; MQTT_BUFFER_SIZE],
}

impl MqttBuffers {
    pub const fn new() -> Self {
        Self {
            rx: [0; TCP_BUFFER_SIZE],
            tx: [0; TCP_BUFFER_SIZE],
            send: [0; MQTT_BUFFER_SIZE],
            recv: [0; MQTT_BUFFER_SIZE],
        }
    }
}

impl Default for MqttBuffers {
    fn default() -> Self {
        Self::new()
    }
}

/// Platz für den Socket einer Verbindung, gehört dem Aufrufer von `connect`
pub type SocketSlot<'a> = Option<RefCell<TcpSocket<'a>>>;

/// Socket-Zugriff für den MQTT Client
///
/// Client und `poll` teilen sich den Socket: `poll` wartet selbst auf
/// Lesbarkeit und ruft den Client erst auf, wenn Daten anliegen. Beide
/// laufen im Panel-Task, die Borrows überlappen nie.
struct SharedSocket<'s, 'a>(&'s RefCell<TcpSocket<'a>>);

impl ErrorType for SharedSocket<'_, '_> {
    type Error = tcp::Error;
}

#[allow(clippy::await_holding_refcell_ref)]
impl Read for SharedSocket<'_, '_> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.0.borrow_mut().read(buf).await
    }
}

#[allow(clippy::await_holding_refcell_ref)]
impl Write for SharedSocket<'_, '_> {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.0.borrow_mut().write(buf).await
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().flush().await
    }
}

/// Verbundener MQTT Client, implementiert `Transport` für das Panel
///
/// `'a` ist die Lebensdauer der Puffer, `'s` die des Sockets im `SocketSlot`.
pub struct MqttTransport<'s, 'a> {
    client: RawMqttClient<'s, SharedSocket<'s, 'a>, MAX_PROPERTIES, CountingRng>,
    socket: &'s RefCell<TcpSocket<'a>>,
    keep_alive: KeepAlive,
}

impl<'s, 'a: 's> MqttTransport<'s, 'a> {
    /// Verbindet mit dem Broker und abonniert `topics`
    ///
    /// 1. DNS-Auflösung des Broker-Hostnames
    /// 2. TCP-Verbindung aufbauen
    /// 3. MQTT CONNECT (optional mit Login), auf CONNACK warten
    /// 4. SUBSCRIBE senden; SUBACK und retained Nachrichten kommen über `poll`
    pub async fn connect(
        stack: Stack<'a>,
        buffers: &'a mut MqttBuffers,
        slot: &'s mut SocketSlot<'a>,
        topics: &[&str],
    ) -> Result<Self, MqttError> {
        info!("MQTT: Resolving '{}'...", MQTT_BROKER);
        let broker_ip = resolve_hostname(stack, MQTT_BROKER).await?;
        info!("MQTT: Resolved to {}", Debug2Format(&broker_ip));

        let MqttBuffers { rx, tx, send, recv } = buffers;
        let mut socket = TcpSocket::new(stack, rx, tx);
        socket.set_timeout(Some(Duration::from_secs(TCP_TIMEOUT_SECS)));
        socket
            .connect((broker_ip, MQTT_PORT))
            .await
            .map_err(|_| MqttError::ConnectionFailed)?;
        info!("MQTT: TCP connected");
        let socket: &'s RefCell<TcpSocket<'a>> = slot.insert(RefCell::new(socket));

        let mut config = ClientConfig::<MAX_PROPERTIES, _>::new(
            MqttVersion::MQTTv5,
            CountingRng(20000),
        );
        config.client_id = EncodedString {
            string: MQTT_CLIENT_ID,
            len: MQTT_CLIENT_ID.len() as u16,
        };
        config.keep_alive = MQTT_KEEP_ALIVE_SECS;
        config.max_packet_size = MQTT_BUFFER_SIZE as u32;
        if !MQTT_USERNAME.is_empty() {
            config.add_username(MQTT_USERNAME);
            config.add_password(MQTT_PASSWORD);
        }

        let mut client = RawMqttClient::<_, MAX_PROPERTIES, _>::new(
            SharedSocket(socket),
            send,
            MQTT_BUFFER_SIZE,
            recv,
            MQTT_BUFFER_SIZE,
            config,
        );
        client
            .connect_to_broker()
            .await
            .map_err(|_| MqttError::ProtocolError)?;
        match client.poll::<MQTT_MAX_SUBSCRIPTIONS>().await {
            Ok(Event::Connack) => {}
            _ => return Err(MqttError::ProtocolError),
        }
        info!("MQTT: Connected to broker as '{}'", MQTT_CLIENT_ID);

        let mut transport = Self {
            client,
            socket,
            keep_alive: KeepAlive::new(KEEP_ALIVE_MS, Instant::now().as_millis()),
        };
        transport.subscribe(topics).await?;
        Ok(transport)
    }

    /// Sendet ein SUBSCRIBE für alle Topics
    async fn subscribe(&mut self, topics: &[&str]) -> Result<(), MqttError> {
        let mut list: heapless08::Vec<&str, MQTT_MAX_SUBSCRIPTIONS> = heapless08::Vec::new();
        for topic in topics {
            list.push(*topic).map_err(|_| MqttError::SubscribeFailed)?;
        }
        self.client
            .subscribe_to_topics(&list)
            .await
            .map_err(|_| MqttError::SubscribeFailed)?;
        self.keep_alive.on_sent(Instant::now().as_millis());
        info!("MQTT: Subscribing to {} topics", list.len());
        Ok(())
    }

    /// Pingt den Broker nach der halben Keep-Alive-Zeit ohne eigenes Paket
    ///
    /// Es wird nur gesendet; PINGRESP kommt wie jedes andere Paket über
    /// `poll`, eingehende PUBLISH gehen dabei nicht verloren.
    async fn ping_if_due(&mut self) -> Result<(), TransportError> {
        let now = Instant::now().as_millis();
        match self.keep_alive.check(now) {
            KeepAliveAction::Idle => Ok(()),
            KeepAliveAction::Expired => {
                warn!("MQTT: No PINGRESP within {}s", MQTT_KEEP_ALIVE_SECS);
                Err(TransportError::Timeout)
            }
            KeepAliveAction::SendPing => {
                self.client.send_ping().await.map_err(transport_error)?;
                self.keep_alive.on_ping_sent(now);
                Ok(())
            }
        }
    }

    /// Wartet, bis der Socket Daten hat (oder geschlossen wurde)
    #[allow(clippy::await_holding_refcell_ref)]
    async fn readable(&self) {
        self.socket.borrow().wait_read_ready().await
    }
}

impl Transport for MqttTransport<'_, '_> {
    /// Liefert alle Nachrichten, die innerhalb von `timeout_ms` eintreffen
    ///
    /// Der Timeout bricht nur das Warten auf Daten ab. Ein begonnenes Paket
    /// wird immer vollständig gelesen.
    async fn poll<H: MessageHandler>(
        &mut self,
        timeout_ms: u64,
        handler: &mut H,
    ) -> Result<(), TransportError> {
        self.ping_if_due().await?;

        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        for _ in 0..MQTT_MAX_MESSAGES_PER_POLL {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if with_timeout(remaining, self.readable()).await.is_err() {
                return Ok(());
            }
            match self
                .client
                .poll::<MQTT_MAX_SUBSCRIPTIONS>()
                .await
                .map_err(transport_error)?
            {
                Event::Message(topic, payload) => match core::str::from_utf8(payload) {
                    Ok(text) => handler.on_message(topic, text),
                    Err(_) => warn!("MQTT: Dropping non-UTF-8 payload on '{}'", topic),
                },
                Event::Pingresp => self.keep_alive.on_pong(),
                Event::Suback(_) => info!("MQTT: Subscriptions confirmed"),
                Event::Disconnect(code) => {
                    warn!("MQTT: Broker disconnected ({})", Debug2Format(&code));
                    return Err(TransportError::ConnectionClosed);
                }
                _ => {}
            }
        }
        Ok(())
    }

    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        self.client
            .send_message(topic, payload, QualityOfService::QoS0, false)
            .await
            .map_err(|code| match code {
                ReasonCode::NetworkError => TransportError::ConnectionClosed,
                _ => TransportError::PublishFailed,
            })?;
        self.keep_alive.on_sent(Instant::now().as_millis());
        Ok(())
    }
}

fn transport_error(code: ReasonCode) -> TransportError {
    match code {
        ReasonCode::NetworkError => TransportError::ConnectionClosed,
        _ => TransportError::Protocol,
    }
}

/// Wartet bis Netzwerk-Verbindung verfügbar ist
///
/// Prüft kontinuierlich Link-Status und DHCP-Konfiguration.
pub async fn wait_for_network(stack: Stack<'_>) {
    while !(stack.is_link_up() && stack.config_v4().is_some()) {
        Timer::after(Duration::from_millis(500)).await;
    }
}

/// Löst Hostname zu IPv4-Adresse auf
async fn resolve_hostname(
    stack: Stack<'_>,
    hostname: &str,
) -> Result<embassy_net::Ipv4Address, MqttError> {
    let result = with_timeout(
        Duration::from_secs(DNS_TIMEOUT_SECS),
        stack.dns_query(hostname, DnsQueryType::A),
    )
    .await;

    match result {
        Ok(Ok(addrs)) => addrs
            .iter()
            .find_map(|addr| match addr {
                IpAddress::Ipv4(ipv4) => Some(*ipv4),
                #[allow(unreachable_patterns)]
                _ => None,
            })
            .ok_or(MqttError::DnsResolutionFailed),
        Ok(Err(_)) => Err(MqttError::DnsResolutionFailed),
        Err(_) => Err(MqttError::DnsTimeout),
    }
}

/// Fehler beim Verbindungsaufbau
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MqttError {
    DnsResolutionFailed,
    DnsTimeout,
    ConnectionFailed,
    ProtocolError,
    SubscribeFailed,
}

impl defmt::Format for MqttError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MqttError::DnsResolutionFailed => defmt::write!(fmt, "DNS failed"),
            MqttError::DnsTimeout => defmt::write!(fmt, "DNS timeout"),
            MqttError::ConnectionFailed => defmt::write!(fmt, "Connection failed"),
            MqttError::ProtocolError => defmt::write!(fmt, "Protocol error"),
            MqttError::SubscribeFailed => defmt::write!(fmt, "Subscribe failed"),
        }
    }
}
