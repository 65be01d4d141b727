//! Keep-Alive Buchführung für den Transport
//!
//! Rein zeitbasiert (ms), ohne Netzwerkzugriff. Der Transport fragt vor
//! jedem Poll `check` und sendet bei `SendPing` nur den Ping. Die Antwort
//! kommt über denselben Empfangsweg wie alle Nachrichten und wird mit
//! `on_pong` gemeldet.

/// Was der Transport vor dem Poll tun muss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepAliveAction {
    Idle,
    SendPing,
    /// Ping seit einem vollen Intervall unbeantwortet
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAlive {
    interval_ms: u64,
    last_sent: u64,
    ping_sent: Option<u64>,
}

impl KeepAlive {
    /// `interval_ms` ist das mit dem Broker vereinbarte Keep-Alive;
    /// gepingt wird nach der Hälfte ohne eigenes Paket
    pub const fn new(interval_ms: u64, now_ms: u64) -> Self {
        Self {
            interval_ms,
            last_sent: now_ms,
            ping_sent: None,
        }
    }

    pub fn check(&self, now_ms: u64) -> KeepAliveAction {
        match self.ping_sent {
            Some(sent) if now_ms.saturating_sub(sent) > self.interval_ms => {
                KeepAliveAction::Expired
            }
            Some(_) => KeepAliveAction::Idle,
            None if now_ms.saturating_sub(self.last_sent) >= self.interval_ms / 2 => {
                KeepAliveAction::SendPing
            }
            None => KeepAliveAction::Idle,
        }
    }

    /// Nach jedem gesendeten Paket
    pub fn on_sent(&mut self, now_ms: u64) {
        self.last_sent = now_ms;
    }

    pub fn on_ping_sent(&mut self, now_ms: u64) {
        self.last_sent = now_ms;
        self.ping_sent = Some(now_ms);
    }

    pub fn on_pong(&mut self) {
        self.ping_sent = None;
    }

    /// Ping gesendet, Antwort steht aus
    pub fn is_waiting(&self) -> bool {
        self.ping_sent.is_some()
    }
}
