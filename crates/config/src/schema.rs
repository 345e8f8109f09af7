use std::path::PathBuf;

use secrecy::Secret;

/// How platform updates reach the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportMode {
    /// Long-poll `getUpdates`; no inbound port needed.
    Polling,
    /// Platform POSTs updates to `<public_url>/webhook/<token>`.
    Webhook { public_url: String },
}

/// HTTP listener settings (webhook mode and health checks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "0.0.0.0".
    pub bind: String,
    /// Port to listen on. Defaults to 8080.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

/// Daily digest time, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub hour: u32,
    pub minute: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            hour: 18,
            minute: 0,
        }
    }
}

/// Fully resolved process configuration.
#[derive(Clone)]
pub struct DaylogConfig {
    /// Bot token from @BotFather.
    pub token: Secret<String>,
    pub transport: TransportMode,
    pub server: ServerConfig,
    pub schedule: ScheduleConfig,
    /// Path of the JSON message store.
    pub data_file: PathBuf,
}

impl std::fmt::Debug for DaylogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaylogConfig")
            .field("token", &"[REDACTED]")
            .field("transport", &self.transport)
            .field("server", &self.server)
            .field("schedule", &self.schedule)
            .field("data_file", &self.data_file)
            .finish()
    }
}
