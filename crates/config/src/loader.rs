use std::path::PathBuf;

use {secrecy::Secret, tracing::debug};

use crate::{
    Error, Result,
    schema::{DaylogConfig, ScheduleConfig, ServerConfig, TransportMode},
};

pub const TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const WEBHOOK_URL_VAR: &str = "WEBHOOK_URL";
pub const MODE_VAR: &str = "DAYLOG_MODE";
pub const BIND_VAR: &str = "BIND";
pub const PORT_VAR: &str = "PORT";
pub const SEND_HOUR_VAR: &str = "SEND_HOUR";
pub const SEND_MINUTE_VAR: &str = "SEND_MINUTE";
pub const DATA_FILE_VAR: &str = "DAYLOG_DATA_FILE";

const DEFAULT_DATA_FILE: &str = "messages.json";

/// Load configuration from the process environment.
pub fn load_from_env() -> Result<DaylogConfig> {
    load_with(|name| std::env::var(name).ok())
}

/// Load configuration using a custom variable lookup.
///
/// This is the implementation behind [`load_from_env`]; taking the lookup
/// as a parameter keeps it testable without touching the real environment.
/// Blank values count as unset.
pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<DaylogConfig> {
    let get = |name: &str| {
        lookup(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let token = get(TOKEN_VAR).ok_or(Error::missing(
        TOKEN_VAR,
        "Set it to the bot token issued by @BotFather.",
    ))?;

    let webhook_url = get(WEBHOOK_URL_VAR);
    let transport = match get(MODE_VAR).as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => match webhook_url {
            Some(url) => webhook_mode(&url)?,
            None => TransportMode::Polling,
        },
        Some("polling") => TransportMode::Polling,
        Some("webhook") => {
            let url = webhook_url.ok_or(Error::missing(
                WEBHOOK_URL_VAR,
                "Webhook mode needs the public base URL the platform can reach.",
            ))?;
            webhook_mode(&url)?
        },
        Some(other) => {
            return Err(Error::invalid(
                MODE_VAR,
                other,
                "expected \"polling\" or \"webhook\"",
            ));
        },
    };

    let defaults = ServerConfig::default();
    let server = ServerConfig {
        bind: get(BIND_VAR).unwrap_or(defaults.bind),
        port: match get(PORT_VAR) {
            Some(raw) => parse_number(PORT_VAR, &raw, 1, u16::MAX.into())? as u16,
            None => defaults.port,
        },
    };

    let defaults = ScheduleConfig::default();
    let schedule = ScheduleConfig {
        hour: match get(SEND_HOUR_VAR) {
            Some(raw) => parse_number(SEND_HOUR_VAR, &raw, 0, 23)?,
            None => defaults.hour,
        },
        minute: match get(SEND_MINUTE_VAR) {
            Some(raw) => parse_number(SEND_MINUTE_VAR, &raw, 0, 59)?,
            None => defaults.minute,
        },
    };

    let data_file = PathBuf::from(get(DATA_FILE_VAR).unwrap_or_else(|| DEFAULT_DATA_FILE.into()));

    let config = DaylogConfig {
        token: Secret::new(token),
        transport,
        server,
        schedule,
        data_file,
    };
    debug!(?config, "configuration loaded");
    Ok(config)
}

fn webhook_mode(url: &str) -> Result<TransportMode> {
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(Error::invalid(
            WEBHOOK_URL_VAR,
            url,
            "must start with https:// or http://",
        ));
    }
    Ok(TransportMode::Webhook {
        public_url: url.trim_end_matches('/').to_string(),
    })
}

fn parse_number(name: &'static str, raw: &str, min: u32, max: u32) -> Result<u32> {
    let value: u32 = raw
        .parse()
        .map_err(|e| Error::invalid(name, raw, format!("{e}")))?;
    if !(min..=max).contains(&value) {
        return Err(Error::invalid(
            name,
            raw,
            format!("must be between {min} and {max}"),
        ));
    }
    Ok(value)
}
