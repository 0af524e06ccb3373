use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_JOIN_WINDOW_SECONDS: u32 = 300;
pub const DEFAULT_CONFERENCING_BASE_URL: &str = "https://meet.jit.si";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub join_window_seconds: u32,
    pub auto_start_at_scheduled_time: bool,
    pub conferencing_base_url: String,
    pub gate_tick_interval_seconds: u64,
    pub server_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            join_window_seconds: DEFAULT_JOIN_WINDOW_SECONDS,
            auto_start_at_scheduled_time: true,
            conferencing_base_url: DEFAULT_CONFERENCING_BASE_URL.to_string(),
            gate_tick_interval_seconds: 1,
            server_port: 3000,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            join_window_seconds: parse_var("JOIN_WINDOW_SECONDS", defaults.join_window_seconds),
            auto_start_at_scheduled_time: parse_var(
                "AUTO_START_AT_SCHEDULED_TIME",
                defaults.auto_start_at_scheduled_time,
            ),
            conferencing_base_url: env::var("CONFERENCING_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("CONFERENCING_BASE_URL not set, using default");
                    defaults.conferencing_base_url.clone()
                }),
            gate_tick_interval_seconds: parse_var(
                "GATE_TICK_INTERVAL_SECONDS",
                defaults.gate_tick_interval_seconds,
            ),
            server_port: parse_var("SERVER_PORT", defaults.server_port),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - check conferencing and tick settings");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.conferencing_base_url.trim().is_empty() && self.gate_tick_interval_seconds > 0
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", name, raw, default);
            default
        }),
        Err(_) => {
            warn!("{} not set, using default {}", name, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_usable() {
        let config = AppConfig::default();
        assert!(config.is_configured());
        assert_eq!(config.join_window_seconds, 300);
        assert!(config.auto_start_at_scheduled_time);
    }

    #[test]
    fn zero_tick_interval_is_not_configured() {
        let config = AppConfig {
            gate_tick_interval_seconds: 0,
            ..AppConfig::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn parse_var_falls_back_on_missing_value() {
        assert_eq!(parse_var("CONSULTATION_TEST_SURELY_UNSET_VAR", 42u32), 42);
    }
}
