use std::time::Duration;
use tracing::Level;

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

/// Startup settings, read from `K_LEGISIGHT_*` variables.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub supabase: Option<SupabaseConfig>,
    pub api_base: Option<String>,
    pub request_timeout: Duration,
    pub log_level: Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase: None,
            api_base: None,
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            log_level: Level::INFO,
        }
    }
}

// A wasm bundle has no environment, so values are baked in at build time.
fn build_time(key: &str) -> Option<&'static str> {
    match key {
        "K_LEGISIGHT_SUPABASE_URL" => option_env!("K_LEGISIGHT_SUPABASE_URL"),
        "K_LEGISIGHT_SUPABASE_ANON_KEY" => option_env!("K_LEGISIGHT_SUPABASE_ANON_KEY"),
        "K_LEGISIGHT_API_BASE" => option_env!("K_LEGISIGHT_API_BASE"),
        "K_LEGISIGHT_TIMEOUT_MS" => option_env!("K_LEGISIGHT_TIMEOUT_MS"),
        "K_LEGISIGHT_LOG" => option_env!("K_LEGISIGHT_LOG"),
        _ => None,
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| {
            #[cfg(not(target_arch = "wasm32"))]
            if let Ok(value) = std::env::var(key) {
                return Some(value);
            }
            build_time(key).map(str::to_string)
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let supabase = match (get("K_LEGISIGHT_SUPABASE_URL"), get("K_LEGISIGHT_SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => Some(SupabaseConfig { url, anon_key }),
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!("Supabase needs both URL and anon key, using local accounts");
                None
            }
            (None, None) => None,
        };

        let request_timeout = match get("K_LEGISIGHT_TIMEOUT_MS").map(|v| v.parse::<u64>()) {
            Some(Ok(ms)) if ms > 0 => Duration::from_millis(ms),
            Some(_) => {
                tracing::warn!("Invalid K_LEGISIGHT_TIMEOUT_MS, using {}ms", DEFAULT_TIMEOUT_MS);
                defaults.request_timeout
            }
            None => defaults.request_timeout,
        };

        let log_level = match get("K_LEGISIGHT_LOG").map(|v| v.parse::<Level>()) {
            Some(Ok(level)) => level,
            Some(Err(_)) => {
                tracing::warn!("Invalid K_LEGISIGHT_LOG, using info");
                defaults.log_level
            }
            None => defaults.log_level,
        };

        Self { supabase, api_base: get("K_LEGISIGHT_API_BASE"), request_timeout, log_level }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]), AppConfig::default());
    }

    #[test]
    fn test_full_config() {
        let cfg = config(&[
            ("K_LEGISIGHT_SUPABASE_URL", "https://abc.supabase.co"),
            ("K_LEGISIGHT_SUPABASE_ANON_KEY", "anon"),
            ("K_LEGISIGHT_API_BASE", "http://localhost:8000"),
            ("K_LEGISIGHT_TIMEOUT_MS", "2500"),
            ("K_LEGISIGHT_LOG", "debug"),
        ]);
        assert_eq!(
            cfg.supabase,
            Some(SupabaseConfig { url: "https://abc.supabase.co".into(), anon_key: "anon".into() })
        );
        assert_eq!(cfg.api_base.as_deref(), Some("http://localhost:8000"));
        assert_eq!(cfg.request_timeout, Duration::from_millis(2500));
        assert_eq!(cfg.log_level, Level::DEBUG);
    }

    #[test]
    fn test_half_supabase_config_is_ignored() {
        let cfg = config(&[("K_LEGISIGHT_SUPABASE_URL", "https://abc.supabase.co")]);
        assert_eq!(cfg.supabase, None);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let cfg = config(&[
            ("K_LEGISIGHT_TIMEOUT_MS", "soon"),
            ("K_LEGISIGHT_LOG", "loud"),
            ("K_LEGISIGHT_API_BASE", "   "),
        ]);
        assert_eq!(cfg, AppConfig::default());

        let cfg = config(&[("K_LEGISIGHT_TIMEOUT_MS", "0")]);
        assert_eq!(cfg.request_timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }
}
