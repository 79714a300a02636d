// Runtime configuration.
//
// The API base URL resolves with priority: explicit override (flag or
// `MGNREGA_API_BASE_URL`) > relative `""` for production builds >
// `http://localhost:9090` for development builds.
use crate::labels::Locale;
use clap::Parser;

pub const DEV_BASE_URL: &str = "http://localhost:9090";
pub const DEFAULT_STATE: &str = "Maharashtra";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Development,
    Production,
}

impl Profile {
    pub fn current() -> Profile {
        if cfg!(debug_assertions) {
            Profile::Development
        } else {
            Profile::Production
        }
    }
}

pub fn resolve_base_url(explicit: Option<&str>, profile: Profile) -> String {
    if let Some(url) = explicit.map(str::trim).filter(|u| !u.is_empty()) {
        return url.trim_end_matches('/').to_string();
    }
    match profile {
        Profile::Production => String::new(),
        Profile::Development => DEV_BASE_URL.to_string(),
    }
}

#[derive(Parser, Debug)]
#[command(name = "mgnrega-report", about = "District employment-scheme performance in the terminal")]
pub struct Cli {
    /// API base URL; overrides the build-profile default.
    #[arg(long, env = "MGNREGA_API_BASE_URL")]
    pub api_base: Option<String>,
    /// State queried for performance and comparisons.
    #[arg(long, env = "MGNREGA_STATE", default_value = DEFAULT_STATE)]
    pub state: String,
    /// Number of months to fetch.
    #[arg(long, default_value_t = 12)]
    pub limit: u32,
    #[arg(long, value_enum, default_value_t = Locale::En)]
    pub lang: Locale,
    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,
    /// Latitude used to suggest a district.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,
    /// Longitude used to suggest a district.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
    /// Reverse-geocoding endpoint.
    #[arg(long, default_value = crate::geo::NOMINATIM_URL)]
    pub geocoder_url: String,
    /// Raise the default log level to debug.
    #[arg(long)]
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base: String,
    pub state: String,
    pub limit: u32,
    pub locale: Locale,
    pub timeout_secs: u64,
    pub position: Option<(f64, f64)>,
    pub geocoder_url: String,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli, profile: Profile) -> AppConfig {
        AppConfig {
            api_base: resolve_base_url(cli.api_base.as_deref(), profile),
            state: cli.state.clone(),
            limit: cli.limit,
            locale: cli.lang,
            timeout_secs: cli.timeout_secs,
            position: cli.lat.zip(cli.lon),
            geocoder_url: cli.geocoder_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn explicit_override_wins() {
        assert_eq!(
            resolve_base_url(Some("https://api.example.org/"), Profile::Development),
            "https://api.example.org"
        );
        assert_eq!(resolve_base_url(Some("https://x"), Profile::Production), "https://x");
    }

    #[test]
    fn profile_defaults() {
        assert_eq!(resolve_base_url(None, Profile::Production), "");
        assert_eq!(resolve_base_url(None, Profile::Development), DEV_BASE_URL);
        assert_eq!(resolve_base_url(Some("  "), Profile::Development), DEV_BASE_URL);
    }

    #[test]
    fn cli_maps_to_config() {
        let cli = Cli::parse_from([
            "mgnrega-report",
            "--api-base",
            "http://127.0.0.1:1",
            "--lang",
            "hi",
            "--lat",
            "18.52",
            "--lon",
            "73.85",
        ]);
        let cfg = AppConfig::from_cli(&cli, Profile::Development);
        assert_eq!(cfg.api_base, "http://127.0.0.1:1");
        assert_eq!(cfg.locale, Locale::Hi);
        assert_eq!(cfg.position, Some((18.52, 73.85)));
        assert_eq!(cfg.limit, 12);
    }
}
