use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{invalid_input_error, Error};

#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub google_maps_api_base: String,
    pub google_maps_api_key: String,
    /// ISO 3166-1 country that address suggestions are restricted to.
    pub places_country: String,
    pub brevo_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub business: Business,
    pub provider_timeout: Duration,
    pub session_ttl: Duration,
}

/// Who bookings are sent to.
#[derive(Clone, Debug)]
pub struct Business {
    pub name: String,
    pub email: String,
    pub whatsapp_number: String,
    pub city: String,
}

impl Default for Business {
    fn default() -> Self {
        Self {
            name: "Trustyyellowcabs".into(),
            email: "trustyyellowcabs@gmail.com".into(),
            whatsapp_number: "918870088020".into(),
            city: "Coimbatore".into(),
        }
    }
}

impl Config {
    /// Reads the environment, after loading `.env` if one exists.
    /// Only the maps key is required; email and chat degrade without theirs.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let defaults = Business::default();

        let listen_addr = optional_var("LISTEN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:3000".into())
            .parse()
            .map_err(|_| invalid_input_error())?;

        Ok(Self {
            listen_addr,
            google_maps_api_base: optional_var("GOOGLE_MAPS_API_BASE")
                .unwrap_or_else(|| "maps.googleapis.com".into()),
            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY")?,
            places_country: optional_var("PLACES_COUNTRY").unwrap_or_else(|| "in".into()),
            brevo_api_key: optional_var("BREVO_API_KEY"),
            gemini_api_key: optional_var("GEMINI_API_KEY"),
            gemini_model: optional_var("GEMINI_MODEL")
                .unwrap_or_else(|| "gemini-3-flash-preview".into()),
            business: Business {
                name: optional_var("BUSINESS_NAME").unwrap_or(defaults.name),
                email: optional_var("BUSINESS_EMAIL").unwrap_or(defaults.email),
                whatsapp_number: optional_var("BUSINESS_WHATSAPP")
                    .unwrap_or(defaults.whatsapp_number),
                city: optional_var("BUSINESS_CITY").unwrap_or(defaults.city),
            },
            provider_timeout: Duration::from_secs(numeric_var("PROVIDER_TIMEOUT_SECS", 10)?),
            session_ttl: Duration::from_secs(numeric_var("SESSION_TTL_MINUTES", 30)? * 60),
        })
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            google_maps_api_base: "maps.example.test".into(),
            google_maps_api_key: "test-maps-key".into(),
            places_country: "in".into(),
            brevo_api_key: None,
            gemini_api_key: None,
            gemini_model: "test-model".into(),
            business: Business::default(),
            provider_timeout: Duration::from_secs(1),
            session_ttl: Duration::from_secs(30 * 60),
        }
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn numeric_var(name: &str, default: u64) -> Result<u64, Error> {
    match optional_var(name) {
        Some(value) => value.trim().parse().map_err(|_| {
            tracing::error!("{} must be a whole number, got {:?}", name, value);
            invalid_input_error()
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables are process-wide, so everything touching them lives in one test.
    #[test]
    fn reads_environment() {
        env::remove_var("GOOGLE_MAPS_API_KEY");
        assert!(Config::from_env().is_err());

        env::set_var("GOOGLE_MAPS_API_KEY", "maps-key");
        env::set_var("BREVO_API_KEY", "  ");
        env::set_var("SESSION_TTL_MINUTES", "5");
        let config = Config::from_env().unwrap();
        assert_eq!(config.google_maps_api_key, "maps-key");
        assert_eq!(config.brevo_api_key, None);
        assert_eq!(config.session_ttl, Duration::from_secs(300));
        assert_eq!(config.places_country, "in");

        env::set_var("SESSION_TTL_MINUTES", "soon");
        assert!(Config::from_env().is_err());

        env::remove_var("SESSION_TTL_MINUTES");
        env::remove_var("BREVO_API_KEY");
        env::remove_var("GOOGLE_MAPS_API_KEY");
    }
}
