// Best-effort district preselection from a position.
//
// The geocoder is an outside service. Any failure here just means no
// suggestion; it never reaches the user as an error.
use crate::types::District;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/reverse";

#[derive(Debug, Default, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<Address>,
}

#[derive(Debug, Default, Deserialize)]
struct Address {
    county: Option<String>,
    state_district: Option<String>,
    district: Option<String>,
}

/// First loaded district whose name appears, case-insensitively, inside the
/// geocoded place name.
pub fn match_district<'a>(place: &str, districts: &'a [District]) -> Option<&'a District> {
    let place = place.to_lowercase();
    if place.is_empty() {
        return None;
    }
    districts.iter().find(|d| !d.name.is_empty() && place.contains(&d.name.to_lowercase()))
}

#[derive(Clone)]
pub struct Geocoder {
    http: Client,
    url: String,
}

impl Geocoder {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, url: url.to_string() })
    }

    /// County, then state district, then district of the reverse lookup.
    pub async fn place_name(&self, lat: f64, lon: f64) -> Result<Option<String>, reqwest::Error> {
        let (lat, lon) = (lat.to_string(), lon.to_string());
        let resp: ReverseResponse = self
            .http
            .get(&self.url)
            .header("Accept", "application/json")
            .query(&[("format", "jsonv2"), ("lat", lat.as_str()), ("lon", lon.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let addr = resp.address.unwrap_or_default();
        Ok(addr
            .county
            .or(addr.state_district)
            .or(addr.district)
            .filter(|s| !s.is_empty()))
    }
}

/// Look the position up in the background. The handle resolves to the
/// geocoded place name, or `None` on any failure; abort it to cancel.
pub fn spawn_lookup(geocoder: Geocoder, lat: f64, lon: f64) -> JoinHandle<Option<String>> {
    tokio::spawn(async move {
        match geocoder.place_name(lat, lon).await {
            Ok(place) => {
                debug!(?place, "reverse geocoding finished");
                place
            }
            Err(e) => {
                debug!(error = %e, "reverse geocoding failed");
                None
            }
        }
    })
}
