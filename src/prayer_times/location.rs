use anyhow::{anyhow, Result};
use log::{debug, warn};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::AppConfig;
use crate::models::Coordinates;

pub const DEFAULT_LATITUDE: f64 = -6.2088;
pub const DEFAULT_LONGITUDE: f64 = 106.8456;
pub const DEFAULT_LABEL: &str = "Jakarta";
pub const LOCATED_LABEL: &str = "Lokasi Kamu";

const IP_LOOKUP_URL: &str = "https://ipapi.co/json/";

pub fn default_coordinates() -> Coordinates {
    Coordinates::new(DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_LABEL)
}

/// Something that can tell where the user is, within a bounded wait.
pub trait Locator {
    fn locate(&self, timeout: Duration) -> Result<(f64, f64)>;
}

/// Network position lookup by public IP.
pub struct IpLocator {
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct IpLookup {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl IpLocator {
    pub fn new() -> Self {
        Self::with_endpoint(IP_LOOKUP_URL)
    }

    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Locator for IpLocator {
    fn locate(&self, timeout: Duration) -> Result<(f64, f64)> {
        let client = Client::builder().timeout(timeout).build()?;
        let response = client.get(&self.endpoint).send()?;
        if !response.status().is_success() {
            return Err(anyhow!("location lookup answered HTTP {}", response.status()));
        }
        let body: IpLookup = response.json()?;
        match (body.latitude, body.longitude) {
            (Some(lat), Some(lon)) => Ok((lat, lon)),
            _ => Err(anyhow!("location lookup returned no position")),
        }
    }
}

fn in_range(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// Always yields coordinates: a located position, or the default city when
/// no locator is available or it fails for any reason.
pub fn resolve_coordinates(locator: Option<&dyn Locator>, timeout: Duration) -> Coordinates {
    let Some(locator) = locator else {
        debug!("no locator available, using {}", DEFAULT_LABEL);
        return default_coordinates();
    };

    match locator.locate(timeout) {
        Ok((lat, lon)) if in_range(lat, lon) => Coordinates::new(lat, lon, LOCATED_LABEL),
        Ok((lat, lon)) => {
            warn!("located position ({}, {}) out of range, using {}", lat, lon, DEFAULT_LABEL);
            default_coordinates()
        }
        Err(e) => {
            warn!("location unavailable ({:#}), using {}", e, DEFAULT_LABEL);
            default_coordinates()
        }
    }
}

/// Configured coordinates win; otherwise resolve once for this run.
pub fn coordinates_for(config: &AppConfig, locator: Option<&dyn Locator>) -> Coordinates {
    let loc = &config.location;
    match (loc.latitude, loc.longitude) {
        (Some(lat), Some(lon)) if in_range(lat, lon) => Coordinates::new(lat, lon, loc.label.clone()),
        _ => resolve_coordinates(locator, Duration::from_secs(loc.locate_timeout_secs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64, f64);

    impl Locator for Fixed {
        fn locate(&self, _timeout: Duration) -> Result<(f64, f64)> {
            Ok((self.0, self.1))
        }
    }

    struct Denied;

    impl Locator for Denied {
        fn locate(&self, _timeout: Duration) -> Result<(f64, f64)> {
            Err(anyhow!("permission denied"))
        }
    }

    #[test]
    fn absent_capability_falls_back_to_default() {
        let coords = resolve_coordinates(None, Duration::from_secs(5));
        assert_eq!(coords, default_coordinates());
        assert_eq!(coords.label, "Jakarta");
    }

    #[test]
    fn denied_falls_back_to_default() {
        let coords = resolve_coordinates(Some(&Denied), Duration::from_secs(5));
        assert_eq!(coords, default_coordinates());
    }

    #[test]
    fn located_position_is_labelled() {
        let coords = resolve_coordinates(Some(&Fixed(-7.25, 112.75)), Duration::from_secs(5));
        assert_eq!(coords, Coordinates::new(-7.25, 112.75, LOCATED_LABEL));
    }

    #[test]
    fn nonsense_position_falls_back() {
        let coords = resolve_coordinates(Some(&Fixed(120.0, 10.0)), Duration::from_secs(5));
        assert_eq!(coords, default_coordinates());
    }

    #[test]
    fn configured_coordinates_skip_the_locator() {
        let mut config = AppConfig::default();
        config.location.latitude = Some(3.5952);
        config.location.longitude = Some(98.6722);
        config.location.label = "Medan".to_string();
        let coords = coordinates_for(&config, Some(&Denied));
        assert_eq!(coords, Coordinates::new(3.5952, 98.6722, "Medan"));
    }

    #[test]
    fn unconfigured_uses_the_locator() {
        let config = AppConfig::default();
        let coords = coordinates_for(&config, Some(&Fixed(-6.9, 107.6)));
        assert_eq!(coords.label, LOCATED_LABEL);
    }
}
