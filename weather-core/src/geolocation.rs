use thiserror::Error;

use crate::model::{Coordinates, LocationQuery};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("geolocation is not available on this device")]
    Unavailable,
    #[error("permission to read the device position was denied")]
    Denied,
    #[error("invalid coordinates '{0}', expected \"lat,lon\"")]
    Invalid(String),
}

/// Source of the device position.
pub trait Geolocator: Send + Sync {
    fn locate(&self) -> Result<Coordinates, GeolocationError>;
}

/// A position fixed by configuration, e.g. `home_coordinates = "9.93,76.26"`.
#[derive(Debug, Clone, Default)]
pub struct FixedGeolocator {
    position: Option<String>,
}

impl FixedGeolocator {
    pub fn new(position: Option<String>) -> Self {
        Self { position }
    }
}

impl Geolocator for FixedGeolocator {
    fn locate(&self) -> Result<Coordinates, GeolocationError> {
        let raw = self.position.as_deref().ok_or(GeolocationError::Unavailable)?;
        parse_coordinates(raw)
    }
}

pub fn parse_coordinates(raw: &str) -> Result<Coordinates, GeolocationError> {
    let invalid = || GeolocationError::Invalid(raw.to_string());

    let (lat, lon) = raw.split_once(',').ok_or_else(invalid)?;
    let latitude: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let longitude: f64 = lon.trim().parse().map_err(|_| invalid())?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(invalid());
    }
    Ok(Coordinates { latitude, longitude })
}

/// The device position when available, otherwise `fallback`.
pub fn initial_query(geolocator: &dyn Geolocator, fallback: &str) -> LocationQuery {
    match geolocator.locate() {
        Ok(coords) => LocationQuery::from_coordinates(coords),
        Err(err) => {
            tracing::warn!(error = %err, fallback, "geolocation failed, using fallback location");
            LocationQuery::new(fallback).unwrap_or_else(|_| LocationQuery::default_fallback())
        }
    }
}
