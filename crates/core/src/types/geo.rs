//! Geographic coordinates for delivery locations.
//!
//! Orders arrive from the order system with optional latitude/longitude.
//! Before an order can be assigned, both values must be present; orders
//! that lack either are given [`FALLBACK_COORDINATES`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cairo city center, used when an order has no usable location.
pub const FALLBACK_COORDINATES: Coordinates = Coordinates {
    latitude: 30.0444,
    longitude: 31.2357,
};

/// Errors constructing a coordinate pair.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinatesError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A validated (latitude, longitude) pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair, rejecting out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns `CoordinatesError` if either value is out of range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinatesError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinatesError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinatesError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        FALLBACK_COORDINATES
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_cairo() {
        assert_eq!(FALLBACK_COORDINATES.latitude(), 30.0444);
        assert_eq!(FALLBACK_COORDINATES.longitude(), 31.2357);
        assert_eq!(Coordinates::default(), FALLBACK_COORDINATES);
    }

    #[test]
    fn test_new_validates_ranges() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert_eq!(
            Coordinates::new(91.0, 0.0),
            Err(CoordinatesError::LatitudeOutOfRange(91.0))
        );
        assert_eq!(
            Coordinates::new(0.0, -181.0),
            Err(CoordinatesError::LongitudeOutOfRange(-181.0))
        );
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }
}
