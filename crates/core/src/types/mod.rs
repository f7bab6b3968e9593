//! Core types for Print Router.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod geo;
pub mod id;
pub mod money;
pub mod status;

pub use geo::{Coordinates, CoordinatesError, FALLBACK_COORDINATES};
pub use id::*;
pub use money::{CurrencyCode, Money, MoneyError};
pub use status::*;
