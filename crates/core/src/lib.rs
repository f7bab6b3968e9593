//! Print Router Core - Shared types library.
//!
//! This crate provides the types shared by every Print Router component:
//! - `server` - Assignment engine, lifecycle, public tracking endpoint
//! - `cli` - Operator tooling (migrations, batch assignment, repairs)
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no database
//! access, no HTTP. The fulfillment lifecycle transition table lives here so
//! every caller validates transitions against the same graph.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, statuses, coordinates and money

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
