//! Active reference point.
//!
//! Combines the device location stream with an optional searched-location
//! override into the single point that nearby searches run against.

mod resolver;

pub use resolver::{ActiveLocationResolver, ResolverConfig, DEFAULT_MIN_MOVEMENT_M};
