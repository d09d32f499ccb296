//! Proximity search over place records.
//!
//! A pure engine: filter by name/type, annotate with great-circle distance
//! from an optional origin, optionally filter by radius, sort nearest-first.
//! The same engine backs the online result shaping and the offline
//! re-derivation over cached listings.

pub mod engine;
pub mod geo;

pub use engine::{search, RadiusPolicy, SearchQuery, SearchResult};
pub use geo::{haversine_km, EARTH_RADIUS_KM};
