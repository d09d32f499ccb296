//! citycache - offline-first client library for the Students City places API.
//!
//! The backend is a moderated catalog of student-submitted places
//! (restaurants, bars, cafés) with user reviews. This crate gives a
//! mobile or desktop frontend everything between the UI and the wire:
//!
//! - [`models`]: typed place and review records matching the API's JSON
//! - [`api`]: a reqwest client behind the [`api::PlacesApi`] trait
//! - [`cache`]: a namespaced, TTL-aware local cache over a pluggable
//!   key-value substrate, so previously fetched data survives offline
//! - [`search`]: a pure proximity search engine (haversine distance,
//!   radius policies, nearest-first ordering) shared by the online
//!   result shaping and the offline re-derivation
//! - [`services`]: read-through services tying the three together with
//!   per-resource TTLs and cache invalidation on review mutations
//! - [`net`]: the injected connectivity-status seam
//!
//! ```no_run
//! use citycache::api::ApiClient;
//! use citycache::cache::{FileStore, LocalCache};
//! use citycache::config::Config;
//! use citycache::net::SharedConnectivity;
//! use citycache::search::{RadiusPolicy, SearchQuery};
//! use citycache::services::PlaceService;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let api = ApiClient::new(config.base_url())?;
//! let connectivity = SharedConnectivity::new(!config.offline_mode);
//! let cache = LocalCache::new(FileStore::new(config.cache_dir()?)?);
//!
//! let places = PlaceService::new(api, connectivity, cache);
//! let results = places
//!     .search(&SearchQuery::default(), RadiusPolicy::Filter)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod net;
pub mod search;
pub mod services;

pub use api::{ApiClient, ApiError, PlacesApi};
pub use cache::{FileStore, KeyValueStore, LocalCache, MemoryStore};
pub use config::Config;
pub use models::{Coordinates, Place, PlaceReviews, PlaceStatus, Review};
pub use net::{Connectivity, SharedConnectivity};
pub use search::{RadiusPolicy, SearchQuery, SearchResult};
pub use services::{PlaceService, ReviewService};
