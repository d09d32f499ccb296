//! Offline-aware place catalog service.
//!
//! Read-through over the remote API: successful fetches populate the
//! local cache with per-resource TTLs, failures fall back to whatever
//! the cache still holds, and known-offline calls skip the network
//! entirely. Searches never fail offline: with no cached result for the
//! exact query, the engine re-derives one from the cached full listing.

use std::time::Duration;

use tracing::{debug, warn};

use crate::api::{ApiError, PlacesApi};
use crate::cache::{KeyValueStore, LocalCache};
use crate::models::{CreatePlace, CreatePlaceResponse, Place};
use crate::net::Connectivity;
use crate::search::{self, RadiusPolicy, SearchQuery, SearchResult};

/// Full place listing: refetched after 30 minutes.
const PLACES_TTL: Duration = Duration::from_secs(30 * 60);

/// Per-query search results: 15 minutes.
const SEARCH_TTL: Duration = Duration::from_secs(15 * 60);

/// Single place detail: 60 minutes.
const PLACE_TTL: Duration = Duration::from_secs(60 * 60);

/// Place type vocabulary changes rarely: 24 hours.
const TYPES_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const PLACES_KEY: &str = "places_all";
const TYPES_KEY: &str = "place_types";

/// Fallback type vocabulary when offline with nothing cached.
pub const DEFAULT_PLACE_TYPES: [&str; 5] = ["Restaurant", "Bar", "Café", "Activité", "Autre"];

pub struct PlaceService<A, C, S>
where
    A: PlacesApi,
    C: Connectivity,
    S: KeyValueStore,
{
    api: A,
    connectivity: C,
    cache: LocalCache<S>,
}

impl<A, C, S> PlaceService<A, C, S>
where
    A: PlacesApi,
    C: Connectivity,
    S: KeyValueStore,
{
    pub fn new(api: A, connectivity: C, cache: LocalCache<S>) -> Self {
        Self {
            api,
            connectivity,
            cache,
        }
    }

    pub fn cache(&self) -> &LocalCache<S> {
        &self.cache
    }

    /// The full validated-place listing.
    pub async fn get_places(&self) -> Result<Vec<Place>, ApiError> {
        if !self.connectivity.is_online() {
            return self
                .cache
                .get(PLACES_KEY)
                .ok_or_else(|| ApiError::offline("places list"));
        }

        match self.api.fetch_places().await {
            Ok(places) => {
                self.cache.set(PLACES_KEY, &places, Some(PLACES_TTL));
                Ok(places)
            }
            Err(e) => match self.cache.get(PLACES_KEY) {
                Some(cached) => {
                    warn!(error = %e, "Serving cached places after fetch failure");
                    Ok(cached)
                }
                None => Err(e),
            },
        }
    }

    /// Search places, remotely when possible.
    ///
    /// Offline, a cached result for this exact query wins; otherwise the
    /// engine runs over the cached full listing (empty when nothing is
    /// cached). Once inputs are valid a search returns a list, never an
    /// error.
    pub async fn search(
        &self,
        query: &SearchQuery,
        policy: RadiusPolicy,
    ) -> Result<Vec<SearchResult>, ApiError> {
        let cache_key = search_cache_key(query, policy);

        if !self.connectivity.is_online() {
            if let Some(cached) = self.cache.get(&cache_key) {
                return Ok(cached);
            }
            let all: Vec<Place> = self.cache.get(PLACES_KEY).unwrap_or_default();
            debug!(candidates = all.len(), "Re-deriving search locally while offline");
            return Ok(search::search(&all, query, policy));
        }

        match self.api.search_places(query, policy).await {
            Ok(results) => {
                self.cache.set(&cache_key, &results, Some(SEARCH_TTL));
                Ok(results)
            }
            Err(e) => match self.cache.get(&cache_key) {
                Some(cached) => {
                    warn!(error = %e, "Serving cached search results after fetch failure");
                    Ok(cached)
                }
                None => Err(e),
            },
        }
    }

    /// A single place's detail record.
    pub async fn get_place(&self, id: i64) -> Result<Place, ApiError> {
        let cache_key = format!("place_{}", id);

        if !self.connectivity.is_online() {
            return self
                .cache
                .get(&cache_key)
                .ok_or_else(|| ApiError::offline(format!("place {}", id)));
        }

        match self.api.fetch_place(id).await {
            Ok(place) => {
                self.cache.set(&cache_key, &place, Some(PLACE_TTL));
                Ok(place)
            }
            Err(e) => match self.cache.get(&cache_key) {
                Some(cached) => {
                    warn!(error = %e, place_id = id, "Serving cached place after fetch failure");
                    Ok(cached)
                }
                None => Err(e),
            },
        }
    }

    /// The place type vocabulary. Falls back to a built-in default when
    /// offline with nothing cached.
    pub async fn get_place_types(&self) -> Result<Vec<String>, ApiError> {
        if !self.connectivity.is_online() {
            return Ok(self
                .cache
                .get(TYPES_KEY)
                .unwrap_or_else(default_place_types));
        }

        match self.api.fetch_place_types().await {
            Ok(types) => {
                self.cache.set(TYPES_KEY, &types, Some(TYPES_TTL));
                Ok(types)
            }
            Err(e) => match self.cache.get(TYPES_KEY) {
                Some(cached) => Ok(cached),
                None => Err(e),
            },
        }
    }

    /// Submit a new place. Online only; new places start pending and do
    /// not appear in the public listing, so nothing is invalidated.
    pub async fn create_place(&self, place: &CreatePlace) -> Result<CreatePlaceResponse, ApiError> {
        if !self.connectivity.is_online() {
            return Err(ApiError::offline("place creation"));
        }
        self.api.create_place(place).await
    }

    /// The authenticated user's own submissions, whatever their status.
    /// Online only: ownership-scoped data is never cached.
    pub async fn get_user_places(&self) -> Result<Vec<Place>, ApiError> {
        if !self.connectivity.is_online() {
            return Err(ApiError::offline("your places"));
        }
        self.api.fetch_user_places().await
    }
}

fn search_cache_key(query: &SearchQuery, policy: RadiusPolicy) -> String {
    let tag = match policy {
        RadiusPolicy::Filter => "filter",
        RadiusPolicy::AnnotateOnly => "annotate",
    };
    format!("places_search_{}_{}", tag, query.cache_key())
}

fn default_place_types() -> Vec<String> {
    DEFAULT_PLACE_TYPES.iter().map(|s| s.to_string()).collect()
}
