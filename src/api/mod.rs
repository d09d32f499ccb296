//! REST API client module for the places backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! places API to fetch listings, search results, place details, and
//! reviews, and to submit new places and reviews.
//!
//! The backend authenticates with a JWT bearer token; obtaining the
//! token is out of scope here, the client just attaches one when set.
//! The [`PlacesApi`] trait is the seam services are written against,
//! so they can be exercised without a network.

pub mod client;
pub mod error;

use async_trait::async_trait;

use crate::models::{
    CreatePlace, CreatePlaceResponse, CreateReview, MutationResponse, Place, PlaceReviews, Review,
    ReviewContent, UpdateReview,
};
use crate::search::{RadiusPolicy, SearchQuery, SearchResult};

pub use client::ApiClient;
pub use error::ApiError;

/// The remote places API surface consumed by the services.
///
/// Every method performs a single attempt: no retries, no backoff.
/// Falling back to the cache on failure is the caller's concern.
#[async_trait]
pub trait PlacesApi: Send + Sync {
    async fn fetch_places(&self) -> Result<Vec<Place>, ApiError>;

    /// Remote search. The policy selects between the filtering endpoint
    /// and the annotate-only one.
    async fn search_places(
        &self,
        query: &SearchQuery,
        policy: RadiusPolicy,
    ) -> Result<Vec<SearchResult>, ApiError>;

    async fn fetch_place(&self, id: i64) -> Result<Place, ApiError>;

    async fn fetch_place_types(&self) -> Result<Vec<String>, ApiError>;

    async fn create_place(&self, place: &CreatePlace) -> Result<CreatePlaceResponse, ApiError>;

    async fn fetch_user_places(&self) -> Result<Vec<Place>, ApiError>;

    async fn fetch_reviews(&self, place_id: i64) -> Result<PlaceReviews, ApiError>;

    async fn create_review(&self, review: &CreateReview) -> Result<MutationResponse, ApiError>;

    /// Create or replace the authenticated user's review of a place.
    async fn upsert_review(
        &self,
        place_id: i64,
        content: &ReviewContent,
    ) -> Result<MutationResponse, ApiError>;

    async fn update_review(
        &self,
        review_id: i64,
        update: &UpdateReview,
    ) -> Result<MutationResponse, ApiError>;

    async fn delete_review(&self, review_id: i64) -> Result<MutationResponse, ApiError>;

    async fn fetch_user_reviews(&self) -> Result<Vec<Review>, ApiError>;
}
