//! Offline-aware services over the places API.
//!
//! Each service composes three injected collaborators: a [`PlacesApi`]
//! backend, a [`Connectivity`](crate::net::Connectivity) provider, and a
//! [`LocalCache`](crate::cache::LocalCache). Three access patterns, applied
//! uniformly:
//!
//! - read-through: a successful fetch overwrites the cache entry with a
//!   per-resource TTL
//! - fallback: a failed fetch while nominally online serves any cached
//!   value before surfacing the error
//! - pure-offline: with connectivity known down, the network is skipped
//!   and a missing cache entry becomes a distinct offline error

pub mod places;
pub mod reviews;

pub use places::{PlaceService, DEFAULT_PLACE_TYPES};
pub use reviews::ReviewService;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::api::{ApiError, PlacesApi};
    use crate::models::{
        CreatePlace, CreatePlaceResponse, CreateReview, MutationResponse, Place, PlaceReviews,
        Review, ReviewAuthor, ReviewContent, UpdateReview,
    };
    use crate::search::{RadiusPolicy, SearchQuery, SearchResult};

    pub fn sample_place(id: i64, name: &str, place_type: &str) -> Place {
        Place {
            id,
            name: name.to_string(),
            place_type: place_type.to_string(),
            adresse: format!("{} rue Test", id),
            description: String::new(),
            latitude: None,
            longitude: None,
            average_rating: 0.0,
            review_count: 0,
            statut: None,
            create_at: None,
        }
    }

    pub fn sample_review(id: i64, rating: u8) -> Review {
        Review {
            id,
            user: ReviewAuthor {
                id: 1,
                pseudo: "max".to_string(),
            },
            commentaire: "Bien".to_string(),
            rating,
            create_at: None,
            can_edit: None,
        }
    }

    pub fn sample_reviews(count: u32) -> PlaceReviews {
        PlaceReviews {
            reviews: (0..count).map(|i| sample_review(i as i64, 4)).collect(),
            average_rating: 4.0,
            review_count: count,
        }
    }

    /// Configurable in-memory backend. Anything not configured fails with
    /// a server error, which doubles as the fetch-failure fixture.
    #[derive(Default)]
    pub struct FakeApi {
        places: Option<Vec<Place>>,
        search_results: Option<Vec<SearchResult>>,
        place_types: Option<Vec<String>>,
        reviews: Option<PlaceReviews>,
        mutations_ok: bool,
        duplicate_review: bool,
        calls: AtomicUsize,
    }

    impl FakeApi {
        pub fn with_places(mut self, places: Vec<Place>) -> Self {
            self.places = Some(places);
            self
        }

        pub fn with_search_results(mut self, results: Vec<SearchResult>) -> Self {
            self.search_results = Some(results);
            self
        }

        pub fn with_place_types(mut self, types: Vec<String>) -> Self {
            self.place_types = Some(types);
            self
        }

        pub fn with_reviews(mut self, reviews: PlaceReviews) -> Self {
            self.reviews = Some(reviews);
            self
        }

        pub fn with_mutations_ok(mut self) -> Self {
            self.mutations_ok = true;
            self
        }

        pub fn with_duplicate_review(mut self) -> Self {
            self.duplicate_review = true;
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::Relaxed)
        }

        fn tick(&self) {
            self.calls.fetch_add(1, Ordering::Relaxed);
        }

        fn unavailable<T>() -> Result<T, ApiError> {
            Err(ApiError::ServerError("backend unavailable".to_string()))
        }

        fn mutation(&self) -> Result<MutationResponse, ApiError> {
            if self.duplicate_review {
                return Err(ApiError::DuplicateReview {
                    existing: sample_review(4, 4),
                    can_edit: true,
                });
            }
            if self.mutations_ok {
                Ok(MutationResponse {
                    success: true,
                    message: "ok".to_string(),
                    is_new_review: None,
                })
            } else {
                Self::unavailable()
            }
        }
    }

    #[async_trait]
    impl PlacesApi for FakeApi {
        async fn fetch_places(&self) -> Result<Vec<Place>, ApiError> {
            self.tick();
            self.places.clone().map_or_else(Self::unavailable, Ok)
        }

        async fn search_places(
            &self,
            _query: &SearchQuery,
            _policy: RadiusPolicy,
        ) -> Result<Vec<SearchResult>, ApiError> {
            self.tick();
            self.search_results
                .clone()
                .map_or_else(Self::unavailable, Ok)
        }

        async fn fetch_place(&self, id: i64) -> Result<Place, ApiError> {
            self.tick();
            self.places
                .as_ref()
                .and_then(|places| places.iter().find(|p| p.id == id).cloned())
                .map_or_else(Self::unavailable, Ok)
        }

        async fn fetch_place_types(&self) -> Result<Vec<String>, ApiError> {
            self.tick();
            self.place_types.clone().map_or_else(Self::unavailable, Ok)
        }

        async fn create_place(
            &self,
            _place: &CreatePlace,
        ) -> Result<CreatePlaceResponse, ApiError> {
            self.tick();
            if self.mutations_ok {
                Ok(CreatePlaceResponse {
                    success: true,
                    message: "created".to_string(),
                    place: None,
                })
            } else {
                Self::unavailable()
            }
        }

        async fn fetch_user_places(&self) -> Result<Vec<Place>, ApiError> {
            self.tick();
            self.places.clone().map_or_else(Self::unavailable, Ok)
        }

        async fn fetch_reviews(&self, _place_id: i64) -> Result<PlaceReviews, ApiError> {
            self.tick();
            self.reviews.clone().map_or_else(Self::unavailable, Ok)
        }

        async fn create_review(
            &self,
            _review: &CreateReview,
        ) -> Result<MutationResponse, ApiError> {
            self.tick();
            self.mutation()
        }

        async fn upsert_review(
            &self,
            _place_id: i64,
            _content: &ReviewContent,
        ) -> Result<MutationResponse, ApiError> {
            self.tick();
            self.mutation()
        }

        async fn update_review(
            &self,
            _review_id: i64,
            _update: &UpdateReview,
        ) -> Result<MutationResponse, ApiError> {
            self.tick();
            self.mutation()
        }

        async fn delete_review(&self, _review_id: i64) -> Result<MutationResponse, ApiError> {
            self.tick();
            self.mutation()
        }

        async fn fetch_user_reviews(&self) -> Result<Vec<Review>, ApiError> {
            self.tick();
            self.reviews
                .as_ref()
                .map(|r| r.reviews.clone())
                .map_or_else(Self::unavailable, Ok)
        }
    }
}
