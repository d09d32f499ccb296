//! Offline-aware review service.
//!
//! Reads are read-through with a 30 minute TTL; mutations are online
//! only and invalidate cached reviews so the next read refetches.
//! Create and upsert know the place, so they remove exactly that
//! place's entry; update and delete only know the review id, so they
//! fall back to coarse invalidation of every cached reviews entry.

use std::time::Duration;

use tracing::warn;

use crate::api::{ApiError, PlacesApi};
use crate::cache::{KeyValueStore, LocalCache};
use crate::models::{CreateReview, MutationResponse, PlaceReviews, Review, ReviewContent, UpdateReview};
use crate::net::Connectivity;

/// Reviews move more than place records: 30 minutes.
const REVIEWS_TTL: Duration = Duration::from_secs(30 * 60);

const REVIEWS_KEY_PREFIX: &str = "place_reviews_";

fn reviews_key(place_id: i64) -> String {
    format!("{}{}", REVIEWS_KEY_PREFIX, place_id)
}

pub struct ReviewService<A, C, S>
where
    A: PlacesApi,
    C: Connectivity,
    S: KeyValueStore,
{
    api: A,
    connectivity: C,
    cache: LocalCache<S>,
}

impl<A, C, S> ReviewService<A, C, S>
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

    /// Reviews and aggregates for one place.
    pub async fn get_place_reviews(&self, place_id: i64) -> Result<PlaceReviews, ApiError> {
        let cache_key = reviews_key(place_id);

        if !self.connectivity.is_online() {
            return self
                .cache
                .get(&cache_key)
                .ok_or_else(|| ApiError::offline(format!("reviews for place {}", place_id)));
        }

        match self.api.fetch_reviews(place_id).await {
            Ok(reviews) => {
                self.cache.set(&cache_key, &reviews, Some(REVIEWS_TTL));
                Ok(reviews)
            }
            Err(e) => match self.cache.get(&cache_key) {
                Some(cached) => {
                    warn!(error = %e, place_id, "Serving cached reviews after fetch failure");
                    Ok(cached)
                }
                None => Err(e),
            },
        }
    }

    /// Post a new review. A duplicate submission surfaces as
    /// [`ApiError::DuplicateReview`] with the existing review attached.
    pub async fn create_review(&self, review: &CreateReview) -> Result<MutationResponse, ApiError> {
        if !self.connectivity.is_online() {
            return Err(ApiError::offline("review creation"));
        }
        let response = self.api.create_review(review).await?;
        self.cache.remove(&reviews_key(review.place_id));
        Ok(response)
    }

    /// Create or replace the authenticated user's review of a place.
    pub async fn upsert_review(
        &self,
        place_id: i64,
        content: &ReviewContent,
    ) -> Result<MutationResponse, ApiError> {
        if !self.connectivity.is_online() {
            return Err(ApiError::offline("review update"));
        }
        let response = self.api.upsert_review(place_id, content).await?;
        self.cache.remove(&reviews_key(place_id));
        Ok(response)
    }

    /// Edit an existing review. The review id does not reveal its place,
    /// so every cached reviews entry is invalidated.
    pub async fn update_review(
        &self,
        review_id: i64,
        update: &UpdateReview,
    ) -> Result<MutationResponse, ApiError> {
        if !self.connectivity.is_online() {
            return Err(ApiError::offline("review update"));
        }
        let response = self.api.update_review(review_id, update).await?;
        self.cache.remove_matching(REVIEWS_KEY_PREFIX);
        Ok(response)
    }

    /// Delete a review, with the same coarse invalidation as updates.
    pub async fn delete_review(&self, review_id: i64) -> Result<MutationResponse, ApiError> {
        if !self.connectivity.is_online() {
            return Err(ApiError::offline("review deletion"));
        }
        let response = self.api.delete_review(review_id).await?;
        self.cache.remove_matching(REVIEWS_KEY_PREFIX);
        Ok(response)
    }

    /// The authenticated user's reviews. Online only, never cached.
    pub async fn get_user_reviews(&self) -> Result<Vec<Review>, ApiError> {
        if !self.connectivity.is_online() {
            return Err(ApiError::offline("your reviews"));
        }
        self.api.fetch_user_reviews().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::net::SharedConnectivity;
    use crate::services::test_support::{sample_reviews, FakeApi};

    fn service(
        api: FakeApi,
        online: bool,
    ) -> ReviewService<FakeApi, SharedConnectivity, MemoryStore> {
        ReviewService::new(
            api,
            SharedConnectivity::new(online),
            LocalCache::new(MemoryStore::new()),
        )
    }

    fn sample_create(place_id: i64) -> CreateReview {
        CreateReview {
            place_id,
            commentaire: "Très bien".to_string(),
            rating: 5,
        }
    }

    #[tokio::test]
    async fn test_read_through_populates_cache() {
        let api = FakeApi::default().with_reviews(sample_reviews(2));
        let svc = service(api, true);

        let reviews = svc.get_place_reviews(5).await.unwrap();
        assert_eq!(reviews.review_count, 2);
        assert!(svc.cache().has("place_reviews_5"));
    }

    #[tokio::test]
    async fn test_offline_serves_cached_reviews() {
        let svc = service(FakeApi::default(), false);
        svc.cache()
            .set("place_reviews_5", &sample_reviews(1), Some(REVIEWS_TTL));

        let reviews = svc.get_place_reviews(5).await.unwrap();
        assert_eq!(reviews.review_count, 1);
    }

    #[tokio::test]
    async fn test_offline_without_cache_is_offline_error() {
        let svc = service(FakeApi::default(), false);
        assert!(svc.get_place_reviews(5).await.unwrap_err().is_offline());
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back_to_cache() {
        let svc = service(FakeApi::default(), true);
        svc.cache()
            .set("place_reviews_5", &sample_reviews(3), Some(REVIEWS_TTL));

        let reviews = svc.get_place_reviews(5).await.unwrap();
        assert_eq!(reviews.review_count, 3);
    }

    #[tokio::test]
    async fn test_create_invalidates_that_place_only() {
        let api = FakeApi::default().with_mutations_ok();
        let svc = service(api, true);
        svc.cache()
            .set("place_reviews_1", &sample_reviews(1), Some(REVIEWS_TTL));
        svc.cache()
            .set("place_reviews_2", &sample_reviews(2), Some(REVIEWS_TTL));

        svc.create_review(&sample_create(1)).await.unwrap();

        assert!(!svc.cache().has("place_reviews_1"));
        assert!(svc.cache().has("place_reviews_2"));
    }

    #[tokio::test]
    async fn test_upsert_invalidates_that_place_only() {
        let api = FakeApi::default().with_mutations_ok();
        let svc = service(api, true);
        svc.cache()
            .set("place_reviews_3", &sample_reviews(1), Some(REVIEWS_TTL));
        svc.cache()
            .set("place_reviews_4", &sample_reviews(1), Some(REVIEWS_TTL));

        let content = ReviewContent {
            commentaire: "ok".to_string(),
            rating: 3,
        };
        svc.upsert_review(3, &content).await.unwrap();

        assert!(!svc.cache().has("place_reviews_3"));
        assert!(svc.cache().has("place_reviews_4"));
    }

    #[tokio::test]
    async fn test_update_and_delete_invalidate_coarsely() {
        let api = FakeApi::default().with_mutations_ok();
        let svc = service(api, true);
        svc.cache()
            .set("place_reviews_1", &sample_reviews(1), Some(REVIEWS_TTL));
        svc.cache()
            .set("place_reviews_2", &sample_reviews(1), Some(REVIEWS_TTL));
        svc.cache().set("places_all", &vec![1, 2, 3], None);

        svc.update_review(9, &UpdateReview::default()).await.unwrap();

        assert!(!svc.cache().has("place_reviews_1"));
        assert!(!svc.cache().has("place_reviews_2"));
        // Unrelated entries survive coarse invalidation
        assert!(svc.cache().has("places_all"));
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_cache_intact() {
        // FakeApi without with_mutations_ok fails mutations
        let svc = service(FakeApi::default(), true);
        svc.cache()
            .set("place_reviews_1", &sample_reviews(1), Some(REVIEWS_TTL));

        assert!(svc.create_review(&sample_create(1)).await.is_err());
        assert!(svc.cache().has("place_reviews_1"));
    }

    #[tokio::test]
    async fn test_duplicate_review_error_carries_existing_review() {
        let api = FakeApi::default().with_duplicate_review();
        let svc = service(api, true);

        match svc.create_review(&sample_create(1)).await {
            Err(ApiError::DuplicateReview { existing, can_edit }) => {
                assert!(can_edit);
                assert_eq!(existing.rating, 4);
            }
            other => panic!("unexpected: {:?}", other.map(|r| r.success)),
        }
    }

    #[tokio::test]
    async fn test_mutations_require_connectivity() {
        let svc = service(FakeApi::default(), false);
        assert!(svc
            .create_review(&sample_create(1))
            .await
            .unwrap_err()
            .is_offline());
        assert!(svc
            .update_review(1, &UpdateReview::default())
            .await
            .unwrap_err()
            .is_offline());
        assert!(svc.delete_review(1).await.unwrap_err().is_offline());
        assert!(svc.get_user_reviews().await.unwrap_err().is_offline());
    }
}
