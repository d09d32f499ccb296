//! Domain models for place reviews.

use serde::{Deserialize, Serialize};

/// The author of a review, as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAuthor {
    pub id: i64,
    pub pseudo: String,
}

/// A single user review of a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub user: ReviewAuthor,
    pub commentaire: String,
    pub rating: u8,
    #[serde(rename = "createAt", default)]
    pub create_at: Option<String>,
    /// Set by the API when the review belongs to the authenticated user.
    #[serde(rename = "canEdit", default, skip_serializing_if = "Option::is_none")]
    pub can_edit: Option<bool>,
}

/// Aggregate reviews payload for a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceReviews {
    pub reviews: Vec<Review>,
    #[serde(rename = "averageRating", default)]
    pub average_rating: f64,
    #[serde(rename = "reviewCount", default)]
    pub review_count: u32,
}

/// Payload for posting a new review.
#[derive(Debug, Clone, Serialize)]
pub struct CreateReview {
    pub place_id: i64,
    pub commentaire: String,
    pub rating: u8,
}

/// Review body without a place id, for the per-place upsert endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewContent {
    pub commentaire: String,
    pub rating: u8,
}

/// Payload for editing an existing review. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateReview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commentaire: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

/// Generic success/message envelope returned by mutations.
#[derive(Debug, Clone, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
    /// Set by the upsert endpoint to distinguish create from update.
    #[serde(rename = "isNewReview", default)]
    pub is_new_review: Option<bool>,
}
