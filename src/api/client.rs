//! HTTP client for the places REST API.
//!
//! A thin reqwest wrapper implementing [`PlacesApi`]. One attempt per
//! call; offline fallback lives in the service layer, not here.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::models::{
    CreatePlace, CreatePlaceResponse, CreateReview, MutationResponse, Place, PlaceReviews, Review,
    ReviewContent, UpdateReview,
};
use crate::search::{RadiusPolicy, SearchQuery, SearchResult};

use super::{ApiError, PlacesApi};

/// Default base URL for a local development backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Marker the backend puts in the 400 payload when a user already
/// reviewed a place.
const DUPLICATE_REVIEW_MARKER: &str = "déjà noté";

#[derive(Debug, Deserialize)]
struct DuplicateReviewBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(rename = "existingReview", default)]
    existing_review: Option<Review>,
    #[serde(rename = "canEdit", default)]
    can_edit: Option<bool>,
}

/// Detect the backend's duplicate-review rejection in a 400 body.
fn parse_duplicate_review(body: &str) -> Option<ApiError> {
    let parsed: DuplicateReviewBody = serde_json::from_str(body).ok()?;
    let message = parsed.message?;
    if !message.contains(DUPLICATE_REVIEW_MARKER) {
        return None;
    }
    Some(ApiError::DuplicateReview {
        existing: parsed.existing_review?,
        can_edit: parsed.can_edit.unwrap_or(false),
    })
}

/// Build the query-string pairs for a remote search.
/// The radius is only sent to the filtering endpoint; the annotate-only
/// endpoint ignores it server-side, so it is omitted there.
fn search_params(query: &SearchQuery, policy: RadiusPolicy) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(ref name) = query.name {
        params.push(("name", name.clone()));
    }
    if let Some(ref place_type) = query.place_type {
        params.push(("type", place_type.clone()));
    }
    if let Some(origin) = query.origin {
        params.push(("lat", origin.lat.to_string()));
        params.push(("lon", origin.lon.to_string()));
    }
    if policy == RadiusPolicy::Filter {
        if let Some(radius) = query.radius_km {
            params.push(("radius", radius.to_string()));
        }
    }
    params
}

/// API client for the places backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Create a client with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Like `check_response`, but recognizes the duplicate-review 400.
    async fn check_review_response(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status.as_u16() == 400 {
            if let Some(duplicate) = parse_duplicate_review(&body) {
                return Err(duplicate);
            }
        }
        Err(ApiError::from_status(status, &body))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let mut builder = self.client.get(&url);
        if !params.is_empty() {
            builder = builder.query(params);
        }
        let response = self.apply_auth(builder).send().await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl PlacesApi for ApiClient {
    async fn fetch_places(&self) -> Result<Vec<Place>, ApiError> {
        self.get_json("/places", &[]).await
    }

    async fn search_places(
        &self,
        query: &SearchQuery,
        policy: RadiusPolicy,
    ) -> Result<Vec<SearchResult>, ApiError> {
        let path = match policy {
            RadiusPolicy::Filter => "/places/search",
            RadiusPolicy::AnnotateOnly => "/places/search/no-radius",
        };
        self.get_json(path, &search_params(query, policy)).await
    }

    async fn fetch_place(&self, id: i64) -> Result<Place, ApiError> {
        self.get_json(&format!("/places/{}", id), &[]).await
    }

    async fn fetch_place_types(&self) -> Result<Vec<String>, ApiError> {
        self.get_json("/places/types", &[]).await
    }

    async fn create_place(&self, place: &CreatePlace) -> Result<CreatePlaceResponse, ApiError> {
        let url = self.url("/places");
        debug!(url = %url, "POST");
        let response = self
            .apply_auth(self.client.post(&url).json(place))
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn fetch_user_places(&self) -> Result<Vec<Place>, ApiError> {
        self.get_json("/user/places", &[]).await
    }

    async fn fetch_reviews(&self, place_id: i64) -> Result<PlaceReviews, ApiError> {
        self.get_json(&format!("/places/{}/reviews", place_id), &[])
            .await
    }

    async fn create_review(&self, review: &CreateReview) -> Result<MutationResponse, ApiError> {
        let url = self.url("/reviews");
        debug!(url = %url, "POST");
        let response = self
            .apply_auth(self.client.post(&url).json(review))
            .send()
            .await?;
        let response = Self::check_review_response(response).await?;
        Ok(response.json().await?)
    }

    async fn upsert_review(
        &self,
        place_id: i64,
        content: &ReviewContent,
    ) -> Result<MutationResponse, ApiError> {
        let url = self.url(&format!("/places/{}/review", place_id));
        debug!(url = %url, "POST");
        let response = self
            .apply_auth(self.client.post(&url).json(content))
            .send()
            .await?;
        let response = Self::check_review_response(response).await?;
        Ok(response.json().await?)
    }

    async fn update_review(
        &self,
        review_id: i64,
        update: &UpdateReview,
    ) -> Result<MutationResponse, ApiError> {
        let url = self.url(&format!("/reviews/{}", review_id));
        debug!(url = %url, "PUT");
        let response = self
            .apply_auth(self.client.put(&url).json(update))
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn delete_review(&self, review_id: i64) -> Result<MutationResponse, ApiError> {
        let url = self.url(&format!("/reviews/{}", review_id));
        debug!(url = %url, "DELETE");
        let response = self.apply_auth(self.client.delete(&url)).send().await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn fetch_user_reviews(&self) -> Result<Vec<Review>, ApiError> {
        self.get_json("/reviews", &[]).await
    }
}
