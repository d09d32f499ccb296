//! Domain models for places.
//!
//! These types mirror the JSON payloads of the places API,
//! decoupled from any particular endpoint's response envelope.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Moderation status of a place. The backend stores the French strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceStatus {
    #[serde(rename = "En attente")]
    Pending,
    #[serde(rename = "validé")]
    Validated,
    #[serde(rename = "refusé")]
    Rejected,
}

/// A moderated point-of-interest record with aggregate review statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub place_type: String,
    pub adresse: String,
    pub description: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(rename = "averageRating", default)]
    pub average_rating: f64,
    #[serde(rename = "reviewCount", default)]
    pub review_count: u32,
    /// Omitted by public endpoints, which only ever return validated places.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statut: Option<PlaceStatus>,
    #[serde(rename = "createAt", default, skip_serializing_if = "Option::is_none")]
    pub create_at: Option<String>,
}

impl Place {
    /// The place's location, if fully specified.
    /// A partial coordinate pair counts as no location.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
            _ => None,
        }
    }

    /// Whether the place is eligible for public listing and search.
    /// Public endpoints omit the status because the server has already
    /// filtered to validated records.
    pub fn is_public(&self) -> bool {
        matches!(self.statut, None | Some(PlaceStatus::Validated))
    }
}

/// Payload for submitting a new place. Created in pending state server-side.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePlace {
    pub name: String,
    #[serde(rename = "type")]
    pub place_type: String,
    pub adresse: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Response envelope for place creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlaceResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub place: Option<Place>,
}
