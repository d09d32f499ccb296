//! Pure proximity search over place records.
//!
//! The backend exposes several near-identical search endpoints that differ
//! only in whether a supplied radius excludes results. The engine folds that
//! difference into a single [`RadiusPolicy`] parameter so the offline path
//! can reproduce any of them over cached data.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::{Coordinates, Place};
use crate::search::geo::haversine_km;

/// How a supplied radius affects the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RadiusPolicy {
    /// Drop results whose computed distance exceeds the radius.
    #[default]
    Filter,
    /// Compute and sort by distance, but never drop anything.
    AnnotateOnly,
}

/// Filters for a place search. All fields are optional; a radius is only
/// meaningful together with an origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    /// Case-insensitive substring match on the place name.
    pub name: Option<String>,
    /// Exact match on the place type, as stored.
    pub place_type: Option<String>,
    pub origin: Option<Coordinates>,
    pub radius_km: Option<f64>,
}

impl SearchQuery {
    /// Stable string identifying this query, used to key cached results.
    pub fn cache_key(&self) -> String {
        fn num(v: Option<f64>) -> String {
            v.map(|v| v.to_string()).unwrap_or_default()
        }
        format!(
            "n={}&t={}&lat={}&lon={}&r={}",
            self.name.as_deref().unwrap_or(""),
            self.place_type.as_deref().unwrap_or(""),
            num(self.origin.map(|o| o.lat)),
            num(self.origin.map(|o| o.lon)),
            num(self.radius_km),
        )
    }
}

/// A place projection augmented with the computed distance from the query
/// origin, in kilometers. Absent when either side lacks coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub place_type: String,
    pub adresse: String,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "averageRating", default)]
    pub average_rating: f64,
    #[serde(rename = "reviewCount", default)]
    pub review_count: u32,
    #[serde(default)]
    pub distance: Option<f64>,
}

impl SearchResult {
    fn from_place(place: &Place, distance: Option<f64>) -> Self {
        Self {
            id: place.id,
            name: place.name.clone(),
            place_type: place.place_type.clone(),
            adresse: place.adresse.clone(),
            description: place.description.clone(),
            latitude: place.latitude,
            longitude: place.longitude,
            average_rating: place.average_rating,
            review_count: place.review_count,
            distance,
        }
    }
}

/// Search a candidate set of places.
///
/// Only publicly visible (validated) records are eligible. Distance is
/// computed per record when both the query origin and the record's
/// coordinates exist; records we cannot measure are never dropped by the
/// radius filter. With an origin set, results are sorted ascending by
/// distance (stable, absent distances last); otherwise input order is kept.
///
/// Pure and deterministic; empty input yields empty output.
pub fn search(places: &[Place], query: &SearchQuery, policy: RadiusPolicy) -> Vec<SearchResult> {
    let name_needle = query.name.as_ref().map(|n| n.to_lowercase());

    let mut results = Vec::new();
    for place in places {
        if !place.is_public() {
            continue;
        }
        if let Some(ref needle) = name_needle {
            if !place.name.to_lowercase().contains(needle.as_str()) {
                continue;
            }
        }
        if let Some(ref wanted) = query.place_type {
            if place.place_type != *wanted {
                continue;
            }
        }

        let distance = match (query.origin, place.coordinates()) {
            (Some(origin), Some(location)) => Some(haversine_km(origin, location)),
            _ => None,
        };

        if policy == RadiusPolicy::Filter {
            if let (Some(radius), Some(d)) = (query.radius_km, distance) {
                if d > radius {
                    continue;
                }
            }
        }

        results.push(SearchResult::from_place(place, distance));
    }

    if query.origin.is_some() {
        results.sort_by(|a, b| compare_distance(a.distance, b.distance));
    }

    results
}

/// Ordering rule for computed distances: an absent distance is greater than
/// any present one, so unmeasurable records sort last.
fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
