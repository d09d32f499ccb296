//! Data models for places API entities.
//!
//! This module contains the data structures exchanged with the
//! places API:
//!
//! - `Place`, `PlaceStatus`, `Coordinates`: point-of-interest records
//! - `Review`, `PlaceReviews`: user reviews and per-place aggregates
//! - `CreatePlace`, `CreateReview`, `UpdateReview`: mutation payloads

pub mod place;
pub mod review;

pub use place::{Coordinates, CreatePlace, CreatePlaceResponse, Place, PlaceStatus};
pub use review::{
    CreateReview, MutationResponse, PlaceReviews, Review, ReviewAuthor, ReviewContent,
    UpdateReview,
};
