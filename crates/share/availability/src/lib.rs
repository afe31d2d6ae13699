//! Data availability judgments.
//!
//! - [`LightAvailability`] samples a fixed number of random coordinates and
//!   declares the square unavailable if any of them cannot be retrieved.
//! - [`FullAvailability`] retrieves the entire square.
//!
//! Both report a confidence through
//! [`Availability::probability_of_availability`](quadrant_share_api::Availability::probability_of_availability).

mod full;
mod light;
mod metrics;

pub use full::FullAvailability;
pub use light::LightAvailability;
