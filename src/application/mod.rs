//! Application layer containing the rental pricing logic.
//!
//! [`engine::RentalEngine`] turns products and rates into rental matrices.
//! [`session::PricingSession`] holds the working product list and rate
//! configuration, validates edits, and recomputes on request.

pub mod engine;
pub mod session;
