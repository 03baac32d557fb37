//! State module for tracking fetch progress
//!
//! # Components
//!
//! - `FetchPhase`: Tracks where a paginated fetch is (probing, fetching, done, failed)

mod fetch_phase;

pub use fetch_phase::FetchPhase;
