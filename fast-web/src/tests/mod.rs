//! Test module for fast-web
//!
//! End-to-end dispatch tests over an axum router, plus property-based tests
//! (proptest) for the response encoder and the validation rules.
