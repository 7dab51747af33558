//! API client library for whatmovie.
//!
//! Provides a client for the KOFIC (Korean Film Council) movie information
//! service and the mapping of its responses into flat [`kofic::Movie`] records.

/// KOFIC movie information API client.
pub mod kofic;
