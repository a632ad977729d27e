//! HTTP surface for the cosmic weather service.
//!
//! Exposed as a library so integration tests can mount the router against
//! an in-process service.

pub mod routes;
