//! Yatube: a small social blogging service.
//!
//! Users sign up, publish posts with an optional image and group, read
//! paginated feeds, comment and follow one another.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::Trace;
