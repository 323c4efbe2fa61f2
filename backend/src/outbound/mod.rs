//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: a single-process store implementing the same repositories
//! - **cache**: the in-process rendered-page cache
//! - **media**: image uploads written below the media root
//! - **security**: Argon2 password hashing
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cache;
pub mod media;
pub mod memory;
pub mod persistence;
pub mod security;
