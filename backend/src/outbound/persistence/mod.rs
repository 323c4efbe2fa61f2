//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories are thin: they translate between the internal row structs
//! in `models` and domain types, and map database failures onto each port's
//! error enum. No business rules live here.
//!
//! ```ignore
//! use yatube::outbound::persistence::{DbPool, PoolConfig, diesel_storage};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/yatube")).await?;
//! let storage = diesel_storage(pool);
//! ```

use std::sync::Arc;

use crate::domain::ports::StoragePorts;

mod diesel_comment_repository;
mod diesel_follow_repository;
mod diesel_group_repository;
mod diesel_helpers;
mod diesel_post_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_follow_repository::DieselFollowRepository;
pub use diesel_group_repository::DieselGroupRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

/// Bundle every Diesel repository over one shared pool.
pub fn diesel_storage(pool: DbPool) -> StoragePorts {
    StoragePorts::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselGroupRepository::new(pool.clone())),
        Arc::new(DieselPostRepository::new(pool.clone())),
        Arc::new(DieselCommentRepository::new(pool.clone())),
        Arc::new(DieselFollowRepository::new(pool)),
    )
}
