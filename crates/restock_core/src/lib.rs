//! Core domain logic for restock.
//! This crate is the single source of truth for catalog invariants.

pub mod db;
pub mod feed;
pub mod logging;
pub mod model;
pub mod remote;
pub mod repo;

pub use db::{DbError, DbResult, Store};
pub use feed::product_feed::{FeedError, FeedObserver, FeedResult, ProductFeed};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::product::{Product, ProductValidationError, SerialCode};
pub use remote::product_api::{
    ProductSource, RemoteError, RemoteProduct, RemoteResult, StubProductApi,
};
pub use repo::product_repo::{
    BatchInsertReport, MergePolicy, ProductRepository, RepoError, RepoResult,
    SqliteProductRepository,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
