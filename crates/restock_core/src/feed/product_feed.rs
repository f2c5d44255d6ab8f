//! Sorted result-set mirror over the product store.
//!
//! # Responsibility
//! - Mirror the `ORDER BY name` listing into an in-memory snapshot.
//! - Expose add, delete-at-offsets, import and refetch operations.
//! - Notify observers around every mutation.
//!
//! # Invariants
//! - `will_change` fires before persistence is touched; observers may still
//!   read the stale snapshot during that call.
//! - `did_change` fires only after the snapshot reflects the store again.
//! - The import's batch insert runs on a background connection; the snapshot
//!   is only ever touched from the caller's task.

use crate::db::{DbError, Store};
use crate::model::product::{Product, ProductValidationError};
use crate::remote::product_api::{ProductSource, RemoteError};
use crate::repo::product_repo::{
    BatchInsertReport, MergePolicy, ProductRepository, RepoError, SqliteProductRepository,
};
use log::{debug, error, info};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

/// Name given to every record created through [`ProductFeed::add_product`].
const ADDED_PRODUCT_NAME: &str = "Coffee";

pub type FeedResult<T> = Result<T, FeedError>;

/// Failure of a feed operation.
#[derive(Debug)]
pub enum FeedError {
    Repo(RepoError),
    Db(DbError),
    Remote(RemoteError),
    InvalidRemoteRecord(ProductValidationError),
    OffsetOutOfRange { offset: usize, len: usize },
    ImportTask(String),
}

impl Display for FeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Remote(err) => write!(f, "{err}"),
            Self::InvalidRemoteRecord(err) => write!(f, "invalid remote record: {err}"),
            Self::OffsetOutOfRange { offset, len } => {
                write!(f, "offset {offset} is out of range for {len} products")
            }
            Self::ImportTask(message) => write!(f, "import task failed: {message}"),
        }
    }
}

impl Error for FeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Remote(err) => Some(err),
            Self::InvalidRemoteRecord(err) => Some(err),
            Self::OffsetOutOfRange { .. } | Self::ImportTask(_) => None,
        }
    }
}

impl From<RepoError> for FeedError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for FeedError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RemoteError> for FeedError {
    fn from(value: RemoteError) -> Self {
        Self::Remote(value)
    }
}

/// Pre/post notification contract for feed mutations.
///
/// `will_change` is delivered before a mutation is applied; the snapshot
/// visible at that point is the stale one. `did_change` is delivered after
/// the snapshot has been refreshed from the store.
pub trait FeedObserver: Send + Sync {
    fn will_change(&self);
    fn did_change(&self);
}

/// In-memory, sorted-by-name mirror of the persistent catalog.
pub struct ProductFeed {
    store: Store,
    products: Vec<Product>,
    observers: Vec<Arc<dyn FeedObserver>>,
}

impl ProductFeed {
    /// Creates a feed over the store and loads the initial snapshot.
    pub fn new(store: Store) -> FeedResult<Self> {
        let mut feed = Self {
            store,
            products: Vec::new(),
            observers: Vec::new(),
        };
        feed.reload_snapshot()?;
        Ok(feed)
    }

    /// Registers an observer for the pre/post notification contract.
    pub fn add_observer(&mut self, observer: Arc<dyn FeedObserver>) {
        self.observers.push(observer);
    }

    /// Current snapshot, ordered by name ascending.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Re-runs the sorted query and replaces the snapshot, notifying
    /// observers before and after.
    pub fn refetch(&mut self) -> FeedResult<()> {
        self.notify_will_change();
        self.reload_snapshot()?;
        self.notify_did_change();
        Ok(())
    }

    /// Inserts one fixed-name record with a fresh serial code and persists
    /// it immediately. The snapshot grows by exactly one record.
    pub fn add_product(&mut self) -> FeedResult<Product> {
        let product = Product::new(ADDED_PRODUCT_NAME);

        self.notify_will_change();
        let repo = SqliteProductRepository::new(self.store.connection());
        repo.insert_product(&product)?;
        self.reload_snapshot()?;
        self.notify_did_change();

        debug!(
            "event=product_add module=feed status=ok serial_code={}",
            product.serial_code
        );
        Ok(product)
    }

    /// Deletes the records at the given offsets of the current snapshot.
    ///
    /// Offsets are validated up front; any out-of-range offset fails the
    /// whole operation before anything is deleted. Duplicate offsets count
    /// once. Returns the number of records removed.
    pub fn delete_products(&mut self, offsets: &[usize]) -> FeedResult<usize> {
        let len = self.products.len();
        for &offset in offsets {
            if offset >= len {
                return Err(FeedError::OffsetOutOfRange { offset, len });
            }
        }
        let unique: BTreeSet<usize> = offsets.iter().copied().collect();

        self.notify_will_change();
        let repo = SqliteProductRepository::new(self.store.connection());
        for &offset in &unique {
            repo.delete_product(&self.products[offset].serial_code)?;
        }
        let removed = unique.len();
        self.reload_snapshot()?;
        self.notify_did_change();

        debug!("event=product_delete module=feed status=ok removed={removed}");
        Ok(removed)
    }

    /// Fetches the full catalog from `source` and batch-inserts it under
    /// [`MergePolicy::IncomingWins`], then refreshes the snapshot.
    ///
    /// The batch insert runs on a background connection inside a blocking
    /// task; completion is observed by awaiting it, so the refresh and its
    /// notifications always run on the caller's task.
    pub async fn import_products<S: ProductSource>(
        &mut self,
        source: &S,
    ) -> FeedResult<BatchInsertReport> {
        let started_at = Instant::now();
        info!("event=import module=feed status=start");

        let records = match source.fetch_all().await {
            Ok(records) => records,
            Err(err) => {
                error!("event=import module=feed status=error stage=fetch error={err}");
                return Err(err.into());
            }
        };

        let mut incoming = Vec::with_capacity(records.len());
        for record in records {
            incoming.push(Product::try_from(record).map_err(FeedError::InvalidRemoteRecord)?);
        }

        let background = self.store.background_connection()?;
        let report = tokio::task::spawn_blocking(move || {
            let repo = SqliteProductRepository::new(&background);
            repo.batch_insert(&incoming, MergePolicy::IncomingWins)
        })
        .await
        .map_err(|err| FeedError::ImportTask(err.to_string()))??;

        self.refetch()?;

        info!(
            "event=import module=feed status=ok received={} applied={} duration_ms={}",
            report.received,
            report.applied,
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }

    fn reload_snapshot(&mut self) -> FeedResult<()> {
        let repo = SqliteProductRepository::new(self.store.connection());
        self.products = repo.list_products()?;
        Ok(())
    }

    fn notify_will_change(&self) {
        for observer in &self.observers {
            observer.will_change();
        }
    }

    fn notify_did_change(&self) {
        for observer in &self.observers {
            observer.did_change();
        }
    }
}
