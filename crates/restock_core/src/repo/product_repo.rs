//! Product repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and batch-insert APIs over `products` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Product::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - `batch_insert` is atomic: either the whole batch applies or none of it.

use crate::db::DbError;
use crate::model::product::{Product, ProductValidationError, SerialCode};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PRODUCT_SELECT_SQL: &str = "SELECT serial_code, name FROM products";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for product persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ProductValidationError),
    Db(DbError),
    NotFound(SerialCode),
    Conflict(SerialCode),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(serial_code) => write!(f, "product not found: {serial_code}"),
            Self::Conflict(serial_code) => {
                write!(f, "product serial code already exists: {serial_code}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::Conflict(_) => None,
        }
    }
}

impl From<ProductValidationError> for RepoError {
    fn from(value: ProductValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Rule for resolving serial-code conflicts during a batch insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Incoming field values overwrite the existing row.
    #[default]
    IncomingWins,
    /// The existing row is kept untouched; the incoming record is dropped.
    ExistingWins,
    /// The first conflict aborts and rolls back the whole batch.
    RejectConflicts,
}

/// Outcome of one batch insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchInsertReport {
    /// Number of records handed to the batch.
    pub received: usize,
    /// Number of rows actually written (inserted or overwritten).
    pub applied: usize,
}

/// Repository interface for product persistence.
pub trait ProductRepository {
    fn insert_product(&self, product: &Product) -> RepoResult<()>;
    fn get_product(&self, serial_code: &str) -> RepoResult<Option<Product>>;
    fn list_products(&self) -> RepoResult<Vec<Product>>;
    fn count_products(&self) -> RepoResult<u64>;
    fn delete_product(&self, serial_code: &str) -> RepoResult<()>;
    fn batch_insert(
        &self,
        products: &[Product],
        policy: MergePolicy,
    ) -> RepoResult<BatchInsertReport>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn insert_product(&self, product: &Product) -> RepoResult<()> {
        product.validate()?;

        let result = self.conn.execute(
            "INSERT INTO products (serial_code, name) VALUES (?1, ?2);",
            params![product.serial_code.as_str(), product.name.as_str()],
        );

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(RepoError::Conflict(product.serial_code.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn get_product(&self, serial_code: &str) -> RepoResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE serial_code = ?1;"))?;

        let mut rows = stmt.query([serial_code])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }

        Ok(None)
    }

    fn list_products(&self) -> RepoResult<Vec<Product>> {
        // serial_code breaks name ties so offsets into the listing stay stable.
        let mut stmt = self.conn.prepare(&format!(
            "{PRODUCT_SELECT_SQL} ORDER BY name ASC, serial_code ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut products = Vec::new();
        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        Ok(products)
    }

    fn count_products(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM products;", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn delete_product(&self, serial_code: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM products WHERE serial_code = ?1;",
            [serial_code],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(serial_code.to_string()));
        }

        Ok(())
    }

    fn batch_insert(
        &self,
        products: &[Product],
        policy: MergePolicy,
    ) -> RepoResult<BatchInsertReport> {
        for product in products {
            product.validate()?;
        }

        let sql = match policy {
            MergePolicy::IncomingWins => {
                "INSERT INTO products (serial_code, name) VALUES (?1, ?2)
                 ON CONFLICT(serial_code) DO UPDATE SET
                    name = excluded.name,
                    updated_at = (strftime('%s', 'now') * 1000);"
            }
            MergePolicy::ExistingWins => {
                "INSERT INTO products (serial_code, name) VALUES (?1, ?2)
                 ON CONFLICT(serial_code) DO NOTHING;"
            }
            MergePolicy::RejectConflicts => {
                "INSERT INTO products (serial_code, name) VALUES (?1, ?2);"
            }
        };

        let tx = self.conn.unchecked_transaction()?;
        let mut applied = 0usize;
        {
            let mut stmt = tx.prepare(sql)?;
            for product in products {
                let result =
                    stmt.execute(params![product.serial_code.as_str(), product.name.as_str()]);
                match result {
                    Ok(changed) => applied += changed,
                    Err(err) if is_unique_violation(&err) => {
                        // Dropping the open transaction rolls the batch back.
                        return Err(RepoError::Conflict(product.serial_code.clone()));
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }
        tx.commit()?;

        Ok(BatchInsertReport {
            received: products.len(),
            applied,
        })
    }
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let product = Product {
        serial_code: row.get("serial_code")?,
        name: row.get("name")?,
    };
    product.validate()?;
    Ok(product)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
    )
}
