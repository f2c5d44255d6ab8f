//! Simulated remote catalog endpoint.
//!
//! # Responsibility
//! - Define the wire record and async source contract for imports.
//! - Ship a stub source that answers with a fixed catalog after a delay.
//!
//! # Invariants
//! - Wire records carry exactly the keys `name` and `serialCode`.
//! - The stub is one-shot and always succeeds; there is no retry.

use crate::model::product::{Product, ProductValidationError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::time::Duration;

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failure reported by a product source.
///
/// The stub never produces one, but real sources surface their transport
/// errors here and the feed propagates them to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    Unavailable(String),
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "remote source unavailable: {message}"),
        }
    }
}

impl Error for RemoteError {}

/// One record of the remote payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProduct {
    pub name: String,
    pub serial_code: String,
}

impl TryFrom<RemoteProduct> for Product {
    type Error = ProductValidationError;

    fn try_from(value: RemoteProduct) -> Result<Self, Self::Error> {
        Product::with_serial_code(value.serial_code, value.name)
    }
}

/// Asynchronous source of catalog records.
///
/// The seam that lets tests drive imports with an instant payload.
pub trait ProductSource {
    fn fetch_all(&self) -> impl Future<Output = RemoteResult<Vec<RemoteProduct>>> + Send;
}

/// Stub source simulating a network fetch of the full catalog.
///
/// Returns the same three records on every call, after `delay` has elapsed.
#[derive(Debug, Clone)]
pub struct StubProductApi {
    delay: Duration,
}

impl StubProductApi {
    /// Creates the stub with its production-like one second delay.
    pub fn new() -> Self {
        Self::with_delay(Duration::from_secs(1))
    }

    /// Creates the stub with a caller-chosen delay. Tests pass
    /// `Duration::ZERO` for instant answers.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    fn fixed_catalog() -> Vec<RemoteProduct> {
        vec![
            RemoteProduct {
                name: "Cafe Latte".to_string(),
                serial_code: "coffee-1".to_string(),
            },
            RemoteProduct {
                name: "Cappuchino".to_string(),
                serial_code: "coffee-2".to_string(),
            },
            RemoteProduct {
                name: "Flat White".to_string(),
                serial_code: "coffee-3".to_string(),
            },
        ]
    }
}

impl Default for StubProductApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductSource for StubProductApi {
    fn fetch_all(&self) -> impl Future<Output = RemoteResult<Vec<RemoteProduct>>> + Send {
        let delay = self.delay;
        async move {
            tokio::time::sleep(delay).await;
            Ok(Self::fixed_catalog())
        }
    }
}
