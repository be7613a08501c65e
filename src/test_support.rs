use std::{
    collections::HashMap,
    io,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{
    catalog::Catalog,
    domain::{LineItem, Product, Stock},
    errors::{CatalogError, StorageError},
    notifications::Notifier,
    storage::KeyValueStore,
};

pub fn line_item(id: u64, amount: u32) -> LineItem {
    LineItem {
        id,
        amount,
        attributes: Map::new(),
    }
}

/// Catalog backed by maps; unknown ids answer 404.
#[derive(Default)]
pub struct FakeCatalog {
    stock: Mutex<HashMap<u64, i64>>,
    products: Mutex<HashMap<u64, Value>>,
    product_calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn new() -> Self {
        FakeCatalog::default()
    }

    pub fn set_stock(&self, product_id: u64, amount: i64) {
        self.stock.lock().unwrap().insert(product_id, amount);
    }

    pub fn set_product(&self, product_id: u64, product: Value) {
        self.products.lock().unwrap().insert(product_id, product);
    }

    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn stock(&self, product_id: u64) -> Result<Stock, CatalogError> {
        // suspend like a real lookup so concurrent operations interleave
        tokio::task::yield_now().await;

        match self.stock.lock().unwrap().get(&product_id) {
            Some(amount) => Ok(Stock { amount: *amount }),
            None => Err(CatalogError::Status {
                path: format!("stock/{}", product_id),
                status: 404,
            }),
        }
    }

    async fn product(&self, product_id: u64) -> Result<Product, CatalogError> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);

        let found = self.products.lock().unwrap().get(&product_id).cloned();
        match found.and_then(|value| serde_json::from_value(value).ok()) {
            Some(product) => Ok(product),
            None => Err(CatalogError::Status {
                path: format!("products/{}", product_id),
                status: 404,
            }),
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        RecordingNotifier::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Serves a fixed snapshot and refuses every write.
pub struct FailingStorage {
    snapshot: String,
}

impl FailingStorage {
    pub fn new(cart: Vec<LineItem>) -> Self {
        FailingStorage {
            snapshot: serde_json::to_string(&cart).unwrap(),
        }
    }
}

impl KeyValueStore for FailingStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(Some(self.snapshot.clone()))
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only storage").into())
    }
}
