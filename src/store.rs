use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{event, Level};

use crate::{
    catalog::Catalog,
    domain::{CartState, LineItem},
    errors::CartError,
    notifications::{CartNotice, Notifier},
    storage::KeyValueStore,
};

pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Session-scoped cart.
///
/// Every mutation computes a whole new `CartState`, writes it to storage and
/// only then installs it. Decisions are taken against the snapshot read when
/// the operation starts, so two operations racing on the same product can
/// overwrite each other (last writer wins).
pub struct CartStore {
    cart: ArcSwap<CartState>,
    catalog: Arc<dyn Catalog + Send + Sync>,
    storage: Arc<dyn KeyValueStore + Send + Sync>,
    notifier: Arc<dyn Notifier + Send + Sync>,
}

enum AddFailure {
    OutOfStock,
    Failed(CartError),
}

impl CartStore {
    /// Loads the persisted snapshot, or starts empty when there is none.
    /// A malformed snapshot is returned as an error.
    pub fn new(
        catalog: Arc<dyn Catalog + Send + Sync>,
        storage: Arc<dyn KeyValueStore + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
    ) -> Result<Self, CartError> {
        let cart: CartState = match storage.get_item(CART_STORAGE_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };

        event!(Level::DEBUG, items = cart.len(), "cart restored");

        Ok(CartStore {
            cart: ArcSwap::from_pointee(cart),
            catalog: catalog,
            storage: storage,
            notifier: notifier,
        })
    }

    pub fn cart(&self) -> Arc<CartState> {
        self.cart.load_full()
    }

    pub async fn add_product(&self, product_id: u64) -> Result<(), CartNotice> {
        match self.try_add_product(product_id).await {
            Ok(()) => Ok(()),
            Err(AddFailure::OutOfStock) => Err(self.notify(CartNotice::OutOfStock)),
            Err(AddFailure::Failed(e)) => {
                event!(Level::WARN, product_id, "Error occurred while adding product: {}", e);
                Err(self.notify(CartNotice::AddFailed))
            }
        }
    }

    async fn try_add_product(&self, product_id: u64) -> Result<(), AddFailure> {
        let snapshot = self.cart();

        let stock = self
            .catalog
            .stock(product_id)
            .await
            .map_err(|e| AddFailure::Failed(e.into()))?;

        let new_cart = match snapshot.iter().find(|item| item.id == product_id) {
            Some(existing) if i64::from(existing.amount) >= stock.amount => {
                return Err(AddFailure::OutOfStock);
            }
            Some(_) => snapshot
                .iter()
                .map(|item| {
                    if item.id == product_id {
                        item.with_amount(item.amount + 1)
                    } else {
                        item.clone()
                    }
                })
                .collect(),
            None => {
                let product = self
                    .catalog
                    .product(product_id)
                    .await
                    .map_err(|e| AddFailure::Failed(e.into()))?;

                let mut new_cart = snapshot.as_ref().clone();
                new_cart.push(LineItem::from_product(product));
                new_cart
            }
        };

        self.commit(new_cart).map_err(AddFailure::Failed)
    }

    pub fn remove_product(&self, product_id: u64) -> Result<(), CartNotice> {
        let snapshot = self.cart();

        if !snapshot.iter().any(|item| item.id == product_id) {
            event!(Level::DEBUG, product_id, "product to remove is not in the cart");
            return Err(self.notify(CartNotice::RemoveFailed));
        }

        let new_cart: CartState = snapshot
            .iter()
            .filter(|item| item.id != product_id)
            .cloned()
            .collect();

        self.commit(new_cart).map_err(|e| {
            event!(Level::WARN, product_id, "Error occurred while removing product: {}", e);
            self.notify(CartNotice::RemoveFailed)
        })
    }

    /// Sets the amount of a product already in the cart. Amounts below 1 are
    /// ignored without any notification.
    pub async fn update_product_amount(
        &self,
        product_id: u64,
        amount: i64,
    ) -> Result<(), CartNotice> {
        let snapshot = self.cart();

        let stock = match self.catalog.stock(product_id).await {
            Ok(stock) => stock,
            Err(e) => {
                event!(
                    Level::WARN,
                    product_id,
                    "Error occurred while updating product amount: {}",
                    e
                );
                return Err(self.notify(CartNotice::UpdateFailed));
            }
        };

        if amount < 1 {
            return Ok(());
        }

        if amount > stock.amount {
            return Err(self.notify(CartNotice::OutOfStock));
        }

        let amount = match u32::try_from(amount) {
            Ok(amount) => amount,
            Err(e) => {
                event!(
                    Level::WARN,
                    product_id,
                    "Error occurred while updating product amount: {}",
                    e
                );
                return Err(self.notify(CartNotice::UpdateFailed));
            }
        };

        let new_cart: CartState = snapshot
            .iter()
            .map(|item| {
                if item.id == product_id {
                    item.with_amount(amount)
                } else {
                    item.clone()
                }
            })
            .collect();

        self.commit(new_cart).map_err(|e| {
            event!(Level::WARN, product_id, "Error occurred while updating product amount: {}", e);
            self.notify(CartNotice::UpdateFailed)
        })
    }

    fn commit(&self, new_cart: CartState) -> Result<(), CartError> {
        let raw = serde_json::to_string(&new_cart)?;
        self.storage.set_item(CART_STORAGE_KEY, &raw)?;

        event!(Level::TRACE, items = new_cart.len(), "cart committed");
        self.cart.store(Arc::new(new_cart));
        Ok(())
    }

    fn notify(&self, notice: CartNotice) -> CartNotice {
        self.notifier.error(notice.message());
        notice
    }
}
