//! # Order Saga
//!
//! Sequences order persistence, stock movements and notifications.
//!
//! ## Placing an order
//!
//! ```text
//! validate -> check stock -> persist PENDING -> ledger.deduct -> publish
//!                                                   |
//!                                      on failure: delete the order
//! ```
//!
//! No order row survives a failed deduction. A failure before the order is
//! persisted leaves nothing behind at all. The order's lock is taken before
//! it is persisted, so updates only ever see it once its stock is settled.
//!
//! ## Updating an order
//!
//! A move into `CANCELLED` from any other status restores the order's lines
//! before the status is written; if the restore fails nothing is written.
//! Updates to the same order are serialized, so stock comes back once however
//! many cancellations race.

use super::checker::{Availability, AvailabilityChecker};
use super::ledger::InventoryLedger;
use crate::clients::{ActorClient, OrderClient};
use crate::model::{
    Order, OrderCreate, OrderId, OrderRequest, OrderStatus, OrderUpdate, OrderUpdateOutcome,
};
use crate::notify::NotificationPublisher;
use crate::order_actor::OrderError;
use crate::saga::LedgerError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;
use tracing::{error, info, instrument, warn};

type LockTable = Arc<Mutex<HashMap<OrderId, Arc<tokio::sync::Mutex<()>>>>>;

/// One async lock per order id, created on demand and dropped when unused.
#[derive(Clone, Default)]
struct OrderLocks {
    table: LockTable,
}

impl OrderLocks {
    async fn acquire(&self, id: OrderId) -> OrderLockGuard {
        let lock = {
            let mut table = self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            Arc::clone(table.entry(id).or_default())
        };
        OrderLockGuard {
            id,
            guard: Some(lock.lock_owned().await),
            table: Arc::clone(&self.table),
        }
    }
}

struct OrderLockGuard {
    id: OrderId,
    guard: Option<OwnedMutexGuard<()>>,
    table: LockTable,
}

impl Drop for OrderLockGuard {
    fn drop(&mut self) {
        self.guard.take();
        let mut table = self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if table.get(&self.id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            table.remove(&self.id);
        }
    }
}

#[derive(Clone)]
pub struct OrderSaga {
    orders: OrderClient,
    checker: AvailabilityChecker,
    ledger: InventoryLedger,
    publisher: NotificationPublisher,
    locks: OrderLocks,
}

impl OrderSaga {
    pub fn new(
        orders: OrderClient,
        checker: AvailabilityChecker,
        ledger: InventoryLedger,
        publisher: NotificationPublisher,
    ) -> Self {
        Self {
            orders,
            checker,
            ledger,
            publisher,
            locks: OrderLocks::default(),
        }
    }

    #[instrument(skip(self, request), fields(customer_id = %request.customer_id))]
    pub async fn place_order(&self, request: OrderRequest) -> Result<Order, OrderError> {
        request.validate()?;

        let availability = self
            .checker
            .check(&request.items)
            .await
            .map_err(|e| OrderError::Storage(format!("stock check failed: {e}")))?;
        let lines = match availability {
            Availability::Available { lines } => lines,
            Availability::Unavailable {
                item_name,
                requested,
                available,
            } => {
                warn!(item = %item_name, requested, ?available, "Stock unavailable");
                return Err(OrderError::StockUnavailable {
                    item: item_name,
                    requested,
                    available,
                });
            }
        };

        // Updates to this order wait until its stock is settled.
        let create = OrderCreate::new(request.customer_id, lines, request.delivery_address);
        let guard = self.locks.acquire(create.id).await;

        let order = self.orders.create_order(create).await?;
        info!(order_id = %order.id, "Order persisted as PENDING");

        if let Err(failure) = self.ledger.deduct(&request.items).await {
            return Err(self.discard_order(order.id, failure).await);
        }
        drop(guard);
        info!(order_id = %order.id, total = order.total_amount, "Order placed");

        self.publisher.order_placed(&order);
        Ok(order)
    }

    /// Removes an order whose stock could not be taken, and picks the error
    /// the caller sees.
    async fn discard_order(&self, id: OrderId, failure: LedgerError) -> OrderError {
        let deleted = self.orders.delete(id).await;
        match (failure, deleted) {
            (failure @ LedgerError::CompensationFailed { .. }, deleted) => {
                if let Err(e) = &deleted {
                    error!(order_id = %id, error = %e, "Order removal failed, manual intervention required");
                }
                OrderError::CompensationFailure(format!("order {id}: {failure}"))
            }
            (failure, Ok(())) => {
                warn!(order_id = %id, error = %failure, "Order removed after inventory failure");
                OrderError::InventoryFailure(failure)
            }
            (failure, Err(e)) => {
                error!(
                    order_id = %id,
                    error = %e,
                    cause = %failure,
                    "Order removal failed, manual intervention required"
                );
                OrderError::CompensationFailure(format!(
                    "order {id} left in place after inventory failure ({failure}): {e}"
                ))
            }
        }
    }

    #[instrument(skip(self, changes))]
    pub async fn update_order(
        &self,
        id: OrderId,
        changes: OrderUpdate,
    ) -> Result<OrderUpdateOutcome, OrderError> {
        if let Some(address) = &changes.delivery_address {
            address.validate()?;
        }

        let guard = self.locks.acquire(id).await;

        let current = self
            .orders
            .get(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))?;
        let old_status = current.status;
        let new_status = changes.status.unwrap_or(old_status);
        if !old_status.can_transition_to(new_status) {
            return Err(OrderError::InvalidTransition {
                from: old_status,
                to: new_status,
            });
        }

        let cancelling = new_status == OrderStatus::Cancelled && old_status != OrderStatus::Cancelled;
        let restored = if cancelling {
            Some(self.ledger.restore(&current.line_items()).await?)
        } else {
            None
        };

        let order = match self.orders.update_order(id, changes).await {
            Ok(order) => order,
            Err(e) => {
                if let Some(report) = restored {
                    // Status was not written, so the stock goes back out.
                    if let Err(undo) = self.ledger.deduct(&report.restored).await {
                        error!(order_id = %id, error = %undo, "Undoing restore failed, manual intervention required");
                        return Err(OrderError::CompensationFailure(format!(
                            "order {id} not cancelled ({e}) but its stock stayed restored: {undo}"
                        )));
                    }
                }
                return Err(e);
            }
        };
        drop(guard);

        let status_changed = old_status != new_status;
        if status_changed {
            info!(order_id = %id, from = %old_status, to = %new_status, "Order status changed");
            self.publisher.status_changed(&order, old_status, new_status);
        }

        Ok(OrderUpdateOutcome {
            order,
            status_changed,
            old_status,
            new_status,
        })
    }

    pub async fn get_order(&self, id: OrderId) -> Result<Order, OrderError> {
        self.orders
            .get(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    /// All orders, newest first.
    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.orders.list().await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    /// Removes the order record. Stock is left as it is.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> Result<(), OrderError> {
        let _guard = self.locks.acquire(id).await;
        self.orders.delete(id).await?;
        info!(order_id = %id, "Order deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn table_len(locks: &OrderLocks) -> usize {
        locks.table.lock().unwrap().len()
    }

    #[tokio::test]
    async fn test_same_order_is_serialized() {
        let locks = OrderLocks::default();
        let id = OrderId::new();

        let first = locks.acquire(id).await;
        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(id).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(first);
        contender.await.unwrap();
        assert_eq!(table_len(&locks), 0);
    }

    #[tokio::test]
    async fn test_different_orders_do_not_block() {
        let locks = OrderLocks::default();
        let _a = locks.acquire(OrderId::new()).await;
        let _b = tokio::time::timeout(Duration::from_secs(1), locks.acquire(OrderId::new()))
            .await
            .expect("second order must not wait on the first");
        assert_eq!(table_len(&locks), 2);
    }
}
