mod common;

use common::{quantity, request, system, system_with};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use stock_saga::clients::ActorClient;
use stock_saga::model::{OrderStatus, OrderUpdate};
use stock_saga::notify::{InMemoryChannel, Topic};
use stock_saga::order_actor::OrderError;
use stock_saga::saga::{LedgerError, OrderSaga};

#[tokio::test]
async fn test_satisfiable_order_deducts_each_line() {
    let (system, _) = system(&[("Widget", 10, 0), ("Gadget", 4, 0)]).await;

    let order = system
        .saga
        .place_order(request(&[("Widget", 3), ("Gadget", 4)]))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, 14.0);
    assert_eq!(order.items[0].unit_price, 2.0);
    assert_eq!(quantity(&system, "Widget").await, 7);
    assert_eq!(quantity(&system, "Gadget").await, 0);
    assert_eq!(system.saga.get_order(order.id).await.unwrap(), order);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_low_stock_alert_after_deduction() {
    let (system, channel) = system(&[("Widget", 5, 2)]).await;

    system
        .saga
        .place_order(request(&[("Widget", 3)]))
        .await
        .unwrap();
    assert_eq!(quantity(&system, "Widget").await, 2);

    // LowStockAlert, ORDER_PLACED and NEW_ORDER
    let messages = channel.wait_for(3, Duration::from_secs(1)).await;
    let alert = messages
        .iter()
        .find(|m| m.topic == Topic::InventoryAlerts)
        .expect("low-stock alert");
    assert_eq!(alert.key, "Widget");
    assert_eq!(alert.payload["currentQuantity"], 2);
    assert_eq!(alert.payload["threshold"], 2);

    let placed = messages
        .iter()
        .find(|m| m.topic == Topic::OrderEvents)
        .expect("order event");
    assert_eq!(placed.event_type(), Some("ORDER_PLACED"));
    let analytics = messages
        .iter()
        .find(|m| m.topic == Topic::Analytics)
        .expect("analytics event");
    assert_eq!(analytics.event_type(), Some("NEW_ORDER"));
}

#[tokio::test]
async fn test_short_stock_is_reported_and_nothing_changes() {
    let (system, channel) = system(&[("Widget", 1, 0)]).await;

    let err = system
        .saga
        .place_order(request(&[("Widget", 2)]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        OrderError::StockUnavailable {
            item: "Widget".into(),
            requested: 2,
            available: Some(1),
        }
    );
    assert_eq!(quantity(&system, "Widget").await, 1);
    assert!(system.saga.list_orders().await.unwrap().is_empty());
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(channel.messages().is_empty());
}

#[tokio::test]
async fn test_unknown_item_is_unavailable() {
    let (system, _) = system(&[("Widget", 5, 0)]).await;

    let err = system
        .saga
        .place_order(request(&[("Widget", 1), ("Ghost", 1)]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OrderError::StockUnavailable { ref item, available: None, .. } if item == "Ghost"
    ));
    assert_eq!(quantity(&system, "Widget").await, 5);
}

#[tokio::test]
async fn test_ledger_failure_compensates_and_removes_order() {
    // Each line passes the pre-flight on its own; together they overdraw.
    let (system, _) = system(&[("Widget", 5, 0), ("Gadget", 9, 0)]).await;

    let err = system
        .saga
        .place_order(request(&[("Gadget", 2), ("Widget", 3), ("Widget", 3)]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        OrderError::InventoryFailure(LedgerError::InsufficientStock {
            item: "Widget".into(),
            requested: 3,
            available: 2,
        })
    );
    assert_eq!(quantity(&system, "Widget").await, 5);
    assert_eq!(quantity(&system, "Gadget").await, 9);
    assert!(system.saga.list_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_request_is_rejected_before_stock_is_read() {
    let (system, _) = system(&[("Widget", 5, 0)]).await;

    let err = system
        .saga
        .place_order(request(&[("Widget", 0)]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::Validation(_)));
    assert_eq!(quantity(&system, "Widget").await, 5);
}

#[tokio::test]
async fn test_cancelling_restores_exactly_once() {
    let (system, channel) = system(&[("Widget", 10, 0), ("Gadget", 10, 0)]).await;
    let order = system
        .saga
        .place_order(request(&[("Widget", 4), ("Gadget", 1)]))
        .await
        .unwrap();

    let delivered = system
        .saga
        .update_order(order.id, OrderUpdate::status(OrderStatus::Delivered))
        .await
        .unwrap();
    assert!(delivered.status_changed);
    assert_eq!(quantity(&system, "Widget").await, 6);

    let cancelled = system
        .saga
        .update_order(order.id, OrderUpdate::status(OrderStatus::Cancelled))
        .await
        .unwrap();
    assert!(cancelled.status_changed);
    assert_eq!(cancelled.old_status, OrderStatus::Delivered);
    assert_eq!(cancelled.new_status, OrderStatus::Cancelled);
    assert_eq!(quantity(&system, "Widget").await, 10);
    assert_eq!(quantity(&system, "Gadget").await, 10);

    let again = system
        .saga
        .update_order(order.id, OrderUpdate::status(OrderStatus::Cancelled))
        .await
        .unwrap();
    assert!(!again.status_changed);
    assert_eq!(quantity(&system, "Widget").await, 10);
    assert_eq!(quantity(&system, "Gadget").await, 10);

    // placed (2) + delivered (2) + cancelled (2); the repeat emits nothing
    let messages = channel.wait_for(6, Duration::from_secs(1)).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(channel.messages().len(), 6);
    let change = messages
        .iter()
        .find(|m| {
            m.event_type() == Some("ORDER_STATUS_CHANGED") && m.payload["newStatus"] == "CANCELLED"
        })
        .expect("cancellation event");
    assert_eq!(change.payload["oldStatus"], "DELIVERED");
    assert_eq!(change.payload["status"], "CANCELLED");
}

#[tokio::test]
async fn test_concurrent_cancellations_restore_once() {
    let (system, _) = system(&[("Widget", 10, 0)]).await;
    let order = system
        .saga
        .place_order(request(&[("Widget", 4)]))
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let saga = system.saga.clone();
        tasks.push(tokio::spawn(async move {
            saga.update_order(order.id, OrderUpdate::status(OrderStatus::Cancelled))
                .await
        }));
    }
    let mut changed = 0;
    for task in tasks {
        if task.await.unwrap().unwrap().status_changed {
            changed += 1;
        }
    }

    assert_eq!(changed, 1);
    assert_eq!(quantity(&system, "Widget").await, 10);
}

#[tokio::test]
async fn test_cancelled_order_cannot_be_revived() {
    let (system, _) = system(&[("Widget", 10, 0)]).await;
    let order = system
        .saga
        .place_order(request(&[("Widget", 4)]))
        .await
        .unwrap();
    system
        .saga
        .update_order(order.id, OrderUpdate::status(OrderStatus::Cancelled))
        .await
        .unwrap();

    let err = system
        .saga
        .update_order(order.id, OrderUpdate::status(OrderStatus::Pending))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        OrderError::InvalidTransition {
            from: OrderStatus::Cancelled,
            to: OrderStatus::Pending,
        }
    );
    assert_eq!(quantity(&system, "Widget").await, 10);
}

#[tokio::test]
async fn test_address_only_update_keeps_status_and_emits_nothing() {
    let (system, channel) = system(&[("Widget", 10, 0)]).await;
    let order = system
        .saga
        .place_order(request(&[("Widget", 1)]))
        .await
        .unwrap();
    channel.wait_for(2, Duration::from_secs(1)).await;

    let mut address = common::address();
    address.city = "Shelbyville".into();
    let outcome = system
        .saga
        .update_order(
            order.id,
            OrderUpdate {
                status: None,
                delivery_address: Some(address),
            },
        )
        .await
        .unwrap();

    assert!(!outcome.status_changed);
    assert_eq!(outcome.order.status, OrderStatus::Pending);
    assert_eq!(outcome.order.delivery_address.city, "Shelbyville");
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(channel.messages().len(), 2);
}

#[tokio::test]
async fn test_update_of_unknown_order_is_not_found() {
    let (system, _) = system(&[]).await;
    let id = stock_saga::model::OrderId::new();
    let err = system
        .saga
        .update_order(id, OrderUpdate::status(OrderStatus::Cancelled))
        .await
        .unwrap_err();
    assert_eq!(err, OrderError::NotFound(id.to_string()));
}

#[tokio::test]
async fn test_delete_order_leaves_stock_alone() {
    let (system, _) = system(&[("Widget", 10, 0)]).await;
    let order = system
        .saga
        .place_order(request(&[("Widget", 4)]))
        .await
        .unwrap();

    system.saga.delete_order(order.id).await.unwrap();
    assert!(system.orders.get(order.id).await.unwrap().is_none());
    assert_eq!(quantity(&system, "Widget").await, 6);
}

#[tokio::test]
async fn test_racing_orders_never_overdraw() {
    let (system, _) = system(&[("Widget", 10, 0)]).await;

    let mut tasks = Vec::new();
    for _ in 0..12 {
        let saga = system.saga.clone();
        tasks.push(tokio::spawn(async move {
            saga.place_order(request(&[("Widget", 3)])).await
        }));
    }
    let mut placed = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => placed += 1,
            Err(OrderError::StockUnavailable { .. }) | Err(OrderError::InventoryFailure(_)) => {}
            Err(other) => panic!("unexpected failure: {other:?}"),
        }
    }

    assert_eq!(placed, 3);
    assert_eq!(quantity(&system, "Widget").await, 1);
    assert_eq!(system.saga.list_orders().await.unwrap().len(), 3);
}

/// Cancels every live order it can see until told to stop.
fn spawn_canceller(saga: OrderSaga, stop: Arc<AtomicBool>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while !stop.load(Ordering::SeqCst) {
            for order in saga.list_orders().await.unwrap_or_default() {
                if order.status != OrderStatus::Cancelled {
                    let _ = saga
                        .update_order(order.id, OrderUpdate::status(OrderStatus::Cancelled))
                        .await;
                }
            }
            tokio::task::yield_now().await;
        }
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cancel_racing_a_failed_placement_returns_nothing_extra() {
    for _ in 0..100 {
        let (system, _) = system(&[("Widget", 5, 0)]).await;
        let stop = Arc::new(AtomicBool::new(false));
        let canceller = spawn_canceller(system.saga.clone(), stop.clone());

        // Each line fits on its own, the pair does not.
        let result = system
            .saga
            .place_order(request(&[("Widget", 3), ("Widget", 3)]))
            .await;
        stop.store(true, Ordering::SeqCst);
        canceller.await.unwrap();

        assert!(
            matches!(result, Err(OrderError::InventoryFailure(_))),
            "got {result:?}"
        );
        assert_eq!(quantity(&system, "Widget").await, 5);
        assert!(system.saga.list_orders().await.unwrap().is_empty());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cancel_racing_a_placement_sees_its_stock_taken() {
    for _ in 0..100 {
        let (system, _) = system(&[("Widget", 5, 0)]).await;
        let stop = Arc::new(AtomicBool::new(false));
        let canceller = spawn_canceller(system.saga.clone(), stop.clone());

        let placed = system
            .saga
            .place_order(request(&[("Widget", 3)]))
            .await
            .unwrap();
        stop.store(true, Ordering::SeqCst);
        canceller.await.unwrap();

        assert_eq!(placed.status, OrderStatus::Pending);
        let stored = system.saga.get_order(placed.id).await.unwrap();
        let expected = match stored.status {
            OrderStatus::Cancelled => 5,
            _ => 2,
        };
        assert_eq!(quantity(&system, "Widget").await, expected);
    }
}

#[tokio::test]
async fn test_broken_channel_does_not_affect_orders() {
    let channel = Arc::new(InMemoryChannel::failing());
    let system = system_with(&[("Widget", 5, 2)], channel.clone()).await;

    let order = system
        .saga
        .place_order(request(&[("Widget", 4)]))
        .await
        .unwrap();
    let outcome = system
        .saga
        .update_order(order.id, OrderUpdate::status(OrderStatus::Cancelled))
        .await
        .unwrap();

    assert!(outcome.status_changed);
    assert_eq!(quantity(&system, "Widget").await, 5);
    assert!(channel.messages().is_empty());
}

#[tokio::test]
async fn test_stalled_channel_does_not_stall_orders() {
    let channel = Arc::new(InMemoryChannel::stalled());
    let system = system_with(&[("Widget", 5, 2)], channel).await;

    let placed = tokio::time::timeout(
        Duration::from_secs(1),
        system.saga.place_order(request(&[("Widget", 4)])),
    )
    .await
    .expect("order must not wait on notifications");
    assert!(placed.is_ok());
    assert_eq!(quantity(&system, "Widget").await, 1);
}

#[tokio::test]
async fn test_orders_are_listed_newest_first() {
    let (system, _) = system(&[("Widget", 10, 0)]).await;
    let first = system.saga.place_order(request(&[("Widget", 1)])).await.unwrap();
    let second = system.saga.place_order(request(&[("Widget", 1)])).await.unwrap();

    let ids: Vec<_> = system
        .saga
        .list_orders()
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn test_sweep_and_summary() {
    let (system, channel) = system(&[("Widget", 5, 2), ("Gadget", 0, 3), ("Bolt", 100, 10)]).await;

    let low = system.monitor.scan_all().await.unwrap();
    assert_eq!(
        low.iter().map(|i| i.item_name.as_str()).collect::<Vec<_>>(),
        vec!["Gadget"]
    );
    assert_eq!(channel.wait_for(1, Duration::from_secs(1)).await.len(), 1);

    let summary = system.monitor.summary().await.unwrap();
    assert_eq!(summary.total_items, 3);
    assert_eq!(summary.low_stock_count, 1);
    assert_eq!(summary.out_of_stock_count, 1);
    assert_eq!(summary.healthy_stock_count, 2);
}

#[tokio::test]
async fn test_duplicate_item_name_is_rejected() {
    let (system, _) = system(&[("Widget", 5, 2)]).await;
    let err = system
        .inventory
        .create_item(stock_saga::model::InventoryItemCreate::new(
            "Widget", 1, 0, "pcs", 1.0, "parts",
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        stock_saga::inventory_actor::InventoryError::AlreadyExists("Widget".into())
    );
    assert_eq!(quantity(&system, "Widget").await, 5);
}
