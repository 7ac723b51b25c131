//! # Kiosk demo driver
//!
//! Plays one customer through the kiosk: fills a cart, checks out, waits for the kitchen's
//! answer and prints today's totals from the order log.
//!
//! Settings come from the environment, see [`kiosk_order::config`].

use kiosk_order::config::KioskConfig;
use kiosk_order::coordinator::{CheckoutOutcome, CheckoutRequest};
use kiosk_order::lifecycle::{setup_tracing, KioskSystem};
use kiosk_order::model::{KitchenInfo, MenuItem, OrderType, PaymentMethod, Priority};
use std::time::Duration;
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = KioskConfig::from_env().map_err(|e| e.to_string())?;
    info!(order_log = %config.order_log_path.display(), "Starting kiosk");

    let mut system = KioskSystem::start(&config)
        .await
        .map_err(|e| e.to_string())?;

    let steak = MenuItem::new("스테이크", 32000, "🥩");
    let cola = MenuItem::new("콜라", 3000, "🥤");
    let fries = MenuItem::new("감자튀김", 5000, "🍟");

    let coordinator = &mut system.coordinator;
    coordinator.set_order_type(OrderType::TakeOut);
    coordinator.add_item(&steak);
    coordinator.add_item(&steak);
    coordinator.add_item(&cola);
    coordinator.add_item(&fries);
    coordinator.adjust_quantity(&fries.name, -1);
    info!(
        items = coordinator.cart().item_count(),
        total = coordinator.cart().total(),
        "Cart ready"
    );

    let request = CheckoutRequest {
        kitchen_info: KitchenInfo {
            special_instructions: "Steak medium rare".to_string(),
            priority: Priority::Normal,
        },
        payment_method: Some(PaymentMethod::Card),
    };

    let span = tracing::info_span!("checkout_flow");
    let outcome = coordinator.checkout(request).instrument(span).await;

    match outcome {
        CheckoutOutcome::Placed(order_number) => {
            info!(%order_number, "Order placed, cart cleared");
            if let Some(kitchen) = &config.kitchen {
                // Connect, send and receive are each bounded by the kitchen timeout.
                let timeout = kitchen.timeout * 3 + Duration::from_secs(1);
                match tokio::time::timeout(timeout, system.notices.recv()).await {
                    Ok(Some(notice)) => {
                        system.coordinator.settle(&notice);
                        if notice.disposition.is_delivered() {
                            info!(order_number = %notice.order_number, "{}", notice.disposition);
                        } else {
                            warn!(order_number = %notice.order_number, "{}", notice.disposition);
                        }
                    }
                    Ok(None) => warn!("Notice channel closed"),
                    Err(_) => warn!("No dispatch notice received"),
                }
            }
        }
        CheckoutOutcome::Refused(reason) => warn!(%reason, "Checkout refused"),
        CheckoutOutcome::PersistenceFailed(e) => error!(error = %e, "Order could not be saved"),
    }

    match system.order_log.snapshot().await {
        Ok(snapshot) => {
            let today = chrono::Local::now().date_naive();
            let totals = snapshot.totals_on(today);
            let all = snapshot.all_totals();
            info!(
                today_orders = totals.order_count,
                today_revenue = totals.revenue,
                total_orders = all.order_count,
                total_revenue = all.revenue,
                "Order log summary"
            );
            for order in snapshot.recent_orders(5) {
                info!(
                    order_number = %order.order_number(),
                    order_type = ?order.order_type(),
                    total = order.total(),
                    "Recent order"
                );
            }
        }
        Err(e) => error!(error = %e, "Order log unavailable"),
    }

    system.shutdown().await?;
    Ok(())
}
