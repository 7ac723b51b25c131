//! Development kitchen listener.
//!
//! Accepts orders on `KIOSK_KITCHEN_HOST:KIOSK_KITCHEN_PORT` (default `0.0.0.0:9999`), logs
//! each one and answers `success`. Set `KITCHEN_REJECT_MESSAGE` to answer `error` with that
//! message instead.

use kiosk_order::config::{ENV_KITCHEN_HOST, ENV_KITCHEN_PORT};
use kiosk_order::kitchen::{KitchenListener, KitchenReply};
use kiosk_order::lifecycle::setup_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let host = std::env::var(ENV_KITCHEN_HOST).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var(ENV_KITCHEN_PORT).unwrap_or_else(|_| "9999".to_string());
    let reject = std::env::var("KITCHEN_REJECT_MESSAGE").ok();

    let listener = KitchenListener::bind(format!("{host}:{port}"))
        .await
        .map_err(|e| format!("cannot listen on {host}:{port}: {e}"))?
        .with_policy(move |order| match &reject {
            Some(message) => KitchenReply::rejected("error", message.clone()),
            None => KitchenReply::success(format!("주문 {}번 접수", order.order_number().0)),
        });

    let mut running = listener.spawn().map_err(|e| e.to_string())?;
    info!(addr = %running.addr(), "Waiting for orders");

    while let Some(order) = running.next_order().await {
        for line in order.lines() {
            info!(
                order_number = %order.order_number(),
                item = %line.name,
                quantity = line.quantity,
                "Ticket line"
            );
        }
        if !order.kitchen_info().special_instructions.is_empty() {
            info!(
                order_number = %order.order_number(),
                note = %order.kitchen_info().special_instructions,
                priority = ?order.kitchen_info().priority,
                "Ticket note"
            );
        }
    }

    Ok(())
}
