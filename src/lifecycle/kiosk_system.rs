use crate::config::KioskConfig;
use crate::coordinator::OrderCoordinator;
use crate::kitchen::{KitchenDispatcher, KitchenLink, KitchenNotices};
use crate::order_log::{self, OrderLogClient, OrderLogError, OrderLogFile};
use std::sync::Arc;
use tracing::{error, info};

/// One running kiosk terminal: the order log actor, the coordinator and its notice channel.
///
/// # Example
///
/// ```ignore
/// let mut system = KioskSystem::start(&KioskConfig::from_env()?).await?;
///
/// system.coordinator.add_item(&MenuItem::new("콜라", 3000, "🥤"));
/// let outcome = system.coordinator.checkout(CheckoutRequest::default()).await;
///
/// if let Some(notice) = system.notices.recv().await {
///     system.coordinator.settle(&notice);
/// }
///
/// system.shutdown().await?;
/// ```
pub struct KioskSystem {
    /// The session's coordinator (owns the cart).
    pub coordinator: OrderCoordinator,

    /// Dispatch outcomes, to be drained by the foreground loop.
    pub notices: KitchenNotices,

    /// Reporting access to the order log.
    pub order_log: OrderLogClient,

    /// Task handle of the order log actor (used for graceful shutdown).
    handle: tokio::task::JoinHandle<()>,
}

impl KioskSystem {
    /// Loads the order log, starts its actor and wires the coordinator to the kitchen.
    ///
    /// Fails only if the existing log cannot be read.
    pub async fn start(config: &KioskConfig) -> Result<Self, OrderLogError> {
        let (log_actor, order_log) = order_log::open(OrderLogFile::new(&config.order_log_path)).await?;
        let handle = tokio::spawn(log_actor.run());

        let kitchen = config.kitchen.clone().map(|kitchen| {
            info!(kitchen = %kitchen.address(), timeout_ms = kitchen.timeout.as_millis() as u64, "Kitchen dispatch enabled");
            Arc::new(KitchenDispatcher::new(kitchen)) as Arc<dyn KitchenLink>
        });
        if kitchen.is_none() {
            info!("Kitchen dispatch disabled, checkout is local-only");
        }

        let (coordinator, notices) = OrderCoordinator::new(order_log.clone(), kitchen);
        let coordinator = coordinator.with_default_order_type(config.default_order_type);

        Ok(Self {
            coordinator,
            notices,
            order_log,
            handle,
        })
    }

    /// Waits for in-flight dispatches, then stops the order log actor.
    ///
    /// Dropping every log client closes the actor's channel; the actor then finishes its
    /// loop and the task completes.
    pub async fn shutdown(mut self) -> Result<(), String> {
        info!("Shutting down kiosk...");

        self.coordinator.wait_for_dispatches().await;
        drop(self.coordinator);
        drop(self.order_log);
        drop(self.notices);

        if let Err(e) = self.handle.await {
            error!("Order log task failed: {:?}", e);
            return Err(format!("Order log task failed: {:?}", e));
        }

        info!("Kiosk shutdown complete.");
        Ok(())
    }
}
