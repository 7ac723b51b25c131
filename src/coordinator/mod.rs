//! # Order Coordinator
//!
//! Turns the session's cart into a placed order and hands it to the kitchen.
//!
//! ## Checkout states
//!
//! ```text
//! Idle ──checkout──▶ Checkout ──log flushed──▶ Persisted ──▶ Dispatching ──notice──▶ Settled
//!                       ▲  │
//!                       └──┘ flush failed (PersistenceFailed, cart kept)
//! ```
//!
//! - An empty cart, or one whose total is zero, is refused without leaving the current state.
//! - Dispatch is only attempted for an order the log has flushed.
//! - The cart is cleared as soon as the order is persisted, whatever the kitchen later says.
//! - `checkout` returns right after spawning the dispatch. The outcome arrives on the
//!   [`KitchenNotices`](crate::kitchen::KitchenNotices) channel; the foreground loop passes
//!   each notice to [`OrderCoordinator::settle`].
//!
//! Without a kitchen link the coordinator runs local-only: it stops at `Persisted` and
//! produces no notices.

pub mod error;

pub use error::*;

use crate::kitchen::{notice_channel, spawn_dispatch, DispatchNotice, Disposition, KitchenLink, KitchenNotices, NoticeSender};
use crate::model::{CartStore, KitchenInfo, MenuItem, OrderDraft, OrderNumber, OrderType, PaymentMethod};
use crate::order_log::{OrderLogClient, OrderPersistenceError};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Where the current (or most recent) checkout stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    Checkout,
    Persisted(OrderNumber),
    Dispatching(OrderNumber),
    Settled {
        order_number: OrderNumber,
        disposition: Disposition,
    },
}

/// Immediate answer to a checkout call.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// The order is in the durable log under this number.
    Placed(OrderNumber),
    /// Nothing was persisted; the cart is untouched.
    Refused(ValidationError),
    /// The log could not be flushed; the cart is untouched and nothing was dispatched.
    PersistenceFailed(OrderPersistenceError),
}

/// Extra details collected at checkout.
#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest {
    pub kitchen_info: KitchenInfo,
    pub payment_method: Option<PaymentMethod>,
}

pub struct OrderCoordinator {
    cart: CartStore,
    order_type: OrderType,
    default_order_type: OrderType,
    state: CheckoutState,
    order_log: OrderLogClient,
    kitchen: Option<Arc<dyn KitchenLink>>,
    notices: NoticeSender,
    in_flight: Vec<JoinHandle<()>>,
}

impl OrderCoordinator {
    /// Creates a coordinator with an empty cart, plus the receiving end of its notices.
    ///
    /// Pass `None` for `kitchen` to run checkout in local-only mode.
    pub fn new(order_log: OrderLogClient, kitchen: Option<Arc<dyn KitchenLink>>) -> (Self, KitchenNotices) {
        let (notices, receiver) = notice_channel();
        let coordinator = Self {
            cart: CartStore::new(),
            order_type: OrderType::default(),
            default_order_type: OrderType::default(),
            state: CheckoutState::Idle,
            order_log,
            kitchen,
            notices,
            in_flight: Vec::new(),
        };
        (coordinator, receiver)
    }

    /// Sets the order type new sessions start with, and applies it to the current one.
    pub fn with_default_order_type(mut self, order_type: OrderType) -> Self {
        self.default_order_type = order_type;
        self.order_type = order_type;
        self
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Mutable access for the presentation layer.
    pub fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    pub fn add_item(&mut self, item: &MenuItem) {
        self.cart.add(item);
        debug!(name = %item.name, count = self.cart.item_count(), "Added to cart");
    }

    pub fn adjust_quantity(&mut self, name: &str, delta: i64) {
        self.cart.adjust_quantity(name, delta);
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn set_order_type(&mut self, order_type: OrderType) {
        self.order_type = order_type;
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Empties the cart, resets the order type to the session default and returns to `Idle`.
    ///
    /// A dispatch already in flight keeps running.
    pub fn start_new_order(&mut self) {
        self.cart.clear();
        self.order_type = self.default_order_type;
        self.state = CheckoutState::Idle;
    }

    /// Places the cart as an order.
    #[instrument(skip(self, request), fields(order_type = ?self.order_type))]
    pub async fn checkout(&mut self, request: CheckoutRequest) -> CheckoutOutcome {
        if self.cart.is_empty() {
            info!("Checkout refused: empty cart");
            return CheckoutOutcome::Refused(ValidationError::EmptyCart);
        }
        if self.cart.total() == 0 {
            info!("Checkout refused: zero total");
            return CheckoutOutcome::Refused(ValidationError::ZeroTotal);
        }

        self.state = CheckoutState::Checkout;

        let draft = OrderDraft {
            created_at: chrono::Local::now().naive_local(),
            order_type: self.order_type,
            lines: self.cart.snapshot(),
            kitchen_info: request.kitchen_info,
            payment_method: request.payment_method,
        };

        let order = match self.order_log.place(draft).await {
            Ok(order) => order,
            Err(e) => {
                error!(error = %e, "Order not persisted");
                return CheckoutOutcome::PersistenceFailed(e);
            }
        };

        let order_number = order.order_number();
        info!(%order_number, total = order.total(), "Order placed");
        self.state = CheckoutState::Persisted(order_number);
        self.cart.clear();

        if let Some(kitchen) = &self.kitchen {
            self.in_flight.retain(|handle| !handle.is_finished());
            self.in_flight
                .push(spawn_dispatch(kitchen.clone(), order, self.notices.clone()));
            self.state = CheckoutState::Dispatching(order_number);
        }

        CheckoutOutcome::Placed(order_number)
    }

    /// Records a dispatch outcome. Returns `true` if it settled the current checkout.
    ///
    /// Notices for earlier orders are accepted but do not change the state.
    pub fn settle(&mut self, notice: &DispatchNotice) -> bool {
        if self.state != CheckoutState::Dispatching(notice.order_number) {
            debug!(order_number = %notice.order_number, "Notice for an earlier order");
            return false;
        }

        self.state = CheckoutState::Settled {
            order_number: notice.order_number,
            disposition: notice.disposition.clone(),
        };
        true
    }

    /// Waits for every dispatch started by this coordinator to finish.
    pub async fn wait_for_dispatches(&mut self) {
        for handle in self.in_flight.drain(..) {
            if let Err(e) = handle.await {
                warn!(error = %e, "Dispatch task failed");
            }
        }
    }
}
