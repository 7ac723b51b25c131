//! # Order Log Actor
//!
//! The single writer of the order log. It owns the in-memory copy of every order and the
//! durable file, and processes requests one at a time from an mpsc channel.
//!
//! **Concurrency Model**:
//! Because requests are handled sequentially, "compute the next number, then append" is one
//! uninterrupted step inside [`LogRequest::Place`]. Two checkouts racing through cloned
//! clients can never be handed the same order number, and no lock is needed around the log.
//!
//! ## Operations
//!
//! * **Place**: assigns `max + 1`, builds the [`Order`], appends and flushes.
//! * **Append**: appends a pre-numbered order if it is newer than every logged order.
//! * **NextOrderNumber**: peeks at the number the next `Place` would assign.
//! * **Snapshot**: clones the log into a detached [`OrderLogSnapshot`].
//! * **Reload**: replaces the in-memory log with the durable file contents.
//!
//! An append whose flush fails is rolled back in memory, so the log never holds an order
//! the file does not.

use crate::model::{Order, OrderDraft, OrderNumber};
use crate::order_log::{next_order_number, OrderLogClient, OrderLogError, OrderLogFile, OrderLogSnapshot};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

/// Type alias for the one-shot response channel used by the log actor.
pub type Response<T> = oneshot::Sender<Result<T, OrderLogError>>;

/// Requests understood by [`OrderLogActor`].
#[derive(Debug)]
pub enum LogRequest {
    Place {
        draft: OrderDraft,
        respond_to: Response<Order>,
    },
    Append {
        order: Order,
        respond_to: Response<()>,
    },
    NextOrderNumber {
        respond_to: Response<OrderNumber>,
    },
    Snapshot {
        respond_to: Response<OrderLogSnapshot>,
    },
    Reload {
        respond_to: Response<usize>,
    },
}

pub struct OrderLogActor {
    receiver: mpsc::Receiver<LogRequest>,
    file: OrderLogFile,
    orders: Vec<Order>,
}

impl OrderLogActor {
    /// Creates the actor over an already loaded log, plus its client.
    ///
    /// `buffer_size` bounds the number of queued requests; senders wait when it is full.
    pub fn new(buffer_size: usize, file: OrderLogFile, orders: Vec<Order>) -> (Self, OrderLogClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            file,
            orders,
        };
        (actor, OrderLogClient::new(sender))
    }

    /// Runs the request loop until every client has been dropped.
    pub async fn run(mut self) {
        let path = self.file.path().display().to_string();
        info!(%path, size = self.orders.len(), "Order log started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                LogRequest::Place { draft, respond_to } => {
                    debug!(?draft, "Place");
                    let order = Order::new(next_order_number(&self.orders), draft);
                    let result = self.append(order.clone()).await.map(|()| order);
                    let _ = respond_to.send(result);
                }
                LogRequest::Append { order, respond_to } => {
                    debug!(order_number = %order.order_number(), "Append");
                    let _ = respond_to.send(self.append(order).await);
                }
                LogRequest::NextOrderNumber { respond_to } => {
                    let _ = respond_to.send(Ok(next_order_number(&self.orders)));
                }
                LogRequest::Snapshot { respond_to } => {
                    debug!(size = self.orders.len(), "Snapshot");
                    let _ = respond_to.send(Ok(OrderLogSnapshot::new(self.orders.clone())));
                }
                LogRequest::Reload { respond_to } => {
                    let result = match self.file.load().await {
                        Ok(orders) => {
                            self.orders = orders;
                            info!(size = self.orders.len(), "Reloaded");
                            Ok(self.orders.len())
                        }
                        Err(e) => {
                            warn!(error = %e, "Reload failed");
                            Err(e)
                        }
                    };
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(%path, size = self.orders.len(), "Order log shutdown");
    }

    async fn append(&mut self, order: Order) -> Result<(), OrderLogError> {
        if let Some(latest) = self.orders.iter().map(Order::order_number).max() {
            if order.order_number() <= latest {
                warn!(number = %order.order_number(), %latest, "Rejected out-of-order append");
                return Err(OrderLogError::NonMonotonicNumber {
                    number: order.order_number(),
                    latest,
                });
            }
        }

        let order_number = order.order_number();
        let total = order.total();
        self.orders.push(order);

        if let Err(e) = self.file.flush(&self.orders).await {
            self.orders.pop();
            error!(%order_number, error = %e, "Flush failed, order not placed");
            return Err(e);
        }

        info!(%order_number, total, size = self.orders.len(), "Appended");
        Ok(())
    }
}
