//! # Order Log Client
//!
//! Cloneable handle to the [`OrderLogActor`](crate::order_log::OrderLogActor). Each call sends
//! one request and waits on a oneshot channel for the answer.

use crate::model::{Order, OrderDraft, OrderNumber};
use crate::order_log::{LogRequest, OrderLogError, OrderLogSnapshot, Response};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct OrderLogClient {
    sender: mpsc::Sender<LogRequest>,
}

impl OrderLogClient {
    pub fn new(sender: mpsc::Sender<LogRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> LogRequest,
    ) -> Result<T, OrderLogError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| OrderLogError::ActorClosed)?;
        response.await.map_err(|_| OrderLogError::ActorDropped)?
    }

    /// Numbers `draft` and appends it durably in one step.
    ///
    /// Returns the placed order once the log file has been flushed.
    #[instrument(skip(self, draft))]
    pub async fn place(&self, draft: OrderDraft) -> Result<Order, OrderLogError> {
        debug!("Sending request");
        self.request(|respond_to| LogRequest::Place { draft, respond_to })
            .await
    }

    /// Appends an already numbered order.
    #[instrument(skip(self, order), fields(order_number = %order.order_number()))]
    pub async fn append(&self, order: Order) -> Result<(), OrderLogError> {
        debug!("Sending request");
        self.request(|respond_to| LogRequest::Append { order, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn next_order_number(&self) -> Result<OrderNumber, OrderLogError> {
        self.request(|respond_to| LogRequest::NextOrderNumber { respond_to })
            .await
    }

    /// A detached copy of the log as it stands now.
    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<OrderLogSnapshot, OrderLogError> {
        self.request(|respond_to| LogRequest::Snapshot { respond_to })
            .await
    }

    /// Re-reads the durable file into the writer. Returns the number of orders loaded.
    #[instrument(skip(self))]
    pub async fn reload(&self) -> Result<usize, OrderLogError> {
        debug!("Sending request");
        self.request(|respond_to| LogRequest::Reload { respond_to })
            .await
    }
}
