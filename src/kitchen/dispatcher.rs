//! # Kitchen Dispatcher
//!
//! Sends a persisted order to the kitchen listener over a fresh TCP connection and maps the
//! exchange to a [`Disposition`]. Every failure is caught here; nothing but a `Disposition`
//! leaves this module.
//!
//! The configured timeout is applied separately to the connect, to sending the order and to
//! receiving the reply. When it fires the connection is dropped, so a reply that arrives
//! later is never read.

use crate::config::KitchenConfig;
use crate::kitchen::{read_frame, write_frame, DispatchNotice, Disposition, FrameError, KitchenReply, NoticeSender};
use crate::model::Order;
use async_trait::async_trait;
use std::future::Future;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Anything that can carry an order to the kitchen and report how it went.
///
/// The TCP [`KitchenDispatcher`] is the production implementation; the seam lets the
/// coordinator run against other transports.
#[async_trait]
pub trait KitchenLink: Send + Sync {
    async fn dispatch(&self, order: &Order) -> Disposition;
}

#[derive(Debug, Clone)]
pub struct KitchenDispatcher {
    config: KitchenConfig,
}

impl KitchenDispatcher {
    pub fn new(config: KitchenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    async fn exchange(&self, order: &Order) -> Result<KitchenReply, Disposition> {
        let timeout = self.config.timeout;

        let mut stream = match tokio::time::timeout(timeout, TcpStream::connect(self.config.address())).await {
            Err(_) => return Err(Disposition::TimedOut),
            Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => return Err(Disposition::Unreachable),
            Ok(Err(e)) if e.kind() == ErrorKind::TimedOut => return Err(Disposition::TimedOut),
            Ok(Err(e)) => return Err(Disposition::TransportError(e.to_string())),
            Ok(Ok(stream)) => stream,
        };

        let payload_len = bounded(timeout, write_frame(&mut stream, order)).await?;
        debug!(payload_len, "Order sent, awaiting reply");

        bounded(timeout, read_frame(&mut stream)).await
    }
}

#[async_trait]
impl KitchenLink for KitchenDispatcher {
    #[instrument(skip(self, order), fields(order_number = %order.order_number(), kitchen = %self.config.address()))]
    async fn dispatch(&self, order: &Order) -> Disposition {
        let started = Instant::now();

        let disposition = match self.exchange(order).await {
            Ok(reply) if reply.is_success() => Disposition::Delivered {
                message: reply.message,
            },
            Ok(reply) => Disposition::Rejected {
                status: reply.status,
                message: reply.message,
            },
            Err(disposition) => disposition,
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        if disposition.is_delivered() {
            info!(disposition = disposition.label(), elapsed_ms, "Dispatch settled");
        } else {
            warn!(disposition = disposition.label(), detail = %disposition, elapsed_ms, "Dispatch settled");
        }
        disposition
    }
}

/// Runs one frame operation under `timeout`, mapping failures to a disposition.
async fn bounded<T>(
    timeout: Duration,
    operation: impl Future<Output = Result<T, FrameError>>,
) -> Result<T, Disposition> {
    match tokio::time::timeout(timeout, operation).await {
        Err(_) => Err(Disposition::TimedOut),
        Ok(Err(FrameError::Io(e))) if e.kind() == ErrorKind::TimedOut => Err(Disposition::TimedOut),
        Ok(Err(e)) => Err(Disposition::TransportError(e.to_string())),
        Ok(Ok(value)) => Ok(value),
    }
}

/// Dispatches `order` on a short-lived background task and reports through `notices`.
///
/// The caller is never blocked; exactly one notice is sent per call.
pub fn spawn_dispatch(link: Arc<dyn KitchenLink>, order: Order, notices: NoticeSender) -> JoinHandle<()> {
    tokio::spawn(async move {
        let order_number = order.order_number();
        let disposition = link.dispatch(&order).await;

        if !notices.send(DispatchNotice {
            order_number,
            disposition,
        }) {
            debug!(%order_number, "Foreground stopped listening, notice dropped");
        }
    })
}
