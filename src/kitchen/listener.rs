//! # Kitchen Listener
//!
//! The kitchen side of the protocol: accept a connection, read one order frame, answer with
//! one reply frame. It backs the `kitchen_listener` development binary and the integration
//! tests, where it stands in for the real kitchen display.
//!
//! The reply is chosen by a [`ReplyPolicy`]. An optional delay holds the reply back, which
//! is how tests provoke a dispatcher timeout.
//!
//! ```rust,no_run
//! use kiosk_order::kitchen::{KitchenListener, KitchenReply};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let mut running = KitchenListener::bind("127.0.0.1:0")
//!         .await?
//!         .with_policy(|order| KitchenReply::success(format!("order {} received", order.order_number())))
//!         .spawn()?;
//!
//!     println!("kitchen listening on {}", running.addr());
//!     while let Some(order) = running.next_order().await {
//!         println!("{} items", order.lines().len());
//!     }
//!     Ok(())
//! }
//! ```

use crate::kitchen::{read_frame, write_frame, KitchenReply};
use crate::model::Order;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Pause after a failed `accept` (e.g. out of file descriptors) before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Decides the kitchen's answer for a received order.
pub type ReplyPolicy = Arc<dyn Fn(&Order) -> KitchenReply + Send + Sync>;

pub struct KitchenListener {
    listener: TcpListener,
    policy: ReplyPolicy,
    reply_delay: Option<Duration>,
}

impl KitchenListener {
    /// Binds the listening socket. Accepts every order by default.
    pub async fn bind(addr: impl ToSocketAddrs) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            policy: Arc::new(|order: &Order| {
                KitchenReply::success(format!("Order {} accepted", order.order_number()))
            }),
            reply_delay: None,
        })
    }

    pub fn with_policy(mut self, policy: impl Fn(&Order) -> KitchenReply + Send + Sync + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Waits `delay` after reading an order before replying.
    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = Some(delay);
        self
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever, forwarding every decoded order to `orders`.
    pub async fn run(self, orders: mpsc::UnboundedSender<Order>) {
        let addr = self
            .listener
            .local_addr()
            .map(|a| a.to_string())
            .unwrap_or_default();
        info!(%addr, "Kitchen listener started");

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    debug!(%peer, "Accepted");
                    let policy = self.policy.clone();
                    let orders = orders.clone();
                    let delay = self.reply_delay;
                    tokio::spawn(async move {
                        handle_connection(stream, peer, policy, delay, orders).await;
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Accept failed");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            }
        }
    }

    /// Starts [`run`](Self::run) on a background task.
    pub fn spawn(self) -> std::io::Result<RunningListener> {
        let addr = self.local_addr()?;
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(self.run(sender));
        Ok(RunningListener {
            addr,
            orders: receiver,
            handle,
        })
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    policy: ReplyPolicy,
    delay: Option<Duration>,
    orders: mpsc::UnboundedSender<Order>,
) {
    let reply = match read_frame::<_, Order>(&mut stream).await {
        Ok(order) => {
            info!(%peer, order_number = %order.order_number(), total = order.total(), "Order received");
            let reply = policy(&order);
            let _ = orders.send(order);
            reply
        }
        Err(e) => {
            warn!(%peer, error = %e, "Unreadable order");
            KitchenReply::rejected("error", e.to_string())
        }
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    if let Err(e) = write_frame(&mut stream, &reply).await {
        debug!(%peer, error = %e, "Reply not delivered");
    }
}

/// A listener running in the background.
pub struct RunningListener {
    addr: SocketAddr,
    orders: mpsc::UnboundedReceiver<Order>,
    handle: JoinHandle<()>,
}

impl RunningListener {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Next order the listener decoded, in arrival order.
    pub async fn next_order(&mut self) -> Option<Order> {
        self.orders.recv().await
    }

    /// Stops accepting connections.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}
