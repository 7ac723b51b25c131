use crate::model::OrderNumber;
use std::fmt::Display;
use tokio::sync::mpsc;

/// Terminal outcome of one dispatch attempt. There are no retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// The kitchen answered with `status == "success"`.
    Delivered { message: String },
    /// The kitchen answered with any other status. Both fields are passed through verbatim.
    Rejected { status: String, message: String },
    /// Connect, send or receive did not finish within the configured timeout.
    TimedOut,
    /// The kitchen host actively refused the connection.
    Unreachable,
    /// Any other failure: name resolution, resets, malformed framing, bad JSON.
    TransportError(String),
}

impl Disposition {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Disposition::Delivered { .. })
    }

    /// Short name for structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            Disposition::Delivered { .. } => "delivered",
            Disposition::Rejected { .. } => "rejected",
            Disposition::TimedOut => "timed_out",
            Disposition::Unreachable => "unreachable",
            Disposition::TransportError(_) => "transport_error",
        }
    }
}

impl Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Disposition::Delivered { .. } => write!(f, "Order sent to the kitchen"),
            Disposition::Rejected { message, .. } => write!(f, "Kitchen rejected the order: {message}"),
            Disposition::TimedOut => write!(f, "Kitchen did not respond in time"),
            Disposition::Unreachable => write!(f, "Kitchen system is not reachable"),
            Disposition::TransportError(detail) => write!(f, "Sending to the kitchen failed: {detail}"),
        }
    }
}

/// A settled dispatch, delivered to the foreground loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchNotice {
    pub order_number: OrderNumber,
    pub disposition: Disposition,
}

/// Creates the channel background dispatch tasks report through.
pub fn notice_channel() -> (NoticeSender, KitchenNotices) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (NoticeSender { sender }, KitchenNotices { receiver })
}

/// Sending half, cloned into each background dispatch task.
#[derive(Debug, Clone)]
pub struct NoticeSender {
    sender: mpsc::UnboundedSender<DispatchNotice>,
}

impl NoticeSender {
    /// Hands `notice` to the foreground. Returns `false` if nobody is listening anymore.
    pub fn send(&self, notice: DispatchNotice) -> bool {
        self.sender.send(notice).is_ok()
    }
}

/// Receiving half, owned by the foreground loop. Its only job is to drain and render.
#[derive(Debug)]
pub struct KitchenNotices {
    receiver: mpsc::UnboundedReceiver<DispatchNotice>,
}

impl KitchenNotices {
    /// Waits for the next notice. `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<DispatchNotice> {
        self.receiver.recv().await
    }

    /// Everything that has arrived so far, without waiting.
    pub fn drain(&mut self) -> Vec<DispatchNotice> {
        let mut notices = Vec::new();
        while let Ok(notice) = self.receiver.try_recv() {
            notices.push(notice);
        }
        notices
    }
}
