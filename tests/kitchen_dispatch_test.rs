use kiosk_order::config::KitchenConfig;
use kiosk_order::kitchen::{
    notice_channel, read_frame, spawn_dispatch, write_frame, Disposition, KitchenDispatcher, KitchenLink,
    KitchenListener, KitchenReply,
};
use kiosk_order::model::{
    CartLine, KitchenInfo, Order, OrderDraft, OrderNumber, OrderType, PaymentMethod, Priority,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

fn sample_order(number: u64) -> Order {
    Order::new(
        OrderNumber(number),
        OrderDraft {
            created_at: chrono::Local::now().naive_local(),
            order_type: OrderType::TakeOut,
            lines: vec![
                CartLine {
                    name: "스테이크".into(),
                    unit_price: 32000,
                    quantity: 2,
                    display_glyph: "🥩".into(),
                },
                CartLine {
                    name: "콜라".into(),
                    unit_price: 3000,
                    quantity: 1,
                    display_glyph: "🥤".into(),
                },
            ],
            kitchen_info: KitchenInfo {
                special_instructions: "소스 따로".into(),
                priority: Priority::Urgent,
            },
            payment_method: Some(PaymentMethod::Cash),
        },
    )
}

fn dispatcher_for(addr: SocketAddr, timeout: Duration) -> KitchenDispatcher {
    KitchenDispatcher::new(KitchenConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        timeout,
    })
}

/// A raw kitchen that reads the order and answers with `reply` bytes verbatim.
async fn raw_kitchen(reply: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _order: Order = read_frame(&mut stream).await.unwrap();
        stream.write_all(reply).await.unwrap();
        stream.shutdown().await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_delivered_and_listener_sees_identical_order() {
    let mut kitchen = KitchenListener::bind("127.0.0.1:0")
        .await
        .unwrap()
        .spawn()
        .unwrap();
    let order = sample_order(1);

    let disposition = dispatcher_for(kitchen.addr(), Duration::from_secs(2))
        .dispatch(&order)
        .await;

    assert_eq!(
        disposition,
        Disposition::Delivered {
            message: "Order #1 accepted".into()
        }
    );
    let received = kitchen.next_order().await.unwrap();
    assert_eq!(received, order);
    assert_eq!(received.total(), 67000);

    kitchen.shutdown();
}

#[tokio::test]
async fn test_rejected_surfaces_status_and_message() {
    let kitchen = KitchenListener::bind("127.0.0.1:0")
        .await
        .unwrap()
        .with_policy(|_| KitchenReply::rejected("sold_out", "스테이크 품절"))
        .spawn()
        .unwrap();

    let disposition = dispatcher_for(kitchen.addr(), Duration::from_secs(2))
        .dispatch(&sample_order(2))
        .await;

    assert_eq!(
        disposition,
        Disposition::Rejected {
            status: "sold_out".into(),
            message: "스테이크 품절".into()
        }
    );
    kitchen.shutdown();
}

#[tokio::test]
async fn test_refused_connection_is_unreachable() {
    // Bind and release a port so nothing is listening on it.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let disposition = dispatcher_for(addr, Duration::from_secs(2))
        .dispatch(&sample_order(3))
        .await;

    assert_eq!(disposition, Disposition::Unreachable);
}

#[tokio::test]
async fn test_late_reply_is_timed_out_and_never_overwritten() {
    let kitchen = KitchenListener::bind("127.0.0.1:0")
        .await
        .unwrap()
        .with_reply_delay(Duration::from_millis(600))
        .spawn()
        .unwrap();
    let link: Arc<dyn KitchenLink> = Arc::new(dispatcher_for(kitchen.addr(), Duration::from_millis(150)));
    let (sender, mut notices) = notice_channel();

    let handle = spawn_dispatch(link, sample_order(4), sender);
    let notice = notices.recv().await.unwrap();
    assert_eq!(notice.order_number, OrderNumber(4));
    assert_eq!(notice.disposition, Disposition::TimedOut);

    // Give the kitchen time to send its late reply; nothing else may be reported.
    handle.await.unwrap();
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert!(notices.drain().is_empty());
    assert_eq!(notices.recv().await, None);

    kitchen.shutdown();
}

#[tokio::test]
async fn test_malformed_header_is_transport_error() {
    let addr = raw_kitchen(b"abcdefghij{\"status\":\"success\"}").await;

    let disposition = dispatcher_for(addr, Duration::from_secs(2))
        .dispatch(&sample_order(5))
        .await;

    assert!(matches!(disposition, Disposition::TransportError(_)), "{disposition:?}");
}

#[tokio::test]
async fn test_short_payload_is_transport_error() {
    let addr = raw_kitchen(b"0000000100{\"status\":\"success\"}").await;

    let disposition = dispatcher_for(addr, Duration::from_secs(2))
        .dispatch(&sample_order(6))
        .await;

    assert!(matches!(disposition, Disposition::TransportError(_)), "{disposition:?}");
}

#[tokio::test]
async fn test_invalid_reply_json_is_transport_error() {
    let addr = raw_kitchen(b"0000000004nope").await;

    let disposition = dispatcher_for(addr, Duration::from_secs(2))
        .dispatch(&sample_order(7))
        .await;

    assert!(matches!(disposition, Disposition::TransportError(_)), "{disposition:?}");
}

#[tokio::test]
async fn test_connection_closed_without_reply_is_transport_error() {
    let addr = raw_kitchen(b"").await;

    let disposition = dispatcher_for(addr, Duration::from_secs(2))
        .dispatch(&sample_order(8))
        .await;

    assert!(matches!(disposition, Disposition::TransportError(_)), "{disposition:?}");
}

#[tokio::test]
async fn test_listener_refuses_order_with_inconsistent_total() {
    let mut kitchen = KitchenListener::bind("127.0.0.1:0")
        .await
        .unwrap()
        .spawn()
        .unwrap();

    let mut record = serde_json::to_value(sample_order(9)).unwrap();
    record["total"] = serde_json::json!(1);

    let mut stream = TcpStream::connect(kitchen.addr()).await.unwrap();
    write_frame(&mut stream, &record).await.unwrap();
    let reply: KitchenReply = read_frame(&mut stream).await.unwrap();

    assert_eq!(reply.status, "error");
    assert!(reply.message.contains("add up to 67000"), "{}", reply.message);

    // A well-formed order afterwards is still the first one the kitchen sees.
    let order = sample_order(10);
    dispatcher_for(kitchen.addr(), Duration::from_secs(2))
        .dispatch(&order)
        .await;
    assert_eq!(kitchen.next_order().await.unwrap(), order);

    kitchen.shutdown();
}
