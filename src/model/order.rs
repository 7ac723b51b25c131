/// A placed order, as recorded in the order log and sent to the kitchen.
///
/// Orders are built once per checkout from an [`OrderDraft`] and are never mutated
/// afterwards. The `total` is always derived from the lines at construction time.
///
/// The serialized shape is shared by the durable log and the kitchen wire protocol:
///
/// ```json
/// {
///   "order_number": 7,
///   "timestamp": "2026-10-19T12:30:00.123456",
///   "order_type": "매장",
///   "items": [{ "name": "콜라", "price": 3000, "quantity": 1, "image": "🥤" }],
///   "total": 3000,
///   "kitchen_info": { "special_instructions": "", "priority": "normal" }
/// }
/// ```
use crate::config::ConfigError;
use crate::model::{line_total, CartLine};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Monotonic order number, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(pub u64);

impl OrderNumber {
    pub const FIRST: OrderNumber = OrderNumber(1);

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the customer eats.
///
/// Serialized with the labels the kiosk has always written to its log
/// (`매장` = dine-in, `포장` = take-out); the English snake-case names are accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderType {
    #[default]
    #[serde(rename = "매장", alias = "dine_in")]
    DineIn,
    #[serde(rename = "포장", alias = "take_out")]
    TakeOut,
}

impl FromStr for OrderType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "매장" | "dine_in" | "DINE_IN" => Ok(OrderType::DineIn),
            "포장" | "take_out" | "TAKE_OUT" => Ok(OrderType::TakeOut),
            other => Err(ConfigError::InvalidOrderType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Normal,
    High,
    Urgent,
}

/// Notes for the kitchen attached to every order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KitchenInfo {
    #[serde(default)]
    pub special_instructions: String,
    #[serde(default)]
    pub priority: Priority,
}

/// Payment method chosen on the payment screen. Recorded only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Cash,
}

/// Everything an order needs except its number.
///
/// The coordinator fills this from a cart snapshot; the order log assigns the number.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub created_at: NaiveDateTime,
    pub order_type: OrderType,
    pub lines: Vec<CartLine>,
    pub kitchen_info: KitchenInfo,
    pub payment_method: Option<PaymentMethod>,
}

/// A stored or received order whose `total` disagrees with its lines.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("order {order_number} records total {recorded} but its items add up to {derived}")]
pub struct TotalMismatch {
    pub order_number: OrderNumber,
    pub recorded: u64,
    pub derived: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOrder")]
pub struct Order {
    order_number: OrderNumber,
    #[serde(rename = "timestamp")]
    created_at: NaiveDateTime,
    order_type: OrderType,
    #[serde(rename = "items")]
    lines: Vec<CartLine>,
    total: u64,
    #[serde(default)]
    kitchen_info: KitchenInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payment_method: Option<PaymentMethod>,
}

/// The wire and log shape of an [`Order`] before its total is checked.
#[derive(Deserialize)]
struct RawOrder {
    order_number: OrderNumber,
    timestamp: NaiveDateTime,
    order_type: OrderType,
    items: Vec<CartLine>,
    total: u64,
    #[serde(default)]
    kitchen_info: KitchenInfo,
    #[serde(default)]
    payment_method: Option<PaymentMethod>,
}

impl TryFrom<RawOrder> for Order {
    type Error = TotalMismatch;

    fn try_from(raw: RawOrder) -> Result<Self, Self::Error> {
        let derived = line_total(&raw.items);
        if raw.total != derived {
            return Err(TotalMismatch {
                order_number: raw.order_number,
                recorded: raw.total,
                derived,
            });
        }
        Ok(Self {
            order_number: raw.order_number,
            created_at: raw.timestamp,
            order_type: raw.order_type,
            lines: raw.items,
            total: raw.total,
            kitchen_info: raw.kitchen_info,
            payment_method: raw.payment_method,
        })
    }
}

impl Order {
    /// Builds the order for `draft` under `order_number`, deriving the total.
    pub fn new(order_number: OrderNumber, draft: OrderDraft) -> Self {
        let total = line_total(&draft.lines);
        Self {
            order_number,
            created_at: draft.created_at,
            order_type: draft.order_type,
            lines: draft.lines,
            total,
            kitchen_info: draft.kitchen_info,
            payment_method: draft.payment_method,
        }
    }

    pub fn order_number(&self) -> OrderNumber {
        self.order_number
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn kitchen_info(&self) -> &KitchenInfo {
        &self.kitchen_info
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft(lines: Vec<CartLine>) -> OrderDraft {
        OrderDraft {
            created_at: NaiveDate::from_ymd_opt(2026, 10, 19)
                .and_then(|d| d.and_hms_micro_opt(12, 30, 0, 123456))
                .unwrap(),
            order_type: OrderType::TakeOut,
            lines,
            kitchen_info: KitchenInfo {
                special_instructions: "no onions".into(),
                priority: Priority::High,
            },
            payment_method: Some(PaymentMethod::Card),
        }
    }

    fn line(name: &str, price: u64, quantity: u32) -> CartLine {
        CartLine {
            name: name.into(),
            unit_price: price,
            quantity,
            display_glyph: String::new(),
        }
    }

    #[test]
    fn test_total_is_derived_from_lines() {
        let order = Order::new(
            OrderNumber(3),
            draft(vec![line("스테이크", 32000, 2), line("콜라", 3000, 1)]),
        );
        assert_eq!(order.total(), 67000);
    }

    #[test]
    fn test_serialized_field_names() {
        let order = Order::new(OrderNumber(7), draft(vec![line("콜라", 3000, 1)]));
        let value = serde_json::to_value(&order).unwrap();

        assert_eq!(value["order_number"], 7);
        assert_eq!(value["timestamp"], "2026-10-19T12:30:00.123456");
        assert_eq!(value["order_type"], "포장");
        assert_eq!(value["items"][0]["price"], 3000);
        assert_eq!(value["items"][0]["quantity"], 1);
        assert_eq!(value["total"], 3000);
        assert_eq!(value["kitchen_info"]["priority"], "high");
        assert_eq!(value["payment_method"], "card");
    }

    #[test]
    fn test_reads_legacy_record_without_kitchen_info() {
        let raw = r#"{
            "order_number": 12,
            "timestamp": "2025-03-01T09:15:42.918273",
            "order_type": "매장",
            "items": [{"name": "커피", "price": 3500, "quantity": 2, "image": "☕"}],
            "total": 7000
        }"#;

        let order: Order = serde_json::from_str(raw).unwrap();
        assert_eq!(order.order_number(), OrderNumber(12));
        assert_eq!(order.order_type(), OrderType::DineIn);
        assert_eq!(order.kitchen_info().priority, Priority::Normal);
        assert_eq!(order.payment_method(), None);
        assert_eq!(order.total(), 7000);
    }

    #[test]
    fn test_mismatched_total_is_rejected() {
        let raw = r#"{
            "order_number": 4,
            "timestamp": "2025-03-01T09:15:42.918273",
            "order_type": "포장",
            "items": [{"name": "콜라", "price": 3000, "quantity": 1, "image": "🥤"}],
            "total": 1
        }"#;

        let err = serde_json::from_str::<Order>(raw).unwrap_err();
        assert!(err.to_string().contains("records total 1 but its items add up to 3000"), "{err}");
    }

    #[test]
    fn test_serialized_order_reads_back() {
        let order = Order::new(OrderNumber(9), draft(vec![line("스테이크", 32000, 2)]));
        let json = serde_json::to_string(&order).unwrap();

        assert_eq!(serde_json::from_str::<Order>(&json).unwrap(), order);
    }

    #[test]
    fn test_order_type_accepts_english_names() {
        let parsed: OrderType = serde_json::from_str("\"take_out\"").unwrap();
        assert_eq!(parsed, OrderType::TakeOut);
        assert_eq!("DINE_IN".parse::<OrderType>(), Ok(OrderType::DineIn));
        assert_eq!(
            "delivery".parse::<OrderType>(),
            Err(ConfigError::InvalidOrderType("delivery".into()))
        );
    }
}
