//! Read-only projections over a copy of the order log.
//!
//! A snapshot is detached from the writer. It is as fresh as the moment it was taken;
//! callers that want newer data take (or load) a new one.

use crate::model::{Order, OrderNumber};
use chrono::NaiveDate;

/// `max(order numbers) + 1`, or 1 for an empty log.
pub fn next_order_number(orders: &[Order]) -> OrderNumber {
    orders
        .iter()
        .map(Order::order_number)
        .max()
        .map_or(OrderNumber::FIRST, OrderNumber::next)
}

/// Count and revenue over a set of orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderTotals {
    pub order_count: usize,
    pub revenue: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderLogSnapshot {
    orders: Vec<Order>,
}

impl OrderLogSnapshot {
    pub fn new(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    /// All orders in log (append) order.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn next_order_number(&self) -> OrderNumber {
        next_order_number(&self.orders)
    }

    /// The last `n` orders appended, newest first.
    pub fn recent_orders(&self, n: usize) -> Vec<&Order> {
        self.orders.iter().rev().take(n).collect()
    }

    pub fn aggregate_totals(&self, predicate: impl Fn(&Order) -> bool) -> OrderTotals {
        self.orders
            .iter()
            .filter(|order| predicate(order))
            .fold(OrderTotals::default(), |acc, order| OrderTotals {
                order_count: acc.order_count + 1,
                revenue: acc.revenue.saturating_add(order.total()),
            })
    }

    pub fn all_totals(&self) -> OrderTotals {
        self.aggregate_totals(|_| true)
    }

    /// Totals for orders created on `date` (local calendar day).
    pub fn totals_on(&self, date: NaiveDate) -> OrderTotals {
        self.aggregate_totals(|order| order.created_at().date() == date)
    }
}
