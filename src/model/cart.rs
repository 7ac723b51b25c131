//! # Cart Store
//!
//! The in-memory cart for the single active kiosk session. Pure data, no I/O.
//!
//! Lines are keyed by their (case-sensitive) name. Adding an item that is already in the
//! cart bumps its quantity instead of creating a second line, and a line whose quantity
//! drops to zero or below is removed on the spot. The total is never cached; it is derived
//! from the lines every time it is read.

use serde::{Deserialize, Serialize};

/// A sellable menu item, as handed to the cart by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub name: String,
    pub unit_price: u64,
    pub display_glyph: String,
}

impl MenuItem {
    pub fn new(name: impl Into<String>, unit_price: u64, display_glyph: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit_price,
            display_glyph: display_glyph.into(),
        }
    }
}

/// One named product with its quantity inside a cart or an order.
///
/// The serialized field names (`price`, `image`) are the ones the order log and the
/// kitchen listener already read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: u64,
    pub quantity: u32,
    #[serde(rename = "image", default)]
    pub display_glyph: String,
}

impl CartLine {
    /// `unit_price × quantity` for this line, saturating at `u64::MAX`.
    pub fn subtotal(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}

/// Line items of the active order.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    lines: Vec<CartLine>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of `item`, merging with an existing line of the same name.
    pub fn add(&mut self, item: &MenuItem) {
        match self.lines.iter_mut().find(|line| line.name == item.name) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine {
                name: item.name.clone(),
                unit_price: item.unit_price,
                quantity: 1,
                display_glyph: item.display_glyph.clone(),
            }),
        }
    }

    /// Applies `delta` to the line called `name`. Unknown names are ignored.
    ///
    /// A resulting quantity of zero or less removes the line. Quantities cap at `u32::MAX`.
    pub fn adjust_quantity(&mut self, name: &str, delta: i64) {
        let Some(index) = self.lines.iter().position(|line| line.name == name) else {
            return;
        };

        let next = i64::from(self.lines[index].quantity).saturating_add(delta);
        if next <= 0 {
            self.lines.remove(index);
        } else {
            self.lines[index].quantity = u32::try_from(next).unwrap_or(u32::MAX);
        }
    }

    pub fn total(&self) -> u64 {
        line_total(&self.lines)
    }

    /// Number of units across all lines (the cart badge).
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Owned copy of the current lines. Later cart edits never reach it.
    pub fn snapshot(&self) -> Vec<CartLine> {
        self.lines.clone()
    }
}

/// Sum of line subtotals, saturating at `u64::MAX`.
pub fn line_total(lines: &[CartLine]) -> u64 {
    lines
        .iter()
        .map(CartLine::subtotal)
        .fold(0, u64::saturating_add)
}
