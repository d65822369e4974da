//! Cart - 点单购物车

use rust_decimal::Decimal;
use shared::models::{MenuItem, NewOrder, OrderItem, OrderStatus};

use crate::{ClientError, ClientResult};

/// One cart line
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item: MenuItem,
    pub quantity: u32,
    pub note: Option<String>,
}

impl CartLine {
    pub fn subtotal(&self) -> Decimal {
        self.item.price * Decimal::from(self.quantity)
    }
}

/// Waiter cart for one table, in insertion order
#[derive(Debug, Default, Clone)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit, incrementing the line if the item is already there
    pub fn add(&mut self, item: &MenuItem) -> ClientResult<()> {
        if !item.availability {
            return Err(ClientError::Validation(format!(
                "{} is currently unavailable",
                item.name
            )));
        }
        match self.line_mut(item.food_id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine {
                item: item.clone(),
                quantity: 1,
                note: None,
            }),
        }
        Ok(())
    }

    /// Set the quantity of a line; zero removes it
    pub fn set_quantity(&mut self, food_id: i64, quantity: u32) {
        if quantity == 0 {
            self.lines.retain(|l| l.item.food_id != food_id);
        } else if let Some(line) = self.line_mut(food_id) {
            line.quantity = quantity;
        }
    }

    /// Attach a kitchen note; blank clears it
    pub fn set_note(&mut self, food_id: i64, note: &str) {
        if let Some(line) = self.line_mut(food_id) {
            let note = note.trim();
            line.note = (!note.is_empty()).then(|| note.to_string());
        }
    }

    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Build the order body. An empty cart is rejected before any request.
    pub fn to_order(&self, employee_id: i64, table_id: i64) -> ClientResult<NewOrder> {
        if self.lines.is_empty() {
            return Err(ClientError::Validation(
                "Please add at least one item to your order".to_string(),
            ));
        }
        let items = self
            .lines
            .iter()
            .map(|line| OrderItem {
                food_id: line.item.food_id,
                quantity: line.quantity,
                note: line.note.clone(),
                name: None,
            })
            .collect();
        Ok(NewOrder {
            employee_id,
            table_id,
            items,
            order_status: OrderStatus::Pending,
            total_price: self.total(),
        })
    }

    /// Consume the cart into an order body
    pub fn into_order(self, employee_id: i64, table_id: i64) -> ClientResult<NewOrder> {
        self.to_order(employee_id, table_id)
    }

    fn line_mut(&mut self, food_id: i64) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.item.food_id == food_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::MenuCategory;

    fn dish(food_id: i64, price: i64, availability: bool) -> MenuItem {
        MenuItem {
            food_id,
            name: format!("dish-{food_id}"),
            category: MenuCategory::Meat,
            price: Decimal::new(price, 0),
            availability,
            image: None,
            description: None,
        }
    }

    #[test]
    fn test_add_increments_existing_line() {
        let mut cart = Cart::new();
        cart.add(&dish(1, 50_000, true)).unwrap();
        cart.add(&dish(1, 50_000, true)).unwrap();
        cart.add(&dish(2, 20_000, true)).unwrap();
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.total(), Decimal::new(120_000, 0));
    }

    #[test]
    fn test_zero_quantity_removes_line() {
        let mut cart = Cart::new();
        cart.add(&dish(1, 10, true)).unwrap();
        cart.set_quantity(1, 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unavailable_item_rejected() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add(&dish(3, 10, false)),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_cart_is_a_validation_error() {
        let err = Cart::new().into_order(1, 7).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn test_order_body() {
        let mut cart = Cart::new();
        cart.add(&dish(4, 35_000, true)).unwrap();
        cart.set_quantity(4, 3);
        cart.set_note(4, "  less spicy ");
        let order = cart.into_order(2, 7).unwrap();
        assert_eq!(order.table_id, 7);
        assert_eq!(order.order_status, OrderStatus::Pending);
        assert_eq!(order.items[0].note.as_deref(), Some("less spicy"));
        assert_eq!(order.total_price, Decimal::new(105_000, 0));
    }
}
