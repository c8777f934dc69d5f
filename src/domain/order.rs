use std::fmt;

use serde::{Deserialize, Serialize};

/// A buyer's purchase record.
///
/// `product_name` is a denormalized copy captured at order-creation time;
/// there is no foreign key back to the product store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_number: String,
    /// ISO date (`YYYY-MM-DD`).
    pub date: String,
    pub status: OrderStatus,
    pub total: f64,
    pub items: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Delivered,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Delivered => write!(f, "delivered"),
        }
    }
}

/// Payload for recording a new order. The caller supplies the identifier,
/// conventionally derived from the current timestamp.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub id: String,
    pub order_number: String,
    pub date: String,
    pub status: OrderStatus,
    pub total: f64,
    pub items: u32,
    pub product_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_shape_uses_camel_case_keys() {
        let order = Order {
            id: "9".to_string(),
            order_number: "ORDER-99999".to_string(),
            date: "2025-01-01".to_string(),
            status: OrderStatus::Pending,
            total: 500.0,
            items: 1,
            product_name: Some("Desk Lamp".to_string()),
        };

        let blob = serde_json::to_string(&order).unwrap();
        assert!(blob.contains(r#""orderNumber":"ORDER-99999""#));
        assert!(blob.contains(r#""productName":"Desk Lamp""#));
        assert!(blob.contains(r#""status":"pending""#));
    }

    #[test]
    fn order_without_product_name_round_trips() {
        let blob = r#"{"id":"1","orderNumber":"ORDER-12345","date":"2025-05-02","status":"delivered","total":8399.44,"items":2}"#;
        let order: Order = serde_json::from_str(blob).unwrap();

        assert_eq!(order.status, OrderStatus::Delivered);
        assert_eq!(order.product_name, None);
    }
}
