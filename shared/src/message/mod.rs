//! 实时通知消息类型
//!
//! Payloads exchanged over the Socket.IO channel between the POS screens,
//! plus the Engine.IO / Socket.IO text codec in [`packet`].

use serde_json::Value;

pub mod packet;
pub mod payload;
pub use packet::{OpenPayload, Packet, PacketError};
pub use payload::*;

/// Socket.IO event names
pub mod event {
    /// Server → client: order created or changed
    pub const ORDER_UPDATE: &str = "order_update";
    /// Server → client: menu item availability changed
    pub const MENU_UPDATE: &str = "menu_update";
    /// Server → client: table status changed
    pub const TABLE_UPDATE: &str = "table_update";

    /// Client → server counterparts
    pub const UPDATE_ORDER: &str = "update_order";
    pub const UPDATE_MENU: &str = "update_menu";
    pub const UPDATE_TABLE: &str = "update_table";
}

impl OrderNotification {
    /// Decode an inbound order payload.
    ///
    /// Tagged payloads are read as-is. Older senders omit the tag; they are
    /// recognised at this boundary only:
    /// - `{"notification": {"type": "new_order"}, ...}` or a bare
    ///   `{"type": "new_order", ...}` is a new order
    /// - anything carrying `orderId` is a status update
    ///
    /// A bare `order_id` is not enough: every legacy status sender uses
    /// `orderId`.
    ///
    /// Unrecognisable payloads yield `None` and are dropped by the caller.
    pub fn decode(value: &Value) -> Option<Self> {
        if let Ok(tagged) = serde_json::from_value::<Self>(value.clone()) {
            return Some(tagged);
        }

        let nested_type = value
            .get("notification")
            .and_then(|n| n.get("type"))
            .and_then(Value::as_str);
        let top_type = value.get("type").and_then(Value::as_str);

        if nested_type == Some("new_order") || top_type == Some("new_order") {
            return decode_as(value).map(Self::NewOrder);
        }
        if value.get("orderId").is_some() {
            return decode_as(value).map(Self::StatusUpdate);
        }

        tracing::debug!(payload = %value, "Unrecognised order notification");
        None
    }
}

impl MenuNotification {
    pub fn decode(value: &Value) -> Option<Self> {
        decode_as(value)
    }
}

impl TableNotification {
    pub fn decode(value: &Value) -> Option<Self> {
        decode_as(value)
    }
}

fn decode_as<T: serde::de::DeserializeOwned>(value: &Value) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!(error = %e, payload = %value, "Malformed notification payload");
            None
        }
    }
}
