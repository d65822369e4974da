//! Engine.IO v4 / Socket.IO v5 text packet codec
//!
//! Only the WebSocket transport with text frames is supported. Every frame
//! is one Engine.IO packet; Engine.IO `message` packets carry a Socket.IO
//! packet in their payload.
//!
//! ```text
//! 0{"sid":"..","pingInterval":25000,"pingTimeout":20000}   open
//! 2 / 3                                                    ping / pong
//! 40{"token":".."}                                         connect
//! 42["order_update",{...}]                                 event
//! 42/kitchen,17["update_order",{...}]                      event with ns + ack id
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Engine.IO protocol revision spoken by this codec
pub const ENGINE_IO_VERSION: u8 = 4;

/// Default namespace
pub const ROOT_NAMESPACE: &str = "/";

/// Engine.IO handshake payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPayload {
    pub sid: String,
    pub ping_interval: u64,
    pub ping_timeout: u64,
    #[serde(default)]
    pub upgrades: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_payload: Option<u64>,
}

#[derive(Debug, Error)]
pub enum PacketError {
    #[error("empty frame")]
    Empty,

    #[error("unknown packet type '{0}'")]
    UnknownType(char),

    #[error("malformed packet: {0}")]
    Malformed(&'static str),

    #[error("unsupported packet: {0}")]
    Unsupported(&'static str),

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// One decoded text frame
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    // Engine.IO level
    Open(OpenPayload),
    Close,
    Ping,
    Pong,
    Upgrade,
    Noop,

    // Socket.IO level (inside an Engine.IO message)
    Connect {
        namespace: String,
        data: Option<Value>,
    },
    Disconnect {
        namespace: String,
    },
    Event {
        namespace: String,
        ack_id: Option<u64>,
        name: String,
        args: Vec<Value>,
    },
    Ack {
        namespace: String,
        ack_id: u64,
        args: Vec<Value>,
    },
    ConnectError {
        namespace: String,
        data: Value,
    },
}

impl Packet {
    /// CONNECT on the root namespace with an optional auth object
    pub fn connect(auth: Option<Value>) -> Self {
        Self::Connect {
            namespace: ROOT_NAMESPACE.to_string(),
            data: auth,
        }
    }

    /// EVENT on the root namespace with a single argument
    pub fn event(name: impl Into<String>, data: Value) -> Self {
        Self::Event {
            namespace: ROOT_NAMESPACE.to_string(),
            ack_id: None,
            name: name.into(),
            args: vec![data],
        }
    }

    /// First event argument, `Null` when the event carried none
    pub fn first_arg(args: &[Value]) -> Value {
        args.first().cloned().unwrap_or(Value::Null)
    }

    pub fn decode(frame: &str) -> Result<Self, PacketError> {
        let mut chars = frame.chars();
        let kind = chars.next().ok_or(PacketError::Empty)?;
        let rest = chars.as_str();
        match kind {
            '0' => Ok(Self::Open(serde_json::from_str(rest)?)),
            '1' => Ok(Self::Close),
            '2' => Ok(Self::Ping),
            '3' => Ok(Self::Pong),
            '4' => decode_socket(rest),
            '5' => Ok(Self::Upgrade),
            '6' => Ok(Self::Noop),
            other => Err(PacketError::UnknownType(other)),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Open(open) => format!("0{}", json_text(open)),
            Self::Close => "1".to_string(),
            Self::Ping => "2".to_string(),
            Self::Pong => "3".to_string(),
            Self::Upgrade => "5".to_string(),
            Self::Noop => "6".to_string(),
            Self::Connect { namespace, data } => {
                let body = data.as_ref().map(json_text).unwrap_or_default();
                format!("40{}{}", ns_prefix(namespace), body)
            }
            Self::Disconnect { namespace } => format!("41{}", ns_prefix(namespace)),
            Self::Event {
                namespace,
                ack_id,
                name,
                args,
            } => {
                let mut array = Vec::with_capacity(args.len() + 1);
                array.push(Value::String(name.clone()));
                array.extend(args.iter().cloned());
                format!(
                    "42{}{}{}",
                    ns_prefix(namespace),
                    ack_id.map(|id| id.to_string()).unwrap_or_default(),
                    Value::Array(array)
                )
            }
            Self::Ack {
                namespace,
                ack_id,
                args,
            } => format!(
                "43{}{}{}",
                ns_prefix(namespace),
                ack_id,
                Value::Array(args.clone())
            ),
            Self::ConnectError { namespace, data } => {
                format!("44{}{}", ns_prefix(namespace), data)
            }
        }
    }
}

fn json_text<T: Serialize>(value: &T) -> String {
    // Value / plain structs never fail to serialize
    serde_json::to_string(value).unwrap_or_default()
}

fn ns_prefix(namespace: &str) -> String {
    if namespace == ROOT_NAMESPACE || namespace.is_empty() {
        String::new()
    } else {
        format!("{namespace},")
    }
}

fn decode_socket(body: &str) -> Result<Packet, PacketError> {
    let mut chars = body.chars();
    let kind = chars.next().ok_or(PacketError::Malformed("empty socket packet"))?;
    if matches!(kind, '5' | '6') {
        return Err(PacketError::Unsupported("binary attachments"));
    }
    let mut rest = chars.as_str();

    let namespace = if rest.starts_with('/') {
        let (ns, tail) = match rest.find(',') {
            Some(idx) => (&rest[..idx], &rest[idx + 1..]),
            None => (rest, ""),
        };
        rest = tail;
        ns.to_string()
    } else {
        ROOT_NAMESPACE.to_string()
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let ack_id = if digits > 0 {
        let id = rest[..digits]
            .parse::<u64>()
            .map_err(|_| PacketError::Malformed("ack id out of range"))?;
        rest = &rest[digits..];
        Some(id)
    } else {
        None
    };

    let payload: Option<Value> = if rest.is_empty() {
        None
    } else {
        Some(serde_json::from_str(rest)?)
    };

    match kind {
        '0' => Ok(Packet::Connect {
            namespace,
            data: payload,
        }),
        '1' => Ok(Packet::Disconnect { namespace }),
        '2' => {
            let Some(Value::Array(mut items)) = payload else {
                return Err(PacketError::Malformed("event payload is not an array"));
            };
            if items.is_empty() {
                return Err(PacketError::Malformed("event without name"));
            }
            let Value::String(name) = items.remove(0) else {
                return Err(PacketError::Malformed("event name is not a string"));
            };
            Ok(Packet::Event {
                namespace,
                ack_id,
                name,
                args: items,
            })
        }
        '3' => {
            let ack_id = ack_id.ok_or(PacketError::Malformed("ack without id"))?;
            let args = match payload {
                Some(Value::Array(items)) => items,
                Some(_) => return Err(PacketError::Malformed("ack payload is not an array")),
                None => Vec::new(),
            };
            Ok(Packet::Ack {
                namespace,
                ack_id,
                args,
            })
        }
        '4' => Ok(Packet::ConnectError {
            namespace,
            data: payload.unwrap_or(Value::Null),
        }),
        other => Err(PacketError::UnknownType(other)),
    }
}
