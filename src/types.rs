use serde::{Deserialize, Serialize};
use std::fmt;

use crate::query::ParamValue;

/// HTTP method used by an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// Uniform response wrapper returned by every endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<serde_json::Value>,
}

impl Envelope {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data,
            err: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: serde_json::Value::Null,
            err: Some(serde_json::Value::String(message.into())),
        }
    }

    /// Human readable error message of a failed envelope.
    ///
    /// `err` is normally a plain string; structured errors use their `msg`
    /// (or `message`) field, anything else falls back to its JSON text.
    pub fn error_message(&self) -> String {
        match &self.err {
            None | Some(serde_json::Value::Null) => "request failed".to_string(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other
                .get("msg")
                .or_else(|| other.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| other.to_string()),
        }
    }
}

/// Transaction status as reported by `/transaction-types/status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    Processing,
    Complete,
    Failed,
    Other(String),
}

impl TransactionStatus {
    pub fn from_status(status: &str) -> Self {
        match status {
            "processing" => Self::Processing,
            "complete" => Self::Complete,
            "failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }

    /// No further status changes are expected once terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processing => write!(f, "processing"),
            Self::Complete => write!(f, "complete"),
            Self::Failed => write!(f, "failed"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A single transaction in a status response.
///
/// Only the id and status are interpreted; every other field is passed
/// through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TransactionRecord {
    pub transaction_uuid: String,
    pub status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TransactionRecord {
    pub fn state(&self) -> TransactionStatus {
        TransactionStatus::from_status(&self.status)
    }

    /// On-chain hash, once the service reports one as a string.
    pub fn transaction_hash(&self) -> Option<&str> {
        self.extra.get("transaction_hash").and_then(|v| v.as_str())
    }
}

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for ParamValue {
            fn from(value: $name) -> Self {
                ParamValue::Single(value.as_str().to_string())
            }
        }
    };
}

wire_enum!(
    /// User list filter
    UserFilter {
        All => "all",
        Airdropped => "airdropped",
        NeverAirdropped => "never_airdropped",
    }
);

wire_enum!(
    OrderBy {
        Name => "name",
        CreationTime => "creation_time",
    }
);

wire_enum!(
    SortOrder {
        Asc => "asc",
        Desc => "desc",
    }
);

wire_enum!(
    /// Which users receive an airdrop
    AirdropListType {
        All => "all",
        NeverAirdropped => "never_airdropped",
    }
);

wire_enum!(
    TransactionKind {
        UserToUser => "user_to_user",
        CompanyToUser => "company_to_user",
        UserToCompany => "user_to_company",
    }
);

wire_enum!(
    /// Currency a transaction type's value is denominated in
    CurrencyType {
        Usd => "USD",
        Bt => "BT",
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_error_message() {
        let env: Envelope =
            serde_json::from_value(json!({"success": false, "err": "NOPE"})).unwrap();
        assert_eq!(env.error_message(), "NOPE");

        let env: Envelope = serde_json::from_value(
            json!({"success": false, "err": {"code": "companyRestFulApi(s_a_g_1)", "msg": "invalid signature"}}),
        )
        .unwrap();
        assert_eq!(env.error_message(), "invalid signature");

        let env: Envelope =
            serde_json::from_value(json!({"success": false, "err": {"code": 7}})).unwrap();
        assert_eq!(env.error_message(), r#"{"code":7}"#);
    }

    #[test]
    fn test_envelope_missing_data_is_null() {
        let env: Envelope = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(env.success);
        assert!(env.data.is_null());
    }

    #[test]
    fn test_transaction_status() {
        assert!(TransactionStatus::from_status("complete").is_terminal());
        assert!(TransactionStatus::from_status("failed").is_terminal());
        assert!(!TransactionStatus::from_status("processing").is_terminal());
        assert_eq!(
            TransactionStatus::from_status("waiting_for_mining"),
            TransactionStatus::Other("waiting_for_mining".into())
        );
    }

    #[test]
    fn test_transaction_record_keeps_extra_fields() {
        let record: TransactionRecord = serde_json::from_value(json!({
            "transaction_uuid": "tx-1",
            "status": "processing",
            "transaction_hash": "0xabc",
            "transaction_type_id": 42,
            "bt_transfer_value": "10"
        }))
        .unwrap();
        assert_eq!(record.state(), TransactionStatus::Processing);
        assert_eq!(record.transaction_hash(), Some("0xabc"));
        assert_eq!(record.extra["transaction_type_id"], json!(42));
        assert_eq!(record.extra["bt_transfer_value"], json!("10"));

        let record: TransactionRecord = serde_json::from_value(json!({
            "transaction_uuid": "tx-2",
            "status": "processing",
            "transaction_hash": null
        }))
        .unwrap();
        assert_eq!(record.transaction_hash(), None);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(CurrencyType::Usd.as_str(), "USD");
        assert_eq!(TransactionKind::CompanyToUser.to_string(), "company_to_user");
        assert_eq!(
            ParamValue::from(UserFilter::NeverAirdropped),
            ParamValue::Single("never_airdropped".into())
        );
    }
}
