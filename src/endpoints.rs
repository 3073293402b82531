//! Endpoint catalog and typed operation arguments.
//!
//! Each operation struct maps onto exactly one [`Endpoint`]; the client uses
//! the catalog entry to choose the HTTP method and path.

use crate::query::Params;
use crate::types::{
    AirdropListType, CurrencyType, Method, OrderBy, SortOrder, TransactionKind, UserFilter,
};

/// Static description of a remote operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
    pub fields: &'static [&'static str],
}

pub const USERS_CREATE: Endpoint = Endpoint {
    name: "usersCreate",
    method: Method::Post,
    path: "/users/create",
    fields: &["name"],
};

pub const USERS_EDIT: Endpoint = Endpoint {
    name: "usersEdit",
    method: Method::Post,
    path: "/users/edit",
    fields: &["uuid", "name"],
};

pub const USERS_LIST: Endpoint = Endpoint {
    name: "usersList",
    method: Method::Get,
    path: "/users/list",
    fields: &["page_no", "filter", "order_by", "order"],
};

pub const USERS_AIRDROP_DROP: Endpoint = Endpoint {
    name: "usersAirdropDrop",
    method: Method::Post,
    path: "/users/airdrop/drop",
    fields: &["amount", "list_type"],
};

pub const USERS_AIRDROP_STATUS: Endpoint = Endpoint {
    name: "usersAirdropStatus",
    method: Method::Get,
    path: "/users/airdrop/status",
    fields: &["airdrop_uuid"],
};

pub const TRANSACTION_TYPES_CREATE: Endpoint = Endpoint {
    name: "transactiontypesCreate",
    method: Method::Post,
    path: "/transaction-types/create",
    fields: &[
        "name",
        "kind",
        "currency_type",
        "currency_value",
        "commission_percent",
    ],
};

pub const TRANSACTION_TYPES_EDIT: Endpoint = Endpoint {
    name: "transactiontypesEdit",
    method: Method::Post,
    path: "/transaction-types/edit",
    fields: &[
        "client_transaction_id",
        "name",
        "kind",
        "currency_type",
        "currency_value",
        "commission_percent",
    ],
};

pub const TRANSACTION_TYPES_LIST: Endpoint = Endpoint {
    name: "transactiontypesList",
    method: Method::Get,
    path: "/transaction-types/list",
    fields: &[],
};

pub const TRANSACTION_TYPES_EXECUTE: Endpoint = Endpoint {
    name: "transactiontypesExecute",
    method: Method::Post,
    path: "/transaction-types/execute",
    fields: &["from_uuid", "to_uuid", "transaction_kind"],
};

pub const TRANSACTION_TYPES_STATUS: Endpoint = Endpoint {
    name: "transactiontypesStatus",
    method: Method::Post,
    path: "/transaction-types/status",
    fields: &["transaction_uuids"],
};

pub static CATALOG: [Endpoint; 10] = [
    USERS_CREATE,
    USERS_EDIT,
    USERS_LIST,
    USERS_AIRDROP_DROP,
    USERS_AIRDROP_STATUS,
    TRANSACTION_TYPES_CREATE,
    TRANSACTION_TYPES_EDIT,
    TRANSACTION_TYPES_LIST,
    TRANSACTION_TYPES_EXECUTE,
    TRANSACTION_TYPES_STATUS,
];

/// Look up a catalog entry by its operation name (e.g. `usersList`).
pub fn find(name: &str) -> Option<&'static Endpoint> {
    CATALOG.iter().find(|e| e.name == name)
}

/// A typed request bound to a catalog endpoint.
pub trait Operation {
    const ENDPOINT: Endpoint;

    fn params(&self) -> Params;
}

#[derive(Debug, Clone)]
pub struct UsersCreate {
    pub name: String,
}

impl Operation for UsersCreate {
    const ENDPOINT: Endpoint = USERS_CREATE;

    fn params(&self) -> Params {
        Params::new().with("name", &self.name)
    }
}

#[derive(Debug, Clone)]
pub struct UsersEdit {
    pub uuid: String,
    pub name: Option<String>,
}

impl Operation for UsersEdit {
    const ENDPOINT: Endpoint = USERS_EDIT;

    fn params(&self) -> Params {
        let mut params = Params::new().with("uuid", &self.uuid);
        params.insert_opt("name", self.name.as_ref());
        params
    }
}

#[derive(Debug, Clone)]
pub struct UsersList {
    pub page_no: u32,
    pub filter: UserFilter,
    pub order_by: OrderBy,
    pub order: SortOrder,
}

impl Default for UsersList {
    fn default() -> Self {
        Self {
            page_no: 1,
            filter: UserFilter::All,
            order_by: OrderBy::CreationTime,
            order: SortOrder::Desc,
        }
    }
}

impl Operation for UsersList {
    const ENDPOINT: Endpoint = USERS_LIST;

    fn params(&self) -> Params {
        Params::new()
            .with("page_no", self.page_no)
            .with("filter", self.filter)
            .with("order_by", self.order_by)
            .with("order", self.order)
    }
}

#[derive(Debug, Clone)]
pub struct UsersAirdropDrop {
    pub amount: f64,
    pub list_type: AirdropListType,
}

impl Operation for UsersAirdropDrop {
    const ENDPOINT: Endpoint = USERS_AIRDROP_DROP;

    fn params(&self) -> Params {
        Params::new()
            .with("amount", self.amount)
            .with("list_type", self.list_type)
    }
}

#[derive(Debug, Clone)]
pub struct UsersAirdropStatus {
    pub airdrop_uuid: String,
}

impl Operation for UsersAirdropStatus {
    const ENDPOINT: Endpoint = USERS_AIRDROP_STATUS;

    fn params(&self) -> Params {
        Params::new().with("airdrop_uuid", &self.airdrop_uuid)
    }
}

#[derive(Debug, Clone)]
pub struct TransactionTypesCreate {
    pub name: String,
    pub kind: TransactionKind,
    pub currency_type: CurrencyType,
    pub currency_value: f64,
    /// Only meaningful for `user_to_user` transaction types.
    pub commission_percent: Option<f64>,
}

impl Operation for TransactionTypesCreate {
    const ENDPOINT: Endpoint = TRANSACTION_TYPES_CREATE;

    fn params(&self) -> Params {
        let mut params = Params::new()
            .with("name", &self.name)
            .with("kind", self.kind)
            .with("currency_type", self.currency_type)
            .with("currency_value", self.currency_value);
        params.insert_opt("commission_percent", self.commission_percent);
        params
    }
}

/// Partial update; unset fields are left unchanged remotely.
#[derive(Debug, Clone, Default)]
pub struct TransactionTypesEdit {
    pub client_transaction_id: String,
    pub name: Option<String>,
    pub kind: Option<TransactionKind>,
    pub currency_type: Option<CurrencyType>,
    pub currency_value: Option<f64>,
    pub commission_percent: Option<f64>,
}

impl Operation for TransactionTypesEdit {
    const ENDPOINT: Endpoint = TRANSACTION_TYPES_EDIT;

    fn params(&self) -> Params {
        let mut params = Params::new().with("client_transaction_id", &self.client_transaction_id);
        params.insert_opt("name", self.name.as_ref());
        params.insert_opt("kind", self.kind);
        params.insert_opt("currency_type", self.currency_type);
        params.insert_opt("currency_value", self.currency_value);
        params.insert_opt("commission_percent", self.commission_percent);
        params
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionTypesList;

impl Operation for TransactionTypesList {
    const ENDPOINT: Endpoint = TRANSACTION_TYPES_LIST;

    fn params(&self) -> Params {
        Params::new()
    }
}

#[derive(Debug, Clone)]
pub struct TransactionTypesExecute {
    pub from_uuid: String,
    pub to_uuid: String,
    pub transaction_kind: String,
}

impl Operation for TransactionTypesExecute {
    const ENDPOINT: Endpoint = TRANSACTION_TYPES_EXECUTE;

    fn params(&self) -> Params {
        Params::new()
            .with("from_uuid", &self.from_uuid)
            .with("to_uuid", &self.to_uuid)
            .with("transaction_kind", &self.transaction_kind)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionTypesStatus {
    pub transaction_uuids: Vec<String>,
}

impl Operation for TransactionTypesStatus {
    const ENDPOINT: Endpoint = TRANSACTION_TYPES_STATUS;

    fn params(&self) -> Params {
        Params::new().with("transaction_uuids", self.transaction_uuids.clone())
    }
}
