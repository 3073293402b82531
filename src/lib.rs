pub mod client;
pub mod config;
pub mod credential;
pub mod endpoints;
pub mod error;
pub mod monitor;
pub mod query;
pub mod signer;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::OstClient;
pub use config::ClientConfig;
pub use credential::Credentials;
pub use endpoints::{
    Endpoint, Operation, TransactionTypesCreate, TransactionTypesEdit, TransactionTypesExecute,
    TransactionTypesList, TransactionTypesStatus, UsersAirdropDrop, UsersAirdropStatus,
    UsersCreate, UsersEdit, UsersList,
};
pub use error::{Error, Result, TransportError};
pub use query::{ParamValue, Params};
pub use transport::{ApiRequest, HttpTransport, Transport};
pub use types::{
    AirdropListType, CurrencyType, Envelope, Method, OrderBy, SortOrder, TransactionKind,
    TransactionRecord, TransactionStatus, UserFilter,
};
