use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::config::ClientConfig;
use crate::credential::Credentials;
use crate::endpoints::{
    Operation, TransactionTypesCreate, TransactionTypesEdit, TransactionTypesExecute,
    TransactionTypesList, TransactionTypesStatus, UsersAirdropDrop, UsersAirdropStatus,
    UsersCreate, UsersEdit, UsersList,
};
use crate::error::{Error, Result};
use crate::monitor::MonitorState;
use crate::query::{Params, canonicalize, unix_timestamp};
use crate::transport::{ApiRequest, HttpTransport, Transport};
use crate::types::Method;

/// Signed-request client for the OST KIT API.
///
/// Cloning is cheap and every clone shares the same credentials, transport
/// and transaction monitor.
#[derive(Clone)]
pub struct OstClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    credentials: Credentials,
    transport: Arc<dyn Transport>,
    pub(crate) config: ClientConfig,
    monitor: Mutex<MonitorState>,
}

impl OstClient {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, api_secret, ClientConfig::default())
    }

    pub fn with_config(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        // Validate before building anything network related
        let credentials = Credentials::new(api_key, api_secret)?;
        let transport = HttpTransport::with_timeout(config.base_url.clone(), config.timeout)?;
        Ok(Self::from_parts(credentials, config, Arc::new(transport)))
    }

    /// Build a client on top of a custom transport (stubs, proxies, recording layers).
    pub fn with_transport(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let credentials = Credentials::new(api_key, api_secret)?;
        Ok(Self::from_parts(credentials, config, transport))
    }

    /// Credentials and configuration from `OSTKIT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let credentials = Credentials::from_env()?;
        let config = ClientConfig::from_env()?;
        let transport = HttpTransport::with_timeout(config.base_url.clone(), config.timeout)?;
        Ok(Self::from_parts(credentials, config, Arc::new(transport)))
    }

    fn from_parts(
        credentials: Credentials,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                credentials,
                transport,
                config,
                monitor: Mutex::new(MonitorState::default()),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Signed GET; the canonical query and signature travel in the URL.
    pub async fn do_get(&self, endpoint: &str, params: Params) -> Result<Value> {
        self.inner.dispatch(Method::Get, endpoint, params).await
    }

    /// Signed POST; the canonical query and signature travel in the body.
    pub async fn do_post(&self, endpoint: &str, params: Params) -> Result<Value> {
        self.inner.dispatch(Method::Post, endpoint, params).await
    }

    /// Dispatch any catalog operation.
    pub async fn execute<O: Operation>(&self, operation: &O) -> Result<Value> {
        self.inner.execute(operation).await
    }

    pub async fn users_create(&self, args: UsersCreate) -> Result<Value> {
        self.execute(&args).await
    }

    pub async fn users_edit(&self, args: UsersEdit) -> Result<Value> {
        self.execute(&args).await
    }

    pub async fn users_list(&self, args: UsersList) -> Result<Value> {
        self.execute(&args).await
    }

    pub async fn users_airdrop_drop(&self, args: UsersAirdropDrop) -> Result<Value> {
        self.execute(&args).await
    }

    pub async fn users_airdrop_status(&self, args: UsersAirdropStatus) -> Result<Value> {
        self.execute(&args).await
    }

    pub async fn transaction_types_create(&self, args: TransactionTypesCreate) -> Result<Value> {
        self.execute(&args).await
    }

    pub async fn transaction_types_edit(&self, args: TransactionTypesEdit) -> Result<Value> {
        self.execute(&args).await
    }

    pub async fn transaction_types_list(&self) -> Result<Value> {
        self.execute(&TransactionTypesList).await
    }

    pub async fn transaction_types_execute(&self, args: TransactionTypesExecute) -> Result<Value> {
        self.execute(&args).await
    }

    pub async fn transaction_types_status(&self, args: TransactionTypesStatus) -> Result<Value> {
        self.execute(&args).await
    }
}

impl fmt::Debug for OstClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OstClient")
            .field("credentials", &self.inner.credentials)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ClientInner {
    pub(crate) fn lock_monitor(&self) -> MutexGuard<'_, MonitorState> {
        self.monitor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) async fn execute<O: Operation>(&self, operation: &O) -> Result<Value> {
        let endpoint = O::ENDPOINT;
        self.dispatch(endpoint.method, endpoint.path, operation.params())
            .await
    }

    async fn dispatch(&self, method: Method, endpoint: &str, params: Params) -> Result<Value> {
        let query = canonicalize(params, self.credentials.api_key(), unix_timestamp());
        let signature = self.credentials.sign(&format!("{}?{}", endpoint, query));

        let request = match method {
            Method::Get => ApiRequest {
                method,
                target: format!("{}?{}&signature={}", endpoint, query, signature),
                body: None,
            },
            Method::Post => ApiRequest {
                method,
                target: endpoint.to_string(),
                body: Some(format!("{}&signature={}", query, signature)),
            },
        };

        tracing::debug!(%method, endpoint, "dispatching signed request");
        let envelope = self.transport.send(request).await?;

        if !envelope.success {
            let message = envelope.error_message();
            tracing::debug!(%method, endpoint, error = %message, "request rejected by API");
            return Err(Error::Remote(message));
        }

        Ok(envelope.data)
    }
}
