//! Stub transport shared by unit tests.

use std::sync::{Arc, Mutex};

use futures::future::{self, BoxFuture};

use crate::client::OstClient;
use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::transport::{ApiRequest, Transport};
use crate::types::Envelope;

type Responder = Box<dyn Fn(&ApiRequest) -> Result<Envelope, TransportError> + Send + Sync>;

/// Records every request and answers with a canned response.
pub(crate) struct StubTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responder: Responder,
}

impl StubTransport {
    pub(crate) fn new(
        responder: impl Fn(&ApiRequest) -> Result<Envelope, TransportError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    pub(crate) fn returning(envelope: Envelope) -> Arc<Self> {
        Self::new(move |_| Ok(envelope.clone()))
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for StubTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<Envelope, TransportError>> {
        let response = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        Box::pin(future::ready(response))
    }
}

pub(crate) fn test_client(transport: Arc<StubTransport>) -> OstClient {
    OstClient::with_transport(
        "apikey",
        "apisecret",
        ClientConfig::with_base_url("http://www.demo.com"),
        transport,
    )
    .unwrap()
}
