//! Browser transport to the analysis engine, built on `fetch`.

use crate::config::{AppConfig, Endpoint};
use crate::error::TransportError;
use crate::oracle::analysis::{
    CheckRequest, CheckResponse, CompareRequest, CompareStats, LivenessStats, ReachabilityStats,
    SyntaxCheckOutcome, SyntaxCheckResponse, SynchronizedProductRequest,
};
use crate::oracle::{Oracle, SimulateRequest};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, Request, RequestInit, Response};

pub struct FetchOracle {
    config: AppConfig,
    signal: Option<AbortSignal>,
}

impl FetchOracle {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            signal: None,
        }
    }

    /// Requests are aborted when `signal` fires and then fail with
    /// [`TransportError::Cancelled`].
    pub fn with_signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    pub async fn syntax_check(&self, sysdecl: &str) -> Result<SyntaxCheckOutcome, TransportError> {
        let body = self
            .put(Endpoint::SyntaxCheck, &JsValue::from_str(sysdecl), false)
            .await?;
        let response: SyntaxCheckResponse = serde_json::from_str(&body)?;
        Ok(response.into())
    }

    pub async fn to_dot(&self, sysdecl: &str) -> Result<String, TransportError> {
        self.put_text_for_json(Endpoint::ToDot, sysdecl).await
    }

    pub async fn to_json(&self, sysdecl: &str) -> Result<String, TransportError> {
        self.put_text_for_json(Endpoint::ToJson, sysdecl).await
    }

    pub async fn synchronized_product(
        &self,
        request: &SynchronizedProductRequest,
    ) -> Result<String, TransportError> {
        self.put_json(Endpoint::SynchronizedProduct, request).await
    }

    /// Returns the parsed stats and the raw certificate.
    pub async fn reachability(
        &self,
        request: &CheckRequest,
    ) -> Result<(ReachabilityStats, String), TransportError> {
        let response: CheckResponse = self.put_json_for(Endpoint::Reachability, request).await?;
        Ok((ReachabilityStats::parse(&response.stats), response.certificate))
    }

    pub async fn liveness(
        &self,
        request: &CheckRequest,
    ) -> Result<(LivenessStats, String), TransportError> {
        let response: CheckResponse = self.put_json_for(Endpoint::Liveness, request).await?;
        Ok((LivenessStats::parse(&response.stats), response.certificate))
    }

    pub async fn compare(
        &self,
        request: &CompareRequest,
    ) -> Result<(CompareStats, String), TransportError> {
        let response: CheckResponse = self.put_json_for(Endpoint::Compare, request).await?;
        Ok((CompareStats::parse(&response.stats), response.certificate))
    }

    async fn put_text_for_json(
        &self,
        endpoint: Endpoint,
        sysdecl: &str,
    ) -> Result<String, TransportError> {
        let body = self
            .put(endpoint, &JsValue::from_str(sysdecl), false)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn put_json_for<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: &impl Serialize,
    ) -> Result<T, TransportError> {
        let body = self.put_json(endpoint, request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn put_json(
        &self,
        endpoint: Endpoint,
        request: &impl Serialize,
    ) -> Result<String, TransportError> {
        let json = serde_json::to_string(request)?;
        self.put(endpoint, &JsValue::from_str(&json), true).await
    }

    async fn put(
        &self,
        endpoint: Endpoint,
        body: &JsValue,
        is_json: bool,
    ) -> Result<String, TransportError> {
        let url = self.config.endpoint_url(endpoint);
        debug!(%url, "sending request to analysis engine");

        let init = RequestInit::new();
        init.set_method("PUT");
        init.set_body(body);
        init.set_signal(self.signal.as_ref());
        let request = Request::new_with_str_and_init(&url, &init).map_err(network_error)?;
        if is_json {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(network_error)?;
        }

        let window = web_sys::window()
            .ok_or_else(|| TransportError::Network(String::from("no window available")))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport_error)?
            .dyn_into()
            .map_err(network_error)?;
        let text = JsFuture::from(response.text().map_err(network_error)?)
            .await
            .map_err(transport_error)?
            .as_string()
            .unwrap_or_default();

        if !response.ok() {
            return Err(TransportError::Status {
                status: response.status(),
                body: text,
            });
        }
        Ok(text)
    }
}

impl Oracle for FetchOracle {
    async fn simulate(&self, request: &SimulateRequest) -> Result<String, TransportError> {
        self.put_json(Endpoint::Simulate, request).await
    }
}

fn transport_error(err: JsValue) -> TransportError {
    let name = js_sys::Reflect::get(&err, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string());
    match name.as_deref() {
        Some("AbortError") => TransportError::Cancelled,
        _ => network_error(err),
    }
}

fn network_error(err: impl Into<JsValue>) -> TransportError {
    TransportError::Network(format!("{:?}", err.into()))
}
