use crate::constants::*;
use crate::{Credentials, RequestSigner, SigningContext};
use apisign_core::time::{format_iso8601, now};
use apisign_core::{Context, Error, ProvideCredential, Result, SigningCredential};
use bytes::Bytes;
use http::{header, HeaderValue, Method, Request, Response, Uri};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("apisign/", env!("CARGO_PKG_VERSION"));

/// Invoker calls an API gateway endpoint with freshly signed requests.
///
/// Every call goes through the same steps:
///
/// 1. load credentials from the provider
/// 2. build the request with `host`, `x-amz-date` and `x-amz-security-token`
/// 3. sign it with [`RequestSigner`]
/// 4. send it through the [`Context`]'s `HttpSend`
///
/// Credentials are loaded again for every call. Both network steps are
/// bounded by the configured timeout.
#[derive(Clone, Debug)]
pub struct Invoker {
    ctx: Context,
    provider: Arc<dyn ProvideCredential<Credential = Credentials>>,
    signer: RequestSigner,
    region: String,
    service: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl Invoker {
    /// Create a new invoker for endpoints in `region`.
    pub fn new(
        ctx: Context,
        provider: impl ProvideCredential<Credential = Credentials>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            ctx,
            provider: Arc::new(provider),
            signer: RequestSigner::new(),
            region: region.into(),
            service: EXECUTE_API.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Send `x-api-key` with every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the deadline for credential loading and for sending, 30s by default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the service name used in the credential scope, `execute-api` by default.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Use a customized request signer.
    pub fn with_signer(mut self, signer: RequestSigner) -> Self {
        self.signer = signer;
        self
    }

    /// Perform a signed `GET` on `url` and return the response body.
    ///
    /// The body is returned as is, whatever the response status.
    pub async fn invoke(&self, url: &str) -> Result<Bytes> {
        let resp = self.send(Method::GET, url, Bytes::new()).await?;
        Ok(resp.into_body())
    }

    /// Perform a signed request and return the full response.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        body: impl Into<Bytes>,
    ) -> Result<Response<Bytes>> {
        let uri: Uri = url.parse()?;
        let host = match (uri.host(), uri.port_u16()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(Error::malformed_url(format!("url {url} has no host")));
            }
        };

        let cred = self.load_credential().await?;

        let timestamp = now();
        let mut security_token = HeaderValue::from_str(&cred.session_token).map_err(|e| {
            Error::credential_exchange_failed("session token is not a valid header value")
                .with_source(e)
        })?;
        security_token.set_sensitive(true);

        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::HOST, host)
            .header(header::USER_AGENT, USER_AGENT)
            .header(X_AMZ_DATE, format_iso8601(timestamp))
            .header(X_AMZ_SECURITY_TOKEN, security_token)
            .body(body.into())?;
        if let Some(api_key) = &self.api_key {
            req.headers_mut()
                .insert(X_API_KEY, HeaderValue::from_str(api_key)?);
        }

        let signing_ctx =
            SigningContext::from_credentials(&cred, &self.region, &self.service, timestamp);
        self.signer.sign(&mut req, &signing_ctx)?;

        debug!("sending {} {}", req.method(), req.uri());
        tokio::time::timeout(self.timeout, self.ctx.http_send(req))
            .await
            .map_err(|_| {
                Error::timeout(format!("request to {url} exceeded {:?}", self.timeout))
            })?
    }

    async fn load_credential(&self) -> Result<Credentials> {
        let cred = tokio::time::timeout(self.timeout, self.provider.provide_credential(&self.ctx))
            .await
            .map_err(|_| {
                Error::timeout(format!("loading credentials exceeded {:?}", self.timeout))
            })??;

        match cred {
            Some(cred) if cred.is_valid() => Ok(cred),
            Some(cred) => {
                warn!("credentials are incomplete or expired: {cred:?}");
                Err(Error::credential_exchange_failed(
                    "credentials are incomplete or expired",
                ))
            }
            None => Err(Error::credential_exchange_failed(
                "credential provider returned no credentials",
            )),
        }
    }
}
