use crate::constants::*;
use crate::{Config, Credentials};
use apisign_core::time::from_epoch_seconds;
use apisign_core::utils::Redact;
use apisign_core::{Context, Error, ErrorKind, ProvideCredential, Result};
use async_trait::async_trait;
use bytes::Bytes;
use http::{header, Method, Request, StatusCode};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

/// Cognito Identity Credentials Provider
///
/// This provider exchanges an identity pool id for temporary credentials in
/// two calls against Amazon Cognito Identity:
///
/// 1. `GetId` resolves the pool id into an identity id.
/// 2. `GetCredentialsForIdentity` turns the identity id into credentials.
///
/// The second call is only issued after the first one succeeded. When the
/// identity id is already known the first call is skipped.
///
/// # Usage
/// ```rust,no_run
/// use apisign_aws_v4::CognitoIdentityCredentialProvider;
///
/// let provider = CognitoIdentityCredentialProvider::new()
///     .with_identity_pool_id("ap-northeast-1:12345678-1234-1234-1234-123456789012")
///     .with_region("ap-northeast-1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CognitoIdentityCredentialProvider {
    identity_pool_id: Option<String>,
    region: Option<String>,
    endpoint: Option<String>,
    identity_id: Option<String>,
    logins: Option<HashMap<String, String>>,
}

impl CognitoIdentityCredentialProvider {
    /// Create a new Cognito Identity credential provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider from a loaded [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self {
            identity_pool_id: config.identity_pool_id.clone(),
            region: config.region.clone(),
            endpoint: config.cognito_endpoint.clone(),
            identity_id: config.identity_id.clone(),
            logins: None,
        }
    }

    /// Set the Cognito Identity Pool ID
    pub fn with_identity_pool_id(mut self, pool_id: impl Into<String>) -> Self {
        self.identity_pool_id = Some(pool_id.into());
        self
    }

    /// Set the region of the identity pool
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Override the Cognito Identity endpoint, mostly useful for tests.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set a specific identity ID (if already known)
    pub fn with_identity_id(mut self, identity_id: impl Into<String>) -> Self {
        self.identity_id = Some(identity_id.into());
        self
    }

    /// Add login tokens from identity providers
    pub fn with_logins(mut self, logins: HashMap<String, String>) -> Self {
        self.logins = Some(logins);
        self
    }

    fn endpoint(&self) -> Result<String> {
        let config = Config {
            region: self.region.clone(),
            cognito_endpoint: self.endpoint.clone(),
            ..Default::default()
        };

        config
            .cognito_endpoint()
            .ok_or_else(|| Error::config_invalid("region is required for cognito identity"))
    }

    /// Resolve `pool_id` into an identity id with `GetId`.
    pub async fn resolve_identity(&self, ctx: &Context, pool_id: &str) -> Result<String> {
        let mut body = json!({ "IdentityPoolId": pool_id });
        if let Some(logins) = &self.logins {
            body["Logins"] = json!(logins);
        }

        let resp: GetIdResponse = self.call(ctx, COGNITO_TARGET_GET_ID, body).await?;
        if resp.identity_id.is_empty() {
            return Err(Error::credential_exchange_failed(
                "cognito GetId returned an empty IdentityId",
            ));
        }

        Ok(resp.identity_id)
    }

    /// Fetch temporary credentials for `identity_id` with `GetCredentialsForIdentity`.
    pub async fn fetch_credentials(&self, ctx: &Context, identity_id: &str) -> Result<Credentials> {
        let mut body = json!({ "IdentityId": identity_id });
        if let Some(logins) = &self.logins {
            body["Logins"] = json!(logins);
        }

        let resp: GetCredentialsResponse = self
            .call(ctx, COGNITO_TARGET_GET_CREDENTIALS_FOR_IDENTITY, body)
            .await?;

        let creds = resp.credentials;
        let expiration = from_epoch_seconds(creds.expiration).map_err(|e| {
            Error::credential_exchange_failed("cognito returned an invalid Expiration")
                .with_source(e)
        })?;

        Ok(Credentials::new(
            creds.access_key_id,
            creds.secret_key,
            creds.session_token,
            expiration,
        ))
    }

    async fn call<T: DeserializeOwned>(&self, ctx: &Context, target: &str, body: Value) -> Result<T> {
        let endpoint = self.endpoint()?;
        debug!("cognito identity: sending {target} to {endpoint}");

        let body = serde_json::to_vec(&body).map_err(|e| {
            Error::unexpected(format!("failed to serialize {target} request")).with_source(e)
        })?;
        let req = Request::builder()
            .method(Method::POST)
            .uri(&endpoint)
            .header(X_AMZ_TARGET, target)
            .header(header::CONTENT_TYPE, COGNITO_CONTENT_TYPE)
            .body(Bytes::from(body))
            .map_err(|e| {
                Error::credential_exchange_failed(format!("failed to build {target} request"))
                    .with_source(e)
            })?;

        let resp = ctx.http_send(req).await.map_err(|e| match e.kind() {
            ErrorKind::Timeout => e,
            _ => Error::credential_exchange_failed(format!("failed to send {target} request"))
                .with_source(e),
        })?;

        if resp.status() != StatusCode::OK {
            return Err(Error::credential_exchange_failed(format!(
                "cognito {target} returned status {}: {}",
                resp.status(),
                String::from_utf8_lossy(resp.body())
            )));
        }

        serde_json::from_slice(resp.body()).map_err(|e| {
            Error::credential_exchange_failed(format!("failed to parse {target} response"))
                .with_source(e)
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetIdResponse {
    identity_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetCredentialsResponse {
    credentials: CognitoCredentials,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CognitoCredentials {
    access_key_id: String,
    secret_key: String,
    session_token: String,
    expiration: f64,
}

impl Debug for CognitoCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CognitoCredentials")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_key", &Redact::from(&self.secret_key))
            .field("session_token", &Redact::from(&self.session_token))
            .field("expiration", &self.expiration)
            .finish()
    }
}

#[async_trait]
impl ProvideCredential for CognitoIdentityCredentialProvider {
    type Credential = Credentials;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let identity_id = match &self.identity_id {
            Some(id) => id.clone(),
            None => {
                let pool_id = self.identity_pool_id.as_deref().ok_or_else(|| {
                    Error::config_invalid("identity_pool_id is required for cognito identity")
                })?;
                self.resolve_identity(ctx, pool_id).await?
            }
        };
        debug!("cognito identity: using identity id {identity_id}");

        let creds = self.fetch_credentials(ctx, &identity_id).await?;
        debug!("cognito identity: credentials expire at {}", creds.expiration);

        Ok(Some(creds))
    }
}
