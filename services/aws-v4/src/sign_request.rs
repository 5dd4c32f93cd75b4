use crate::canonical::{CanonicalRequest, QueryEncoding};
use crate::constants::AWS4_HMAC_SHA256;
use crate::signing_key::{credential_scope, generate_signing_key};
use crate::Credentials;
use apisign_core::hash::{hex_hmac_sha256, hex_sha256};
use apisign_core::time::{format_iso8601, DateTime};
use apisign_core::utils::Redact;
use apisign_core::{Error, Result};
use http::request::Parts;
use http::{header, HeaderMap, HeaderValue, Method, Request, Uri};
use log::debug;
use std::fmt::{Debug, Formatter};

/// Everything needed to derive a scoped signing key for one request.
///
/// Build a fresh context for every signing call. `timestamp` must be the same
/// instant that was written into the request's `x-amz-date` header.
#[derive(Clone)]
pub struct SigningContext {
    /// Signing instant, second precision is used.
    pub timestamp: DateTime,
    /// Region of the target endpoint, for example `ap-northeast-1`.
    pub region: String,
    /// Service name, `execute-api` for API Gateway.
    pub service: String,
    /// Access key id placed into the `Credential=` part of the header.
    pub access_key: String,
    /// Secret key the signing key is derived from.
    pub secret_key: String,
}

impl SigningContext {
    /// Create a new signing context.
    pub fn new(
        timestamp: DateTime,
        region: impl Into<String>,
        service: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            region: region.into(),
            service: service.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Create a signing context from a credentials bundle.
    pub fn from_credentials(
        cred: &Credentials,
        region: impl Into<String>,
        service: impl Into<String>,
        timestamp: DateTime,
    ) -> Self {
        Self::new(
            timestamp,
            region,
            service,
            cred.access_key_id.clone(),
            cred.secret_access_key.clone(),
        )
    }

    /// Credential scope of this context: "20220313/<region>/<service>/aws4_request"
    pub fn credential_scope(&self) -> String {
        credential_scope(self.timestamp, &self.region, &self.service)
    }
}

impl Debug for SigningContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningContext")
            .field("timestamp", &self.timestamp)
            .field("region", &self.region)
            .field("service", &self.service)
            .field("access_key", &Redact::from(&self.access_key))
            .field("secret_key", &Redact::from(&self.secret_key))
            .finish()
    }
}

/// RequestSigner that implement AWS SigV4 with the `Authorization` header.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// The signer never adds headers besides `Authorization`: every header present
/// on the request when [`RequestSigner::sign`] is called is signed, and every
/// header added afterwards breaks verification. Set `host`, `x-amz-date` and
/// `x-amz-security-token` before signing.
///
/// Signing is a pure computation. The same request and context always produce
/// the same header, and a failed call leaves the request untouched.
#[derive(Debug, Clone, Default)]
pub struct RequestSigner {
    query_encoding: QueryEncoding,
}

impl RequestSigner {
    /// Create a new signer with [`QueryEncoding::Raw`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose how the query string is canonicalized.
    pub fn with_query_encoding(mut self, query_encoding: QueryEncoding) -> Self {
        self.query_encoding = query_encoding;
        self
    }

    /// Sign a request in place by setting its `Authorization` header.
    pub fn sign<B: AsRef<[u8]>>(&self, req: &mut Request<B>, ctx: &SigningContext) -> Result<()> {
        let authorization = self.authorization(
            req.method(),
            req.uri(),
            req.headers(),
            req.body().as_ref(),
            ctx,
        )?;

        req.headers_mut()
            .insert(header::AUTHORIZATION, authorization);
        Ok(())
    }

    /// Sign request parts whose body is held separately.
    pub fn sign_parts(&self, parts: &mut Parts, body: &[u8], ctx: &SigningContext) -> Result<()> {
        let authorization =
            self.authorization(&parts.method, &parts.uri, &parts.headers, body, ctx)?;

        parts.headers.insert(header::AUTHORIZATION, authorization);
        Ok(())
    }

    /// Calculate the hex encoded signature without touching the request.
    pub fn signature(&self, parts: &Parts, body: &[u8], ctx: &SigningContext) -> Result<String> {
        let creq = CanonicalRequest::build(
            &parts.method,
            &parts.uri,
            &parts.headers,
            body,
            self.query_encoding,
        )?;

        Ok(calculate_signature(&creq, ctx))
    }

    fn authorization(
        &self,
        method: &Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: &[u8],
        ctx: &SigningContext,
    ) -> Result<HeaderValue> {
        let creq = CanonicalRequest::build(method, uri, headers, body, self.query_encoding)?;
        let signature = calculate_signature(&creq, ctx);

        let mut authorization = HeaderValue::from_str(&format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            AWS4_HMAC_SHA256,
            ctx.access_key,
            ctx.credential_scope(),
            creq.signed_headers(),
            signature
        ))
        .map_err(|e| {
            Error::encoding("access key can't be used in authorization header").with_source(e)
        })?;
        authorization.set_sensitive(true);

        Ok(authorization)
    }
}

/// StringToSign:
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(creq: &CanonicalRequest, ctx: &SigningContext) -> String {
    let creq = creq.to_string();
    debug!("calculated canonical request: {creq}");

    format!(
        "{}\n{}\n{}\n{}",
        AWS4_HMAC_SHA256,
        format_iso8601(ctx.timestamp),
        ctx.credential_scope(),
        hex_sha256(creq.as_bytes())
    )
}

fn calculate_signature(creq: &CanonicalRequest, ctx: &SigningContext) -> String {
    let string_to_sign = string_to_sign(creq, ctx);
    debug!("calculated string to sign: {string_to_sign}");

    let signing_key = generate_signing_key(&ctx.secret_key, ctx.timestamp, &ctx.region, &ctx.service);
    hex_hmac_sha256(&signing_key, string_to_sign.as_bytes())
}
