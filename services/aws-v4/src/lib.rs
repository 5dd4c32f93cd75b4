//! Signing API gateway requests with AWS Signature Version 4.
//!
//! This crate signs HTTP requests for endpoints that authenticate callers with
//! SigV4, typically API Gateway (`execute-api`) behind a Cognito identity pool.
//!
//! ## Quick Start
//!
//! ```no_run
//! use apisign_aws_v4::{CognitoIdentityCredentialProvider, Config, Invoker};
//! use apisign_core::{Context, OsEnv, Result};
//! use apisign_http_send_reqwest::ReqwestHttpSend;
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//!
//! // Reads AWS_REGION and AWS_COGNITO_IDENTITY_POOL_ID.
//! let config = Config::default().from_env(&ctx);
//! let provider = CognitoIdentityCredentialProvider::from_config(&config);
//! let region = config.region.clone().unwrap_or_default();
//!
//! let invoker = Invoker::new(ctx, provider, region).with_api_key("my-api-key");
//! let body = invoker
//!     .invoke("https://abc123.execute-api.ap-northeast-1.amazonaws.com/prod/items")
//!     .await?;
//! println!("{}", String::from_utf8_lossy(&body));
//! # Ok(())
//! # }
//! ```
//!
//! ## Signing without the invoker
//!
//! [`RequestSigner`] is a pure function of the request and a [`SigningContext`].
//! The caller sets `host`, `x-amz-date` and `x-amz-security-token` first:
//!
//! ```
//! use apisign_aws_v4::{RequestSigner, SigningContext};
//! use apisign_core::time::{format_iso8601, now};
//!
//! # fn example() -> apisign_core::Result<()> {
//! let timestamp = now();
//! let mut req = http::Request::builder()
//!     .uri("https://abc123.execute-api.ap-northeast-1.amazonaws.com/prod/items")
//!     .header("host", "abc123.execute-api.ap-northeast-1.amazonaws.com")
//!     .header("x-amz-date", format_iso8601(timestamp))
//!     .body(Vec::<u8>::new())?;
//!
//! let ctx = SigningContext::new(
//!     timestamp,
//!     "ap-northeast-1",
//!     "execute-api",
//!     "access_key_id",
//!     "secret_access_key",
//! );
//! RequestSigner::new().sign(&mut req, &ctx)?;
//! assert!(req.headers().contains_key("authorization"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Credential Providers
//!
//! - [`CognitoIdentityCredentialProvider`]: two-step Cognito Identity exchange
//! - [`EnvCredentialProvider`]: `AWS_ACCESS_KEY_ID` and friends
//! - [`StaticCredentialProvider`]: a fixed credentials bundle

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

pub mod canonical;
pub use canonical::{CanonicalRequest, QueryEncoding};

mod config;
pub use config::Config;

mod credential;
pub use credential::Credentials;

mod signing_key;
pub use signing_key::{credential_scope, derive_signing_key, generate_signing_key};

mod sign_request;
pub use sign_request::{string_to_sign, RequestSigner, SigningContext};

mod provide_credential;
pub use provide_credential::*;

mod invoker;
pub use invoker::Invoker;
