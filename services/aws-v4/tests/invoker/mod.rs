use crate::server::{MockServer, RecordedRequest};
use apisign_aws_v4::{
    CognitoIdentityCredentialProvider, Credentials, Invoker, RequestSigner, SigningContext,
    StaticCredentialProvider,
};
use apisign_core::time::now;
use apisign_core::{Context, ErrorKind};
use apisign_http_send_reqwest::ReqwestHttpSend;
use chrono::{NaiveDateTime, TimeDelta};
use http::Method;
use pretty_assertions::assert_eq;
use std::time::Duration;

const SECRET_KEY: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

fn context() -> Context {
    let _ = env_logger::builder().is_test(true).try_init();

    Context::new().with_http_send(ReqwestHttpSend::default())
}

fn credentials() -> Credentials {
    Credentials::new(
        "ASIAEXAMPLEKEYID",
        SECRET_KEY,
        "session-token-example",
        now() + TimeDelta::try_hours(1).unwrap(),
    )
}

/// Recompute the signature the way a gateway would, from what reached the wire.
fn verify(req: &RecordedRequest, endpoint: &str, region: &str) -> anyhow::Result<()> {
    let authorization = req.header("authorization").expect("must be signed");
    let signed_headers = authorization
        .split("SignedHeaders=")
        .nth(1)
        .and_then(|v| v.split(',').next())
        .expect("signed headers must exist");
    let signature = authorization.rsplit("Signature=").next().unwrap();

    let mut builder = http::Request::builder()
        .method(req.method.as_str())
        .uri(format!("{endpoint}{}", req.path));
    for name in signed_headers.split(';') {
        builder = builder.header(name, req.header(name).expect("signed header must be sent"));
    }
    let (parts, _) = builder.body(())?.into_parts();

    let date = req.header("x-amz-date").expect("date must be sent");
    let timestamp = NaiveDateTime::parse_from_str(date, "%Y%m%dT%H%M%SZ")?.and_utc();
    let ctx = SigningContext::new(
        timestamp,
        region,
        "execute-api",
        "ASIAEXAMPLEKEYID",
        SECRET_KEY,
    );

    assert_eq!(
        RequestSigner::new().signature(&parts, &req.body, &ctx)?,
        signature
    );
    Ok(())
}

#[tokio::test]
async fn test_invoke_over_http() -> anyhow::Result<()> {
    let server = MockServer::start(vec![(200, r#"{"items":[]}"#)]).await;
    let invoker = Invoker::new(
        context(),
        StaticCredentialProvider::new(credentials()),
        "ap-northeast-1",
    )
    .with_api_key("api-key-1");

    let body = invoker
        .invoke(&format!("{}/prod/items?limit=10&next=a%2Fb", server.endpoint))
        .await?;
    assert_eq!(body.as_ref(), br#"{"items":[]}"#);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, "GET");
    assert_eq!(req.path, "/prod/items?limit=10&next=a%2Fb");
    assert_eq!(req.header("x-api-key"), Some("api-key-1"));
    assert_eq!(
        req.header("x-amz-security-token"),
        Some("session-token-example")
    );
    assert!(req.header("user-agent").unwrap().starts_with("apisign/"));

    verify(req, &server.endpoint, "ap-northeast-1")
}

#[tokio::test]
async fn test_send_post_over_http() -> anyhow::Result<()> {
    let server = MockServer::start(vec![(201, r#"{"id":1}"#)]).await;
    let invoker = Invoker::new(
        context(),
        StaticCredentialProvider::new(credentials()),
        "us-west-2",
    );

    let resp = invoker
        .send(
            Method::POST,
            &format!("{}/prod/items", server.endpoint),
            r#"{"name":"apisign"}"#,
        )
        .await?;
    assert_eq!(resp.status(), 201);

    let requests = server.requests();
    assert_eq!(requests[0].body, br#"{"name":"apisign"}"#);
    verify(&requests[0], &server.endpoint, "us-west-2")
}

#[tokio::test]
async fn test_invoke_returns_error_bodies() -> anyhow::Result<()> {
    let server = MockServer::start(vec![(403, r#"{"message":"Forbidden"}"#)]).await;
    let invoker = Invoker::new(
        context(),
        StaticCredentialProvider::new(credentials()),
        "ap-northeast-1",
    );

    let body = invoker
        .invoke(&format!("{}/prod/items", server.endpoint))
        .await?;
    assert_eq!(body.as_ref(), br#"{"message":"Forbidden"}"#);
    Ok(())
}

#[tokio::test]
async fn test_invoke_with_cognito() -> anyhow::Result<()> {
    let cognito = MockServer::start(vec![
        (
            200,
            r#"{"IdentityId":"ap-northeast-1:11111111-2222-3333-4444-555555555555"}"#,
        ),
        (
            200,
            r#"{"Credentials":{"AccessKeyId":"ASIAEXAMPLEKEYID","SecretKey":"wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY","SessionToken":"session-token-example","Expiration":4102444800}}"#,
        ),
    ])
    .await;
    let gateway = MockServer::start(vec![(200, "ok")]).await;

    let provider = CognitoIdentityCredentialProvider::new()
        .with_identity_pool_id("ap-northeast-1:00000000-0000-0000-0000-000000000000")
        .with_endpoint(format!("{}/", cognito.endpoint));
    let invoker = Invoker::new(context(), provider, "ap-northeast-1");

    let body = invoker
        .invoke(&format!("{}/prod/items", gateway.endpoint))
        .await?;
    assert_eq!(body.as_ref(), b"ok");
    assert_eq!(cognito.requests().len(), 2);

    verify(&gateway.requests()[0], &gateway.endpoint, "ap-northeast-1")
}

#[tokio::test]
async fn test_invoke_cognito_failure_skips_gateway() {
    let cognito = MockServer::start(vec![(400, r#"{"__type":"NotAuthorizedException"}"#)]).await;
    let gateway = MockServer::start(vec![(200, "ok")]).await;

    let provider = CognitoIdentityCredentialProvider::new()
        .with_identity_pool_id("ap-northeast-1:00000000-0000-0000-0000-000000000000")
        .with_endpoint(format!("{}/", cognito.endpoint));
    let err = Invoker::new(context(), provider, "ap-northeast-1")
        .with_timeout(Duration::from_secs(5))
        .invoke(&format!("{}/prod/items", gateway.endpoint))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialExchangeFailed);
    assert!(gateway.requests().is_empty());
}
