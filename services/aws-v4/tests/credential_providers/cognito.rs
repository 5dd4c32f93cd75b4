use super::{create_test_context, create_test_context_with_env, is_live_test_enabled};
use crate::server::MockServer;
use apisign_aws_v4::{CognitoIdentityCredentialProvider, Config};
use apisign_core::{ErrorKind, ProvideCredential, SigningCredential};
use chrono::{TimeZone, Utc};
use log::warn;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const GET_ID: &str = r#"{"IdentityId":"ap-northeast-1:11111111-2222-3333-4444-555555555555"}"#;
const GET_CREDENTIALS: &str = r#"{
    "IdentityId": "ap-northeast-1:11111111-2222-3333-4444-555555555555",
    "Credentials": {
        "AccessKeyId": "ASIAEXAMPLEKEYID",
        "SecretKey": "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
        "SessionToken": "session-token-example",
        "Expiration": 1700000000.5
    }
}"#;

#[tokio::test]
async fn test_cognito_exchange_over_http() -> anyhow::Result<()> {
    let server = MockServer::start(vec![(200, GET_ID), (200, GET_CREDENTIALS)]).await;
    let ctx = create_test_context_with_env(&[
        ("AWS_REGION", "ap-northeast-1"),
        (
            "AWS_COGNITO_IDENTITY_POOL_ID",
            "ap-northeast-1:00000000-0000-0000-0000-000000000000",
        ),
        ("AWS_COGNITO_ENDPOINT", &format!("{}/", server.endpoint)),
    ]);

    let config = Config::default().from_env(&ctx);
    let cred = CognitoIdentityCredentialProvider::from_config(&config)
        .provide_credential(&ctx)
        .await?
        .expect("credentials must be loaded");

    assert_eq!(cred.access_key_id, "ASIAEXAMPLEKEYID");
    assert_eq!(cred.session_token, "session-token-example");
    assert_eq!(
        cred.expiration,
        Utc.timestamp_opt(1_700_000_000, 500_000_000).unwrap()
    );

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    for req in &requests {
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/");
        assert_eq!(
            req.header("content-type"),
            Some("application/x-amz-json-1.1")
        );
    }
    assert_eq!(
        requests[0].header("x-amz-target"),
        Some("AWSCognitoIdentityService.GetId")
    );
    assert_eq!(
        requests[1].header("x-amz-target"),
        Some("AWSCognitoIdentityService.GetCredentialsForIdentity")
    );
    assert_eq!(
        serde_json::from_slice::<Value>(&requests[1].body)?,
        json!({"IdentityId": "ap-northeast-1:11111111-2222-3333-4444-555555555555"})
    );
    Ok(())
}

#[tokio::test]
async fn test_cognito_server_error_stops_exchange() {
    let server = MockServer::start(vec![(
        500,
        r#"{"__type":"InternalErrorException","message":"boom"}"#,
    )])
    .await;
    let ctx = create_test_context_with_env(&[]);

    let err = CognitoIdentityCredentialProvider::new()
        .with_identity_pool_id("ap-northeast-1:00000000-0000-0000-0000-000000000000")
        .with_endpoint(format!("{}/", server.endpoint))
        .provide_credential(&ctx)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialExchangeFailed);
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_cognito_unreachable_endpoint() {
    // Bind then drop to get a port nobody listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);

    let err = CognitoIdentityCredentialProvider::new()
        .with_identity_pool_id("ap-northeast-1:00000000-0000-0000-0000-000000000000")
        .with_endpoint(endpoint)
        .provide_credential(&create_test_context_with_env(&[]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialExchangeFailed);
}

#[tokio::test]
async fn test_cognito_live() {
    if !is_live_test_enabled() {
        warn!("APISIGN_AWS_V4_TEST is not set, skipped");
        return;
    }

    // Requires AWS_REGION and AWS_COGNITO_IDENTITY_POOL_ID.
    let ctx = create_test_context();
    let config = Config::default().from_env(&ctx);
    let cred = CognitoIdentityCredentialProvider::from_config(&config)
        .provide_credential(&ctx)
        .await
        .expect("cognito identity should succeed");

    assert!(cred.is_valid(), "cognito should return fresh credentials");
}
