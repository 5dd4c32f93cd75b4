//! Call an API gateway endpoint with Cognito Identity credentials.
//!
//! ```shell
//! AWS_REGION=ap-northeast-1 \
//! AWS_COGNITO_IDENTITY_POOL_ID=ap-northeast-1:00000000-0000-0000-0000-000000000000 \
//! API_URL=https://abc123.execute-api.ap-northeast-1.amazonaws.com/prod/items \
//! cargo run --example invoke_api
//! ```

use apisign_aws_v4::{CognitoIdentityCredentialProvider, Config, Invoker};
use apisign_core::{Context, OsEnv};
use apisign_http_send_reqwest::ReqwestHttpSend;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    let config = Config::default().from_env(&ctx);
    let Some(region) = config.region.clone() else {
        anyhow::bail!("AWS_REGION must be set");
    };
    let url = std::env::var("API_URL")?;

    let mut invoker = Invoker::new(
        ctx,
        CognitoIdentityCredentialProvider::from_config(&config),
        region,
    )
    .with_timeout(Duration::from_secs(10));
    if let Ok(api_key) = std::env::var("API_KEY") {
        invoker = invoker.with_api_key(api_key);
    }

    let body = invoker.invoke(&url).await?;
    println!("{}", String::from_utf8_lossy(&body));

    Ok(())
}
