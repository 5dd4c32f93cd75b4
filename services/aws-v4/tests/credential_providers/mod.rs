mod cognito;

use apisign_core::{Context, OsEnv, StaticEnv};
use apisign_http_send_reqwest::ReqwestHttpSend;
use std::collections::HashMap;

pub fn create_test_context() -> Context {
    let _ = env_logger::builder().is_test(true).try_init();

    Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
}

pub fn create_test_context_with_env(envs: &[(&str, &str)]) -> Context {
    let _ = env_logger::builder().is_test(true).try_init();

    let envs = envs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<HashMap<_, _>>();
    Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(StaticEnv { envs })
}

/// Live tests only run with `APISIGN_AWS_V4_TEST=on`.
pub fn is_live_test_enabled() -> bool {
    std::env::var("APISIGN_AWS_V4_TEST").as_deref() == Ok("on")
}
