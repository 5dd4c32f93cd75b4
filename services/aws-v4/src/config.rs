use crate::constants::*;
use apisign_core::Context;
use log::debug;

/// Config for signing API gateway calls with Cognito Identity credentials.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// `region` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_REGION`]
    /// - env value: [`AWS_DEFAULT_REGION`]
    pub region: Option<String>,
    /// `identity_pool_id` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_COGNITO_IDENTITY_POOL_ID`]
    pub identity_pool_id: Option<String>,
    /// `identity_id` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_COGNITO_IDENTITY_ID`]
    ///
    /// A known identity id skips the `GetId` exchange.
    pub identity_id: Option<String>,
    /// `cognito_endpoint` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_COGNITO_ENDPOINT`]
    /// - default to `https://cognito-identity.<region>.amazonaws.com/`
    pub cognito_endpoint: Option<String>,
}

impl Config {
    /// Load config from env.
    ///
    /// Fields that are already set win over the environment.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();

        if self.region.is_none() {
            self.region = envs
                .get(AWS_REGION)
                .or_else(|| envs.get(AWS_DEFAULT_REGION))
                .cloned();
        }
        if self.identity_pool_id.is_none() {
            self.identity_pool_id = envs.get(AWS_COGNITO_IDENTITY_POOL_ID).cloned();
        }
        if self.identity_id.is_none() {
            self.identity_id = envs.get(AWS_COGNITO_IDENTITY_ID).cloned();
        }
        if self.cognito_endpoint.is_none() {
            self.cognito_endpoint = envs.get(AWS_COGNITO_ENDPOINT).cloned();
        }

        debug!("config loaded from env: {self:?}");
        self
    }

    /// Cognito Identity endpoint for the configured region.
    pub fn cognito_endpoint(&self) -> Option<String> {
        if let Some(endpoint) = &self.cognito_endpoint {
            return Some(endpoint.clone());
        }

        self.region
            .as_ref()
            .map(|region| format!("https://cognito-identity.{region}.amazonaws.com/"))
    }
}
