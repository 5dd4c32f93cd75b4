use crate::Credentials;
use apisign_core::{Context, ProvideCredential, Result};
use async_trait::async_trait;

/// StaticCredentialProvider hands out a fixed credentials bundle.
///
/// Useful when credentials were obtained out of band, or to drive the
/// [`Invoker`](crate::Invoker) without a network exchange.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credentials: Credentials,
}

impl StaticCredentialProvider {
    /// Create a new StaticCredentialProvider with the given bundle.
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credentials;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credentials.clone()))
    }
}
