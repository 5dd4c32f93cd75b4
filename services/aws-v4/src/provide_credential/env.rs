// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::constants::*;
use crate::Credentials;
use apisign_core::time::parse_rfc3339;
use apisign_core::{Context, Error, ProvideCredential, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;

/// EnvCredentialProvider loads temporary credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `AWS_ACCESS_KEY_ID`: The access key ID
/// - `AWS_SECRET_ACCESS_KEY`: The secret access key
/// - `AWS_SESSION_TOKEN`: The session token
/// - `AWS_CREDENTIAL_EXPIRATION`: RFC 3339 expiration (optional)
///
/// Nothing is loaded unless the first three are all present. Without an
/// expiration the bundle never expires.
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credentials;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let envs = ctx.env_vars();

        let (Some(ak), Some(sk), Some(token)) = (
            envs.get(AWS_ACCESS_KEY_ID),
            envs.get(AWS_SECRET_ACCESS_KEY),
            envs.get(AWS_SESSION_TOKEN),
        ) else {
            debug!("env credential provider: credentials not found in env");
            return Ok(None);
        };

        let expiration = match envs.get(AWS_CREDENTIAL_EXPIRATION) {
            Some(v) => parse_rfc3339(v).map_err(|e| {
                Error::config_invalid(format!("{AWS_CREDENTIAL_EXPIRATION} is not RFC 3339"))
                    .with_source(e)
            })?,
            None => DateTime::<Utc>::MAX_UTC,
        };

        Ok(Some(Credentials::new(
            ak.clone(),
            sk.clone(),
            token.clone(),
            expiration,
        )))
    }
}
