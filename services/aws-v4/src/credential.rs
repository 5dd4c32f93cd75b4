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

use apisign_core::time::{now, DateTime};
use apisign_core::utils::Redact;
use apisign_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Temporary credentials issued for one identity.
///
/// The bundle is immutable once built. Providers create it from a trusted
/// response and callers hand it to the signer unchanged.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Access key id used in the credential scope of the `Authorization` header.
    pub access_key_id: String,
    /// Secret key the signing key is derived from. Never sent on the wire.
    pub secret_access_key: String,
    /// Session token, sent as `x-amz-security-token`.
    pub session_token: String,
    /// Instant after which the server rejects this bundle.
    pub expiration: DateTime,
}

impl Credentials {
    /// Create a new credentials bundle.
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
        expiration: DateTime,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.into(),
            expiration,
        }
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .field("expiration", &self.expiration)
            .finish()
    }
}

impl SigningCredential for Credentials {
    fn is_valid(&self) -> bool {
        if self.access_key_id.is_empty()
            || self.secret_access_key.is_empty()
            || self.session_token.is_empty()
        {
            return false;
        }

        // Take 120s as buffer to avoid edge cases.
        self.expiration > now() + chrono::TimeDelta::try_minutes(2).expect("in bounds")
    }
}
