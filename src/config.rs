// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 ONAP Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! CA configuration types.
//!
//! This module defines the description of a single CMPv2-capable CA
//! ([`CaRecord`]) and an immutable lookup table over the configured CAs
//! ([`CaRegistry`]). Loading and watching the configuration file is the
//! embedding application's job; this crate only consumes the records.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Deserialize;
use url::Url;
use x509_cert::name::Name;

use crate::error::{CmpError, Result};

/// Maximum accepted length of a CA name.
const MAX_CA_NAME_LENGTH: usize = 128;

/// Description of a single CMPv2 server.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaRecord {
    /// Name under which callers select this CA.
    pub ca_name: String,

    /// CMP endpoint URL of the CA.
    pub url: Url,

    /// Issuer distinguished name, e.g. `"CN=ManagementCA,O=Example"`.
    #[serde(rename = "issuerDN")]
    pub issuer_dn: String,

    /// Mode the CA operates in.
    pub ca_mode: CaMode,

    /// Shared-secret credentials for this CA.
    pub authentication: CaAuthentication,
}

impl CaRecord {
    /// Parse the configured issuer DN into an X.501 name.
    pub fn issuer_name(&self) -> Result<Name> {
        Name::from_str(&self.issuer_dn)
            .map_err(|e| CmpError::protocol(format!("Invalid issuer DN '{}': {}", self.issuer_dn, e)))
    }

    /// Check the record for fields the CMP exchange cannot work without.
    pub fn validate(&self) -> Result<()> {
        if self.ca_name.is_empty() || self.ca_name.len() > MAX_CA_NAME_LENGTH {
            return Err(CmpError::protocol(format!(
                "CA name must be 1..={} characters",
                MAX_CA_NAME_LENGTH
            )));
        }
        if self.authentication.iak.is_empty() {
            return Err(CmpError::protocol("IAK password must not be empty"));
        }
        if self.authentication.rv.is_empty() {
            return Err(CmpError::protocol("RV reference value must not be empty"));
        }
        self.issuer_name()?;
        Ok(())
    }
}

/// Initial authentication credentials shared with the CA.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaAuthentication {
    /// Initial authentication key, the shared secret for MAC protection.
    pub iak: String,

    /// Reference value identifying the secret, sent as the senderKID.
    pub rv: String,
}

impl std::fmt::Debug for CaAuthentication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaAuthentication")
            .field("iak", &"*****")
            .field("rv", &"*****")
            .finish()
    }
}

/// Mode a CA operates in.
///
/// Selects the certificate profile requested from the CA. The CMP exchange
/// itself is identical in both modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CaMode {
    /// Registration-authority profile.
    Ra,
    /// End-entity client profile.
    Client,
}

impl CaMode {
    /// Profile name announced for this mode.
    pub fn profile(&self) -> &'static str {
        match self {
            CaMode::Ra => "RA",
            CaMode::Client => "client",
        }
    }
}

/// Immutable snapshot of the configured CAs, keyed by CA name.
#[derive(Clone, Debug, Default)]
pub struct CaRegistry {
    records: HashMap<String, CaRecord>,
}

impl CaRegistry {
    /// Build a registry from a list of CA records.
    ///
    /// Later records win when two records share a CA name.
    pub fn new(records: impl IntoIterator<Item = CaRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.ca_name.clone(), record))
                .collect(),
        }
    }

    /// Look up a CA record by name.
    pub fn find(&self, ca_name: &str) -> Result<&CaRecord> {
        self.records
            .get(ca_name)
            .ok_or_else(|| CmpError::ca_not_found(ca_name))
    }

    /// Number of configured CAs.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no CA is configured.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
