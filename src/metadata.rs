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

//! Per-request CMP metadata.
//!
//! [`CmpRequestMetadata`] gathers everything a single CMP exchange needs
//! beyond the key material: the names that go into header and template, the
//! CA credentials, and an optional requested validity window. It is assembled
//! once per request and never mutated.

use std::time::SystemTime;

use url::Url;
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::name::Name;

use crate::config::{CaMode, CaRecord};
use crate::csr::CsrModel;
use crate::error::{CmpError, Result};

/// Immutable inputs of one CMP exchange.
#[derive(Clone, Debug)]
pub struct CmpRequestMetadata {
    subject: Name,
    sans: Vec<GeneralName>,
    issuer: Name,
    ca_url: Url,
    iak: String,
    rv: String,
    ca_mode: CaMode,
    not_before: Option<SystemTime>,
    not_after: Option<SystemTime>,
}

impl CmpRequestMetadata {
    /// Assemble metadata from a decoded CSR and the CA record.
    ///
    /// The subject and SANs are taken from the CSR in their original order;
    /// issuer, URL, and credentials come verbatim from the record.
    pub fn assemble(csr: &CsrModel, ca: &CaRecord) -> Result<Self> {
        Ok(Self {
            subject: csr.subject().clone(),
            sans: csr.sans().to_vec(),
            issuer: ca.issuer_name()?,
            ca_url: ca.url.clone(),
            iak: ca.authentication.iak.clone(),
            rv: ca.authentication.rv.clone(),
            ca_mode: ca.ca_mode,
            not_before: None,
            not_after: None,
        })
    }

    /// Attach a requested validity window.
    ///
    /// Fails if `not_before` lies after `not_after`.
    pub fn with_validity(
        mut self,
        not_before: Option<SystemTime>,
        not_after: Option<SystemTime>,
    ) -> Result<Self> {
        if let (Some(before), Some(after)) = (not_before, not_after) {
            if before > after {
                return Err(CmpError::protocol(
                    "Requested notBefore date is set after the notAfter date",
                ));
            }
        }
        self.not_before = not_before;
        self.not_after = not_after;
        Ok(self)
    }

    /// Subject name for template and header sender.
    pub fn subject(&self) -> &Name {
        &self.subject
    }

    /// Subject alternative names for the template.
    pub fn sans(&self) -> &[GeneralName] {
        &self.sans
    }

    /// Issuer name for template and header recipient.
    pub fn issuer(&self) -> &Name {
        &self.issuer
    }

    /// CMP endpoint of the CA.
    pub fn ca_url(&self) -> &Url {
        &self.ca_url
    }

    /// Initial authentication key for MAC protection.
    pub fn iak(&self) -> &str {
        &self.iak
    }

    /// Reference value sent as the senderKID.
    pub fn rv(&self) -> &str {
        &self.rv
    }

    /// Mode of the CA this request goes to.
    pub fn ca_mode(&self) -> CaMode {
        self.ca_mode
    }

    /// Requested start of validity, if any.
    pub fn not_before(&self) -> Option<SystemTime> {
        self.not_before
    }

    /// Requested end of validity, if any.
    pub fn not_after(&self) -> Option<SystemTime> {
        self.not_after
    }
}
