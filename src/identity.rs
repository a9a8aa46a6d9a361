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

//! Certificate identity comparison.
//!
//! An identity is a subject distinguished name plus the set of subject
//! alternative names. Whether a new CSR keeps the identity of an existing
//! certificate decides between a key update request and a fresh certification
//! request.

use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::name::Name;

/// Subject and subject alternative names of a certificate or CSR.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityData {
    subject: Name,
    sans: Vec<GeneralName>,
}

impl IdentityData {
    /// Build an identity; the SANs are kept sorted by their string form so
    /// two identities compare independently of input order.
    pub fn new(subject: Name, sans: &[GeneralName]) -> Self {
        let mut sans = sans.to_vec();
        sans.sort_by_key(general_name_string);
        Self { subject, sans }
    }

    /// Subject distinguished name.
    pub fn subject(&self) -> &Name {
        &self.subject
    }

    /// Sorted subject alternative names.
    pub fn sans(&self) -> &[GeneralName] {
        &self.sans
    }

    /// Returns true if both identities name the same entity: equal subjects
    /// and the same set of SANs, regardless of order.
    pub fn matches(&self, other: &IdentityData) -> bool {
        self.subject == other.subject
            && contains_all(&self.sans, &other.sans)
            && contains_all(&other.sans, &self.sans)
    }
}

impl std::fmt::Display for IdentityData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sans: Vec<String> = self.sans.iter().map(general_name_string).collect();
        write!(f, "subject={}, sans=[{}]", self.subject, sans.join(", "))
    }
}

fn contains_all(haystack: &[GeneralName], needles: &[GeneralName]) -> bool {
    needles.iter().all(|needle| haystack.contains(needle))
}

/// Render a general name the way it is logged and sorted.
pub(crate) fn general_name_string(name: &GeneralName) -> String {
    match name {
        GeneralName::DnsName(dns) => format!("DNS:{}", dns),
        GeneralName::Rfc822Name(email) => format!("email:{}", email),
        GeneralName::UniformResourceIdentifier(uri) => format!("URI:{}", uri),
        GeneralName::IpAddress(octets) => {
            let rendered: Vec<String> =
                octets.as_bytes().iter().map(|b| b.to_string()).collect();
            format!("IP:{}", rendered.join("."))
        }
        GeneralName::DirectoryName(dir) => format!("DirName:{}", dir),
        GeneralName::RegisteredId(oid) => format!("RID:{}", oid),
        GeneralName::OtherName(_) => "otherName".to_string(),
        GeneralName::EdiPartyName(_) => "ediPartyName".to_string(),
    }
}
