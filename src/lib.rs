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

//! # cmp-ra-client
//!
//! A Rust client for certificate enrollment over CMPv2 (RFC 4210) against a
//! registration authority such as EJBCA.
//!
//! Callers hand in a base64-encoded PEM PKCS#10 certification request, the
//! matching base64-encoded PEM PKCS#8 private key, and the name of a
//! configured CA; back comes the issued certificate chain together with the
//! trust anchors the CA published, both as PEM strings. Supplying the
//! certificate being replaced turns the exchange into a key update.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cmp_ra_client::{CaRegistry, CertificationRequest, CmpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = std::fs::read_to_string("cmp-servers.json")?;
//!     let records: Vec<cmp_ra_client::CaRecord> = serde_json::from_str(&config)?;
//!     let client = CmpClient::new(CaRegistry::new(records))?;
//!
//!     let request = CertificationRequest::new(
//!         std::env::var("CSR_BASE64")?,
//!         std::env::var("KEY_BASE64")?,
//!         "TestCA",
//!     );
//!     let result = client.sign_csr(&request).await?;
//!
//!     for pem in result.certificate_chain() {
//!         println!("{}", pem);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## RFC 4210 Coverage
//!
//! This library implements the end-entity side of:
//! - Initialization requests (`ir`/`ip`) with password-based MAC protection
//! - Certification requests (`cr`/`cp`) for changed identities
//! - Key update requests (`kur`/`kup`) signed by the old certificate's key
//! - Response protection verification, both MAC and signature
//! - Certificate chain reconstruction from `extraCerts` and `caPubs`
//!
//! Transport is plain HTTP per RFC 6712; message confirmation is skipped via
//! the implicit-confirm extension of RFC 4210 section 5.1.1.1.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod config;
pub mod csr;
pub mod error;
pub mod identity;
pub mod keys;
pub mod metadata;
pub mod oldcert;
pub mod protection;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main types at crate root for convenience
pub use client::{CertificationRequest, CmpClient};
pub use config::{CaAuthentication, CaMode, CaRecord, CaRegistry};
pub use csr::CsrModel;
pub use error::{CmpError, Result};
pub use keys::RsaKeyGenerator;
pub use oldcert::OldCertificateModel;
pub use response::CertificationResult;
pub use transport::{CmpTransport, HttpCmpTransport};

// Re-export x509_cert::Certificate for convenience
pub use x509_cert::Certificate;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
