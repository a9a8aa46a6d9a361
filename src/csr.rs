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

//! CSR and private key decoding.
//!
//! Callers hand in a base64-encoded PEM PKCS#10 certification request and a
//! base64-encoded PEM PKCS#8 private key. [`CsrModel::decode`] turns the pair
//! into an immutable model carrying the subject, the requested subject
//! alternative names, and the key material used for proof of possession.

use base64::prelude::*;
use der::{Decode, Encode};
use pkcs8::DecodePrivateKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::{RsaPrivateKey, RsaPublicKey};
use spki::SubjectPublicKeyInfoOwned;
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::ext::pkix::SubjectAltName;
use x509_cert::ext::Extensions;
use x509_cert::name::Name;
use x509_cert::request::CertReq;

use crate::error::{CmpError, Result};
use crate::identity::general_name_string;
use crate::types::oids;

/// PEM label of a PKCS#10 certification request.
const CSR_PEM_LABEL: &str = "CERTIFICATE REQUEST";

/// PEM label of a PKCS#8 private key.
const KEY_PEM_LABEL: &str = "PRIVATE KEY";

/// Decoded certification request and its key material.
///
/// Constructed exclusively through [`CsrModel::decode`]; the fields never
/// change afterwards. The private key is not checked against the CSR public
/// key: a mismatch surfaces later as a proof-of-possession failure at the CA.
#[derive(Clone)]
pub struct CsrModel {
    subject: Name,
    sans: Vec<GeneralName>,
    spki: SubjectPublicKeyInfoOwned,
    public_key: RsaPublicKey,
    private_key: RsaPrivateKey,
}

impl CsrModel {
    /// Decode a base64 PEM CSR and a base64 PEM PKCS#8 private key.
    ///
    /// CSR problems are reported as [`CmpError::CsrDecryption`], key problems
    /// as [`CmpError::KeyDecryption`], so callers can tell the two inputs
    /// apart.
    pub fn decode(csr_base64: &str, key_base64: &str) -> Result<Self> {
        let cert_req = decode_cert_req(csr_base64)?;
        let private_key = decode_private_key(key_base64)?;

        let subject = cert_req.info.subject.clone();
        let sans = extract_sans(&cert_req)?;
        let spki = cert_req.info.public_key.clone();
        let public_key = decode_public_key(&spki)?;

        tracing::debug!(subject = %subject, sans = sans.len(), "decoded certification request");

        Ok(Self {
            subject,
            sans,
            spki,
            public_key,
            private_key,
        })
    }

    /// Subject distinguished name from the CSR.
    pub fn subject(&self) -> &Name {
        &self.subject
    }

    /// Subject alternative names requested in the CSR.
    pub fn sans(&self) -> &[GeneralName] {
        &self.sans
    }

    /// Public key info from the CSR, as placed into the certificate template.
    pub fn spki(&self) -> &SubjectPublicKeyInfoOwned {
        &self.spki
    }

    /// RSA public key from the CSR.
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    /// RSA private key paired with the request.
    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }
}

impl std::fmt::Debug for CsrModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsrModel")
            .field("subject", &self.subject.to_string())
            .field("sans", &self.sans.len())
            .field("private_key", &"*****")
            .finish()
    }
}

impl std::fmt::Display for CsrModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sans: Vec<String> = self.sans.iter().map(general_name_string).collect();
        write!(f, "subject={}, sans=[{}]", self.subject, sans.join(", "))
    }
}

fn decode_cert_req(csr_base64: &str) -> Result<CertReq> {
    let pem = BASE64_STANDARD
        .decode(strip_whitespace(csr_base64))
        .map_err(|e| CmpError::csr_decryption(format!("Invalid base64 encoding: {}", e)))?;

    let (label, der) = pem_rfc7468::decode_vec(&pem)
        .map_err(|e| CmpError::csr_decryption(format!("Invalid PEM encoding: {}", e)))?;
    if label != CSR_PEM_LABEL {
        return Err(CmpError::csr_decryption(format!(
            "Expected '{}' PEM block, got '{}'",
            CSR_PEM_LABEL, label
        )));
    }

    CertReq::from_der(&der)
        .map_err(|e| CmpError::csr_decryption(format!("Invalid PKCS#10 structure: {}", e)))
}

fn decode_private_key(key_base64: &str) -> Result<RsaPrivateKey> {
    let pem = BASE64_STANDARD
        .decode(strip_whitespace(key_base64))
        .map_err(|e| CmpError::key_decryption(format!("Invalid base64 encoding: {}", e)))?;

    let (label, der) = pem_rfc7468::decode_vec(&pem)
        .map_err(|e| CmpError::key_decryption(format!("Invalid PEM encoding: {}", e)))?;
    if label != KEY_PEM_LABEL {
        return Err(CmpError::key_decryption(format!(
            "Expected '{}' PEM block, got '{}'",
            KEY_PEM_LABEL, label
        )));
    }

    RsaPrivateKey::from_pkcs8_der(&der)
        .map_err(|e| CmpError::key_decryption(format!("Invalid PKCS#8 structure: {}", e)))
}

fn decode_public_key(spki: &SubjectPublicKeyInfoOwned) -> Result<RsaPublicKey> {
    let der = spki
        .to_der()
        .map_err(|e| CmpError::csr_decryption(format!("Invalid public key info: {}", e)))?;
    RsaPublicKey::from_public_key_der(&der)
        .map_err(|e| CmpError::csr_decryption(format!("Unsupported public key: {}", e)))
}

/// Pull the subject alternative names out of the PKCS#9 extensionRequest
/// attribute. A CSR without the attribute, or without a SAN extension inside
/// it, yields an empty list.
fn extract_sans(cert_req: &CertReq) -> Result<Vec<GeneralName>> {
    let Some(attribute) = cert_req
        .info
        .attributes
        .iter()
        .find(|attr| attr.oid == oids::EXTENSION_REQUEST)
    else {
        return Ok(Vec::new());
    };

    let Some(value) = attribute.values.iter().next() else {
        return Ok(Vec::new());
    };

    let extensions: Extensions = value
        .decode_as()
        .map_err(|e| CmpError::csr_decryption(format!("Invalid extensionRequest: {}", e)))?;

    for extension in &extensions {
        if extension.extn_id == const_oid::db::rfc5912::ID_CE_SUBJECT_ALT_NAME {
            let san = SubjectAltName::from_der(extension.extn_value.as_bytes())
                .map_err(|e| CmpError::csr_decryption(format!("Invalid SAN extension: {}", e)))?;
            return Ok(san.0);
        }
    }

    Ok(Vec::new())
}

fn strip_whitespace(input: &str) -> Vec<u8> {
    input
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect()
}
