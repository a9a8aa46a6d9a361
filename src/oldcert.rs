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

//! Old certificate decoding for update flows.
//!
//! A caller updating an existing certificate supplies that certificate (or
//! its whole chain) and its private key. Only the first certificate of the
//! chain matters: it carries the identity to compare against the new CSR, it
//! travels in the key update request's extraCerts field, and its key signs
//! the message protection.

use base64::prelude::*;
use der::{Decode, DecodePem};
use pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use x509_cert::ext::pkix::SubjectAltName;
use x509_cert::Certificate;

use crate::error::{CmpError, Result};
use crate::identity::IdentityData;

const CERT_END_MARKER: &str = "-----END CERTIFICATE-----";

/// First certificate of a caller-supplied chain, with its private key.
#[derive(Clone)]
pub struct OldCertificateModel {
    certificate: Certificate,
    identity: IdentityData,
    private_key: RsaPrivateKey,
}

impl OldCertificateModel {
    /// Decode a base64 PEM certificate chain and its base64 PEM PKCS#8 key.
    ///
    /// Certificate problems are reported as
    /// [`CmpError::OldCertificateDecryption`], key problems as
    /// [`CmpError::KeyDecryption`].
    pub fn decode(cert_base64: &str, key_base64: &str) -> Result<Self> {
        let certificate = decode_first_certificate(cert_base64)?;
        let private_key = decode_private_key(key_base64)?;

        let subject = certificate.tbs_certificate.subject.clone();
        let sans = extract_sans(&certificate)?;
        let identity = IdentityData::new(subject, &sans);

        tracing::debug!(identity = %identity, "decoded old certificate");

        Ok(Self {
            certificate,
            identity,
            private_key,
        })
    }

    /// The old certificate.
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// Identity carried by the old certificate.
    pub fn identity(&self) -> &IdentityData {
        &self.identity
    }

    /// Private key of the old certificate.
    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }
}

impl std::fmt::Debug for OldCertificateModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OldCertificateModel")
            .field("identity", &self.identity.to_string())
            .field("private_key", &"*****")
            .finish()
    }
}

fn decode_first_certificate(cert_base64: &str) -> Result<Certificate> {
    let pem_bytes = BASE64_STANDARD
        .decode(strip_whitespace(cert_base64))
        .map_err(|e| {
            CmpError::old_certificate_decryption(format!("Invalid base64 encoding: {}", e))
        })?;

    let pem = String::from_utf8(pem_bytes)
        .map_err(|e| CmpError::old_certificate_decryption(format!("Invalid PEM text: {}", e)))?;

    let Some(end) = pem.find(CERT_END_MARKER) else {
        return Err(CmpError::old_certificate_decryption(
            "Input does not contain a PEM certificate",
        ));
    };
    let first = &pem[..end + CERT_END_MARKER.len()];

    Certificate::from_pem(first.as_bytes())
        .map_err(|e| CmpError::old_certificate_decryption(format!("Invalid certificate: {}", e)))
}

fn decode_private_key(key_base64: &str) -> Result<RsaPrivateKey> {
    let pem = BASE64_STANDARD
        .decode(strip_whitespace(key_base64))
        .map_err(|e| CmpError::key_decryption(format!("Invalid base64 encoding: {}", e)))?;

    let (label, der) = pem_rfc7468::decode_vec(&pem)
        .map_err(|e| CmpError::key_decryption(format!("Invalid PEM encoding: {}", e)))?;
    if label != "PRIVATE KEY" {
        return Err(CmpError::key_decryption(format!(
            "Expected 'PRIVATE KEY' PEM block, got '{}'",
            label
        )));
    }

    RsaPrivateKey::from_pkcs8_der(&der)
        .map_err(|e| CmpError::key_decryption(format!("Invalid PKCS#8 structure: {}", e)))
}

fn extract_sans(
    certificate: &Certificate,
) -> Result<Vec<x509_cert::ext::pkix::name::GeneralName>> {
    let Some(extensions) = &certificate.tbs_certificate.extensions else {
        return Ok(Vec::new());
    };

    for extension in extensions {
        if extension.extn_id == const_oid::db::rfc5912::ID_CE_SUBJECT_ALT_NAME {
            let san = SubjectAltName::from_der(extension.extn_value.as_bytes()).map_err(|e| {
                CmpError::old_certificate_decryption(format!("Invalid SAN extension: {}", e))
            })?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn test_decode_takes_first_certificate_of_chain() {
        let chain = format!(
            "{}\n{}",
            test_support::CLIENT_CERT_PEM,
            test_support::INTERMEDIATE_CA_PEM
        );
        let model = OldCertificateModel::decode(
            &BASE64_STANDARD.encode(chain),
            &test_support::key_base64(),
        )
        .unwrap();

        assert!(model
            .identity()
            .subject()
            .to_string()
            .contains("client.onap.org"));
        assert_eq!(model.identity().sans().len(), 2);
    }

    #[test]
    fn test_decode_rejects_input_without_certificate() {
        let err = OldCertificateModel::decode(
            &BASE64_STANDARD.encode("no pem certificate in here"),
            &test_support::key_base64(),
        )
        .unwrap_err();

        assert!(matches!(err, CmpError::OldCertificateDecryption(_)));
    }

    #[test]
    fn test_decode_rejects_bad_key() {
        let err = OldCertificateModel::decode(
            &BASE64_STANDARD.encode(test_support::CLIENT_CERT_PEM),
            "not-base64!!!",
        )
        .unwrap_err();

        assert!(matches!(err, CmpError::KeyDecryption(_)));
    }
}
