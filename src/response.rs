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

//! Certificate extraction from CMP responses.
//!
//! A granted response carries the issued certificate in the body and the rest
//! of the chain spread over extraCerts and caPubs. The chain is rebuilt by
//! walking issuer links from the leaf upwards; the self-signed root and
//! whatever else the server sent become the trusted set.

use der::pem::LineEnding;
use der::{Encode, EncodePem};
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier;
use rsa::RsaPublicKey;
use sha2::Sha256;
use x509_cert::Certificate;

use crate::error::{CmpError, Result};
use crate::types::{oids, PkiBody, PkiMessage};
use crate::validation::check_response_status;

/// Issued certificate chain and trust anchors, as PEM strings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CertificationResult {
    certificate_chain: Vec<String>,
    trusted_certificates: Vec<String>,
}

impl CertificationResult {
    /// Chain from the issued certificate up to, but excluding, the root.
    pub fn certificate_chain(&self) -> &[String] {
        &self.certificate_chain
    }

    /// Self-signed root and any further certificates the server published.
    pub fn trusted_certificates(&self) -> &[String] {
        &self.trusted_certificates
    }
}

/// Extract the issued chain and trust anchors from a verified response.
///
/// The protection must already have been checked; this only inspects body
/// contents.
pub fn extract_certification_result(message: &PkiMessage) -> Result<CertificationResult> {
    if let PkiBody::Error(error) = &message.body {
        return Err(CmpError::server_rejected(
            error
                .pki_status_info
                .status_text()
                .unwrap_or("N/A")
                .to_string(),
        ));
    }

    let Some(cert_rep) = message.body.cert_rep() else {
        return Err(CmpError::protocol(
            "Response body is not a certification response",
        ));
    };

    let Some(response) = cert_rep.response.first() else {
        return Err(CmpError::protocol(
            "Certification response contains no CertResponse",
        ));
    };
    check_response_status(&response.status)?;

    let leaf = response
        .certified_key_pair
        .as_ref()
        .and_then(|pair| pair.cert_or_enc_cert.certificate())
        .ok_or_else(|| {
            CmpError::protocol("Granted response carries no plain certificate")
        })?;

    let mut pool = build_certificate_pool(message, cert_rep.ca_pubs.as_deref(), leaf)?;
    let (chain, trusted) = walk_chain(leaf, &mut pool)?;

    tracing::info!(
        chain_length = chain.len(),
        trusted = trusted.len(),
        "extracted issued certificate chain"
    );

    Ok(CertificationResult {
        certificate_chain: encode_pem_list(&chain)?,
        trusted_certificates: encode_pem_list(&trusted)?,
    })
}

/// All chain-building material in response order, extraCerts before caPubs,
/// leaf and duplicate subjects excluded.
fn build_certificate_pool(
    message: &PkiMessage,
    ca_pubs: Option<&[Certificate]>,
    leaf: &Certificate,
) -> Result<Vec<(Vec<u8>, Certificate)>> {
    let leaf_der = leaf.to_der()?;
    let mut pool: Vec<(Vec<u8>, Certificate)> = Vec::new();

    let extra = message.extra_certs.as_deref().unwrap_or_default();
    for cert in extra.iter().chain(ca_pubs.unwrap_or_default()) {
        if cert.to_der()? == leaf_der {
            continue;
        }
        let subject = cert.tbs_certificate.subject.to_der()?;
        if pool.iter().any(|(existing, _)| *existing == subject) {
            continue;
        }
        pool.push((subject, cert.clone()));
    }

    Ok(pool)
}

fn take_by_subject(pool: &mut Vec<(Vec<u8>, Certificate)>, subject: &[u8]) -> Option<Certificate> {
    let index = pool.iter().position(|(existing, _)| existing == subject)?;
    Some(pool.remove(index).1)
}

/// Walk issuer links from the leaf to the self-signed root.
///
/// Returns the chain without the root, and the trusted set: the root first,
/// then whatever the pool still holds, in the order the server sent it.
fn walk_chain(
    leaf: &Certificate,
    pool: &mut Vec<(Vec<u8>, Certificate)>,
) -> Result<(Vec<Certificate>, Vec<Certificate>)> {
    let mut chain = vec![leaf.clone()];
    let mut current = leaf.clone();

    while !is_self_signed(&current)? {
        let issuer = current.tbs_certificate.issuer.to_der()?;
        let Some(parent) = take_by_subject(pool, &issuer) else {
            return Err(CmpError::protocol(
                "Server response does not contain proper root CA certificate",
            ));
        };
        verify_issued_by(&current, &parent)?;

        if is_self_signed(&parent)? {
            let mut trusted = vec![parent];
            trusted.extend(pool.drain(..).map(|(_, cert)| cert));
            return Ok((chain, trusted));
        }

        chain.push(parent.clone());
        current = parent;
    }

    // The leaf itself was self-signed; nothing above it to trust.
    Ok((chain, pool.drain(..).map(|(_, cert)| cert).collect()))
}

fn is_self_signed(cert: &Certificate) -> Result<bool> {
    Ok(cert.tbs_certificate.subject.to_der()? == cert.tbs_certificate.issuer.to_der()?)
}

/// Check that `parent` really signed `child`. Only RSA with SHA-256 is
/// verified; other algorithms pass through with a debug note.
fn verify_issued_by(child: &Certificate, parent: &Certificate) -> Result<()> {
    if child.signature_algorithm.oid != oids::SHA256_WITH_RSA {
        tracing::debug!(
            algorithm = %child.signature_algorithm.oid,
            "skipping chain link verification for non-RSA signature"
        );
        return Ok(());
    }

    let spki_der = parent
        .tbs_certificate
        .subject_public_key_info
        .to_der()?;
    let Ok(public_key) = RsaPublicKey::from_public_key_der(&spki_der) else {
        tracing::debug!("skipping chain link verification, issuer key is not RSA");
        return Ok(());
    };

    let signature = child
        .signature
        .as_bytes()
        .ok_or_else(|| CmpError::protocol("Certificate signature has unused bits"))?;
    let signature = Signature::try_from(signature)
        .map_err(|e| CmpError::signature_verification(format!("Malformed signature: {}", e)))?;

    VerifyingKey::<Sha256>::new(public_key)
        .verify(&child.tbs_certificate.to_der()?, &signature)
        .map_err(|e| {
            CmpError::signature_verification(format!(
                "Certificate chain link does not verify: {}",
                e
            ))
        })
}

/// Render certificates as PEM, keeping response order. Entries that render
/// to an empty string are dropped rather than handed to the caller.
fn encode_pem_list(certificates: &[Certificate]) -> Result<Vec<String>> {
    let mut rendered = Vec::with_capacity(certificates.len());
    for cert in certificates {
        let pem = cert.to_pem(LineEnding::LF)?;
        if !pem.is_empty() {
            rendered.push(pem);
        }
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use der::DecodePem;
    use crate::types::{
        CertOrEncCert, CertRepMessage, CertResponse, CertifiedKeyPair, ErrorMsgContent,
        PkiStatusInfo, PKI_STATUS_ACCEPTED, PKI_STATUS_REJECTION,
    };

    fn granted_response(
        leaf: Certificate,
        extra_certs: Vec<Certificate>,
        ca_pubs: Vec<Certificate>,
    ) -> PkiMessage {
        let rep = CertRepMessage {
            ca_pubs: (!ca_pubs.is_empty()).then_some(ca_pubs),
            response: vec![CertResponse {
                cert_req_id: 7,
                status: PkiStatusInfo {
                    status: PKI_STATUS_ACCEPTED,
                    status_string: None,
                    fail_info: None,
                },
                certified_key_pair: Some(CertifiedKeyPair {
                    cert_or_enc_cert: CertOrEncCert::Certificate(leaf),
                    private_key: None,
                    publication_info: None,
                }),
                rsp_info: None,
            }],
        };

        PkiMessage {
            header: test_support::minimal_header(),
            body: PkiBody::Ip(rep),
            protection: None,
            extra_certs: (!extra_certs.is_empty()).then_some(extra_certs),
        }
    }

    #[test]
    fn test_chain_is_rebuilt_and_root_lands_in_trusted() {
        let message = granted_response(
            test_support::client_certificate(),
            vec![test_support::intermediate_certificate()],
            vec![test_support::root_certificate()],
        );

        let result = extract_certification_result(&message).unwrap();

        assert_eq!(result.certificate_chain().len(), 2);
        assert_eq!(result.trusted_certificates().len(), 1);
        assert!(result.certificate_chain()[0].starts_with("-----BEGIN CERTIFICATE-----"));

        let chain_first = Certificate::from_pem(result.certificate_chain()[0].as_bytes()).unwrap();
        assert_eq!(chain_first, test_support::client_certificate());
        let trusted = Certificate::from_pem(result.trusted_certificates()[0].as_bytes()).unwrap();
        assert_eq!(trusted, test_support::root_certificate());
    }

    #[test]
    fn test_all_material_in_ca_pubs_works_too() {
        let message = granted_response(
            test_support::client_certificate(),
            vec![],
            vec![
                test_support::intermediate_certificate(),
                test_support::root_certificate(),
            ],
        );

        let result = extract_certification_result(&message).unwrap();
        assert_eq!(result.certificate_chain().len(), 2);
        assert_eq!(result.trusted_certificates().len(), 1);
    }

    #[test]
    fn test_trusted_set_keeps_response_order() {
        // Two standalone CAs ride along in caPubs, one before and one after
        // the chain root. They must come back after the root in the order the
        // server sent them.
        let message = granted_response(
            test_support::client_certificate(),
            vec![test_support::intermediate_certificate()],
            vec![
                test_support::secondary_root_certificate(),
                test_support::root_certificate(),
                test_support::legacy_root_certificate(),
            ],
        );

        let result = extract_certification_result(&message).unwrap();

        let trusted: Vec<Certificate> = result
            .trusted_certificates()
            .iter()
            .map(|pem| Certificate::from_pem(pem.as_bytes()).unwrap())
            .collect();
        assert_eq!(
            trusted,
            vec![
                test_support::root_certificate(),
                test_support::secondary_root_certificate(),
                test_support::legacy_root_certificate(),
            ]
        );
    }

    #[test]
    fn test_missing_intermediate_is_a_protocol_error() {
        let message = granted_response(
            test_support::client_certificate(),
            vec![],
            vec![test_support::root_certificate()],
        );

        let err = extract_certification_result(&message).unwrap_err();
        assert!(
            matches!(err, CmpError::Protocol(ref msg) if msg.contains("root CA certificate"))
        );
    }

    #[test]
    fn test_missing_root_is_a_protocol_error() {
        let message = granted_response(
            test_support::client_certificate(),
            vec![test_support::intermediate_certificate()],
            vec![],
        );

        let err = extract_certification_result(&message).unwrap_err();
        assert!(matches!(err, CmpError::Protocol(_)));
    }

    #[test]
    fn test_error_body_surfaces_server_text() {
        let message = PkiMessage {
            header: test_support::minimal_header(),
            body: PkiBody::Error(ErrorMsgContent {
                pki_status_info: PkiStatusInfo {
                    status: PKI_STATUS_REJECTION,
                    status_string: Some(vec!["no such profile".into()]),
                    fail_info: None,
                },
                error_code: None,
                error_details: None,
            }),
            protection: None,
            extra_certs: None,
        };

        let err = extract_certification_result(&message).unwrap_err();
        assert!(matches!(err, CmpError::ServerRejected(ref msg) if msg == "no such profile"));
    }

    #[test]
    fn test_rejection_status_surfaces_as_server_rejected() {
        let mut message = granted_response(
            test_support::client_certificate(),
            vec![test_support::intermediate_certificate()],
            vec![test_support::root_certificate()],
        );
        if let PkiBody::Ip(rep) = &mut message.body {
            rep.response[0].status.status = PKI_STATUS_REJECTION;
            rep.response[0].status.status_string = None;
        }

        let err = extract_certification_result(&message).unwrap_err();
        assert!(matches!(err, CmpError::ServerRejected(ref msg) if msg == "N/A"));
    }
}
