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

//! Outgoing PKIMessage construction.
//!
//! [`CmpRequestFactory`] is the single place request messages are built:
//! initialization and certification requests carry password-based MAC
//! protection keyed from the IAK, with the reference value as senderKID; key
//! update requests are signed by the old certificate's key and carry that
//! certificate in extraCerts.

use std::time::SystemTime;

use der::asn1::{BitString, GeneralizedTime, OctetString};
use der::Encode;
use rand::{Rng, RngCore};
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha2::Sha256;
use spki::AlgorithmIdentifierOwned;
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::ext::pkix::{ExtendedKeyUsage, KeyUsage, KeyUsages, SubjectAltName};
use x509_cert::ext::Extension;
use x509_cert::serial_number::SerialNumber;
use x509_cert::time::Time;
use x509_cert::Certificate;

use crate::csr::CsrModel;
use crate::error::Result;
use crate::metadata::CmpRequestMetadata;
use crate::oldcert::OldCertificateModel;
use crate::protection::{MessageProtection, PasswordBasedMacProtection, SignatureProtection};
use crate::types::{
    oids, CertReqMsg, CertRequest, CertTemplate, InfoTypeAndValue, OptionalValidity, PkiBody,
    PkiHeader, PkiMessage, PopoSigningKey, ProofOfPossession, CERT_TEMPLATE_VERSION,
    CMP_VERSION_2,
};

/// Length of the transactionID and senderNonce header fields in bytes.
const NONCE_LENGTH: usize = 16;

/// Factory for the three request message kinds this client sends.
pub struct CmpRequestFactory;

impl CmpRequestFactory {
    /// Build a protected initialization request (ir).
    pub fn initialization_request(
        metadata: &CmpRequestMetadata,
        csr: &CsrModel,
    ) -> Result<PkiMessage> {
        let body = PkiBody::Ir(vec![build_cert_req_msg(metadata, csr)?]);
        build_mac_protected(metadata, body)
    }

    /// Build a protected certification request (cr).
    pub fn certification_request(
        metadata: &CmpRequestMetadata,
        csr: &CsrModel,
    ) -> Result<PkiMessage> {
        let body = PkiBody::Cr(vec![build_cert_req_msg(metadata, csr)?]);
        build_mac_protected(metadata, body)
    }

    /// Build a signed key update request (kur).
    ///
    /// The old certificate travels in extraCerts so the server can verify the
    /// signature protection; the senderKID stays empty.
    pub fn key_update_request(
        metadata: &CmpRequestMetadata,
        csr: &CsrModel,
        old_certificate: &OldCertificateModel,
    ) -> Result<PkiMessage> {
        let body = PkiBody::Kur(vec![build_cert_req_msg(metadata, csr)?]);
        let protection = SignatureProtection::new(old_certificate.private_key().clone());

        build_message(
            metadata,
            body,
            &protection,
            None,
            Some(vec![old_certificate.certificate().clone()]),
        )
    }
}

fn build_mac_protected(metadata: &CmpRequestMetadata, body: PkiBody) -> Result<PkiMessage> {
    let protection = PasswordBasedMacProtection::new(metadata.iak());
    let sender_kid = OctetString::new(metadata.rv().as_bytes().to_vec())?;

    build_message(metadata, body, &protection, Some(sender_kid), None)
}

fn build_message(
    metadata: &CmpRequestMetadata,
    body: PkiBody,
    protection: &dyn MessageProtection,
    sender_kid: Option<OctetString>,
    extra_certs: Option<Vec<Certificate>>,
) -> Result<PkiMessage> {
    let header = build_header(metadata, protection.algorithm_identifier()?, sender_kid)?;

    let mut message = PkiMessage {
        header,
        body,
        protection: None,
        extra_certs,
    };

    let protected = message.protected_bytes()?;
    message.protection = Some(BitString::from_bytes(&protection.protection_bytes(
        &protected,
    )?)?);

    tracing::debug!(
        subject = %metadata.subject(),
        issuer = %metadata.issuer(),
        "built protected PKIMessage"
    );

    Ok(message)
}

fn build_header(
    metadata: &CmpRequestMetadata,
    protection_alg: AlgorithmIdentifierOwned,
    sender_kid: Option<OctetString>,
) -> Result<PkiHeader> {
    let mut rng = rand::thread_rng();
    let mut transaction_id = [0u8; NONCE_LENGTH];
    rng.fill_bytes(&mut transaction_id);
    let mut sender_nonce = [0u8; NONCE_LENGTH];
    rng.fill_bytes(&mut sender_nonce);

    Ok(PkiHeader {
        pvno: CMP_VERSION_2,
        sender: GeneralName::DirectoryName(metadata.subject().clone()),
        recipient: GeneralName::DirectoryName(metadata.issuer().clone()),
        message_time: Some(GeneralizedTime::from_system_time(SystemTime::now())?),
        protection_alg: Some(protection_alg),
        sender_kid,
        recip_kid: None,
        transaction_id: Some(OctetString::new(transaction_id.to_vec())?),
        sender_nonce: Some(OctetString::new(sender_nonce.to_vec())?),
        recip_nonce: None,
        free_text: None,
        general_info: Some(vec![InfoTypeAndValue::implicit_confirm()]),
    })
}

fn build_cert_req_msg(metadata: &CmpRequestMetadata, csr: &CsrModel) -> Result<CertReqMsg> {
    let cert_req = CertRequest {
        cert_req_id: rand::thread_rng().gen_range(0..i64::from(i32::MAX)),
        cert_template: build_cert_template(metadata, csr)?,
        controls: None,
    };
    let popo = build_proof_of_possession(&cert_req, csr)?;

    Ok(CertReqMsg {
        cert_req,
        popo: Some(popo),
        reg_info: None,
    })
}

fn build_cert_template(metadata: &CmpRequestMetadata, csr: &CsrModel) -> Result<CertTemplate> {
    let validity = match (metadata.not_before(), metadata.not_after()) {
        (None, None) => None,
        (not_before, not_after) => Some(OptionalValidity {
            not_before: not_before.map(to_time).transpose()?,
            not_after: not_after.map(to_time).transpose()?,
        }),
    };

    Ok(CertTemplate {
        version: Some(CERT_TEMPLATE_VERSION),
        serial_number: Some(SerialNumber::new(&[0])?),
        signing_alg: Some(AlgorithmIdentifierOwned {
            oid: oids::SHA256_WITH_RSA,
            parameters: None,
        }),
        issuer: Some(metadata.issuer().clone()),
        validity,
        subject: Some(metadata.subject().clone()),
        public_key: Some(csr.spki().clone()),
        issuer_uid: None,
        subject_uid: None,
        extensions: Some(build_extensions(metadata.sans())?),
    })
}

fn to_time(time: SystemTime) -> Result<Time> {
    Ok(Time::GeneralTime(GeneralizedTime::from_system_time(time)?))
}

/// Requested extensions: TLS client and server usage plus the caller's
/// subject alternative names, all non-critical.
fn build_extensions(sans: &[GeneralName]) -> Result<Vec<Extension>> {
    let key_usage = KeyUsage(
        KeyUsages::DigitalSignature | KeyUsages::NonRepudiation | KeyUsages::KeyEncipherment,
    );
    let extended_key_usage = ExtendedKeyUsage(vec![
        const_oid::db::rfc5912::ID_KP_CLIENT_AUTH,
        const_oid::db::rfc5912::ID_KP_SERVER_AUTH,
    ]);

    let mut extensions = vec![
        Extension {
            extn_id: const_oid::db::rfc5912::ID_CE_KEY_USAGE,
            critical: false,
            extn_value: OctetString::new(key_usage.to_der()?)?,
        },
        Extension {
            extn_id: const_oid::db::rfc5912::ID_CE_EXT_KEY_USAGE,
            critical: false,
            extn_value: OctetString::new(extended_key_usage.to_der()?)?,
        },
    ];

    if !sans.is_empty() {
        let san = SubjectAltName(sans.to_vec());
        extensions.push(Extension {
            extn_id: const_oid::db::rfc5912::ID_CE_SUBJECT_ALT_NAME,
            critical: false,
            extn_value: OctetString::new(san.to_der()?)?,
        });
    }

    Ok(extensions)
}

/// Sign the DER-encoded CertRequest with the key from the CSR.
fn build_proof_of_possession(
    cert_req: &CertRequest,
    csr: &CsrModel,
) -> Result<ProofOfPossession> {
    let signing_key = SigningKey::<Sha256>::new(csr.private_key().clone());
    let signature = signing_key.sign(&cert_req.to_der()?);

    Ok(ProofOfPossession::Signature(PopoSigningKey {
        algorithm: AlgorithmIdentifierOwned {
            oid: oids::SHA256_WITH_RSA,
            parameters: None,
        },
        signature: BitString::from_bytes(&signature.to_vec())?,
    }))
}
