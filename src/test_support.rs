//! Shared fixtures for unit tests.
//!
//! The PEM files under `tests/fixtures/` form a small PKI: a self-signed
//! root, an intermediate CA, and a client certificate issued from `csr.pem`
//! with the key in `key.pem`.

use base64::prelude::*;
use der::asn1::BitString;
use der::{DecodePem, Encode};
use pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use std::str::FromStr;
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::name::Name;
use x509_cert::Certificate;

use crate::config::{CaAuthentication, CaMode, CaRecord};
use crate::csr::CsrModel;
use crate::oldcert::OldCertificateModel;
use crate::protection::{MessageProtection, PasswordBasedMacProtection, SignatureProtection};
use crate::types::{
    CertOrEncCert, CertRepMessage, CertResponse, CertifiedKeyPair, ErrorMsgContent, PkiBody,
    PkiHeader, PkiMessage, PkiStatusInfo, CMP_VERSION_2, PKI_STATUS_ACCEPTED,
    PKI_STATUS_REJECTION,
};

/// Client certificate issued from `csr.pem` by the intermediate CA.
pub const CLIENT_CERT_PEM: &str = include_str!("../tests/fixtures/client_cert.pem");

/// Intermediate CA certificate, signed by the root.
pub const INTERMEDIATE_CA_PEM: &str = include_str!("../tests/fixtures/intermediate_ca.pem");

/// Self-signed root CA certificate.
pub const ROOT_CA_PEM: &str = include_str!("../tests/fixtures/root_ca.pem");

/// Standalone self-signed CAs, unrelated to the issuing chain.
pub const SECONDARY_ROOT_CA_PEM: &str = include_str!("../tests/fixtures/secondary_root_ca.pem");
pub const LEGACY_ROOT_CA_PEM: &str = include_str!("../tests/fixtures/legacy_root_ca.pem");

const CSR_PEM: &str = include_str!("../tests/fixtures/csr.pem");
const CSR_NO_SANS_PEM: &str = include_str!("../tests/fixtures/csr_no_sans.pem");
const CSR_DIFFERENT_IDENTITY_PEM: &str =
    include_str!("../tests/fixtures/csr_different_identity.pem");
const KEY_PEM: &str = include_str!("../tests/fixtures/key.pem");
const INTERMEDIATE_KEY_PEM: &str = include_str!("../tests/fixtures/inter_key.pem");

/// IAK secret the test CA record uses.
pub const IAK: &str = "secret-iak";

/// RV reference value the test CA record uses.
pub const RV: &str = "reference-value";

pub fn csr_base64() -> String {
    BASE64_STANDARD.encode(CSR_PEM)
}

pub fn csr_no_sans_base64() -> String {
    BASE64_STANDARD.encode(CSR_NO_SANS_PEM)
}

pub fn csr_different_identity_base64() -> String {
    BASE64_STANDARD.encode(CSR_DIFFERENT_IDENTITY_PEM)
}

pub fn key_base64() -> String {
    BASE64_STANDARD.encode(KEY_PEM)
}

pub fn client_cert_base64() -> String {
    BASE64_STANDARD.encode(CLIENT_CERT_PEM)
}

pub fn csr_model() -> CsrModel {
    CsrModel::decode(&csr_base64(), &key_base64()).unwrap()
}

pub fn old_certificate_model() -> OldCertificateModel {
    OldCertificateModel::decode(&client_cert_base64(), &key_base64()).unwrap()
}

pub fn ca_record() -> CaRecord {
    CaRecord {
        ca_name: "TestCA".into(),
        url: url::Url::parse("http://127.0.0.1:8080/ejbca/publicweb/cmp/cmp").unwrap(),
        issuer_dn: "CN=ManagementCA,O=ONAP".into(),
        ca_mode: CaMode::Ra,
        authentication: CaAuthentication {
            iak: IAK.into(),
            rv: RV.into(),
        },
    }
}

pub fn client_certificate() -> Certificate {
    Certificate::from_pem(CLIENT_CERT_PEM.as_bytes()).unwrap()
}

pub fn intermediate_certificate() -> Certificate {
    Certificate::from_pem(INTERMEDIATE_CA_PEM.as_bytes()).unwrap()
}

pub fn root_certificate() -> Certificate {
    Certificate::from_pem(ROOT_CA_PEM.as_bytes()).unwrap()
}

pub fn secondary_root_certificate() -> Certificate {
    Certificate::from_pem(SECONDARY_ROOT_CA_PEM.as_bytes()).unwrap()
}

pub fn legacy_root_certificate() -> Certificate {
    Certificate::from_pem(LEGACY_ROOT_CA_PEM.as_bytes()).unwrap()
}

fn intermediate_key() -> RsaPrivateKey {
    RsaPrivateKey::from_pkcs8_pem(INTERMEDIATE_KEY_PEM).unwrap()
}

/// Header without any protection fields, enough for body-only tests.
pub fn minimal_header() -> PkiHeader {
    header_with_alg(None)
}

fn header_with_alg(protection_alg: Option<spki::AlgorithmIdentifierOwned>) -> PkiHeader {
    let sender = Name::from_str("CN=ManagementCA,O=ONAP").unwrap();
    let recipient = Name::from_str("CN=client.onap.org,O=ONAP").unwrap();

    PkiHeader {
        pvno: CMP_VERSION_2,
        sender: GeneralName::DirectoryName(sender),
        recipient: GeneralName::DirectoryName(recipient),
        message_time: None,
        protection_alg,
        sender_kid: None,
        recip_kid: None,
        transaction_id: None,
        sender_nonce: None,
        recip_nonce: None,
        free_text: None,
        general_info: None,
    }
}

fn granted_rep() -> CertRepMessage {
    CertRepMessage {
        ca_pubs: Some(vec![root_certificate()]),
        response: vec![CertResponse {
            cert_req_id: 0,
            status: PkiStatusInfo {
                status: PKI_STATUS_ACCEPTED,
                status_string: None,
                fail_info: None,
            },
            certified_key_pair: Some(CertifiedKeyPair {
                cert_or_enc_cert: CertOrEncCert::Certificate(client_certificate()),
                private_key: None,
                publication_info: None,
            }),
            rsp_info: None,
        }],
    }
}

fn seal(message: &mut PkiMessage, protection: &dyn MessageProtection) {
    let protected = message.protected_bytes().unwrap();
    message.protection = Some(
        BitString::from_bytes(&protection.protection_bytes(&protected).unwrap()).unwrap(),
    );
}

/// A granted ip response, MAC-protected with the given secret.
pub fn granted_mac_protected_reply(iak: &str) -> Vec<u8> {
    let protection = PasswordBasedMacProtection::new(iak);
    let mut message = PkiMessage {
        header: header_with_alg(Some(protection.algorithm_identifier().unwrap())),
        body: PkiBody::Ip(granted_rep()),
        protection: None,
        extra_certs: Some(vec![intermediate_certificate()]),
    };
    seal(&mut message, &protection);
    message.to_der().unwrap()
}

/// A granted kup response, signed by the intermediate CA whose certificate
/// rides first in extraCerts.
pub fn granted_signature_protected_reply() -> Vec<u8> {
    let protection = SignatureProtection::new(intermediate_key());
    let mut message = PkiMessage {
        header: header_with_alg(Some(protection.algorithm_identifier().unwrap())),
        body: PkiBody::Kup(granted_rep()),
        protection: None,
        extra_certs: Some(vec![intermediate_certificate()]),
    };
    seal(&mut message, &protection);
    message.to_der().unwrap()
}

/// An unprotected error response carrying the given status text.
pub fn error_reply(text: &str) -> Vec<u8> {
    let message = PkiMessage {
        header: minimal_header(),
        body: PkiBody::Error(ErrorMsgContent {
            pki_status_info: PkiStatusInfo {
                status: PKI_STATUS_REJECTION,
                status_string: Some(vec![text.into()]),
                fail_info: None,
            },
            error_code: None,
            error_details: None,
        }),
        protection: None,
        extra_certs: None,
    };
    message.to_der().unwrap()
}
