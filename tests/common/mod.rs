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

//! Fixtures and CA-side message builders shared by the integration tests.

use base64::prelude::*;
use der::asn1::BitString;
use der::{DecodePem, Encode};
use pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use std::str::FromStr;
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::name::Name;
use x509_cert::Certificate;

use cmp_ra_client::config::{CaAuthentication, CaMode, CaRecord};
use cmp_ra_client::protection::{
    MessageProtection, PasswordBasedMacProtection, SignatureProtection,
};
use cmp_ra_client::types::{
    CertOrEncCert, CertRepMessage, CertResponse, CertifiedKeyPair, ErrorMsgContent, PkiBody,
    PkiHeader, PkiMessage, PkiStatusInfo, CMP_VERSION_2, PKI_STATUS_ACCEPTED,
    PKI_STATUS_REJECTION,
};

const CSR_PEM: &str = include_str!("../fixtures/csr.pem");
const CSR_DIFFERENT_IDENTITY_PEM: &str = include_str!("../fixtures/csr_different_identity.pem");
const KEY_PEM: &str = include_str!("../fixtures/key.pem");
const CLIENT_CERT_PEM: &str = include_str!("../fixtures/client_cert.pem");
const INTERMEDIATE_CA_PEM: &str = include_str!("../fixtures/intermediate_ca.pem");
const ROOT_CA_PEM: &str = include_str!("../fixtures/root_ca.pem");
const INTERMEDIATE_KEY_PEM: &str = include_str!("../fixtures/inter_key.pem");

/// Name of the mocked CA.
pub const CA_NAME: &str = "TestCA";

/// IAK secret shared between client and mocked CA.
pub const IAK: &str = "secret-iak";

pub fn ca_record(url: &str) -> CaRecord {
    CaRecord {
        ca_name: CA_NAME.into(),
        url: url::Url::parse(url).unwrap(),
        issuer_dn: "CN=ManagementCA,O=ONAP".into(),
        ca_mode: CaMode::Ra,
        authentication: CaAuthentication {
            iak: IAK.into(),
            rv: "reference-value".into(),
        },
    }
}

pub fn csr_base64() -> String {
    BASE64_STANDARD.encode(CSR_PEM)
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

pub fn encode(message: &PkiMessage) -> Vec<u8> {
    message.to_der().unwrap()
}

fn certificate(pem: &str) -> Certificate {
    Certificate::from_pem(pem.as_bytes()).unwrap()
}

fn header(protection_alg: Option<spki::AlgorithmIdentifierOwned>) -> PkiHeader {
    PkiHeader {
        pvno: CMP_VERSION_2,
        sender: GeneralName::DirectoryName(Name::from_str("CN=ManagementCA,O=ONAP").unwrap()),
        recipient: GeneralName::DirectoryName(
            Name::from_str("CN=client.onap.org,O=ONAP").unwrap(),
        ),
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

fn cert_rep(status: PkiStatusInfo, issued: bool) -> CertRepMessage {
    CertRepMessage {
        ca_pubs: Some(vec![certificate(ROOT_CA_PEM)]),
        response: vec![CertResponse {
            cert_req_id: 0,
            status,
            certified_key_pair: issued.then(|| CertifiedKeyPair {
                cert_or_enc_cert: CertOrEncCert::Certificate(certificate(CLIENT_CERT_PEM)),
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

fn mac_protected(body: PkiBody, iak: &str) -> PkiMessage {
    let protection = PasswordBasedMacProtection::new(iak);
    let mut message = PkiMessage {
        header: header(Some(protection.algorithm_identifier().unwrap())),
        body,
        protection: None,
        extra_certs: Some(vec![certificate(INTERMEDIATE_CA_PEM)]),
    };
    seal(&mut message, &protection);
    message
}

/// A granted ip response, MAC-protected with the given secret.
pub fn granted_mac_protected_reply(iak: &str) -> Vec<u8> {
    let status = PkiStatusInfo {
        status: PKI_STATUS_ACCEPTED,
        status_string: None,
        fail_info: None,
    };
    encode(&mac_protected(PkiBody::Ip(cert_rep(status, true)), iak))
}

/// A granted kup response, signed by the intermediate CA key; that CA's
/// certificate rides first in extraCerts.
pub fn granted_signature_protected_reply() -> Vec<u8> {
    let key = RsaPrivateKey::from_pkcs8_pem(INTERMEDIATE_KEY_PEM).unwrap();
    let protection = SignatureProtection::new(key);
    let status = PkiStatusInfo {
        status: PKI_STATUS_ACCEPTED,
        status_string: None,
        fail_info: None,
    };

    let mut message = PkiMessage {
        header: header(Some(protection.algorithm_identifier().unwrap())),
        body: PkiBody::Kup(cert_rep(status, true)),
        protection: None,
        extra_certs: Some(vec![certificate(INTERMEDIATE_CA_PEM)]),
    };
    seal(&mut message, &protection);
    encode(&message)
}

/// A MAC-protected ip response rejecting the request.
pub fn rejected_mac_protected_reply(iak: &str, text: &str) -> Vec<u8> {
    encode(&rejected_reply_message(iak, Some(text)))
}

/// A MAC-protected rejection, optionally carrying status text.
pub fn rejected_reply_message(iak: &str, text: Option<&str>) -> PkiMessage {
    let status = PkiStatusInfo {
        status: PKI_STATUS_REJECTION,
        status_string: text.map(|text| vec![text.into()]),
        fail_info: None,
    };
    mac_protected(PkiBody::Ip(cert_rep(status, false)), iak)
}

/// An unprotected error response carrying the given status text.
pub fn error_reply(text: &str) -> Vec<u8> {
    let message = PkiMessage {
        header: header(None),
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
    encode(&message)
}
