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

//! CMP message types.
//!
//! ASN.1 structures for the CMPv2 (RFC 4210) and CRMF (RFC 4211) message
//! subset this client exchanges: certificate request messages, certification
//! responses, and their protection parameters.

pub mod cmp;
pub mod crmf;

pub use cmp::{
    CertOrEncCert, CertRepMessage, CertResponse, CertifiedKeyPair, ErrorMsgContent,
    InfoTypeAndValue, PbmParameter, PkiBody, PkiHeader, PkiMessage, PkiStatusInfo, ProtectedPart,
    CMP_VERSION_2, PKI_STATUS_ACCEPTED, PKI_STATUS_GRANTED_WITH_MODS, PKI_STATUS_REJECTION,
};
pub use crmf::{
    CertReqMessages, CertReqMsg, CertRequest, CertTemplate, OptionalValidity, PopoSigningKey,
    ProofOfPossession, CERT_TEMPLATE_VERSION,
};

/// Object identifiers used in CMP message construction and validation.
pub mod oids {
    use const_oid::ObjectIdentifier;

    /// id-PasswordBasedMac (1.2.840.113533.7.66.13)
    pub const PASSWORD_BASED_MAC: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.2.840.113533.7.66.13");

    /// SHA-1 one-way function (1.3.14.3.2.26)
    pub const SHA1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.14.3.2.26");

    /// SHA-256 one-way function (2.16.840.1.101.3.4.2.1)
    pub const SHA256: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.1");

    /// HMAC-SHA1 (1.3.6.1.5.5.8.1.2)
    pub const HMAC_SHA1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.8.1.2");

    /// HMAC-SHA256 (1.2.840.113549.2.9)
    pub const HMAC_SHA256: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.2.9");

    /// sha256WithRSAEncryption (1.2.840.113549.1.1.11)
    pub const SHA256_WITH_RSA: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11");

    /// id-it-implicitConfirm (1.3.6.1.5.5.7.4.13)
    pub const IT_IMPLICIT_CONFIRM: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.4.13");

    /// pkcs-9-at-extensionRequest (1.2.840.113549.1.9.14)
    pub const EXTENSION_REQUEST: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.14");
}

/// Content type of CMP messages on the wire, per RFC 6712.
pub const PKIXCMP_CONTENT_TYPE: &str = "application/pkixcmp";
