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

//! CMPv2 message structures (RFC 4210).
//!
//! The RFC 4210 module uses EXPLICIT tags throughout. Only the body
//! alternatives this client sends (ir, cr, kur) and receives (ip, cp, kup,
//! error) are modelled; any other body tag fails to decode and surfaces as a
//! protocol error.

use der::asn1::{Any, BitString, GeneralizedTime, ObjectIdentifier, OctetString};
use der::{Choice, Encode, Sequence};
use spki::AlgorithmIdentifierOwned;
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::Certificate;

use super::crmf::CertReqMessages;
use super::oids;
use crate::error::Result;

/// CMP protocol version cmp2000.
pub const CMP_VERSION_2: u8 = 2;

/// PKIStatus accepted.
pub const PKI_STATUS_ACCEPTED: u32 = 0;

/// PKIStatus grantedWithMods.
pub const PKI_STATUS_GRANTED_WITH_MODS: u32 = 1;

/// PKIStatus rejection.
pub const PKI_STATUS_REJECTION: u32 = 2;

/// RFC 4210 `PKIMessage`.
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct PkiMessage {
    /// Message header.
    pub header: PkiHeader,

    /// Message body.
    pub body: PkiBody,

    /// Protection over the DER encoding of header and body.
    #[asn1(context_specific = "0", tag_mode = "EXPLICIT", optional = "true")]
    pub protection: Option<BitString>,

    /// Certificates aiding protection verification or chain building.
    #[asn1(context_specific = "1", tag_mode = "EXPLICIT", optional = "true")]
    pub extra_certs: Option<Vec<Certificate>>,
}

impl PkiMessage {
    /// DER encoding of the protected part (header and body) of this message.
    ///
    /// This is the exact byte string MACs and signatures are computed over.
    pub fn protected_bytes(&self) -> Result<Vec<u8>> {
        let protected = ProtectedPart {
            header: self.header.clone(),
            body: self.body.clone(),
        };
        Ok(protected.to_der()?)
    }
}

/// RFC 4210 `PKIHeader`.
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct PkiHeader {
    /// Protocol version number.
    pub pvno: u8,

    /// Name of the message sender.
    pub sender: GeneralName,

    /// Name of the intended recipient.
    pub recipient: GeneralName,

    /// Time of message production.
    #[asn1(context_specific = "0", tag_mode = "EXPLICIT", optional = "true")]
    pub message_time: Option<GeneralizedTime>,

    /// Algorithm protecting the message.
    #[asn1(context_specific = "1", tag_mode = "EXPLICIT", optional = "true")]
    pub protection_alg: Option<AlgorithmIdentifierOwned>,

    /// Reference value identifying the sender's shared secret.
    #[asn1(context_specific = "2", tag_mode = "EXPLICIT", optional = "true")]
    pub sender_kid: Option<OctetString>,

    /// Key identifier of the recipient.
    #[asn1(context_specific = "3", tag_mode = "EXPLICIT", optional = "true")]
    pub recip_kid: Option<OctetString>,

    /// Transaction identifier correlating request and response.
    #[asn1(context_specific = "4", tag_mode = "EXPLICIT", optional = "true")]
    pub transaction_id: Option<OctetString>,

    /// Nonce inserted by the sender, echoed as recipNonce by the peer.
    #[asn1(context_specific = "5", tag_mode = "EXPLICIT", optional = "true")]
    pub sender_nonce: Option<OctetString>,

    /// Nonce from the message this one answers.
    #[asn1(context_specific = "6", tag_mode = "EXPLICIT", optional = "true")]
    pub recip_nonce: Option<OctetString>,

    /// Human-readable context.
    #[asn1(context_specific = "7", tag_mode = "EXPLICIT", optional = "true")]
    pub free_text: Option<Vec<String>>,

    /// Additional typed information, e.g. implicit-confirm.
    #[asn1(context_specific = "8", tag_mode = "EXPLICIT", optional = "true")]
    pub general_info: Option<Vec<InfoTypeAndValue>>,
}

impl PkiHeader {
    /// Returns true if the header carries the implicit-confirm indication.
    pub fn has_implicit_confirm(&self) -> bool {
        self.general_info
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|itav| itav.info_type == oids::IT_IMPLICIT_CONFIRM)
    }
}

/// RFC 4210 `PKIBody` alternatives used by this client.
#[derive(Clone, Debug, PartialEq, Eq, Choice)]
#[allow(clippy::large_enum_variant)]
pub enum PkiBody {
    /// Initialization request.
    #[asn1(context_specific = "0", tag_mode = "EXPLICIT", constructed = "true")]
    Ir(CertReqMessages),

    /// Initialization response.
    #[asn1(context_specific = "1", tag_mode = "EXPLICIT", constructed = "true")]
    Ip(CertRepMessage),

    /// Certification request.
    #[asn1(context_specific = "2", tag_mode = "EXPLICIT", constructed = "true")]
    Cr(CertReqMessages),

    /// Certification response.
    #[asn1(context_specific = "3", tag_mode = "EXPLICIT", constructed = "true")]
    Cp(CertRepMessage),

    /// Key update request.
    #[asn1(context_specific = "7", tag_mode = "EXPLICIT", constructed = "true")]
    Kur(CertReqMessages),

    /// Key update response.
    #[asn1(context_specific = "8", tag_mode = "EXPLICIT", constructed = "true")]
    Kup(CertRepMessage),

    /// Error message.
    #[asn1(context_specific = "23", tag_mode = "EXPLICIT", constructed = "true")]
    Error(ErrorMsgContent),
}

impl PkiBody {
    /// Certification response content, for any of the response body types.
    pub fn cert_rep(&self) -> Option<&CertRepMessage> {
        match self {
            PkiBody::Ip(rep) | PkiBody::Cp(rep) | PkiBody::Kup(rep) => Some(rep),
            _ => None,
        }
    }
}

/// The portion of a [`PkiMessage`] covered by protection.
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct ProtectedPart {
    /// Message header.
    pub header: PkiHeader,

    /// Message body.
    pub body: PkiBody,
}

/// RFC 4210 `InfoTypeAndValue`.
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct InfoTypeAndValue {
    /// Type of the carried information.
    pub info_type: ObjectIdentifier,

    /// Value, absent for marker types such as implicit-confirm.
    #[asn1(optional = "true")]
    pub info_value: Option<Any>,
}

impl InfoTypeAndValue {
    /// The implicit-confirm marker from RFC 4210 section 5.1.1.1.
    pub fn implicit_confirm() -> Self {
        Self {
            info_type: oids::IT_IMPLICIT_CONFIRM,
            info_value: None,
        }
    }
}

/// RFC 4210 `PBMParameter` for password-based MAC protection.
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct PbmParameter {
    /// Salt mixed into the shared secret.
    pub salt: OctetString,

    /// One-way function used for key derivation.
    pub owf: AlgorithmIdentifierOwned,

    /// Number of one-way function applications.
    pub iteration_count: i64,

    /// MAC algorithm applied with the derived key.
    pub mac: AlgorithmIdentifierOwned,
}

/// RFC 4210 `PKIStatusInfo`.
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct PkiStatusInfo {
    /// Status code.
    pub status: u32,

    /// Optional human-readable status strings.
    #[asn1(optional = "true")]
    pub status_string: Option<Vec<String>>,

    /// Optional failure detail bits.
    #[asn1(optional = "true")]
    pub fail_info: Option<BitString>,
}

impl PkiStatusInfo {
    /// First status string, if the server supplied any.
    pub fn status_text(&self) -> Option<&str> {
        self.status_string
            .as_deref()
            .and_then(|strings| strings.first())
            .map(String::as_str)
    }
}

/// RFC 4210 `CertRepMessage`.
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct CertRepMessage {
    /// CA certificates the server chose to publish.
    #[asn1(context_specific = "1", tag_mode = "EXPLICIT", optional = "true")]
    pub ca_pubs: Option<Vec<Certificate>>,

    /// Responses to the submitted certificate requests.
    pub response: Vec<CertResponse>,
}

/// RFC 4210 `CertResponse`.
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct CertResponse {
    /// Identifier echoing the request this responds to.
    pub cert_req_id: i64,

    /// Outcome of the request.
    pub status: PkiStatusInfo,

    /// Issued certificate material when the request was granted.
    #[asn1(optional = "true")]
    pub certified_key_pair: Option<CertifiedKeyPair>,

    /// Server-defined response information.
    #[asn1(optional = "true")]
    pub rsp_info: Option<OctetString>,
}

/// RFC 4210 `CertifiedKeyPair`.
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct CertifiedKeyPair {
    /// The issued certificate, possibly encrypted.
    pub cert_or_enc_cert: CertOrEncCert,

    /// Encrypted private key for central key generation; never requested here.
    #[asn1(context_specific = "0", tag_mode = "EXPLICIT", optional = "true")]
    pub private_key: Option<Any>,

    /// Publication information.
    #[asn1(context_specific = "1", tag_mode = "EXPLICIT", optional = "true")]
    pub publication_info: Option<Any>,
}

/// RFC 4210 `CertOrEncCert`.
#[derive(Clone, Debug, PartialEq, Eq, Choice)]
#[allow(clippy::large_enum_variant)]
pub enum CertOrEncCert {
    /// Plain certificate.
    #[asn1(context_specific = "0", tag_mode = "EXPLICIT", constructed = "true")]
    Certificate(Certificate),

    /// Encrypted certificate; not supported by this client.
    #[asn1(context_specific = "1", tag_mode = "EXPLICIT", constructed = "true")]
    EncryptedCert(Any),
}

impl CertOrEncCert {
    /// The plain certificate, if present in that form.
    pub fn certificate(&self) -> Option<&Certificate> {
        match self {
            CertOrEncCert::Certificate(cert) => Some(cert),
            CertOrEncCert::EncryptedCert(_) => None,
        }
    }
}

/// RFC 4210 `ErrorMsgContent`.
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct ErrorMsgContent {
    /// Status information describing the error.
    pub pki_status_info: PkiStatusInfo,

    /// Implementation-specific error code.
    #[asn1(optional = "true")]
    pub error_code: Option<i64>,

    /// Implementation-specific error details.
    #[asn1(optional = "true")]
    pub error_details: Option<Vec<String>>,
}
