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

//! CRMF certificate request structures (RFC 4211).
//!
//! The RFC 4211 module uses IMPLICIT tags; the `issuer`, `subject`, and
//! validity time fields are nonetheless EXPLICIT because their types are
//! ASN.1 CHOICEs.

use der::asn1::{Any, BitString, Null};
use der::{Choice, Sequence};
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::ext::Extensions;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::time::Time;

/// CertTemplate version for X.509 v3 certificates.
pub const CERT_TEMPLATE_VERSION: u8 = 2;

/// RFC 4211 `CertReqMessages`.
pub type CertReqMessages = Vec<CertReqMsg>;

/// RFC 4211 `CertReqMsg`.
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct CertReqMsg {
    /// The certificate request.
    pub cert_req: CertRequest,

    /// Proof that the requester possesses the private key.
    #[asn1(optional = "true")]
    pub popo: Option<ProofOfPossession>,

    /// Supplementary registration information.
    #[asn1(optional = "true")]
    pub reg_info: Option<Vec<Any>>,
}

/// RFC 4211 `CertRequest`.
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct CertRequest {
    /// Identifier matching request and response.
    pub cert_req_id: i64,

    /// Requested certificate contents.
    pub cert_template: CertTemplate,

    /// Request controls.
    #[asn1(optional = "true")]
    pub controls: Option<Vec<Any>>,
}

/// RFC 4211 `CertTemplate`.
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct CertTemplate {
    /// Certificate version.
    #[asn1(context_specific = "0", tag_mode = "IMPLICIT", optional = "true")]
    pub version: Option<u8>,

    /// Requested serial number; CAs assign their own.
    #[asn1(context_specific = "1", tag_mode = "IMPLICIT", optional = "true")]
    pub serial_number: Option<SerialNumber>,

    /// Requested signing algorithm.
    #[asn1(context_specific = "2", tag_mode = "IMPLICIT", optional = "true")]
    pub signing_alg: Option<AlgorithmIdentifierOwned>,

    /// Requested issuer name.
    #[asn1(context_specific = "3", tag_mode = "EXPLICIT", optional = "true")]
    pub issuer: Option<Name>,

    /// Requested validity window.
    #[asn1(context_specific = "4", tag_mode = "IMPLICIT", optional = "true")]
    pub validity: Option<OptionalValidity>,

    /// Requested subject name.
    #[asn1(context_specific = "5", tag_mode = "EXPLICIT", optional = "true")]
    pub subject: Option<Name>,

    /// Public key to certify.
    #[asn1(context_specific = "6", tag_mode = "IMPLICIT", optional = "true")]
    pub public_key: Option<SubjectPublicKeyInfoOwned>,

    /// Issuer unique identifier.
    #[asn1(context_specific = "7", tag_mode = "IMPLICIT", optional = "true")]
    pub issuer_uid: Option<BitString>,

    /// Subject unique identifier.
    #[asn1(context_specific = "8", tag_mode = "IMPLICIT", optional = "true")]
    pub subject_uid: Option<BitString>,

    /// Requested extensions.
    #[asn1(context_specific = "9", tag_mode = "IMPLICIT", optional = "true")]
    pub extensions: Option<Extensions>,
}

/// RFC 4211 `OptionalValidity`.
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct OptionalValidity {
    /// Earliest requested validity time.
    #[asn1(context_specific = "0", tag_mode = "EXPLICIT", optional = "true")]
    pub not_before: Option<Time>,

    /// Latest requested validity time.
    #[asn1(context_specific = "1", tag_mode = "EXPLICIT", optional = "true")]
    pub not_after: Option<Time>,
}

/// RFC 4211 `ProofOfPossession`.
///
/// Only the alternatives this client produces are modelled; the private key
/// always stays with the requester, so the key-transport alternatives never
/// occur.
#[derive(Clone, Debug, PartialEq, Eq, Choice)]
pub enum ProofOfPossession {
    /// Possession was verified out of band by the RA.
    #[asn1(context_specific = "0", tag_mode = "IMPLICIT")]
    RaVerified(Null),

    /// Signature over the certificate request by the subject key.
    #[asn1(context_specific = "1", tag_mode = "IMPLICIT", constructed = "true")]
    Signature(PopoSigningKey),
}

/// RFC 4211 `POPOSigningKey`.
///
/// The optional `poposkInput` field is not modelled; the subject name and
/// public key are always carried in the certificate template instead.
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct PopoSigningKey {
    /// Signature algorithm.
    pub algorithm: AlgorithmIdentifierOwned,

    /// Signature over the DER-encoded `CertRequest`.
    pub signature: BitString,
}
