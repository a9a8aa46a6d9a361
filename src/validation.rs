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

//! CMP response validation.
//!
//! Before any certificate is pulled out of a response, its protection must
//! verify: either a signature by the CA key named in the header, or a
//! password-based MAC re-derived from the shared IAK with the parameters the
//! server echoed in the protection algorithm identifier.

use der::{Decode, Encode};
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::signature::Verifier;
use rsa::RsaPublicKey;
use sha2::Sha256;

use crate::error::{CmpError, Result};
use crate::protection::{derive_base_key, verify_mac};
use crate::types::{
    oids, PbmParameter, PkiMessage, PKI_STATUS_ACCEPTED, PKI_STATUS_GRANTED_WITH_MODS,
    PKI_STATUS_REJECTION,
};

/// Verify the protection of a received PKIMessage.
///
/// Signature-protected responses are checked against `ca_public_key`; the
/// caller supplies the key of the first extraCerts entry, the CA the message
/// claims to come from. MAC-protected responses are checked against the IAK.
pub fn verify_response_protection(
    message: &PkiMessage,
    ca_public_key: Option<&RsaPublicKey>,
    iak: &str,
) -> Result<()> {
    let Some(protection_alg) = &message.header.protection_alg else {
        return Err(CmpError::protocol(
            "Response header carries no protection algorithm",
        ));
    };
    let Some(protection) = &message.protection else {
        return Err(CmpError::protocol("Response carries no protection"));
    };

    let protected = message.protected_bytes()?;

    if protection_alg.oid == oids::SHA256_WITH_RSA {
        let Some(public_key) = ca_public_key else {
            return Err(CmpError::protocol(
                "Signature-protected response without a verification certificate",
            ));
        };
        verify_signature(public_key, &protected, protection.raw_bytes())?;
    } else if protection_alg.oid == oids::PASSWORD_BASED_MAC {
        let Some(parameters) = &protection_alg.parameters else {
            return Err(CmpError::protocol(
                "Password-based MAC protection without parameters",
            ));
        };
        let parameter = PbmParameter::from_der(&parameters.to_der()?)?;
        verify_pbm(&parameter, iak, &protected, protection.raw_bytes())?;
    } else {
        return Err(CmpError::protocol(format!(
            "Unsupported response protection algorithm: {}",
            protection_alg.oid
        )));
    }

    if message.header.has_implicit_confirm() {
        tracing::debug!("server granted implicit confirmation");
    } else {
        tracing::debug!("server did not grant implicit confirmation");
    }

    Ok(())
}

/// Check the status of a certificate response and turn a rejection into an
/// error carrying the server's own words.
///
/// Only `rejection` is an error; every other status is taken as granted and
/// the non-standard ones are merely logged.
pub fn check_response_status(status: &crate::types::PkiStatusInfo) -> Result<()> {
    match status.status {
        PKI_STATUS_ACCEPTED | PKI_STATUS_GRANTED_WITH_MODS => Ok(()),
        PKI_STATUS_REJECTION => {
            tracing::warn!(
                status = status.status,
                text = status.status_text().unwrap_or("N/A"),
                fail_info = ?status.fail_info,
                "server rejected certification request"
            );
            Err(CmpError::server_rejected(
                status.status_text().unwrap_or("N/A").to_string(),
            ))
        }
        other => {
            tracing::info!(status = other, "server returned non-rejection status");
            Ok(())
        }
    }
}

fn verify_signature(public_key: &RsaPublicKey, protected: &[u8], signature: &[u8]) -> Result<()> {
    let verifying_key = VerifyingKey::<Sha256>::new(public_key.clone());
    let signature = Signature::try_from(signature)
        .map_err(|e| CmpError::signature_verification(format!("Malformed signature: {}", e)))?;

    verifying_key
        .verify(protected, &signature)
        .map_err(|e| CmpError::signature_verification(e.to_string()))
}

fn verify_pbm(parameter: &PbmParameter, iak: &str, protected: &[u8], tag: &[u8]) -> Result<()> {
    let base_key = derive_base_key(
        iak.as_bytes(),
        parameter.salt.as_bytes(),
        parameter.iteration_count,
        &parameter.owf.oid,
    )?;

    if verify_mac(&parameter.mac.oid, &base_key, protected, tag)? {
        Ok(())
    } else {
        Err(CmpError::mac_verification(
            "Password-based MAC of the response does not match",
        ))
    }
}
