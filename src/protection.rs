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

//! PKIMessage protection.
//!
//! RFC 4210 section 5.1.3: the protection field covers the DER encoding of
//! the header/body pair. Initial enrollment uses a password-based MAC keyed
//! from the shared IAK secret; key updates sign with the old certificate's
//! key instead.

use der::asn1::OctetString;
use der::{Any, Decode, Encode};
use hmac::{Hmac, Mac};
use rand::{Rng, RngCore};
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha1::{Digest, Sha1};
use sha2::Sha256;
use spki::AlgorithmIdentifierOwned;

use crate::error::{CmpError, Result};
use crate::types::cmp::PbmParameter;
use crate::types::oids;

/// Length of the random PBM salt in bytes.
const SALT_LENGTH: usize = 16;

/// Lower bound of the random PBM iteration count.
const ITERATION_SEED: i64 = 1000;

/// Protection scheme applied to an outgoing PKIMessage.
pub trait MessageProtection {
    /// Algorithm identifier placed into the PKIHeader protectionAlg field.
    fn algorithm_identifier(&self) -> Result<AlgorithmIdentifierOwned>;

    /// Protection bytes over the DER-encoded protected part.
    fn protection_bytes(&self, protected_bytes: &[u8]) -> Result<Vec<u8>>;
}

/// Password-based MAC protection (RFC 4210 section 5.1.3.1).
///
/// Salt and iteration count are drawn freshly per instance; the parameters
/// travel to the server inside the protection algorithm identifier.
pub struct PasswordBasedMacProtection {
    secret: String,
    salt: [u8; SALT_LENGTH],
    iteration_count: i64,
}

impl PasswordBasedMacProtection {
    /// Create a protection instance from the shared IAK secret.
    pub fn new(secret: impl Into<String>) -> Self {
        let mut rng = rand::thread_rng();
        let mut salt = [0u8; SALT_LENGTH];
        rng.fill_bytes(&mut salt);
        let iteration_count = rng.gen_range(0..1000) + ITERATION_SEED;

        Self {
            secret: secret.into(),
            salt,
            iteration_count,
        }
    }

    fn pbm_parameter(&self) -> Result<PbmParameter> {
        Ok(PbmParameter {
            salt: OctetString::new(self.salt.to_vec())?,
            owf: AlgorithmIdentifierOwned {
                oid: oids::SHA1,
                parameters: None,
            },
            iteration_count: self.iteration_count,
            mac: AlgorithmIdentifierOwned {
                oid: oids::HMAC_SHA1,
                parameters: None,
            },
        })
    }
}

impl MessageProtection for PasswordBasedMacProtection {
    fn algorithm_identifier(&self) -> Result<AlgorithmIdentifierOwned> {
        let parameter = self.pbm_parameter()?;
        Ok(AlgorithmIdentifierOwned {
            oid: oids::PASSWORD_BASED_MAC,
            parameters: Some(Any::from_der(&parameter.to_der()?)?),
        })
    }

    fn protection_bytes(&self, protected_bytes: &[u8]) -> Result<Vec<u8>> {
        let base_key = derive_base_key(
            self.secret.as_bytes(),
            &self.salt,
            self.iteration_count,
            &oids::SHA1,
        )?;
        compute_mac(&oids::HMAC_SHA1, &base_key, protected_bytes)
    }
}

impl std::fmt::Debug for PasswordBasedMacProtection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordBasedMacProtection")
            .field("secret", &"*****")
            .field("iteration_count", &self.iteration_count)
            .finish()
    }
}

/// Signature protection by the old certificate's private key.
pub struct SignatureProtection {
    signing_key: SigningKey<Sha256>,
}

impl SignatureProtection {
    /// Create a protection instance from the old private key.
    pub fn new(old_private_key: RsaPrivateKey) -> Self {
        Self {
            signing_key: SigningKey::new(old_private_key),
        }
    }
}

impl MessageProtection for SignatureProtection {
    fn algorithm_identifier(&self) -> Result<AlgorithmIdentifierOwned> {
        Ok(AlgorithmIdentifierOwned {
            oid: oids::SHA256_WITH_RSA,
            parameters: None,
        })
    }

    fn protection_bytes(&self, protected_bytes: &[u8]) -> Result<Vec<u8>> {
        Ok(self.signing_key.sign(protected_bytes).to_vec())
    }
}

impl std::fmt::Debug for SignatureProtection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureProtection").finish()
    }
}

/// Derive the PBM base key: hash the secret/salt concatenation, then keep
/// re-hashing the running digest for the remaining iterations.
pub(crate) fn derive_base_key(
    secret: &[u8],
    salt: &[u8],
    iteration_count: i64,
    owf: &der::asn1::ObjectIdentifier,
) -> Result<Vec<u8>> {
    if *owf == oids::SHA1 {
        Ok(iterate_digest::<Sha1>(secret, salt, iteration_count))
    } else if *owf == oids::SHA256 {
        Ok(iterate_digest::<Sha256>(secret, salt, iteration_count))
    } else {
        Err(CmpError::protocol(format!(
            "Unsupported one-way function: {}",
            owf
        )))
    }
}

fn iterate_digest<D: Digest>(secret: &[u8], salt: &[u8], iteration_count: i64) -> Vec<u8> {
    let mut key: Vec<u8> = secret.iter().chain(salt.iter()).copied().collect();
    for _ in 0..iteration_count {
        key = D::digest(&key).to_vec();
    }
    key
}

/// Compute the MAC the PBM scheme applies with the derived base key.
pub(crate) fn compute_mac(
    mac_alg: &der::asn1::ObjectIdentifier,
    base_key: &[u8],
    message: &[u8],
) -> Result<Vec<u8>> {
    if *mac_alg == oids::HMAC_SHA1 {
        let mut mac = Hmac::<Sha1>::new_from_slice(base_key)
            .map_err(|e| CmpError::protocol(format!("Invalid MAC key: {}", e)))?;
        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    } else if *mac_alg == oids::HMAC_SHA256 {
        let mut mac = Hmac::<Sha256>::new_from_slice(base_key)
            .map_err(|e| CmpError::protocol(format!("Invalid MAC key: {}", e)))?;
        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    } else {
        Err(CmpError::protocol(format!(
            "Unsupported MAC algorithm: {}",
            mac_alg
        )))
    }
}

/// Constant-time MAC verification against a received tag.
pub(crate) fn verify_mac(
    mac_alg: &der::asn1::ObjectIdentifier,
    base_key: &[u8],
    message: &[u8],
    tag: &[u8],
) -> Result<bool> {
    if *mac_alg == oids::HMAC_SHA1 {
        let mut mac = Hmac::<Sha1>::new_from_slice(base_key)
            .map_err(|e| CmpError::protocol(format!("Invalid MAC key: {}", e)))?;
        mac.update(message);
        Ok(mac.verify_slice(tag).is_ok())
    } else if *mac_alg == oids::HMAC_SHA256 {
        let mut mac = Hmac::<Sha256>::new_from_slice(base_key)
            .map_err(|e| CmpError::protocol(format!("Invalid MAC key: {}", e)))?;
        mac.update(message);
        Ok(mac.verify_slice(tag).is_ok())
    } else {
        Err(CmpError::protocol(format!(
            "Unsupported MAC algorithm: {}",
            mac_alg
        )))
    }
}
