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

//! RSA key pair generation.
//!
//! Callers preparing an update with a fresh key need a generator; it is an
//! explicit value handed to whoever needs it rather than process-global
//! state, so tests can substitute a small key size.

use rsa::RsaPrivateKey;

use crate::error::{CmpError, Result};

/// Default RSA modulus size in bits.
pub const DEFAULT_RSA_BITS: usize = 2048;

/// RSA key pair generator with a fixed modulus size.
#[derive(Clone, Copy, Debug)]
pub struct RsaKeyGenerator {
    bits: usize,
}

impl Default for RsaKeyGenerator {
    fn default() -> Self {
        Self {
            bits: DEFAULT_RSA_BITS,
        }
    }
}

impl RsaKeyGenerator {
    /// Create a generator for the given modulus size.
    pub fn new(bits: usize) -> Self {
        Self { bits }
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Generate a fresh RSA private key.
    pub fn generate(&self) -> Result<RsaPrivateKey> {
        let mut rng = rand::thread_rng();
        RsaPrivateKey::new(&mut rng, self.bits)
            .map_err(|e| CmpError::key_generation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_size() {
        assert_eq!(RsaKeyGenerator::default().bits(), DEFAULT_RSA_BITS);
    }

    #[test]
    fn test_generates_key_of_requested_size() {
        use rsa::traits::PublicKeyParts;

        let key = RsaKeyGenerator::new(512).generate().unwrap();
        assert_eq!(key.to_public_key().size() * 8, 512);
    }
}
