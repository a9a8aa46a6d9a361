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

//! Certificate enrollment demo.
//!
//! Reads a PEM CSR and PKCS#8 key from disk, sends an initialization request
//! to the CA named on the command line, and prints the issued chain.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example enroll -- <ca-name> <csr.pem> <key.pem>
//! ```
//!
//! The CA endpoints are read from `demos/cmp-servers.json`.

use std::env;

use base64::prelude::*;
use cmp_ra_client::{CaRecord, CaRegistry, CertificationRequest, CmpClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("usage: enroll <ca-name> <csr.pem> <key.pem>");
        std::process::exit(2);
    }

    let records: Vec<CaRecord> =
        serde_json::from_str(include_str!("cmp-servers.json"))?;
    let client = CmpClient::new(CaRegistry::new(records))?;

    let csr = BASE64_STANDARD.encode(std::fs::read(&args[2])?);
    let key = BASE64_STANDARD.encode(std::fs::read(&args[3])?);

    let request = CertificationRequest::new(csr, key, args[1].clone());
    let result = client.sign_csr(&request).await?;

    println!("Certificate chain ({} certificates):", result.certificate_chain().len());
    for pem in result.certificate_chain() {
        print!("{}", pem);
    }

    println!("Trusted certificates ({}):", result.trusted_certificates().len());
    for pem in result.trusted_certificates() {
        print!("{}", pem);
    }

    Ok(())
}
