//! CMP client orchestration.
//!
//! [`CmpClient`] ties the pieces together: decode the caller's inputs, pick
//! the right CMP operation, build and protect the request, exchange it with
//! the CA, verify the response protection, and hand back the issued chain.

use der::{Decode, Encode};
use rsa::pkcs8::DecodePublicKey;
use rsa::RsaPublicKey;

use crate::config::CaRegistry;
use crate::csr::CsrModel;
use crate::error::{CmpError, Result};
use crate::identity::IdentityData;
use crate::metadata::CmpRequestMetadata;
use crate::oldcert::OldCertificateModel;
use crate::request::CmpRequestFactory;
use crate::response::{extract_certification_result, CertificationResult};
use crate::transport::{CmpTransport, HttpCmpTransport};
use crate::types::{PkiBody, PkiMessage};
use crate::validation::verify_response_protection;

/// One caller-supplied certification request.
///
/// Built with [`CertificationRequest::new`]; the update inputs and the
/// validity window are attached with the `with_` methods. All fields are
/// base64-encoded PEM, as received from the caller.
#[derive(Clone)]
pub struct CertificationRequest {
    csr_base64: String,
    private_key_base64: String,
    ca_name: String,
    old_certificate_base64: Option<String>,
    old_private_key_base64: Option<String>,
    not_before: Option<std::time::SystemTime>,
    not_after: Option<std::time::SystemTime>,
}

impl CertificationRequest {
    /// A plain certification request for the named CA.
    pub fn new(
        csr_base64: impl Into<String>,
        private_key_base64: impl Into<String>,
        ca_name: impl Into<String>,
    ) -> Self {
        Self {
            csr_base64: csr_base64.into(),
            private_key_base64: private_key_base64.into(),
            ca_name: ca_name.into(),
            old_certificate_base64: None,
            old_private_key_base64: None,
            not_before: None,
            not_after: None,
        }
    }

    /// Attach the certificate being replaced and its key, turning the request
    /// into an update.
    pub fn with_old_certificate(
        mut self,
        old_certificate_base64: impl Into<String>,
        old_private_key_base64: impl Into<String>,
    ) -> Self {
        self.old_certificate_base64 = Some(old_certificate_base64.into());
        self.old_private_key_base64 = Some(old_private_key_base64.into());
        self
    }

    /// Attach a requested validity window.
    pub fn with_validity(
        mut self,
        not_before: Option<std::time::SystemTime>,
        not_after: Option<std::time::SystemTime>,
    ) -> Self {
        self.not_before = not_before;
        self.not_after = not_after;
        self
    }
}

impl std::fmt::Debug for CertificationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificationRequest")
            .field("ca_name", &self.ca_name)
            .field("update", &self.old_certificate_base64.is_some())
            .field("private_key_base64", &"*****")
            .finish()
    }
}

/// CMPv2 client over a configured set of CAs.
pub struct CmpClient<T: CmpTransport = HttpCmpTransport> {
    registry: CaRegistry,
    transport: T,
}

impl CmpClient<HttpCmpTransport> {
    /// Build a client using the HTTP transport.
    pub fn new(registry: CaRegistry) -> Result<Self> {
        Ok(Self {
            registry,
            transport: HttpCmpTransport::new()?,
        })
    }
}

impl<T: CmpTransport> CmpClient<T> {
    /// Build a client over a caller-supplied transport.
    pub fn with_transport(registry: CaRegistry, transport: T) -> Self {
        Self {
            registry,
            transport,
        }
    }

    /// Obtain a certificate for the given request.
    ///
    /// Routing: without an old certificate this is an initialization request.
    /// With one, a key update when the old certificate carries the same
    /// subject and SANs as the CSR, otherwise a certification request for the
    /// changed identity.
    pub async fn sign_csr(&self, request: &CertificationRequest) -> Result<CertificationResult> {
        let csr = CsrModel::decode(&request.csr_base64, &request.private_key_base64)?;
        let record = self.registry.find(&request.ca_name)?;
        record.validate()?;

        tracing::info!(
            ca = %record.ca_name,
            profile = record.ca_mode.profile(),
            csr = %csr,
            "processing certification request"
        );

        let metadata = CmpRequestMetadata::assemble(&csr, record)?
            .with_validity(request.not_before, request.not_after)?;

        let old_certificate = match (
            &request.old_certificate_base64,
            &request.old_private_key_base64,
        ) {
            (Some(cert), Some(key)) => Some(OldCertificateModel::decode(cert, key)?),
            _ => None,
        };

        match old_certificate {
            None => self.execute_initialization_request(&metadata, &csr).await,
            Some(old) => {
                let csr_identity = IdentityData::new(csr.subject().clone(), csr.sans());
                if old.identity().matches(&csr_identity) {
                    self.execute_key_update_request(&metadata, &csr, &old).await
                } else {
                    tracing::info!(
                        old = %old.identity(),
                        new = %csr_identity,
                        "identity changed, requesting a new certificate instead of an update"
                    );
                    self.execute_certification_request(&metadata, &csr).await
                }
            }
        }
    }

    /// Send an initialization request (ir) and return the issued chain.
    pub async fn execute_initialization_request(
        &self,
        metadata: &CmpRequestMetadata,
        csr: &CsrModel,
    ) -> Result<CertificationResult> {
        let message = CmpRequestFactory::initialization_request(metadata, csr)?;
        self.exchange_and_extract(metadata, message).await
    }

    /// Send a certification request (cr) and return the issued chain.
    pub async fn execute_certification_request(
        &self,
        metadata: &CmpRequestMetadata,
        csr: &CsrModel,
    ) -> Result<CertificationResult> {
        let message = CmpRequestFactory::certification_request(metadata, csr)?;
        self.exchange_and_extract(metadata, message).await
    }

    /// Send a key update request (kur) and return the issued chain.
    pub async fn execute_key_update_request(
        &self,
        metadata: &CmpRequestMetadata,
        csr: &CsrModel,
        old_certificate: &OldCertificateModel,
    ) -> Result<CertificationResult> {
        let message = CmpRequestFactory::key_update_request(metadata, csr, old_certificate)?;
        self.exchange_and_extract(metadata, message).await
    }

    async fn exchange_and_extract(
        &self,
        metadata: &CmpRequestMetadata,
        message: PkiMessage,
    ) -> Result<CertificationResult> {
        let encoded = message.to_der()?;
        let reply_bytes = self.transport.exchange(metadata.ca_url(), &encoded).await?;

        let reply = PkiMessage::from_der(&reply_bytes)
            .map_err(|e| CmpError::protocol(format!("Malformed CMP response: {}", e)))?;

        // Servers may answer with an unprotected error body; surface it
        // before protection verification gets a chance to obscure it.
        if let PkiBody::Error(error) = &reply.body {
            return Err(CmpError::server_rejected(
                error
                    .pki_status_info
                    .status_text()
                    .unwrap_or("N/A")
                    .to_string(),
            ));
        }

        let ca_public_key = first_extra_cert_key(&reply);
        verify_response_protection(&reply, ca_public_key.as_ref(), metadata.iak())?;

        extract_certification_result(&reply)
    }
}

/// Public key of the first extraCerts entry, the certificate the server
/// verifies signature protection against. `None` when absent or not RSA.
fn first_extra_cert_key(message: &PkiMessage) -> Option<RsaPublicKey> {
    let cert = message.extra_certs.as_deref()?.first()?;
    let spki_der = cert
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .ok()?;
    RsaPublicKey::from_public_key_der(&spki_der).ok()
}
