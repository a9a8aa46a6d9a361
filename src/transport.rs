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

//! CMP message transport over HTTP (RFC 6712).
//!
//! One DER-encoded PKIMessage goes out as the POST body, one comes back.
//! The trait seam exists so tests can exchange messages without a socket.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::error::Result;
use crate::types::PKIXCMP_CONTENT_TYPE;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One request/response exchange of DER-encoded PKIMessages.
#[async_trait]
pub trait CmpTransport: Send + Sync {
    /// Send the encoded request to the CA endpoint and return the raw reply.
    async fn exchange(&self, url: &Url, request: &[u8]) -> Result<Vec<u8>>;
}

/// HTTP transport per RFC 6712.
#[derive(Clone, Debug)]
pub struct HttpCmpTransport {
    client: reqwest::Client,
}

impl HttpCmpTransport {
    /// Build a transport with the default request timeout.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Build a transport around a preconfigured HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CmpTransport for HttpCmpTransport {
    async fn exchange(&self, url: &Url, request: &[u8]) -> Result<Vec<u8>> {
        tracing::debug!(%url, bytes = request.len(), "sending CMP request");

        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, PKIXCMP_CONTENT_TYPE)
            .body(request.to_vec())
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        tracing::debug!(bytes = body.len(), "received CMP response");

        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CmpError;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_exchange_posts_der_and_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cmp"))
            .and(header("content-type", PKIXCMP_CONTENT_TYPE))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x30, 0x03, 0x02, 0x01, 0x01]))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpCmpTransport::new().unwrap();
        let url = Url::parse(&format!("{}/cmp", server.uri())).unwrap();

        let reply = transport.exchange(&url, &[0x30, 0x00]).await.unwrap();
        assert_eq!(reply, vec![0x30, 0x03, 0x02, 0x01, 0x01]);
    }

    #[tokio::test]
    async fn test_http_error_status_maps_to_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let transport = HttpCmpTransport::new().unwrap();
        let url = Url::parse(&format!("{}/cmp", server.uri())).unwrap();

        let err = transport.exchange(&url, &[0x30, 0x00]).await.unwrap_err();
        assert!(matches!(err, CmpError::Transport(_)));
    }
}
