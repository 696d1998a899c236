//! Transport seam between the controller and the remote service.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::operation::request::{FormPart, MultipartForm};
use crate::operation::response::ServiceResponse;
use crate::operation::types::OperationKind;
use crate::slots::{SelectedFile, OCTET_STREAM};
use async_trait::async_trait;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

/// Something that can carry a multipart submission to the service.
///
/// Implementations make exactly one call per invocation and never retry.
#[async_trait]
pub trait StegoService: Send + Sync {
    /// Send `form` to the endpoint for `kind`.
    ///
    /// `Err` means the call did not complete; any HTTP status, success or
    /// not, is an `Ok` response.
    async fn send(&self, kind: OperationKind, form: MultipartForm) -> Result<ServiceResponse>;
}

/// HTTP implementation backed by reqwest.
pub struct HttpService {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpService {
    /// Create a service client from a validated configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate().map_err(Error::Config)?;
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, kind: OperationKind) -> String {
        match kind {
            OperationKind::Embed => self.config.embed_url(),
            OperationKind::Extract => self.config.extract_url(),
        }
    }
}

fn to_reqwest_form(form: MultipartForm) -> Form {
    let mut out = Form::new();
    for part in form.into_parts() {
        out = match part {
            FormPart::Text { name, value } => out.text(name, value),
            FormPart::File { name, file } => out.part(name, file_part(&file)),
        };
    }
    out
}

/// Multipart part for `file`, sent as octet-stream when its media type
/// does not parse.
fn file_part(file: &SelectedFile) -> Part {
    let part = || Part::bytes(file.content().to_vec()).file_name(file.name().to_string());
    match part().mime_str(file.media_type()) {
        Ok(typed) => typed,
        Err(_) => {
            warn!(
                file = file.name(),
                media_type = file.media_type(),
                "unparsable media type, sending as {}",
                OCTET_STREAM
            );
            part()
                .mime_str(OCTET_STREAM)
                .unwrap_or_else(|_| part())
        }
    }
}

#[async_trait]
impl StegoService for HttpService {
    async fn send(&self, kind: OperationKind, form: MultipartForm) -> Result<ServiceResponse> {
        let url = self.url(kind);
        debug!(%kind, %url, "sending request");

        let response = self
            .client
            .post(&url)
            .multipart(to_reqwest_form(form))
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        debug!(%kind, status, bytes = body.len(), "response received");
        Ok(ServiceResponse {
            status,
            content_disposition,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::request::{Credential, ExtractParams, OperationRequest};
    use crate::slots::{FileSlots, SlotRole};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_urls_follow_config() {
        let service = HttpService::new(ClientConfig::new("https://svc.example")).unwrap();
        assert_eq!(
            service.url(OperationKind::Embed),
            "https://svc.example/api/embed"
        );
        assert_eq!(
            service.url(OperationKind::Extract),
            "https://svc.example/api/extract"
        );
    }

    /// Accept one request on `listener`, answer `{}` and return the raw request.
    async fn capture_one(listener: TcpListener) -> String {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let mut buf = [0u8; 4096];
        // Closing boundary, or the last chunk of a chunked body.
        while !(received.ends_with(b"--\r\n") || received.ends_with(b"\r\n0\r\n\r\n")) {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{}")
            .await
            .unwrap();
        String::from_utf8_lossy(&received).to_lowercase()
    }

    #[tokio::test]
    async fn test_unparsable_media_type_sent_as_octet_stream() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(capture_one(listener));

        let mut slots = FileSlots::new();
        slots.select(
            SlotRole::StegoCarrier,
            SelectedFile::new("s.png", "not a mime", vec![1, 2, 3]),
        );
        let form = OperationRequest::Extract(ExtractParams {
            credential: Credential::Password("pw".to_string()),
        })
        .build_form(&slots)
        .unwrap();

        let service = HttpService::new(ClientConfig::new(format!("http://{}", addr))).unwrap();
        let response = service.send(OperationKind::Extract, form).await.unwrap();
        assert_eq!(response.status, 200);

        let request = server.await.unwrap();
        assert!(request.contains("filename=\"s.png\""), "{}", request);
        assert!(
            request.contains("content-type: application/octet-stream"),
            "{}",
            request
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            HttpService::new(ClientConfig::new("not a url")),
            Err(Error::Config(_))
        ));
    }
}
