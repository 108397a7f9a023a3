//! Blocking HTTP transport for the WSDL fetch.

use reqwest::blocking::Client;
use reqwest::redirect::Policy;

use crate::error::{FetchError, TransportInitError};
use crate::transport::options::ClientConfig;

const USER_AGENT: &str = concat!("wsdl-bootstrap/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: usize = 10;

/// Build the blocking client used to download WSDL documents.
pub fn build_http_client(config: &ClientConfig) -> Result<Client, TransportInitError> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .timeout(config.request_timeout)
        .danger_accept_invalid_certs(!config.tls().peer)
        .danger_accept_invalid_hostnames(!config.tls().host);

    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }

    builder = match &config.proxy {
        Some(proxy) => builder.proxy(
            proxy
                .to_reqwest()
                .map_err(|e| TransportInitError(e.to_string()))?,
        ),
        None => builder.no_proxy(),
    };

    if config.tls().is_insecure() {
        tracing::warn!("TLS verification disabled for WSDL fetch");
    }

    builder
        .build()
        .map_err(|e| TransportInitError(get_error_message(&e)))
}

/// Source of WSDL bytes.
pub trait WsdlFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// [`WsdlFetcher`] over a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportInitError> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

impl WsdlFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().map_err(|e| FetchError::Request {
            url: url.to_string(),
            message: get_error_message(&e),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(|e| FetchError::Request {
            url: url.to_string(),
            message: get_error_message(&e),
        })?;

        tracing::debug!(url, bytes = body.len(), "WSDL downloaded");
        Ok(body.to_vec())
    }
}

fn get_error_message(error: &reqwest::Error) -> String {
    let mut error_message = error.to_string();

    if error.is_timeout() {
        error_message.push_str(" (timed out)");
    }

    if let Some(status_error) = error.status() {
        error_message.push_str(&format!(". Status: {}", status_error));
    }

    error_message
}
