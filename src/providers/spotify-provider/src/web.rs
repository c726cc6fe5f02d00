use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use spotlookup_core::{ProviderError, ProviderResult, WebApiConfig};
use std::time::Duration;
use url::Url;

/// Minimal blocking JSON GET surface of the Web API.
///
/// `path` is relative to the API base, e.g. `v1/tracks/?ids=a,b`.
pub trait WebClient {
    fn get(&self, path: &str) -> ProviderResult<Value>;
}

impl<W: WebClient + ?Sized> WebClient for &W {
    fn get(&self, path: &str) -> ProviderResult<Value> {
        (**self).get(path)
    }
}

impl<W: WebClient + ?Sized> WebClient for Box<W> {
    fn get(&self, path: &str) -> ProviderResult<Value> {
        (**self).get(path)
    }
}

/// reqwest-backed [`WebClient`]. Does not retry and does not refresh tokens.
#[derive(Debug, Clone)]
pub struct HttpWebClient {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl HttpWebClient {
    pub fn new(config: &WebApiConfig) -> Result<Self, ProviderError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ProviderError::Other {
            message: format!("invalid base_url: {e}"),
        })?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| ProviderError::Other {
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url,
            access_token: config.access_token.clone(),
        })
    }

    fn url(&self, path: &str) -> ProviderResult<Url> {
        self.base_url.join(path).map_err(|e| ProviderError::Other {
            message: format!("invalid request path {path:?}: {e}"),
        })
    }
}

impl WebClient for HttpWebClient {
    fn get(&self, path: &str) -> ProviderResult<Value> {
        let url = self.url(path)?;
        tracing::debug!("GET {}", url.path());

        let mut request = self.client.get(url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        let resp = request.send().map_err(|e| ProviderError::Network {
            message: e.to_string(),
        })?;

        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ProviderError::Authentication {
                    message: resp.status().to_string(),
                })
            }
            StatusCode::NOT_FOUND => {
                return Err(ProviderError::NotFound {
                    entity: path.to_string(),
                })
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = resp
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok());
                return Err(ProviderError::RateLimited { retry_after });
            }
            status if !status.is_success() => {
                return Err(ProviderError::Network {
                    message: format!("unexpected status {status} for {path}"),
                })
            }
            _ => {}
        }

        resp.json().map_err(|e| ProviderError::Decode {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_base_url() {
        let config = WebApiConfig {
            base_url: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(
            HttpWebClient::new(&config),
            Err(ProviderError::Other { .. })
        ));
    }

    #[test]
    fn joins_paths_onto_base() {
        let client = HttpWebClient::new(&WebApiConfig::default()).unwrap();
        let url = client.url("v1/tracks/?ids=a,b").unwrap();
        assert_eq!(url.as_str(), "https://api.spotify.com/v1/tracks/?ids=a,b");
    }
}
