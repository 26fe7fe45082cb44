use std::time::Duration;

use shared::{encode_points, parse_points, Point3, ZONE_POINT_COUNT};

use super::RemoteSync;
use crate::error::ZoneError;
use crate::state::RemoteSettings;

/// Zone store reached over HTTP: PUT to publish, GET to download
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    upload_url: String,
    download_url: String,
}

impl HttpRemote {
    pub fn new(settings: &RemoteSettings) -> Result<Self, ZoneError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            upload_url: settings.upload_url.clone(),
            download_url: settings.download_url.clone(),
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    pub fn download_url(&self) -> &str {
        &self.download_url
    }
}

impl RemoteSync for HttpRemote {
    async fn publish(&self, points: [Point3; ZONE_POINT_COUNT]) -> Result<(), ZoneError> {
        let body = encode_points(&points);
        tracing::info!(url = %self.upload_url, "Publishing zone");

        let response = self
            .client
            .put(&self.upload_url)
            .header("content-type", "text/plain")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ZoneError::network(format!(
                "upload to {} failed: HTTP {status}",
                self.upload_url
            )));
        }
        Ok(())
    }

    async fn download(&self) -> Result<Vec<Point3>, ZoneError> {
        tracing::info!(url = %self.download_url, "Downloading zone");

        let response = self.client.get(&self.download_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ZoneError::network(format!(
                "download from {} failed: HTTP {status}",
                self.download_url
            )));
        }

        let text = response.text().await?;
        Ok(parse_points(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_from_settings() {
        let settings = RemoteSettings {
            upload_url: "http://store/up".to_string(),
            download_url: "http://store/down".to_string(),
            request_timeout_secs: 2,
        };
        let remote = HttpRemote::new(&settings).unwrap();
        assert_eq!(remote.upload_url(), "http://store/up");
        assert_eq!(remote.download_url(), "http://store/down");
    }

    #[tokio::test]
    async fn test_unreachable_store_is_network_error() {
        let settings = RemoteSettings {
            upload_url: "http://127.0.0.1:9/zone.txt".to_string(),
            download_url: "http://127.0.0.1:9/zone.txt".to_string(),
            request_timeout_secs: 2,
        };
        let remote = HttpRemote::new(&settings).unwrap();
        let err = remote.download().await.unwrap_err();
        assert!(matches!(err, ZoneError::Network(_)));
    }
}
