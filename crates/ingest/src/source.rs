use crate::{IngestError, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the review document comes from.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    fn location(&self) -> &str;

    /// Raw bytes of the document; any non-success is a transport failure.
    async fn fetch(&self) -> Result<Vec<u8>>;
}

pub struct FileSource {
    path: PathBuf,
    location: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let location = path.display().to_string();
        Self { path, location }
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    fn location(&self) -> &str {
        &self.location
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        let bytes = tokio::fs::read(&self.path).await?;
        debug!("Read {} bytes from {}", bytes.len(), self.location);
        Ok(bytes)
    }
}

pub struct HttpSource {
    url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    fn location(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        debug!("Fetching {} status: {status}", self.url);
        if !status.is_success() {
            return Err(IngestError::Transport {
                location: self.url.clone(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// `http://` and `https://` locations are fetched over HTTP; anything else is a path.
pub fn source_for(location: &str) -> Result<Box<dyn DocumentSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location)?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}
