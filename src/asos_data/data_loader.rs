use crate::asos_data::csv_parser::parse_asos_csv;
use crate::asos_data::error::AsosDataError;
use crate::asos_data::source::AsosSource;
use crate::types::asos_frame::AsosFrame;
use futures_util::TryStreamExt;
use log::{info, warn};
use reqwest::Client;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tokio::{fs, task};
use tokio_util::io::StreamReader;

/// Reads one-minute ASOS CSV payloads from the archive or from disk.
pub struct AsosDataLoader {
    download_client: Client,
}

impl Default for AsosDataLoader {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl AsosDataLoader {
    pub fn new(download_client: Client) -> AsosDataLoader {
        AsosDataLoader { download_client }
    }

    /// Loads `source` into an [`AsosFrame`].
    ///
    /// URLs and files go through the same parser. A payload with a header and
    /// no rows gives an empty frame.
    pub async fn load(&self, source: &AsosSource) -> Result<AsosFrame, AsosDataError> {
        let raw_bytes = match source {
            AsosSource::Url(url) => self.download(url).await?,
            AsosSource::Path(path) => Self::read_file(path).await?,
        };
        Self::csv_to_frame(raw_bytes, source.name()).await
    }

    /// Downloads the response body for `url`.
    async fn download(&self, url: &str) -> Result<Vec<u8>, AsosDataError> {
        info!("Downloading data from {}", url);

        let response = self
            .download_client
            .get(url)
            .send()
            .await
            .map_err(|e| AsosDataError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    AsosDataError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    AsosDataError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let mut stream_reader = StreamReader::new(stream);
        let mut body = Vec::new();
        stream_reader
            .read_to_end(&mut body)
            .await
            .map_err(AsosDataError::DownloadIo)?;

        info!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }

    async fn read_file(path: &Path) -> Result<Vec<u8>, AsosDataError> {
        info!("Reading observations from {}", path.display());
        fs::read(path)
            .await
            .map_err(|e| AsosDataError::FileRead(path.to_path_buf(), e))
    }

    /// Parses raw CSV bytes on a blocking task.
    async fn csv_to_frame(bytes: Vec<u8>, source_name: String) -> Result<AsosFrame, AsosDataError> {
        task::spawn_blocking(move || parse_asos_csv(&bytes, &source_name)).await?
    }
}

/// Loads one-minute ASOS observations from a URL or a local CSV file.
///
/// # Examples
///
/// ```no_run
/// # use meteogram::AsosDataError;
/// # #[tokio::main]
/// # async fn main() -> Result<(), AsosDataError> {
/// let frame = meteogram::download_asos_data("staticdata/AMW_example_data.csv").await?;
/// println!("{} observations", frame.len());
/// # Ok(())
/// # }
/// ```
pub async fn download_asos_data(
    source: impl Into<AsosSource>,
) -> Result<AsosFrame, AsosDataError> {
    AsosDataLoader::default().load(&source.into()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_local_file() -> Result<(), AsosDataError> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "station,station_name,lat,lon,valid(UTC),tmpf,dwpf,sknt,drct,").unwrap();
        writeln!(file, "AMW,Ames,41.990439,-93.618515,2018-03-25 12:00,29,24,8,113,").unwrap();

        let frame = download_asos_data(file.path()).await?;

        assert_eq!(frame.len(), 1);
        assert_eq!(frame.observations()?[0].station_id, "AMW");
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let result = download_asos_data(Path::new("does/not/exist.csv")).await;

        assert!(matches!(result, Err(AsosDataError::FileRead(..))));
    }

    #[tokio::test]
    async fn test_unreachable_url_is_network_error() {
        let loader = AsosDataLoader::default();
        let source = AsosSource::from("http://127.0.0.1:9/1min_dl.php");

        let result = loader.load(&source).await;

        assert!(matches!(result, Err(AsosDataError::NetworkRequest(..))));
    }
}
