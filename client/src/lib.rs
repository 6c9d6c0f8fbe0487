//! Command-line client for a running share server: upload a local file,
//! download a shared file to disk. Status is reported on stdout; the CLI is
//! the only consumer.

use std::io;
use std::path::{Path, PathBuf};

use futures::TryStreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tokio::fs::File;
use tokio_util::io::{ReaderStream, StreamReader};
use url::Url;

pub struct UploadParams {
    pub uri: String,
    pub file: String,
}

pub struct DownloadParams {
    pub uri: String,
    pub file: String,
    pub output: Option<String>,
}

/// Builds an endpoint URL below `base`. Each segment is pushed separately
/// so reserved characters in file names end up percent-encoded.
fn endpoint(base: &str, segments: &[&str]) -> Option<Url> {
    let mut url = Url::parse(base).ok()?;
    {
        let mut parts = url.path_segments_mut().ok()?;
        parts.pop_if_empty();
        for segment in segments {
            parts.push(segment);
        }
    }
    Some(url)
}

fn upload_url(base: &str) -> Option<Url> {
    endpoint(base, &["upload"])
}

fn download_url(base: &str, file_name: &str) -> Option<Url> {
    endpoint(base, &["download", file_name])
}

/// Posts a local file to the server as a streamed multipart upload.
pub async fn upload_file(params: UploadParams) {
    let path = PathBuf::from(&params.file);
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        println!("invalid file path: {}", params.file);
        return;
    };
    let Some(uri) = upload_url(&params.uri) else {
        println!("invalid server uri: {}", params.uri);
        return;
    };

    let error_message = format!("no such file {}", &params.file);
    let f = File::open(&params.file).await.expect(&error_message);
    let stream = ReaderStream::new(f);
    let stream = reqwest::Body::wrap_stream(stream);
    let part = Part::stream(stream).file_name(file_name.to_string());
    let form = Form::new().part("file", part);

    let client = Client::new();
    let result = client.post(uri).multipart(form).send().await;
    match result {
        Ok(x) => {
            println!("file {} uploaded. Status: {}", params.file, x.status());
        }
        Err(e) => {
            println!("upload error: {e}");
        }
    }
}

/// Downloads a shared file, streaming the body into the output path
/// (the shared name in the current directory unless overridden).
pub async fn download_file(params: DownloadParams) {
    let Some(uri) = download_url(&params.uri, &params.file) else {
        println!("invalid server uri: {}", params.uri);
        return;
    };
    let target = params.output.unwrap_or_else(|| params.file.clone());

    let client = Client::new();
    let response = match client.get(uri).send().await {
        Ok(r) => r,
        Err(e) => {
            println!("download error: {e}");
            return;
        }
    };
    if !response.status().is_success() {
        println!("file {} not downloaded. Status: {}", params.file, response.status());
        return;
    }

    match write_body_to(&target, response).await {
        Ok(written) => {
            println!("file {} downloaded to {target} ({written} bytes)", params.file);
        }
        Err(e) => {
            println!("download error: {e}");
        }
    }
}

async fn write_body_to<P: AsRef<Path>>(target: P, response: reqwest::Response) -> io::Result<u64> {
    let stream = response.bytes_stream().map_err(io::Error::other);
    let body_reader = StreamReader::new(stream);
    futures::pin_mut!(body_reader);
    let mut out = File::create(target).await?;
    tokio::io::copy(&mut body_reader, &mut out).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:3000", "http://localhost:3000/upload")]
    #[case("http://localhost:3000/", "http://localhost:3000/upload")]
    #[case("http://192.168.0.10:3000", "http://192.168.0.10:3000/upload")]
    #[trace]
    fn upload_url_cases(#[case] base: &str, #[case] expected: &str) {
        // Act
        let url = upload_url(base).unwrap();

        // Assert
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case("http://localhost:3000", "a.txt", "http://localhost:3000/download/a.txt")]
    #[case(
        "http://localhost:3000",
        "报告.pdf",
        "http://localhost:3000/download/%E6%8A%A5%E5%91%8A.pdf"
    )]
    #[case(
        "http://localhost:3000",
        "with space",
        "http://localhost:3000/download/with%20space"
    )]
    #[case(
        "http://localhost:3000",
        "a/b",
        "http://localhost:3000/download/a%2Fb"
    )]
    #[trace]
    fn download_url_encodes_file_name(
        #[case] base: &str,
        #[case] file_name: &str,
        #[case] expected: &str,
    ) {
        // Act
        let url = download_url(base, file_name).unwrap();

        // Assert
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn invalid_base_uri_is_none() {
        // Act
        let url = upload_url("http//localhost");

        // Assert
        assert!(url.is_none());
    }
}
