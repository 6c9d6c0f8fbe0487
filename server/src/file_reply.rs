use axum::{
    body::Body,
    http::HeaderValue,
    response::{IntoResponse, Response},
};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

/// Binary attachment response streaming a stored file to the client.
///
/// The body is a `ReaderStream`, so a client that disconnects mid-download
/// drops the stream and the file handle with it. A read error after the
/// headers went out terminates the connection; no second response is
/// attempted.
pub struct FileReply {
    file: File,
    name: String,
    size: u64,
}

impl FileReply {
    #[must_use]
    pub fn new(file: File, name: String, size: u64) -> Self {
        Self { file, name, size }
    }
}

/// Suggested download filename, percent-encoded the way the listing links
/// encode it.
fn attachment_value(name: &str) -> String {
    format!(r#"attachment; filename="{}""#, urlencoding::encode(name))
}

impl IntoResponse for FileReply {
    fn into_response(self) -> Response {
        let stream = ReaderStream::new(self.file);
        let mut res = Body::from_stream(stream).into_response();
        res.headers_mut().insert(
            "content-type",
            HeaderValue::from_static("application/octet-stream"),
        );
        let attachment = attachment_value(&self.name);
        if let Ok(val) = HeaderValue::from_str(attachment.as_str()) {
            res.headers_mut().insert("content-disposition", val);
        }
        let len = self.size.to_string();
        if let Ok(val) = HeaderValue::from_str(len.as_str()) {
            res.headers_mut().insert("Content-Length", val);
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("file.ext", r#"attachment; filename="file.ext""#)]
    #[case("with space", r#"attachment; filename="with%20space""#)]
    #[case(
        "报告.pdf",
        r#"attachment; filename="%E6%8A%A5%E5%91%8A.pdf""#
    )]
    #[case(
        "quote\"name",
        r#"attachment; filename="quote%22name""#
    )]
    #[trace]
    fn attachment_value_encodes_name(#[case] name: &str, #[case] expected: &str) {
        // Act
        let value = attachment_value(name);

        // Assert
        assert_eq!(value, expected);
    }
}
