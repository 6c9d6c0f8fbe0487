#![allow(clippy::unused_async)]
use std::io;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use futures::Stream;
use futures_util::TryStreamExt;
use tokio_util::io::StreamReader;

use crate::dir_store::DirectoryStore;
use crate::domain::Storage;
use crate::file_reply::FileReply;
use crate::{filename, page};

/// Multipart field name the upload form submits under.
const FILE_FIELD: &str = "file";

/// Renders the listing page with the upload form.
pub async fn index(State(store): State<Arc<DirectoryStore>>) -> Response {
    match store.list().await {
        Ok(files) => Html(page::render_index(&files)).into_response(),
        Err(e) => {
            tracing::error!("page error: {e}");
            internal_server_error("服务器错误")
        }
    }
}

/// Stores exactly one file from a multipart request and redirects back to
/// the listing. Any existing file with the same name is overwritten.
pub async fn upload(
    State(store): State<Arc<DirectoryStore>>,
    mut multipart: Multipart,
) -> Response {
    let mut stored: Option<String> = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                // Also the path taken when the request body exceeds the
                // 100 MiB cap: the limited body errors the multipart read
                // before anything was written to disk.
                tracing::error!("upload error: {e}");
                return internal_server_error(&format!("上传失败: {e}"));
            }
        };

        let Some(raw_name) = field.file_name().map(ToString::to_string) else {
            // Plain text fields are not part of the contract, skip them.
            continue;
        };
        if field.name() != Some(FILE_FIELD) {
            return bad_request("意外的文件字段");
        }
        if stored.is_some() {
            return bad_request("一次只能上传一个文件");
        }

        let name = filename::normalize(&raw_name);
        match read_from_stream(field).await {
            Ok((data, read_bytes)) => match store.save(&name, data).await {
                Ok(()) => {
                    tracing::info!("file: {name} read: {read_bytes} stored");
                    stored = Some(name);
                }
                Err(e) => {
                    tracing::error!("upload error: file '{name}' not stored: {e}");
                    return internal_server_error(&format!("上传失败: {e}"));
                }
            },
            Err(e) => {
                tracing::error!("upload error: {e}");
                return internal_server_error(&format!("上传失败: {e}"));
            }
        }
    }

    if stored.is_some() {
        redirect_to_index()
    } else {
        bad_request("没有选择文件")
    }
}

/// Streams a stored file back as a binary attachment.
pub async fn download(
    Path(file_name): Path<String>,
    State(store): State<Arc<DirectoryStore>>,
) -> Response {
    if !filename::is_safe_segment(&file_name) {
        return not_found("文件不存在");
    }
    match store.open(&file_name).await {
        Ok((file, size)) => FileReply::new(file, file_name, size).into_response(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => not_found("文件不存在"),
        Err(e) => {
            tracing::error!("download error: {e}");
            internal_server_error("下载出错")
        }
    }
}

/// Removes a stored file and redirects back to the listing. A missing file
/// and a failed removal produce the same not-found answer.
pub async fn delete(
    Path(file_name): Path<String>,
    State(store): State<Arc<DirectoryStore>>,
) -> Response {
    if !filename::is_safe_segment(&file_name) {
        return not_found("文件不存在");
    }
    match store.remove(&file_name).await {
        Ok(()) => {
            tracing::info!("file: {file_name} deleted");
            redirect_to_index()
        }
        Err(e) => {
            tracing::error!("delete error: {e}");
            not_found("文件不存在")
        }
    }
}

/// 302 back to the listing page, as the upload form expects.
fn redirect_to_index() -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, HeaderValue::from_static("/"))],
    )
        .into_response()
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, message.to_string()).into_response()
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, message.to_string()).into_response()
}

fn internal_server_error(message: &str) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, message.to_string()).into_response()
}

async fn read_from_stream<S, E>(stream: S) -> io::Result<(Vec<u8>, usize)>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Sync + std::error::Error + Send + 'static,
{
    // Convert the stream into an `AsyncRead`.
    let body_with_io_error = stream.map_err(io::Error::other);
    let body_reader = StreamReader::new(body_with_io_error);
    futures::pin_mut!(body_reader);
    let mut buffer = Vec::new();

    let copied_bytes = tokio::io::copy(&mut body_reader, &mut buffer).await?;
    let copied_bytes = usize::try_from(copied_bytes).unwrap_or(usize::MAX);
    Ok((buffer, copied_bytes))
}
