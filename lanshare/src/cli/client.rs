use client::{DownloadParams, UploadParams};

pub async fn upload(params: UploadParams) {
    client::upload_file(params).await;
}

pub async fn download(params: DownloadParams) {
    client::download_file(params).await;
}
