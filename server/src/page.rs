//! Server-rendered listing page: upload form plus one row per shared file.

use kernel::StoredFile;

const STYLE: &str = "
    * {
        box-sizing: border-box;
        margin: 0;
        padding: 0;
    }
    body {
        font-family: Arial, sans-serif;
        margin: 0;
        padding: 20px;
        max-width: 100%;
        overflow-x: hidden;
    }
    .container {
        max-width: 1000px;
        margin: 0 auto;
        padding: 0 15px;
    }
    h1 {
        margin-bottom: 20px;
    }
    .upload-form {
        margin-bottom: 30px;
    }
    .file-list {
        width: 100%;
        border: 1px solid #ddd;
        border-radius: 4px;
        overflow: hidden;
    }
    .file-item {
        display: flex;
        justify-content: space-between;
        align-items: center;
        padding: 12px 15px;
        border-bottom: 1px solid #eee;
        width: 100%;
    }
    .file-item:last-child {
        border-bottom: none;
    }
    .file-name {
        flex: 1;
        word-break: break-word;
        white-space: normal;
        overflow: hidden;
        padding-right: 15px;
    }
    .file-actions {
        flex-shrink: 0;
        display: flex;
        gap: 10px;
    }
    .download-btn, .delete-btn {
        display: inline-block;
        padding: 5px 12px;
        text-decoration: none;
        border-radius: 3px;
        font-size: 14px;
        white-space: nowrap;
    }
    .download-btn {
        background-color: #4CAF50;
        color: white;
    }
    .delete-btn {
        background-color: #f44336;
        color: white;
    }
    #uploadStatus {
        margin: 10px 0;
        color: #666;
    }
    @media (max-width: 600px) {
        .file-item {
            flex-direction: column;
            align-items: flex-start;
        }
        .file-actions {
            margin-top: 8px;
            width: 100%;
            justify-content: flex-end;
        }
    }
";

const SCRIPT: &str = "
    document.getElementById('fileInput').addEventListener('change', function() {
        const statusDiv = document.getElementById('uploadStatus');
        if (this.files.length > 0) {
            statusDiv.textContent = '已选择文件: ' + this.files[0].name;
        }
    });
";

/// Renders the index page. Hidden entries (leading dot) are filtered here;
/// they stay downloadable and deletable by direct name.
pub fn render_index(files: &[StoredFile]) -> String {
    let rows: String = files
        .iter()
        .filter(|f| !f.is_hidden())
        .map(|f| render_row(&f.name))
        .collect();

    let list = if rows.is_empty() {
        "<p style=\"padding: 15px;\">暂无文件</p>".to_string()
    } else {
        rows
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>文件共享</title>
    <style>{STYLE}</style>
</head>
<body>
    <div class="container">
        <h1>文件共享</h1>
        <form action="/upload" method="post" enctype="multipart/form-data" class="upload-form">
            <input type="file" name="file" id="fileInput">
            <button type="submit">上传</button>
        </form>
        <div id="uploadStatus"></div>
        <h2>文件列表</h2>
        <div class="file-list">
            {list}
        </div>
    </div>
    <script>{SCRIPT}</script>
</body>
</html>
"#
    )
}

/// Display names are HTML-escaped; a filename containing markup must render
/// as text, never execute as part of the page. Link paths percent-encode
/// the name instead.
fn render_row(name: &str) -> String {
    let display = html_escape::encode_text(name);
    let encoded = urlencoding::encode(name);
    format!(
        r#"<div class="file-item">
                <div class="file-name">{display}</div>
                <div class="file-actions">
                    <a href="/download/{encoded}" class="download-btn">下载</a>
                    <a href="/delete/{encoded}" class="delete-btn">删除</a>
                </div>
            </div>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<StoredFile> {
        names.iter().map(|n| StoredFile::new(*n)).collect()
    }

    #[test]
    fn empty_listing_shows_placeholder() {
        // Act
        let html = render_index(&[]);

        // Assert
        assert!(html.contains("暂无文件"));
        assert!(!html.contains("file-item\""));
    }

    #[test]
    fn listing_contains_row_and_links_per_file() {
        // Act
        let html = render_index(&files(&["a.txt"]));

        // Assert
        assert!(html.contains("a.txt"));
        assert!(html.contains("/download/a.txt"));
        assert!(html.contains("/delete/a.txt"));
        assert!(!html.contains("暂无文件"));
    }

    #[test]
    fn hidden_files_are_filtered() {
        // Act
        let html = render_index(&files(&[".hidden", "visible.txt"]));

        // Assert
        assert!(!html.contains(".hidden"));
        assert!(html.contains("visible.txt"));
    }

    #[test]
    fn display_name_is_escaped() {
        // Act
        let html = render_index(&files(&["<script>alert(1)</script>.txt"]));

        // Assert
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;.txt"));
    }

    #[test]
    fn link_paths_are_percent_encoded() {
        // Act
        let html = render_index(&files(&["报告.pdf"]));

        // Assert
        assert!(html.contains("/download/%E6%8A%A5%E5%91%8A.pdf"));
        assert!(html.contains("/delete/%E6%8A%A5%E5%91%8A.pdf"));
        // The display name stays readable.
        assert!(html.contains("报告.pdf"));
    }
}
