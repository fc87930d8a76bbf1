//! Input document loading. Each pipeline fetches one static JSON document,
//! either from disk or over HTTP, and decodes it before any model building
//! starts. A load failure is terminal for that pipeline only.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{RelvisError, Result};

/// Where a configured input document lives.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    File(PathBuf),
    Remote(Url),
}

impl DocumentSource {
    /// Interpret a config value: an `http(s)` URL stays remote, anything
    /// else is a path resolved against the data directory.
    pub fn parse(spec: &str, data_dir: &Path) -> Self {
        match Url::parse(spec) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                DocumentSource::Remote(url)
            }
            _ => DocumentSource::File(data_dir.join(spec)),
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::File(path) => write!(f, "{}", path.display()),
            DocumentSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// Fetch and decode one JSON document.
pub async fn load_document<T: DeserializeOwned>(source: &DocumentSource) -> Result<T> {
    let body = match source {
        DocumentSource::File(path) => std::fs::read_to_string(path)?,
        DocumentSource::Remote(url) => {
            let response = reqwest::get(url.clone())
                .await
                .map_err(|e| RelvisError::Fetch(format!("{}: {}", url, e)))?;
            response
                .error_for_status()
                .map_err(|e| RelvisError::Fetch(format!("{}: {}", url, e)))?
                .text()
                .await
                .map_err(|e| RelvisError::Fetch(format!("{}: {}", url, e)))?
        }
    };

    serde_json::from_str(&body)
        .map_err(|e| RelvisError::Parse(format!("JSON parse error in {}: {}", source, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GraphEntry;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_source_parse_distinguishes_url_and_path() {
        let dir = Path::new("/data");
        assert!(matches!(
            DocumentSource::parse("https://example.org/g.json", dir),
            DocumentSource::Remote(_)
        ));
        assert!(matches!(
            DocumentSource::parse("graph.json", dir),
            DocumentSource::File(ref p) if p == Path::new("/data/graph.json")
        ));
        // drive-letter-like and relative specs stay paths
        assert!(matches!(
            DocumentSource::parse("./nested/graph.json", dir),
            DocumentSource::File(_)
        ));
    }

    #[tokio::test]
    async fn test_load_document_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.json");
        fs::write(&path, r#"[{"text": "t", "graph": []}]"#).unwrap();

        let source = DocumentSource::File(path);
        let entries: Vec<GraphEntry> = load_document(&source).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "t");
    }

    #[tokio::test]
    async fn test_load_document_missing_file_is_io_error() {
        let source = DocumentSource::File(PathBuf::from("/nonexistent/graph.json"));
        let err = load_document::<Vec<GraphEntry>>(&source).await.unwrap_err();
        assert!(matches!(err, RelvisError::Io(_)));
    }

    #[tokio::test]
    async fn test_load_document_bad_json_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "not json").unwrap();

        let source = DocumentSource::File(path);
        let err = load_document::<Vec<GraphEntry>>(&source).await.unwrap_err();
        assert!(matches!(err, RelvisError::Parse(_)));
        assert!(err.to_string().contains("broken.json"));
    }
}
