//! Request and response bodies

use proposal_pdf::CoverMetadata;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Names the uploads were stored under, in upload order
    pub saved: Vec<String>,
    /// Every module after the upload
    pub all: Vec<String>,
}

/// Cover metadata as posted by the builder form
#[derive(Debug, Deserialize)]
pub struct GenerateCoverRequest {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

fn default_title() -> String {
    "Proposal".to_string()
}

impl GenerateCoverRequest {
    pub fn into_metadata(self) -> CoverMetadata {
        CoverMetadata {
            title: self.title,
            client_name: non_empty(self.client_name),
            author: non_empty(self.created_by),
            date: non_empty(self.date),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateCoverResponse {
    pub cover: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    /// Module names in page order
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub cover: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportResponse {
    pub export: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cover_request_defaults() {
        let req: GenerateCoverRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(
            req.into_metadata(),
            CoverMetadata {
                title: "Proposal".to_string(),
                client_name: None,
                author: None,
                date: None,
            }
        );
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let req: GenerateCoverRequest = serde_json::from_str(
            r#"{"title":"Plan","client_name":"","created_by":"Jordan","date":" "}"#,
        )
        .unwrap();
        let meta = req.into_metadata();
        assert_eq!(meta.client_name, None);
        assert_eq!(meta.author.as_deref(), Some("Jordan"));
        assert_eq!(meta.date, None);
    }

    #[test]
    fn test_export_request_defaults() {
        let req: ExportRequest = serde_json::from_str(r#"{"cover":null}"#).unwrap();
        assert!(req.files.is_empty());
        assert!(req.cover.is_none());
    }
}
