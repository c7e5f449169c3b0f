use crate::app_lib::json::value_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One uploaded report card. Identifiers arrive as numbers or strings
/// depending on the endpoint, so they are kept as raw JSON.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ReportCard {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub semester_id: Value,
    #[serde(default)]
    pub semester_code: Option<String>,
    #[serde(default)]
    pub pdf_url: Option<String>,
}

impl ReportCard {
    /// Semester label for display, `-` when missing.
    #[must_use]
    pub fn semester_label(&self) -> &str {
        self.semester_code
            .as_deref()
            .filter(|code| !code.trim().is_empty())
            .unwrap_or("-")
    }

    /// Stored file path relative to the media root, if a file was uploaded.
    #[must_use]
    pub fn file_path(&self) -> Option<&str> {
        self.pdf_url
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }

    #[must_use]
    pub fn in_semester(&self, semester_id: &str) -> bool {
        value_text(&self.semester_id) == semester_id.trim()
    }
}

/// Response envelope of `reportcard/get-reports-by-student/<id>/`.
#[derive(Debug, Default, Deserialize)]
pub struct ReportList {
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub data: Value,
}

impl ReportList {
    /// Entries of a `success` envelope; any other shape is empty. Entries that
    /// are not report objects are skipped.
    #[must_use]
    pub fn into_cards(self) -> Vec<ReportCard> {
        if value_text(&self.status) != "success" {
            return Vec::new();
        }
        let Value::Array(items) = self.data else {
            return Vec::new();
        };
        items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()
    }
}
