//! Format-independent description of a student report.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    /// Natural student code used for the file name, or the surrogate id.
    pub student_code: String,
    pub sections: Vec<Section>,
}

impl ReportDocument {
    /// Characters outside `[A-Za-z0-9._-]` become `_`, so the name can go
    /// straight into a `Content-Disposition` header.
    pub fn file_name(&self) -> String {
        let code: String = self
            .student_code
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("student_report_{}.pdf", code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub body: SectionBody,
}

/// Table column with its share of the page width, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub header: String,
    pub width: u8,
}

impl Column {
    pub fn new(header: &str, width: u8) -> Self {
        Self {
            header: header.to_string(),
            width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionBody {
    /// Document header; the section title is the headline.
    Heading { subtitle: String },
    /// Label/value pairs.
    KeyValue { rows: Vec<(String, String)> },
    Table {
        columns: Vec<Column>,
        rows: Vec<Vec<String>>,
    },
    /// Rendered in italics in place of an empty table.
    Empty { notice: String },
}
