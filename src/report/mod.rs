//! Student report: assembly of the document and its PDF rendering.

pub mod assembler;
pub mod document;
pub mod format;
pub mod pdf;

use std::sync::Arc;
use thiserror::Error;

use crate::domain::StudentReportSource;
pub use assembler::{assemble, generate_report};
pub use document::{ReportDocument, Section, SectionBody};
pub use pdf::render_pdf;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Student not found")]
    NotFound,
    #[error("{0}")]
    GenerationFailure(String),
}

/// Finished PDF ready to be streamed back.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ReportService {
    source: Arc<dyn StudentReportSource>,
}

impl ReportService {
    pub fn new(source: Arc<dyn StudentReportSource>) -> Self {
        Self { source }
    }

    pub async fn document(&self, student_id: i32) -> Result<ReportDocument, ReportError> {
        generate_report(self.source.as_ref(), student_id).await
    }

    pub async fn pdf(&self, student_id: i32) -> Result<RenderedReport, ReportError> {
        let document = self.document(student_id).await?;
        let bytes = render_pdf(&document);

        tracing::info!(
            "Rendered report for student {} ({} bytes)",
            student_id,
            bytes.len()
        );

        Ok(RenderedReport {
            file_name: document.file_name(),
            bytes,
        })
    }
}
