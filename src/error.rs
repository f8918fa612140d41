use thiserror::Error;

use crate::model::CanonicalHeading;

/// A posting-level fetch failure. The run skips the posting and continues
/// unless too few postings survive (see [`RunError::InsufficientData`]).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },
    #[error("empty document for {url}")]
    EmptyDocument { url: String },
}

/// Extraction rejects a posting without failing the run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("missing section '{}'", .0.title())]
    MissingSection(CanonicalHeading),
    #[error("sections out of canonical order: expected '{}', found '{}'", expected.title(), found.title())]
    UnexpectedOrder {
        expected: CanonicalHeading,
        found: CanonicalHeading,
    },
}

/// Normalization rejects a single record without failing the run.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("invalid section set: {0}")]
    InvalidSectionSet(String),
}

/// Rendering failures are fatal for the affected output format only.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unmapped employment type '{employment_type}' for job '{id}'")]
    UnmappedEnum { id: String, employment_type: String },
    #[error("rendered page failed validation: {0}")]
    ValidationFailed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("rendered bytes are not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Run-level failures: nothing is published, previous artifacts stay live.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("only {valid} valid job records (minimum {min}); refusing to publish")]
    InsufficientData { valid: usize, min: usize },
}

/// Why a posting was dropped, for the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    Fetch,
    MissingSection,
    UnexpectedOrder,
    InvalidSectionSet,
    Duplicate,
    UnmappedEnum,
    PageValidation,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Fetch => "fetch_failed",
            RejectReason::MissingSection => "missing_section",
            RejectReason::UnexpectedOrder => "unexpected_order",
            RejectReason::InvalidSectionSet => "invalid_section_set",
            RejectReason::Duplicate => "duplicate",
            RejectReason::UnmappedEnum => "unmapped_enum",
            RejectReason::PageValidation => "page_validation_failed",
        }
    }
}

impl From<&ExtractError> for RejectReason {
    fn from(e: &ExtractError) -> Self {
        match e {
            ExtractError::MissingSection(_) => RejectReason::MissingSection,
            ExtractError::UnexpectedOrder { .. } => RejectReason::UnexpectedOrder,
        }
    }
}
