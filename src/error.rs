use thiserror::Error;

/// Failure talking to the search provider. Never fatal for a batch.
#[derive(Debug, Error)]
pub enum SearchFailure {
    #[error("search request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("search provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("search response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure while asking the model for a match or interpreting its reply.
///
/// The extractor degrades every variant to the not-found sentinel, these only
/// reach the logs.
#[derive(Debug, Error)]
pub enum ExtractionFailure {
    #[error("model request failed: {0}")]
    Request(#[from] async_openai::error::OpenAIError),

    #[error("model did not reply within {0} seconds")]
    Timeout(u64),

    #[error("model reply had no content")]
    EmptyReply,

    #[error("model reply is not the expected json shape: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("confidence {0} is not a number between 0 and 100")]
    InvalidConfidence(String),
}

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error(transparent)]
    Search(#[from] SearchFailure),

    #[error("unexpected failure while enriching record: {0}")]
    Unexpected(String),
}

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("{0}")]
    Unreadable(#[from] csv::Error),

    #[error("{0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("workbook has no worksheet")]
    NoWorksheet,

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("cell at row {row}, column {col} is outside the worksheet limits")]
    TooLarge { row: usize, col: usize },

    #[error("failed to write sheet: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
}
