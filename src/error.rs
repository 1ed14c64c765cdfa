use thiserror::Error;

/// Why a single outbound query produced nothing usable.
///
/// Never escapes a source client: each client collapses it into its own
/// degraded result.
#[derive(Debug, Error)]
pub enum LookupFailure {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("response from {url} is missing {what}")]
    Parse { url: String, what: &'static str },
}

/// An unexpected failure while enriching one lead. The lead is dropped from
/// the batch; its siblings are unaffected.
#[derive(Debug, Error)]
pub enum CandidateFailure {
    #[error("enrichment of '{name}' panicked: {message}")]
    Panicked { name: String, message: String },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("categories and locations cannot be empty")]
    EmptySelection,

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
