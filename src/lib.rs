pub mod catalog;
pub mod config;
pub mod deduplicator;
pub mod delay_manager;
pub mod directory_source;
pub mod enrichment;
pub mod error;
pub mod extractor;
pub mod lead;
pub mod logger;
pub mod normalizer;
pub mod pipeline;
pub mod postal_directory;
pub mod search_engine;
pub mod source;

// Exporting types for convenience
pub use catalog::Catalog;
pub use config::Settings;
pub use deduplicator::Deduplicator;
pub use directory_source::DirectorySource;
pub use enrichment::EnrichmentScheduler;
pub use error::{CandidateFailure, LookupFailure, PipelineError};
pub use lead::{ContactDetails, Lead, LeadSource, RawCandidate, NOT_AVAILABLE};
pub use normalizer::{normalize_address, normalize_phone};
pub use pipeline::{GenerateRequest, GenerateResponse, LeadPipeline};
pub use search_engine::SearchEngine;
pub use source::SourceClient;
