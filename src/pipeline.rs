use log::info;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::deduplicator::Deduplicator;
use crate::delay_manager::DelayRange;
use crate::directory_source::DirectorySource;
use crate::enrichment::EnrichmentScheduler;
use crate::error::PipelineError;
use crate::lead::Lead;
use crate::search_engine::SearchEngine;
use crate::source::SourceClient;

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub categories: Vec<String>,
    pub locations: Vec<String>,
    #[serde(default = "enrich_by_default")]
    pub enrich: bool,
}

fn enrich_by_default() -> bool {
    true
}

impl GenerateRequest {
    pub fn new(categories: Vec<String>, locations: Vec<String>, enrich: bool) -> Self {
        GenerateRequest {
            categories,
            locations,
            enrich,
        }
    }

    /// Both selections need at least one non-blank entry.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let has_entries = |items: &[String]| items.iter().any(|item| !item.trim().is_empty());
        if has_entries(&self.categories) && has_entries(&self.locations) {
            Ok(())
        } else {
            Err(PipelineError::EmptySelection)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub count: usize,
    pub leads: Vec<Lead>,
}

impl GenerateResponse {
    pub fn new(leads: Vec<Lead>) -> Self {
        GenerateResponse {
            count: leads.len(),
            leads,
        }
    }
}

/// Discovery followed by optional enrichment, for one batch request.
pub struct LeadPipeline {
    primary: Box<dyn SourceClient>,
    fallback: Box<dyn SourceClient>,
    between_queries: DelayRange,
    workers: usize,
    dedup_prefix_len: usize,
}

impl LeadPipeline {
    /// Wires the live directory and search clients.
    pub fn from_settings(settings: &Settings) -> Result<Self, PipelineError> {
        let primary = DirectorySource::new(&settings.sources, &settings.delays)?;
        let fallback = SearchEngine::new(&settings.sources, &settings.delays)?;
        Ok(Self::with_sources(Box::new(primary), Box::new(fallback), settings))
    }

    pub fn with_sources(
        primary: Box<dyn SourceClient>,
        fallback: Box<dyn SourceClient>,
        settings: &Settings,
    ) -> Self {
        LeadPipeline {
            primary,
            fallback,
            between_queries: settings.delays.between_queries,
            workers: settings.enrichment.workers,
            dedup_prefix_len: settings.enrichment.dedup_prefix_len,
        }
    }

    pub fn run(&self, request: &GenerateRequest) -> Result<GenerateResponse, PipelineError> {
        request.validate()?;

        let leads = Deduplicator::new(self.primary.as_ref(), self.between_queries, self.dedup_prefix_len)
            .generate_all(&request.categories, &request.locations);
        info!("Discovery produced {} unique leads", leads.len());

        let leads = if request.enrich {
            EnrichmentScheduler::new(self.primary.as_ref(), self.fallback.as_ref(), self.workers)
                .enrich(leads)
        } else {
            leads
        };

        Ok(GenerateResponse::new(leads))
    }
}
