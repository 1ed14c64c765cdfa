//! Fallback enrichment over a fixed pool of worker threads.
//!
//! Each lead is an independent unit of work. Workers pull leads from a
//! shared queue, run the directory lookup (and the search fallback when the
//! directory has no phone), and send the finished lead back over a channel.
//! Results arrive in completion order. The worker count is the hard cap on
//! concurrent outbound lookups.
//!
//! The ordering rule is fixed: the directory wins unless it has no phone,
//! and the search result is taken as-is, found or not.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Mutex, PoisonError};
use std::thread;

use log::{debug, error, info};

use crate::error::CandidateFailure;
use crate::lead::{ContactDetails, Lead, LeadSource};
use crate::normalizer::{normalize_address, normalize_phone};
use crate::source::SourceClient;

pub struct EnrichmentScheduler<'a> {
    primary: &'a dyn SourceClient,
    fallback: &'a dyn SourceClient,
    workers: usize,
}

impl<'a> EnrichmentScheduler<'a> {
    pub fn new(primary: &'a dyn SourceClient, fallback: &'a dyn SourceClient, workers: usize) -> Self {
        EnrichmentScheduler {
            primary,
            fallback,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Enriches every lead. A lead whose processing fails is logged and left
    /// out; the rest of the batch is unaffected.
    pub fn enrich(&self, leads: Vec<Lead>) -> Vec<Lead> {
        let total = leads.len();
        if total == 0 {
            return Vec::new();
        }

        let worker_count = self.workers.min(total);
        info!("Enriching {} leads with {} workers", total, worker_count);

        let queue = Mutex::new(leads.into_iter());
        let (result_tx, result_rx) = mpsc::channel::<Result<Lead, CandidateFailure>>();
        let mut enriched = Vec::with_capacity(total);
        let mut failed = 0usize;

        thread::scope(|scope| {
            for worker_id in 0..worker_count {
                let result_tx = result_tx.clone();
                let queue = &queue;
                scope.spawn(move || loop {
                    let next = queue.lock().unwrap_or_else(PoisonError::into_inner).next();
                    let Some(lead) = next else {
                        debug!("Worker {} drained the queue", worker_id);
                        break;
                    };
                    if result_tx.send(self.process_isolated(lead)).is_err() {
                        break;
                    }
                });
            }
            // Only the workers hold senders now; the loop ends when they finish.
            drop(result_tx);

            for outcome in result_rx {
                match outcome {
                    Ok(lead) => enriched.push(lead),
                    Err(e) => {
                        failed += 1;
                        error!("Dropping lead: {}", e);
                    }
                }
            }
        });

        log_summary(&enriched, failed);
        enriched
    }

    fn process_isolated(&self, lead: Lead) -> Result<Lead, CandidateFailure> {
        let name = lead.name.clone();
        panic::catch_unwind(AssertUnwindSafe(|| self.process(lead))).map_err(|payload| {
            CandidateFailure::Panicked {
                name,
                message: panic_message(payload.as_ref()),
            }
        })
    }

    /// Enriches a single lead.
    pub fn process(&self, lead: Lead) -> Lead {
        let address = normalize_address(&lead.address);

        if lead.has_usable_phone() {
            return Lead {
                address,
                phone: normalize_phone(&lead.phone),
                source: LeadSource::Kept,
                ..lead
            };
        }

        let (details, source) = match self.primary.lookup(&lead.name, &address) {
            Some(details) if details.has_phone() => (details, LeadSource::Primary),
            _ => {
                let details = self
                    .fallback
                    .lookup(&lead.name, &address)
                    .unwrap_or_else(ContactDetails::unavailable);
                (details, LeadSource::Fallback)
            }
        };

        debug!("{} -> {} via {}", lead.name, details.phone, source.as_str());
        Lead {
            name: lead.name,
            address,
            phone: details.phone,
            website: details.website,
            source,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn log_summary(leads: &[Lead], failed: usize) {
    let mut by_source: HashMap<LeadSource, usize> = HashMap::new();
    for lead in leads {
        *by_source.entry(lead.source).or_default() += 1;
    }
    let count = |source: LeadSource| by_source.get(&source).copied().unwrap_or(0);
    info!(
        "Enrichment finished: {} primary, {} fallback, {} kept, {} dropped",
        count(LeadSource::Primary),
        count(LeadSource::Fallback),
        count(LeadSource::Kept),
        failed
    );
}
