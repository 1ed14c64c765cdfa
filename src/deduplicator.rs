use std::collections::HashSet;

use log::info;

use crate::delay_manager::DelayRange;
use crate::lead::Lead;
use crate::normalizer::normalize_address;
use crate::source::SourceClient;

/// Builds the canonical lead list from directory discovery across every
/// category x location pair.
pub struct Deduplicator<'a> {
    primary: &'a dyn SourceClient,
    between_queries: DelayRange,
    prefix_len: usize,
}

impl<'a> Deduplicator<'a> {
    /// `prefix_len` is how much of the normalized address goes into the
    /// dedup key; `0` uses all of it.
    pub fn new(primary: &'a dyn SourceClient, between_queries: DelayRange, prefix_len: usize) -> Self {
        Deduplicator {
            primary,
            between_queries,
            prefix_len,
        }
    }

    /// Category-major, location-minor. The first lead seen for a key wins
    /// and output order follows discovery order.
    pub fn generate_all(&self, categories: &[String], locations: &[String]) -> Vec<Lead> {
        let categories = unique_in_order(categories);
        let locations = unique_in_order(locations);
        let total_pairs = categories.len() * locations.len();

        let mut seen = HashSet::new();
        let mut leads = Vec::new();
        let mut pair_idx = 0;

        for category in &categories {
            for location in &locations {
                pair_idx += 1;
                let raw = self.primary.generate(category, location);
                let mut added = 0;

                for candidate in raw {
                    let address = normalize_address(&candidate.address);
                    let key = dedup_key(&candidate.name, &address, self.prefix_len);
                    if !seen.insert(key) {
                        continue;
                    }
                    leads.push(Lead::discovered(candidate.name, address));
                    added += 1;
                }

                info!(
                    "[{}/{}] '{}' in '{}': {} new leads ({} total)",
                    pair_idx,
                    total_pairs,
                    category,
                    location,
                    added,
                    leads.len()
                );

                if pair_idx < total_pairs {
                    self.between_queries.pause("between directory queries");
                }
            }
        }

        leads
    }
}

/// `lower(name) | lower(first prefix_len chars of address)`.
pub fn dedup_key(name: &str, normalized_address: &str, prefix_len: usize) -> String {
    let address: String = if prefix_len == 0 {
        normalized_address.to_string()
    } else {
        normalized_address.chars().take(prefix_len).collect()
    };
    format!("{}|{}", name.to_lowercase(), address.to_lowercase())
}

fn unique_in_order(items: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty() && seen.insert(*item))
        .collect()
}
