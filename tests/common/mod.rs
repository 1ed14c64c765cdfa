#![allow(dead_code)]

pub mod wiremock_helpers;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use northscrape_lib::{ContactDetails, RawCandidate, SourceClient};

/// Serves canned discovery results per (category, location) and records
/// the order it was queried in.
#[derive(Default)]
pub struct ScriptedDirectory {
    pub listings: HashMap<(String, String), Vec<RawCandidate>>,
    pub queried: Mutex<Vec<(String, String)>>,
}

impl ScriptedDirectory {
    pub fn with(mut self, category: &str, location: &str, found: &[(&str, &str)]) -> Self {
        self.listings.insert(
            (category.to_string(), location.to_string()),
            found
                .iter()
                .map(|(name, address)| RawCandidate {
                    name: name.to_string(),
                    address: address.to_string(),
                })
                .collect(),
        );
        self
    }
}

impl SourceClient for ScriptedDirectory {
    fn generate(&self, category: &str, location: &str) -> Vec<RawCandidate> {
        self.queried
            .lock()
            .unwrap()
            .push((category.to_string(), location.to_string()));
        self.listings
            .get(&(category.to_string(), location.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    fn lookup(&self, _name: &str, _address: &str) -> Option<ContactDetails> {
        None
    }
}

/// Lookup fake keyed by business name. Names listed in `panics_for` blow
/// up mid-lookup; every call is counted and can be slowed down to observe
/// how many run at once.
#[derive(Default)]
pub struct ScriptedLookup {
    pub answers: HashMap<String, Option<ContactDetails>>,
    pub default_answer: Option<ContactDetails>,
    pub panics_for: Vec<String>,
    pub delay: Duration,
    pub calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl ScriptedLookup {
    pub fn answering(mut self, name: &str, answer: Option<ContactDetails>) -> Self {
        self.answers.insert(name.to_string(), answer);
        self
    }

    pub fn by_default(mut self, answer: Option<ContactDetails>) -> Self {
        self.default_answer = answer;
        self
    }

    pub fn panicking_for(mut self, name: &str) -> Self {
        self.panics_for.push(name.to_string());
        self
    }

    pub fn slowed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl SourceClient for ScriptedLookup {
    fn generate(&self, _category: &str, _location: &str) -> Vec<RawCandidate> {
        Vec::new()
    }

    fn lookup(&self, name: &str, _address: &str) -> Option<ContactDetails> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        if self.panics_for.iter().any(|n| n == name) {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            panic!("connection reset while looking up {}", name);
        }

        let answer = self
            .answers
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.default_answer.clone());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        answer
    }
}

pub fn details(phone: &str, website: &str) -> ContactDetails {
    ContactDetails {
        phone: phone.to_string(),
        website: website.to_string(),
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
