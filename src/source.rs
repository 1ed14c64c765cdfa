//! The lookup capability shared by the directory and the search fallback,
//! plus the blocking HTTP plumbing both of them use.
//!
//! Clients never surface errors to their callers. Internally every request
//! is a `Result<_, LookupFailure>`; the public methods collapse it to the
//! variant's degraded value (no listing, or sentinel-filled details).

use std::time::Duration;

use rand::seq::SliceRandom;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};

use crate::error::LookupFailure;
use crate::lead::{ContactDetails, RawCandidate};

/// A place to discover businesses and look up their contact details.
///
/// Implementations must be safe to call from many workers at once.
pub trait SourceClient: Send + Sync {
    /// Raw name/address pairs for one category in one location. Failures
    /// produce an empty list.
    fn generate(&self, category: &str, location: &str) -> Vec<RawCandidate>;

    /// Contact details for one business, or `None` when the source has
    /// nothing to offer.
    fn lookup(&self, name: &str, address: &str) -> Option<ContactDetails>;
}

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/119.0",
];

pub(crate) fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-CA,en;q=0.9"));

    Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .cookie_store(true)
        .build()
}

/// Reads a response body, treating any non-2xx status as a failure.
pub(crate) fn read_body(url: &str, response: Response) -> Result<String, LookupFailure> {
    let status = response.status();
    if !status.is_success() {
        return Err(LookupFailure::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.text().map_err(|source| LookupFailure::Transport {
        url: url.to_string(),
        source,
    })
}

pub(crate) fn transport(url: &str) -> impl FnOnce(reqwest::Error) -> LookupFailure + '_ {
    move |source| LookupFailure::Transport {
        url: url.to_string(),
        source,
    }
}
