use log::{debug, warn};
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use scraper::{Html, Selector};
use url::Url;

use crate::config::{DelaysConfig, SourcesConfig};
use crate::delay_manager::DelayRange;
use crate::error::LookupFailure;
use crate::extractor::Extractor;
use crate::lead::{ContactDetails, RawCandidate};
use crate::source::{self, SourceClient};

// DDG HTML uses .result__a for the result title link.
static RESULT_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a.result__a").unwrap());

/// General web search, consulted only when the directory has no phone.
///
/// A lookup never reports absence: whatever cannot be found comes back as
/// `N/A`.
pub struct SearchEngine {
    client: Client,
    search_url: String,
    engine_host: String,
    denied_link_fragments: Vec<String>,
    lookup_delay: DelayRange,
}

impl SearchEngine {
    pub fn new(sources: &SourcesConfig, delays: &DelaysConfig) -> Result<Self, reqwest::Error> {
        let engine_host = Url::parse(&sources.search_url)
            .ok()
            .and_then(|url| url.host_str().map(registrable_host))
            .unwrap_or_else(|| "duckduckgo.com".to_string());

        Ok(SearchEngine {
            client: source::build_client(sources.lookup_timeout())?,
            search_url: sources.search_url.clone(),
            engine_host,
            denied_link_fragments: sources.denied_link_fragments.clone(),
            lookup_delay: delays.lookup,
        })
    }

    /// `"<name> <city> phone"`; the city is left out when the address has none.
    pub fn query_for(name: &str, address: &str) -> String {
        let city = Extractor::locality(address).unwrap_or_default();
        [name.trim(), city.as_str(), "phone"]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn try_lookup(&self, name: &str, address: &str) -> Result<ContactDetails, LookupFailure> {
        let query = Self::query_for(name, address);
        debug!("Searching for: '{}'", query);
        self.lookup_delay.pause("search lookup");

        let response = self
            .client
            .post(&self.search_url)
            .header(USER_AGENT, source::random_user_agent())
            .form(&[("q", query.as_str())])
            .send()
            .map_err(source::transport(&self.search_url))?;
        let html = source::read_body(&self.search_url, response)?;

        Ok(self.parse_results(&html))
    }

    pub(crate) fn parse_results(&self, html: &str) -> ContactDetails {
        let document = Html::parse_document(html);
        let text = document.root_element().text().collect::<Vec<_>>().join(" ");

        let website = document
            .select(&RESULT_LINK)
            .filter_map(|link| link.value().attr("href"))
            .find(|href| {
                Extractor::is_candidate_website(href, &self.engine_host, &self.denied_link_fragments)
            })
            .map(str::to_string);

        ContactDetails {
            phone: Extractor::or_not_available(Extractor::first_phone(&text)),
            website: Extractor::or_not_available(website),
        }
    }
}

impl SourceClient for SearchEngine {
    /// Search results are not used for bulk discovery.
    fn generate(&self, _category: &str, _location: &str) -> Vec<RawCandidate> {
        Vec::new()
    }

    fn lookup(&self, name: &str, address: &str) -> Option<ContactDetails> {
        let details = self.try_lookup(name, address).unwrap_or_else(|e| {
            warn!("Search lookup for '{}' failed: {}", name, e);
            ContactDetails::unavailable()
        });
        Some(details)
    }
}

// html.duckduckgo.com -> duckduckgo.com, so every engine subdomain is excluded.
fn registrable_host(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 || host.parse::<std::net::IpAddr>().is_ok() {
        return host.to_string();
    }
    labels[labels.len() - 2..].join(".")
}
