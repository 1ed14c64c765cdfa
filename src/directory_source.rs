use log::{debug, info, warn};
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use scraper::{Html, Selector};

use crate::config::{DelaysConfig, SourcesConfig};
use crate::delay_manager::DelayRange;
use crate::error::LookupFailure;
use crate::extractor::Extractor;
use crate::lead::{ContactDetails, RawCandidate};
use crate::normalizer::normalize_phone;
use crate::source::{self, SourceClient};

static LISTING: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.listing__content__wrapper").unwrap());
static LISTING_NAME: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.listing__name--link").unwrap());
static LISTING_ADDRESS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.listing__address--full").unwrap());
static LISTING_PHONE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h4.impl_phone_number, li.mlr__item--phone").unwrap());
static LISTING_WEBSITE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("li.mlr__item--website a[href]").unwrap());

/// Used when an address gives no locality to scope a lookup by.
const PROVINCE_SCOPE: &str = "ON";

/// The business directory: used both to discover leads and as the first
/// choice for contact details.
pub struct DirectorySource {
    generate_client: Client,
    lookup_client: Client,
    base_url: String,
    generate_delay: DelayRange,
    lookup_delay: DelayRange,
}

impl DirectorySource {
    pub fn new(sources: &SourcesConfig, delays: &DelaysConfig) -> Result<Self, reqwest::Error> {
        Ok(DirectorySource {
            generate_client: source::build_client(sources.generate_timeout())?,
            lookup_client: source::build_client(sources.lookup_timeout())?,
            base_url: sources.directory_base_url.trim_end_matches('/').to_string(),
            generate_delay: delays.generate,
            lookup_delay: delays.lookup,
        })
    }

    /// `<base>/search/si/1/<what>/<where>`, words joined by `+`.
    pub fn search_url(&self, what: &str, location: &str) -> String {
        format!(
            "{}/search/si/1/{}/{}",
            self.base_url,
            path_segment(what),
            path_segment(location)
        )
    }

    fn fetch(&self, client: &Client, url: &str) -> Result<String, LookupFailure> {
        let response = client
            .get(url)
            .header(USER_AGENT, source::random_user_agent())
            .send()
            .map_err(source::transport(url))?;
        source::read_body(url, response)
    }

    fn try_generate(&self, category: &str, location: &str) -> Result<Vec<RawCandidate>, LookupFailure> {
        let url = self.search_url(category, location);
        self.generate_delay.pause("directory discovery");
        let html = self.fetch(&self.generate_client, &url)?;
        Ok(parse_listings(&html))
    }

    fn try_lookup(&self, name: &str, address: &str) -> Result<ContactDetails, LookupFailure> {
        let scope = Extractor::locality(address).unwrap_or_else(|| PROVINCE_SCOPE.to_string());
        let url = self.search_url(name, &scope);
        self.lookup_delay.pause("directory lookup");
        let html = self.fetch(&self.lookup_client, &url)?;
        parse_first_listing(&html, &self.base_url).ok_or(LookupFailure::Parse {
            url,
            what: "a listing block",
        })
    }
}

impl SourceClient for DirectorySource {
    fn generate(&self, category: &str, location: &str) -> Vec<RawCandidate> {
        match self.try_generate(category, location) {
            Ok(found) => {
                info!("Directory: {} results for '{}' in '{}'", found.len(), category, location);
                found
            }
            Err(e) => {
                warn!("Directory discovery for '{}' in '{}' failed: {}", category, location, e);
                Vec::new()
            }
        }
    }

    fn lookup(&self, name: &str, address: &str) -> Option<ContactDetails> {
        match self.try_lookup(name, address) {
            Ok(details) => Some(details),
            Err(e @ LookupFailure::Parse { .. }) => {
                debug!("Directory has no listing for '{}': {}", name, e);
                None
            }
            Err(e) => {
                warn!("Directory lookup for '{}' failed: {}", name, e);
                None
            }
        }
    }
}

fn path_segment(text: &str) -> String {
    text.split_whitespace()
        .map(|word| urlencoding::encode(word).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}

/// Every listing that carries both a name and an address.
pub(crate) fn parse_listings(html: &str) -> Vec<RawCandidate> {
    let document = Html::parse_document(html);
    document
        .select(&LISTING)
        .filter_map(|listing| {
            let name = listing.select(&LISTING_NAME).next().map(|el| Extractor::stripped_text(&el))?;
            let address = listing
                .select(&LISTING_ADDRESS)
                .next()
                .map(|el| Extractor::stripped_text(&el))?;
            if name.is_empty() || address.is_empty() {
                return None;
            }
            Some(RawCandidate { name, address })
        })
        .collect()
}

/// Phone and website from the first listing block, if there is one.
pub(crate) fn parse_first_listing(html: &str, base_url: &str) -> Option<ContactDetails> {
    let document = Html::parse_document(html);
    let listing = document.select(&LISTING).next()?;

    let phone = listing
        .select(&LISTING_PHONE)
        .next()
        .map(|el| Extractor::stripped_text(&el));

    let website = listing
        .select(&LISTING_WEBSITE)
        .next()
        .and_then(|el| el.value().attr("href"))
        .filter(|href| !href.trim().is_empty())
        .map(|href| {
            let absolute = if href.starts_with("http") {
                href.to_string()
            } else {
                format!("{}{}", base_url, href)
            };
            Extractor::unwrap_redirect(&absolute)
        });

    Some(ContactDetails {
        phone: normalize_phone(phone.as_deref().unwrap_or_default()),
        website: Extractor::or_not_available(website),
    })
}
