use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use url::Url;

use crate::lead::NOT_AVAILABLE;

// North American number, optional +1 prefix, area and exchange codes 2-9.
static NANP_PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[-. ]?)?\(?([2-9][0-9]{2})\)?[-. ]?([2-9][0-9]{2})[-. ]?([0-9]{4})").unwrap()
});

// Region token from an address: the segment right before ", ON" / ", Ontario".
static REGION_SCOPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([^,]+),\s*(?:ontario|on)\b").unwrap());

pub struct Extractor;

impl Extractor {
    /// First phone-shaped substring in free text, formatted `(XXX) XXX-XXXX`.
    pub fn first_phone(text: &str) -> Option<String> {
        NANP_PHONE
            .captures(text)
            .map(|caps| format!("({}) {}-{}", &caps[1], &caps[2], &caps[3]))
    }

    /// The locality preceding the province marker, e.g. `Sudbury` in
    /// `12 Elm St, Sudbury, ON P3A 1B2`.
    pub fn locality(address: &str) -> Option<String> {
        REGION_SCOPE
            .captures(address)
            .map(|caps| caps[1].trim().to_string())
            .filter(|loc| !loc.is_empty())
    }

    /// Unwraps a tracking link of the form `...?redirect=<target>`.
    /// Links without the parameter come back unchanged.
    pub fn unwrap_redirect(link: &str) -> String {
        if !link.contains("redirect=") {
            return link.to_string();
        }
        Url::parse(link)
            .ok()
            .and_then(|url| {
                url.query_pairs()
                    .find(|(key, _)| key == "redirect")
                    .map(|(_, value)| value.into_owned())
            })
            .filter(|target| !target.is_empty())
            .unwrap_or_else(|| link.to_string())
    }

    /// True when a search result link points off the search engine and
    /// away from the known listing aggregators.
    pub fn is_candidate_website(href: &str, engine_host: &str, denied: &[String]) -> bool {
        if href.is_empty() || href.contains(engine_host) {
            return false;
        }
        if denied.iter().any(|fragment| href.contains(fragment.as_str())) {
            return false;
        }
        match Url::parse(href) {
            Ok(url) => url
                .host_str()
                .map(|host| !host.ends_with(engine_host))
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Element text with each text node trimmed and concatenated without a
    /// separator, the way listing markup splits its address spans.
    pub fn stripped_text(element: &ElementRef) -> String {
        element.text().map(str::trim).collect::<String>()
    }

    pub fn or_not_available(value: Option<String>) -> String {
        value
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}
