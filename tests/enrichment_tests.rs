//! Enrichment scheduling: fallback order, short-circuit, fault isolation,
//! and the worker cap.

mod common;

use std::time::Duration;

use common::{details, ScriptedLookup};
use northscrape_lib::{EnrichmentScheduler, Lead, LeadSource};

fn leads(names: &[&str]) -> Vec<Lead> {
    names
        .iter()
        .map(|name| Lead::discovered(*name, "12 Elm St, Sudbury, ON P3A 1B2"))
        .collect()
}

fn sorted_names(leads: &[Lead]) -> Vec<String> {
    let mut names: Vec<String> = leads.iter().map(|l| l.name.clone()).collect();
    names.sort();
    names
}

#[test]
fn existing_phone_is_kept_without_lookups() {
    let primary = ScriptedLookup::default();
    let fallback = ScriptedLookup::default();
    let scheduler = EnrichmentScheduler::new(&primary, &fallback, 4);

    let mut lead = Lead::discovered("Kept Co", "7 birch ave, timmins district");
    lead.phone = "(705) 555-0142".to_string();
    lead.website = "https://kept.example".to_string();

    let out = scheduler.enrich(vec![lead]);

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].phone, "(705) 555-0142");
    assert_eq!(out[0].website, "https://kept.example");
    assert_eq!(out[0].address, "7 Birch Ave, Timmins");
    assert_eq!(out[0].source, LeadSource::Kept);
    assert_eq!(primary.calls(), 0);
    assert_eq!(fallback.calls(), 0);
}

#[test]
fn kept_phone_is_reformatted_without_lookups() {
    let primary = ScriptedLookup::default();
    let fallback = ScriptedLookup::default();
    let scheduler = EnrichmentScheduler::new(&primary, &fallback, 2);

    let mut dotted = Lead::discovered("Dotted Co", "7 Birch Ave, Timmins");
    dotted.phone = "705.555.0142".to_string();
    let mut garbled = Lead::discovered("Garbled Co", "8 Birch Ave, Timmins");
    garbled.phone = "ext. 0142".to_string();

    let out = scheduler.enrich(vec![dotted, garbled]);
    let by_name = |name: &str| out.iter().find(|l| l.name == name).unwrap().clone();

    assert_eq!(by_name("Dotted Co").phone, "(705) 555-0142");
    assert_eq!(by_name("Dotted Co").source, LeadSource::Kept);
    assert_eq!(by_name("Garbled Co").phone, "N/A");
    assert_eq!(by_name("Garbled Co").source, LeadSource::Kept);
    assert_eq!(primary.calls(), 0);
    assert_eq!(fallback.calls(), 0);
}

#[test]
fn directory_phone_wins() {
    let primary = ScriptedLookup::default()
        .by_default(Some(details("(705) 555-0100", "https://dir.example")));
    let fallback = ScriptedLookup::default()
        .by_default(Some(details("(705) 555-0999", "https://search.example")));
    let scheduler = EnrichmentScheduler::new(&primary, &fallback, 2);

    let out = scheduler.enrich(leads(&["A", "B"]));

    assert_eq!(out.len(), 2);
    for lead in &out {
        assert_eq!(lead.source, LeadSource::Primary);
        assert_eq!(lead.phone, "(705) 555-0100");
        assert_eq!(lead.website, "https://dir.example");
    }
    assert_eq!(fallback.calls(), 0);
}

#[test]
fn missing_directory_phone_always_ends_in_fallback() {
    let primary = ScriptedLookup::default()
        .answering("No Phone", Some(details("N/A", "https://dir.example")))
        .answering("Not Listed", None)
        .answering("Listed", Some(details("(705) 555-0100", "N/A")));
    let fallback = ScriptedLookup::default()
        .answering("No Phone", Some(details("(705) 555-0777", "https://found.example")))
        .answering("Not Listed", Some(details("N/A", "N/A")));
    let scheduler = EnrichmentScheduler::new(&primary, &fallback, 3);

    let out = scheduler.enrich(leads(&["No Phone", "Not Listed", "Listed"]));
    let by_name = |name: &str| out.iter().find(|l| l.name == name).unwrap().clone();

    let no_phone = by_name("No Phone");
    assert_eq!(no_phone.source, LeadSource::Fallback);
    assert_eq!(no_phone.phone, "(705) 555-0777");
    assert_eq!(no_phone.website, "https://found.example");

    let not_listed = by_name("Not Listed");
    assert_eq!(not_listed.source, LeadSource::Fallback);
    assert_eq!(not_listed.phone, "N/A");

    assert_eq!(by_name("Listed").source, LeadSource::Primary);
    assert_eq!(fallback.calls(), 2);
}

#[test]
fn failing_lead_is_dropped_and_siblings_survive() {
    let names = ["A", "B", "Broken Co", "C", "D", "E", "F", "G"];
    let primary = ScriptedLookup::default()
        .by_default(Some(details("(705) 555-0100", "N/A")))
        .panicking_for("Broken Co");
    let fallback = ScriptedLookup::default();
    let scheduler = EnrichmentScheduler::new(&primary, &fallback, 3);

    let out = scheduler.enrich(leads(&names));

    assert_eq!(out.len(), names.len() - 1);
    assert!(out.iter().all(|l| l.name != "Broken Co"));
    assert_eq!(sorted_names(&out), vec!["A", "B", "C", "D", "E", "F", "G"]);
}

#[test]
fn failure_in_fallback_is_also_isolated() {
    let primary = ScriptedLookup::default();
    let fallback = ScriptedLookup::default()
        .by_default(Some(details("N/A", "N/A")))
        .panicking_for("B");
    let scheduler = EnrichmentScheduler::new(&primary, &fallback, 2);

    let out = scheduler.enrich(leads(&["A", "B", "C"]));
    assert_eq!(sorted_names(&out), vec!["A", "C"]);
}

#[test]
fn lookups_never_exceed_worker_budget() {
    let names: Vec<String> = (0..24).map(|i| format!("Shop {i}")).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let primary = ScriptedLookup::default()
        .by_default(Some(details("(705) 555-0100", "N/A")))
        .slowed(Duration::from_millis(20));
    let fallback = ScriptedLookup::default();
    let scheduler = EnrichmentScheduler::new(&primary, &fallback, 4);

    let out = scheduler.enrich(leads(&name_refs));

    assert_eq!(out.len(), 24);
    assert_eq!(primary.calls(), 24);
    assert!(primary.max_in_flight() <= 4, "saw {} in flight", primary.max_in_flight());
    assert!(primary.max_in_flight() > 1, "lookups never overlapped");
}

#[test]
fn output_is_the_same_set_regardless_of_completion_order() {
    let primary = ScriptedLookup::default()
        .by_default(Some(details("(705) 555-0100", "N/A")))
        .slowed(Duration::from_millis(5));
    let fallback = ScriptedLookup::default();
    let scheduler = EnrichmentScheduler::new(&primary, &fallback, 8);

    let input = ["Zed", "Alpha", "Mid", "Beta"];
    let out = scheduler.enrich(leads(&input));
    assert_eq!(sorted_names(&out), vec!["Alpha", "Beta", "Mid", "Zed"]);
}

#[test]
fn empty_batch_is_empty() {
    let primary = ScriptedLookup::default();
    let fallback = ScriptedLookup::default();
    let scheduler = EnrichmentScheduler::new(&primary, &fallback, 20);
    assert!(scheduler.enrich(Vec::new()).is_empty());
}
