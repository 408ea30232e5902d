use super::*;
use crate::config::default_sources;
use crate::fetch::MockFetcher;
use crate::hints::Sport;
use crate::sources::{SourceFilter, TemplateSource};
use crate::validate::test_images::{jpeg, png};
use std::time::Duration;

const LIMITS: Thresholds = Thresholds {
    min_width: 10,
    min_height: 10,
};

const ESPN_1: &str = "https://a.espncdn.com/combiner/i?img=/i/headshots/nfl/players/full/mcmahonj.png";
const ESPN_2: &str = "https://a.espncdn.com/combiner/i?img=/i/headshots/nfl/players/full/jmcmahon.png";
const PFR_1: &str = "https://www.pro-football-reference.com/req/202106291/images/headshots/McmaJi00.jpg";

fn template(name: &str, templates: &[&str]) -> Box<dyn CandidateSource> {
    Box::new(TemplateSource::new(
        name,
        SourceFilter::default(),
        templates.iter().map(|t| t.to_string()).collect(),
    ))
}

/// Three sources with two candidates each.
fn three_sources() -> Vec<Box<dyn CandidateSource>> {
    vec![
        template("a", &["https://a.test/{last}{f}.png", "https://a.test/{f}{last}.png"]),
        template("b", &["https://b.test/{first}_{last}.jpg", "https://b.test/{last}_{first}.jpg"]),
        template("c", &["https://c.test/{last}.png", "https://c.test/{first}.png"]),
    ]
}

fn resolver(mock: MockFetcher) -> (PhotoResolver, Arc<MockFetcher>) {
    let mock = Arc::new(mock);
    let r = PhotoResolver::with_sources(LIMITS, three_sources(), mock.clone());
    (r, mock)
}

#[test]
fn single_token_name_issues_no_requests() {
    let (r, mock) = resolver(MockFetcher::new());
    assert_eq!(r.resolve("Pelé", &Hints::default()), Resolution::NotFound);
    assert_eq!(r.resolve("   ", &Hints::default()), Resolution::NotFound);
    assert_eq!(mock.request_count(), 0);
}

#[test]
fn first_valid_candidate_wins() {
    let (r, mock) = resolver(
        MockFetcher::new().with_bytes("https://a.test/mcmahonj.png", "image/png", png(120, 160)),
    );
    assert_eq!(
        r.resolve("Jim McMahon", &Hints::default()),
        Resolution::Found("https://a.test/mcmahonj.png".to_string())
    );
    assert_eq!(mock.request_count(), 1);
}

#[test]
fn soft_404_page_falls_through_to_next_source() {
    let soft_404 = "<!DOCTYPE html><html><body>Player not found</body></html>";
    let (r, mock) = resolver(
        MockFetcher::new()
            .with_bytes("https://a.test/mcmahonj.png", "image/png", soft_404.as_bytes().to_vec())
            .with_html("https://a.test/jmcmahon.png", soft_404)
            .with_bytes("https://b.test/jim_mcmahon.jpg", "image/jpeg", jpeg(64, 64)),
    );
    let got = r.resolve("Jim McMahon", &Hints::default());
    assert_eq!(got.url(), Some("https://b.test/jim_mcmahon.jpg"));
    assert_eq!(
        mock.requests(),
        vec![
            "https://a.test/mcmahonj.png",
            "https://a.test/jmcmahon.png",
            "https://b.test/jim_mcmahon.jpg",
        ]
    );
}

#[test]
fn earlier_source_has_priority() {
    let (r, _) = resolver(
        MockFetcher::new()
            .with_bytes("https://c.test/mcmahon.png", "image/png", png(50, 50))
            .with_bytes("https://b.test/mcmahon_jim.jpg", "image/jpeg", jpeg(50, 50)),
    );
    assert_eq!(
        r.resolve("Jim McMahon", &Hints::default()).url(),
        Some("https://b.test/mcmahon_jim.jpg")
    );
}

#[test]
fn repeated_resolution_is_identical() {
    let (r, mock) = resolver(
        MockFetcher::new().with_bytes("https://b.test/mcmahon_jim.jpg", "image/jpeg", jpeg(50, 50)),
    );
    let first = r.resolve("Jim McMahon", &Hints::default());
    let first_requests = mock.requests();
    let second = r.resolve("Jim McMahon", &Hints::default());
    assert_eq!(first, second);
    let all = mock.requests();
    assert_eq!(&all[first_requests.len()..], first_requests.as_slice());
}

#[test]
fn exhausting_every_source_probes_each_candidate_once() {
    let (r, mock) = resolver(MockFetcher::new());
    assert_eq!(r.resolve("Jim McMahon", &Hints::default()), Resolution::NotFound);
    assert_eq!(mock.request_count(), 6);
}

#[test]
fn undersized_and_corrupt_images_are_rejected() {
    let mut truncated = png(64, 64);
    truncated.truncate(30);
    let (r, mock) = resolver(
        MockFetcher::new()
            .with_bytes("https://a.test/mcmahonj.png", "image/png", png(1, 1))
            .with_bytes("https://a.test/jmcmahon.png", "image/png", truncated)
            .with_bytes("https://b.test/jim_mcmahon.jpg", "image/jpeg", Vec::new()),
    );
    assert_eq!(r.resolve("Jim McMahon", &Hints::default()), Resolution::NotFound);
    assert_eq!(mock.request_count(), 6);
}

#[test]
fn network_failures_are_not_fatal() {
    let (r, _) = resolver(
        MockFetcher::new()
            .with_timeout("https://a.test/mcmahonj.png")
            .with_timeout("https://a.test/jmcmahon.png")
            .with_bytes("https://b.test/jim_mcmahon.jpg", "image/jpeg", jpeg(32, 32)),
    );
    assert!(r.resolve("Jim McMahon", &Hints::default()).is_found());
}

#[test]
fn duplicate_candidates_are_probed_once() {
    let sources = vec![
        template("a", &["https://shared.test/{last}.png"]),
        template("b", &["https://shared.test/{last}.png", "https://b.test/{first}.png"]),
    ];
    let mock = Arc::new(MockFetcher::new());
    let r = PhotoResolver::with_sources(LIMITS, sources, mock.clone());
    assert_eq!(r.resolve("Jim McMahon", &Hints::default()), Resolution::NotFound);
    assert_eq!(
        mock.requests(),
        vec!["https://shared.test/mcmahon.png", "https://b.test/jim.png"]
    );
}

#[test]
fn expired_deadline_stops_before_probing() {
    let (r, mock) = resolver(
        MockFetcher::new().with_bytes("https://a.test/mcmahonj.png", "image/png", png(20, 20)),
    );
    let deadline = Instant::now() - Duration::from_millis(1);
    assert_eq!(
        r.resolve_before("Jim McMahon", &Hints::default(), deadline),
        Resolution::NotFound
    );
    assert_eq!(mock.request_count(), 0);

    let deadline = Instant::now() + Duration::from_secs(60);
    assert!(r.resolve_before("Jim McMahon", &Hints::default(), deadline).is_found());
}

#[test]
fn check_url_validates_existing_photo() {
    let (r, _) = resolver(
        MockFetcher::new()
            .with_bytes("https://cdn.test/ok.png", "image/png", png(40, 40))
            .with_html("https://cdn.test/gone.png", "<html>moved</html>"),
    );
    assert!(r.check_url("https://cdn.test/ok.png"));
    assert!(!r.check_url("https://cdn.test/gone.png"));
    assert!(!r.check_url("https://cdn.test/missing.png"));
}

fn default_resolver(mock: MockFetcher) -> (PhotoResolver, Arc<MockFetcher>) {
    let mock = Arc::new(mock);
    let r = PhotoResolver::new(&ResolverConfig::default(), mock.clone()).unwrap();
    (r, mock)
}

#[test]
fn football_fallback_to_reference_site() {
    let (r, mock) = default_resolver(
        MockFetcher::new()
            .with_status(ESPN_1, 404)
            .with_bytes(PFR_1, "image/jpeg", jpeg(300, 300)),
    );
    let got = r.resolve("Jim McMahon", &Hints::for_sport(Sport::Football));
    assert_eq!(got, Resolution::Found(PFR_1.to_string()));
    assert_eq!(mock.requests(), vec![ESPN_1, ESPN_2, PFR_1]);
}

#[test]
fn name_only_lookup_tries_cdn_first() {
    let (r, mock) = default_resolver(
        MockFetcher::new()
            .with_status(ESPN_1, 404)
            .with_bytes(PFR_1, "image/jpeg", jpeg(300, 300)),
    );
    let got = r.resolve("Jim McMahon", &Hints::default());
    assert_eq!(got, Resolution::Found(PFR_1.to_string()));
    assert_eq!(mock.requests(), vec![ESPN_1, ESPN_2, PFR_1]);
}

#[test]
fn sport_hint_skips_other_sport_sources() {
    let (r, mock) = default_resolver(MockFetcher::new());
    assert_eq!(
        r.resolve("Chris Paul", &Hints::for_sport(Sport::Basketball)),
        Resolution::NotFound
    );
    let requests = mock.requests();
    assert!(requests.iter().any(|u| u.contains("/nba/players/full/")));
    assert!(requests.iter().any(|u| u.contains("basketball-reference.com/search/")));
    assert!(!requests.iter().any(|u| u.contains("pro-football-reference")));
    assert!(!requests.iter().any(|u| u.contains("sports-reference.com/cfb")));
}

#[test]
fn source_names_follow_config_order() {
    let (r, _) = default_resolver(MockFetcher::new());
    let expected: Vec<String> = default_sources().into_iter().map(|s| s.name).collect();
    assert_eq!(r.source_names(), expected);
}
