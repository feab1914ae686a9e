use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use meeple_bgg::*;
use meeple_core::Suitability;
use tokio::sync::mpsc;

const BASE: &str = "http://bgg.test";

/// One scripted answer for a URL.
#[derive(Clone)]
enum Reply {
    Status(u16, String),
    Delayed(u64, u16, String),
    Fail,
}

/// [`HttpFetch`] that replays scripted answers per URL. The last answer for a
/// URL repeats once its queue is down to one entry.
#[derive(Default)]
struct ScriptedFetch {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedFetch {
    fn on(self, url: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Most requests that were waiting on a reply at the same time.
    fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl HttpFetch for ScriptedFetch {
    async fn get(&self, url: &str) -> Result<FetchResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = self.reply(url).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

impl ScriptedFetch {
    async fn reply(&self, url: &str) -> Result<FetchResponse, TransportError> {
        let reply = {
            let mut replies = self.replies.lock().unwrap();
            let queue = replies.get_mut(url);
            match queue {
                Some(q) if q.len() > 1 => q.pop_front(),
                Some(q) => q.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Status(status, body)) => Ok(FetchResponse::new(status, body)),
            Some(Reply::Delayed(ms, status, body)) => {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok(FetchResponse::new(status, body))
            }
            Some(Reply::Fail) => Err(TransportError::other("connection reset")),
            None => Err(TransportError::other(format!("no route to {url}"))),
        }
    }
}

fn thing_url(id: &str) -> String {
    format!("{BASE}/xmlapi2/thing?id={id}")
}

fn page_url(id: &str) -> String {
    format!("{BASE}/boardgame/{id}")
}

fn collection_url(owner: &str) -> String {
    format!("{BASE}/xmlapi2/collection?username={owner}&excludesubtype=boardgameexpansion&own=1")
}

fn thing_xml(id: &str, name: &str, best_at_three: u32) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<items termsofuse="https://boardgamegeek.com/xmlapi/termsofuse">
    <item type="boardgame" id="{id}">
        <name type="primary" sortindex="1" value="{name}" />
        <minplayers value="2" />
        <maxplayers value="4" />
        <poll name="suggested_numplayers" title="User Suggested Number of Players" totalvotes="100">
            <results numplayers="2">
                <result value="Best" numvotes="5" />
                <result value="Recommended" numvotes="20" />
                <result value="Not Recommended" numvotes="40" />
            </results>
            <results numplayers="3">
                <result value="Best" numvotes="{best_at_three}" />
                <result value="Recommended" numvotes="30" />
                <result value="Not Recommended" numvotes="10" />
            </results>
            <results numplayers="4+">
                <result value="Best" numvotes="1" />
                <result value="Recommended" numvotes="2" />
                <result value="Not Recommended" numvotes="50" />
            </results>
        </poll>
    </item>
</items>"#
    )
}

fn page_html(average: &str) -> String {
    format!(
        r#"<html><head><script>
GEEK.geekitemPreload = {{"item":{{"objectid":"1","stats":{{"average":"{average}","avgweight":"2.1","baverage":"6.9","usersrated":"250"}}}}}};
GEEK.geekitemSettings = {{}};
</script></head><body></body></html>"#
    )
}

/// Script a game that enriches cleanly.
fn with_game(fetch: ScriptedFetch, id: &str, name: &str, best_at_three: u32) -> ScriptedFetch {
    fetch
        .on(&thing_url(id), Reply::Status(200, thing_xml(id, name, best_at_three)))
        .on(&page_url(id), Reply::Status(200, page_html("7.4")))
}

fn pipeline(fetch: ScriptedFetch, max_retries: u32) -> CollectionEnrichmentPipeline<ScriptedFetch> {
    let urls = BggUrls::new(BASE).unwrap();
    let fetcher = RateLimitedFetcher::new(fetch, RetryPolicy::immediate(max_retries));
    CollectionEnrichmentPipeline::new(GameEnricher::new(fetcher, urls))
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn enrich_single_game() {
    let p = pipeline(with_game(ScriptedFetch::default(), "13", "Catan", 50), 0);
    let record = p.enricher().enrich("13", 3).await.unwrap();

    assert_eq!(record.id, "13");
    assert_eq!(record.name.as_deref(), Some("Catan"));
    assert_eq!(record.min_players, 2);
    assert_eq!(record.max_players, 4);
    assert_eq!(record.suitability, Suitability::Best);
    assert_eq!(record.breakdown.best, vec![3]);
    assert!(record.breakdown.recommended.is_empty());
    assert_eq!(record.stats.average, 7.4);
    assert_eq!(record.stats.users_rated, 250);
}

#[tokio::test]
async fn results_keep_input_order() {
    // The first game answers last.
    let fetch = ScriptedFetch::default()
        .on(&thing_url("1"), Reply::Delayed(60, 200, thing_xml("1", "Slow", 50)))
        .on(&page_url("1"), Reply::Status(200, page_html("6.0")));
    let fetch = with_game(fetch, "2", "Middle", 10);
    let fetch = with_game(fetch, "3", "Fast", 50);

    let records = pipeline(fetch, 0)
        .enrich_all(&ids(&["1", "2", "3"]), 3)
        .await
        .unwrap();

    let got: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(got, vec!["1", "2", "3"]);
    assert_eq!(records[1].suitability, Suitability::Recommended);
}

#[tokio::test]
async fn games_are_fetched_concurrently() {
    let ids_in = ["31", "32", "33", "34", "35"];
    let mut fetch = ScriptedFetch::default();
    for id in ids_in {
        fetch = fetch
            .on(&thing_url(id), Reply::Delayed(200, 200, thing_xml(id, "Game", 50)))
            .on(&page_url(id), Reply::Status(200, page_html("7.0")));
    }

    let p = pipeline(fetch, 0);
    let started = std::time::Instant::now();
    let records = p.enrich_all(&ids(&ids_in), 3).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(records.len(), ids_in.len());
    assert_eq!(p.enricher().fetcher().inner().peak_in_flight(), ids_in.len());
    // Five 200ms waits run back to back would take a full second.
    assert!(elapsed < Duration::from_millis(800), "took {elapsed:?}");
}

#[tokio::test]
async fn failed_games_are_dropped() {
    let fetch = ScriptedFetch::default()
        .on(&thing_url("1"), Reply::Fail)
        .on(&thing_url("3"), Reply::Status(200, "<items></items>".to_string()));
    let fetch = with_game(fetch, "2", "Survivor", 50);

    let (tx, _rx) = mpsc::unbounded_channel();
    let report = pipeline(fetch, 0)
        .enrich_all_with_events(&ids(&["1", "2", "3"]), 3, tx)
        .await
        .unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].id, "2");

    let failed: Vec<(usize, &str)> = report
        .failures
        .iter()
        .map(|f| (f.index, f.id.as_str()))
        .collect();
    assert_eq!(failed, vec![(0, "1"), (2, "3")]);
    assert!(matches!(report.failures[0].error, EnrichError::Transport { .. }));
    assert!(matches!(report.failures[1].error, EnrichError::Feed(_)));
}

#[tokio::test]
async fn every_game_failing_is_an_error() {
    let fetch = ScriptedFetch::default()
        .on(&thing_url("1"), Reply::Fail)
        .on(&thing_url("2"), Reply::Fail)
        .on(&thing_url("3"), Reply::Fail);

    let err = pipeline(fetch, 0)
        .enrich_all(&ids(&["1", "2", "3"]), 3)
        .await
        .unwrap_err();
    assert!(matches!(err, EnrichError::NothingEnriched { attempted: 3 }));
}

#[tokio::test]
async fn no_ids_is_not_an_error() {
    let fetch = ScriptedFetch::default();
    let records = pipeline(fetch, 0).enrich_all(&[], 3).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn processing_status_is_retried() {
    let fetch = ScriptedFetch::default()
        .on(&thing_url("7"), Reply::Status(202, String::new()))
        .on(&thing_url("7"), Reply::Status(202, String::new()))
        .on(&thing_url("7"), Reply::Status(200, thing_xml("7", "Patient", 50)))
        .on(&page_url("7"), Reply::Status(200, page_html("8.0")));

    let p = pipeline(fetch, 3);
    let record = p.enricher().enrich("7", 3).await.unwrap();

    assert_eq!(record.name.as_deref(), Some("Patient"));
    // Three thing requests plus one page request.
    assert_eq!(p.enricher().fetcher().inner().calls(), 4);
}

#[tokio::test]
async fn retries_run_out() {
    let fetch = ScriptedFetch::default().on(&thing_url("7"), Reply::Status(202, String::new()));

    let p = pipeline(fetch, 2);
    let err = p.enricher().enrich("7", 3).await.unwrap_err();

    match err {
        EnrichError::RateLimited { url, attempts } => {
            assert_eq!(url, thing_url("7"));
            assert_eq!(attempts, 3);
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
    assert_eq!(p.enricher().fetcher().inner().calls(), 3);
}

#[tokio::test]
async fn transport_errors_are_not_retried() {
    let fetch = ScriptedFetch::default().on(&thing_url("7"), Reply::Fail);

    let p = pipeline(fetch, 5);
    let err = p.enricher().enrich("7", 3).await.unwrap_err();

    assert!(matches!(err, EnrichError::Transport { .. }));
    assert_eq!(p.enricher().fetcher().inner().calls(), 1);
}

#[tokio::test]
async fn unexpected_status_is_reported() {
    let fetch = ScriptedFetch::default()
        .on(&thing_url("7"), Reply::Status(200, thing_xml("7", "Half", 50)))
        .on(&page_url("7"), Reply::Status(503, "busy".to_string()));

    let err = pipeline(fetch, 3).enricher().enrich("7", 3).await.unwrap_err();
    assert!(matches!(err, EnrichError::Status { status: 503, .. }));
}

#[tokio::test]
async fn page_without_preload_fails_the_game() {
    let fetch = ScriptedFetch::default()
        .on(&thing_url("7"), Reply::Status(200, thing_xml("7", "Bare", 50)))
        .on(&page_url("7"), Reply::Status(200, "<html></html>".to_string()));

    let err = pipeline(fetch, 0).enricher().enrich("7", 3).await.unwrap_err();
    assert!(matches!(err, EnrichError::Stats(_)));
}

#[tokio::test]
async fn suggest_for_owner_runs_the_collection() {
    let collection = r#"<?xml version="1.0" encoding="utf-8"?>
<items totalitems="2">
    <item objecttype="thing" objectid="21" subtype="boardgame" collid="1">
        <name sortindex="1">Azul</name>
    </item>
    <item objecttype="thing" objectid="22" subtype="boardgame" collid="2">
        <name sortindex="1">Brass</name>
    </item>
</items>"#;
    let fetch = ScriptedFetch::default()
        .on(&collection_url("alice"), Reply::Status(202, String::new()))
        .on(&collection_url("alice"), Reply::Status(200, collection.to_string()));
    let fetch = with_game(fetch, "21", "Azul", 50);
    let fetch = with_game(fetch, "22", "Brass", 10);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let report = pipeline(fetch, 1)
        .suggest_for_owner("alice", 3, tx)
        .await
        .unwrap();

    let names: Vec<&str> = report.records.iter().map(|r| r.display_name()).collect();
    assert_eq!(names, vec!["Azul", "Brass"]);
    assert!(report.failures.is_empty());

    let mut events = Vec::new();
    while let Ok(e) = rx.try_recv() {
        events.push(e);
    }
    assert_eq!(
        events.first(),
        Some(&EnrichEvent::CollectionLoaded {
            owner: "alice".to_string(),
            total: 2
        })
    );
    assert_eq!(
        events.last(),
        Some(&EnrichEvent::Done {
            enriched: 2,
            failed: 0
        })
    );
}

#[tokio::test]
async fn empty_collection_is_an_error() {
    let fetch = ScriptedFetch::default().on(
        &collection_url("alice"),
        Reply::Status(200, r#"<items totalitems="0"></items>"#.to_string()),
    );

    let (tx, _rx) = mpsc::unbounded_channel();
    let err = pipeline(fetch, 0)
        .suggest_for_owner("alice", 3, tx)
        .await
        .unwrap_err();
    assert!(matches!(err, EnrichError::EmptyCollection { ref owner } if owner == "alice"));
}

#[tokio::test]
async fn unknown_owner_surfaces_provider_message() {
    let fetch = ScriptedFetch::default().on(
        &collection_url("nobody"),
        Reply::Status(
            200,
            r#"<errors><error><message>Invalid username specified</message></error></errors>"#
                .to_string(),
        ),
    );

    let (tx, _rx) = mpsc::unbounded_channel();
    let err = pipeline(fetch, 0)
        .suggest_for_owner("nobody", 3, tx)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Invalid username specified"));
}
