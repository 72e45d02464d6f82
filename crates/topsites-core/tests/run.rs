//! End-to-end runs against an in-memory transport.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::rc::Rc;

use topsites_auth::{Credentials, TimeContext};
use topsites_core::{
    JsonSnapshotSink, PaginationController, RankingRequest, RankingSink, TopSitesConfig,
    TopSitesError, TopSitesResult, Transport,
};

/// Replays canned responses and records every request it receives.
#[derive(Default)]
struct FakeTransport {
    responses: RefCell<VecDeque<TopSitesResult<String>>>,
    requests: RefCell<Vec<http::Request<()>>>,
}

impl FakeTransport {
    fn with_responses(responses: impl IntoIterator<Item = TopSitesResult<String>>) -> Self {
        Self {
            responses: RefCell::new(responses.into_iter().collect()),
            requests: RefCell::default(),
        }
    }

    fn queries(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| r.uri().query().unwrap_or_default().to_owned())
            .collect()
    }
}

impl Transport for FakeTransport {
    fn execute(&self, request: http::Request<()>) -> TopSitesResult<String> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(sites_xml(0, 0)))
    }
}

/// Keeps a copy of every published ranking.
#[derive(Clone, Default)]
struct RecordingSink(Rc<RefCell<Vec<BTreeMap<u32, String>>>>);

impl RankingSink for RecordingSink {
    fn publish(&mut self, ranking: &BTreeMap<u32, String>) -> TopSitesResult<()> {
        self.0.borrow_mut().push(ranking.clone());
        Ok(())
    }
}

/// A response holding ranks `start..start + count`, each mapped to `site<rank>.com`.
fn sites_xml(start: u32, count: u32) -> String {
    let sites: String = (start..start + count)
        .map(|rank| {
            format!(
                "<aws:Site><aws:DataUrl>site{rank}.com</aws:DataUrl>\
                 <aws:Country><aws:Rank>{rank}</aws:Rank></aws:Country></aws:Site>"
            )
        })
        .collect();
    format!(
        "<aws:TopSitesResponse xmlns:aws=\"http://ats.amazonaws.com/doc/2005-07-11\">\
         <aws:Response><aws:TopSitesResult><aws:Alexa><aws:TopSites><aws:List>\
         <aws:Sites>{sites}</aws:Sites>\
         </aws:List></aws:TopSites></aws:Alexa></aws:TopSitesResult></aws:Response>\
         </aws:TopSitesResponse>"
    )
}

fn credentials() -> Credentials {
    Credentials::new("AKIDEXAMPLE", "secret").unwrap()
}

fn time() -> TimeContext {
    TimeContext::from_timestamp("20240102T030405Z").unwrap()
}

#[test]
fn test_should_fetch_and_merge_every_window_in_order() {
    let transport = FakeTransport::with_responses([
        Ok(sites_xml(1, 1000)),
        Ok(sites_xml(1001, 1000)),
        Ok(sites_xml(2001, 500)),
    ]);
    let recorded = RecordingSink::default();
    let mut controller = PaginationController::new(&transport, TopSitesConfig::default())
        .with_sink(recorded.clone());

    let summary = controller
        .run(&credentials(), &time(), &RankingRequest::new("US", 2500))
        .unwrap();

    assert_eq!(summary.windows, 3);
    assert_eq!(summary.entries, 2500);
    assert_eq!(summary.ranks, 2500);
    assert_eq!(
        transport.queries(),
        vec![
            "Action=TopSites&Count=1000&CountryCode=US&ResponseGroup=Country&Start=1",
            "Action=TopSites&Count=1000&CountryCode=US&ResponseGroup=Country&Start=1001",
            "Action=TopSites&Count=500&CountryCode=US&ResponseGroup=Country&Start=2001",
        ]
    );

    let snapshot = controller.aggregator().snapshot();
    assert_eq!(snapshot.get(&1).map(String::as_str), Some("site1.com"));
    assert_eq!(snapshot.get(&2500).map(String::as_str), Some("site2500.com"));

    let published: Vec<usize> = recorded.0.borrow().iter().map(BTreeMap::len).collect();
    assert_eq!(published, vec![1000, 2000, 2500]);
}

#[test]
fn test_should_sign_every_window_with_one_time_context() {
    let transport = FakeTransport::with_responses([Ok(sites_xml(1, 3)), Ok(sites_xml(4, 3))]);
    let mut controller = PaginationController::new(&transport, TopSitesConfig::default());

    controller
        .run(&credentials(), &time(), &RankingRequest::new("US", 1000))
        .unwrap();

    let requests = transport.requests.borrow();
    assert_eq!(requests.len(), 2);
    for request in requests.iter() {
        assert_eq!(request.headers()["x-amz-date"], "20240102T030405Z");
        let auth = request.headers()[http::header::AUTHORIZATION].to_str().unwrap();
        assert!(auth.contains("Credential=AKIDEXAMPLE/20240102/us-west-1/AlexaTopSites/aws4_request"));
    }
    assert_ne!(
        requests[0].headers()[http::header::AUTHORIZATION],
        requests[1].headers()[http::header::AUTHORIZATION]
    );
}

#[test]
fn test_should_issue_zero_count_window_for_exact_multiple() {
    let transport = FakeTransport::with_responses([Ok(sites_xml(1, 1000)), Ok(sites_xml(0, 0))]);
    let mut controller = PaginationController::new(&transport, TopSitesConfig::default());

    let summary = controller
        .run(&credentials(), &time(), &RankingRequest::new("US", 1000))
        .unwrap();

    assert_eq!(summary.windows, 2);
    assert_eq!(summary.ranks, 1000);
    assert_eq!(
        transport.queries()[1],
        "Action=TopSites&Count=0&CountryCode=US&ResponseGroup=Country&Start=1001"
    );
}

#[test]
fn test_should_honour_custom_start_offset() {
    let transport = FakeTransport::with_responses([Ok(sites_xml(501, 20))]);
    let mut controller = PaginationController::new(&transport, TopSitesConfig::default());

    controller
        .run(
            &credentials(),
            &time(),
            &RankingRequest::new("DE", 20).with_start(501),
        )
        .unwrap();

    assert_eq!(
        transport.queries(),
        vec!["Action=TopSites&Count=20&CountryCode=DE&ResponseGroup=Country&Start=501"]
    );
}

#[test]
fn test_should_reject_zero_count_before_any_request() {
    let transport = FakeTransport::default();
    let mut controller = PaginationController::new(&transport, TopSitesConfig::default());

    let result = controller.run(&credentials(), &time(), &RankingRequest::new("US", 0));

    assert!(matches!(result, Err(TopSitesError::InvalidCount)));
    assert!(transport.requests.borrow().is_empty());
}

#[test]
fn test_should_keep_last_snapshot_when_later_window_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("top_alexa.json");
    let transport = FakeTransport::with_responses([
        Ok(sites_xml(1, 1000)),
        Err(TopSitesError::Status {
            status: 503,
            body: "unavailable".to_owned(),
        }),
    ]);
    let mut controller = PaginationController::new(&transport, TopSitesConfig::default())
        .with_sink(JsonSnapshotSink::new(&path));

    let result = controller.run(&credentials(), &time(), &RankingRequest::new("US", 1500));

    assert!(matches!(result, Err(TopSitesError::Status { status: 503, .. })));
    assert_eq!(transport.requests.borrow().len(), 2);

    let snapshot: BTreeMap<String, String> =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(snapshot.len(), 1000);
    assert_eq!(snapshot.get("1").map(String::as_str), Some("site1.com"));
    assert!(!snapshot.contains_key("1001"));
}

#[test]
fn test_should_abort_on_structural_parse_failure() {
    let broken = "<Sites><Site><Country><Rank>1</Rank></Country></Site></Sites>".to_owned();
    let transport = FakeTransport::with_responses([Ok(broken), Ok(sites_xml(1001, 10))]);
    let mut controller = PaginationController::new(&transport, TopSitesConfig::default());

    let result = controller.run(&credentials(), &time(), &RankingRequest::new("US", 1010));

    assert!(matches!(result, Err(TopSitesError::Xml(_))));
    assert_eq!(transport.requests.borrow().len(), 1);
    assert!(controller.aggregator().snapshot().is_empty());
}
