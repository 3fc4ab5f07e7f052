use super::*;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

fn candidate(id: &str) -> CandidateAddress {
    CandidateAddress {
        id: id.to_string(),
        postcode: "1234".into(),
        street: "Singel".into(),
        house_number: "10".into(),
        city: "Amsterdam".into(),
        lat: 52.37,
        lon: 4.89,
    }
}

struct StubLookup {
    result: Result<Vec<CandidateAddress>, LookupError>,
    calls: AtomicUsize,
}

impl StubLookup {
    fn returning(result: Result<Vec<CandidateAddress>, LookupError>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AddressLookup for StubLookup {
    async fn lookup(
        &self,
        _postcode: &str,
        _house_number: &str,
    ) -> Result<Vec<CandidateAddress>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

fn form_with(post_code: &str, house_number: &str) -> LookupForm {
    let mut form = LookupForm::new();
    form.lookup_fields.post_code = post_code.into();
    form.lookup_fields.house_number = house_number.into();
    form
}

#[tokio::test]
async fn empty_house_number_never_reaches_the_client() {
    let client = StubLookup::returning(Ok(vec![candidate("a1")]));
    let mut form = form_with("1234", "");

    assert_eq!(form.submit_lookup(&client).await, LookupOutcome::Invalid);
    assert_eq!(client.calls(), 0);
    assert_eq!(
        form.error(),
        Some("Postcode and house number fields are mandatory!")
    );
    assert_eq!(form.status(), LookupStatus::Idle);
}

#[tokio::test]
async fn three_digit_postcode_is_rejected_locally() {
    let client = StubLookup::returning(Ok(vec![candidate("a1")]));
    let mut form = form_with("123", "10");

    assert_eq!(form.submit_lookup(&client).await, LookupOutcome::Invalid);
    assert_eq!(client.calls(), 0);
    assert_eq!(form.error(), Some("Postcode must be at least 4 digits!"));
}

#[tokio::test]
async fn non_digit_house_number_is_rejected_locally() {
    let client = StubLookup::returning(Ok(vec![candidate("a1")]));
    let mut form = form_with("1234", "10b");

    assert_eq!(form.submit_lookup(&client).await, LookupOutcome::Invalid);
    assert_eq!(client.calls(), 0);
    assert_eq!(
        form.error(),
        Some("House number must be all digits and non negative!")
    );
}

#[tokio::test]
async fn success_stores_candidates_and_clears_selection() {
    let client = StubLookup::returning(Ok(vec![candidate("a1"), candidate("a2")]));
    let mut form = form_with("1234", "10");
    form.select_candidate("old");

    assert_eq!(form.submit_lookup(&client).await, LookupOutcome::Found(2));
    assert_eq!(form.addresses().len(), 2);
    assert_eq!(form.selected_address(), None);
    assert_eq!(form.error(), None);
    assert!(!form.is_loading());
}

#[tokio::test]
async fn failure_stores_message_and_leaves_no_candidates() {
    let client = StubLookup::returning(Err(LookupError::NotFound));
    let mut form = form_with("1234", "10");

    assert_eq!(form.submit_lookup(&client).await, LookupOutcome::Failed);
    assert!(form.addresses().is_empty());
    assert_eq!(form.error(), Some("No results found!"));
    assert_eq!(form.status(), LookupStatus::Idle);
}

#[tokio::test]
async fn new_submit_clears_previous_error_and_candidates() {
    let mut form = form_with("1234", "10");
    form.submit_lookup(&StubLookup::returning(Err(LookupError::Transport)))
        .await;
    assert!(form.error().is_some());

    let outcome = form
        .submit_lookup(&StubLookup::returning(Ok(vec![candidate("a1")])))
        .await;
    assert_eq!(outcome, LookupOutcome::Found(1));
    assert_eq!(form.error(), None);
}

#[test]
fn submit_while_loading_is_dropped() {
    let mut form = form_with("1234", "10");
    let ticket = form.begin_lookup().expect("first request");

    assert_eq!(form.begin_lookup(), Err(LookupOutcome::Busy));
    assert!(form.is_loading());

    let outcome = form.finish_lookup(&ticket, Ok(vec![candidate("a1")]));
    assert_eq!(outcome, LookupOutcome::Found(1));
}

#[test]
fn response_after_reset_is_ignored() {
    let mut form = form_with("1234", "10");
    let ticket = form.begin_lookup().expect("request");

    form.reset();
    let outcome = form.finish_lookup(&ticket, Ok(vec![candidate("a1")]));

    assert_eq!(outcome, LookupOutcome::Stale);
    assert!(form.addresses().is_empty());
    assert_eq!(form.lookup_fields, LookupFields::default());
}

#[test]
fn response_for_superseded_request_is_ignored() {
    let mut form = form_with("1234", "10");
    let first = form.begin_lookup().expect("first");
    form.reset();
    form.lookup_fields.post_code = "5678".into();
    form.lookup_fields.house_number = "2".into();
    let second = form.begin_lookup().expect("second");
    assert_ne!(first.token, second.token);

    assert_eq!(
        form.finish_lookup(&first, Ok(vec![candidate("stale")])),
        LookupOutcome::Stale
    );
    assert_eq!(
        form.finish_lookup(&second, Ok(vec![candidate("fresh")])),
        LookupOutcome::Found(1)
    );
    assert_eq!(form.addresses()[0].id, "fresh");
}

#[test]
fn ticket_carries_the_submitted_fields() {
    let mut form = form_with("1234", "10");
    let ticket = form.begin_lookup().expect("request");
    assert_eq!(ticket.postcode, "1234");
    assert_eq!(ticket.house_number, "10");
    assert_eq!(
        form.status(),
        LookupStatus::Loading {
            request: ticket.token
        }
    );
}

#[test]
fn select_candidate_does_not_check_existence() {
    let mut form = LookupForm::new();
    form.select_candidate("missing");
    assert_eq!(form.selected_address(), Some("missing"));
    assert!(form.selected_candidate().is_none());

    form.select_candidate("");
    assert_eq!(form.selected_address(), None);
}

#[test]
fn reset_clears_everything() {
    let mut form = form_with("1234", "10");
    form.person.first_name = "Jane".into();
    form.set_error("boom");
    form.select_candidate("a1");

    form.reset();

    assert_eq!(form.lookup_fields, LookupFields::default());
    assert_eq!(form.person, PersonFields::default());
    assert_eq!(form.error(), None);
    assert_eq!(form.selected_address(), None);
}
