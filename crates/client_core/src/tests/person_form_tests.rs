use super::*;

fn candidate(id: &str) -> CandidateAddress {
    CandidateAddress {
        id: id.to_string(),
        postcode: "1234".into(),
        street: "Rokin".into(),
        house_number: "10".into(),
        city: "Amsterdam".into(),
        lat: 52.37,
        lon: 4.89,
    }
}

fn person(first_name: &str, last_name: &str) -> PersonFields {
    PersonFields {
        first_name: first_name.into(),
        last_name: last_name.into(),
    }
}

#[test]
fn builds_entry_from_selected_candidate() {
    let candidates = [candidate("a1"), candidate("a2")];
    let now = Utc::now();
    let entry = commit(&person("Jane", "Doe"), Some("a2"), &candidates, now).expect("commit");

    assert_eq!(entry.address, candidates[1]);
    assert_eq!(entry.first_name, "Jane");
    assert_eq!(entry.last_name, "Doe");
    assert_eq!(entry.added_at, now);
}

#[test]
fn missing_name_is_reported() {
    let candidates = [candidate("a1")];
    for (first, last) in [("", "Doe"), ("Jane", ""), ("", "")] {
        assert_eq!(
            commit(&person(first, last), Some("a1"), &candidates, Utc::now()),
            Err(SelectionError::MissingPersonInfo)
        );
    }
}

#[test]
fn no_selection_or_no_candidates_is_reported() {
    assert_eq!(
        commit(&person("Jane", "Doe"), None, &[candidate("a1")], Utc::now()),
        Err(SelectionError::NoSelection)
    );
    assert_eq!(
        commit(&person("Jane", "Doe"), Some(""), &[candidate("a1")], Utc::now()),
        Err(SelectionError::NoSelection)
    );
    assert_eq!(
        commit(&person("Jane", "Doe"), Some("a1"), &[], Utc::now()),
        Err(SelectionError::NoSelection)
    );
}

#[test]
fn unknown_selection_wins_over_name_errors() {
    let candidates = [candidate("a1")];
    for (first, last) in [("Jane", "Doe"), ("", ""), ("Jane", "")] {
        assert_eq!(
            commit(&person(first, last), Some("zz"), &candidates, Utc::now()),
            Err(SelectionError::SelectionNotFound)
        );
    }
}

#[test]
fn error_messages_match_the_form_copy() {
    assert_eq!(
        SelectionError::MissingPersonInfo.to_string(),
        "First name and last name fields mandatory!"
    );
    assert_eq!(
        SelectionError::SelectionNotFound.to_string(),
        "Selected address not found"
    );
}
