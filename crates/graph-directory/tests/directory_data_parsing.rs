//! Integration tests for parsing Graph directory data.
//!
//! These tests validate that the graph-directory models can deserialize
//! representative Graph responses.

use chrono::{TimeZone, Utc};
use graph_directory::models::{Event, Person, User, ValueList};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Get the path to the test fixtures directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_fixture(name: &str) -> String {
    let fixture_path = fixtures_dir().join(name);
    fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture at {}: {}",
            fixture_path.display(),
            e
        )
    })
}

#[test]
fn test_deserialize_me() {
    let json_data = load_fixture("me.json");
    let user: User = serde_json::from_str(&json_data)
        .unwrap_or_else(|e| panic!("Failed to deserialize user: {}\nJSON: {}", e, json_data));

    assert_eq!(user.id, "48d31887-5fad-4d73-a9f5-3c356e68a038");
    assert_eq!(user.display_name_or_upn(), "Megan Bowen");
    assert_eq!(user.job_title.as_deref(), Some("Auditor"));
    assert_eq!(user.preferred_language.as_deref(), Some("en-US"));
    assert!(user.mobile_phone.is_none());
    assert_eq!(
        user.business_phones.as_deref(),
        Some(&["+1 412 555 0109".to_string()][..])
    );

    // OData annotations are kept rather than dropped
    assert!(user.extra.contains_key("@odata.context"));
}

/// Drop `null` object members, recursively.
fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (key, strip_nulls(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

#[test]
fn test_me_reserializes_without_nulls() {
    let json_data = load_fixture("me.json");
    let raw: Value = serde_json::from_str(&json_data).unwrap();
    let user: User = serde_json::from_value(raw.clone()).unwrap();

    let reserialized = serde_json::to_value(&user).unwrap();
    assert!(reserialized.get("mobilePhone").is_none());
    assert_eq!(reserialized, strip_nulls(raw));
}

#[test]
fn test_calendar_events_reserialize_unchanged() {
    let json_data = load_fixture("calendar_view.json");
    let raw: Value = serde_json::from_str(&json_data).unwrap();
    let list: ValueList<Event> = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(
        serde_json::to_value(list.value.unwrap()).unwrap(),
        strip_nulls(raw["value"].clone())
    );
}

#[test]
fn test_people_reserialize_without_nulls() {
    let json_data = load_fixture("people.json");
    let raw: Value = serde_json::from_str(&json_data).unwrap();
    let list: ValueList<Person> = serde_json::from_value(raw.clone()).unwrap();
    let people = list.value.unwrap();

    assert!(people[0].given_name.is_none());
    assert_eq!(
        serde_json::to_value(&people).unwrap(),
        strip_nulls(raw["value"].clone())
    );
}

#[test]
fn test_deserialize_people_preserves_relevance_order() {
    let json_data = load_fixture("people.json");
    let list: ValueList<Person> = serde_json::from_str(&json_data).unwrap();
    let people = list.value.expect("people fixture has a value array");

    assert_eq!(people.len(), 2, "Expected 2 people in test data");
    assert_eq!(people[0].display_name.as_deref(), Some("Marketing"));
    assert_eq!(people[1].display_name.as_deref(), Some("Isaiah Langer"));

    let isaiah = &people[1];
    assert_eq!(isaiah.department.as_deref(), Some("Sales & Marketing"));
    assert_eq!(
        isaiah.primary_email(),
        Some("IsaiahL@M365x214355.onmicrosoft.com")
    );
    assert!(isaiah.company_name.is_none());
    assert!(isaiah.extra.contains_key("personType"));
}

#[test]
fn test_deserialize_calendar_view() {
    let json_data = load_fixture("calendar_view.json");
    let list: ValueList<Event> = serde_json::from_str(&json_data).unwrap();
    let events = list.value.expect("calendar fixture has a value array");

    assert_eq!(events.len(), 2, "Expected 2 events in test data");

    let orientation = &events[0];
    assert_eq!(orientation.subject.as_deref(), Some("Orientation"));
    assert_eq!(orientation.show_as.as_deref(), Some("busy"));
    assert_eq!(orientation.is_all_day, Some(false));
    assert_eq!(
        orientation.start.as_ref().and_then(|start| start.to_utc()),
        Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
    );
    assert_eq!(
        orientation
            .location
            .as_ref()
            .and_then(|location| location.display_name.as_deref()),
        Some("Assembly Hall")
    );
    let attendees = orientation.attendees.as_deref().unwrap_or_default();
    assert_eq!(attendees.len(), 2);
    assert_eq!(attendees[1].attendee_type.as_deref(), Some("optional"));
    assert_eq!(
        orientation
            .organizer
            .as_ref()
            .and_then(|organizer| organizer.email_address.name.as_deref()),
        Some("Samantha Booth")
    );
}

#[test]
fn test_calendar_event_in_named_zone_is_not_converted() {
    let json_data = load_fixture("calendar_view.json");
    let list: ValueList<Event> = serde_json::from_str(&json_data).unwrap();
    let events = list.value.unwrap();

    let planning = &events[1];
    assert_eq!(planning.is_all_day, Some(true));
    assert_eq!(planning.attendees, Some(Vec::new()));
    let start = planning.start.as_ref().unwrap();
    assert_eq!(start.time_zone.as_deref(), Some("Pacific Standard Time"));
    assert!(start.to_utc().is_none());
}
