//! Graph resource models returned by the directory client.
//!
//! These are pass-through representations: fields the models do not name are
//! kept in each record's `extra` map. Modelled fields that are absent or
//! explicitly `null` both read as `None` and are omitted when a record is
//! serialized again, so a re-serialized record matches the remote body with
//! its `null` members dropped.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Collection envelope used by Graph list endpoints.
///
/// A missing `value` field deserializes to `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValueList<T> {
    /// Items of the collection, in the order the service returned them.
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub value: Option<Vec<T>>,
}

/// User record from `/me` or `/users/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Directory object id.
    pub id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Given (first) name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    /// Surname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    /// Primary SMTP address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    /// User principal name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_principal_name: Option<String>,
    /// Job title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    /// Office location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office_location: Option<String>,
    /// Mobile phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    /// Business phone numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_phones: Option<Vec<String>>,
    /// Preferred language tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    /// Fields not modelled above, including OData annotations.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Best available human-readable name.
    #[must_use]
    pub fn display_name_or_upn(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.user_principal_name.as_deref())
            .unwrap_or(&self.id)
    }

    /// Best available email address.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.mail
            .as_deref()
            .or(self.user_principal_name.as_deref())
    }
}

/// Email address with relevance score, as attached to a [`Person`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredEmailAddress {
    /// Email address.
    pub address: String,
    /// Relevance of this address to the signed-in user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// People search result from `/me/people`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Person id.
    pub id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    /// Surname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    /// Job title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    /// Department.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// User principal name, when the person is a directory user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_principal_name: Option<String>,
    /// Email addresses ordered by relevance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scored_email_addresses: Option<Vec<ScoredEmailAddress>>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Person {
    /// The most relevant email address, if any.
    #[must_use]
    pub fn primary_email(&self) -> Option<&str> {
        self.scored_email_addresses
            .as_deref()?
            .first()
            .map(|scored| scored.address.as_str())
    }
}

/// Graph `dateTimeTimeZone` value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeTimeZone {
    /// Local date-time without offset, e.g. `2024-01-01T09:00:00.0000000`.
    pub date_time: String,
    /// Time zone name, e.g. `UTC` or `Pacific Standard Time`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl DateTimeTimeZone {
    /// Interpret the value as a UTC instant.
    ///
    /// Only values in the `UTC` zone (or with no zone) are converted; named
    /// zones would need a zone database and yield `None`.
    #[must_use]
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self.time_zone.as_deref() {
            None | Some("UTC" | "utc" | "Etc/UTC") => {}
            Some(_) => return None,
        }
        NaiveDateTime::parse_from_str(&self.date_time, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Name and address pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmailAddress {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// SMTP address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Event organizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    /// Organizer address.
    pub email_address: EmailAddress,
}

/// Event attendee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    /// Attendee address.
    pub email_address: EmailAddress,
    /// `required`, `optional` or `resource`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub attendee_type: Option<String>,
    /// Response status as sent by Graph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
}

/// Event location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Location name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Calendar event from `/me/calendarview`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event id.
    pub id: String,
    /// Subject line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Plain-text preview of the body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_preview: Option<String>,
    /// Start time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTimeTimeZone>,
    /// End time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTimeTimeZone>,
    /// Location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Organizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<Recipient>,
    /// Attendees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<Attendee>>,
    /// Whether the event lasts all day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_all_day: Option<bool>,
    /// Whether the event has been cancelled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_cancelled: Option<bool>,
    /// Free/busy status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_as: Option<String>,
    /// Link to the event in Outlook on the web.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_link: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn value_list_without_value_is_none() {
        let list: ValueList<Person> = serde_json::from_value(json!({
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#users('x')/people"
        }))
        .unwrap();
        assert!(list.value.is_none());

        let list: ValueList<Person> = serde_json::from_value(json!({"value": []})).unwrap();
        assert_eq!(list.value, Some(Vec::new()));
    }

    #[test]
    fn user_keeps_unknown_fields() {
        let raw = json!({
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#users/$entity",
            "id": "48d31887-5fad-4d73-a9f5-3c356e68a038",
            "displayName": "Megan Bowen",
            "userPrincipalName": "MeganB@contoso.com",
            "businessPhones": ["+1 412 555 0109"],
            "employeeId": "1234"
        });
        let user: User = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(user.display_name_or_upn(), "Megan Bowen");
        assert_eq!(user.extra.get("employeeId"), Some(&json!("1234")));
        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }

    #[test]
    fn user_name_and_email_fallbacks() {
        let user: User = serde_json::from_value(json!({
            "id": "abc",
            "userPrincipalName": "adele@contoso.com"
        }))
        .unwrap();
        assert_eq!(user.display_name_or_upn(), "adele@contoso.com");
        assert_eq!(user.email(), Some("adele@contoso.com"));

        let bare: User = serde_json::from_value(json!({"id": "abc"})).unwrap();
        assert_eq!(bare.display_name_or_upn(), "abc");
        assert_eq!(bare.email(), None);
    }

    #[test]
    fn person_primary_email_is_first_scored_address() {
        let person: Person = serde_json::from_value(json!({
            "id": "p1",
            "displayName": "Lynne Robbins",
            "scoredEmailAddresses": [
                {"address": "lynner@contoso.com", "relevanceScore": 8.0},
                {"address": "lynne@example.com", "relevanceScore": 2.0}
            ]
        }))
        .unwrap();
        assert_eq!(person.primary_email(), Some("lynner@contoso.com"));
    }

    #[test]
    fn person_null_and_empty_addresses_round_trip() {
        let raw = json!({"id": "p2", "scoredEmailAddresses": null});
        let person: Person = serde_json::from_value(raw).unwrap();
        assert!(person.scored_email_addresses.is_none());
        assert_eq!(person.primary_email(), None);
        assert_eq!(serde_json::to_value(&person).unwrap(), json!({"id": "p2"}));

        let raw = json!({"id": "p3", "scoredEmailAddresses": []});
        let person: Person = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(person.primary_email(), None);
        assert_eq!(serde_json::to_value(&person).unwrap(), raw);
    }

    #[test]
    fn event_empty_attendees_are_kept() {
        let raw = json!({"id": "e1", "attendees": []});
        let event: Event = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(event.attendees, Some(Vec::new()));
        assert_eq!(serde_json::to_value(&event).unwrap(), raw);

        let event: Event = serde_json::from_value(json!({"id": "e2", "attendees": null})).unwrap();
        assert!(event.attendees.is_none());
    }

    #[test]
    fn date_time_time_zone_converts_utc_only() {
        let utc = DateTimeTimeZone {
            date_time: "2024-01-01T09:30:00.0000000".to_string(),
            time_zone: Some("UTC".to_string()),
        };
        assert_eq!(
            utc.to_utc(),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap())
        );

        let pacific = DateTimeTimeZone {
            date_time: "2024-01-01T09:30:00.0000000".to_string(),
            time_zone: Some("Pacific Standard Time".to_string()),
        };
        assert!(pacific.to_utc().is_none());
    }

    #[test]
    fn attendee_type_uses_graph_field_name() {
        let attendee: Attendee = serde_json::from_value(json!({
            "type": "required",
            "emailAddress": {"name": "Alex Wilber", "address": "AlexW@contoso.com"}
        }))
        .unwrap();
        assert_eq!(attendee.attendee_type.as_deref(), Some("required"));
        assert_eq!(
            attendee.email_address.address.as_deref(),
            Some("AlexW@contoso.com")
        );
    }
}
