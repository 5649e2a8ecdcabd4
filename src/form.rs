//! Birth-data form validation and submission gating.

use crate::models::{BirthInput, Coordinates, DisplayInfo, ReadingRequest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    FullName,
    BirthDate,
    BirthHour,
    BirthCountry,
    BirthCounty,
    BirthCity,
}

impl FormField {
    pub fn message(self) -> &'static str {
        match self {
            FormField::FullName => "Full Name is required",
            FormField::BirthDate => "Birth Date is required",
            FormField::BirthHour => "Birth Hour is required",
            FormField::BirthCountry => "Birth Country is required",
            FormField::BirthCounty => "Birth County is required",
            FormField::BirthCity => "Birth City is required",
        }
    }
}

/// Field → message; empty means the form is complete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<FormField, String>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.keys().copied()
    }

    fn require(&mut self, field: FormField, present: bool) {
        if !present {
            self.0.insert(field, field.message().to_string());
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Reasons a submission does not reach the network
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitBlocked {
    #[error("form is incomplete: {0}")]
    Invalid(FormErrors),
    #[error("coordinates for the selected city are not resolved")]
    CoordinatesUnresolved,
    #[error("a reading request is already in flight")]
    InFlight,
}

/// A validated submission ready for the reading client
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub request: ReadingRequest,
    pub display: DisplayInfo,
}

/// Required-field check. No cross-field rules.
pub fn validate(input: &BirthInput) -> FormErrors {
    let mut errors = FormErrors::default();
    errors.require(FormField::FullName, !input.full_name.trim().is_empty());
    errors.require(FormField::BirthDate, input.birth_date.is_some());
    errors.require(FormField::BirthHour, input.birth_hour.is_some());
    errors.require(FormField::BirthCountry, !input.country.is_empty());
    errors.require(FormField::BirthCounty, !input.county.is_empty());
    errors.require(FormField::BirthCity, !input.city.is_empty());
    errors
}

/// Validate and project the form into an API request.
pub fn prepare_submission(
    input: &BirthInput,
    coordinates: Option<Coordinates>,
) -> Result<Submission, SubmitBlocked> {
    let errors = validate(input);
    if !errors.is_empty() {
        return Err(SubmitBlocked::Invalid(errors));
    }
    let coordinates = coordinates.ok_or(SubmitBlocked::CoordinatesUnresolved)?;
    let (Some(date), Some(time)) = (input.birth_date, input.birth_hour) else {
        // validate() already rejected missing date/time
        return Err(SubmitBlocked::Invalid(validate(input)));
    };

    Ok(Submission {
        request: ReadingRequest::new(coordinates, date, time),
        display: DisplayInfo::from_input(input, date, time),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn complete_input() -> BirthInput {
        BirthInput {
            full_name: "Ana".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 14),
            birth_hour: NaiveTime::from_hms_opt(13, 30, 0),
            country: "RO".to_string(),
            county: "B".to_string(),
            city: "Bucharest".to_string(),
        }
    }

    const COORDS: Coordinates = Coordinates {
        latitude: 44.43,
        longitude: 26.10,
    };

    #[test]
    fn complete_form_has_no_errors() {
        assert!(validate(&complete_input()).is_empty());
    }

    #[test]
    fn empty_form_reports_every_field() {
        let errors = validate(&BirthInput::default());
        assert_eq!(errors.len(), 6);
        assert_eq!(errors.get(FormField::FullName), Some("Full Name is required"));
        assert_eq!(errors.get(FormField::BirthCity), Some("Birth City is required"));
    }

    #[test]
    fn whitespace_name_is_missing() {
        let input = BirthInput {
            full_name: "   ".to_string(),
            ..complete_input()
        };
        let errors = validate(&input);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![FormField::FullName]);
    }

    #[test]
    fn future_dates_are_accepted() {
        let input = BirthInput {
            birth_date: NaiveDate::from_ymd_opt(2999, 1, 1),
            ..complete_input()
        };
        assert!(validate(&input).is_empty());
    }

    #[test]
    fn errors_serialize_keyed_by_field_name() {
        let input = BirthInput {
            county: String::new(),
            ..complete_input()
        };
        let json = serde_json::to_value(validate(&input)).unwrap();
        assert_eq!(json, serde_json::json!({ "birthCounty": "Birth County is required" }));
    }

    #[test]
    fn submission_blocked_without_coordinates() {
        let result = prepare_submission(&complete_input(), None);
        assert_eq!(result, Err(SubmitBlocked::CoordinatesUnresolved));
    }

    #[test]
    fn submission_blocked_on_missing_field() {
        let input = BirthInput {
            birth_hour: None,
            ..complete_input()
        };
        match prepare_submission(&input, Some(COORDS)) {
            Err(SubmitBlocked::Invalid(errors)) => {
                assert!(errors.get(FormField::BirthHour).is_some())
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn valid_submission_builds_request() {
        let submission = prepare_submission(&complete_input(), Some(COORDS)).unwrap();
        assert_eq!(submission.request.year, 1990);
        assert_eq!(submission.request.minute, 30);
        assert_eq!(submission.request.longitude, 26.10);
        assert_eq!(submission.display.location, "Bucharest, RO");
    }
}
