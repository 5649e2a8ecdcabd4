use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Geographic coordinates resolved from a city record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Birth data as entered on the intake form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BirthInput {
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub birth_hour: Option<NaiveTime>,
    pub country: String,
    pub county: String,
    pub city: String,
}

/// Payload sent to the calculation API
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadingRequest {
    pub longitude: f64,
    pub latitude: f64,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl ReadingRequest {
    pub fn new(coordinates: Coordinates, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            longitude: coordinates.longitude,
            latitude: coordinates.latitude,
            year: date.year(),
            month: date.month(),
            day: date.day(),
            hour: time.hour(),
            minute: time.minute(),
        }
    }
}

/// One celestial body as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetPosition {
    pub planet: String,
    pub sign: String,
    pub house: String,
}

impl PlanetPosition {
    pub fn new(
        planet: impl Into<String>,
        sign: impl Into<String>,
        house: impl Into<String>,
    ) -> Self {
        Self {
            planet: planet.into(),
            sign: sign.into(),
            house: house.into(),
        }
    }
}

/// Positions in the order the API returned them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingResult {
    pub dynamic_texts: Vec<PlanetPosition>,
}

/// Header lines shown above a rendered chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayInfo {
    pub name: String,
    pub date: String,
    pub time: String,
    pub location: String,
}

impl DisplayInfo {
    pub fn from_input(input: &BirthInput, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            name: input.full_name.trim().to_string(),
            date: format_date(date),
            time: format_time(time),
            location: format!("{}, {}", input.city, input.country),
        }
    }
}

/// `D/M/YYYY`, no zero padding
pub fn format_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

/// `HH:MM`, 24-hour
pub fn format_time(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_flattens_date_time_and_coordinates() {
        let coords = Coordinates {
            latitude: 44.43,
            longitude: 26.10,
        };
        let date = NaiveDate::from_ymd_opt(1990, 5, 14).unwrap();
        let time = NaiveTime::from_hms_opt(13, 30, 0).unwrap();

        let req = ReadingRequest::new(coords, date, time);

        assert_eq!(req.year, 1990);
        assert_eq!(req.month, 5);
        assert_eq!(req.day, 14);
        assert_eq!(req.hour, 13);
        assert_eq!(req.minute, 30);
        assert_eq!(req.latitude, 44.43);
        assert_eq!(req.longitude, 26.10);
    }

    #[test]
    fn request_serializes_with_api_field_names() {
        let req = ReadingRequest {
            longitude: 26.1,
            latitude: 44.43,
            year: 1990,
            month: 5,
            day: 14,
            hour: 13,
            minute: 30,
        };
        let value = serde_json::to_value(req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "longitude": 26.1,
                "latitude": 44.43,
                "year": 1990,
                "month": 5,
                "day": 14,
                "hour": 13,
                "minute": 30
            })
        );
    }

    #[test]
    fn display_formatting_matches_result_header() {
        let input = BirthInput {
            full_name: "  Ana Pop ".to_string(),
            city: "Cluj-Napoca".to_string(),
            country: "RO".to_string(),
            ..Default::default()
        };
        let date = NaiveDate::from_ymd_opt(1990, 5, 4).unwrap();
        let time = NaiveTime::from_hms_opt(7, 5, 0).unwrap();

        let info = DisplayInfo::from_input(&input, date, time);

        assert_eq!(info.name, "Ana Pop");
        assert_eq!(info.date, "4/5/1990");
        assert_eq!(info.time, "07:05");
        assert_eq!(info.location, "Cluj-Napoca, RO");
    }
}
