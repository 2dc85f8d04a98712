//! iTRAK vehicle records

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::{Result, itrak_date};

/// Conversion factor from the feed's km/h to stored mph.
pub const MPH_PER_KPH: f64 = 0.621_371_192;

/// Convert km/h to mph.
#[must_use]
pub fn kph_to_mph(kph: f64) -> f64 {
    kph * MPH_PER_KPH
}

/// One vehicle's entry from the data feed, with each field's raw value.
///
/// A record reads:
///
/// ```text
/// Vehicle ID:15 lat:42.72943 lon:-73.67615 dir:173 spd:12 lck:1 time:93015 date:10152019 trig:0
/// ```
///
/// Fields must appear in this order, separated by a single space. Parsing
/// starts at the first `Vehicle ID:` that begins a complete record; anything
/// before it, or after the digits of the `trig` field, is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Tracker identifier of the vehicle.
    pub vehicle_id: String,
    pub latitude: String,
    pub longitude: String,
    pub heading: String,

    /// Speed in km/h.
    pub speed: String,
    pub lock: String,

    /// Observation time, `HHMMSS` with leading zeros possibly dropped.
    pub time: String,

    /// Observation date, `MMDDYYYY`.
    pub date: String,
    pub trigger: String,
}

impl Record {
    /// Observation time reconstructed from the `time` and `date` fields.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTimestamp` when either field is malformed.
    pub fn timestamp(&self) -> Result<DateTime<Utc>> {
        itrak_date::timestamp(
            &format!("{}{}", Field::Time.label(), self.time),
            &format!("{}{}", Field::Date.label(), self.date),
        )
    }

    /// # Errors
    ///
    /// Returns `Error::InvalidNumber` if the value is not a float.
    pub fn latitude(&self) -> Result<f64> {
        parse_float(Field::Latitude, &self.latitude)
    }

    /// # Errors
    ///
    /// Returns `Error::InvalidNumber` if the value is not a float.
    pub fn longitude(&self) -> Result<f64> {
        parse_float(Field::Longitude, &self.longitude)
    }

    /// # Errors
    ///
    /// Returns `Error::InvalidNumber` if the value is not a float.
    pub fn heading(&self) -> Result<f64> {
        parse_float(Field::Heading, &self.heading)
    }

    /// Speed converted to mph.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidNumber` if the value is not a float.
    pub fn speed_mph(&self) -> Result<f64> {
        parse_float(Field::Speed, &self.speed).map(kph_to_mph)
    }
}

fn parse_float(field: Field, value: &str) -> Result<f64> {
    value.parse::<f64>().map_err(|e| {
        Error::InvalidNumber(format!("unable to parse {}{value} as float: {e}", field.label()))
    })
}

impl FromStr for Record {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut first_err = None;
        for (start, _) in s.match_indices(Field::VehicleId.label()) {
            match Self::parse_at(&s[start..]) {
                Ok(record) => return Ok(record),
                Err(e) => {
                    first_err.get_or_insert(e);
                }
            }
        }
        Err(first_err
            .unwrap_or_else(|| Error::InvalidFormat("no vehicle ID in record".to_string())))
    }
}

impl Record {
    fn parse_at(record: &str) -> Result<Self> {
        let mut tokens = Tokens::new(record);
        let mut values = [""; FIELD_COUNT];
        for (i, (field, value)) in FIELDS.iter().zip(values.iter_mut()).enumerate() {
            if i > 0 {
                tokens.separator(*field)?;
            }
            *value = tokens.expect(*field)?;
        }

        let [vehicle_id, latitude, longitude, heading, speed, lock, time, date, trigger] = values;
        Ok(Self {
            vehicle_id: vehicle_id.to_string(),
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            heading: heading.to_string(),
            speed: speed.to_string(),
            lock: lock.to_string(),
            time: time.to_string(),
            date: date.to_string(),
            trigger: trigger.to_string(),
        })
    }
}

const FIELD_COUNT: usize = 9;

/// Record fields in feed order.
const FIELDS: [Field; FIELD_COUNT] = [
    Field::VehicleId,
    Field::Latitude,
    Field::Longitude,
    Field::Heading,
    Field::Speed,
    Field::Lock,
    Field::Time,
    Field::Date,
    Field::Trigger,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    VehicleId,
    Latitude,
    Longitude,
    Heading,
    Speed,
    Lock,
    Time,
    Date,
    Trigger,
}

impl Field {
    const fn label(self) -> &'static str {
        match self {
            Self::VehicleId => "Vehicle ID:",
            Self::Latitude => "lat:",
            Self::Longitude => "lon:",
            Self::Heading => "dir:",
            Self::Speed => "spd:",
            Self::Lock => "lck:",
            Self::Time => "time:",
            Self::Date => "date:",
            Self::Trigger => "trig:",
        }
    }

    fn accepts(self, c: char) -> bool {
        match self {
            Self::VehicleId => c.is_ascii_digit() || c == '.',
            Self::Latitude | Self::Longitude | Self::Heading | Self::Speed | Self::Lock => {
                c.is_ascii_digit() || c == '.' || c == '-'
            }
            Self::Time | Self::Date | Self::Trigger => c.is_ascii_digit(),
        }
    }
}

/// Walks `label:value` tokens in order.
struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    const fn new(record: &'a str) -> Self {
        Self { rest: record }
    }

    /// Consume the next field, which must be `field`, returning its value.
    fn expect(&mut self, field: Field) -> Result<&'a str> {
        let label = field.label();
        let Some(after) = self.rest.strip_prefix(label) else {
            let found = preview(self.rest);
            return Err(Error::InvalidFormat(format!("expected `{label}` at `{found}`")));
        };

        let end = after.find(|c: char| !field.accepts(c)).unwrap_or(after.len());
        let value = &after[..end];
        if value.is_empty() {
            let found = preview(after);
            return Err(Error::InvalidFormat(format!("invalid value for `{label}`: `{found}`")));
        }

        self.rest = &after[end..];
        Ok(value)
    }

    /// Consume the single space that precedes `next`.
    fn separator(&mut self, next: Field) -> Result<()> {
        let Some(after) = self.rest.strip_prefix(' ') else {
            let found = preview(self.rest);
            return Err(Error::InvalidFormat(format!(
                "expected a space before `{}` at `{found}`",
                next.label()
            )));
        };
        self.rest = after;
        Ok(())
    }
}

fn preview(s: &str) -> &str {
    let end = s.char_indices().nth(16).map_or(s.len(), |(i, _)| i);
    &s[..end]
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    const RECORD: &str = "Vehicle ID:15 lat:42.72943 lon:-73.67615 dir:173.5 spd:20 lck:1 \
                          time:93015 date:10152019 trig:0 ";

    #[test]
    fn parse_record() {
        let record: Record = RECORD.parse().expect("should parse");
        assert_eq!(
            record,
            Record {
                vehicle_id: "15".to_string(),
                latitude: "42.72943".to_string(),
                longitude: "-73.67615".to_string(),
                heading: "173.5".to_string(),
                speed: "20".to_string(),
                lock: "1".to_string(),
                time: "93015".to_string(),
                date: "10152019".to_string(),
                trigger: "0".to_string(),
            }
        );
    }

    #[test]
    fn typed_fields() {
        let record: Record = RECORD.parse().expect("should parse");

        assert!((record.latitude().unwrap() - 42.72943).abs() < f64::EPSILON);
        assert!((record.longitude().unwrap() + 73.67615).abs() < f64::EPSILON);
        assert!((record.heading().unwrap() - 173.5).abs() < f64::EPSILON);
        assert!((record.speed_mph().unwrap() - 20.0 * MPH_PER_KPH).abs() < f64::EPSILON);
        assert_eq!(
            record.timestamp().unwrap(),
            Utc.with_ymd_and_hms(2019, 10, 15, 9, 30, 15).unwrap()
        );
    }

    #[test]
    fn leading_text_ignored() {
        let record: Record = format!("\r\n{RECORD}").parse().expect("should parse");
        assert_eq!(record.vehicle_id, "15");
    }

    #[test]
    fn fractional_tracker_id() {
        let record: Record = RECORD.replace("ID:15", "ID:15.2").parse().expect("should parse");
        assert_eq!(record.vehicle_id, "15.2");
    }

    #[test]
    fn missing_vehicle_id() {
        let err = "lat:42.7 lon:-73.6".parse::<Record>().unwrap_err();
        assert_eq!(err.code(), "invalid_format");
    }

    #[test]
    fn fields_out_of_order() {
        let record = RECORD.replace("lat:42.72943 lon:-73.67615", "lon:-73.67615 lat:42.72943");
        assert!(matches!(record.parse::<Record>(), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn missing_field() {
        let record = RECORD.replace("lck:1 ", "");
        assert!(record.parse::<Record>().is_err());
    }

    #[test]
    fn truncated_record() {
        assert!("Vehicle ID:15 lat:42.72943 lon:-73.67615 dir:173".parse::<Record>().is_err());
    }

    #[test]
    fn letters_in_number() {
        let record = RECORD.replace("lat:42.72943", "lat:42.7a");
        assert!(record.parse::<Record>().is_err());
    }

    #[test]
    fn negative_time_rejected() {
        let record = RECORD.replace("time:93015", "time:-93015");
        assert!(record.parse::<Record>().is_err());
    }

    #[test]
    fn empty_value_rejected() {
        let record = RECORD.replace("spd:20", "spd:");
        assert!(record.parse::<Record>().is_err());
    }

    // the grammar admits values such as `1.2.3` that are not floats
    #[test]
    fn grammar_accepts_invalid_float() {
        let record: Record =
            RECORD.replace("dir:173.5", "dir:1.2.3").parse().expect("should parse");
        assert_eq!(record.heading().unwrap_err().code(), "invalid_number");
    }

    #[test]
    fn double_space_rejected() {
        let record = RECORD.replace("lat:42.72943 lon", "lat:42.72943  lon");
        assert!(matches!(record.parse::<Record>(), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn tab_separator_rejected() {
        let record = RECORD.replace(" spd:", "\tspd:");
        assert!(matches!(record.parse::<Record>(), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn first_complete_record_used() {
        let record: Record =
            format!("Vehicle ID:9 lat:bad {RECORD}").parse().expect("should parse");
        assert_eq!(record.vehicle_id, "15");
    }

    #[test]
    fn first_failure_reported() {
        let err = "Vehicle ID:9 lat:bad Vehicle ID:10 lon:1".parse::<Record>().unwrap_err();
        assert_eq!(
            err,
            Error::InvalidFormat("invalid value for `lat:`: `bad Vehicle ID:1`".to_string())
        );
    }

    #[test]
    fn text_after_trigger_ignored() {
        let record: Record =
            RECORD.replace("trig:0 ", "trig:0eof").parse().expect("should parse");
        assert_eq!(record.trigger, "0");
    }

    #[test]
    fn kph_conversion() {
        assert!((kph_to_mph(100.0) - 62.137_119_2).abs() < 1e-9);
    }
}
