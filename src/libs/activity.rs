//! Activity domain types.
//!
//! - [`SportType`]: the closed set of supported sports
//! - [`RawNumber`]: a numeric field exactly as the user entered it
//! - [`ActivityDraft`]: caller input for create and update
//! - [`SportFields`]: the draft's numeric fields after normalization
//! - [`Activity`]: a persisted log entry

use crate::db::error::GatewayError;
use crate::db::value::Row;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time stored when the caller leaves it out.
pub const DEFAULT_TIME: &str = "00:00";

/// Largest value an `INTEGER` column holds on both engines.
pub const MAX_STORED_INTEGER: i64 = i32::MAX as i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SportType {
    Skydiving,
    IndoorSkydiving,
    ScubaDiving,
    Running,
}

impl SportType {
    pub const ALL: [SportType; 4] = [
        SportType::Skydiving,
        SportType::IndoorSkydiving,
        SportType::ScubaDiving,
        SportType::Running,
    ];

    /// Value stored in the `sport_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            SportType::Skydiving => "skydiving",
            SportType::IndoorSkydiving => "indoor_skydiving",
            SportType::ScubaDiving => "scuba_diving",
            SportType::Running => "running",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SportType::Skydiving => "Skydiving",
            SportType::IndoorSkydiving => "Indoor skydiving",
            SportType::ScubaDiving => "Scuba diving",
            SportType::Running => "Running",
        }
    }
}

impl fmt::Display for SportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SportType::ALL
            .into_iter()
            .find(|sport| sport.as_str() == s.trim())
            .ok_or_else(|| format!("unknown sport type '{}'", s))
    }
}

/// A numeric field as submitted: a JSON number or free text from a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl RawNumber {
    /// Reads the value as a finite, non-negative real.
    ///
    /// Blank text, unparsable text, `NaN`, infinities and negatives all
    /// yield `None`.
    pub fn to_real(&self) -> Option<f64> {
        let value = match self {
            RawNumber::Integer(v) => *v as f64,
            RawNumber::Real(v) => *v,
            RawNumber::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        (value.is_finite() && value >= 0.0).then_some(value)
    }

    /// Reads the value as a non-negative integer no larger than
    /// [`MAX_STORED_INTEGER`]. Integral reals such as `"60.0"` are accepted.
    pub fn to_integer(&self) -> Option<i64> {
        let value = match self {
            RawNumber::Integer(v) => Some(*v),
            RawNumber::Text(s) => match s.trim().parse::<i64>() {
                Ok(v) => Some(v),
                Err(_) => self.integral_real(),
            },
            RawNumber::Real(_) => self.integral_real(),
        };
        value.filter(|v| (0..=MAX_STORED_INTEGER).contains(v))
    }

    fn integral_real(&self) -> Option<i64> {
        self.to_real()
            .filter(|v| v.fract() == 0.0 && *v <= MAX_STORED_INTEGER as f64)
            .map(|v| v as i64)
    }
}

impl From<&str> for RawNumber {
    fn from(s: &str) -> Self {
        RawNumber::Text(s.to_string())
    }
}

impl From<i64> for RawNumber {
    fn from(v: i64) -> Self {
        RawNumber::Integer(v)
    }
}

impl From<f64> for RawNumber {
    fn from(v: f64) -> Self {
        RawNumber::Real(v)
    }
}

fn real(raw: &Option<RawNumber>) -> Option<f64> {
    raw.as_ref().and_then(RawNumber::to_real)
}

fn integer(raw: &Option<RawNumber>) -> Option<i64> {
    raw.as_ref().and_then(RawNumber::to_integer)
}

/// Caller input for a new or edited activity.
///
/// Only `date` and `sport_type` are required. Derived totals are never part
/// of the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityDraft {
    pub sport_type: Option<SportType>,
    pub date: String,
    pub time: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub skill_level: Option<String>,
    pub visibility: Option<String>,
    pub signature: Option<String>,
    pub latitude: Option<RawNumber>,
    pub longitude: Option<RawNumber>,
    pub height: Option<RawNumber>,
    pub depth: Option<RawNumber>,
    pub distance: Option<RawNumber>,
    pub jump_number: Option<RawNumber>,
    pub freefall_time: Option<RawNumber>,
    pub tunnel_time: Option<RawNumber>,
    pub dive_number: Option<RawNumber>,
    pub bottom_time: Option<RawNumber>,
}

impl ActivityDraft {
    pub fn new(sport_type: SportType, date: &str) -> Self {
        Self {
            sport_type: Some(sport_type),
            date: date.to_string(),
            ..Default::default()
        }
    }

    /// Time to store, falling back to midnight.
    pub fn time_or_default(&self) -> String {
        match self.time.as_deref().map(str::trim) {
            Some(time) if !time.is_empty() => time.to_string(),
            _ => DEFAULT_TIME.to_string(),
        }
    }

    /// Normalizes every numeric field. Anything that is not a usable number
    /// becomes `None`, so no raw string ever reaches storage.
    pub fn sport_fields(&self) -> SportFields {
        SportFields {
            latitude: self.latitude.as_ref().and_then(coordinate),
            longitude: self.longitude.as_ref().and_then(coordinate),
            height: real(&self.height),
            depth: real(&self.depth),
            distance: real(&self.distance),
            jump_number: integer(&self.jump_number),
            freefall_time: integer(&self.freefall_time),
            tunnel_time: integer(&self.tunnel_time),
            dive_number: integer(&self.dive_number),
            bottom_time: integer(&self.bottom_time),
        }
    }
}

/// Seeds an edit form with the stored values.
impl From<&Activity> for ActivityDraft {
    fn from(activity: &Activity) -> Self {
        let integer = |v: Option<i64>| v.map(RawNumber::Integer);
        let real = |v: Option<f64>| v.map(RawNumber::Real);
        ActivityDraft {
            sport_type: Some(activity.sport_type),
            date: activity.date.clone(),
            time: Some(activity.time.clone()),
            location: activity.location.clone(),
            notes: activity.notes.clone(),
            skill_level: activity.skill_level.clone(),
            visibility: activity.visibility.clone(),
            signature: activity.signature.clone(),
            latitude: real(activity.latitude),
            longitude: real(activity.longitude),
            height: real(activity.height),
            depth: real(activity.depth),
            distance: real(activity.distance),
            jump_number: integer(activity.jump_number),
            freefall_time: integer(activity.freefall_time),
            tunnel_time: integer(activity.tunnel_time),
            dive_number: integer(activity.dive_number),
            bottom_time: integer(activity.bottom_time),
        }
    }
}

/// Coordinates are the one numeric input that may be negative.
fn coordinate(raw: &RawNumber) -> Option<f64> {
    let value = match raw {
        RawNumber::Integer(v) => *v as f64,
        RawNumber::Real(v) => *v,
        RawNumber::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

/// Normalized numeric fields of a draft, ready for derivation and storage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SportFields {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub height: Option<f64>,
    pub depth: Option<f64>,
    pub distance: Option<f64>,
    pub jump_number: Option<i64>,
    pub freefall_time: Option<i64>,
    pub tunnel_time: Option<i64>,
    pub dive_number: Option<i64>,
    pub bottom_time: Option<i64>,
}

/// A persisted activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub id: i64,
    pub user_id: i64,
    pub sport_type: SportType,
    pub date: String,
    pub time: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub height: Option<f64>,
    pub depth: Option<f64>,
    pub distance: Option<f64>,
    pub total_distance: Option<f64>,
    pub notes: Option<String>,
    pub jump_number: Option<i64>,
    pub total_jumps: Option<i64>,
    pub freefall_time: Option<i64>,
    pub total_freefall_time: Option<i64>,
    pub tunnel_time: Option<i64>,
    pub total_tunnel_time: Option<i64>,
    pub skill_level: Option<String>,
    pub dive_number: Option<i64>,
    pub visibility: Option<String>,
    pub bottom_time: Option<i64>,
    pub total_bottom_time: Option<i64>,
    pub signature: Option<String>,
    pub created_at: Option<String>,
}

impl Activity {
    /// Maps an `activities` row, as returned by `SELECT *`.
    pub fn from_row(row: &Row) -> Result<Self, GatewayError> {
        let sport = row.get_text("sport_type")?.unwrap_or_default();
        let sport_type = sport.parse::<SportType>().map_err(|_| GatewayError::InvalidColumn {
            column: "sport_type".to_string(),
            expected: "a sport type",
            found: sport.clone(),
        })?;

        Ok(Activity {
            id: row.get_i64("id")?.ok_or_else(|| GatewayError::MissingColumn("id".to_string()))?,
            user_id: row.get_i64("user_id")?.ok_or_else(|| GatewayError::MissingColumn("user_id".to_string()))?,
            sport_type,
            date: row.get_text("date")?.unwrap_or_default(),
            time: row.get_text("time")?.unwrap_or_else(|| DEFAULT_TIME.to_string()),
            location: row.get_text("location")?,
            latitude: row.get_f64("latitude")?,
            longitude: row.get_f64("longitude")?,
            height: row.get_f64("height")?,
            depth: row.get_f64("depth")?,
            distance: row.get_f64("distance")?,
            total_distance: row.get_f64("total_distance")?,
            notes: row.get_text("notes")?,
            jump_number: row.get_i64("jump_number")?,
            total_jumps: row.get_i64("total_jumps")?,
            freefall_time: row.get_i64("freefall_time")?,
            total_freefall_time: row.get_i64("total_freefall_time")?,
            tunnel_time: row.get_i64("tunnel_time")?,
            total_tunnel_time: row.get_i64("total_tunnel_time")?,
            skill_level: row.get_text("skill_level")?,
            dive_number: row.get_i64("dive_number")?,
            visibility: row.get_text("visibility")?,
            bottom_time: row.get_i64("bottom_time")?,
            total_bottom_time: row.get_i64("total_bottom_time")?,
            signature: row.get_text("signature")?,
            created_at: row.get_text("created_at")?,
        })
    }
}
