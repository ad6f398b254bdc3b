//! Cumulative career statistics.
//!
//! Derivation happens once, when an activity is written: the new entry's
//! totals are the previous entry's totals plus its own contribution, and
//! sequence numbers continue from the previous entry. Reading career
//! statistics is then a single-row lookup.
//!
//! ## Rules per sport
//!
//! | Sport            | Running total                                   | Sequence                         |
//! |------------------|-------------------------------------------------|----------------------------------|
//! | skydiving        | `total_freefall_time` += `freefall_time`        | `jump_number`, mirrored to `total_jumps` |
//! | indoor_skydiving | `total_tunnel_time` += `tunnel_time`            |                                  |
//! | scuba_diving     | `total_bottom_time` += `bottom_time`            | `dive_number`                    |
//! | running          | `total_distance` += `distance`, one decimal     |                                  |
//!
//! "Previous" is the prior activity of the same sport with the highest id,
//! i.e. the most recently inserted one, not the one with the latest date.

use super::activity::{Activity, SportFields, SportType, MAX_STORED_INTEGER};
use serde::Serialize;

/// Fields computed from history and persisted next to the raw entry.
///
/// Only the fields belonging to the activity's sport are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DerivedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jump_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_jumps: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_freefall_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tunnel_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dive_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_bottom_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_distance: Option<f64>,
}

/// Derives the cumulative fields of a proposed activity.
///
/// `history` is the user's prior activities; entries of other sports are
/// ignored and the order of the slice does not matter. Absent raw values
/// contribute zero, and a previous entry with no stored total counts as
/// zero. Integer totals and sequence numbers are capped at
/// [`MAX_STORED_INTEGER`]. The function is pure and never fails.
///
/// # Examples
///
/// ```rust
/// use sportlog::libs::activity::{SportFields, SportType};
/// use sportlog::libs::stats::derive_fields;
///
/// let proposed = SportFields { freefall_time: Some(60), ..Default::default() };
/// let derived = derive_fields(SportType::Skydiving, &[], &proposed);
/// assert_eq!(derived.jump_number, Some(1));
/// assert_eq!(derived.total_jumps, Some(1));
/// assert_eq!(derived.total_freefall_time, Some(60));
/// ```
pub fn derive_fields(sport: SportType, history: &[Activity], proposed: &SportFields) -> DerivedFields {
    let previous = previous_activity(sport, history);

    match sport {
        SportType::Skydiving => {
            let jump_number = proposed
                .jump_number
                .unwrap_or_else(|| next_in_sequence(previous.and_then(|p| p.jump_number)));
            DerivedFields {
                jump_number: Some(jump_number),
                total_jumps: Some(jump_number),
                total_freefall_time: Some(accumulate(
                    previous.and_then(|p| p.total_freefall_time),
                    proposed.freefall_time,
                )),
                ..Default::default()
            }
        }
        SportType::IndoorSkydiving => DerivedFields {
            total_tunnel_time: Some(accumulate(previous.and_then(|p| p.total_tunnel_time), proposed.tunnel_time)),
            ..Default::default()
        },
        SportType::ScubaDiving => DerivedFields {
            dive_number: Some(
                proposed
                    .dive_number
                    .unwrap_or_else(|| next_in_sequence(previous.and_then(|p| p.dive_number))),
            ),
            total_bottom_time: Some(accumulate(previous.and_then(|p| p.total_bottom_time), proposed.bottom_time)),
            ..Default::default()
        },
        SportType::Running => {
            let total = previous.and_then(|p| p.total_distance).unwrap_or(0.0) + proposed.distance.unwrap_or(0.0);
            DerivedFields {
                total_distance: Some(round_to_tenth(total)),
                ..Default::default()
            }
        }
    }
}

/// Most recently inserted activity of `sport` in `history`.
pub fn previous_activity(sport: SportType, history: &[Activity]) -> Option<&Activity> {
    history.iter().filter(|a| a.sport_type == sport).max_by_key(|a| a.id)
}

/// Totals stop at the largest storable integer.
fn accumulate(previous_total: Option<i64>, contribution: Option<i64>) -> i64 {
    previous_total
        .unwrap_or(0)
        .saturating_add(contribution.unwrap_or(0))
        .min(MAX_STORED_INTEGER)
}

fn next_in_sequence(previous: Option<i64>) -> i64 {
    previous.unwrap_or(0).saturating_add(1).min(MAX_STORED_INTEGER)
}

/// Rounds half-up to one decimal place.
///
/// The value is first snapped to six decimals so binary noise such as
/// `8.949999999999999` rounds like the decimal `8.95` it stands for.
pub fn round_to_tenth(value: f64) -> f64 {
    let snapped = (value * 10.0 * 1e6).round() / 1e6;
    (snapped + 0.5).floor() / 10.0
}

/// Career totals for one sport, read from the latest activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerStats {
    pub sport_type: SportType,
    /// Number of logged activities for the sport
    pub activities: u64,
    /// Latest persisted values of the derived fields
    pub totals: DerivedFields,
}

impl CareerStats {
    pub fn from_latest(sport_type: SportType, activities: u64, latest: Option<&Activity>) -> Self {
        let totals = match latest {
            Some(a) => DerivedFields {
                jump_number: a.jump_number.filter(|_| sport_type == SportType::Skydiving),
                total_jumps: a.total_jumps,
                total_freefall_time: a.total_freefall_time,
                total_tunnel_time: a.total_tunnel_time,
                dive_number: a.dive_number.filter(|_| sport_type == SportType::ScubaDiving),
                total_bottom_time: a.total_bottom_time,
                total_distance: a.total_distance,
            },
            None => DerivedFields::default(),
        };
        Self {
            sport_type,
            activities,
            totals,
        }
    }
}
