use super::activity::{Activity, SportType};
use super::formatter::{format_distance, format_seconds};
use super::stats::CareerStats;
use crate::db::users::User;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn activities(activities: &[Activity]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "DATE", "TIME", "SPORT", "LOCATION", "ENTRY", "CAREER"]);
        for activity in activities {
            table.add_row(row![
                activity.id,
                activity.date,
                activity.time,
                activity.sport_type.label(),
                activity.location.as_deref().unwrap_or(""),
                entry_summary(activity),
                career_summary(activity)
            ]);
        }
        table.printstd();
    }

    /// Every stored field of one activity, blanks omitted.
    pub fn activity(activity: &Activity) {
        let mut table = Table::new();

        table.add_row(row!["Sport", activity.sport_type.label()]);
        table.add_row(row!["Date", activity.date]);
        table.add_row(row!["Time", activity.time]);

        let text_fields = [
            ("Location", &activity.location),
            ("Skill level", &activity.skill_level),
            ("Visibility", &activity.visibility),
            ("Notes", &activity.notes),
            ("Signature", &activity.signature),
        ];
        for (label, value) in text_fields {
            if let Some(value) = value {
                table.add_row(row![label, value]);
            }
        }

        let real_fields = [
            ("Latitude", activity.latitude),
            ("Longitude", activity.longitude),
            ("Height (m)", activity.height),
            ("Depth (m)", activity.depth),
            ("Distance (km)", activity.distance),
            ("Total distance (km)", activity.total_distance),
        ];
        for (label, value) in real_fields {
            if let Some(value) = value {
                table.add_row(row![label, value]);
            }
        }

        let integer_fields = [
            ("Jump #", activity.jump_number),
            ("Total jumps", activity.total_jumps),
            ("Freefall (s)", activity.freefall_time),
            ("Total freefall (s)", activity.total_freefall_time),
            ("Tunnel (min)", activity.tunnel_time),
            ("Total tunnel (min)", activity.total_tunnel_time),
            ("Dive #", activity.dive_number),
            ("Bottom time (min)", activity.bottom_time),
            ("Total bottom time (min)", activity.total_bottom_time),
        ];
        for (label, value) in integer_fields {
            if let Some(value) = value {
                table.add_row(row![label, value]);
            }
        }

        if let Some(created_at) = &activity.created_at {
            table.add_row(row!["Logged at", created_at]);
        }
        table.printstd();
    }

    pub fn stats(stats: &[CareerStats]) {
        let mut table = Table::new();

        table.add_row(row!["SPORT", "ACTIVITIES", "TOTALS"]);
        for career in stats {
            let t = &career.totals;
            let totals = match career.sport_type {
                SportType::Skydiving => format!(
                    "{} jumps, {} freefall",
                    t.total_jumps.unwrap_or(0),
                    format_seconds(t.total_freefall_time.unwrap_or(0))
                ),
                SportType::IndoorSkydiving => format!("{} min in the tunnel", t.total_tunnel_time.unwrap_or(0)),
                SportType::ScubaDiving => format!(
                    "{} dives, {} min bottom time",
                    t.dive_number.unwrap_or(0),
                    t.total_bottom_time.unwrap_or(0)
                ),
                SportType::Running => format_distance(t.total_distance.unwrap_or(0.0)),
            };
            table.add_row(row![career.sport_type.label(), career.activities, totals]);
        }
        table.printstd();
    }

    pub fn users(users: &[User]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "USERNAME", "NAME", "ROLE", "LANGUAGE", "CREATED"]);
        for user in users {
            table.add_row(row![
                user.id,
                user.username.as_deref().unwrap_or(""),
                user.name.as_deref().unwrap_or(""),
                user.role,
                user.language,
                user.created_at.as_deref().unwrap_or("")
            ]);
        }
        table.printstd();
    }
}

/// The entry's own contribution, per sport.
fn entry_summary(activity: &Activity) -> String {
    match activity.sport_type {
        SportType::Skydiving => format!(
            "jump #{}, {}s freefall",
            activity.jump_number.unwrap_or(0),
            activity.freefall_time.unwrap_or(0)
        ),
        SportType::IndoorSkydiving => format!("{} min", activity.tunnel_time.unwrap_or(0)),
        SportType::ScubaDiving => format!(
            "dive #{}, {} min",
            activity.dive_number.unwrap_or(0),
            activity.bottom_time.unwrap_or(0)
        ),
        SportType::Running => format!("{} km", activity.distance.unwrap_or(0.0)),
    }
}

/// Running totals as of this entry.
fn career_summary(activity: &Activity) -> String {
    match activity.sport_type {
        SportType::Skydiving => format!(
            "{} jumps, {}",
            activity.total_jumps.unwrap_or(0),
            format_seconds(activity.total_freefall_time.unwrap_or(0))
        ),
        SportType::IndoorSkydiving => format!("{} min", activity.total_tunnel_time.unwrap_or(0)),
        SportType::ScubaDiving => format!("{} min", activity.total_bottom_time.unwrap_or(0)),
        SportType::Running => format_distance(activity.total_distance.unwrap_or(0.0)),
    }
}

