//! Activity management on top of the gateway and the statistics engine.
//!
//! [`Logbook`] is the only writer of activities. Creating an entry runs
//! read-history, derive and insert as one unit per `(user, sport)` pair, so
//! two concurrent creations for the same pair cannot both build on the same
//! previous entry.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sportlog::db::db::Db;
//! use sportlog::libs::activity::{ActivityDraft, SportType};
//! use sportlog::libs::logbook::Logbook;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let db = Db::new().await?;
//! let logbook = Logbook::new(db.gateway.clone());
//!
//! let mut draft = ActivityDraft::new(SportType::Running, "2025-05-01");
//! draft.distance = Some("5.2".into());
//! let activity = logbook.create(1, &draft).await?;
//! println!("Total distance: {:?}", activity.total_distance);
//! # Ok(())
//! # }
//! ```

use super::activity::{Activity, ActivityDraft, SportType};
use super::error::LogbookError;
use super::stats::{derive_fields, CareerStats};
use crate::db::activities::{Activities, NewActivity};
use crate::db::gateway::SharedGateway;
use crate::db::users::{User, Users};
use chrono::NaiveDate;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Only the previous entry matters for derivation.
const HISTORY_DEPTH: i64 = 1;

/// What a reset removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    /// The activities of one guest.
    Own(i64),
    /// Every activity, plus all guest accounts.
    Everything,
}

impl ResetScope {
    /// Guests may clear their own demo data and administrators everything.
    /// Regular accounts may not reset at all.
    pub fn for_user(user: &User) -> Option<Self> {
        if user.is_guest() {
            Some(ResetScope::Own(user.id))
        } else if user.is_admin() {
            Some(ResetScope::Everything)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetSummary {
    pub activities: u64,
    pub users: u64,
}

pub struct Logbook {
    activities: Activities,
    users: Users,
    locks: DashMap<(i64, SportType), Arc<Mutex<()>>>,
}

impl Logbook {
    pub fn new(gateway: SharedGateway) -> Self {
        Self {
            activities: Activities::new(gateway.clone()),
            users: Users::new(gateway),
            locks: DashMap::new(),
        }
    }

    pub fn users(&self) -> &Users {
        &self.users
    }

    /// Validates the draft, derives its cumulative fields from the previous
    /// entry of the same sport and stores it.
    ///
    /// Returns the stored activity as read back from the database.
    pub async fn create(&self, user_id: i64, draft: &ActivityDraft) -> Result<Activity, LogbookError> {
        let sport = draft.sport_type.ok_or(LogbookError::MissingField("sport_type"))?;
        validate_date(&draft.date)?;
        let fields = draft.sport_fields();

        let lock = self.lock_for(user_id, sport);
        let guard = lock.lock().await;

        let history = self.activities.history(user_id, sport, HISTORY_DEPTH).await?;
        let derived = derive_fields(sport, &history, &fields);
        tracing::debug!(user_id, sport = %sport, ?derived, "Derived activity totals");

        let record = NewActivity::assemble(user_id, sport, draft, fields, derived);
        let id = self.activities.insert(&record).await?;
        drop(guard);

        tracing::info!(user_id, id, sport = %sport, "Activity created");
        self.get(user_id, id).await
    }

    /// A user's activities, newest date first, optionally for one sport.
    pub async fn list(&self, user_id: i64, sport: Option<SportType>) -> Result<Vec<Activity>, LogbookError> {
        Ok(self.activities.list(user_id, sport).await?)
    }

    pub async fn get(&self, user_id: i64, id: i64) -> Result<Activity, LogbookError> {
        self.activities
            .get(user_id, id)
            .await?
            .ok_or(LogbookError::NotFound(id))
    }

    /// Rewrites the descriptive and raw fields of an activity.
    ///
    /// Derived totals of this and later entries are not recomputed, and the
    /// sport type cannot change.
    pub async fn update(&self, user_id: i64, id: i64, draft: &ActivityDraft) -> Result<Activity, LogbookError> {
        validate_date(&draft.date)?;

        let affected = self.activities.update(user_id, id, draft).await?;
        if affected == 0 {
            return Err(LogbookError::NotFound(id));
        }

        tracing::info!(user_id, id, "Activity updated");
        self.get(user_id, id).await
    }

    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), LogbookError> {
        let affected = self.activities.delete(user_id, id).await?;
        if affected == 0 {
            return Err(LogbookError::NotFound(id));
        }

        tracing::info!(user_id, id, "Activity deleted");
        Ok(())
    }

    /// Career totals for one sport, read from the most recent entry.
    pub async fn career(&self, user_id: i64, sport: SportType) -> Result<CareerStats, LogbookError> {
        let count = self.activities.count(user_id, sport).await?;
        let latest = self.activities.history(user_id, sport, HISTORY_DEPTH).await?;
        Ok(CareerStats::from_latest(sport, count, latest.first()))
    }

    /// Career totals for every sport the user has logged.
    pub async fn career_all(&self, user_id: i64) -> Result<Vec<CareerStats>, LogbookError> {
        let mut stats = Vec::new();
        for sport in SportType::ALL {
            let career = self.career(user_id, sport).await?;
            if career.activities > 0 {
                stats.push(career);
            }
        }
        Ok(stats)
    }

    pub async fn reset(&self, scope: ResetScope) -> Result<ResetSummary, LogbookError> {
        let summary = match scope {
            ResetScope::Own(user_id) => ResetSummary {
                activities: self.activities.delete_for_user(user_id).await?,
                users: 0,
            },
            ResetScope::Everything => {
                let activities = self.activities.delete_all().await?;
                let users = self.users.delete_guests().await?;
                ResetSummary { activities, users }
            }
        };

        self.prune_idle_locks();
        tracing::info!(?scope, activities = summary.activities, users = summary.users, "Data reset");
        Ok(summary)
    }

    /// Number of `(user, sport)` writer locks currently tracked. At most
    /// one per pair that has been written since the last reset.
    pub fn writer_locks(&self) -> usize {
        self.locks.len()
    }

    /// Drops locks no create is holding. A later create for the same pair
    /// starts a fresh one.
    fn prune_idle_locks(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    fn lock_for(&self, user_id: i64, sport: SportType) -> Arc<Mutex<()>> {
        self.locks
            .entry((user_id, sport))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

fn validate_date(date: &str) -> Result<(), LogbookError> {
    let date = date.trim();
    if date.is_empty() {
        return Err(LogbookError::MissingField("date"));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| LogbookError::InvalidDate(date.to_string()))
}
