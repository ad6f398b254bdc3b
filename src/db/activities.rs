//! Activity persistence.
//!
//! Every statement here is written once in the neutral `$N` form and runs
//! unchanged on both engines. Ownership is enforced in the `WHERE` clause:
//! a statement naming another user's activity simply matches no rows.

use super::error::GatewayError;
use super::gateway::SharedGateway;
use super::value::Value;
use crate::libs::activity::{Activity, ActivityDraft, SportFields, SportType};
use crate::libs::stats::DerivedFields;

const INSERT_ACTIVITY: &str = "INSERT INTO activities (
    user_id, date, time, location, latitude, longitude, height, depth, distance, total_distance,
    sport_type, notes, jump_number, total_jumps, freefall_time, total_freefall_time, tunnel_time,
    total_tunnel_time, skill_level, dive_number, visibility, bottom_time, total_bottom_time, signature
) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24)
RETURNING id";
const SELECT_BY_USER: &str = "SELECT * FROM activities WHERE user_id = $1 ORDER BY date DESC, time DESC, id DESC";
const SELECT_BY_USER_AND_SPORT: &str =
    "SELECT * FROM activities WHERE user_id = $1 AND sport_type = $2 ORDER BY date DESC, time DESC, id DESC";
const SELECT_HISTORY: &str = "SELECT * FROM activities WHERE user_id = $1 AND sport_type = $2 ORDER BY id DESC LIMIT $3";
const SELECT_BY_ID: &str = "SELECT * FROM activities WHERE id = $1 AND user_id = $2";
const COUNT_BY_SPORT: &str = "SELECT COUNT(*) AS count FROM activities WHERE user_id = $1 AND sport_type = $2";
const UPDATE_ACTIVITY: &str = "UPDATE activities SET
    date = $1, time = $2, location = $3, latitude = $4, longitude = $5, height = $6, depth = $7,
    distance = $8, notes = $9, jump_number = $10, freefall_time = $11, tunnel_time = $12,
    skill_level = $13, dive_number = $14, visibility = $15, bottom_time = $16, signature = $17
WHERE id = $18 AND user_id = $19";
const DELETE_BY_ID: &str = "DELETE FROM activities WHERE id = $1 AND user_id = $2";
const DELETE_BY_USER: &str = "DELETE FROM activities WHERE user_id = $1";
const DELETE_ALL: &str = "DELETE FROM activities";

/// A fully assembled row ready for insertion: caller input, normalized raw
/// fields and derived totals.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub user_id: i64,
    pub sport_type: SportType,
    pub date: String,
    pub time: String,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub skill_level: Option<String>,
    pub visibility: Option<String>,
    pub signature: Option<String>,
    pub fields: SportFields,
    pub derived: DerivedFields,
}

impl NewActivity {
    pub fn assemble(user_id: i64, sport_type: SportType, draft: &ActivityDraft, fields: SportFields, derived: DerivedFields) -> Self {
        Self {
            user_id,
            sport_type,
            date: draft.date.trim().to_string(),
            time: draft.time_or_default(),
            location: draft.location.clone(),
            notes: draft.notes.clone(),
            skill_level: draft.skill_level.clone(),
            visibility: draft.visibility.clone(),
            signature: draft.signature.clone(),
            fields,
            derived,
        }
    }

    /// Sequence numbers come from the derivation, which already honours an
    /// explicit value.
    fn params(&self) -> Vec<Value> {
        let f = &self.fields;
        let d = &self.derived;
        vec![
            self.user_id.into(),
            self.date.clone().into(),
            self.time.clone().into(),
            self.location.clone().into(),
            f.latitude.into(),
            f.longitude.into(),
            f.height.into(),
            f.depth.into(),
            f.distance.into(),
            d.total_distance.into(),
            self.sport_type.as_str().into(),
            self.notes.clone().into(),
            d.jump_number.or(f.jump_number).into(),
            d.total_jumps.into(),
            f.freefall_time.into(),
            d.total_freefall_time.into(),
            f.tunnel_time.into(),
            d.total_tunnel_time.into(),
            self.skill_level.clone().into(),
            d.dive_number.or(f.dive_number).into(),
            self.visibility.clone().into(),
            f.bottom_time.into(),
            d.total_bottom_time.into(),
            self.signature.clone().into(),
        ]
    }
}

pub struct Activities {
    gateway: SharedGateway,
}

impl Activities {
    pub fn new(gateway: SharedGateway) -> Self {
        Self { gateway }
    }

    /// Inserts the activity and returns its generated id.
    pub async fn insert(&self, activity: &NewActivity) -> Result<i64, GatewayError> {
        let result = self.gateway.execute(INSERT_ACTIVITY, &activity.params()).await?;
        result.returned_id("id")
    }

    /// All of a user's activities, newest date first.
    pub async fn list(&self, user_id: i64, sport: Option<SportType>) -> Result<Vec<Activity>, GatewayError> {
        let result = match sport {
            Some(sport) => {
                self.gateway
                    .execute(SELECT_BY_USER_AND_SPORT, &[user_id.into(), sport.as_str().into()])
                    .await?
            }
            None => self.gateway.execute(SELECT_BY_USER, &[user_id.into()]).await?,
        };
        result.rows.iter().map(Activity::from_row).collect()
    }

    /// The `limit` most recently inserted activities of one sport, highest
    /// id first.
    pub async fn history(&self, user_id: i64, sport: SportType, limit: i64) -> Result<Vec<Activity>, GatewayError> {
        let result = self
            .gateway
            .execute(SELECT_HISTORY, &[user_id.into(), sport.as_str().into(), limit.into()])
            .await?;
        result.rows.iter().map(Activity::from_row).collect()
    }

    pub async fn get(&self, user_id: i64, id: i64) -> Result<Option<Activity>, GatewayError> {
        let result = self.gateway.execute(SELECT_BY_ID, &[id.into(), user_id.into()]).await?;
        result.first().map(Activity::from_row).transpose()
    }

    pub async fn count(&self, user_id: i64, sport: SportType) -> Result<u64, GatewayError> {
        let result = self
            .gateway
            .execute(COUNT_BY_SPORT, &[user_id.into(), sport.as_str().into()])
            .await?;
        let count = match result.first() {
            Some(row) => row.get_i64("count")?.unwrap_or(0),
            None => 0,
        };
        Ok(count.max(0) as u64)
    }

    /// Rewrites the descriptive and raw fields of an activity. Sport type and
    /// derived totals are left as stored.
    ///
    /// Returns the number of rows changed: zero when the id does not exist or
    /// belongs to another user.
    pub async fn update(&self, user_id: i64, id: i64, draft: &ActivityDraft) -> Result<u64, GatewayError> {
        let f = draft.sport_fields();
        let params: Vec<Value> = vec![
            draft.date.trim().to_string().into(),
            draft.time_or_default().into(),
            draft.location.clone().into(),
            f.latitude.into(),
            f.longitude.into(),
            f.height.into(),
            f.depth.into(),
            f.distance.into(),
            draft.notes.clone().into(),
            f.jump_number.into(),
            f.freefall_time.into(),
            f.tunnel_time.into(),
            draft.skill_level.clone().into(),
            f.dive_number.into(),
            draft.visibility.clone().into(),
            f.bottom_time.into(),
            draft.signature.clone().into(),
            id.into(),
            user_id.into(),
        ];
        Ok(self.gateway.execute(UPDATE_ACTIVITY, &params).await?.affected)
    }

    /// Returns the number of rows removed.
    pub async fn delete(&self, user_id: i64, id: i64) -> Result<u64, GatewayError> {
        Ok(self.gateway.execute(DELETE_BY_ID, &[id.into(), user_id.into()]).await?.affected)
    }

    pub async fn delete_for_user(&self, user_id: i64) -> Result<u64, GatewayError> {
        Ok(self.gateway.execute(DELETE_BY_USER, &[user_id.into()]).await?.affected)
    }

    pub async fn delete_all(&self) -> Result<u64, GatewayError> {
        Ok(self.gateway.execute(DELETE_ALL, &[]).await?.affected)
    }
}
