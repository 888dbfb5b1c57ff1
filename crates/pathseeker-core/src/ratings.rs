//! The rating ledger: one rating per (student, reply), credited to the
//! mentor atomically. The store's UNIQUE constraint is what serializes
//! concurrent duplicates; this module layers the authorization and range
//! checks on top.

use pathseeker_db::Database;
use pathseeker_types::models::{Identity, Rating};

use crate::convert;
use crate::error::{CoreError, CoreResult};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Rate a reply. Only the author of the reply's moment may rate it, once.
/// The rating row and the mentor's credit increment commit together or not
/// at all.
pub fn rate(db: &Database, student: &Identity, reply_id: i64, value: i64) -> CoreResult<Rating> {
    let reply = db.get_reply(reply_id)?.ok_or(CoreError::NotFound("reply"))?;
    let moment = db
        .get_moment(reply.moment_id)?
        .ok_or_else(|| anyhow::anyhow!("reply {} points at missing moment {}", reply_id, reply.moment_id))?;

    if moment.author_id != student.user_id {
        return Err(CoreError::PermissionDenied(
            "You are not authorized to rate this reply",
        ));
    }
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(CoreError::InvalidInput("Rating must be between 1 and 5"));
    }

    match db.insert_rating(student.user_id, reply.mentor_id, reply_id, value)? {
        Some(row) => Ok(convert::rating(row)),
        None => Err(CoreError::AlreadyExists("You have already rated this reply")),
    }
}

/// Mean of the mentor's rating values, rounded to one decimal; 0.0 when the
/// mentor has no ratings yet.
pub fn average_rating(db: &Database, mentor_id: i64) -> CoreResult<f64> {
    let avg = db.average_rating(mentor_id)?.unwrap_or(0.0);
    Ok((avg * 10.0).round() / 10.0)
}
