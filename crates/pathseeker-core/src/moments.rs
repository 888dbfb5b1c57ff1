//! Moment lifecycle: creation, replies, resolution, deletion.

use pathseeker_db::Database;
use pathseeker_types::api::{CreateMomentRequest, PostReplyRequest, ReplyView};
use pathseeker_types::models::{Identity, Moment, MomentStatus, Role, Urgency};

use crate::error::{CoreError, CoreResult};
use crate::{convert, similar};

/// Create a moment and immediately cross-reference similar resolved ones,
/// so the author has something to read while waiting for replies.
pub fn create_moment(
    db: &Database,
    author: &Identity,
    req: &CreateMomentRequest,
) -> CoreResult<(Moment, Vec<Moment>)> {
    if author.role != Role::Student {
        return Err(CoreError::PermissionDenied("Only students can post moments"));
    }
    let title = req.title.trim();
    if title.is_empty() {
        return Err(CoreError::InvalidInput("Title cannot be empty"));
    }
    if req.description.trim().is_empty() {
        return Err(CoreError::InvalidInput("Description cannot be empty"));
    }

    let urgency = req.urgency.unwrap_or(Urgency::Normal);
    let row = db.insert_moment(
        author.user_id,
        title,
        req.description.trim(),
        req.background.as_deref(),
        urgency.as_str(),
    )?;

    let similar = similar::find_similar(db, title, Some(row.id), similar::DEFAULT_LIMIT)?;
    Ok((convert::moment(row), similar))
}

/// Any authenticated user may reply, and may reply to the same moment more
/// than once; there is deliberately no per-user dedup here.
pub fn post_reply(
    db: &Database,
    actor: &Identity,
    moment_id: i64,
    req: &PostReplyRequest,
) -> CoreResult<ReplyView> {
    db.get_moment(moment_id)?.ok_or(CoreError::NotFound("moment"))?;
    if req.content.trim().is_empty() {
        return Err(CoreError::InvalidInput("Reply content cannot be empty"));
    }
    let row = db.insert_reply(
        moment_id,
        actor.user_id,
        req.decision_made.trim(),
        req.content.trim(),
        req.mistake_warning.as_deref(),
    )?;
    Ok(convert::reply_view(row))
}

/// Open → Resolved, author only.
pub fn resolve_moment(db: &Database, actor: &Identity, moment_id: i64) -> CoreResult<Moment> {
    let row = db.get_moment(moment_id)?.ok_or(CoreError::NotFound("moment"))?;
    if row.author_id != actor.user_id {
        return Err(CoreError::PermissionDenied(
            "Only the author can resolve this moment",
        ));
    }
    db.set_moment_status(moment_id, MomentStatus::Resolved.as_str())?;
    let row = db
        .get_moment(moment_id)?
        .ok_or_else(|| anyhow::anyhow!("moment {} vanished during resolve", moment_id))?;
    Ok(convert::moment(row))
}

/// Author-only delete; replies and their ratings go with it.
pub fn delete_moment(db: &Database, actor: &Identity, moment_id: i64) -> CoreResult<()> {
    let row = db.get_moment(moment_id)?.ok_or(CoreError::NotFound("moment"))?;
    if row.author_id != actor.user_id {
        return Err(CoreError::PermissionDenied(
            "Only the author can delete this moment",
        ));
    }
    db.delete_moment_cascade(moment_id)?;
    Ok(())
}
