//! Chat-pair lifecycle and participant checks. A (student, mentor) pair has
//! at most one chat; creation races resolve to whichever insert won.

use pathseeker_db::Database;
use pathseeker_db::models::ChatRow;
use pathseeker_types::api::ChatSummary;
use pathseeker_types::models::{Chat, Identity, Role};

use crate::convert;
use crate::error::{CoreError, CoreResult};

/// Return the existing chat for (student, mentor) or create it. Students
/// only, and only toward mentors.
pub fn get_or_create_chat(db: &Database, actor: &Identity, mentor_id: i64) -> CoreResult<Chat> {
    if actor.role != Role::Student {
        return Err(CoreError::PermissionDenied(
            "Only students can start chats with mentors",
        ));
    }
    let target = db.get_user_by_id(mentor_id)?.ok_or(CoreError::NotFound("user"))?;
    if target.role != Role::Mentor.as_str() {
        return Err(CoreError::InvalidInput("You can only chat with mentors"));
    }

    let (row, _created) = db.get_or_create_chat(actor.user_id, mentor_id)?;
    Ok(convert::chat(row))
}

/// Look up a chat and verify the actor participates in it. Missing chat and
/// non-participant are distinct failures.
pub fn load_for_participant(db: &Database, actor: &Identity, chat_id: i64) -> CoreResult<ChatRow> {
    let chat = db.get_chat(chat_id)?.ok_or(CoreError::NotFound("chat"))?;
    if actor.user_id != chat.student_id && actor.user_id != chat.mentor_id {
        return Err(CoreError::PermissionDenied(
            "You do not have permission to access this chat",
        ));
    }
    Ok(chat)
}

/// The chat's other participant, from the actor's point of view.
pub fn other_participant(chat: &ChatRow, actor: &Identity) -> i64 {
    if actor.user_id == chat.student_id {
        chat.mentor_id
    } else {
        chat.student_id
    }
}

/// Participant-only delete; all messages go with the chat.
pub fn delete_chat(db: &Database, actor: &Identity, chat_id: i64) -> CoreResult<()> {
    load_for_participant(db, actor, chat_id)?;
    db.delete_chat_cascade(chat_id)?;
    Ok(())
}

/// The actor's chats with the other participant's name and unread count.
pub fn list_chats(db: &Database, actor: &Identity) -> CoreResult<Vec<ChatSummary>> {
    let rows = db.chats_for_user(actor.user_id, actor.role == Role::Student)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let created_at = convert::parse_timestamp(&row.created_at, "chat", row.id);
            ChatSummary {
                id: row.id,
                other_user_id: row.other_user_id,
                other_user_name: row.other_user_name,
                unread_count: row.unread_count,
                created_at,
            }
        })
        .collect())
}

/// Per-day room name for the chat's video call, derived rather than stored.
pub fn video_room_name(db: &Database, actor: &Identity, chat_id: i64) -> CoreResult<String> {
    let chat = load_for_participant(db, actor, chat_id)?;
    let day = chrono::Utc::now().format("%Y%m%d");
    Ok(format!("Pathseeker_Room_{}_{}", chat.id, day))
}
