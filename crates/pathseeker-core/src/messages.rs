//! Ordered message storage, read-state transitions and notification
//! aggregation. Viewing a chat flips the other side's unread messages to
//! read in one batch; polling notifications never does.

use pathseeker_db::Database;
use pathseeker_types::api::{MessageView, NotificationItem, Notifications};
use pathseeker_types::models::Identity;

use crate::error::{CoreError, CoreResult};
use crate::{chat, convert};

/// Longest notification preview, in characters, before "..." is appended.
const PREVIEW_CHARS: usize = 50;
/// Most items a notification poll returns; the unread count is not capped.
const NOTIFICATION_LIMIT: usize = 5;

pub fn send(db: &Database, actor: &Identity, chat_id: i64, content: &str) -> CoreResult<MessageView> {
    let chat_row = chat::load_for_participant(db, actor, chat_id)?;
    let content = content.trim();
    if content.is_empty() {
        return Err(CoreError::InvalidInput("Message cannot be empty"));
    }
    let row = db.insert_message(chat_row.id, actor.user_id, content)?;
    Ok(convert::message_view(row, actor.user_id))
}

/// All messages of the chat, oldest first. As a side effect, everything the
/// other participant sent that the viewer had not read yet is marked read
/// before the list is built, so the returned rows reflect the flip.
pub fn list_messages(db: &Database, actor: &Identity, chat_id: i64) -> CoreResult<Vec<MessageView>> {
    let chat_row = chat::load_for_participant(db, actor, chat_id)?;
    let other = chat::other_participant(&chat_row, actor);
    db.mark_read_from(chat_id, other)?;

    let rows = db.messages_for_chat(chat_id)?;
    Ok(rows.into_iter().map(|row| convert::message_view(row, actor.user_id)).collect())
}

pub fn unread_count(db: &Database, actor: &Identity, chat_id: i64) -> CoreResult<i64> {
    chat::load_for_participant(db, actor, chat_id)?;
    Ok(db.unread_count(chat_id, actor.user_id)?)
}

/// Unread messages addressed to the viewer across all their chats, newest
/// first, capped at five preview items. Pure read: polling this endpoint
/// must not mark anything read.
pub fn notifications(db: &Database, actor: &Identity) -> CoreResult<Notifications> {
    let rows = db.unread_for_user(actor.user_id)?;
    let unread_count = rows.len() as i64;

    let notifications = rows
        .into_iter()
        .take(NOTIFICATION_LIMIT)
        .map(|row| {
            let created_at = convert::parse_timestamp(&row.created_at, "message", row.id);
            NotificationItem {
                id: row.id,
                chat_id: row.chat_id,
                sender_name: row.sender_name,
                content: preview(&row.content),
                created_at,
            }
        })
        .collect();

    Ok(Notifications { unread_count, notifications })
}

fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathseeker_types::models::Role;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn add_user(db: &Database, name: &str, email: &str, role: &str) -> i64 {
        db.create_user(name, email, "hash", role, None, None, None)
            .unwrap()
            .unwrap()
            .id
    }

    fn student(id: i64) -> Identity {
        Identity { user_id: id, role: Role::Student }
    }

    fn mentor(id: i64) -> Identity {
        Identity { user_id: id, role: Role::Mentor }
    }

    fn fixture(db: &Database) -> (i64, i64, i64) {
        let s = add_user(db, "Stu", "stu@x.io", "student");
        let m = add_user(db, "Mia", "mia@x.io", "mentor");
        let (chat_row, _) = db.get_or_create_chat(s, m).unwrap();
        (s, m, chat_row.id)
    }

    #[test]
    fn empty_messages_are_rejected() {
        let db = test_db();
        let (s, _m, chat_id) = fixture(&db);
        assert!(matches!(
            send(&db, &student(s), chat_id, "   \n "),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn content_is_stored_trimmed() {
        let db = test_db();
        let (s, _m, chat_id) = fixture(&db);
        let view = send(&db, &student(s), chat_id, "  hello there  ").unwrap();
        assert_eq!(view.content, "hello there");
        assert!(view.is_mine);
        assert!(!view.is_read);
    }

    #[test]
    fn recipient_listing_marks_only_the_other_sides_messages() {
        let db = test_db();
        let (s, m, chat_id) = fixture(&db);
        send(&db, &mentor(m), chat_id, "from mentor").unwrap();
        send(&db, &student(s), chat_id, "from student").unwrap();

        // The student views the chat: the mentor's message flips to read,
        // the student's own stays unread for the mentor
        let seen = list_messages(&db, &student(s), chat_id).unwrap();
        let from_mentor = seen.iter().find(|v| v.sender_id == m).unwrap();
        let from_student = seen.iter().find(|v| v.sender_id == s).unwrap();
        assert!(from_mentor.is_read);
        assert!(!from_student.is_read);

        assert_eq!(unread_count(&db, &student(s), chat_id).unwrap(), 0);
        assert_eq!(unread_count(&db, &mentor(m), chat_id).unwrap(), 1);
    }

    #[test]
    fn sender_listing_does_not_flip_their_own_unread() {
        let db = test_db();
        let (s, m, chat_id) = fixture(&db);
        send(&db, &student(s), chat_id, "hello?").unwrap();

        // The sender polls the chat: their message stays unread
        list_messages(&db, &student(s), chat_id).unwrap();
        assert_eq!(unread_count(&db, &mentor(m), chat_id).unwrap(), 1);
    }

    #[test]
    fn messages_come_back_oldest_first() {
        let db = test_db();
        let (s, m, chat_id) = fixture(&db);
        let first = send(&db, &student(s), chat_id, "one").unwrap().id;
        let second = send(&db, &mentor(m), chat_id, "two").unwrap().id;
        let third = send(&db, &student(s), chat_id, "three").unwrap().id;

        let ids: Vec<i64> = list_messages(&db, &student(s), chat_id)
            .unwrap()
            .iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, vec![first, second, third]);
    }

    #[test]
    fn notifications_cap_items_but_not_the_count() {
        let db = test_db();
        let s = add_user(&db, "Stu", "stu@x.io", "student");
        let m1 = add_user(&db, "Mia", "mia@x.io", "mentor");
        let m2 = add_user(&db, "Mo", "mo@x.io", "mentor");
        let (chat1, _) = db.get_or_create_chat(s, m1).unwrap();
        let (chat2, _) = db.get_or_create_chat(s, m2).unwrap();

        for i in 0..4 {
            send(&db, &mentor(m1), chat1.id, &format!("m1 says {}", i)).unwrap();
        }
        send(&db, &mentor(m2), chat2.id, "m2 says 0").unwrap();
        let last = send(&db, &mentor(m2), chat2.id, "m2 says 1").unwrap().id;

        let got = notifications(&db, &student(s)).unwrap();
        assert_eq!(got.unread_count, 6);
        assert_eq!(got.notifications.len(), 5);
        // Newest first
        assert_eq!(got.notifications[0].id, last);

        // Polling did not flip anything
        let again = notifications(&db, &student(s)).unwrap();
        assert_eq!(again.unread_count, 6);
    }

    #[test]
    fn notifications_skip_messages_the_viewer_sent() {
        let db = test_db();
        let (s, m, chat_id) = fixture(&db);
        send(&db, &student(s), chat_id, "mine").unwrap();
        send(&db, &mentor(m), chat_id, "theirs").unwrap();

        let got = notifications(&db, &student(s)).unwrap();
        assert_eq!(got.unread_count, 1);
        assert_eq!(got.notifications[0].content, "theirs");
    }

    #[test]
    fn long_previews_are_truncated_with_ellipsis() {
        let db = test_db();
        let (s, m, chat_id) = fixture(&db);
        let long = "x".repeat(80);
        send(&db, &mentor(m), chat_id, &long).unwrap();
        send(&db, &mentor(m), chat_id, "short").unwrap();

        let got = notifications(&db, &student(s)).unwrap();
        let texts: Vec<&str> = got.notifications.iter().map(|n| n.content.as_str()).collect();
        assert!(texts.contains(&"short"));
        let truncated = texts.iter().find(|t| t.len() > 5).unwrap();
        assert_eq!(truncated.chars().count(), 53);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn preview_respects_char_boundaries() {
        assert_eq!(preview("héllo"), "héllo");
        let long: String = "é".repeat(60);
        let p = preview(&long);
        assert_eq!(p.chars().count(), 53);
    }
}
