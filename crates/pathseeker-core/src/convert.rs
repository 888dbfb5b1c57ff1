//! Row-to-model conversion. DB rows carry SQLite's text timestamps and
//! string enums; corrupt values are logged and defaulted rather than
//! propagated, matching how reads degrade elsewhere in the stack.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use pathseeker_db::models::{ChatRow, MessageRow, MomentRow, RatingRow, ReplyRow, UserRow};
use pathseeker_types::api::{MessageView, ReplyView};
use pathseeker_types::models::{Chat, Moment, MomentStatus, Rating, Role, Urgency, User};

pub fn parse_timestamp(raw: &str, what: &str, id: i64) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without a
            // timezone; parse as naive UTC and convert.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on {} {}: {}", raw, what, id, e);
            DateTime::default()
        })
}

pub fn user(row: UserRow) -> User {
    let role = Role::parse(&row.role).unwrap_or_else(|| {
        warn!("Corrupt role '{}' on user {}", row.role, row.id);
        Role::Student
    });
    let created_at = parse_timestamp(&row.created_at, "user", row.id);
    User {
        id: row.id,
        name: row.name,
        email: row.email,
        role,
        credit_points: row.credit_points,
        skills: row.skills,
        bio: row.bio,
        education: row.education,
        created_at,
    }
}

pub fn moment(row: MomentRow) -> Moment {
    let urgency = Urgency::parse(&row.urgency).unwrap_or_else(|| {
        warn!("Corrupt urgency '{}' on moment {}", row.urgency, row.id);
        Urgency::Normal
    });
    let status = MomentStatus::parse(&row.status).unwrap_or_else(|| {
        warn!("Corrupt status '{}' on moment {}", row.status, row.id);
        MomentStatus::Open
    });
    let created_at = parse_timestamp(&row.created_at, "moment", row.id);
    Moment {
        id: row.id,
        author_id: row.author_id,
        title: row.title,
        description: row.description,
        background: row.background,
        urgency,
        status,
        created_at,
    }
}

pub fn reply_view(row: ReplyRow) -> ReplyView {
    let created_at = parse_timestamp(&row.created_at, "reply", row.id);
    ReplyView {
        id: row.id,
        mentor_id: row.mentor_id,
        mentor_name: row.mentor_name,
        decision_made: row.decision_made,
        content: row.content,
        mistake_warning: row.mistake_warning,
        created_at,
    }
}

pub fn rating(row: RatingRow) -> Rating {
    let created_at = parse_timestamp(&row.created_at, "rating", row.id);
    Rating {
        id: row.id,
        student_id: row.student_id,
        mentor_id: row.mentor_id,
        reply_id: row.reply_id,
        value: row.value,
        created_at,
    }
}

pub fn chat(row: ChatRow) -> Chat {
    let created_at = parse_timestamp(&row.created_at, "chat", row.id);
    Chat {
        id: row.id,
        student_id: row.student_id,
        mentor_id: row.mentor_id,
        created_at,
    }
}

pub fn message_view(row: MessageRow, viewer_id: i64) -> MessageView {
    let created_at = parse_timestamp(&row.created_at, "message", row.id);
    MessageView {
        id: row.id,
        chat_id: row.chat_id,
        sender_id: row.sender_id,
        is_mine: row.sender_id == viewer_id,
        sender_name: row.sender_name,
        content: row.content,
        is_read: row.is_read,
        created_at,
    }
}
