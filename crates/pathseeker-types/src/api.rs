use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Moment, Rating, Role, Urgency};

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: Role,
    pub education: Option<String>,
    pub skills: Option<String>,
    pub bio: Option<String>,
}

fn default_role() -> Role {
    Role::Student
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user_id: i64,
    pub name: String,
    pub role: Role,
    pub token: String,
}

// -- Moments --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMomentRequest {
    pub title: String,
    pub description: String,
    pub background: Option<String>,
    pub urgency: Option<Urgency>,
}

#[derive(Debug, Serialize)]
pub struct CreateMomentResponse {
    pub moment: Moment,
    /// Resolved moments with similar titles, surfaced immediately so the
    /// author has something to read while waiting for replies.
    pub similar: Vec<Moment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyView {
    pub id: i64,
    pub mentor_id: i64,
    pub mentor_name: String,
    pub decision_made: String,
    pub content: String,
    pub mistake_warning: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MomentDetail {
    pub moment: Moment,
    pub author_name: String,
    pub replies: Vec<ReplyView>,
    /// Reply ids the viewer has already rated; only populated when the
    /// viewer is the moment's author.
    pub rated_reply_ids: Vec<i64>,
    pub similar: Vec<Moment>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostReplyRequest {
    pub decision_made: String,
    pub content: String,
    pub mistake_warning: Option<String>,
}

// -- Ratings --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateReplyRequest {
    pub value: i64,
}

#[derive(Debug, Serialize)]
pub struct RateReplyResponse {
    pub rating: Rating,
}

// -- Mentors & profile --

#[derive(Debug, Deserialize)]
pub struct MentorSearchQuery {
    #[serde(default)]
    pub name_q: String,
    #[serde(default)]
    pub domain_q: String,
}

#[derive(Debug, Serialize)]
pub struct MentorProfile {
    pub id: i64,
    pub name: String,
    pub skills: Option<String>,
    pub bio: Option<String>,
    pub education: Option<String>,
    pub credit_points: i64,
    pub average_rating: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub education: Option<String>,
    pub skills: Option<String>,
    pub bio: Option<String>,
}

// -- Chats & messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StartChatRequest {
    pub mentor_id: i64,
}

#[derive(Debug, Serialize)]
pub struct ChatSummary {
    pub id: i64,
    pub other_user_id: i64,
    pub other_user_name: String,
    pub unread_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub id: i64,
    pub chat_id: i64,
    pub sender_id: i64,
    pub sender_name: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub is_mine: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationItem {
    pub id: i64,
    pub chat_id: i64,
    pub sender_name: String,
    /// Preview of the message body, at most 50 characters plus "...".
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct Notifications {
    pub unread_count: i64,
    pub notifications: Vec<NotificationItem>,
}

#[derive(Debug, Serialize)]
pub struct VideoRoomResponse {
    pub room_name: String,
}

// -- Advice assistant --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdviceRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    pub response: String,
}
