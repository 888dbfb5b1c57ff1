/// Database row types — these map directly to SQLite rows.
/// Distinct from the pathseeker-types API models to keep the DB layer
/// independent; timestamps stay in SQLite's text format here.

pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub credit_points: i64,
    pub skills: Option<String>,
    pub bio: Option<String>,
    pub education: Option<String>,
    pub created_at: String,
}

pub struct MomentRow {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub description: String,
    pub background: Option<String>,
    pub urgency: String,
    pub status: String,
    pub created_at: String,
}

pub struct ReplyRow {
    pub id: i64,
    pub moment_id: i64,
    pub mentor_id: i64,
    pub mentor_name: String,
    pub decision_made: String,
    pub content: String,
    pub mistake_warning: Option<String>,
    pub created_at: String,
}

pub struct RatingRow {
    pub id: i64,
    pub student_id: i64,
    pub mentor_id: i64,
    pub reply_id: i64,
    pub value: i64,
    pub created_at: String,
}

pub struct ChatRow {
    pub id: i64,
    pub student_id: i64,
    pub mentor_id: i64,
    pub created_at: String,
}

/// Chat listing row: the other participant and the viewer's unread count
/// come from the same query.
pub struct ChatSummaryRow {
    pub id: i64,
    pub other_user_id: i64,
    pub other_user_name: String,
    pub unread_count: i64,
    pub created_at: String,
}

pub struct MessageRow {
    pub id: i64,
    pub chat_id: i64,
    pub sender_id: i64,
    pub sender_name: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: String,
}
