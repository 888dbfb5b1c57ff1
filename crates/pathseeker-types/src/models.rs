use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Mentor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Mentor => "mentor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Role::Student),
            "mentor" => Some(Role::Mentor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    Normal,
    Urgent,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Normal => "Normal",
            Urgency::Urgent => "Urgent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Normal" => Some(Urgency::Normal),
            "Urgent" => Some(Urgency::Urgent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MomentStatus {
    Open,
    Resolved,
}

impl MomentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MomentStatus::Open => "Open",
            MomentStatus::Resolved => "Resolved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Open" => Some(MomentStatus::Open),
            "Resolved" => Some(MomentStatus::Resolved),
            _ => None,
        }
    }
}

/// The authenticated identity attached to every request. The API layer
/// derives it from the bearer token; the core trusts it and performs its
/// own per-entity authorization on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub role: Role,
}

/// API-facing user. The password hash never leaves pathseeker-db.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub credit_points: i64,
    pub skills: Option<String>,
    pub bio: Option<String>,
    pub education: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Moment {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub description: String,
    pub background: Option<String>,
    pub urgency: Urgency,
    pub status: MomentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: i64,
    pub student_id: i64,
    pub mentor_id: i64,
    pub reply_id: i64,
    pub value: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub student_id: i64,
    pub mentor_id: i64,
    pub created_at: DateTime<Utc>,
}
