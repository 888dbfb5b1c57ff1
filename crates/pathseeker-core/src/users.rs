//! Mentor discovery and profile management.

use pathseeker_db::Database;
use pathseeker_types::api::{MentorProfile, UpdateProfileRequest};
use pathseeker_types::models::{Identity, Role, User};

use crate::error::{CoreError, CoreResult};
use crate::{convert, ratings};

/// Search mentors by name and/or skill domain. The name match is a
/// case-sensitive substring; the domain match is case-insensitive against
/// the comma-separated skills field. No query terms means no results, not
/// the full directory.
pub fn search_mentors(db: &Database, name_q: &str, domain_q: &str) -> CoreResult<Vec<MentorProfile>> {
    if name_q.is_empty() && domain_q.is_empty() {
        return Ok(Vec::new());
    }
    let domain_q = domain_q.to_lowercase();

    let mut out = Vec::new();
    for row in db.mentors()? {
        if !name_q.is_empty() && !row.name.contains(name_q) {
            continue;
        }
        if !domain_q.is_empty() {
            let skills = row.skills.as_deref().unwrap_or("").to_lowercase();
            if !skills.contains(&domain_q) {
                continue;
            }
        }
        let average_rating = ratings::average_rating(db, row.id)?;
        out.push(MentorProfile {
            id: row.id,
            name: row.name,
            skills: row.skills,
            bio: row.bio,
            education: row.education,
            credit_points: row.credit_points,
            average_rating,
        });
    }
    Ok(out)
}

pub fn mentor_profile(db: &Database, mentor_id: i64) -> CoreResult<MentorProfile> {
    let row = db.get_user_by_id(mentor_id)?.ok_or(CoreError::NotFound("user"))?;
    if row.role != Role::Mentor.as_str() {
        return Err(CoreError::InvalidInput("This user is not a mentor"));
    }
    let average_rating = ratings::average_rating(db, row.id)?;
    Ok(MentorProfile {
        id: row.id,
        name: row.name,
        skills: row.skills,
        bio: row.bio,
        education: row.education,
        credit_points: row.credit_points,
        average_rating,
    })
}

/// Apply a partial profile edit. Email changes re-run the uniqueness check
/// at the store; skills and bio only stick for mentors. Role and credit
/// points are never editable here.
pub fn update_profile(db: &Database, actor: &Identity, req: &UpdateProfileRequest) -> CoreResult<User> {
    let current = db.get_user_by_id(actor.user_id)?.ok_or(CoreError::NotFound("user"))?;

    let name = req.name.as_deref().unwrap_or(&current.name);
    let email = req.email.as_deref().unwrap_or(&current.email);
    if name.trim().is_empty() {
        return Err(CoreError::InvalidInput("Name cannot be empty"));
    }
    if email.trim().is_empty() {
        return Err(CoreError::InvalidInput("Email cannot be empty"));
    }
    let education = req.education.as_deref().or(current.education.as_deref());

    let (skills, bio) = if current.role == Role::Mentor.as_str() {
        (
            req.skills.as_deref().or(current.skills.as_deref()),
            req.bio.as_deref().or(current.bio.as_deref()),
        )
    } else {
        (current.skills.as_deref(), current.bio.as_deref())
    };

    let updated = db.update_profile(actor.user_id, name, email, education, skills, bio)?;
    if !updated {
        return Err(CoreError::AlreadyExists(
            "This email is already registered with another account",
        ));
    }

    let row = db
        .get_user_by_id(actor.user_id)?
        .ok_or_else(|| anyhow::anyhow!("user {} vanished during profile update", actor.user_id))?;
    Ok(convert::user(row))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn add_mentor(db: &Database, name: &str, email: &str, skills: &str) -> i64 {
        db.create_user(name, email, "hash", "mentor", Some("Graduate"), Some(skills), None)
            .unwrap()
            .unwrap()
            .id
    }

    #[test]
    fn name_search_is_case_sensitive_but_skills_are_not() {
        let db = test_db();
        add_mentor(&db, "alice", "alice@x.io", "rust, go");
        let ali = add_mentor(&db, "Alina", "alina@x.io", "python");

        // "Ali" does not match lowercase "alice"
        let by_name = search_mentors(&db, "Ali", "").unwrap();
        assert_eq!(by_name.iter().map(|m| m.id).collect::<Vec<_>>(), vec![ali]);

        // skills match ignores case
        let by_domain = search_mentors(&db, "", "RUST").unwrap();
        assert_eq!(by_domain.len(), 1);
        assert_eq!(by_domain[0].name, "alice");
    }

    #[test]
    fn empty_search_returns_nothing() {
        let db = test_db();
        add_mentor(&db, "alice", "alice@x.io", "rust");
        assert!(search_mentors(&db, "", "").unwrap().is_empty());
    }

    #[test]
    fn mentor_profile_rejects_non_mentors() {
        let db = test_db();
        let s = db
            .create_user("Stu", "stu@x.io", "hash", "student", None, None, None)
            .unwrap()
            .unwrap()
            .id;
        assert!(matches!(
            mentor_profile(&db, s),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            mentor_profile(&db, 999),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn email_collision_on_edit_is_rejected() {
        let db = test_db();
        let a = db
            .create_user("A", "a@x.io", "hash", "student", None, None, None)
            .unwrap()
            .unwrap()
            .id;
        db.create_user("B", "b@x.io", "hash", "student", None, None, None)
            .unwrap()
            .unwrap();

        let req = UpdateProfileRequest {
            name: None,
            email: Some("b@x.io".into()),
            education: None,
            skills: None,
            bio: None,
        };
        let actor = Identity { user_id: a, role: Role::Student };
        assert!(matches!(
            update_profile(&db, &actor, &req),
            Err(CoreError::AlreadyExists(_))
        ));
    }

    #[test]
    fn students_cannot_sneak_in_mentor_fields() {
        let db = test_db();
        let a = db
            .create_user("A", "a@x.io", "hash", "student", None, None, None)
            .unwrap()
            .unwrap()
            .id;
        let req = UpdateProfileRequest {
            name: Some("A2".into()),
            email: None,
            education: Some("Graduate".into()),
            skills: Some("rust".into()),
            bio: Some("hi".into()),
        };
        let actor = Identity { user_id: a, role: Role::Student };
        let user = update_profile(&db, &actor, &req).unwrap();
        assert_eq!(user.name, "A2");
        assert_eq!(user.education.as_deref(), Some("Graduate"));
        assert!(user.skills.is_none());
        assert!(user.bio.is_none());
    }
}
