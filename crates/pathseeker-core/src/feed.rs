//! Which moments a viewer sees, and in what order. Ordering is decided by
//! the store (urgent first, newest first, insertion order on ties) so every
//! caller renders the same sequence.

use pathseeker_db::Database;
use pathseeker_types::api::MomentDetail;
use pathseeker_types::models::{Identity, Moment, Role};

use crate::error::{CoreError, CoreResult};
use crate::{convert, similar};

/// The global feed of open moments. Mentors do not see moments they have
/// already replied to; students see the full open set.
pub fn list_feed(db: &Database, viewer: &Identity) -> CoreResult<Vec<Moment>> {
    let exclude = match viewer.role {
        Role::Mentor => Some(viewer.user_id),
        Role::Student => None,
    };
    let rows = db.open_moments(exclude)?;
    Ok(rows.into_iter().map(convert::moment).collect())
}

/// Moments the student authored plus moments they replied to, newest first.
pub fn student_dashboard(db: &Database, viewer: &Identity) -> CoreResult<Vec<Moment>> {
    let rows = db.moments_involving(viewer.user_id)?;
    Ok(rows.into_iter().map(convert::moment).collect())
}

/// Moments the mentor has contributed a reply to, newest first.
pub fn mentor_dashboard(db: &Database, viewer: &Identity) -> CoreResult<Vec<Moment>> {
    let rows = db.moments_replied_by(viewer.user_id)?;
    Ok(rows.into_iter().map(convert::moment).collect())
}

/// Full moment view: replies, which of them the viewer already rated, and
/// similar resolved moments. Mentors can view everything; students only
/// their own moments.
pub fn view_moment(db: &Database, viewer: &Identity, moment_id: i64) -> CoreResult<MomentDetail> {
    let row = db.get_moment(moment_id)?.ok_or(CoreError::NotFound("moment"))?;
    if viewer.role != Role::Mentor && row.author_id != viewer.user_id {
        return Err(CoreError::PermissionDenied(
            "You do not have permission to view this moment",
        ));
    }

    let author_name = db
        .get_user_by_id(row.author_id)?
        .map(|u| u.name)
        .unwrap_or_else(|| "unknown".to_string());

    let replies = db
        .replies_for_moment(moment_id)?
        .into_iter()
        .map(convert::reply_view)
        .collect();

    let rated_reply_ids = if row.author_id == viewer.user_id {
        db.rated_reply_ids(viewer.user_id)?
    } else {
        Vec::new()
    };

    let similar = similar::find_similar(db, &row.title, Some(moment_id), similar::DEFAULT_LIMIT)?;

    Ok(MomentDetail {
        moment: convert::moment(row),
        author_name,
        replies,
        rated_reply_ids,
        similar,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathseeker_types::models::MomentStatus;

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

    #[test]
    fn mentor_feed_hides_already_answered_moments() {
        let db = test_db();
        let s = add_user(&db, "Stu", "stu@x.io", "student");
        let m = add_user(&db, "Mia", "mia@x.io", "mentor");
        let a = db.insert_moment(s, "first", "d", None, "Normal").unwrap().id;
        let b = db.insert_moment(s, "second", "d", None, "Normal").unwrap().id;

        let feed = list_feed(&db, &mentor(m)).unwrap();
        assert_eq!(feed.iter().filter(|x| x.id == a).count(), 1);

        db.insert_reply(a, m, "decision", "story", None).unwrap();

        let feed = list_feed(&db, &mentor(m)).unwrap();
        assert!(feed.iter().all(|x| x.id != a));
        assert!(feed.iter().any(|x| x.id == b));

        // The student still sees both
        let feed = list_feed(&db, &student(s)).unwrap();
        assert_eq!(feed.len(), 2);
    }

    #[test]
    fn feed_puts_urgent_before_normal_and_hides_resolved() {
        let db = test_db();
        let s = add_user(&db, "Stu", "stu@x.io", "student");
        let normal = db.insert_moment(s, "normal", "d", None, "Normal").unwrap().id;
        let urgent = db.insert_moment(s, "urgent", "d", None, "Urgent").unwrap().id;
        let resolved = db.insert_moment(s, "done", "d", None, "Normal").unwrap().id;
        db.set_moment_status(resolved, "Resolved").unwrap();

        let feed = list_feed(&db, &student(s)).unwrap();
        let ids: Vec<i64> = feed.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![urgent, normal]);
    }

    #[test]
    fn view_moment_is_author_or_mentor_only() {
        let db = test_db();
        let author = add_user(&db, "Stu", "stu@x.io", "student");
        let other = add_user(&db, "Sam", "sam@x.io", "student");
        let m = add_user(&db, "Mia", "mia@x.io", "mentor");
        let id = db.insert_moment(author, "title", "d", None, "Normal").unwrap().id;

        assert!(view_moment(&db, &student(author), id).is_ok());
        assert!(view_moment(&db, &mentor(m), id).is_ok());
        assert!(matches!(
            view_moment(&db, &student(other), id),
            Err(CoreError::PermissionDenied(_))
        ));
        assert!(matches!(
            view_moment(&db, &student(author), 9999),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn dashboards_split_by_involvement() {
        let db = test_db();
        let s = add_user(&db, "Stu", "stu@x.io", "student");
        let m = add_user(&db, "Mia", "mia@x.io", "mentor");
        let own = db.insert_moment(s, "mine", "d", None, "Normal").unwrap().id;
        let other_author = add_user(&db, "Sam", "sam@x.io", "student");
        let answered = db.insert_moment(other_author, "theirs", "d", None, "Normal").unwrap().id;
        db.insert_reply(answered, m, "decision", "story", None).unwrap();

        let mine = student_dashboard(&db, &student(s)).unwrap();
        assert_eq!(mine.iter().map(|x| x.id).collect::<Vec<_>>(), vec![own]);

        let contributions = mentor_dashboard(&db, &mentor(m)).unwrap();
        assert_eq!(contributions.iter().map(|x| x.id).collect::<Vec<_>>(), vec![answered]);
        assert_eq!(contributions[0].status, MomentStatus::Open);
    }
}
