use crate::Database;
use crate::models::{ChatRow, ChatSummaryRow, MessageRow, MomentRow, RatingRow, ReplyRow, UserRow};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};

impl Database {
    // -- Users --

    /// Returns `None` when the email is already registered. The UNIQUE
    /// constraint is the authority, so two concurrent registrations for the
    /// same email cannot both succeed.
    pub fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
        education: Option<&str>,
        skills: Option<&str>,
        bio: Option<&str>,
    ) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (name, email, password, role, education, skills, bio)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![name, email, password_hash, role, education, skills, bio],
            );
            match inserted {
                Ok(_) => {}
                Err(e) if is_unique_violation(&e) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
            let id = conn.last_insert_rowid();
            Ok(Some(query_user_by_id(conn, id)?.ok_or_else(|| anyhow!("user {} missing after insert", id))?))
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{USER_COLS} WHERE email = ?1"))?;
            stmt.query_row([email], map_user).optional()
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    /// Full-row profile update; partial edits are composed by the caller.
    /// Returns `false` when the new email collides with another account.
    pub fn update_profile(
        &self,
        id: i64,
        name: &str,
        email: &str,
        education: Option<&str>,
        skills: Option<&str>,
        bio: Option<&str>,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE users SET name = ?1, email = ?2, education = ?3, skills = ?4, bio = ?5
                 WHERE id = ?6",
                params![name, email, education, skills, bio, id],
            );
            match updated {
                Ok(_) => Ok(true),
                Err(e) if is_unique_violation(&e) => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn mentors(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{USER_COLS} WHERE role = 'mentor' ORDER BY id ASC"))?;
            let rows = stmt.query_map([], map_user)?.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    // -- Moments --

    pub fn insert_moment(
        &self,
        author_id: i64,
        title: &str,
        description: &str,
        background: Option<&str>,
        urgency: &str,
    ) -> Result<MomentRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO moments (author_id, title, description, background, urgency)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![author_id, title, description, background, urgency],
            )?;
            let id = conn.last_insert_rowid();
            query_moment(conn, id)?.ok_or_else(|| anyhow!("moment {} missing after insert", id))
        })
    }

    pub fn get_moment(&self, id: i64) -> Result<Option<MomentRow>> {
        self.with_conn(|conn| query_moment(conn, id))
    }

    /// Global feed: open moments, urgent first, newest first, insertion
    /// order on equal timestamps. `exclude_replier` hides moments the given
    /// user has already replied to.
    pub fn open_moments(&self, exclude_replier: Option<i64>) -> Result<Vec<MomentRow>> {
        self.with_conn(|conn| match exclude_replier {
            Some(user_id) => {
                let mut stmt = conn.prepare(&format!(
                    "{MOMENT_COLS} WHERE status != 'Resolved'
                       AND id NOT IN (SELECT moment_id FROM replies WHERE mentor_id = ?1)
                     ORDER BY (urgency = 'Urgent') DESC, created_at DESC, id ASC"
                ))?;
                let rows = stmt.query_map([user_id], map_moment)?.collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "{MOMENT_COLS} WHERE status != 'Resolved'
                     ORDER BY (urgency = 'Urgent') DESC, created_at DESC, id ASC"
                ))?;
                let rows = stmt.query_map([], map_moment)?.collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            }
        })
    }

    /// Student dashboard set: moments the user authored or replied to,
    /// de-duplicated by the query itself.
    pub fn moments_involving(&self, user_id: i64) -> Result<Vec<MomentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{MOMENT_COLS}
                 WHERE author_id = ?1
                    OR id IN (SELECT moment_id FROM replies WHERE mentor_id = ?1)
                 ORDER BY created_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map([user_id], map_moment)?.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// Mentor dashboard set: moments the user has replied to.
    pub fn moments_replied_by(&self, user_id: i64) -> Result<Vec<MomentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{MOMENT_COLS}
                 WHERE id IN (SELECT moment_id FROM replies WHERE mentor_id = ?1)
                 ORDER BY created_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map([user_id], map_moment)?.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// Similarity corpus: resolved moments in insertion order.
    pub fn resolved_moments(&self) -> Result<Vec<MomentRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("{MOMENT_COLS} WHERE status != 'Open' ORDER BY id ASC"))?;
            let rows = stmt.query_map([], map_moment)?.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    pub fn all_moments(&self) -> Result<Vec<MomentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{MOMENT_COLS} ORDER BY id ASC"))?;
            let rows = stmt.query_map([], map_moment)?.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    pub fn set_moment_status(&self, id: i64, status: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("UPDATE moments SET status = ?1 WHERE id = ?2", params![status, id])?;
            Ok(())
        })
    }

    /// Orchestrated cascade: ratings on the moment's replies, then the
    /// replies, then the moment, all in one transaction.
    pub fn delete_moment_cascade(&self, id: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM ratings WHERE reply_id IN (SELECT id FROM replies WHERE moment_id = ?1)",
                [id],
            )?;
            tx.execute("DELETE FROM replies WHERE moment_id = ?1", [id])?;
            tx.execute("DELETE FROM moments WHERE id = ?1", [id])?;
            tx.commit()?;
            Ok(())
        })
    }

    // -- Replies --

    pub fn insert_reply(
        &self,
        moment_id: i64,
        mentor_id: i64,
        decision_made: &str,
        content: &str,
        mistake_warning: Option<&str>,
    ) -> Result<ReplyRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO replies (moment_id, mentor_id, decision_made, content, mistake_warning)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![moment_id, mentor_id, decision_made, content, mistake_warning],
            )?;
            let id = conn.last_insert_rowid();
            query_reply(conn, id)?.ok_or_else(|| anyhow!("reply {} missing after insert", id))
        })
    }

    pub fn get_reply(&self, id: i64) -> Result<Option<ReplyRow>> {
        self.with_conn(|conn| query_reply(conn, id))
    }

    pub fn replies_for_moment(&self, moment_id: i64) -> Result<Vec<ReplyRow>> {
        self.with_conn(|conn| {
            // JOIN users so the mentor name comes back in a single query
            let mut stmt = conn.prepare(&format!(
                "{REPLY_COLS} WHERE r.moment_id = ?1 ORDER BY r.created_at ASC, r.id ASC"
            ))?;
            let rows = stmt.query_map([moment_id], map_reply)?.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    // -- Ratings --

    /// Insert a rating and credit the mentor as one atomic unit. Returns
    /// `None` when a rating for (student, reply) already exists — in that
    /// case nothing is written, including the credit increment. The
    /// duplicate check *is* the UNIQUE constraint; there is no racy
    /// read-then-write.
    pub fn insert_rating(
        &self,
        student_id: i64,
        mentor_id: i64,
        reply_id: i64,
        value: i64,
    ) -> Result<Option<RatingRow>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let inserted = tx.execute(
                "INSERT INTO ratings (student_id, mentor_id, reply_id, value)
                 VALUES (?1, ?2, ?3, ?4)",
                params![student_id, mentor_id, reply_id, value],
            );
            match inserted {
                Ok(_) => {}
                // Dropping the transaction rolls back, though nothing was written
                Err(e) if is_unique_violation(&e) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
            // Increment, not overwrite: retries and concurrent profile
            // edits cannot lose credit
            tx.execute(
                "UPDATE users SET credit_points = credit_points + ?1 WHERE id = ?2",
                params![value, mentor_id],
            )?;
            let id = tx.last_insert_rowid();
            let row = query_rating(&tx, id)?
                .ok_or_else(|| anyhow!("rating {} missing after insert", id))?;
            tx.commit()?;
            Ok(Some(row))
        })
    }

    /// Reply ids this student has already rated.
    pub fn rated_reply_ids(&self, student_id: i64) -> Result<Vec<i64>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT reply_id FROM ratings WHERE student_id = ?1 ORDER BY reply_id ASC")?;
            let rows = stmt
                .query_map([student_id], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    pub fn average_rating(&self, mentor_id: i64) -> Result<Option<f64>> {
        self.with_conn(|conn| {
            let avg: Option<f64> = conn.query_row(
                "SELECT AVG(value) FROM ratings WHERE mentor_id = ?1",
                [mentor_id],
                |row| row.get(0),
            )?;
            Ok(avg)
        })
    }

    // -- Chats --

    /// Atomic get-or-create on the (student, mentor) pair. The insert runs
    /// first; a UNIQUE conflict downgrades to a lookup of the row that won.
    /// Returns the chat and whether this call created it.
    pub fn get_or_create_chat(&self, student_id: i64, mentor_id: i64) -> Result<(ChatRow, bool)> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let created = match tx.execute(
                "INSERT INTO chats (student_id, mentor_id) VALUES (?1, ?2)",
                params![student_id, mentor_id],
            ) {
                Ok(_) => true,
                Err(e) if is_unique_violation(&e) => false,
                Err(e) => return Err(e.into()),
            };
            let row = tx
                .query_row(
                    "SELECT id, student_id, mentor_id, created_at FROM chats
                     WHERE student_id = ?1 AND mentor_id = ?2",
                    params![student_id, mentor_id],
                    map_chat,
                )
                .optional()?
                .ok_or_else(|| anyhow!("chat ({}, {}) missing after insert", student_id, mentor_id))?;
            tx.commit()?;
            Ok((row, created))
        })
    }

    pub fn get_chat(&self, id: i64) -> Result<Option<ChatRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, student_id, mentor_id, created_at FROM chats WHERE id = ?1")?;
            stmt.query_row([id], map_chat).optional()
        })
    }

    /// Chats where the user sits on the given side, with the other
    /// participant's name and the user's unread count.
    pub fn chats_for_user(&self, user_id: i64, as_student: bool) -> Result<Vec<ChatSummaryRow>> {
        let sql = if as_student {
            "SELECT c.id, u.id, u.name,
                    (SELECT COUNT(*) FROM messages m
                      WHERE m.chat_id = c.id AND m.is_read = 0 AND m.sender_id != ?1),
                    c.created_at
             FROM chats c JOIN users u ON u.id = c.mentor_id
             WHERE c.student_id = ?1
             ORDER BY c.created_at DESC, c.id DESC"
        } else {
            "SELECT c.id, u.id, u.name,
                    (SELECT COUNT(*) FROM messages m
                      WHERE m.chat_id = c.id AND m.is_read = 0 AND m.sender_id != ?1),
                    c.created_at
             FROM chats c JOIN users u ON u.id = c.student_id
             WHERE c.mentor_id = ?1
             ORDER BY c.created_at DESC, c.id DESC"
        };
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(ChatSummaryRow {
                        id: row.get(0)?,
                        other_user_id: row.get(1)?,
                        other_user_name: row.get(2)?,
                        unread_count: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// Orchestrated cascade: messages first, then the chat itself.
    pub fn delete_chat_cascade(&self, id: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM messages WHERE chat_id = ?1", [id])?;
            tx.execute("DELETE FROM chats WHERE id = ?1", [id])?;
            tx.commit()?;
            Ok(())
        })
    }

    // -- Messages --

    pub fn insert_message(&self, chat_id: i64, sender_id: i64, content: &str) -> Result<MessageRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (chat_id, sender_id, content) VALUES (?1, ?2, ?3)",
                params![chat_id, sender_id, content],
            )?;
            let id = conn.last_insert_rowid();
            query_message(conn, id)?.ok_or_else(|| anyhow!("message {} missing after insert", id))
        })
    }

    pub fn messages_for_chat(&self, chat_id: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{MESSAGE_COLS} WHERE m.chat_id = ?1 ORDER BY m.created_at ASC, m.id ASC"
            ))?;
            let rows = stmt.query_map([chat_id], map_message)?.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// Batch read-state flip: everything the given sender wrote into the
    /// chat that is still unread. Callers pass the *other* participant, so
    /// a viewer can never mark their own messages.
    pub fn mark_read_from(&self, chat_id: i64, sender_id: i64) -> Result<usize> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE messages SET is_read = 1
                 WHERE chat_id = ?1 AND sender_id = ?2 AND is_read = 0",
                params![chat_id, sender_id],
            )?;
            Ok(n)
        })
    }

    pub fn unread_count(&self, chat_id: i64, viewer_id: i64) -> Result<i64> {
        self.with_conn(|conn| {
            let n = conn.query_row(
                "SELECT COUNT(*) FROM messages
                 WHERE chat_id = ?1 AND is_read = 0 AND sender_id != ?2",
                params![chat_id, viewer_id],
                |row| row.get(0),
            )?;
            Ok(n)
        })
    }

    /// Unread messages across every chat the user participates in, newest
    /// first. Read-only; notification polling must not flip read state.
    pub fn unread_for_user(&self, user_id: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{MESSAGE_COLS}
                 JOIN chats c ON c.id = m.chat_id
                 WHERE (c.student_id = ?1 OR c.mentor_id = ?1)
                   AND m.sender_id != ?1
                   AND m.is_read = 0
                 ORDER BY m.created_at DESC, m.id DESC"
            ))?;
            let rows = stmt.query_map([user_id], map_message)?.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }
}

const USER_COLS: &str = "SELECT id, name, email, password, role, credit_points, skills, bio, education, created_at FROM users";
const MOMENT_COLS: &str = "SELECT id, author_id, title, description, background, urgency, status, created_at FROM moments";
const REPLY_COLS: &str = "SELECT r.id, r.moment_id, r.mentor_id, u.name, r.decision_made, r.content, r.mistake_warning, r.created_at
     FROM replies r JOIN users u ON u.id = r.mentor_id";
const MESSAGE_COLS: &str = "SELECT m.id, m.chat_id, m.sender_id, u.name, m.content, m.is_read, m.created_at
     FROM messages m JOIN users u ON u.id = m.sender_id";

fn map_user(row: &rusqlite::Row) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        role: row.get(4)?,
        credit_points: row.get(5)?,
        skills: row.get(6)?,
        bio: row.get(7)?,
        education: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn map_moment(row: &rusqlite::Row) -> rusqlite::Result<MomentRow> {
    Ok(MomentRow {
        id: row.get(0)?,
        author_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        background: row.get(4)?,
        urgency: row.get(5)?,
        status: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn map_reply(row: &rusqlite::Row) -> rusqlite::Result<ReplyRow> {
    Ok(ReplyRow {
        id: row.get(0)?,
        moment_id: row.get(1)?,
        mentor_id: row.get(2)?,
        mentor_name: row.get(3)?,
        decision_made: row.get(4)?,
        content: row.get(5)?,
        mistake_warning: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn map_rating(row: &rusqlite::Row) -> rusqlite::Result<RatingRow> {
    Ok(RatingRow {
        id: row.get(0)?,
        student_id: row.get(1)?,
        mentor_id: row.get(2)?,
        reply_id: row.get(3)?,
        value: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn map_chat(row: &rusqlite::Row) -> rusqlite::Result<ChatRow> {
    Ok(ChatRow {
        id: row.get(0)?,
        student_id: row.get(1)?,
        mentor_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn map_message(row: &rusqlite::Row) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        chat_id: row.get(1)?,
        sender_id: row.get(2)?,
        sender_name: row.get(3)?,
        content: row.get(4)?,
        is_read: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!("{USER_COLS} WHERE id = ?1"))?;
    stmt.query_row([id], map_user).optional()
}

fn query_moment(conn: &Connection, id: i64) -> Result<Option<MomentRow>> {
    let mut stmt = conn.prepare(&format!("{MOMENT_COLS} WHERE id = ?1"))?;
    stmt.query_row([id], map_moment).optional()
}

fn query_reply(conn: &Connection, id: i64) -> Result<Option<ReplyRow>> {
    let mut stmt = conn.prepare(&format!("{REPLY_COLS} WHERE r.id = ?1"))?;
    stmt.query_row([id], map_reply).optional()
}

fn query_rating(conn: &Connection, id: i64) -> Result<Option<RatingRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, student_id, mentor_id, reply_id, value, created_at FROM ratings WHERE id = ?1",
    )?;
    stmt.query_row([id], map_rating).optional()
}

fn query_message(conn: &Connection, id: i64) -> Result<Option<MessageRow>> {
    let mut stmt = conn.prepare(&format!("{MESSAGE_COLS} WHERE m.id = ?1"))?;
    stmt.query_row([id], map_message).optional()
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn add_user(db: &Database, name: &str, email: &str, role: &str) -> i64 {
        db.create_user(name, email, "hash", role, None, None, None)
            .unwrap()
            .expect("email free")
            .id
    }

    fn add_moment(db: &Database, author: i64, title: &str) -> i64 {
        db.insert_moment(author, title, "desc", None, "Normal").unwrap().id
    }

    #[test]
    fn duplicate_email_rejected() {
        let db = test_db();
        add_user(&db, "Ana", "ana@x.io", "student");
        let dup = db
            .create_user("Other", "ana@x.io", "hash", "mentor", None, None, None)
            .unwrap();
        assert!(dup.is_none());
    }

    #[test]
    fn rating_is_unique_per_student_and_reply() {
        let db = test_db();
        let student = add_user(&db, "Stu", "stu@x.io", "student");
        let mentor = add_user(&db, "Mia", "mia@x.io", "mentor");
        let moment = add_moment(&db, student, "internship?");
        let reply = db.insert_reply(moment, mentor, "took it", "story", None).unwrap();

        let first = db.insert_rating(student, mentor, reply.id, 4).unwrap();
        assert!(first.is_some());
        assert_eq!(db.get_user_by_id(mentor).unwrap().unwrap().credit_points, 4);

        // Second insert loses on the UNIQUE constraint and credits nothing
        let second = db.insert_rating(student, mentor, reply.id, 5).unwrap();
        assert!(second.is_none());
        assert_eq!(db.get_user_by_id(mentor).unwrap().unwrap().credit_points, 4);
    }

    #[test]
    fn chat_pair_is_get_or_create() {
        let db = test_db();
        let student = add_user(&db, "Stu", "stu@x.io", "student");
        let mentor = add_user(&db, "Mia", "mia@x.io", "mentor");

        let (first, created) = db.get_or_create_chat(student, mentor).unwrap();
        assert!(created);
        let (second, created) = db.get_or_create_chat(student, mentor).unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);

        let count: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM chats", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn moment_delete_cascades_to_replies_and_ratings() {
        let db = test_db();
        let student = add_user(&db, "Stu", "stu@x.io", "student");
        let mentor = add_user(&db, "Mia", "mia@x.io", "mentor");
        let moment = add_moment(&db, student, "quit my job?");
        let reply = db.insert_reply(moment, mentor, "stayed", "story", None).unwrap();
        db.insert_rating(student, mentor, reply.id, 3).unwrap();

        db.delete_moment_cascade(moment).unwrap();

        assert!(db.get_moment(moment).unwrap().is_none());
        assert!(db.replies_for_moment(moment).unwrap().is_empty());
        assert!(db.rated_reply_ids(student).unwrap().is_empty());
    }

    #[test]
    fn chat_delete_cascades_to_messages() {
        let db = test_db();
        let student = add_user(&db, "Stu", "stu@x.io", "student");
        let mentor = add_user(&db, "Mia", "mia@x.io", "mentor");
        let (chat, _) = db.get_or_create_chat(student, mentor).unwrap();
        db.insert_message(chat.id, student, "hello").unwrap();
        db.insert_message(chat.id, mentor, "hi").unwrap();

        db.delete_chat_cascade(chat.id).unwrap();

        assert!(db.get_chat(chat.id).unwrap().is_none());
        assert!(db.messages_for_chat(chat.id).unwrap().is_empty());
    }

    #[test]
    fn mark_read_only_touches_the_given_sender() {
        let db = test_db();
        let student = add_user(&db, "Stu", "stu@x.io", "student");
        let mentor = add_user(&db, "Mia", "mia@x.io", "mentor");
        let (chat, _) = db.get_or_create_chat(student, mentor).unwrap();
        db.insert_message(chat.id, student, "from student").unwrap();
        db.insert_message(chat.id, mentor, "from mentor").unwrap();

        // The student views the chat: only the mentor's messages flip
        db.mark_read_from(chat.id, mentor).unwrap();

        let messages = db.messages_for_chat(chat.id).unwrap();
        let from_student = messages.iter().find(|m| m.sender_id == student).unwrap();
        let from_mentor = messages.iter().find(|m| m.sender_id == mentor).unwrap();
        assert!(!from_student.is_read);
        assert!(from_mentor.is_read);

        assert_eq!(db.unread_count(chat.id, student).unwrap(), 0);
        assert_eq!(db.unread_count(chat.id, mentor).unwrap(), 1);
    }
}
