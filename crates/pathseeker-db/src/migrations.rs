use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            name            TEXT NOT NULL,
            email           TEXT NOT NULL UNIQUE,
            password        TEXT NOT NULL,
            role            TEXT NOT NULL DEFAULT 'student',
            credit_points   INTEGER NOT NULL DEFAULT 0,
            skills          TEXT,
            bio             TEXT,
            education       TEXT,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS moments (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            author_id   INTEGER NOT NULL REFERENCES users(id),
            title       TEXT NOT NULL,
            description TEXT NOT NULL,
            background  TEXT,
            urgency     TEXT NOT NULL DEFAULT 'Normal',
            status      TEXT NOT NULL DEFAULT 'Open',
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_moments_status
            ON moments(status, created_at);

        CREATE TABLE IF NOT EXISTS replies (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            moment_id       INTEGER NOT NULL REFERENCES moments(id),
            mentor_id       INTEGER NOT NULL REFERENCES users(id),
            decision_made   TEXT NOT NULL,
            content         TEXT NOT NULL,
            mistake_warning TEXT,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_replies_moment
            ON replies(moment_id);
        CREATE INDEX IF NOT EXISTS idx_replies_mentor
            ON replies(mentor_id);

        -- At most one rating per (student, reply). The constraint is the
        -- enforcement point; concurrent duplicate inserts lose here, not in
        -- an application-level pre-check.
        CREATE TABLE IF NOT EXISTS ratings (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id  INTEGER NOT NULL REFERENCES users(id),
            mentor_id   INTEGER NOT NULL REFERENCES users(id),
            reply_id    INTEGER NOT NULL REFERENCES replies(id),
            value       INTEGER NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(student_id, reply_id)
        );

        CREATE INDEX IF NOT EXISTS idx_ratings_mentor
            ON ratings(mentor_id);

        -- One chat per (student, mentor) pair; duplicate creation races
        -- resolve to the existing row.
        CREATE TABLE IF NOT EXISTS chats (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id  INTEGER NOT NULL REFERENCES users(id),
            mentor_id   INTEGER NOT NULL REFERENCES users(id),
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(student_id, mentor_id)
        );

        CREATE TABLE IF NOT EXISTS messages (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            chat_id     INTEGER NOT NULL REFERENCES chats(id),
            sender_id   INTEGER NOT NULL REFERENCES users(id),
            content     TEXT NOT NULL,
            is_read     INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_messages_chat
            ON messages(chat_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_messages_unread
            ON messages(chat_id, is_read, sender_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
