//! Offline fuzzy matching between moment titles. No model, no network:
//! a Ratcliff/Obershelp ratio over lower-cased titles is enough to surface
//! "someone already asked this" hits.

use pathseeker_db::Database;
use pathseeker_types::models::{Identity, Moment, Role};

use crate::convert;
use crate::error::{CoreError, CoreResult};

pub const SIMILARITY_THRESHOLD: f64 = 0.30;
pub const DEFAULT_LIMIT: usize = 3;

/// Find moments whose titles resemble `title`, best match first.
///
/// The corpus prefers resolved moments (they carry answered stories); only
/// when none exist does it widen to everything. Equal scores keep corpus
/// order, so results are deterministic. An empty corpus yields an empty
/// list, never an error.
pub fn find_similar(
    db: &Database,
    title: &str,
    exclude_id: Option<i64>,
    limit: usize,
) -> CoreResult<Vec<Moment>> {
    let mut corpus = db.resolved_moments()?;
    if corpus.is_empty() {
        corpus = db.all_moments()?;
    }

    let needle = title.to_lowercase();
    let mut scored = Vec::new();
    for row in corpus {
        if Some(row.id) == exclude_id {
            continue;
        }
        let score = ratio(&needle, &row.title.to_lowercase());
        if score > SIMILARITY_THRESHOLD {
            scored.push((score, row));
        }
    }

    // Stable sort: ties keep corpus iteration order
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    Ok(scored
        .into_iter()
        .take(limit)
        .map(|(_, row)| convert::moment(row))
        .collect())
}

/// Similar moments for an existing moment, with the same visibility rule
/// as viewing it: mentors see everything, students only their own.
pub fn similar_for_moment(db: &Database, viewer: &Identity, moment_id: i64) -> CoreResult<Vec<Moment>> {
    let row = db.get_moment(moment_id)?.ok_or(CoreError::NotFound("moment"))?;
    if viewer.role != Role::Mentor && row.author_id != viewer.user_id {
        return Err(CoreError::PermissionDenied(
            "You do not have permission to view this moment",
        ));
    }
    find_similar(db, &row.title, Some(moment_id), DEFAULT_LIMIT)
}

/// Ratcliff/Obershelp similarity: 2·M / T, where M is the total length of
/// recursively matched common substrings and T the combined length.
/// Range [0, 1]; two empty strings count as identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matches = matching_chars(&a, &b);
    2.0 * matches as f64 / total as f64
}

/// Longest common substring, then recurse on the unmatched flanks.
/// The first-found longest block wins, which keeps the measure stable.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (mut best_i, mut best_j, mut best_len) = (0, 0, 0);
    for i in 0..a.len() {
        for j in 0..b.len() {
            let mut k = 0;
            while i + k < a.len() && j + k < b.len() && a[i + k] == b[j + k] {
                k += 1;
            }
            if k > best_len {
                (best_i, best_j, best_len) = (i, j, k);
            }
        }
    }

    if best_len == 0 {
        return 0;
    }

    best_len
        + matching_chars(&a[..best_i], &b[..best_j])
        + matching_chars(&a[best_i + best_len..], &b[best_j + best_len..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathseeker_db::Database;

    fn seed_moment(db: &Database, author: i64, title: &str, status: &str) -> i64 {
        let row = db.insert_moment(author, title, "desc", None, "Normal").unwrap();
        if status != "Open" {
            db.set_moment_status(row.id, status).unwrap();
        }
        row.id
    }

    #[test]
    fn identical_titles_score_one() {
        assert_eq!(ratio("internship", "internship"), 1.0);
        assert_eq!(ratio("", ""), 1.0);
    }

    #[test]
    fn disjoint_titles_score_zero() {
        assert_eq!(ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn close_titles_score_high_and_noise_scores_low() {
        let close = ratio("should i take the internship", "should i accept this internship");
        assert!(close > 0.7, "expected high similarity, got {}", close);

        let noise = ratio("should i take the internship", "wood-fired pizza oven build log");
        assert!(noise < 0.3, "expected low similarity, got {}", noise);
    }

    #[test]
    fn find_similar_ranks_and_filters() {
        let db = Database::open_in_memory().unwrap();
        let author = db
            .create_user("Stu", "stu@x.io", "hash", "student", None, None, None)
            .unwrap()
            .unwrap()
            .id;
        let internship = seed_moment(&db, author, "Should I accept this internship", "Resolved");
        let _pizza = seed_moment(&db, author, "Wood-fired pizza oven build log", "Resolved");
        let current = seed_moment(&db, author, "Should I take the internship", "Open");

        let hits = find_similar(&db, "Should I take the internship", Some(current), 3).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, internship);
    }

    #[test]
    fn corpus_prefers_resolved_then_falls_back_to_all() {
        let db = Database::open_in_memory().unwrap();
        let author = db
            .create_user("Stu", "stu@x.io", "hash", "student", None, None, None)
            .unwrap()
            .unwrap()
            .id;
        let open_twin = seed_moment(&db, author, "grad school or job offer", "Open");

        // No resolved moments yet: the open one is still found
        let hits = find_similar(&db, "grad school or job offer?", None, 3).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, open_twin);

        // Once a resolved twin exists, the open one drops out of the corpus
        let resolved_twin = seed_moment(&db, author, "grad school or a job offer", "Resolved");
        let hits = find_similar(&db, "grad school or job offer?", None, 3).unwrap();
        assert_eq!(hits.iter().map(|m| m.id).collect::<Vec<_>>(), vec![resolved_twin]);
    }

    #[test]
    fn empty_corpus_is_not_an_error() {
        let db = Database::open_in_memory().unwrap();
        let hits = find_similar(&db, "anything at all", None, 3).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn limit_truncates_after_ranking() {
        let db = Database::open_in_memory().unwrap();
        let author = db
            .create_user("Stu", "stu@x.io", "hash", "student", None, None, None)
            .unwrap()
            .unwrap()
            .id;
        for i in 0..5 {
            seed_moment(&db, author, &format!("switching careers at {}0", i), "Resolved");
        }
        let hits = find_similar(&db, "switching careers at 25", None, DEFAULT_LIMIT).unwrap();
        assert_eq!(hits.len(), 3);
    }
}
