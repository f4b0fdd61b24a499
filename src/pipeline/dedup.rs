//! Stable-identity deduplication.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

use crate::models::RawPost;
use crate::utils::normalize_whitespace;

/// Collapse duplicate fingerprints, keeping the first occurrence and its
/// position. Idempotent: running it over its own output changes nothing.
///
/// Duplicates are expected, not an anomaly: the calendar is polled across
/// overlapping month windows, and a pinned listing can repeat an id from
/// the regular listing.
pub fn dedup_posts(posts: Vec<RawPost>) -> Vec<RawPost> {
    let mut seen = HashSet::new();
    posts
        .into_iter()
        .filter(|post| seen.insert(post.fingerprint.clone()))
        .collect()
}

/// Build a deterministic fingerprint from normalized text parts.
///
/// Used by sources without a native id: the board keys on title and link,
/// the calendar on date label and title, so the same entry seen across
/// overlapping fetches collapses to one identity.
pub fn composite_fingerprint(parts: &[&str]) -> String {
    let joined = parts
        .iter()
        .map(|part| normalize_whitespace(part))
        .collect::<Vec<_>>()
        .join("|");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(fingerprint: &str, title: &str) -> RawPost {
        RawPost {
            fingerprint: fingerprint.to_string(),
            title: title.to_string(),
            published_label: String::new(),
            detail_link: "https://example.com".to_string(),
        }
    }

    #[test]
    fn first_occurrence_wins() {
        let posts = vec![post("a", "첫번째"), post("b", "둘째"), post("a", "중복")];

        let deduped = dedup_posts(posts);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title, "첫번째");
        assert_eq!(deduped[1].title, "둘째");
    }

    #[test]
    fn dedup_is_idempotent() {
        let posts = vec![post("a", "A"), post("b", "B"), post("a", "A2"), post("c", "C")];

        let once = dedup_posts(posts);
        let twice = dedup_posts(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn composite_fingerprint_is_stable() {
        assert_eq!(
            composite_fingerprint(&["02.02 ~ 02.27", "수강신청"]),
            composite_fingerprint(&["02.02 ~ 02.27", "수강신청"]),
        );
    }

    #[test]
    fn composite_fingerprint_normalizes_whitespace() {
        assert_eq!(
            composite_fingerprint(&["02.02  ~  02.27", " 수강신청 "]),
            composite_fingerprint(&["02.02 ~ 02.27", "수강신청"]),
        );
    }

    #[test]
    fn composite_fingerprint_distinguishes_parts() {
        assert_ne!(
            composite_fingerprint(&["02.02", "수강신청"]),
            composite_fingerprint(&["02.03", "수강신청"]),
        );
        assert_ne!(
            composite_fingerprint(&["02.02", "수강신청"]),
            composite_fingerprint(&["02.02", "수강정정"]),
        );
    }
}
