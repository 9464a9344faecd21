//! Candidate ranking

use crate::domain::search::SearchResult;

/// Metadata key consulted as an optional ranking tie-break
///
/// When a candidate carries an integer under this key it outranks candidates
/// without one (and higher values outrank lower). No catalog entry sets it
/// today, so ordering is by score alone; the hook exists so business
/// priorities can be layered in without touching the sort.
const PRIORITY_KEY: &str = "priority";

/// Orders candidates by descending score with a stable sort
///
/// Ties keep the relative order the vector store returned them in. The
/// optional `priority` metadata key takes precedence over score when
/// present; when absent everywhere the behavior is pure score ordering.
pub fn rank(mut candidates: Vec<SearchResult>) -> Vec<SearchResult> {
    candidates.sort_by(|a, b| {
        priority_of(b)
            .cmp(&priority_of(a))
            .then_with(|| b.score.total_cmp(&a.score))
    });
    candidates
}

fn priority_of(result: &SearchResult) -> Option<i64> {
    result.metadata.get(PRIORITY_KEY).and_then(|v| v.as_i64())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, score: f32) -> SearchResult {
        SearchResult::new(id, score, format!("persona {}", id))
    }

    #[test]
    fn test_sorted_by_descending_score() {
        let ranked = rank(vec![result("a", 0.5), result("b", 0.9), result("c", 0.7)]);

        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn test_ties_preserve_input_order() {
        let ranked = rank(vec![
            result("first", 0.7),
            result("second", 0.7),
            result("third", 0.7),
        ]);

        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[test]
    fn test_priority_metadata_outranks_score() {
        let boosted = result("boosted", 0.5).with_metadata("priority", serde_json::json!(10));
        let ranked = rank(vec![result("plain", 0.9), boosted]);

        assert_eq!(ranked[0].id, "boosted");
        assert_eq!(ranked[1].id, "plain");
    }

    #[test]
    fn test_no_priority_means_pure_score_order() {
        // Non-integer values under the key must not activate the hook
        let odd = result("odd", 0.6).with_metadata("priority", serde_json::json!("high"));
        let ranked = rank(vec![odd, result("top", 0.9)]);

        assert_eq!(ranked[0].id, "top");
    }
}
