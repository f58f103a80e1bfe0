//! Property-based tests for domain types
//!
//! These tests use proptest to verify invariants across many random inputs.

use chrono::{TimeZone, Utc};
use domain::{ArticleId, Draft, DraftFlags, QueuedSave, StoredDraft};
use proptest::prelude::*;

fn draft_strategy() -> impl Strategy<Value = Draft> {
    (
        ".{0,40}",
        ".{0,200}",
        proptest::option::of(".{0,40}"),
        proptest::option::of(1u64..1000),
        proptest::collection::vec(1u64..1000, 0..5),
        any::<(bool, bool, bool, bool)>(),
    )
        .prop_map(|(title, body, excerpt, category_id, tag_ids, flags)| Draft {
            title,
            body,
            excerpt,
            category_id,
            tag_ids,
            flags: DraftFlags {
                pinned: flags.0,
                original: flags.1,
                commentable: flags.2,
                encrypted: flags.3,
            },
            ..Draft::default()
        })
}

// ============================================================================
// ArticleId Property Tests
// ============================================================================

mod article_id_tests {
    use super::*;

    proptest! {
        #[test]
        fn positive_ids_are_accepted(id in 1u64..) {
            let article = ArticleId::new(id).unwrap();
            prop_assert_eq!(article.value(), id);
            prop_assert_eq!(article.path_segment(), id.to_string());
        }

        #[test]
        fn display_parse_roundtrip(id in 1u64..) {
            let article = ArticleId::new(id).unwrap();
            let parsed: ArticleId = article.to_string().parse().unwrap();
            prop_assert_eq!(parsed, article);
        }

        #[test]
        fn slug_never_affects_equality(id in 1u64.., a in "[a-z0-9-]{1,20}", b in "[a-z0-9-]{1,20}") {
            let left = ArticleId::with_slug(id, a).unwrap();
            let right = ArticleId::with_slug(id, b).unwrap();
            prop_assert_eq!(left, right);
        }
    }
}

// ============================================================================
// Persisted Record Property Tests
// ============================================================================

mod record_tests {
    use super::*;

    proptest! {
        #[test]
        fn stored_draft_json_preserves_draft(draft in draft_strategy(), secs in 0i64..4_000_000_000) {
            let saved_at = Utc.timestamp_opt(secs, 0).unwrap();
            let stored = StoredDraft::new(draft.clone(), saved_at);
            let json = serde_json::to_string(&stored).unwrap();
            let parsed: StoredDraft = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(parsed.draft, draft);
            prop_assert_eq!(parsed.saved_at, saved_at);
        }

        #[test]
        fn queued_save_keeps_millisecond_timestamp(draft in draft_strategy(), ms in 0i64..4_000_000_000_000) {
            let timestamp = Utc.timestamp_millis_opt(ms).unwrap();
            let entry = QueuedSave::new(None, draft, timestamp);
            let json = serde_json::to_string(&entry).unwrap();
            let parsed: QueuedSave = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(parsed, entry);
        }
    }
}
