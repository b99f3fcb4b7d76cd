//! Property tests across the whole pipeline.

use proptest::prelude::*;
use similar::{Algorithm, ChangeTag, TextDiff};

use crate::config::PresenterConfig;
use crate::hunk::build_hunks;
use crate::line_diff::{diff_lines, diff_lines_segmented, EditOp};
use crate::presenter::DiffPresenter;
use crate::value::Value;

fn lines() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[abc]{0,2}", 0..12)
}

fn text() -> impl Strategy<Value = String> {
    lines().prop_map(|lines| lines.join("\n"))
}

fn changes(ops: &[EditOp<'_>]) -> usize {
    ops.iter().filter(|op| op.is_change()).count()
}

fn lcs_len(old: &[String], new: &[String]) -> usize {
    let mut table = vec![vec![0usize; new.len() + 1]; old.len() + 1];
    for i in (0..old.len()).rev() {
        for j in (0..new.len()).rev() {
            table[i][j] = if old[i] == new[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }
    table[0][0]
}

fn count_prefixed(diff: &str, prefix: char) -> usize {
    diff.lines()
        .filter(|line| !line.starts_with("@@") && line.starts_with(prefix))
        .count()
}

proptest! {
    #[test]
    fn diff_against_self_is_empty(text in text(), items in lines()) {
        let presenter = DiffPresenter::default();
        prop_assert_eq!(presenter.diff_as_string(&text, &text), "");
        let value = Value::list(items);
        prop_assert_eq!(presenter.diff_as_object(&value, &value), "");
    }

    #[test]
    fn stripped_color_matches_plain(actual in text(), expected in text()) {
        let plain = DiffPresenter::default();
        let colored = DiffPresenter::new(PresenterConfig::default().with_color(true));
        prop_assert_eq!(
            strip_ansi_escapes::strip_str(colored.diff_as_string(&actual, &expected)),
            plain.diff_as_string(&actual, &expected)
        );
    }

    #[test]
    fn mapping_diffs_ignore_insertion_order(
        left in prop::collection::btree_map("[a-d]{1,3}", 0i64..5, 0..6),
        right in prop::collection::btree_map("[a-d]{1,3}", 0i64..5, 0..6),
    ) {
        let presenter = DiffPresenter::default();
        let forward = presenter.diff_as_object(
            &Value::map(left.clone()),
            &Value::map(right.clone()),
        );
        let reversed = presenter.diff_as_object(
            &Value::map(left.into_iter().rev()),
            &Value::map(right.into_iter().rev()),
        );
        prop_assert_eq!(forward, reversed);
    }

    #[test]
    fn swapping_sides_swaps_signs(actual in text(), expected in text()) {
        let presenter = DiffPresenter::default();
        let forward = presenter.diff_as_string(&actual, &expected);
        let backward = presenter.diff_as_string(&expected, &actual);
        prop_assert_eq!(count_prefixed(&forward, '-'), count_prefixed(&backward, '+'));
        prop_assert_eq!(count_prefixed(&forward, '+'), count_prefixed(&backward, '-'));
    }

    #[test]
    fn edit_scripts_are_minimal(old in lines(), new in lines()) {
        let ops = diff_lines(&old, &new);

        let kept_old: Vec<&str> = ops.iter().filter(|op| !matches!(op, EditOp::Insert(_))).map(EditOp::line).collect();
        let kept_new: Vec<&str> = ops.iter().filter(|op| !matches!(op, EditOp::Delete(_))).map(EditOp::line).collect();
        prop_assert_eq!(kept_old, old.iter().map(String::as_str).collect::<Vec<_>>());
        prop_assert_eq!(kept_new, new.iter().map(String::as_str).collect::<Vec<_>>());

        let lcs = lcs_len(&old, &new);
        prop_assert_eq!(changes(&ops), old.len() + new.len() - 2 * lcs);

        let old_refs: Vec<&str> = old.iter().map(String::as_str).collect();
        let new_refs: Vec<&str> = new.iter().map(String::as_str).collect();
        let oracle = TextDiff::configure()
            .algorithm(Algorithm::Myers)
            .diff_slices(&old_refs, &new_refs);
        let oracle_changes = oracle
            .iter_all_changes()
            .filter(|change| change.tag() != ChangeTag::Equal)
            .count();
        prop_assert!(changes(&ops) <= oracle_changes);
    }

    #[test]
    fn backward_walk_segments_agree(old in lines(), new in lines(), segment in 1isize..6) {
        prop_assert_eq!(diff_lines_segmented(&old, &new, segment), diff_lines(&old, &new));
    }

    #[test]
    fn every_hunk_shows_a_change(old in lines(), new in lines(), context in 0usize..4) {
        let ops = diff_lines(&old, &new);
        let hunks = build_hunks(&ops, context);
        prop_assert_eq!(hunks.is_empty(), changes(&ops) == 0);
        for hunk in &hunks {
            prop_assert!(hunk.additions() + hunk.deletions() > 0);
        }
        let shown: usize = hunks.iter().map(|hunk| hunk.additions() + hunk.deletions()).sum();
        prop_assert_eq!(shown, changes(&ops));
    }
}
