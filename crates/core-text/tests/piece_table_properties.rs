//! Property tests for piece table edits (insert/delete restore, slice split).

use core_text::PieceTable;
use proptest::prelude::*;

fn line() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,40}"
}

/// Build a table with a few prior edits so spans come from both buffers.
fn fragmented(base: &str, edits: &[(usize, String)]) -> PieceTable {
    let mut pt = PieceTable::new(base);
    for (at, s) in edits {
        pt.insert(*at, s);
    }
    pt
}

#[derive(Debug, Clone)]
enum HalfEdit {
    Insert { front: bool, at: usize, text: String },
    Delete { front: bool, cursor: usize, count: usize },
}

fn half_edit() -> impl Strategy<Value = HalfEdit> {
    prop_oneof![
        (any::<bool>(), 0usize..60, "[a-z]{1,4}")
            .prop_map(|(front, at, text)| HalfEdit::Insert { front, at, text }),
        (any::<bool>(), 0usize..60, 0usize..4)
            .prop_map(|(front, cursor, count)| HalfEdit::Delete { front, cursor, count }),
    ]
}

/// Apply `edit` to the chosen half and to its `Vec<char>` model.
fn apply_half_edit(
    edit: &HalfEdit,
    (front_pt, back_pt): (&mut PieceTable, &mut PieceTable),
    (front_model, back_model): (&mut Vec<char>, &mut Vec<char>),
) {
    match edit {
        HalfEdit::Insert { front, at, text } => {
            let (pt, model) = if *front {
                (front_pt, front_model)
            } else {
                (back_pt, back_model)
            };
            let at = (*at).min(model.len());
            pt.insert(at, text);
            model.splice(at..at, text.chars());
        }
        HalfEdit::Delete {
            front,
            cursor,
            count,
        } => {
            let (pt, model) = if *front {
                (front_pt, front_model)
            } else {
                (back_pt, back_model)
            };
            let cursor = (*cursor).min(model.len());
            let start = cursor.saturating_sub(*count);
            pt.delete(cursor, *count).unwrap();
            model.drain(start..cursor);
        }
    }
}

proptest! {
    #[test]
    fn insert_then_delete_restores(
        base in line(),
        prior in prop::collection::vec((0usize..50, "[a-z]{1,5}"), 0..4),
        at in 0usize..80,
        ins in "[a-z]{1,10}",
    ) {
        let mut pt = fragmented(&base, &prior);
        let before = pt.text();
        let at = at.min(pt.len());
        let n = ins.chars().count();
        pt.insert(at, &ins);
        prop_assert_eq!(pt.len(), before.chars().count() + n);
        let removed = pt.delete(at + n, n).unwrap();
        prop_assert_eq!(removed, n);
        prop_assert_eq!(pt.text(), before);
        prop_assert!(pt.spans().iter().all(|s| s.len > 0));
    }

    #[test]
    fn slice_partitions_text(
        base in line(),
        prior in prop::collection::vec((0usize..50, "[a-z]{1,5}"), 0..4),
        k in 0usize..80,
    ) {
        let pt = fragmented(&base, &prior);
        let n = pt.len();
        let k = k.min(n);
        let (front, back) = pt.slice_at(k).unwrap();
        prop_assert_eq!(front.len(), k);
        prop_assert_eq!(back.len(), n - k);
        prop_assert_eq!(format!("{}{}", front.text(), back.text()), pt.text());
    }

    #[test]
    fn append_after_slice_restores(
        base in line(),
        prior in prop::collection::vec((0usize..50, "[a-z]{1,5}"), 0..4),
        k in 0usize..80,
    ) {
        let pt = fragmented(&base, &prior);
        let k = k.min(pt.len());
        let (mut front, back) = pt.slice_at(k).unwrap();
        front.append(back);
        prop_assert_eq!(front.text(), pt.text());
    }

    #[test]
    fn append_after_editing_both_halves(
        base in line(),
        prior in prop::collection::vec((0usize..50, "[a-z]{1,5}"), 0..4),
        k in 0usize..80,
        edits in prop::collection::vec(half_edit(), 0..8),
    ) {
        let pt = fragmented(&base, &prior);
        let k = k.min(pt.len());
        let (mut front, mut back) = pt.slice_at(k).unwrap();
        let chars: Vec<char> = pt.text().chars().collect();
        let mut front_model = chars[..k].to_vec();
        let mut back_model = chars[k..].to_vec();
        for edit in &edits {
            apply_half_edit(
                edit,
                (&mut front, &mut back),
                (&mut front_model, &mut back_model),
            );
        }
        prop_assert_eq!(front.text(), front_model.iter().collect::<String>());
        prop_assert_eq!(back.text(), back_model.iter().collect::<String>());
        front.append(back);
        front_model.extend(back_model);
        prop_assert_eq!(front.text(), front_model.iter().collect::<String>());
        prop_assert_eq!(front.len(), front_model.len());
        prop_assert!(front.spans().iter().all(|s| s.len > 0));
    }

    #[test]
    fn length_matches_text(
        base in line(),
        prior in prop::collection::vec((0usize..50, "[a-z]{1,5}"), 0..6),
        dels in prop::collection::vec((0usize..60, 0usize..6), 0..4),
    ) {
        let mut pt = fragmented(&base, &prior);
        for (cursor, count) in dels {
            let cursor = cursor.min(pt.len());
            pt.delete(cursor, count).unwrap();
        }
        prop_assert_eq!(pt.len(), pt.text().chars().count());
    }
}
