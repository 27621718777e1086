use datagrid::prelude::*;
use proptest::prelude::*;
use treemate::{RowData, TreeMate};

#[derive(Clone, Debug)]
struct Rec {
    id: u32,
    value: i64,
    children: Vec<Rec>,
}

impl Rec {
    fn new(id: u32, value: i64) -> Self {
        Self {
            id,
            value,
            children: vec![],
        }
    }
}

impl RowData for Rec {
    type Key = u32;

    fn key(&self) -> u32 {
        self.id
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

fn columns() -> Vec<Column<Rec>> {
    vec![
        DataColumn::new("value", "Value")
            .filter(|r: &Rec, v| matches!(v, FilterValue::Int(min) if r.value > *min))
            .sorter(|a: &Rec, b: &Rec| a.value.cmp(&b.value))
            .into(),
    ]
}

/// Two-level tree with a fixed shape: three parents with three leaves each.
fn fixed_tree() -> TreeMate<Rec> {
    let rows: Vec<Rec> = (0..3u32)
        .map(|p| {
            let mut parent = Rec::new(p * 10, 0);
            parent.children = (1..=3).map(|c| Rec::new(p * 10 + c, 0)).collect();
            parent
        })
        .collect();
    TreeMate::from_rows(&rows)
}

proptest! {
    #[test]
    fn test_pagination_invariants(
        item_count in 0usize..500,
        page_size in 1usize..50,
        page in 0usize..100
    ) {
        let mut state = PageState::new(page_size);
        state.set_page(page);

        let items: Vec<u32> = (0..item_count as u32).collect();
        let view = datagrid::paginate::page_view(items.len(), &state);

        // pageCount == max(1, ceil(itemCount / pageSize))
        prop_assert_eq!(view.page_count, item_count.div_ceil(page_size).max(1));
        prop_assert!(view.current_page >= 1);
        prop_assert!(view.current_page <= view.page_count);
        prop_assert!(view.start <= view.end);
        prop_assert!(view.end <= item_count);

        // Concatenating every page reproduces the sequence exactly once.
        let mut seen = Vec::new();
        for p in 1..=view.page_count {
            let mut s = PageState::new(page_size);
            s.set_page(p);
            let (chunk, _) = datagrid::paginate::slice(&items, &s);
            seen.extend_from_slice(chunk);
        }
        prop_assert_eq!(seen, items);
    }

    #[test]
    fn test_sort_never_resurrects_filtered_rows(
        values in prop::collection::vec(0i64..100, 0..60),
        threshold in 0i64..100
    ) {
        let rows: Vec<Rec> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Rec::new(i as u32, v))
            .collect();

        let mut table = TableData::new(columns());
        table.set_rows(&rows);
        table.set_filter("value", vec![FilterValue::Int(threshold)]);
        table.sort_by("value", SortOrder::Ascend);

        let mut expected: Vec<u32> = rows
            .iter()
            .filter(|r| r.value > threshold)
            .map(|r| r.id)
            .collect();

        let mut visible: Vec<u32> = table
            .view()
            .iter()
            .map(|n| table.tree().node(n.id).key)
            .collect();

        // Sorting operates on the post-filter set only: same members,
        // regardless of order.
        visible.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(visible, expected);

        // And the visible order is actually sorted.
        let sorted_values: Vec<i64> = table
            .view()
            .iter()
            .map(|n| table.tree().node(n.id).row.value)
            .collect();
        prop_assert!(sorted_values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_sort_stability(
        values in prop::collection::vec(0i64..5, 2..60)
    ) {
        // Narrow value range forces plenty of equal keys.
        let rows: Vec<Rec> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Rec::new(i as u32, v))
            .collect();

        let mut table = TableData::new(columns());
        table.set_rows(&rows);
        table.sort_by("value", SortOrder::Ascend);

        let visible: Vec<(i64, u32)> = table
            .view()
            .iter()
            .map(|n| {
                let node = table.tree().node(n.id);
                (node.row.value, node.key)
            })
            .collect();

        // Equal values keep ascending ids (their input order).
        for w in visible.windows(2) {
            if w[0].0 == w[1].0 {
                prop_assert!(w[0].1 < w[1].1);
            }
        }
    }

    #[test]
    fn test_selection_invariants_hold_after_any_op_sequence(
        ops in prop::collection::vec((0u32..40, prop::bool::ANY), 0..40)
    ) {
        let tree = fixed_tree();
        let mut ctl: CheckController<u32> = CheckController::new(true);

        for (key, check) in ops {
            if check {
                ctl.check(&key, &tree);
            } else {
                ctl.uncheck(&key, &tree);
            }
        }

        // No key is both checked and indeterminate.
        for key in ctl.checked_keys() {
            prop_assert!(!ctl.is_indeterminate(key));
        }

        // Parent status follows its descendant leaves.
        for node in tree.iter() {
            if node.is_leaf() {
                prop_assert!(!ctl.is_indeterminate(&node.key), "leaves are never indeterminate");
                continue;
            }
            let leaves = tree.descendant_leaf_keys(&node.key);
            let checked = leaves.iter().filter(|k| ctl.is_checked(k)).count();

            prop_assert_eq!(ctl.is_checked(&node.key), checked == leaves.len());
            prop_assert_eq!(
                ctl.is_indeterminate(&node.key),
                checked > 0 && checked < leaves.len()
            );
        }
    }
}
