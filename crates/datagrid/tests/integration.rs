//! End-to-end scenarios driving the whole table pipeline the way a
//! rendering layer would: seed rows, then filter, sort, paginate, select,
//! expand, and export in combination.

#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;

use datagrid::prelude::*;
use treemate::RowData;

#[derive(Clone, Debug, PartialEq)]
struct Employee {
    id: u32,
    name: String,
    department: String,
    age: i64,
    reports: Vec<Employee>,
}

impl Employee {
    fn new(id: u32, name: &str, department: &str, age: i64) -> Self {
        Self {
            id,
            name: name.into(),
            department: department.into(),
            age,
            reports: vec![],
        }
    }

    fn with_reports(mut self, reports: Vec<Employee>) -> Self {
        self.reports = reports;
        self
    }
}

impl RowData for Employee {
    type Key = u32;

    fn key(&self) -> u32 {
        self.id
    }

    fn children(&self) -> &[Self] {
        &self.reports
    }
}

fn columns() -> Vec<Column<Employee>> {
    vec![
        Column::Selection,
        Column::Expander,
        DataColumn::new("name", "Name")
            .sorter(|a: &Employee, b: &Employee| a.name.cmp(&b.name))
            .into(),
        Column::Group {
            title: "Details".into(),
            children: vec![
                DataColumn::new("department", "Department")
                    .filter(|e: &Employee, v: &FilterValue| {
                        matches!(v, FilterValue::Str(dept) if &e.department == dept)
                    })
                    .filter_options(vec![
                        FilterOption::new("Engineering", "eng"),
                        FilterOption::new("Sales", "sales"),
                    ])
                    .into(),
                DataColumn::new("age", "Age")
                    .filter(|e: &Employee, v: &FilterValue| {
                        matches!(v, FilterValue::Int(min) if e.age > *min)
                    })
                    .sorter(|a: &Employee, b: &Employee| a.age.cmp(&b.age))
                    .into(),
            ],
        },
    ]
}

fn staff() -> Vec<Employee> {
    vec![
        Employee::new(1, "Ada", "eng", 36).with_reports(vec![
            Employee::new(2, "Grace", "eng", 45),
            Employee::new(3, "Linus", "eng", 29),
        ]),
        Employee::new(4, "Marge", "sales", 51),
        Employee::new(5, "Homer", "sales", 39),
        Employee::new(6, "Bart", "sales", 24),
    ]
}

fn page_ids(table: &TableData<Employee>) -> Vec<u32> {
    table.page_rows().iter().map(|e| e.id).collect()
}

#[test]
fn test_full_pipeline_scenario() {
    let mut table = TableData::new(columns());
    table.set_rows(&staff());
    table.set_page_size(2);

    // Unfiltered: four top-level rows on two pages.
    assert_eq!(table.page_view().page_count, 2);
    assert_eq!(page_ids(&table), vec![1, 4]);

    // Keep sales only, sorted by descending age.
    table.set_filter("department", vec![FilterValue::Str("sales".into())]);
    table.sort_by("age", SortOrder::Descend);
    assert_eq!(table.item_count(), 3);
    assert_eq!(page_ids(&table), vec![4, 5]);

    table.set_page(2);
    assert_eq!(page_ids(&table), vec![6]);

    // Widening the filter keeps the derivation chain consistent.
    table.clear_filters();
    assert_eq!(table.item_count(), 4);
    assert!(table.page_view().current_page <= table.page_view().page_count);
}

#[test]
fn test_tree_filter_retains_matching_branch() {
    let mut table = TableData::new(columns());
    table.set_rows(&staff());

    // Only Grace (45) matches; her manager Ada stays visible as the path.
    table.set_filter("age", vec![FilterValue::Int(40)]);

    let visible: Vec<u32> = table
        .view()
        .iter()
        .map(|n| table.tree().node(n.id).key)
        .collect();
    assert!(visible.contains(&1));
    assert!(visible.contains(&4)); // Marge, 51

    table.expand_all();
    let display: Vec<u32> = table.display_rows().iter().map(|n| n.key).collect();
    assert_eq!(display, vec![1, 2, 4]);
}

#[test]
fn test_selection_cascade_through_ui_flow() {
    let mut table = TableData::new(columns());
    table.set_rows(&staff());

    // Checking the manager selects the whole team.
    table.check(&1);
    for id in [1, 2, 3] {
        assert!(table.checks().is_checked(&id));
    }

    // Unchecking one report degrades the manager to indeterminate.
    table.uncheck(&3);
    assert!(!table.checks().is_checked(&1));
    assert!(table.checks().is_indeterminate(&1));
    assert_eq!(table.checks().status(&1), CheckStatus::Indeterminate);
}

#[test]
fn test_hooks_deliver_state_for_persistence() {
    let mut table = TableData::new(columns());
    table.set_rows(&staff());

    let persisted = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&persisted);
    table.on_sort_change(move |state| {
        // Persist the way a caller would: straight through serde.
        *sink.borrow_mut() = Some(serde_json::to_string(state).unwrap());
    });

    table.sort_by("name", SortOrder::Ascend);

    let json = persisted.borrow().clone().unwrap();
    let restored: SortState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.order_of("name"), Some(SortOrder::Ascend));
}

#[test]
fn test_persistable_state_round_trips() {
    let mut filter = FilterState::new();
    filter.set("department", vec![FilterValue::Str("eng".into())]);
    filter.set("age", vec![FilterValue::Int(30), FilterValue::Int(40)]);

    let json = serde_json::to_string(&filter).unwrap();
    let restored: FilterState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, filter);

    let mut page = PageState::new(25);
    page.set_page(3);
    let json = serde_json::to_string(&page).unwrap();
    let restored: PageState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, page);
}

#[test]
fn test_csv_export_of_filtered_view() {
    let mut table = TableData::new(columns());
    table.set_rows(&staff());
    table.set_filter("department", vec![FilterValue::Str("sales".into())]);
    table.sort_by("age", SortOrder::Ascend);

    let out = csv_string(
        &table,
        |col| col.title.clone(),
        |row, col| match col.key.as_str() {
            "name" => row.name.clone(),
            "department" => row.department.clone(),
            "age" => row.age.to_string(),
            _ => String::new(),
        },
        CsvOptions::default(),
    )
    .unwrap();

    assert_eq!(
        out,
        "Name,Department,Age\nBart,sales,24\nHomer,sales,39\nMarge,sales,51\n"
    );
}

#[test]
fn test_multi_sort_with_config() {
    let config = TableConfig {
        multi_sort: true,
        ..TableConfig::default()
    };

    let rows = vec![
        Employee::new(1, "B", "eng", 30),
        Employee::new(2, "A", "eng", 30),
        Employee::new(3, "C", "eng", 20),
    ];

    let mut table = TableData::with_config(columns(), config);
    table.set_rows(&rows);
    table.sort_by("age", SortOrder::Ascend);
    table.sort_by("name", SortOrder::Ascend);

    assert_eq!(table.sort_state().entries().len(), 2);
    assert_eq!(page_ids(&table), vec![3, 2, 1]);
}

#[test]
fn test_comparator_total_order_over_custom_logic() {
    // A comparator over a derived measure, not a field: name length.
    let columns: Vec<Column<Employee>> = vec![
        DataColumn::new("len", "Len")
            .sorter(|a: &Employee, b: &Employee| a.name.len().cmp(&b.name.len()))
            .into(),
    ];

    let mut table = TableData::new(columns);
    table.set_rows(&[
        Employee::new(1, "Beatrice", "eng", 0),
        Employee::new(2, "Jo", "eng", 0),
        Employee::new(3, "Alan", "eng", 0),
    ]);
    table.sort_by("len", SortOrder::Ascend);

    assert_eq!(page_ids(&table), vec![2, 3, 1]);
}
