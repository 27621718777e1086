//! Drives the headless table core the way a rendering layer would:
//! seed rows, flip filters/sort/pages, and print the derived views.
//!
//! Run with: `cargo run --example employee_table`

use datagrid::prelude::*;
use treemate::RowData;

#[derive(Clone, Debug)]
struct Employee {
    id: u32,
    name: &'static str,
    department: &'static str,
    age: i64,
    reports: Vec<Employee>,
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

fn employee(id: u32, name: &'static str, department: &'static str, age: i64) -> Employee {
    Employee {
        id,
        name,
        department,
        age,
        reports: vec![],
    }
}

fn print_page(table: &TableData<Employee>) {
    let view = table.page_view();
    println!(
        "-- page {}/{} ({} rows total)",
        view.current_page, view.page_count, view.item_count
    );
    for node in table.display_rows() {
        let row = &node.row;
        let indent = "  ".repeat(node.depth);
        let mark = match table.checks().status(&node.key) {
            CheckStatus::Checked => "[x]",
            CheckStatus::Indeterminate => "[-]",
            CheckStatus::Unchecked => "[ ]",
        };
        println!("{mark} {indent}{} ({}, {})", row.name, row.department, row.age);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut ada = employee(1, "Ada", "eng", 36);
    ada.reports = vec![
        employee(2, "Grace", "eng", 45),
        employee(3, "Linus", "eng", 29),
    ];
    let rows = vec![
        ada,
        employee(4, "Marge", "sales", 51),
        employee(5, "Homer", "sales", 39),
        employee(6, "Bart", "sales", 24),
    ];

    let columns: Vec<Column<Employee>> = vec![
        Column::Selection,
        Column::Expander,
        DataColumn::new("name", "Name")
            .sorter(|a: &Employee, b: &Employee| a.name.cmp(b.name))
            .into(),
        DataColumn::new("department", "Department")
            .filter(|e: &Employee, v: &FilterValue| {
                matches!(v, FilterValue::Str(dept) if e.department == dept)
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
    ];

    let mut table = TableData::new(columns);
    table.on_checked_change(|keys| println!(".. checked keys changed: {keys:?}"));
    table.set_rows(&rows);
    table.set_page_size(3);

    println!("= initial");
    table.expand_all();
    print_page(&table);

    println!("\n= sales only, oldest first");
    table.set_filter("department", vec![FilterValue::Str("sales".into())]);
    table.sort_by("age", SortOrder::Descend);
    print_page(&table);

    println!("\n= check Ada's whole team");
    table.clear_filters();
    table.check(&1);
    print_page(&table);

    println!("\n= CSV of the current view");
    let csv = csv_string(
        &table,
        |col| col.title.clone(),
        |row, col| match col.key.as_str() {
            "name" => row.name.to_string(),
            "department" => row.department.to_string(),
            "age" => row.age.to_string(),
            _ => String::new(),
        },
        CsvOptions::default(),
    )
    .expect("csv export");
    print!("{csv}");
}
