use chunky::{Chunk, Engine, Table, TableData};
use proptest::prelude::*;

// Cells are drawn from a small alphabet with no tag delimiters so that the
// rendered output can be predicted from the table alone.
fn cell_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![Just(None), "[a-z0-9]{1,4}".prop_map(Some)]
}

fn table_strategy() -> impl Strategy<Value = Table> {
    (1..4usize).prop_flat_map(|width| {
        prop::collection::vec(prop::collection::vec(cell_strategy(), width), 0..8).prop_map(
            move |rows| {
                let mut table = Table::new((0..width).map(|i| format!("c{i}")));
                for row in rows {
                    table.push_record(row);
                }
                table
            },
        )
    })
}

fn expected(table: &Table, row: impl Fn(&[Option<String>]) -> String) -> String {
    let mut data = table.rows();
    let mut parts = Vec::new();
    while let Some(record) = data.next_record() {
        parts.push(row(&record));
    }
    parts.join(",")
}

proptest! {
    #[test]
    fn rendering_twice_is_identical(table in table_strategy()) {
        let mut chunk = Chunk::new();
        chunk.set("t", table);
        let engine = Engine::new();
        let template = engine
            .compile("{{.loop ~t}}{{~0}}:{{~c0}}{{.divider}},{{.onEmpty}}empty{{/loop}}")
            .unwrap();
        let first = template.render(&chunk).unwrap();
        let second = template.render(&chunk).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn absent_cells_never_show_a_previous_value(table in table_strategy()) {
        let want = if table.is_empty() {
            String::from("empty")
        } else {
            expected(&table, |record| match &record[0] {
                Some(v) => format!("[{v}]"),
                None => String::from("[{{~c0}}]"),
            })
        };
        let mut chunk = Chunk::new();
        chunk.set("t", table);
        let result = Engine::new()
            .compile("{{.loop ~t}}[{{~c0}}]{{.divider}},{{.onEmpty}}empty{{/loop}}")
            .unwrap()
            .render(&chunk)
            .unwrap();
        prop_assert_eq!(result, want);
    }

    #[test]
    fn divider_count_is_one_less_than_rows(table in table_strategy()) {
        let rows = table.len();
        let mut chunk = Chunk::new();
        chunk.set("t", table);
        let result = Engine::new()
            .compile("{{.loop ~t}}x{{.divider}}|{{.onEmpty}}{{/loop}}")
            .unwrap()
            .render(&chunk)
            .unwrap();
        prop_assert_eq!(result.matches('x').count(), rows);
        prop_assert_eq!(result.matches('|').count(), rows.saturating_sub(1));
    }
}
