#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde::Serialize;

#[derive(Debug, Serialize, Arbitrary)]
#[serde(untagged)]
enum Value {
    None,
    Bool(bool),
    Integer(i64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

fuzz_target!(|data: (&str, Vec<(&str, &str)>, BTreeMap<String, Value>, Vec<Vec<String>>)| {
    let (root, named, ctx, rows) = data;
    let mut engine = chunky::Engine::new();
    engine.set_max_depth(16);
    if engine.add_template("fuzz", root).is_err() {
        return;
    }
    for (name, source) in named {
        let _ = engine.add_template(name, source);
    }

    let mut chunk = chunky::Chunk::new();
    for (name, value) in ctx {
        if chunk.set_serialized(name, value).is_err() {
            return;
        }
    }
    let mut table = chunky::Table::new(["a", "b", "a"]);
    for row in rows {
        table.push_row(row);
    }
    chunk.set("rows", table);

    if let Some(template) = engine.get_template("fuzz") {
        let _ = template.render(&chunk);
    }
});
