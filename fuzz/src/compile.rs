#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, &str)| {
    let (source, params) = data;
    let mut engine = chunky::Engine::new();
    let _ = engine.add_template("fuzz", source);
    let _ = chunky::LoopOptions::parse(params);
});
