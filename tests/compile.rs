use chunky::{Engine, ErrorKind, Part, Snippet, Syntax, Tag, Trim};

#[test]
fn compile_empty() {
    let engine = Engine::new();
    let template = engine.compile("").unwrap();
    assert!(template.snippet().is_empty());
}

#[test]
fn compile_raw() {
    let engine = Engine::new();
    let template = engine.compile("lorem ipsum dolor sit amet").unwrap();
    assert_eq!(
        template.snippet().parts(),
        [Part::Literal("lorem ipsum dolor sit amet".into())]
    );
}

#[test]
fn compile_placeholders() {
    let engine = Engine::new();
    let template = engine
        .compile("lorem {{~ipsum}} {{$dolor|sel(x)}} {{.unknown}}")
        .unwrap();
    assert_eq!(
        template.snippet().parts(),
        [
            Part::Literal("lorem ".into()),
            Part::Tag(Tag::new("~ipsum")),
            Part::Literal(" ".into()),
            Part::Tag(Tag::new("$dolor|sel(x)")),
            Part::Literal(" ".into()),
            Part::Tag(Tag::new(".unknown")),
        ]
    );
}

#[test]
fn compile_single_tag_loops_stay_tags() {
    let engine = Engine::new();
    let template = engine
        .compile(r#"{{.loop(~rows,row)}}{{.loop data="~rows" template="row"}}"#)
        .unwrap();
    assert_eq!(
        template.snippet().parts(),
        [
            Part::Tag(Tag::new(".loop(~rows,row)")),
            Part::Tag(Tag::new(r#".loop data="~rows" template="row""#)),
        ]
    );
}

#[test]
fn compile_block_sections_either_order() {
    let engine = Engine::new();
    for source in [
        "{{.loop ~rows}}R{{.divider}}D{{.onEmpty}}E{{/loop}}",
        "{{.loop ~rows}}R{{.onEmpty}}E{{.divider}}D{{/loop}}",
    ] {
        let template = engine.compile(source).unwrap();
        let [Part::Loop(block)] = template.snippet().parts() else {
            panic!("expected a single loop block in {source:?}");
        };
        assert_eq!(block.row(), &Snippet::literal("R"));
        assert_eq!(block.divider(), Some(&Snippet::literal("D")));
        assert_eq!(block.empty(), Some(&Snippet::literal("E")));
    }
}

#[test]
fn compile_nested_on_empty_belongs_to_inner_block() {
    let engine = Engine::new();
    let template = engine
        .compile("{{.loop ~outer}}A{{.loop ~inner}}X{{.onEmpty}}Y{{/loop}}B{{.onEmpty}}Z{{/loop}}")
        .unwrap();
    let [Part::Loop(outer)] = template.snippet().parts() else {
        panic!("expected a single loop block");
    };
    assert_eq!(outer.options().data(), Some("~outer"));
    assert_eq!(outer.empty(), Some(&Snippet::literal("Z")));
    assert_eq!(outer.divider(), None);

    let [Part::Literal(a), Part::Loop(inner), Part::Literal(b)] = outer.row().parts() else {
        panic!("unexpected row parts: {:?}", outer.row().parts());
    };
    assert_eq!(a, "A");
    assert_eq!(b, "B");
    assert_eq!(inner.options().data(), Some("~inner"));
    assert_eq!(inner.row(), &Snippet::literal("X"));
    assert_eq!(inner.empty(), Some(&Snippet::literal("Y")));
}

#[test]
fn compile_nested_single_tag_loop_does_not_open_a_block() {
    let engine = Engine::new();
    let template = engine
        .compile("{{.loop ~a}}{{.loop(~b,row)}}{{.onEmpty}}none{{/loop}}")
        .unwrap();
    let [Part::Loop(block)] = template.snippet().parts() else {
        panic!("expected a single loop block");
    };
    assert_eq!(block.row().parts(), [Part::Tag(Tag::new(".loop(~b,row)"))]);
    assert_eq!(block.empty(), Some(&Snippet::literal("none")));
}

#[test]
fn compile_trim_options() {
    let engine = Engine::new();

    let template = engine.compile("{{.loop ~r}}\n  hello{{/loop}}").unwrap();
    let [Part::Loop(block)] = template.snippet().parts() else {
        panic!("expected a single loop block");
    };
    assert_eq!(block.options().trim(), Trim::Smart);
    assert_eq!(block.row(), &Snippet::literal("hello"));

    let template = engine.compile("{{.loop ~r}}  hello{{/loop}}").unwrap();
    let [Part::Loop(block)] = template.snippet().parts() else {
        panic!("expected a single loop block");
    };
    assert_eq!(block.row(), &Snippet::literal("hello"));

    let template = engine
        .compile("{{.loop ~r trim=\"FALSE\"}}\n  hello{{/loop}}")
        .unwrap();
    let [Part::Loop(block)] = template.snippet().parts() else {
        panic!("expected a single loop block");
    };
    assert_eq!(block.options().trim(), Trim::None);
    assert_eq!(block.row(), &Snippet::literal("\n  hello"));

    let template = engine
        .compile("{{.loop ~r trim='false'}}  hello{{/loop}}")
        .unwrap();
    let [Part::Loop(block)] = template.snippet().parts() else {
        panic!("expected a single loop block");
    };
    assert_eq!(block.row(), &Snippet::literal("  hello"));
}

#[test]
fn compile_custom_syntax() {
    let syntax = Syntax::builder().tag("<%", "%>").build();
    let engine = Engine::with_syntax(syntax);
    let template = engine
        .compile("<%.loop ~r%>{{~x}}<%~y%><%.divider%>,<%/loop%>")
        .unwrap();
    let [Part::Loop(block)] = template.snippet().parts() else {
        panic!("expected a single loop block");
    };
    assert_eq!(
        block.row().parts(),
        [Part::Literal("{{~x}}".into()), Part::Tag(Tag::new("~y"))]
    );
    assert_eq!(block.divider(), Some(&Snippet::literal(",")));
}

#[test]
fn compile_err_unclosed_tag() {
    let err = Engine::new().compile("lorem {{ ipsum").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(
        format!("{:#}", err),
        "
   |
 1 | lorem {{ ipsum
   |       ^^ unclosed tag
"
    );
}

#[test]
fn compile_err_unclosed_block() {
    let err = Engine::new()
        .compile("lorem\n{{.loop ~x}}\nipsum")
        .unwrap_err();
    assert_eq!(
        format!("{:#}", err),
        "
   |
 2 | {{.loop ~x}}
   | ^^^^^^^^^^^^ unclosed `.loop` block
"
    );
}

#[test]
fn compile_err_unclosed_nested_block() {
    let err = Engine::new()
        .compile("{{.loop ~a}}{{.loop ~b}}{{/loop}}")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unclosed `.loop` block between bytes 0 and 12"
    );
}

#[test]
fn compile_err_unexpected_end() {
    let err = Engine::new().compile("a {{/loop}}").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unexpected `/loop` tag between bytes 2 and 11"
    );

    let err = Engine::new()
        .compile("{{.loop ~x}}a{{/loop}}{{/loop}}")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unexpected `/loop` tag between bytes 22 and 31"
    );
}

#[test]
fn compile_err_custom_syntax() {
    let syntax = Syntax::builder().tag("<%", "%>").build();
    let err = Engine::with_syntax(syntax).compile("hi <% x").unwrap_err();
    assert_eq!(
        format!("{:#}", err),
        "
   |
 1 | hi <% x
   |    ^^ unclosed tag
"
    );
}

#[test]
fn compile_err_max_depth() {
    let mut engine = Engine::new();
    engine.set_max_depth(1);
    engine.compile("{{.loop ~a}}{{/loop}}").unwrap();
    let err = engine
        .compile("{{.loop ~a}}{{.loop ~b}}{{/loop}}{{/loop}}")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "reached maximum nesting depth (1) between bytes 12 and 24"
    );
}

#[test]
fn compile_add_template_err() {
    let mut engine = Engine::new();
    let err = engine.add_template("broken", "{{.loop ~x}}").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert!(engine.get_template("broken").is_none());
}
