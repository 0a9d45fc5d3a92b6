#![no_main]
use libfuzzer_sys::fuzz_target;
use xqr::{from_xml_str, Executor, Query};

const DOC: &str = r#"<root><a id="1">3<b x="y">text</b></a><c><a id="-2"/></c></root>"#;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (Ok(query), Ok(doc)) = (Query::parse(text), from_xml_str(DOC)) else {
        return;
    };
    let outcome = Executor::new(&query).run(&doc.root);
    if let Some(limit) = query.limit() {
        assert!(outcome.nodes.len() <= limit);
    }
});
