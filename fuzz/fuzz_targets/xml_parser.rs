#![no_main]
use libfuzzer_sys::fuzz_target;
use xqr::from_xml_bytes;

fuzz_target!(|data: &[u8]| {
    if let Ok(doc) = from_xml_bytes(data) {
        let _ = xqr::xml::to_string(&doc.root);
    }
});
