#![no_main]
use libfuzzer_sys::fuzz_target;
use xqr::Query;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(query) = Query::parse(s) {
            assert_eq!(Query::parse(&query.to_string()), Ok(query));
        }
    }
});
