#![no_main]

use libfuzzer_sys::fuzz_target;
use opscope::metadata::method::MethodBody;

fuzz_target!(|data: &[u8]| {
    if let Ok(body) = MethodBody::from(data) {
        assert_eq!(body.code(data).len(), body.size_code);
    }
});
