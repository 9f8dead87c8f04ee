#![no_main]

use libfuzzer_sys::fuzz_target;
use opscope::disassembler::{decode_instructions, decode_stream};

fuzz_target!(|data: &[u8]| {
    let mut end = 0;
    for instruction in decode_instructions(data) {
        assert_eq!(instruction.offset, end);
        end = instruction.next_offset();
    }
    assert!(end <= data.len());

    if let Ok(strict) = decode_stream(data) {
        assert_eq!(strict.len(), decode_instructions(data).count());
    }
});
