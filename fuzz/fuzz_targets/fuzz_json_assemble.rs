#![no_main]

use invoic::edifact::{EdifactConfig, MessageAssembler};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Load → assemble must not panic; encoding errors would be a bug.
        if let Ok(record) = invoic::json::from_json_str(s) {
            if let Ok(assembler) = MessageAssembler::new(EdifactConfig::default()) {
                if let Err(e) = assembler.assemble(&record) {
                    assert!(
                        !matches!(e, invoic::InvoicError::Encoding(_)),
                        "encoding invariant broken: {e}"
                    );
                }
            }
        }
    }
});
