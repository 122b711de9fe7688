#![no_main]

use invoic::edifact::Syntax;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let syntax = Syntax::default();
        let escaped = syntax.escape(s, true);
        // Every delimiter in the output must be released.
        let mut released = false;
        for c in escaped.chars() {
            if released {
                released = false;
            } else if c == '?' {
                released = true;
            } else {
                assert!(!matches!(c, '\'' | '+' | ':' | ' '), "bare delimiter in {escaped:?}");
            }
        }
        assert!(!released);
    }
});
