#![no_main]

use libfuzzer_sys::fuzz_target;
use spectrum_io::filter::is_supported_sequence;
use spectrum_io::modification::{normalize, PatternCompiler, PtmPermutation};
use spectrum_io::search_result::MaxQuant;

fuzz_target!(|data: &[u8]| {
    let Ok(sequence) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(patterns) = PatternCompiler::new().compile(&MaxQuant::standard_mods()) else {
        return;
    };

    // Arbitrary engine strings must never panic, whatever markup they carry
    let canonical = patterns.canonicalize(sequence);
    let (bare, length) = normalize(&canonical);
    assert_eq!(bare.chars().count(), length);

    if is_supported_sequence(&canonical) {
        for variant in PtmPermutation::deamidation().permutations(&canonical) {
            assert_eq!(normalize(&variant).0, bare);
        }
    }
});
