#![no_main]

use libfuzzer_sys::fuzz_target;
use statverdict::analysis::{analyze_latency, analyze_reflective, AnalysisConfig};
use statverdict::csv_input::read_records_from_reader;
use statverdict::records::{normalize, LatencyRecord, ReviewRecord, SessionRecord};
use statverdict::statistics::BootstrapConfig;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as a CSV log; reading may fail but must not panic
    let Ok(rows) = read_records_from_reader(data) else {
        return;
    };

    let config = AnalysisConfig {
        bootstrap: BootstrapConfig {
            n_resamples: 16,
            ..BootstrapConfig::default()
        },
        ..AnalysisConfig::default()
    };

    if let Ok(records) = normalize(&rows, LatencyRecord::from_raw) {
        let _ = analyze_latency(&records, &config);
    }
    if let Ok(records) = normalize(&rows, ReviewRecord::from_raw) {
        let _ = analyze_reflective(&records, None, &config);
    }
    let _ = normalize(&rows, SessionRecord::from_raw);
});
