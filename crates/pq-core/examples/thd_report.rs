//! Analyse a synthetic three-phase current and print its distortion figures
//!
//! Run with: cargo run --example thd_report -p pq-core [-- config.yaml]

use pq_core::observe::init_logging;
use pq_core::{AnalyzerConfig, PowerQualityAnalyzer, Waveform};
use std::f64::consts::PI;
use std::path::Path;

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => AnalyzerConfig::load_from(Path::new(&path)).expect("load config"),
        None => AnalyzerConfig::default(),
    };
    init_logging(&config.logging);

    let fs = config.sample_rate;
    let f0 = config.supply_frequency.hz();
    let n = fs as usize;

    let names = ["ia", "ib", "ic"].iter().map(|s| s.to_string()).collect();
    let columns = (0..3)
        .map(|phase| {
            let shift = phase as f64 * 2.0 * PI / 3.0;
            (0..n)
                .map(|i| {
                    let t = i as f64 / fs;
                    (2.0 * PI * f0 * t + shift).sin()
                        + 0.05 * (2.0 * PI * 5.0 * f0 * t + 5.0 * shift).sin()
                        + 0.03 * (2.0 * PI * 7.0 * f0 * t + 7.0 * shift).sin()
                })
                .collect()
        })
        .collect();
    let waveform = Waveform::new(names, columns).expect("build waveform");

    let analyzer = PowerQualityAnalyzer::from_config(&config).expect("build analyzer");
    let report = analyzer.analyze(&waveform).expect("analyze");

    println!("Supply: {}, {} samples at {} Hz\n", report.supply, report.sample_count, fs);
    for (channel, thd) in report.thd.iter() {
        println!("  {}: THD = {:.3} %", channel, thd);
    }
    if let Some(tdd) = &report.tdd {
        for (channel, value) in tdd.iter() {
            println!("  {}: TDD = {:.3} %", channel, value);
        }
    }
}
