// Parsing, grouping and comparison through the public API

use benchcheck::aggregate::group_samples;
use benchcheck::parser::{parse_line, parse_samples};
use benchcheck::stat::{stat, Confidence, StatConfig};
use std::fs;

fn read(path: &str) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_saved_go_output_matches_reference() {
    let old = read("tests/data/old.txt");
    let new = read("tests/data/new.txt");

    let results = stat(&old, &new, &StatConfig::default()).unwrap();

    let metrics: Vec<&str> = results.iter().map(|r| r.metric.as_str()).collect();
    assert_eq!(metrics, vec!["time/op", "speed"]);

    let time = &results[0];
    assert_eq!(time.bench_diffs[0].delta, -13.31);
    assert_eq!(time.bench_diffs[0].old_samples, 4);
    assert_eq!(time.bench_diffs[0].new_samples, 5);
    assert_eq!(time.bench_diffs[0].confidence, Confidence::Full);
    assert!(time.bench_diffs[0].p_value.unwrap() < 0.05);
    assert_eq!(time.bench_diffs[1].delta, 0.0);

    let speed = &results[1];
    assert_eq!(speed.bench_diffs[0].delta, 15.36);
    assert_eq!(speed.bench_diffs[1].old, "60.4MB/s ± 1%");
    assert_eq!(speed.bench_diffs[1].new, "61.1MB/s ± 2%");
}

#[test]
fn test_noise_lines_are_ignored() {
    let lines = [
        "goos: linux",
        "goarch: amd64",
        "pkg: example.com/fake",
        "Benchmark",
        "BenchmarkBroken 10",
        "BenchmarkBroken 10 100",
        "BenchmarkBroken 10 abc ns/op",
        "BenchmarkBroken -3 100 ns/op",
        "BenchmarkGood-8 10 100 ns/op",
        "PASS",
        "ok  \texample.com/fake\t1.234s",
    ];

    let samples = parse_samples(&lines);
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].name, "Good-8");
    assert_eq!(samples[0].metric, "time/op");
}

#[test]
fn test_memory_metrics() {
    let record = parse_line("BenchmarkAlloc 1000 1500 ns/op 4096 B/op 12 allocs/op").unwrap();
    let metrics: Vec<String> = record.samples().into_iter().map(|s| s.metric).collect();
    assert_eq!(metrics, vec!["time/op", "alloc/op", "allocs/op"]);

    let old = ["BenchmarkAlloc 1000 1500 ns/op 4096 B/op 12 allocs/op"; 3];
    let new = [
        "BenchmarkAlloc 1000 1500 ns/op 4096 B/op 12 allocs/op",
        "BenchmarkAlloc 1000 1500 ns/op 4096 B/op 12 allocs/op",
        "BenchmarkAlloc 1000 1500 ns/op 4096 B/op 12 allocs/op",
    ];
    let results = stat(&old, &new, &StatConfig::default()).unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[1].metric, "alloc/op");
    assert_eq!(results[1].bench_diffs[0].old, "4.10kB ± 0%");
    assert_eq!(results[2].bench_diffs[0].old, "12.0 ± 0%");
}

#[test]
fn test_custom_units_keep_their_name() {
    let old = ["BenchmarkQuery 10 7 rows/op"; 2];
    let new = ["BenchmarkQuery 10 7 rows/op"; 2];

    let results = stat(&old, &new, &StatConfig::default()).unwrap();
    assert_eq!(results[0].metric, "rows/op");
}

#[test]
fn test_groups_follow_old_order() {
    let old = parse_samples(&[
        "BenchmarkB 1 1 ns/op",
        "BenchmarkA 1 1 ns/op",
        "BenchmarkC 1 1 ns/op",
    ]);
    let new = parse_samples(&[
        "BenchmarkC 1 1 ns/op",
        "BenchmarkA 1 1 ns/op",
        "BenchmarkB 1 1 ns/op",
    ]);

    let grouped = group_samples(&old, &new);
    let names: Vec<&str> = grouped[0].groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A", "C"]);
}

#[test]
fn test_single_run_comparison_is_reduced_confidence() {
    let results = stat(
        &["BenchmarkA 10 100 ns/op"],
        &["BenchmarkA 10 150 ns/op"],
        &StatConfig::default(),
    )
    .unwrap();

    let diff = &results[0].bench_diffs[0];
    assert_eq!(diff.delta, 50.0);
    assert_eq!(diff.confidence, Confidence::Reduced);
    assert_eq!(diff.p_value, None);
    assert!(diff
        .to_string()
        .ends_with("delta: +50.00% (single sample, not significance tested)"));
}

#[test]
fn test_permissive_config_reports_more() {
    // U = 3 for 5 vs 5 untied samples: exact p = 14/252 ~ 0.056
    let old = [
        "BenchmarkA 10 100 ns/op",
        "BenchmarkA 10 101 ns/op",
        "BenchmarkA 10 102 ns/op",
        "BenchmarkA 10 104 ns/op",
        "BenchmarkA 10 106 ns/op",
    ];
    let new = [
        "BenchmarkA 10 103 ns/op",
        "BenchmarkA 10 105 ns/op",
        "BenchmarkA 10 107 ns/op",
        "BenchmarkA 10 108 ns/op",
        "BenchmarkA 10 109 ns/op",
    ];

    let default = stat(&old, &new, &StatConfig::default()).unwrap();
    assert_eq!(default[0].bench_diffs[0].delta, 0.0);

    let permissive = stat(&old, &new, &StatConfig::permissive()).unwrap();
    assert!(permissive[0].bench_diffs[0].delta > 0.0);
}
