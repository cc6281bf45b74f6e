//! Microbenchmarks for the pure consolidation transforms

use stationreg::consolidate::{major_minor, wildcard_user_segment};
use stationreg::duration::parse_duration;

fn main() {
    divan::main();
}

#[divan::bench(args = [
    "/home/alice/weewx-data/weewx.conf",
    "/Users/carol/weewx/bin/weewxd",
    "/etc/weewx/weewx.conf",
])]
fn bench_wildcard_user_segment(path: &str) -> String {
    wildcard_user_segment(path)
}

#[divan::bench(args = ["4.10.2", "3.11.2 (default)", "snapshot"])]
fn bench_major_minor(version: &str) -> String {
    major_minor(version)
}

#[divan::bench(args = ["7200", "2h", "30d", "1y"])]
fn bench_parse_duration(text: &str) -> u64 {
    parse_duration(text).unwrap()
}
