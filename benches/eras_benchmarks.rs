//! # Eras Performance Benchmarks
//!
//! Benchmarks for the segmentation pipeline over synthetic multi-year
//! listening histories.
//!
//! ## Benchmark Categories
//!
//! - **Aggregation**: Grouping plays into ISO weeks
//! - **Boundaries**: Similarity scoring and boundary detection
//! - **Pipeline**: Aggregation, detection and era building together
//! - **Ingestion**: Parsing an export file's JSON
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark group
//! cargo bench aggregation
//! cargo bench pipeline
//! ```

use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use eras::aggregate::aggregate_weeks;
use eras::boundary::detect_boundaries;
use eras::config::SegmentConfig;
use eras::ingest::parse_export;
use eras::models::ListeningEvent;
use eras::pipeline::segment_history;
use std::hint::black_box;

/// Roughly `years` of listening: 60 plays a week spread over a rotating
/// pool of artists, with the pool shifting every quarter.
fn synthetic_history(years: i64) -> Vec<ListeningEvent> {
    let start = Utc.with_ymd_and_hms(2018, 1, 1, 8, 0, 0).unwrap();
    let weeks = years * 52;
    let mut events = Vec::with_capacity((weeks * 60) as usize);

    for week in 0..weeks {
        let quarter = week / 13;
        for play in 0..60i64 {
            let artist = format!("Artist {}", quarter * 7 + (play * 31 + week) % 25);
            let track = format!("Track {}", (play * 17 + week) % 40);
            let at = start + Duration::weeks(week) + Duration::minutes(play * 97);
            events.push(ListeningEvent::new(at, artist, track, 120_000 + (play as u64) * 1_000));
        }
    }
    events
}

fn export_json(events: &[ListeningEvent]) -> Vec<u8> {
    let entries: Vec<serde_json::Value> = events
        .iter()
        .map(|e| {
            serde_json::json!({
                "ts": e.timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                "ms_played": e.ms_played,
                "master_metadata_track_name": e.track_name,
                "master_metadata_album_artist_name": e.artist_name,
            })
        })
        .collect();
    serde_json::to_vec(&entries).expect("Failed to serialize export")
}

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");

    for years in [1, 3, 5] {
        let events = synthetic_history(years);
        group.bench_with_input(BenchmarkId::new("aggregate_weeks", years), &events, |b, events| {
            b.iter(|| aggregate_weeks(black_box(events)));
        });
    }

    group.finish();
}

fn bench_boundaries(c: &mut Criterion) {
    let weeks = aggregate_weeks(&synthetic_history(5));
    let mut group = c.benchmark_group("boundaries");

    for threshold in [0.1, 0.3, 0.6] {
        group.bench_with_input(
            BenchmarkId::new("detect_boundaries", threshold),
            &threshold,
            |b, &threshold| b.iter(|| detect_boundaries(black_box(&weeks), threshold)),
        );
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let events = synthetic_history(5);
    let config = SegmentConfig::default();

    c.bench_function("pipeline/segment_history_5y", |b| {
        b.iter(|| segment_history(black_box(&events), &config));
    });
}

fn bench_ingestion(c: &mut Criterion) {
    let content = export_json(&synthetic_history(1));

    c.bench_function("ingestion/parse_export_1y", |b| {
        b.iter(|| parse_export(black_box(&content), 30_000));
    });
}

criterion_group!(benches, bench_aggregation, bench_boundaries, bench_pipeline, bench_ingestion);
criterion_main!(benches);
