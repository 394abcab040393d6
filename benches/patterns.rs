//! Benchmarks for star detection, extraction and replay.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use candlebot::prelude::*;

/// Generate deterministic bars with occasional long bodies
fn generate_bars(n: usize) -> Vec<Bar> {
  let mut bars = Vec::with_capacity(n);
  let mut price = 100.0;

  for i in 0..n {
    let change = ((i * 7 + 13) % 100) as f64 / 20.0 - 2.5; // Deterministic "random"
    let open = price;
    let close = price + change;
    bars.push(Bar::new(open, close));
    price = close.max(10.0);
  }

  bars
}

fn payload() -> String {
  let mut raw = String::from("{\"Meta Data\": {\"2. Symbol\": \"SPY\"},\n\"Time Series (1min)\": {\n");
  for minute in (0..100).rev() {
    raw.push_str(&format!(
      "  \"2024-05-01 15:{minute:02}:00\": {{\"1. open\": \"501.{minute:02}\", \"2. high\": \"502.00\", \
       \"3. low\": \"500.00\", \"4. close\": \"501.50\", \"5. volume\": \"1000\"}},\n"
    ));
  }
  raw.push_str("}}");
  raw
}

fn bench_predicates(c: &mut Criterion) {
  let bars = generate_bars(1000);

  c.bench_function("is_morning_star", |b| b.iter(|| is_morning_star(black_box(&bars))));
  c.bench_function("signals_evaluate", |b| b.iter(|| Signals::evaluate(black_box(&bars))));
}

fn bench_scan(c: &mut Criterion) {
  let mut group = c.benchmark_group("scan");

  for size in [100, 1000, 10000] {
    let bars = generate_bars(size);
    group.bench_with_input(BenchmarkId::from_parameter(size), &bars, |b, bars| {
      b.iter(|| scan(black_box(bars)))
    });
  }

  group.finish();
}

fn bench_extract(c: &mut Criterion) {
  let raw = payload();
  let extractor = BarExtractor::default();

  c.bench_function("extract_latest_bar", |b| b.iter(|| extractor.extract(black_box(&raw))));
}

fn bench_replay(c: &mut Criterion) {
  let bars = generate_bars(1000);

  c.bench_function("replay_1000", |b| {
    b.iter(|| replay(black_box(bars.iter().copied()), PositionEngine::default()))
  });
}

criterion_group!(benches, bench_predicates, bench_scan, bench_extract, bench_replay);
criterion_main!(benches);
