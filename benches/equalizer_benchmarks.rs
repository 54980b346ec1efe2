//! Equalizer Benchmarks
//!
//! Performance benchmarks for filter design and full equalizer passes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use triband::dsp::BandPassDesign;
use triband::{equalize, AudioBuffer, GainSet};

fn benchmark_filter_design(c: &mut Criterion) {
    c.bench_function("design_band_pass_order4", |b| {
        b.iter(|| BandPassDesign::new(black_box(4), 250.0, 4000.0, 44100).unwrap())
    });
}

fn benchmark_equalize(c: &mut Criterion) {
    let buffer = AudioBuffer::sine_wave(440.0, 0.5, 10.0, 44100).unwrap();
    let gains = GainSet::new(3.0, -2.0, 6.0);

    c.bench_function("equalize_10s_mono", |b| {
        b.iter(|| equalize(black_box(&buffer), black_box(&gains)).unwrap())
    });
}

criterion_group!(benches, benchmark_filter_design, benchmark_equalize);
criterion_main!(benches);
