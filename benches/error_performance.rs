// benches/error_performance.rs
//! Benchmarks for exception construction and trace delivery.
//!
//! Construction sits on failure paths inside control loops, so the numbers
//! that matter are: the plain constructor, the formatted constructor (which
//! renders into the 256-byte buffer), and what the trace hook adds on top.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dynamic_graph_exceptions::{
    FactoryError, FactoryErrorCode, SignalError, SignalErrorCode, TraceBuffer, factory_err,
    logging, render_bounded,
};
use std::sync::Arc;

// ============================================================================
// Construction
// ============================================================================

fn bench_plain_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("plain_construction");

    group.bench_function("factory_traces_gated", |b| {
        logging::set_verbosity(0);
        b.iter(|| {
            black_box(FactoryError::new(
                black_box(FactoryErrorCode::UnreferedObject),
                black_box("unknown entity"),
            ))
        });
        logging::reset_verbosity();
    });

    group.bench_function("signal_untraced", |b| {
        b.iter(|| {
            black_box(SignalError::new(
                black_box(SignalErrorCode::NotInitialized),
                black_box("unknown entity"),
            ))
        });
    });

    group.finish();
}

fn bench_formatted_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatted_construction");
    logging::set_verbosity(0);

    for len in [8usize, 128, 255, 1024] {
        let detail = "d".repeat(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &detail, |b, detail| {
            b.iter(|| {
                black_box(factory_err!(
                    FactoryErrorCode::SyntaxError,
                    "bad param: ",
                    "{}={}",
                    black_box(detail.as_str()),
                    black_box(5)
                ))
            });
        });
    }

    logging::reset_verbosity();
    group.finish();
}

// ============================================================================
// Rendering
// ============================================================================

fn bench_render_bounded(c: &mut Criterion) {
    let short = "x=5";
    let long = "y".repeat(4096);

    c.bench_function("render_short", |b| {
        b.iter(|| black_box(render_bounded(format_args!("{}", black_box(short)))))
    });

    c.bench_function("render_truncated", |b| {
        b.iter(|| black_box(render_bounded(format_args!("{}", black_box(long.as_str())))))
    });
}

// ============================================================================
// Trace Delivery
// ============================================================================

fn bench_trace_capture(c: &mut Criterion) {
    let buffer = TraceBuffer::new(1024, 512);

    c.bench_function("factory_with_trace_buffer", |b| {
        logging::with_sink(Arc::new(buffer.clone()), || {
            b.iter(|| {
                black_box(factory_err!(
                    FactoryErrorCode::ReadFile,
                    "cannot read ",
                    "{}",
                    black_box("robot.yaml")
                ))
            });
        });
    });
}

criterion_group!(
    benches,
    bench_plain_construction,
    bench_formatted_construction,
    bench_render_bounded,
    bench_trace_capture
);
criterion_main!(benches);
