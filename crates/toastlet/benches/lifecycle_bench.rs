//! Benchmarks for the toast lifecycle.
//!
//! Run with: cargo bench -p toastlet --bench lifecycle_bench
//!
//! Performance targets:
//! - Single dispatch (hover in or out): < 1µs
//! - Full toast lifecycle on the headless renderer: < 50µs
//! - Bulk close of 100 toasts: < 2ms

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;
use toastlet::core::gesture::GestureRecognizer;
use toastlet::lifecycle::{Context, Input, ToastRecord, dispatch};
use toastlet::{
    Environment, HeadlessRenderer, Timestamp, ToastConfig, ToastId, ToastKind, ToastSignal,
    Toaster,
};

// =============================================================================
// Dispatch
// =============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("lifecycle/dispatch");
    let config = ToastConfig::defaults(ToastKind::Info);
    let cx = Context {
        now: Timestamp::from_millis(1000),
        env: Environment::desktop(),
    };

    group.bench_function("hover_round_trip", |b| {
        let mut record =
            ToastRecord::new(ToastId::from_raw(1), &config, GestureRecognizer::default());
        dispatch(&mut record, Input::Mount, &cx);
        dispatch(&mut record, Input::EnterSettled, &cx);
        b.iter(|| {
            let enter = dispatch(
                &mut record,
                Input::Signal(ToastSignal::PointerEnter {
                    emulated_touch: false,
                }),
                &cx,
            );
            let leave = dispatch(
                &mut record,
                Input::Signal(ToastSignal::PointerLeave {
                    into_toast: false,
                    emulated_touch: false,
                }),
                &cx,
            );
            dispatch(&mut record, Input::FlagReset(toastlet::lifecycle::FlagReset::Pointer), &cx);
            black_box((enter, leave));
        })
    });

    group.bench_function("closing_guard", |b| {
        let mut record =
            ToastRecord::new(ToastId::from_raw(1), &config, GestureRecognizer::default());
        dispatch(&mut record, Input::Mount, &cx);
        dispatch(&mut record, Input::Close(toastlet::CloseCause::Api), &cx);
        b.iter(|| {
            black_box(dispatch(
                &mut record,
                Input::Signal(ToastSignal::Click {
                    target: toastlet::Target::PauseButton,
                }),
                &cx,
            ))
        })
    });

    group.finish();
}

// =============================================================================
// Toaster
// =============================================================================

fn bench_full_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("lifecycle/toaster");

    group.bench_function("notify_to_removed", |b| {
        b.iter(|| {
            let mut toaster = Toaster::new(HeadlessRenderer::new());
            let id = toaster.notify("info", "Saved", &json!({})).unwrap().id();
            toaster.advance_to(Timestamp::from_millis(6000));
            black_box(toaster.phase(id))
        })
    });

    for count in [10_u64, 100] {
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::new("close_all", count), &count, |b, &count| {
            b.iter(|| {
                let mut toaster = Toaster::new(HeadlessRenderer::new());
                for _ in 0..count {
                    toaster
                        .notify("notice", "Queued", &json!({"stackable": true}))
                        .unwrap();
                }
                toaster.advance_to(Timestamp::from_millis(320));
                let closed = toaster.close_all();
                toaster.advance_to(Timestamp::from_millis(1000));
                black_box(closed)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_full_lifecycle);
criterion_main!(benches);
