use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use vitals_hub::{
    link::{codec, Frame},
    vitals::status::{BmiStatus, HeightStatus, Spo2Status, WeightStatus},
    AggregatorConfig, BoardId, BoardSample, RemoteSnapshot, SampleStore, VitalsAggregator,
};

/// Benchmark the threshold classifiers across representative inputs
fn bench_classification(c: &mut Criterion) {
    let values = [f64::NAN, 1.2, 45.0, 70.0, 95.0, 160.0, 200.0];

    c.bench_function("classify_all_metrics", |b| {
        b.iter(|| {
            for value in values {
                std::hint::black_box(HeightStatus::classify(value));
                std::hint::black_box(WeightStatus::classify(value));
                std::hint::black_box(BmiStatus::classify(value));
                std::hint::black_box(Spo2Status::classify(value));
            }
        })
    });
}

/// Benchmark wire encode/decode for both frame kinds
fn bench_codec(c: &mut Criterion) {
    let sample = Frame::Sample(BoardSample {
        board: BoardId::Ranging,
        a: 0.30,
        b: 0.31,
        c: 0.42,
    });
    let snapshot = Frame::Snapshot(RemoteSnapshot {
        weight_kg: 70.0,
        height_cm: 175.0,
        bmi: 22.86,
        timestamp: 12345,
    });

    let mut group = c.benchmark_group("codec_round_trip");
    for (name, frame) in [("sample", &sample), ("snapshot", &snapshot)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), frame, |b, frame| {
            b.iter(|| {
                let wire = codec::encode(frame);
                codec::decode(&wire).expect("Should decode")
            })
        });
    }
    group.finish();
}

/// Benchmark a full aggregation pass over a populated store
fn bench_aggregation(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Should create tokio runtime");

    let aggregator = rt.block_on(async {
        let store = SampleStore::new();
        store
            .apply_board_sample(BoardSample {
                board: BoardId::Scale,
                a: 70.0,
                b: 0.0,
                c: 0.0,
            })
            .await;
        store
            .apply_board_sample(BoardSample {
                board: BoardId::Thermal,
                a: 36.6,
                b: 24.0,
                c: 0.0,
            })
            .await;
        store
            .apply_board_sample(BoardSample {
                board: BoardId::Ranging,
                a: 0.30,
                b: 0.30,
                c: 0.40,
            })
            .await;
        VitalsAggregator::new(store, AggregatorConfig::default())
    });

    c.bench_function("aggregation_pass", |b| {
        b.to_async(&rt)
            .iter(|| async { aggregator.aggregate().await })
    });
}

/// Benchmark JSON serialization of a classified snapshot
fn bench_json_serialization(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Should create tokio runtime");
    let snapshot = rt.block_on(async {
        let aggregator = VitalsAggregator::new(SampleStore::new(), AggregatorConfig::default());
        aggregator.aggregate().await
    });

    c.bench_function("json_serialization", |b| {
        b.iter(|| serde_json::to_string(&snapshot).expect("Should serialize"))
    });
}

criterion_group!(
    benches,
    bench_classification,
    bench_codec,
    bench_aggregation,
    bench_json_serialization
);
criterion_main!(benches);
