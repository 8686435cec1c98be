use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flowwatch::data::{detect_conflicts, HealthClassifier};
use flowwatch_types::{Channel, Flow, HealthTarget, MetricSnapshot, TriggerKind};

const CHANNELS: [Channel; 4] = [Channel::Email, Channel::Sms, Channel::Push, Channel::InApp];

/// A mix of daily, event and weekly flows spread over channels and products.
fn make_flows(count: usize) -> Vec<Flow> {
    (0..count)
        .map(|i| {
            let mut builder = Flow::builder(format!("flow-{}", i), format!("Flow {}", i))
                .product(format!("product-{}", i % 7), "Product")
                .channel(CHANNELS[i % CHANNELS.len()])
                .channel(CHANNELS[(i / 3) % CHANNELS.len()]);
            builder = match i % 3 {
                0 => builder.frequency("Daily"),
                1 => builder.trigger(TriggerKind::Event),
                _ => builder.frequency("Weekly"),
            };
            if i % 4 != 0 {
                builder = builder.priority(40 + (i % 20) as u8);
            }
            builder.build()
        })
        .collect()
}

/// Benchmark conflict detection over growing flow sets
fn bench_detect_conflicts(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_conflicts");

    for count in [10usize, 50, 100, 250].iter() {
        let flows = make_flows(*count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &flows, |b, flows| {
            b.iter(|| detect_conflicts(black_box(flows)));
        });
    }
    group.finish();
}

/// Benchmark a single health classification
fn bench_classify(c: &mut Criterion) {
    let classifier = HealthClassifier::default();
    let target = HealthTarget::open_rate(25.0);
    let previous = MetricSnapshot::builder(
        "wf",
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        Channel::Email,
    )
    .counts(10_000, 2_600, 300)
    .bounces(90)
    .build();
    let current = MetricSnapshot::builder(
        "wf",
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
        Channel::Email,
    )
    .counts(12_000, 2_700, 280)
    .bounces(120)
    .unsubscribes(14)
    .build();

    c.bench_function("classify", |b| {
        b.iter(|| classifier.classify(black_box(&current), black_box(Some(&previous)), &target));
    });
}

criterion_group!(benches, bench_detect_conflicts, bench_classify);
criterion_main!(benches);
