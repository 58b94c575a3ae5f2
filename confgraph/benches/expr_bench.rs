use confgraph::expr::{evaluate, parse, EvalContext};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("integer", |b| {
        b.iter(|| parse(black_box("42")));
    });

    group.bench_function("arithmetic", |b| {
        b.iter(|| parse(black_box("2 * (3 + 4) ** 2 - 10 // 3")));
    });

    group.bench_function("calls_and_lists", |b| {
        b.iter(|| parse(black_box("[sqrt(2), max(1, 2.5, pi), -abs(-3)]")));
    });

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let context = EvalContext::default();

    group.bench_function("integer", |b| {
        b.iter(|| evaluate(black_box("10"), &context));
    });

    group.bench_function("arithmetic", |b| {
        b.iter(|| evaluate(black_box("2 * (3 + 4) ** 2 - 10 // 3"), &context));
    });

    group.bench_function("boolean", |b| {
        b.iter(|| evaluate(black_box("not (1 < 2 and 3 >= 4) or False"), &context));
    });

    // Rejected input stops at the parser
    group.bench_function("syntax_error", |b| {
        b.iter(|| evaluate(black_box("bad_expr("), &context));
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_evaluate);
criterion_main!(benches);
