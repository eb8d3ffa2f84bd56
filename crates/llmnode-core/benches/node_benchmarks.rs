use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use llmnode_core::context::ExecutionContext;
use llmnode_core::credential::InMemoryCredentialResolver;
use llmnode_core::inputs::{NodeData, parse_float, parse_int};
use llmnode_core::nodes::together::{self, API_KEY_FIELD, init_chat_together_ai};

fn bench_descriptor(c: &mut Criterion) {
    c.bench_function("together_descriptor", |b| {
        b.iter(|| black_box(together::descriptor()));
    });
}

fn bench_descriptor_json(c: &mut Criterion) {
    let descriptor = together::descriptor();
    c.bench_function("together_descriptor_json", |b| {
        b.iter(|| black_box(&descriptor).to_json().unwrap());
    });
}

fn bench_coercion(c: &mut Criterion) {
    c.bench_function("parse_float", |b| {
        b.iter(|| parse_float(black_box("  0.75abc")));
    });
    c.bench_function("parse_int", |b| {
        b.iter(|| parse_int(black_box("4096")));
    });
}

fn bench_init(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let resolver =
        InMemoryCredentialResolver::new().with_credential("cred", [(API_KEY_FIELD, "sk-bench")]);
    let ctx = ExecutionContext::new(Arc::new(resolver));
    let data = NodeData::new("bench")
        .with_credential("cred")
        .with_input("temperature", "0.7")
        .with_input("maxTokens", "512")
        .with_input("topP", "0.9");

    c.bench_function("together_init", |b| {
        b.iter(|| {
            rt.block_on(init_chat_together_ai(black_box(&data), &ctx))
                .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_descriptor,
    bench_descriptor_json,
    bench_coercion,
    bench_init,
);
criterion_main!(benches);
