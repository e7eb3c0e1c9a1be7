//! 标志评估性能基准测试
//!
//! 分别测量条件解析、条件匹配以及完整的标志评估。

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use flag_engine::{Condition, ConfigDocument, EvaluationContext, FlagEvaluator};
use serde_json::{Value, json};
use std::hint::black_box;

fn create_context() -> EvaluationContext {
    EvaluationContext::new(json!({
        "user": {
            "id": "user-123",
            "role": "admin",
            "profile": { "tier": "gold", "region": "eu-west" }
        },
        "device": { "platform": "ios" }
    }))
}

/// 构造包含 `rule_count` 条规则的文档，只有最后一条命中
fn create_document(rule_count: usize) -> ConfigDocument {
    let mut rules: Vec<Value> = (0..rule_count.saturating_sub(1))
        .map(|i| json!({ "condition": format!("user.role == \"role-{}\"", i), "value": i }))
        .collect();
    rules.push(json!({ "condition": "user.role == \"admin\"", "value": "hit" }));

    ConfigDocument::new(json!({
        "features": {
            "flag": { "default": "miss", "rules": rules }
        }
    }))
}

fn bench_condition_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("condition_parsing");

    group.bench_function("equality", |b| {
        b.iter(|| Condition::parse(black_box(Some(r#"user.profile.tier == "gold""#))))
    });

    group.bench_function("unrecognized", |b| {
        b.iter(|| Condition::parse(black_box(Some("user.age >= 21"))))
    });

    group.bench_function("unconditional", |b| b.iter(|| Condition::parse(black_box(None))));

    group.finish();
}

fn bench_condition_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("condition_matching");
    let context = create_context();

    let hit = Condition::parse(Some(r#"user.profile.tier == "gold""#));
    let miss = Condition::parse(Some(r#"user.profile.missing == "gold""#));

    group.bench_function("hit", |b| b.iter(|| hit.matches(black_box(&context))));
    group.bench_function("missing_path", |b| b.iter(|| miss.matches(black_box(&context))));

    group.finish();
}

fn bench_flag_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("flag_evaluation");
    let evaluator = FlagEvaluator::new();
    let context = create_context();

    for rule_count in [1usize, 10, 50] {
        let document = create_document(rule_count);
        group.bench_with_input(
            BenchmarkId::new("last_rule_matches", rule_count),
            &document,
            |b, document| {
                b.iter(|| {
                    evaluator.evaluate(
                        black_box(document),
                        black_box("flag"),
                        black_box(&context),
                        json!(false),
                    )
                })
            },
        );
    }

    let document = create_document(1);
    group.bench_function("flag_not_found", |b| {
        b.iter(|| {
            evaluator.evaluate(
                black_box(&document),
                black_box("absent"),
                black_box(&context),
                json!(false),
            )
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_condition_parsing,
    bench_condition_matching,
    bench_flag_evaluation
);
criterion_main!(benches);
