use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use llama_stack_demos::{
    ModelRecord, ResponseObject, language_model_ids, non_embedding_model_ids, route_prompt,
};
use serde_json::json;

// Helper to build a listing that mixes every record shape the reader handles
fn create_listing(count: usize) -> Vec<ModelRecord> {
    (0..count)
        .map(|i| {
            let value = match i % 5 {
                0 => json!({"identifier": format!("llama-{}", i), "model_type": "llm"}),
                1 => json!({"id": format!("nomic-embed-{}", i), "type": "embedding"}),
                2 => json!({"model_id": format!("llama-guard-{}", i)}),
                3 => json!({"name": format!("qwen-{}", i), "custom_metadata": {"model_type": "llm"}}),
                _ => json!({"id": format!("all-MiniLM-{}", i), "metadata": {"type": "llm"}}),
            };
            serde_json::from_value(value).unwrap()
        })
        .collect()
}

fn create_listing_json(count: usize) -> String {
    let data: Vec<_> = (0..count)
        .map(|i| json!({"identifier": format!("model-{}", i), "model_type": "llm", "provider_id": "ollama"}))
        .collect();
    json!({ "data": data }).to_string()
}

// Benchmark: route_prompt over the demo prompts and a long prompt
fn bench_route_prompt(c: &mut Criterion) {
    let mut group = c.benchmark_group("route_prompt");

    let prompts = [
        "Summarize what Llama Stack provides in one sentence.",
        "What is the closing price of GOOG for 2023?",
        "Calculate (45 * 18) / 6.",
        "Search for the latest Llama Stack release notes and summarize them.",
    ];
    group.bench_function("demo_prompts", |b| {
        b.iter(|| {
            for prompt in prompts {
                black_box(route_prompt(black_box(prompt), black_box(true)));
            }
        });
    });

    let long = "tell me about it ".repeat(500);
    group.bench_function("long_general_prompt", |b| {
        b.iter(|| route_prompt(black_box(&long), black_box(true)));
    });

    group.finish();
}

// Benchmark: model filters with varying listing sizes
fn bench_model_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_filters");

    for count in [1, 10, 50, 200].iter() {
        let records = create_listing(*count);
        group.bench_with_input(BenchmarkId::new("language_models", count), &records, |b, r| {
            b.iter(|| language_model_ids(black_box(r)));
        });
        group.bench_with_input(BenchmarkId::new("non_embedding", count), &records, |b, r| {
            b.iter(|| non_embedding_model_ids(black_box(r)));
        });
    }

    group.finish();
}

// Benchmark: decoding a listing and a response body
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for count in [10, 100].iter() {
        let body = create_listing_json(*count);
        group.bench_with_input(BenchmarkId::new("model_listing", count), &body, |b, body| {
            b.iter(|| {
                let value: serde_json::Value = serde_json::from_str(black_box(body)).unwrap();
                let records: Vec<ModelRecord> = serde_json::from_value(value["data"].clone()).unwrap();
                records
            });
        });
    }

    let response = json!({
        "id": "resp_1",
        "status": "completed",
        "output": [
            {"type": "web_search_call", "id": "ws_1", "status": "completed"},
            {"type": "message", "role": "assistant", "content": [
                {"type": "output_text", "text": "Llama Stack is an open server for AI apps."}
            ]}
        ]
    })
    .to_string();
    group.bench_function("response_output_text", |b| {
        b.iter(|| {
            let parsed: ResponseObject = serde_json::from_str(black_box(&response)).unwrap();
            parsed.output_text()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_route_prompt, bench_model_filters, bench_decode);
criterion_main!(benches);
