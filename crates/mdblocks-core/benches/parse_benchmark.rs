//! Benchmarks comparing block scanning vs pulldown-cmark
//!
//! Run with: cargo bench -p mdblocks-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mdblocks_core::{parse_code_block, Parser};
use pulldown_cmark::{Options, Parser as MdParser};

const MARKDOWN_SAMPLE: &str = r#"# Introduction

This is a paragraph with *emphasis*, **strong text**, and `inline code`.
It demonstrates the block structure the scanner cares about.

## Code Example

```rust
fn fibonacci(n: u64) -> u64 {
    match n {
        0 => 0,
        1 => 1,
        _ => fibonacci(n - 1) + fibonacci(n - 2),
    }
}
```

    $ cargo bench
	    Finished release profile

## Quote

> The best code is no code at all.
> Every line of code you write is a liability.
>
> ```sh
> rm -rf legacy/
> ```
>
> > -- Someone wise

---

End of document.
"#;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(MARKDOWN_SAMPLE.len() as u64));

    group.bench_function("mdblocks", |b| {
        let parser = Parser::new();
        b.iter(|| {
            let doc = parser.parse(black_box(MARKDOWN_SAMPLE));
            black_box(doc.blocks.len())
        })
    });

    group.bench_function("pulldown_cmark", |b| {
        b.iter(|| {
            let parser = MdParser::new_ext(black_box(MARKDOWN_SAMPLE), Options::empty());
            let events: Vec<_> = parser.collect();
            black_box(events.len())
        })
    });

    group.finish();
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");

    for size in [1, 5, 10, 20].iter() {
        let content: String = MARKDOWN_SAMPLE.repeat(*size);
        group.throughput(Throughput::Bytes(content.len() as u64));

        group.bench_with_input(BenchmarkId::new("mdblocks", size), &content, |b, content| {
            let parser = Parser::new();
            b.iter(|| {
                let doc = parser.parse(black_box(content));
                black_box(doc.blocks.len())
            })
        });

        group.bench_with_input(
            BenchmarkId::new("pulldown_cmark", size),
            &content,
            |b, content| {
                b.iter(|| {
                    let parser = MdParser::new_ext(black_box(content), Options::empty());
                    let events: Vec<_> = parser.collect();
                    black_box(events.len())
                })
            },
        );
    }

    group.finish();
}

fn bench_code_block_rule(c: &mut Criterion) {
    let mut group = c.benchmark_group("code_block");

    let fenced = format!("```rust\n{}```\n", "\tlet x = compute(1, 2);\n".repeat(200));
    let indented = "    let x = compute(1, 2);\n\n".repeat(200);
    let quoted = "> > ```\n> > let x = 1;\n".repeat(100);

    for (name, input) in [("fenced", &fenced), ("indented", &indented), ("quoted", &quoted)] {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, input| {
            let depth = if name == "quoted" { 2 } else { 0 };
            b.iter(|| {
                let scan = parse_code_block(black_box(input), 0, input.len(), depth);
                black_box(scan.actual_end(0))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_scaling, bench_code_block_rule);
criterion_main!(benches);
