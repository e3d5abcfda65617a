//! Benchmarks for editing and laying out documents.

use blockdown::document::{DocumentController, DocumentOptions};
use blockdown::event::EditKey;
use blockdown::ui::layout::DocumentLayout;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn sample_content(blocks: usize) -> String {
    (0..blocks)
        .map(|i| format!("Paragraph {i} with **bold** and `code` spans that wrap a little."))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn bench_typing(c: &mut Criterion) {
    let content = sample_content(100);
    c.bench_function("type_into_100_block_document", |b| {
        b.iter(|| {
            let mut doc = DocumentController::from_content(&content, DocumentOptions::default());
            doc.activate(50);
            for (i, ch) in "hello world".chars().enumerate() {
                doc.handle_key(EditKey::Char(black_box(ch)), i as u64);
            }
            doc
        });
    });
}

fn bench_layout(c: &mut Criterion) {
    let mut doc = DocumentController::from_content(&sample_content(100), DocumentOptions::default());
    doc.activate(10);
    c.bench_function("layout_100_blocks", |b| {
        b.iter(|| DocumentLayout::build(black_box(&doc), 78))
    });
}

criterion_group!(benches, bench_typing, bench_layout);
criterion_main!(benches);
