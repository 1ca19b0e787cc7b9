// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

use commit_notify_git::HistoryIndex;
use criterion::{Criterion, criterion_group, criterion_main};

fn fake_history(len: usize) -> Vec<String> {
    (0..len).map(|i| format!("{i:040x}")).collect()
}

fn history_benchmark(c: &mut Criterion) {
    let history = fake_history(100_000);

    c.bench_function("history_index_build_100k", |b| {
        b.iter(|| HistoryIndex::new(std::hint::black_box(history.iter().cloned())))
    });

    let index = HistoryIndex::new(history.iter().cloned());
    let newest = history.last().cloned().unwrap_or_default();
    c.bench_function("history_index_lookup", |b| {
        b.iter(|| index.ordinal(std::hint::black_box(&newest)))
    });
}

criterion_group!(benches, history_benchmark);
criterion_main!(benches);
