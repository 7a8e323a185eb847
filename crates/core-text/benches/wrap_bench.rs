use core_text::{CellMetrics, GlyphWidthCache, LineBudget, wrap_text};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const LISTING: &str = "\"The Adventures of Buckaroo Banzai Across the 8th Dimension\" (1984) \
    Peter Weller, John Lithgow. A neurosurgeon and rock star battles evil aliens from \
    the 8th dimension. PG %STEREO% %CC%";

fn bench_wrap(c: &mut Criterion) {
    let budget = LineBudget::new(344).with_margins(14, 0);
    let plain = CellMetrics::new(9, 20);
    let cached = GlyphWidthCache::new(plain);

    c.bench_function("wrap_listing_uncached", |b| {
        b.iter(|| wrap_text(black_box(LISTING), &budget, &plain))
    });
    c.bench_function("wrap_listing_cached", |b| {
        b.iter(|| wrap_text(black_box(LISTING), &budget, &cached))
    });
}

criterion_group!(benches, bench_wrap);
criterion_main!(benches);
