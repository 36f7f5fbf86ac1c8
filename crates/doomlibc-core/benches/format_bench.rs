//! Format engine benchmarks.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use doomlibc_core::stdio::{parse_format_string, render_to_vec};
use doomlibc_core::va::VaArg;

fn bench_parse(c: &mut Criterion) {
    let fmt = b"W_GetNumForName: %s not found! (lump %d of %d, flags %#x)";
    c.bench_function("parse_format_string", |b| {
        b.iter(|| parse_format_string(black_box(fmt)))
    });
}

fn bench_render(c: &mut Criterion) {
    let fmt = b"R_InitTextures: %-8.8s %5d/%5d [%p]";
    let args = [
        VaArg::Str(Some(b"TEXTURE1")),
        VaArg::Int(127),
        VaArg::Int(512),
        VaArg::Ptr(0x7f00_dead_beef),
    ];
    c.bench_function("render_to_vec", |b| {
        b.iter(|| render_to_vec(black_box(fmt), black_box(&args)))
    });
}

criterion_group!(benches, bench_parse, bench_render);
criterion_main!(benches);
