use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use compact_float::{decode, encode_big_to_vec, encode_to_slice, BigDecimal, DFloat};

// ---------------------------------------------------------------------------
// Input generation
// ---------------------------------------------------------------------------

/// Build a decimal string of `n` significant digits: "1234567890123..." with a
/// decimal point after the third digit.
fn make_large_decimal(n: usize) -> String {
    let mut s = String::with_capacity(n + 1);
    for i in 0..n {
        if i == 3 {
            s.push('.');
        }
        s.push(char::from(b'0' + (((i % 9) + 1) as u8))); // 1-9 repeating
    }
    s
}

// ---------------------------------------------------------------------------
// Construction benchmarks
// ---------------------------------------------------------------------------

fn bench_construct(c: &mut Criterion) {
    let mut g = c.benchmark_group("construct");

    let small = "42";
    let medium = "123.456789";
    let rounded = make_large_decimal(40);

    g.bench_function("parse/small", |b| {
        b.iter(|| DFloat::parse(black_box(small)).unwrap());
    });
    g.bench_function("parse/medium", |b| {
        b.iter(|| DFloat::parse(black_box(medium)).unwrap());
    });
    g.bench_function("parse/rounded_40d", |b| {
        b.iter(|| DFloat::parse(black_box(rounded.as_str())).unwrap());
    });

    g.bench_function("from_u64", |b| {
        b.iter(|| DFloat::from_u64(black_box(123_456_789_u64)));
    });
    g.bench_function("from_f64/full", |b| {
        b.iter(|| DFloat::from_f64(black_box(123.456_789_f64), 0));
    });
    g.bench_function("from_f64/6_digits", |b| {
        b.iter(|| DFloat::from_f64(black_box(0.147_344_521_913_454_3_f64), 6));
    });

    g.finish();
}

// ---------------------------------------------------------------------------
// Wire benchmarks
// ---------------------------------------------------------------------------

fn bench_wire(c: &mut Criterion) {
    let mut g = c.benchmark_group("wire");

    let inputs = [
        ("zero", DFloat::ZERO),
        ("small", DFloat::new(0, 42)),
        ("medium", DFloat::new(-6, 123_456_789)),
        ("widest", DFloat::new(-i32::MAX, -i64::MAX)),
    ];

    for (name, value) in &inputs {
        g.bench_with_input(BenchmarkId::new("encode", name), value, |b, &v| {
            let mut buf = [0u8; 16];
            b.iter(|| encode_to_slice(black_box(v), &mut buf).unwrap());
        });

        let bytes = value.to_bytes();
        g.bench_with_input(BenchmarkId::new("decode", name), &bytes, |b, bytes| {
            b.iter(|| decode(black_box(bytes)).unwrap());
        });
    }

    let big: BigDecimal = make_large_decimal(100).parse().unwrap();
    g.bench_function("encode_big/100d", |b| {
        let mut out = Vec::with_capacity(64);
        b.iter(|| {
            out.clear();
            encode_big_to_vec(black_box(&big), &mut out).unwrap()
        });
    });

    let mut big_bytes = Vec::new();
    encode_big_to_vec(&big, &mut big_bytes).unwrap();
    g.bench_function("decode_big/100d", |b| {
        b.iter(|| decode(black_box(&big_bytes)).unwrap());
    });

    g.finish();
}

// ---------------------------------------------------------------------------
// Conversion benchmarks
// ---------------------------------------------------------------------------

fn bench_convert(c: &mut Criterion) {
    let mut g = c.benchmark_group("convert");

    let small = DFloat::new(0, 42);
    let medium = DFloat::new(-6, 123_456_789);
    let large = DFloat::new(100, 1_234_567_890_123_456_789);

    g.bench_with_input(BenchmarkId::new("display", "small"), &small, |b, d| {
        b.iter(|| format!("{}", black_box(d)));
    });
    g.bench_with_input(BenchmarkId::new("display", "medium"), &medium, |b, d| {
        b.iter(|| format!("{}", black_box(d)));
    });
    g.bench_with_input(BenchmarkId::new("display", "large"), &large, |b, d| {
        b.iter(|| format!("{}", black_box(d)));
    });

    g.bench_function("to_f64/medium", |b| {
        b.iter(|| black_box(medium).to_f64());
    });
    g.bench_function("to_big_decimal/large", |b| {
        b.iter(|| black_box(large).to_big_decimal());
    });

    g.finish();
}

// ---------------------------------------------------------------------------
// Round-trip benchmarks
// ---------------------------------------------------------------------------

fn bench_roundtrip(c: &mut Criterion) {
    let mut g = c.benchmark_group("roundtrip");

    let inputs = [("small", "42"), ("medium", "123.456789")];

    for (name, input) in &inputs {
        // String -> DFloat -> bytes -> DFloat
        g.bench_with_input(BenchmarkId::new("str_encode_decode", name), input, |b, &s| {
            b.iter(|| {
                let d: DFloat = black_box(s).parse().unwrap();
                let mut buf = [0u8; 16];
                let len = encode_to_slice(d, &mut buf).unwrap();
                decode(&buf[..len]).unwrap()
            });
        });

        // String -> DFloat -> Display -> String
        g.bench_with_input(BenchmarkId::new("str_display", name), input, |b, &s| {
            b.iter(|| {
                let d: DFloat = black_box(s).parse().unwrap();
                format!("{d}")
            });
        });
    }

    g.finish();
}

// ---------------------------------------------------------------------------
// Criterion harness
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_construct,
    bench_wire,
    bench_convert,
    bench_roundtrip
);
criterion_main!(benches);
