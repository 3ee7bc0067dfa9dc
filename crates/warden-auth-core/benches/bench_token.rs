//! Benchmarks for the token codec hot paths

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use warden_auth_core::{SigningKey, TokenClaims, TokenCodec, TokenKind};
use warden_types::{FamilyId, PrincipalId, Role};

fn bench_claims(kind: TokenKind) -> TokenClaims {
    let now = Utc::now().timestamp();
    TokenClaims {
        principal_id: PrincipalId::new(),
        role: Role::new("member").unwrap(),
        kind,
        issued: now,
        expires: now + 3600,
        family_id: FamilyId::new(),
        seq: 42,
    }
}

fn bench_codec(c: &mut Criterion) {
    let codec = TokenCodec::new(SigningKey::new("benchmark-signing-secret-32-byte!").unwrap());

    let mut group = c.benchmark_group("token_codec");

    for kind in [TokenKind::Access, TokenKind::Refresh] {
        let claims = bench_claims(kind);
        group.bench_with_input(BenchmarkId::new("issue", kind), &claims, |b, claims| {
            b.iter(|| codec.issue(black_box(claims)));
        });

        let token = codec.issue(&claims).unwrap();
        group.bench_with_input(BenchmarkId::new("verify", kind), &token, |b, token| {
            b.iter(|| codec.verify(black_box(token)));
        });
    }

    group.finish();
}

fn bench_signing(c: &mut Criterion) {
    let key = SigningKey::new("benchmark-signing-secret-32-byte!").unwrap();
    let payload_sizes = [64, 256, 1024];

    let mut group = c.benchmark_group("hmac_sign");

    for size in payload_sizes {
        let data: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| key.sign(black_box(data)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_codec, bench_signing);
criterion_main!(benches);
