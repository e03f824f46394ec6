//! Token parsing performance benchmarks
//!
//! Benchmarks parsing across payload sizes, pipeline stages, claims
//! representations and key set sizes.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::time::Duration;
use xwt::*;

const SECRET: &[u8] = b"test-secret-key";

/// Helpers to generate test tokens of different sizes
mod helpers {
    use super::*;

    fn far_future() -> NumericDate {
        NumericDate::now()
            .checked_add(Duration::from_secs(365 * 24 * 3600))
            .unwrap()
    }

    pub fn map_token_with_payload_size(payload_size: usize) -> String {
        let mut claims = MapClaims::new()
            .with("sub", "user123")
            .with("iss", "https://example.com")
            .with("exp", far_future().timestamp());
        let base = claims.marshal().unwrap().len();
        let extra = payload_size.saturating_sub(base + 10);
        if extra > 0 {
            claims.insert("data".into(), "x".repeat(extra).into());
        }
        sign(claims)
    }

    pub fn registered_claims() -> RegisteredClaims {
        RegisteredClaims {
            issuer: Some("https://example.com".into()),
            subject: Some("user123".into()),
            audience: ClaimStrings::from(["api"]),
            expires_at: Some(NumericDate::from_unix(far_future().timestamp())),
            ..Default::default()
        }
    }

    pub fn sign<C: Claims>(claims: C) -> String {
        Token::with_alg("HS256", claims)
            .unwrap()
            .signed_string(&Key::symmetric(SECRET.to_vec()))
            .unwrap()
    }
}

fn hmac_key(_: &Token<impl Claims>) -> std::result::Result<VerificationKey, BoxError> {
    Ok(Key::symmetric(SECRET.to_vec()).into())
}

fn bench_parsing_by_size(c: &mut Criterion) {
    let parser = Parser::default();
    let mut group = c.benchmark_group("parse_by_size");

    for size in [64, 256, 1024, 4096, 16384] {
        let token = helpers::map_token_with_payload_size(size);
        group.throughput(Throughput::Bytes(token.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &token, |b, token| {
            b.iter(|| parser.parse(black_box(token), MapClaims::new(), hmac_key));
        });
    }

    group.finish();
}

fn bench_parsing_stages(c: &mut Criterion) {
    let token = helpers::sign(helpers::registered_claims());
    let parser = Parser::default();
    let unvalidated = Parser::new(ParserConfig::new().skip_claims_validation());

    let mut group = c.benchmark_group("parse_stages");

    group.bench_function("unverified", |b| {
        b.iter(|| parser.parse_unverified(black_box(&token), RegisteredClaims::default()));
    });

    group.bench_function("verified_only", |b| {
        b.iter(|| unvalidated.parse(black_box(&token), RegisteredClaims::default(), hmac_key));
    });

    group.bench_function("full_parse", |b| {
        b.iter(|| parser.parse(black_box(&token), RegisteredClaims::default(), hmac_key));
    });

    // Base64URL decoding only
    group.bench_function("base64url_decode", |b| {
        let parts: Vec<&str> = token.split('.').collect();
        b.iter(|| {
            for part in &parts {
                let _ = parser.decode_segment(black_box(part));
            }
        });
    });

    group.finish();
}

fn bench_claims_representations(c: &mut Criterion) {
    let registered = helpers::registered_claims();
    let json_token = helpers::sign(registered.clone());
    let pwt_token = helpers::sign(PwtClaims::from(registered));
    let parser = Parser::default();

    let mut group = c.benchmark_group("claims_representation");

    group.bench_function("map", |b| {
        b.iter(|| parser.parse(black_box(&json_token), MapClaims::new(), hmac_key));
    });

    group.bench_function("registered", |b| {
        b.iter(|| parser.parse(black_box(&json_token), RegisteredClaims::default(), hmac_key));
    });

    group.bench_function("protobuf", |b| {
        b.iter(|| parser.parse(black_box(&pwt_token), PwtClaims::default(), hmac_key));
    });

    group.finish();
}

fn bench_key_set_size(c: &mut Criterion) {
    let token = helpers::sign(helpers::registered_claims());
    let parser = Parser::default();
    let mut group = c.benchmark_group("key_set_position");

    // The matching key sits last, so every earlier candidate is tried first
    for candidates in [1usize, 4, 16] {
        let mut keys: Vec<Key> = (0..candidates - 1)
            .map(|i| Key::symmetric(format!("retired-{i}").into_bytes()))
            .collect();
        keys.push(Key::symmetric(SECRET.to_vec()));
        let set = VerificationKeySet::new(keys);

        group.bench_with_input(BenchmarkId::from_parameter(candidates), &set, |b, set| {
            b.iter(|| {
                parser.parse(black_box(&token), RegisteredClaims::default(), |_| {
                    Ok(set.clone().into())
                })
            });
        });
    }

    group.finish();
}

fn bench_invalid_tokens(c: &mut Criterion) {
    let parser = Parser::default();
    let mut group = c.benchmark_group("parse_invalid");

    // Missing parts
    group.bench_function("missing_parts", |b| {
        let invalid = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";
        b.iter(|| parser.parse(black_box(invalid), MapClaims::new(), hmac_key));
    });

    // Invalid base64
    group.bench_function("invalid_base64", |b| {
        let invalid = "invalid.base64.signature!!!";
        b.iter(|| parser.parse(black_box(invalid), MapClaims::new(), hmac_key));
    });

    // Invalid JSON
    group.bench_function("invalid_json", |b| {
        let invalid = "eyJpbnZhbGlkX2pzb24.Invalid.Signature";
        b.iter(|| parser.parse(black_box(invalid), MapClaims::new(), hmac_key));
    });

    // Wrong key
    group.bench_function("bad_signature", |b| {
        let token = helpers::sign(helpers::registered_claims());
        b.iter(|| {
            parser.parse(black_box(&token), MapClaims::new(), |_| {
                Ok(Key::symmetric(b"wrong".to_vec()).into())
            })
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parsing_by_size,
    bench_parsing_stages,
    bench_claims_representations,
    bench_key_set_size,
    bench_invalid_tokens
);
criterion_main!(benches);
