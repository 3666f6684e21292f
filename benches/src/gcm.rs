//! AES-GCM benchmarks.
use criterion::{criterion_group, criterion_main, BenchmarkId, Throughput};
use gcm::{aead::KeyInit, Aes128Gcm, Aes256Gcm};

mod utils;
use utils::{config, Benchmarker};

const NONCE: [u8; 12] = [0; 12];

fn bench(c: &mut Benchmarker) {
    let mut group = c.benchmark_group("gcm");

    for size in &[10, 100, 1000, 10000] {
        let buf = vec![0u8; *size];
        let mut out = vec![0u8; *size];

        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_function(BenchmarkId::new("aes128-encrypt", size), |b| {
            let cipher = Aes128Gcm::new(&Default::default());
            b.iter(|| cipher.encrypt_detached(&NONCE, b"", &buf, &mut out));
        });

        group.bench_function(BenchmarkId::new("aes256-encrypt", size), |b| {
            let cipher = Aes256Gcm::new(&Default::default());
            b.iter(|| cipher.encrypt_detached(&NONCE, b"", &buf, &mut out));
        });

        group.bench_function(BenchmarkId::new("aes128-decrypt", size), |b| {
            let cipher = Aes128Gcm::new(&Default::default());
            let mut ct = vec![0u8; *size];
            let tag = cipher
                .encrypt_detached(&NONCE, b"", &buf, &mut ct)
                .expect("encryption failed");
            b.iter(|| cipher.decrypt_detached(&NONCE, b"", &ct, &tag, &mut out));
        });
    }

    group.finish();
}

criterion_group!(
    name = benches;
    config = config();
    targets = bench
);

criterion_main!(benches);
