//! # Replica Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | `branch_root` (depth 32) | < 50μs |
//! | Message decode + leaf | < 5μs |
//! | Checkpoint signature check | < 1ms |
//! | `prove` against known root | < 100μs |
//! | `process` with echo recipient | < 1ms |

use std::sync::Arc;
use std::time::Duration;

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use rand::Rng;

use qc_15_replica::algorithms::{build_branch, tree_root};
use qc_15_replica::{branch_root, message_leaf, Hash, Message, ReplicaApi, UpdaterAuthority};
use qc_tests::fixtures::{funded, CountingRecipient, Harness, LOCAL_DOMAIN, REMOTE_DOMAIN};

fn random_leaves(count: usize) -> Vec<Hash> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| rng.gen()).collect()
}

fn bench_branch_root(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-15/merkle");

    for size in [1usize, 64, 1024] {
        let leaves = random_leaves(size);
        let index = size - 1;
        let proof = build_branch(&leaves, index).unwrap();

        group.bench_with_input(BenchmarkId::new("branch_root", size), &size, |b, _| {
            b.iter(|| black_box(branch_root(&leaves[index], &proof, index as u32).unwrap()))
        });
    }

    for size in [64usize, 1024] {
        let leaves = random_leaves(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("tree_root", size), &size, |b, _| {
            b.iter(|| black_box(tree_root(&leaves)))
        });
    }

    group.finish();
}

fn bench_message_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-15/codec");

    for body_len in [0usize, 256, 4096] {
        let bytes = Message {
            version: 0,
            origin_domain: REMOTE_DOMAIN,
            sender: [1u8; 32],
            nonce: 7,
            destination_domain: LOCAL_DOMAIN,
            recipient: [2u8; 32],
            body: vec![0xCD; body_len],
        }
        .to_bytes();

        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("decode_and_leaf", body_len),
            &bytes,
            |b, bytes| {
                b.iter(|| {
                    let message = Message::from_bytes(black_box(bytes)).unwrap();
                    black_box((message, message_leaf(bytes)))
                })
            },
        );
    }

    group.finish();
}

fn bench_checkpoint_signature(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-15/checkpoint");
    group.measurement_time(Duration::from_secs(5));

    let mut h = Harness::new();
    h.home.dispatch(LOCAL_DOMAIN, [3u8; 32], b"bench");
    let (root, index, signature) = h.home.sign(&h.updater);

    group.bench_function("verify_signature", |b| {
        b.iter(|| {
            black_box(h.authority.verify_checkpoint(
                REMOTE_DOMAIN,
                &root,
                index,
                black_box(&signature),
            ))
        })
    });

    group.finish();
}

fn bench_prove_and_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-15/delivery");
    let rt = tokio::runtime::Runtime::new().unwrap();
    const RECIPIENT: [u8; 32] = [0xEC; 32];

    // Each message can be delivered once, so every iteration gets a fresh Replica.
    let setup = || {
        let mut h = Harness::new();
        h.registry
            .register(RECIPIENT, Arc::new(CountingRecipient::default()));
        for i in 0..16u8 {
            h.home.dispatch(LOCAL_DOMAIN, RECIPIENT, &[i; 64]);
        }
        h.relay_checkpoint().unwrap();
        h
    };

    group.bench_function("prove", |b| {
        b.iter_batched(
            setup,
            |h| black_box(h.prove(7).unwrap()),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("prove_and_process", |b| {
        b.iter_batched(
            setup,
            |h| {
                rt.block_on(async {
                    let proof = h.home.proof(7);
                    black_box(
                        h.replica
                            .prove_and_process(h.home.message(7), &proof, 7, &mut funded())
                            .await
                            .unwrap(),
                    )
                })
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_branch_root,
    bench_message_codec,
    bench_checkpoint_signature,
    bench_prove_and_process,
);
criterion_main!(benches);
