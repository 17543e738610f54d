use criterion::{black_box, criterion_group, criterion_main, Criterion};
use crypto::{open, seal, KeyPair};

fn criterion_benchmark(c: &mut Criterion) {
    let alice = KeyPair::generate();
    let bob = KeyPair::generate();
    for n in [128usize, 1024, 1024 * 128] {
        let msg = vec![0u8; n];
        c.bench_function(&format!("sign {}", n), |b| b.iter(|| alice.sign(black_box(&msg))));
        c.bench_function(&format!("seal {}", n), |b| {
            b.iter(|| seal(black_box(&msg), &bob.pub_key(), alice.private_key()).unwrap())
        });
        let sealed = seal(&msg, &bob.pub_key(), alice.private_key()).unwrap();
        c.bench_function(&format!("open {}", n), |b| {
            b.iter(|| open(black_box(&sealed.ciphertext), &sealed.nonce, &alice.pub_key(), bob.private_key()).unwrap())
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
