#![feature(test)]

extern crate test;

use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use rsa_keygen::sha2::{Digest, Sha256};
use rsa_keygen::{
    pairwise, BigUint, KeyGenerator, KeygenPolicy, Pkcs1v15Encrypt, RsaPrivateKey, X931Sign,
};
use test::Bencher;

const EXP: u32 = 65537;

#[bench]
fn bench_rsa_1024_gen_key(b: &mut Bencher) {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);

    b.iter(|| {
        let key = RsaPrivateKey::new(&mut rng, 1024).unwrap();
        test::black_box(key);
    });
}

#[bench]
fn bench_rsa_2048_gen_key(b: &mut Bencher) {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);

    b.iter(|| {
        let key = RsaPrivateKey::new(&mut rng, 2048).unwrap();
        test::black_box(key);
    });
}

#[bench]
fn bench_rsa_2048_gen_key_compliance(b: &mut Bencher) {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);
    let generator = KeyGenerator::new(KeygenPolicy::compliance());
    let exp = BigUint::from(EXP);

    b.iter(|| {
        let key = generator.generate(&mut rng, 2048, &exp, None).unwrap();
        test::black_box(key);
    });
}

#[bench]
fn bench_rsa_2048_pairwise(b: &mut Bencher) {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);
    let key = RsaPrivateKey::new(&mut rng, 2048).unwrap();

    b.iter(|| {
        pairwise::validate(&key, &mut rng).unwrap();
    });
}

#[bench]
fn bench_rsa_2048_x931_sign_blinded(b: &mut Bencher) {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);
    let key = RsaPrivateKey::new(&mut rng, 2048).unwrap();
    let digest = Sha256::digest(b"testing").to_vec();
    let scheme = X931Sign::new::<Sha256>().unwrap();

    b.iter(|| {
        let res = key.sign_with_rng(&mut rng, scheme, &digest).unwrap();
        test::black_box(res);
    });
}

#[bench]
fn bench_rsa_2048_pkcsv1_decrypt(b: &mut Bencher) {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);
    let key = RsaPrivateKey::new(&mut rng, 2048).unwrap();
    let ciphertext = key
        .to_public_key()
        .encrypt(&mut rng, Pkcs1v15Encrypt, b"testing")
        .unwrap();

    b.iter(|| {
        let res = key.decrypt(Pkcs1v15Encrypt, &ciphertext).unwrap();
        test::black_box(res);
    });
}
