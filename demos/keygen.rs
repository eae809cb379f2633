//! Generates a key and prints its public half.
//!
//! ```text
//! cargo run --example keygen --features getrandom -- [bits] [--standard]
//! ```
//!
//! `RUST_LOG=debug` shows the generation milestones.

use std::io::Write;
use std::ops::ControlFlow;

use log::LevelFilter;
use rand_core::OsRng;
use rsa_keygen::traits::{PrivateKeyParts, PublicKeyParts};
use rsa_keygen::{generate_rsa_key, BigUint, Phase};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut bits = 2048;
    let mut compliance = true;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--standard" => compliance = false,
            other => bits = other.parse()?,
        }
    }

    let mut stderr = std::io::stderr();
    let mut progress = |phase: Phase, _: usize| {
        let mark = match phase {
            Phase::CandidateRejected => b".",
            Phase::PrimeFound => b"+",
        };
        let _ = stderr.write_all(mark);
        ControlFlow::Continue(())
    };

    let e = BigUint::from(65537u32);
    let key = generate_rsa_key(bits, &e, &mut OsRng, Some(&mut progress), compliance)?;
    eprintln!();

    log::info!(
        "{}-bit key, private exponent of {} bits",
        key.n().bits(),
        key.d().bits()
    );
    println!("n = {:x}", key.n());
    println!("e = {}", key.e());

    Ok(())
}
