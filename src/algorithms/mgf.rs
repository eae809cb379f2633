//! Mask generation function used by PSS padding

use digest::DynDigest;

/// MGF1 from RFC 8017 B.2.1: XORs `out` with the mask derived from `seed`.
///
/// Panics if out is larger than 2**32 hash blocks worth of counter space.
pub(crate) fn mgf1_xor(out: &mut [u8], digest: &mut dyn DynDigest, seed: &[u8]) {
    const MAX_LEN: u64 = core::u32::MAX as u64 + 1;
    assert!(out.len() as u64 <= MAX_LEN);

    let mut counter = 0u32;
    for chunk in out.chunks_mut(digest.output_size()) {
        digest.update(seed);
        digest.update(&counter.to_be_bytes());
        let block = digest.finalize_reset();

        for (o, m) in chunk.iter_mut().zip(block.iter()) {
            *o ^= *m;
        }
        counter = counter.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use sha2::Sha256;

    #[test]
    fn test_mgf1_sha256() {
        let mut digest = Sha256::default();
        let mut mask = [0u8; 40];
        mgf1_xor(&mut mask, &mut digest, b"bar");

        // MGF1-SHA256("bar", 40)
        assert_eq!(
            mask,
            hex!(
                "382576a7841021cc28fc4c0948753fb8312090cea942ea4c4e735d10dc724b155f9f6069f289d61d"
            )
        );
    }

    #[test]
    fn test_mgf1_is_involution() {
        let mut digest = Sha256::default();
        let mut data = *b"some data that is longer than one sha256 block";
        let original = data;

        mgf1_xor(&mut data, &mut digest, b"seed");
        assert_ne!(data, original);
        mgf1_xor(&mut data, &mut digest, b"seed");
        assert_eq!(data, original);
    }
}
