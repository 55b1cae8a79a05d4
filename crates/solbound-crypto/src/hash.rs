//! Hashing and address derivation for Solbound

use crate::{CryptoError, CryptoResult};
use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha256, Sha512};
use solbound_types::Pubkey;

/// Marker appended to every program-derived address preimage
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Maximum length of a single seed
pub const MAX_SEED_LEN: usize = 32;

/// Compute SHA-256 hash of data
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute hash of multiple items
pub fn hash_all(items: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for item in items {
        hasher.update(item);
    }
    hasher.finalize().into()
}

/// Compute SHA-512 hash and return as lowercase hex string
pub fn sha512_hex(data: &[u8]) -> String {
    let mut hasher = Sha512::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Whether 32 bytes decode to a point on the ed25519 curve
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    CompressedEdwardsY(*bytes).decompress().is_some()
}

/// Derive a program address from seeds that already include the bump
///
/// Fails with [`CryptoError::NoViableBump`] when the hash lands on the curve.
pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> CryptoResult<Pubkey> {
    let mut hasher = Sha256::new();
    for seed in seeds {
        if seed.len() > MAX_SEED_LEN {
            return Err(CryptoError::SeedTooLong(seed.len()));
        }
        hasher.update(seed);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);
    let hash: [u8; 32] = hasher.finalize().into();

    if is_on_curve(&hash) {
        return Err(CryptoError::NoViableBump);
    }
    Ok(Pubkey::new(hash))
}

/// Find the canonical program address and its bump seed
///
/// Bumps are tried from 255 downward; the first off-curve hash wins.
pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> CryptoResult<(Pubkey, u8)> {
    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let mut with_bump: Vec<&[u8]> = seeds.to_vec();
        with_bump.push(&bump_seed);

        match create_program_address(&with_bump, program_id) {
            Ok(address) => return Ok((address, bump)),
            Err(CryptoError::NoViableBump) => continue,
            Err(e) => return Err(e),
        }
    }
    Err(CryptoError::NoViableBump)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Keypair;

    #[test]
    fn test_sha512_hex_width() {
        let digest = sha512_hex(b"secret");
        assert_eq!(digest.len(), 128);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_hash_all_matches_concatenation() {
        assert_eq!(hash_all(&[b"ab", b"cd"]), sha256(b"abcd"));
    }

    #[test]
    fn test_real_pubkeys_are_on_curve() {
        let keypair = Keypair::generate();
        assert!(is_on_curve(keypair.pubkey().as_bytes()));
    }

    #[test]
    fn test_program_address_is_off_curve_and_stable() {
        let program = Pubkey::new([1u8; 32]);
        let (address, bump) = find_program_address(&[b"seed"], &program).unwrap();
        assert!(!is_on_curve(address.as_bytes()));

        let again = create_program_address(&[b"seed", &[bump]], &program).unwrap();
        assert_eq!(address, again);
    }

    #[test]
    fn test_seed_too_long() {
        let program = Pubkey::new([1u8; 32]);
        let long = [0u8; 33];
        assert!(matches!(
            find_program_address(&[&long], &program),
            Err(CryptoError::SeedTooLong(33))
        ));
    }
}
