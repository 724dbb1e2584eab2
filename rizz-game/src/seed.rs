//! Reversible share-code scheme for run seeds.
//! Code format: RZ-<WORD><NN>, e.g., RZ-SKIBIDI42, RZ-GYATT07

use hmac::{Hmac, Mac};
use sha2::Sha256;

const CODE_PREFIX: &str = "RZ";

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash = (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

fn sanitize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

// Word list for share codes
pub const WORD_LIST: [&str; 48] = [
    "SKIBIDI", "GYATT", "RIZZ", "SIGMA", "OHIO", "BUSSIN", "SLAY", "COOKED", "AURA", "MEWING",
    "NPC", "DRIP", "SUS", "BASED", "CRINGE", "VIBE", "SWAG", "FANUM", "DELULU", "YAP", "GOAT",
    "BET", "CAP", "NOCAP", "LOWKEY", "HIGHKEY", "BRUH", "MID", "RATIO", "STAN", "SHEESH", "FLEX",
    "GLOWUP", "SALTY", "SNATCH", "TEA", "ICK", "ROFL", "DOGE", "PEPE", "CHAD", "WOJAK", "STONKS",
    "YEET", "POGGERS", "COPE", "SEETHE", "HYPE",
];

#[inline]
fn pack(word_index: u16, nn: u8) -> u16 {
    word_index & 0x01FF | ((u16::from(nn) & 0x7F) << 9)
}

#[inline]
fn unpack(packed: u16) -> (u16, u8) {
    (packed & 0x01FF, ((packed >> 9) & 0x7F) as u8)
}

fn compose_seed(word_index: u16, nn: u8) -> u64 {
    let packed = pack(word_index, nn);
    // Domain-separated FNV input
    let mut buf = [0u8; 8];
    buf[..5].copy_from_slice(b"RIZZ-");
    buf[5] = (packed & 0xFF) as u8;
    buf[6] = (packed >> 8) as u8;
    buf[7] = 0x5A;
    let h = fnv1a64(&buf);
    (h & 0xFFFF_FFFF_FFFF_0000) | u64::from(packed)
}

/// Render the share code for a seed. Only the low 16 bits participate.
#[must_use]
pub fn encode_friendly(seed: u64) -> String {
    let packed = (seed & 0xFFFF) as u16;
    let (wi, mut nn) = unpack(packed);
    let word = WORD_LIST
        .get(wi as usize % WORD_LIST.len())
        .copied()
        .unwrap_or("SKIBIDI");
    if nn > 99 {
        nn %= 100;
    }
    format!("{CODE_PREFIX}-{word}{nn:02}")
}

/// Decode a share code into the seed it stands for.
#[must_use]
pub fn decode_to_seed(code: &str) -> Option<u64> {
    let s = code.trim();
    let (prefix, rest) = s.split_once('-')?;
    if !prefix.eq_ignore_ascii_case(CODE_PREFIX) || !rest.is_ascii() || rest.len() < 3 {
        return None;
    }
    let (word_part, nn_part) = rest.split_at(rest.len() - 2);
    if !nn_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let nn: u8 = nn_part.parse().ok()?;
    let word = sanitize_word(word_part);
    let idx = WORD_LIST.iter().position(|w| sanitize_word(w) == word)?;
    let wi = u16::try_from(idx).ok()?;
    Some(compose_seed(wi, nn))
}

/// Build a canonical share-code seed from arbitrary entropy (e.g. the wall clock).
#[must_use]
pub fn seed_from_entropy(entropy: u64) -> u64 {
    let wi = u16::try_from(entropy % WORD_LIST.len() as u64).unwrap_or(0);
    let nn = ((entropy >> 17) % 100) as u8;
    compose_seed(wi, nn)
}

/// Derive an independent sub-seed from a base seed and a domain label.
///
/// # Panics
///
/// Never in practice: HMAC accepts keys of any length.
#[must_use]
pub fn derive_seed(base: u64, label: &str) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&base.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(label.as_bytes());
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrips_code() {
        let seed = seed_from_entropy(0xDEAD_BEEF_CAFE_BABE);
        let code = encode_friendly(seed);
        let decoded = decode_to_seed(&code).unwrap();
        assert_eq!(decoded, seed);
        assert_eq!(encode_friendly(decoded), code);
    }

    #[test]
    fn skibidi_42_stable() {
        let seed = decode_to_seed("RZ-SKIBIDI42").unwrap();
        assert_eq!(encode_friendly(seed), "RZ-SKIBIDI42");
        assert_eq!(decode_to_seed("rz-skibidi42"), Some(seed));
    }

    #[test]
    fn rejects_foreign_codes() {
        assert!(decode_to_seed("CL-ORANGE42").is_none());
        assert!(decode_to_seed("RZ-NOTAWORD42").is_none());
        assert!(decode_to_seed("RZ-RIZZ").is_none());
    }

    #[test]
    fn rejects_non_ascii_and_signed_codes() {
        assert_eq!(decode_to_seed("RZ-éa"), None);
        assert_eq!(decode_to_seed("RZ-SKIBIDIé"), None);
        assert_eq!(decode_to_seed("RZ-ÖHIO42"), None);
        assert_eq!(decode_to_seed("RZ-SKIBIDI+1"), None);
        assert_eq!(decode_to_seed("RZ-SKIBIDI-1"), None);
        assert!(decode_to_seed("RZ-SKIBIDI01").is_some());
    }

    #[test]
    fn derived_seeds_are_label_separated() {
        assert_eq!(derive_seed(42, "iteration-1"), derive_seed(42, "iteration-1"));
        assert_ne!(derive_seed(42, "iteration-1"), derive_seed(42, "iteration-2"));
        assert_ne!(derive_seed(42, "iteration-1"), derive_seed(43, "iteration-1"));
    }
}
