use anyhow::{Context, Result, bail};
use rizz_game::seed::WORD_LIST;
use rizz_game::{decode_to_seed, derive_seed, encode_friendly, seed_from_clock, seed_from_entropy};
use std::collections::HashMap;

/// Seed metadata carried through scenario runs and reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub code: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self { seed, code: None }
    }

    #[must_use]
    pub const fn from_share_code(seed: u64, code: String) -> Self {
        Self {
            seed,
            code: Some(code),
        }
    }

    /// A fresh share-code seed drawn from the wall clock.
    #[must_use]
    pub fn from_clock() -> Self {
        let seed = seed_from_entropy(seed_from_clock());
        Self::from_share_code(seed, encode_friendly(seed))
    }

    /// The code the player would type to replay this seed.
    #[must_use]
    pub fn share_code(&self) -> String {
        self.code
            .clone()
            .unwrap_or_else(|| encode_friendly(self.seed))
    }
}

/// Seed for one iteration of a scenario. The first iteration plays the seed
/// as given so a failure report can be replayed directly.
#[must_use]
pub fn iteration_seed(base: u64, iteration: usize) -> u64 {
    if iteration == 0 {
        base
    } else {
        derive_seed(base, &format!("iteration-{iteration}"))
    }
}

/// Resolve CLI seed tokens into canonical seeds.
///
/// Accepts integers, share codes such as `RZ-SKIBIDI42`, the keyword `clock`
/// for a fresh share-code seed, and `all`, which expands to every share-code
/// seed.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut pending: Vec<SeedInfo> = Vec::new();
    let mut request_all = false;

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if token.eq_ignore_ascii_case("all") {
            request_all = true;
            continue;
        }

        if token.eq_ignore_ascii_case("clock") {
            pending.push(SeedInfo::from_clock());
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            pending.push(SeedInfo::from_numeric(value));
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            pending.push(SeedInfo::from_numeric(value.unsigned_abs()));
            continue;
        }

        if let Some(seed) = decode_to_seed(token) {
            pending.push(SeedInfo::from_share_code(seed, token.to_uppercase()));
            continue;
        }

        bail!("Unrecognized seed token: {token}");
    }

    if request_all {
        pending.extend(generate_all_share_code_seeds()?);
    }

    let mut deduped: Vec<SeedInfo> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();
    for info in pending {
        if let Some(&existing) = index.get(&info.seed) {
            if deduped[existing].code.is_none() && info.code.is_some() {
                deduped[existing] = info;
            }
        } else {
            index.insert(info.seed, deduped.len());
            deduped.push(info);
        }
    }

    if deduped.is_empty() {
        deduped.push(SeedInfo::from_numeric(1337));
    }

    Ok(deduped)
}

fn generate_all_share_code_seeds() -> Result<Vec<SeedInfo>> {
    let mut seeds = Vec::with_capacity(WORD_LIST.len() * 100);
    for word in WORD_LIST {
        for suffix in 0..100 {
            let code = format!("RZ-{word}{suffix:02}");
            let seed = decode_to_seed(&code)
                .with_context(|| format!("failed to parse share code: {code}"))?;
            seeds.push(SeedInfo::from_share_code(seed, code));
        }
    }
    Ok(seeds)
}
