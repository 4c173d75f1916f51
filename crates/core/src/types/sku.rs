//! Stock keeping unit identifiers.

use core::fmt;
use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) of the random numeric SKU suffix.
const SUFFIX_RANGE: u32 = 1_000_000;

/// Random candidates tried by [`Sku::generate_unique`] before it falls back
/// to sequential seven-digit suffixes.
const MAX_RANDOM_ATTEMPTS: usize = 32;

/// The unique key identifying one sellable variant.
///
/// Also the merge key of the cart: two cart lines with the same SKU are
/// always folded into one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Wrap an existing SKU string verbatim.
    #[must_use]
    pub fn new(sku: impl Into<String>) -> Self {
        Self(sku.into())
    }

    /// Generate a SKU of the form `{color}-{size}-{NNNNNN}`.
    ///
    /// The suffix is a zero-padded six-digit random number. Nothing prevents
    /// two calls from producing the same value; use [`Sku::generate_unique`]
    /// when the SKUs already in use are known.
    pub fn generate<R: Rng + ?Sized>(color: &str, size: &str, rng: &mut R) -> Self {
        let suffix = rng.random_range(0..SUFFIX_RANGE);
        Self(format!("{color}-{size}-{suffix:06}"))
    }

    /// Generate a SKU that is not contained in `taken`.
    ///
    /// Tries a bounded number of random six-digit suffixes, then counts
    /// upward from `1000000`. The fallback yields a fresh SKU after at most
    /// `taken.len() + 1` candidates.
    pub fn generate_unique<R: Rng + ?Sized>(
        color: &str,
        size: &str,
        taken: &HashSet<Self>,
        rng: &mut R,
    ) -> Self {
        for _ in 0..MAX_RANDOM_ATTEMPTS {
            let candidate = Self::generate(color, size, rng);
            if !taken.contains(&candidate) {
                return candidate;
            }
        }

        let mut suffix = u64::from(SUFFIX_RANGE);
        loop {
            let candidate = Self(format!("{color}-{size}-{suffix}"));
            if !taken.contains(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Returns the SKU as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Sku {
    fn from(sku: &str) -> Self {
        Self(sku.to_owned())
    }
}

impl From<String> for Sku {
    fn from(sku: String) -> Self {
        Self(sku)
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_generate_format() {
        let mut rng = StdRng::seed_from_u64(7);
        let sku = Sku::generate("Red", "M", &mut rng);
        let suffix = sku.as_str().strip_prefix("Red-M-").unwrap_or_default();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_unique_skips_taken() {
        // Same seed reproduces the same first candidate, which is taken.
        let first = Sku::generate("Blue", "L", &mut StdRng::seed_from_u64(42));
        let taken: HashSet<Sku> = std::iter::once(first.clone()).collect();

        let sku = Sku::generate_unique("Blue", "L", &taken, &mut StdRng::seed_from_u64(42));
        assert_ne!(sku, first);
        assert!(sku.as_str().starts_with("Blue-L-"));
    }

    #[test]
    fn test_generate_unique_falls_back_when_random_suffixes_exhausted() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut taken: HashSet<Sku> = (0..super::MAX_RANDOM_ATTEMPTS)
            .map(|_| Sku::generate("Red", "S", &mut rng))
            .collect();
        taken.insert(Sku::from("Red-S-1000000"));

        let sku = Sku::generate_unique("Red", "S", &taken, &mut StdRng::seed_from_u64(9));
        assert_eq!(sku.as_str(), "Red-S-1000001");
        assert!(!taken.contains(&sku));
    }
}
