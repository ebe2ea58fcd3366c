//! Node id assignment
//!
//! Ids either come from a line-delimited file or are sampled without
//! replacement from the configured range. Every failure here is a
//! configuration error and is raised before any node is spawned.

use crate::config::ElectionConfig;
use crate::error::{ElectionError, Result};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Where the ring's ids come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdSource {
    Random,
    FromFile(PathBuf),
}

impl IdSource {
    /// Produces exactly `expected` pairwise-distinct ids.
    pub fn assign(&self, expected: usize, config: &ElectionConfig) -> Result<Vec<u64>> {
        if expected == 0 {
            return Err(ElectionError::EmptyRing);
        }

        let ids = match self {
            Self::FromFile(path) => load_ids(path, expected)?,
            Self::Random => match config.seed {
                Some(seed) => random_ids(
                    expected,
                    config.id_min,
                    config.id_max,
                    &mut StdRng::seed_from_u64(seed),
                )?,
                None => random_ids(
                    expected,
                    config.id_min,
                    config.id_max,
                    &mut rand::thread_rng(),
                )?,
            },
        };

        tracing::debug!("Assigned ids {:?}", ids);
        Ok(ids)
    }
}

/// Reads ids from `path`, one decimal integer per line.
pub fn load_ids<P: AsRef<Path>>(path: P, expected: usize) -> Result<Vec<u64>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ElectionError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    parse_ids(&content, expected)
}

/// Parses line-delimited ids, rejecting non-digits, duplicates and a count
/// other than `expected`.
pub fn parse_ids(content: &str, expected: usize) -> Result<Vec<u64>> {
    let mut ids = Vec::with_capacity(expected);
    let mut seen = HashSet::with_capacity(expected);

    for line in content.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() || !line.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ElectionError::NotAnInteger(line.to_string()));
        }

        let id: u64 = line
            .parse()
            .map_err(|_| ElectionError::NotAnInteger(line.to_string()))?;

        if !seen.insert(id) {
            return Err(ElectionError::DuplicateId(id));
        }
        ids.push(id);
    }

    if ids.len() != expected {
        return Err(ElectionError::count_mismatch(expected, ids.len()));
    }

    Ok(ids)
}

/// Samples `count` distinct ids from `min..=max`.
pub fn random_ids<R: Rng + ?Sized>(
    count: usize,
    min: u64,
    max: u64,
    rng: &mut R,
) -> Result<Vec<u64>> {
    let too_small = || ElectionError::RangeTooSmall { count, min, max };

    if min > max {
        return Err(too_small());
    }

    let span = usize::try_from(max - min)
        .ok()
        .and_then(|s| s.checked_add(1))
        .ok_or_else(|| ElectionError::configuration("Id range is too wide to sample"))?;
    if count > span {
        return Err(too_small());
    }

    Ok(index::sample(rng, span, count)
        .into_iter()
        .map(|offset| min + offset as u64)
        .collect())
}
