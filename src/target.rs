use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One output partition: a share of the input and where it is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub percent: u8,
    pub output: PathBuf,
}

impl Target {
    pub fn new(percent: u8, output: impl Into<PathBuf>) -> Self {
        Self {
            percent,
            output: output.into(),
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

/// Row quotas computed for a target set, one per target in list order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Quotas(Vec<u64>);

impl Quotas {
    pub(crate) fn from_vec(quotas: Vec<u64>) -> Self {
        Quotas(quotas)
    }

    pub fn get(&self, index: usize) -> Option<u64> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().copied()
    }
}
