//! Resource kinds and carried cargo

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::config::MatchConfig;

pub const RESOURCE_KIND_COUNT: usize = 3;

/// Collectible resource kind; the three kinds carry distinct point values
/// taken from the match configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ResourceKind {
    Intel,
    Supplies,
    Aid,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; RESOURCE_KIND_COUNT] =
        [ResourceKind::Intel, ResourceKind::Supplies, ResourceKind::Aid];

    pub fn index(&self) -> usize {
        match self {
            ResourceKind::Intel => 0,
            ResourceKind::Supplies => 1,
            ResourceKind::Aid => 2,
        }
    }

    pub fn value(&self, config: &MatchConfig) -> u32 {
        config.resource_values[self.index()]
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Intel => "Intel",
            ResourceKind::Supplies => "Supplies",
            ResourceKind::Aid => "Aid",
        };
        f.write_str(name)
    }
}

/// Bounded multiset of carried resources, keyed by kind
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub struct Cargo([u8; RESOURCE_KIND_COUNT]);

impl Cargo {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: ResourceKind) -> u8 {
        self.0[kind.index()]
    }

    pub fn total(&self) -> u8 {
        self.0.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// One unit of every distinct kind aboard (the combo-bonus condition)
    pub fn has_every_kind(&self) -> bool {
        self.0.iter().all(|&n| n > 0)
    }

    pub(crate) fn add(&mut self, kind: ResourceKind) {
        self.0[kind.index()] += 1;
    }

    /// Empty the cargo, returning what was carried
    pub(crate) fn take(&mut self) -> Cargo {
        std::mem::take(self)
    }

    /// Total point value under the given configuration
    pub fn value(&self, config: &MatchConfig) -> u32 {
        ResourceKind::ALL
            .iter()
            .map(|kind| kind.value(config) * u32::from(self.count(*kind)))
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u8)> + '_ {
        ResourceKind::ALL
            .iter()
            .map(move |kind| (*kind, self.count(*kind)))
            .filter(|(_, n)| *n > 0)
    }
}

impl fmt::Display for Cargo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("empty");
        }
        let mut first = true;
        for (kind, count) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}x{}", count, kind)?;
            first = false;
        }
        Ok(())
    }
}
