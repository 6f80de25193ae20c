//! Release stability classification.
//!
//! Release identifiers follow the `{major}.x-{minor}.{patch}[-suffix]` scheme
//! (plus `{major}.x-{minor}.x-dev` branch snapshots). Each identifier belonging
//! to the target major version is mapped to a [`StabilityTier`]; identifiers
//! for other majors, or in any other shape, are left out entirely.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Maturity of a release, ordered best first.
///
/// The derived `Ord` follows declaration order, so the minimum over a set of
/// tiers is the most stable one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilityTier {
    FullRelease,
    ReleaseCandidate,
    Beta,
    Alpha,
    Dev,

    /// No release matched the target major version at all.
    NoDevelopment,
}

impl StabilityTier {
    /// The classifiable tiers in rank order.
    pub const RANKED: [StabilityTier; 5] = [
        StabilityTier::FullRelease,
        StabilityTier::ReleaseCandidate,
        StabilityTier::Beta,
        StabilityTier::Alpha,
        StabilityTier::Dev,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StabilityTier::FullRelease => "full release",
            StabilityTier::ReleaseCandidate => "rc",
            StabilityTier::Beta => "beta",
            StabilityTier::Alpha => "alpha",
            StabilityTier::Dev => "dev",
            StabilityTier::NoDevelopment => "no development",
        }
    }
}

impl std::fmt::Display for StabilityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Patterns tried in order, first match wins. `{major}` is substituted with
/// the target major version.
///
/// The full-release pattern is anchored at the end, so it never matches an
/// identifier carrying a stability suffix.
///
/// The minor is `[1-9]\d*`, so `0.x` minors such as `8.x-0.3` never match.
const TIER_PATTERNS: [(&str, StabilityTier); 5] = [
    (r"^{major}\.x-[1-9]\d*\.\d+$", StabilityTier::FullRelease),
    (r"^{major}\.x-[1-9]\d*\.\d+-rc\d*$", StabilityTier::ReleaseCandidate),
    (r"^{major}\.x-[1-9]\d*\.\d+-beta\d*$", StabilityTier::Beta),
    (r"^{major}\.x-[1-9]\d*\.\d+-alpha\d*$", StabilityTier::Alpha),
    (r"^{major}\.x-[1-9]\d*\.x-dev$", StabilityTier::Dev),
];

#[derive(Error, Debug)]
pub enum StabilityError {
    #[error("Invalid release pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Classifier bound to one target major version.
#[derive(Debug, Clone)]
pub struct ReleaseStabilityClassifier {
    major: u32,
    patterns: Vec<(Regex, StabilityTier)>,
}

impl ReleaseStabilityClassifier {
    pub fn new(major: u32) -> Result<Self, StabilityError> {
        let major_text = major.to_string();
        let patterns = TIER_PATTERNS
            .iter()
            .map(|(template, tier)| {
                Regex::new(&template.replace("{major}", &major_text)).map(|re| (re, *tier))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { major, patterns })
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    /// Returns the tier of `identifier`, or `None` when it is not a
    /// recognized release of the target major.
    pub fn classify(&self, identifier: &str) -> Option<StabilityTier> {
        let identifier = identifier.trim();
        self.patterns
            .iter()
            .find(|(re, _)| re.is_match(identifier))
            .map(|(_, tier)| *tier)
    }

    /// Best tier present among `identifiers`, independent of their order.
    pub fn rank_best<I, S>(&self, identifiers: I) -> StabilityTier
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        identifiers
            .into_iter()
            .filter_map(|id| self.classify(id.as_ref()))
            .min()
            .unwrap_or(StabilityTier::NoDevelopment)
    }

    /// Classifies every identifier and orders the matches by tier rank.
    ///
    /// Duplicates keep their first occurrence; identifiers sharing a tier keep
    /// their source order.
    pub fn stability_map<I, S>(&self, identifiers: I) -> StabilityMap
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut entries: Vec<(String, StabilityTier)> = identifiers
            .into_iter()
            .filter_map(|id| {
                let id = id.as_ref().trim();
                let tier = self.classify(id)?;
                seen.insert(id.to_string()).then(|| (id.to_string(), tier))
            })
            .collect();

        // Stable sort keeps source order within a tier.
        entries.sort_by_key(|(_, tier)| *tier);
        StabilityMap { entries }
    }

    /// First recommended release belonging to the target major.
    pub fn recommended<'a>(&self, recommended: &'a [String]) -> Option<&'a str> {
        let prefix = format!("{}.x", self.major);
        recommended
            .iter()
            .map(|r| r.trim())
            .find(|r| r.starts_with(&prefix))
    }

    /// Whether the recommended release for the target major is a full release.
    pub fn has_full_release(&self, recommended: &[String]) -> bool {
        self.recommended(recommended)
            .and_then(|r| self.classify(r))
            .is_some_and(|tier| tier == StabilityTier::FullRelease)
    }
}

/// Release identifiers keyed to their tier, iterated best tier first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StabilityMap {
    entries: Vec<(String, StabilityTier)>,
}

impl StabilityMap {
    pub fn iter(&self) -> impl Iterator<Item = (&str, StabilityTier)> {
        self.entries.iter().map(|(id, tier)| (id.as_str(), *tier))
    }

    pub fn get(&self, identifier: &str) -> Option<StabilityTier> {
        self.iter()
            .find(|(id, _)| *id == identifier)
            .map(|(_, tier)| tier)
    }

    pub fn best(&self) -> StabilityTier {
        self.entries
            .first()
            .map(|(_, tier)| *tier)
            .unwrap_or(StabilityTier::NoDevelopment)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
