use serde::{Deserialize, Serialize};

use crate::normalize_keyword;

/// Shortest keyword that may match as a fragment of a catalog entry.
pub const MIN_PARTIAL_MATCH_LEN: usize = 4;

/// Default externals for a keyword when the upstream classifier supplies none.
///
/// Feasibility is not part of the profile: it only ever comes from the
/// observation, defaulting to 3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordProfile {
    pub monetization: f64,
    pub ip_risk: f64,
    pub competition_risk: f64,
    pub category: String,
}

impl Default for KeywordProfile {
    fn default() -> Self {
        Self {
            monetization: 0.5,
            ip_risk: 0.2,
            competition_risk: 0.0,
            category: "general".to_string(),
        }
    }
}

impl KeywordProfile {
    pub fn new(monetization: f64, ip_risk: f64, category: &str) -> Self {
        Self {
            monetization,
            ip_risk,
            competition_risk: 0.0,
            category: category.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeywordCatalog {
    entries: Vec<(String, KeywordProfile)>,
    fallback: KeywordProfile,
}

impl KeywordCatalog {
    pub fn new(entries: Vec<(String, KeywordProfile)>, fallback: KeywordProfile) -> Self {
        let entries = entries
            .into_iter()
            .map(|(keyword, profile)| (normalize_keyword(&keyword), profile))
            .collect();
        Self { entries, fallback }
    }

    pub fn builtin(fallback: KeywordProfile) -> Self {
        let entries = vec![
            ("ai headshot", KeywordProfile::new(0.9, 0.1, "portrait")),
            ("ai manga filter", KeywordProfile::new(0.8, 0.3, "filter")),
            ("background remover", KeywordProfile::new(0.85, 0.1, "tool")),
            ("image upscaler", KeywordProfile::new(0.8, 0.1, "tool")),
            ("anime filter", KeywordProfile::new(0.7, 0.2, "filter")),
            ("ghibli filter", KeywordProfile::new(0.7, 0.5, "filter")),
            ("arcane filter", KeywordProfile::new(0.7, 0.6, "filter")),
            ("music", KeywordProfile::new(0.5, 0.3, "general")),
            ("dance", KeywordProfile::new(0.5, 0.2, "general")),
            ("fashion", KeywordProfile::new(0.6, 0.2, "general")),
        ];
        Self::new(
            entries
                .into_iter()
                .map(|(keyword, profile)| (keyword.to_string(), profile))
                .collect(),
            fallback,
        )
    }

    /// Exact match first, then containment in either direction, then the fallback.
    /// A keyword only matches inside a longer catalog entry when it has at
    /// least [`MIN_PARTIAL_MATCH_LEN`] characters, so "ai" stays unclassified.
    pub fn lookup(&self, keyword: &str) -> &KeywordProfile {
        let needle = normalize_keyword(keyword);
        if needle.is_empty() {
            return &self.fallback;
        }

        if let Some((_, profile)) = self.entries.iter().find(|(key, _)| *key == needle) {
            return profile;
        }

        let partial_needle = needle.chars().count() >= MIN_PARTIAL_MATCH_LEN;
        self.entries
            .iter()
            .find(|(key, _)| {
                needle.contains(key.as_str())
                    || (partial_needle && key.contains(needle.as_str()))
            })
            .map(|(_, profile)| profile)
            .unwrap_or(&self.fallback)
    }

    pub fn entries(&self) -> Vec<(String, KeywordProfile)> {
        self.entries.clone()
    }

    pub fn fallback(&self) -> &KeywordProfile {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for KeywordCatalog {
    fn default() -> Self {
        Self::builtin(KeywordProfile::default())
    }
}
