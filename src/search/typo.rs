//! Lookup-table typo correction for search queries.

use ahash::AHashMap;
use std::sync::LazyLock;

/// Known misspellings seen in storefront queries, mapped to their correction.
///
/// Extending this list is a data change: add a pair, no logic changes needed.
const BUILTIN_TYPOS: &[(&str, &str)] = &[
    ("labtob", "laptop"),
    ("labtop", "laptop"),
    ("laptob", "laptop"),
    ("leptop", "laptop"),
    ("iphon", "iphone"),
    ("ifone", "iphone"),
    ("samsng", "samsung"),
    ("samsumg", "samsung"),
    ("headphons", "headphones"),
    ("hedphones", "headphones"),
    ("earbud", "earbuds"),
    ("keybord", "keyboard"),
    ("keyboad", "keyboard"),
    ("moniter", "monitor"),
    ("monitr", "monitor"),
    ("wireles", "wireless"),
    ("wirless", "wireless"),
    ("bluetoth", "bluetooth"),
    ("blutooth", "bluetooth"),
    ("charjer", "charger"),
    ("chager", "charger"),
    ("camra", "camera"),
    ("camerra", "camera"),
    ("televison", "television"),
    ("smartwach", "smartwatch"),
    ("speakr", "speaker"),
    ("tablit", "tablet"),
    ("sneekers", "sneakers"),
    ("jaket", "jacket"),
    ("t shirt", "t-shirt"),
];

static BUILTIN: LazyLock<TypoTable> =
    LazyLock::new(|| TypoTable::from_pairs(BUILTIN_TYPOS.iter().copied()));

/// Immutable misspelling -> correction map. Keys are stored case-folded.
#[derive(Debug, Clone)]
pub struct TypoTable {
    entries: AHashMap<String, String>,
}

impl TypoTable {
    fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(typo, fix)| (typo.as_ref().trim().to_lowercase(), fix.into()))
            .collect();
        Self { entries }
    }

    /// The process-wide built-in table.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Built-in table extended with `extra` pairs. Extra entries win on conflict.
    pub fn with_entries<K, V>(extra: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut table = BUILTIN.clone();
        table.entries.extend(Self::from_pairs(extra).entries);
        table
    }

    /// Correction for a single case-folded key, if one is known.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite known misspellings in `input`.
    ///
    /// The whole (case-folded, trimmed) input is looked up first. Otherwise
    /// each whitespace token is replaced independently and the result is joined
    /// with single spaces. When nothing changes the input is returned as given,
    /// keeping its original case and spacing.
    pub fn correct(&self, input: &str) -> String {
        let folded = input.trim().to_lowercase();

        if let Some(fixed) = self.lookup(&folded) {
            return fixed.to_string();
        }

        let mut changed = false;
        let tokens: Vec<&str> = folded
            .split_whitespace()
            .map(|token| match self.lookup(token) {
                Some(fixed) if fixed != token => {
                    changed = true;
                    fixed
                }
                _ => token,
            })
            .collect();

        if changed {
            tokens.join(" ")
        } else {
            input.to_string()
        }
    }
}

/// Correct `input` against the built-in table.
pub fn correct(input: &str) -> String {
    TypoTable::builtin().correct(input)
}
