//! Character-set builder — collects the code points and ligature seeds
//! a font asset should be baked with.
//!
//! Code points are deduplicated into a sorted set; ligatures are
//! multi-codepoint sequences kept verbatim so the shaper can discover
//! the substituted glyphs. The output order is deterministic: code
//! points ascending, then ligatures in insertion order.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

bitflags! {
    /// Built-in character ranges with their common ligature seeds.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CharacterPreset: u32 {
        const LATIN = 1 << 0;
        const CYRILLIC = 1 << 1;
    }
}

/// Ligature seeds baked alongside the Latin preset.
const LATIN_LIGATURES: &[&str] = &[
    "fi", "fl", "ff", "ffi", "ffl", "ft", "st", "ct", "sp", "Th", "Qu", "ch", "ck", "ll", "ss",
    "tt", "mm", "nn", "pp", "rr", "gg", "bb", "dd", "ww", "vv", "yy", "oo", "ee", "aa", "uu", "ii",
];

/// Collects Unicode ranges, literal samples, and ligature strings into a
/// single glyph-discovery seed string.
#[derive(Clone, Debug, Default)]
pub struct CharacterSetBuilder {
    codes: BTreeSet<u32>,
    ligatures: Vec<String>,
    presets: CharacterPreset,
}

impl CharacterSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable a built-in preset. Presets accumulate.
    pub fn with_preset(mut self, preset: CharacterPreset) -> Self {
        self.presets |= preset;
        self
    }

    /// Add an inclusive range of code points.
    pub fn add_range(&mut self, start: u32, end: u32) -> &mut Self {
        for code in start..=end {
            self.codes.insert(code);
        }
        self
    }

    /// Add every code point of a literal sample string.
    pub fn add_sample(&mut self, sample: &str) -> &mut Self {
        for ch in sample.chars() {
            self.codes.insert(ch as u32);
        }
        self
    }

    /// Add a ligature seed — a multi-codepoint sequence kept verbatim,
    /// not deduplicated against single code points.
    pub fn add_ligature(&mut self, ligature: &str) -> &mut Self {
        self.ligatures.push(ligature.to_owned());
        self
    }

    /// Build the canonical seed string: each distinct code point exactly
    /// once (ascending), followed by all ligature substrings verbatim.
    pub fn build(&self) -> String {
        let mut codes = self.codes.clone();
        let mut ligatures = Vec::new();

        if self.presets.contains(CharacterPreset::LATIN) {
            codes.extend(0x0020..=0x007F);
            ligatures.extend(LATIN_LIGATURES.iter().map(|s| (*s).to_owned()));
        }
        if self.presets.contains(CharacterPreset::CYRILLIC) {
            codes.extend(0x0400..=0x04FF);
        }

        ligatures.extend(self.ligatures.iter().cloned());

        let mut out = String::with_capacity(codes.len() + ligatures.len() * 3);
        for code in codes {
            if let Some(ch) = char::from_u32(code) {
                out.push(ch);
            }
        }
        for ligature in &ligatures {
            out.push_str(ligature);
        }
        out
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder_yields_empty_string() {
        assert_eq!(CharacterSetBuilder::new().build(), "");
    }

    #[test]
    fn test_samples_deduplicate() {
        let mut builder = CharacterSetBuilder::new();
        builder.add_sample("Hello").add_sample("world");
        let out = builder.build();

        // Each distinct code point exactly once.
        for ch in "Helowrd".chars() {
            assert_eq!(out.matches(ch).count(), 1, "duplicate {ch}");
        }
        // 'l' and 'o' overlap between the two samples.
        assert_eq!(out.chars().count(), 7);
    }

    #[test]
    fn test_output_is_sorted_and_deterministic() {
        let mut a = CharacterSetBuilder::new();
        a.add_sample("cba");
        let mut b = CharacterSetBuilder::new();
        b.add_sample("abc");
        assert_eq!(a.build(), "abc");
        assert_eq!(a.build(), b.build());
    }

    #[test]
    fn test_range_inclusive() {
        let mut builder = CharacterSetBuilder::new();
        builder.add_range('a' as u32, 'c' as u32);
        assert_eq!(builder.build(), "abc");
    }

    #[test]
    fn test_ligatures_appended_verbatim() {
        let mut builder = CharacterSetBuilder::new();
        builder.add_sample("fi").add_ligature("fi");
        // 'f' and 'i' once each, then the "fi" sequence untouched.
        assert_eq!(builder.build(), "fifi");
    }

    #[test]
    fn test_latin_preset() {
        let out = CharacterSetBuilder::new()
            .with_preset(CharacterPreset::LATIN)
            .build();
        assert!(out.contains('A'));
        assert!(out.contains('~'));
        assert!(out.contains("ffi"));
        // Printable ASCII appears once each even though ligature seeds
        // repeat the letters.
        assert_eq!(out.matches('~').count(), 1);
    }

    #[test]
    fn test_cyrillic_preset() {
        let out = CharacterSetBuilder::new()
            .with_preset(CharacterPreset::CYRILLIC)
            .build();
        assert!(out.contains('\u{0416}'));
        assert!(!out.contains('A'));
    }

    #[test]
    fn test_presets_combine() {
        let out = CharacterSetBuilder::new()
            .with_preset(CharacterPreset::LATIN)
            .with_preset(CharacterPreset::CYRILLIC)
            .build();
        assert!(out.contains('A'));
        assert!(out.contains('\u{0416}'));
    }
}
