use serde::Serialize;

const THEMES: &[&str] = &[
    "Love",
    "Nature",
    "Heartbreak",
    "Hope",
    "Solitude",
    "Friendship",
    "Seasons",
    "Custom",
];

const RHYME_SCHEMES: &[&str] = &[
    "ABAB",
    "AAAA",
    "AABB",
    "Free Verse",
    "ABBA",
    "ABCB",
    "Sonnet (ABBAABBA CDECDE)",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LengthOption {
    pub value: &'static str,
    pub label: &'static str,
    pub stanzas: u8,
}

const LENGTHS: &[LengthOption] = &[
    LengthOption {
        value: "short",
        label: "Short (1 Stanza)",
        stanzas: 1,
    },
    LengthOption {
        value: "medium",
        label: "Medium (2 Stanzas)",
        stanzas: 2,
    },
    LengthOption {
        value: "long",
        label: "Long (2+ Stanzas)",
        stanzas: 3,
    },
];

/// Suggested values for the poem form. `/generate-poem` accepts any string,
/// these are only what clients offer by default. "Custom" means the client
/// supplies its own theme text.
#[derive(Debug, Clone, Serialize)]
pub struct PoemOptions {
    pub themes: &'static [&'static str],
    pub rhyme_schemes: &'static [&'static str],
    pub lengths: &'static [LengthOption],
}

impl PoemOptions {
    pub fn presets() -> Self {
        Self {
            themes: THEMES,
            rhyme_schemes: RHYME_SCHEMES,
            lengths: LENGTHS,
        }
    }
}
