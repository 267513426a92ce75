//! Synonym Table
//!
//! Static mapping from canonical search keywords to related terms (synonyms,
//! tag names, activity names, place names). Expansion is substring based in
//! both directions, so a short token such as "ea" can pull in unrelated keys
//! ("beach", "sea"). That looseness is what visitors rely on to avoid empty
//! result pages and is kept as is.

use crate::error::AppError;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Activity, experience and place synonyms
const BUILTIN_SYNONYMS: &[(&str, &[&str])] = &[
    // Water
    ("snorkel", &["Snorkel", "snorkeling", "reef", "underwater", "coral"]),
    ("scuba", &["Scuba", "diving", "dive", "Free Diving", "underwater", "tank"]),
    ("swim", &["swim", "swimming", "snorkel", "water"]),
    // Marine life
    ("whale", &["Whale Watch", "whale watching", "whales", "humpback", "cetacean"]),
    ("dolphin", &["Dolphin", "dolphins", "swim with dolphins", "spinner", "pod"]),
    ("manta", &["manta", "manta ray", "night snorkel", "night dive", "kona"]),
    ("turtle", &["turtle", "sea turtle", "honu", "green sea"]),
    ("shark", &["shark", "shark dive", "cage"]),
    ("fish", &["Fishing", "fish", "deep sea", "sportfishing", "charter"]),
    // Boats
    ("boat", &["Boat Tour", "Boat Rental", "cruise", "vessel", "charter"]),
    ("sail", &["Sailing", "Catamaran", "sail", "sailboat", "yacht"]),
    ("catamaran", &["Catamaran", "cat", "sailing"]),
    ("raft", &["Rafting", "raft", "zodiac", "inflatable"]),
    ("kayak", &["Kayak", "kayaking", "paddle", "paddling", "outrigger"]),
    ("canoe", &["Canoe", "outrigger", "paddle", "traditional"]),
    ("sup", &["SUP", "stand up paddle", "paddleboard", "paddle board"]),
    ("jet", &["jet ski", "jetski", "waverunner", "watercraft"]),
    // Air
    (
        "helicopter",
        &["Air Tour", "Air Activities", "helicopter", "heli", "aerial", "flight", "chopper"],
    ),
    ("skydive", &["skydive", "skydiving", "parachute", "tandem"]),
    ("parasail", &["Parasail", "parasailing", "parachute"]),
    ("glider", &["glider", "gliding", "soar"]),
    // Land
    (
        "hike",
        &["Hiking", "hike", "trek", "trail", "Walking Tour", "walk", "nature walk"],
    ),
    ("zipline", &["Zipline", "zip line", "ziplining", "zip", "canopy"]),
    ("atv", &["ATV/UTV", "atv", "utv", "off road", "offroad", "4x4", "quad"]),
    (
        "bike",
        &["Bike", "Bike Tour", "Bike Rental", "bicycle", "cycling", "ebike", "e-bike"],
    ),
    ("horse", &["Horse", "horseback", "riding", "ranch", "pony"]),
    ("golf", &["Golf", "golfing", "course"]),
    // Tours and experiences
    (
        "food",
        &["Food Tour", "food", "culinary", "tasting", "dining", "eat", "restaurant"],
    ),
    (
        "farm",
        &["Farm", "coffee", "plantation", "agricultural", "chocolate", "pineapple", "macadamia"],
    ),
    ("coffee", &["coffee", "kona coffee", "farm", "plantation", "roast"]),
    (
        "luau",
        &["luau", "feast", "traditional", "hawaiian show", "hula", "dinner show"],
    ),
    (
        "history",
        &["History Tour", "historical", "pearl harbor", "cultural", "heritage"],
    ),
    ("pearl", &["pearl harbor", "arizona", "memorial", "ww2", "wwii", "military"]),
    (
        "photo",
        &["Photography Tour", "photo", "photography", "instagram", "pictures"],
    ),
    ("eco", &["Eco Tour", "eco", "nature", "wildlife", "environmental", "green"]),
    ("wildlife", &["Wildlife", "nature", "animals", "birds", "sanctuary"]),
    // Time of day
    ("sunset", &["sunset", "evening", "Dinner Boat", "dusk", "golden hour"]),
    ("sunrise", &["sunrise", "morning", "dawn", "early"]),
    (
        "night",
        &["night", "evening", "stargazing", "manta", "after dark", "nocturnal"],
    ),
    // Experience types
    (
        "private",
        &["Private", "exclusive", "charter", "vip", "custom", "personalized"],
    ),
    ("family", &["family", "kids", "children", "kid friendly", "all ages"]),
    (
        "romantic",
        &["romantic", "couples", "honeymoon", "anniversary", "proposal"],
    ),
    ("adventure", &["adventure", "extreme", "thrill", "adrenaline", "exciting"]),
    ("relaxing", &["relaxing", "peaceful", "calm", "serene", "gentle"]),
    ("luxury", &["luxury", "premium", "upscale", "high end", "deluxe"]),
    // Places
    ("volcano", &["volcano", "lava", "kilauea", "volcanoes", "crater", "caldera"]),
    ("waterfall", &["waterfall", "falls", "cascade", "hana"]),
    ("beach", &["beach", "shore", "sand", "coast", "bay"]),
    ("mountain", &["mountain", "mauna kea", "haleakala", "summit", "peak"]),
    ("canyon", &["canyon", "waimea", "gorge"]),
    ("napali", &["napali", "na pali", "coast", "cliff"]),
    ("hana", &["hana", "road to hana", "waterfall"]),
    ("molokini", &["molokini", "crater", "snorkel"]),
    ("kealakekua", &["kealakekua", "captain cook", "bay", "monument"]),
    ("waikiki", &["waikiki", "honolulu", "diamond head"]),
    ("north shore", &["north shore", "haleiwa", "pipeline", "surf"]),
    // Surf
    (
        "surf",
        &["Surf", "surfing", "wave", "waves", "lesson", "board", "longboard"],
    ),
    ("beginner", &["beginner", "lesson", "learn", "first time", "intro"]),
    // Transportation
    ("bus", &["Bus Tour", "bus", "coach", "van"]),
    ("shuttle", &["Shuttle", "transfer", "transportation", "pickup"]),
    ("jeep", &["Jeep", "off road", "4x4"]),
];

/// Island keyword groups. Each island name is a member of its own group.
const BUILTIN_LOCATIONS: &[(&str, &[&str])] = &[
    (
        "oahu",
        &["oahu", "honolulu", "waikiki", "pearl harbor", "north shore", "diamond head", "hanauma", "kailua"],
    ),
    (
        "maui",
        &["maui", "lahaina", "kihei", "hana", "haleakala", "molokini", "kapalua", "wailea"],
    ),
    (
        "big island",
        &["big island", "hawaii island", "kona", "hilo", "volcano", "kilauea", "kohala", "waimea"],
    ),
    (
        "kauai",
        &["kauai", "napali", "na pali", "waimea canyon", "poipu", "hanalei", "lihue", "princeville"],
    ),
];

/// Default number of suggestions offered on an empty result page
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// One keyword and its related terms, all lower-cased
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymEntry {
    pub key: String,
    pub terms: Vec<String>,
}

impl SynonymEntry {
    fn new(key: &str, terms: &[&str]) -> Self {
        Self {
            key: key.to_lowercase(),
            terms: terms.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// Substring relation in either direction against the key or any term
    fn relates_to(&self, token: &str) -> bool {
        overlaps(&self.key, token) || self.terms.iter().any(|t| overlaps(t, token))
    }
}

fn overlaps(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Keyword → related terms table. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymTable {
    entries: Vec<SynonymEntry>,
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SynonymTable {
    /// The built-in activity table plus island keyword groups
    pub fn builtin() -> Self {
        let entries = BUILTIN_SYNONYMS
            .iter()
            .chain(BUILTIN_LOCATIONS.iter())
            .map(|(key, terms)| SynonymEntry::new(key, terms))
            .collect();
        Self { entries }
    }

    /// A table with no entries: expansion returns the token alone
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_entries<I, K, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<T>)>,
        K: AsRef<str>,
        T: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, terms)| SynonymEntry {
                key: key.as_ref().to_lowercase(),
                terms: terms.iter().map(|t| t.as_ref().to_lowercase()).collect(),
            })
            .collect();
        Self { entries }
    }

    /// Parse a JSON object of `"keyword": ["term", ...]`. Keys are taken in
    /// sorted order.
    pub fn from_json(data: &[u8]) -> Result<Self, AppError> {
        let map: BTreeMap<String, Vec<String>> = serde_json::from_slice(data)
            .map_err(|e| AppError::ConfigError(format!("Invalid synonym table: {}", e)))?;
        Ok(Self::from_entries(map))
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let data = std::fs::read(path).map_err(|e| {
            AppError::ConfigError(format!("Cannot read synonym table {}: {}", path.display(), e))
        })?;
        Self::from_json(&data)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SynonymEntry] {
        &self.entries
    }

    /// Expand a token: the token itself, then for every entry whose key or
    /// any term has a substring relationship with the token, the key and all
    /// of its terms. Duplicates are collapsed, first occurrence wins.
    pub fn expand(&self, token: &str) -> Vec<String> {
        let token = token.to_lowercase();
        if token.is_empty() {
            return vec![token];
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut out = vec![token.clone()];
        seen.insert(&token);

        for entry in self.entries.iter().filter(|e| e.relates_to(&token)) {
            for term in std::iter::once(&entry.key).chain(entry.terms.iter()) {
                if seen.insert(term.as_str()) {
                    out.push(term.clone());
                }
            }
        }

        out
    }

    /// Keywords to offer when a search comes back empty: keys where the key
    /// or any of its terms contains the input
    pub fn suggest(&self, input: &str, limit: usize) -> Vec<String> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Vec::new();
        }

        self.entries
            .iter()
            .filter(|e| e.key.contains(&input) || e.terms.iter().any(|t| t.contains(&input)))
            .map(|e| e.key.clone())
            .take(limit)
            .collect()
    }
}
