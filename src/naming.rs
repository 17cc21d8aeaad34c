//! Funky Name Generator
//!
//! Boxes are labeled with generated adjective-animal-noun triples
//! ("purple-tiger-cloud"). With ~100 words per list there are over a
//! million combinations, so collisions are tolerated rather than
//! prevented; display names are not unique.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "purple", "golden", "silver", "cosmic", "swift", "brave", "quiet", "wild",
    "gentle", "fierce", "happy", "sleepy", "sunny", "misty", "stormy", "frozen",
    "blazing", "ancient", "modern", "rustic", "mystic", "magic", "lucky", "clever",
    "bold", "calm", "cool", "crisp", "dark", "deep", "dusty", "eager", "early",
    "easy", "fair", "fancy", "fast", "fine", "firm", "flat", "free", "fresh",
    "full", "fuzzy", "glad", "grand", "great", "green", "grey", "handy", "hasty",
    "heavy", "hidden", "hollow", "humble", "icy", "jade", "jolly", "keen", "kind",
    "large", "late", "lazy", "light", "lively", "lone", "long", "loud", "low",
    "lunar", "mad", "mega", "mellow", "mighty", "mild", "mini", "neat", "new",
    "noble", "odd", "old", "pale", "plain", "prime", "proud", "pure", "quick",
    "rare", "raw", "red", "rich", "ripe", "rough", "round", "ruby", "safe", "sage",
    "shy", "silent", "slim", "slow", "small", "smart", "smooth", "soft", "solid",
];

const ANIMALS: &[&str] = &[
    "tiger", "falcon", "dolphin", "phoenix", "dragon", "wolf", "bear", "eagle",
    "owl", "fox", "hawk", "lion", "panther", "raven", "shark", "whale", "zebra",
    "badger", "beaver", "bison", "buffalo", "camel", "cheetah", "cobra", "condor",
    "cougar", "coyote", "crane", "crow", "deer", "dove", "duck", "elk", "ferret",
    "finch", "gazelle", "gecko", "giraffe", "goat", "goose", "gorilla", "hare",
    "heron", "hippo", "horse", "hyena", "ibis", "iguana", "impala", "jackal",
    "jaguar", "jay", "koala", "lemur", "leopard", "llama", "lynx", "macaw",
    "mammoth", "manta", "marten", "meerkat", "moose", "mouse", "newt", "orca",
    "otter", "panda", "parrot", "pelican", "penguin", "pigeon", "pony", "puma",
    "python", "quail", "rabbit", "raccoon", "ram", "raptor", "robin", "salmon",
    "seal", "sloth", "snake", "sparrow", "spider", "squid", "stag", "stork",
    "swan", "swift", "tapir", "toucan", "turtle", "viper", "vulture", "walrus",
];

const NOUNS: &[&str] = &[
    "cloud", "storm", "river", "crystal", "mountain", "forest", "ocean", "thunder",
    "shadow", "flame", "frost", "wind", "star", "moon", "sun", "rain", "snow",
    "wave", "stone", "leaf", "bloom", "canyon", "valley", "peak", "ridge", "cave",
    "coast", "creek", "delta", "dune", "field", "glade", "grove", "harbor", "haven",
    "island", "jungle", "lake", "marsh", "meadow", "mesa", "oasis", "plain", "pond",
    "prairie", "reef", "shore", "spring", "stream", "summit", "swamp", "trail",
    "tundra", "vista", "woods", "anchor", "arrow", "beacon", "blade", "bolt",
    "bridge", "castle", "comet", "crown", "dawn", "dream", "echo", "ember", "fable",
    "forge", "garden", "gate", "gem", "glow", "heart", "hollow", "horizon",
    "jewel", "knight", "lamp", "lantern", "legend", "light", "mist", "night",
    "orbit", "palace", "path", "pearl", "prism", "quest", "realm", "relic",
    "ring", "saga", "spark", "spirit", "sprite", "temple", "throne", "tower",
];

const INVITE_CODE_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const INVITE_CODE_LEN: usize = 8;

/// Generate a funky name in adjective-animal-noun format,
/// e.g. "purple-tiger-cloud"
pub fn generate_funky_name() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES.choose(&mut rng).unwrap();
    let animal = ANIMALS.choose(&mut rng).unwrap();
    let noun = NOUNS.choose(&mut rng).unwrap();
    format!("{}-{}-{}", adjective, animal, noun)
}

/// Generate `count` pairwise-distinct funky names.
///
/// Retries on collision without an upper bound; acceptable only because
/// the combination space is ~10^6.
pub fn generate_many_funky_names(count: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(count);
    while names.len() < count {
        let name = generate_funky_name();
        if seen.insert(name.clone()) {
            names.push(name);
        }
    }
    names
}

/// Check whether a string has the funky-name shape: exactly three
/// non-empty hyphen-separated segments
pub fn is_funky_name(name: &str) -> bool {
    let parts: Vec<&str> = name.split('-').collect();
    parts.len() == 3 && parts.iter().all(|part| !part.is_empty())
}

/// Generate a household invite code (8 characters, ambiguous glyphs
/// excluded)
pub fn generate_invite_code() -> String {
    let mut rng = rand::thread_rng();
    (0..INVITE_CODE_LEN)
        .map(|_| INVITE_CODE_CHARS[rng.gen_range(0..INVITE_CODE_CHARS.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_funky_name_shape() {
        for _ in 0..200 {
            let name = generate_funky_name();
            assert!(is_funky_name(&name), "bad shape: {}", name);
            assert_eq!(name, name.to_lowercase());
            let segments: Vec<&str> = name.split('-').collect();
            assert_eq!(segments.len(), 3);
            assert!(segments.iter().all(|s| !s.is_empty()));
        }
    }

    #[test]
    fn test_many_names_are_distinct() {
        let names = generate_many_funky_names(50);
        assert_eq!(names.len(), 50);
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), 50);
    }

    #[test]
    fn test_is_funky_name_rejects_other_shapes() {
        assert!(is_funky_name("purple-tiger-cloud"));
        assert!(!is_funky_name("purple-tiger"));
        assert!(!is_funky_name("purple--cloud"));
        assert!(!is_funky_name("a-b-c-d"));
        assert!(!is_funky_name(""));
    }

    #[test]
    fn test_invite_code_shape() {
        let code = generate_invite_code();
        assert_eq!(code.len(), 8);
        assert!(code.bytes().all(|b| INVITE_CODE_CHARS.contains(&b)));
    }
}
