//! Static reference data consumed by the setup wizard
//!
//! The catalog holds the interest cards (with optional age bounds), the
//! learning topics and the supported quiz languages. It is read-only once
//! built; hosts can replace the built-in lists by deserializing their own.

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::constants::child::{MAX_AGE, MIN_AGE};

/// A predefined interest the child can like or skip
///
/// Interests without bounds apply to every age. Bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Interest {
    /// Stable identifier of the interest
    #[garde(length(min = 1))]
    pub id: String,
    /// Name shown on the card and sent to the generator when liked
    #[garde(length(min = 1))]
    pub display_name: String,
    /// Emoji shown on the card
    #[garde(skip)]
    pub emoji: String,
    /// Youngest age the interest is offered to
    #[garde(range(min = MIN_AGE, max = MAX_AGE))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u8>,
    /// Oldest age the interest is offered to
    #[garde(range(min = MIN_AGE, max = MAX_AGE))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u8>,
}

impl Interest {
    fn builtin(id: &str, display_name: &str, emoji: &str, min_age: u8, max_age: u8) -> Self {
        Self {
            id: id.to_owned(),
            display_name: display_name.to_owned(),
            emoji: emoji.to_owned(),
            min_age: Some(min_age),
            max_age: Some(max_age),
        }
    }

    /// Checks whether this interest should be offered to a child of `age`
    pub fn suits_age(&self, age: u8) -> bool {
        self.min_age.is_none_or(|min| age >= min) && self.max_age.is_none_or(|max| age <= max)
    }
}

/// A locale the quiz can be generated in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Language {
    /// BCP 47 locale tag, e.g. `en-US`
    #[garde(length(min = 2))]
    pub code: String,
    /// Human readable name of the locale
    #[garde(length(min = 1))]
    pub name: String,
}

/// The interest, topic and language lists offered by the wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Catalog {
    /// Interest cards, in presentation order
    #[garde(dive)]
    interests: Vec<Interest>,
    /// Learning topics the parent can toggle
    #[garde(length(min = 1), inner(length(min = 1)))]
    topics: Vec<String>,
    /// Locales offered on the details step
    #[garde(length(min = 1), dive)]
    languages: Vec<Language>,
}

impl Default for Catalog {
    fn default() -> Self {
        let interests = vec![
            Interest::builtin("dinosaurs", "Dinosaurs", "🦖", 3, 8),
            Interest::builtin("princesses", "Princesses", "👑", 3, 7),
            Interest::builtin("superheroes", "Superheroes", "🦸", 4, 12),
            Interest::builtin("space", "Space", "🚀", 4, 12),
            Interest::builtin("animals", "Animals", "🐼", 3, 12),
            Interest::builtin("fairy-tales", "Fairy Tales", "🧚", 3, 7),
            Interest::builtin("cars", "Cars & Trucks", "🚗", 3, 8),
            Interest::builtin("minecraft", "Minecraft", "🟩", 6, 12),
            Interest::builtin("sports", "Sports", "⚽", 5, 12),
            Interest::builtin("science", "Science", "🧪", 6, 12),
            Interest::builtin("music", "Music", "🎵", 3, 12),
            Interest::builtin("art", "Art & Drawing", "🎨", 3, 12),
            Interest::builtin("nature", "Nature", "🌳", 3, 12),
            Interest::builtin("history", "History", "🏛️", 8, 12),
            Interest::builtin("coding", "Coding", "💻", 7, 12),
            Interest::builtin("robots", "Robots", "🤖", 5, 12),
        ];

        let topics = [
            "Math (Addition)",
            "Math (Subtraction)",
            "Math (Multiplication)",
            "Science",
            "Geography",
            "History",
            "Spelling",
            "Problem Solving",
            "Colors & Shapes",
            "Logic & Puzzles",
        ]
        .into_iter()
        .map(str::to_owned)
        .collect();

        let languages = [
            ("en-US", "English (US)"),
            ("en-GB", "English (UK)"),
            ("es-ES", "Español (Spanish)"),
            ("fr-FR", "Français (French)"),
            ("de-DE", "Deutsch (German)"),
            ("it-IT", "Italiano (Italian)"),
            ("pt-BR", "Português (Brasil)"),
            ("ja-JP", "日本語 (Japanese)"),
            ("ko-KR", "한국어 (Korean)"),
            ("zh-CN", "中文 (Chinese Simplified)"),
            ("hi-IN", "हिन्दी (Hindi)"),
            ("ar-SA", "العربية (Arabic)"),
        ]
        .into_iter()
        .map(|(code, name)| Language {
            code: code.to_owned(),
            name: name.to_owned(),
        })
        .collect();

        Self {
            interests,
            topics,
            languages,
        }
    }
}

impl Catalog {
    /// Builds a catalog from explicit lists
    pub fn new(interests: Vec<Interest>, topics: Vec<String>, languages: Vec<Language>) -> Self {
        Self {
            interests,
            topics,
            languages,
        }
    }

    /// All interests, in catalog order
    pub fn interests(&self) -> &[Interest] {
        &self.interests
    }

    /// Interests offered to a child of `age`, preserving catalog order
    pub fn interests_for_age(&self, age: u8) -> impl Iterator<Item = &Interest> {
        self.interests
            .iter()
            .filter(move |interest| interest.suits_age(age))
    }

    /// All learning topics, in catalog order
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Checks whether `topic` is one of the catalog topics
    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }

    /// All supported languages
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Looks up a supported language by its locale tag
    pub fn language(&self, code: &str) -> Option<&Language> {
        self.languages.iter().find(|l| l.code == code)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn unbounded(id: &str) -> Interest {
        Interest {
            id: id.to_string(),
            display_name: id.to_string(),
            emoji: String::new(),
            min_age: None,
            max_age: None,
        }
    }

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = Catalog::default();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.interests().len(), 16);
        assert_eq!(catalog.topics().len(), 10);
        assert_eq!(catalog.languages().len(), 12);
    }

    #[test]
    fn test_age_filter_matches_bounds_for_every_age() {
        let catalog = Catalog::default();
        for age in 0..=20 {
            let visible: Vec<_> = catalog.interests_for_age(age).map(|i| &i.id).collect();
            for interest in catalog.interests() {
                let expected = interest.min_age.is_none_or(|min| age >= min)
                    && interest.max_age.is_none_or(|max| age <= max);
                assert_eq!(
                    visible.contains(&&interest.id),
                    expected,
                    "age {age}, interest {}",
                    interest.id
                );
            }
        }
    }

    #[test]
    fn test_age_five_excludes_min_age_six() {
        let catalog = Catalog::default();
        let ids: Vec<_> = catalog.interests_for_age(5).map(|i| i.id.as_str()).collect();
        assert!(!ids.contains(&"minecraft"));
        assert!(!ids.contains(&"science"));
        assert!(ids.contains(&"dinosaurs"));
    }

    #[test]
    fn test_age_filter_preserves_catalog_order() {
        let catalog = Catalog::default();
        let ids: Vec<_> = catalog.interests_for_age(12).map(|i| i.id.as_str()).collect();
        assert_eq!(ids.first(), Some(&"superheroes"));
        assert_eq!(ids.last(), Some(&"robots"));
    }

    #[test]
    fn test_unbounded_interest_suits_every_age() {
        let interest = unbounded("anything");
        assert!(interest.suits_age(0));
        assert!(interest.suits_age(u8::MAX));
    }

    #[test]
    fn test_one_sided_bounds() {
        let mut interest = unbounded("older");
        interest.min_age = Some(8);
        assert!(!interest.suits_age(7));
        assert!(interest.suits_age(8));
        assert!(interest.suits_age(12));

        let mut interest = unbounded("younger");
        interest.max_age = Some(6);
        assert!(interest.suits_age(3));
        assert!(interest.suits_age(6));
        assert!(!interest.suits_age(7));
    }

    #[test]
    fn test_has_topic_and_language_lookup() {
        let catalog = Catalog::default();
        assert!(catalog.has_topic("Spelling"));
        assert!(!catalog.has_topic("spelling"));
        assert_eq!(
            catalog.language("fr-FR").map(|l| l.name.as_str()),
            Some("Français (French)")
        );
        assert!(catalog.language("xx-XX").is_none());
    }

    #[test]
    fn test_catalog_without_topics_is_invalid() {
        let catalog = Catalog::new(vec![], vec![], Catalog::default().languages().to_vec());
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_interest_bounds_outside_age_range_are_invalid() {
        let mut interest = unbounded("toddlers");
        interest.min_age = Some(1);
        assert!(interest.validate().is_err());
    }

    #[test]
    fn test_interest_json_uses_camel_case_and_optional_bounds() {
        let json = r#"{"id":"lego","displayName":"Lego","emoji":"🧱","minAge":4}"#;
        let interest: Interest = serde_json::from_str(json).unwrap();
        assert_eq!(interest.display_name, "Lego");
        assert_eq!(interest.min_age, Some(4));
        assert_eq!(interest.max_age, None);

        let back = serde_json::to_string(&interest).unwrap();
        assert!(back.contains("\"displayName\""));
        assert!(!back.contains("maxAge"));
    }
}
