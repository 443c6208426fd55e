//! Named-entity classification over the noun list.
//!
//! [`EntityTagger`] labels each noun as person, organization, location, or
//! no category. Two implementations ship: [`StanfordTagger`] drives the
//! Stanford NER classifier as a subprocess when its model and jar are
//! configured, and [`HeuristicTagger`] is the always-available fallback using
//! word-shape and wordlist cues. [`auto`] picks between them.
//!
//! Classification quality is whatever the chosen backend delivers; the
//! pipeline makes no correctness promises beyond it.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use crate::config::PipelineConfig;
use crate::{Error, Result};

/// An entity label as the recognizer reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityLabel {
    Person,
    Organization,
    Location,
    /// No category ("O" in recognizer output).
    None,
}

impl EntityLabel {
    /// The recognizer's textual label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EntityLabel::Person => "PERSON",
            EntityLabel::Organization => "ORGANIZATION",
            EntityLabel::Location => "LOCATION",
            EntityLabel::None => "O",
        }
    }

    /// Parse a recognizer label; anything unrecognized is no category.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label {
            "PERSON" => EntityLabel::Person,
            "ORGANIZATION" => EntityLabel::Organization,
            "LOCATION" => EntityLabel::Location,
            _ => EntityLabel::None,
        }
    }

    /// Whether this label marks a disambiguation candidate: the recognizer
    /// abstained, or the noun is merely geographic and may need semantic
    /// refinement.
    #[must_use]
    pub fn needs_disambiguation(self) -> bool {
        matches!(self, EntityLabel::None | EntityLabel::Location)
    }

    /// Whether this label is trusted as-is (person or organization).
    #[must_use]
    pub fn is_trusted(self) -> bool {
        matches!(self, EntityLabel::Person | EntityLabel::Organization)
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named-entity recognizer over a word list.
pub trait EntityTagger {
    /// Label each word, preserving order and length.
    fn tag(&self, words: &[String]) -> Result<Vec<(String, EntityLabel)>>;
}

/// Pick a tagger for a configuration: the Stanford classifier when both its
/// model and jar are configured, the heuristic fallback otherwise.
#[must_use]
pub fn auto(config: &PipelineConfig) -> Box<dyn EntityTagger> {
    match (&config.ner_model_path, &config.ner_jar_path) {
        (Some(model), Some(jar)) => {
            Box::new(StanfordTagger::new(model.clone(), jar.clone()))
        }
        _ => {
            log::info!("no NER model/jar configured, using heuristic tagger");
            Box::new(HeuristicTagger::new())
        }
    }
}

// =============================================================================
// Stanford NER subprocess
// =============================================================================

/// The Stanford CRF classifier, invoked through `java` with slash-tag output.
///
/// The word list is written to a temp file one token per line of text, the
/// classifier is run over it, and its `token/LABEL` output is parsed back.
/// Spawn or exit failures are infrastructure errors and abort the run.
pub struct StanfordTagger {
    model: PathBuf,
    jar: PathBuf,
}

impl StanfordTagger {
    /// Create a tagger from a serialized classifier and the NER jar.
    #[must_use]
    pub fn new(model: impl Into<PathBuf>, jar: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            jar: jar.into(),
        }
    }
}

impl EntityTagger for StanfordTagger {
    fn tag(&self, words: &[String]) -> Result<Vec<(String, EntityLabel)>> {
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let mut input = tempfile::NamedTempFile::new()?;
        writeln!(input, "{}", words.join(" "))?;
        input.flush()?;

        let output = Command::new("java")
            .arg("-cp")
            .arg(&self.jar)
            .arg("edu.stanford.nlp.ie.crf.CRFClassifier")
            .arg("-loadClassifier")
            .arg(&self.model)
            .arg("-textFile")
            .arg(input.path())
            .arg("-outputFormat")
            .arg("slashTags")
            .output()
            .map_err(|e| Error::tagger(format!("cannot spawn java: {e}")))?;

        if !output.status.success() {
            return Err(Error::tagger(format!(
                "classifier exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let tagged = parse_slash_tags(&stdout);
        if tagged.len() != words.len() {
            return Err(Error::tagger(format!(
                "classifier returned {} labels for {} words",
                tagged.len(),
                words.len()
            )));
        }
        Ok(tagged)
    }
}

/// Parse `token/LABEL token/LABEL ...` classifier output.
fn parse_slash_tags(output: &str) -> Vec<(String, EntityLabel)> {
    output
        .split_whitespace()
        .map(|chunk| match chunk.rsplit_once('/') {
            Some((word, label)) => (word.to_string(), EntityLabel::parse(label)),
            None => (chunk.to_string(), EntityLabel::None),
        })
        .collect()
}

// =============================================================================
// Heuristic fallback
// =============================================================================

/// Title and honorific words that mark the next noun as a person.
const PERSON_TITLES: &[&str] = &[
    "mr", "mr.", "mrs", "mrs.", "ms", "ms.", "dr", "dr.", "prof", "prof.",
    "president", "senator", "governor", "mayor", "king", "queen", "sir",
    "captain", "general", "judge", "professor",
];

/// Common first names, a strong person signal on the following noun too.
const COMMON_FIRST_NAMES: &[&str] = &[
    "james", "john", "robert", "michael", "william", "david", "richard",
    "joseph", "thomas", "charles", "george", "edward", "henry", "paul",
    "peter", "mark", "steve", "steven", "daniel", "matthew", "andrew",
    "mary", "patricia", "jennifer", "linda", "elizabeth", "barbara", "susan",
    "sarah", "karen", "anna", "anne", "emily", "emma", "julia", "kate",
    "maria", "marie", "nancy", "rachel", "victoria",
];

/// Organization suffixes.
const ORG_SUFFIXES: &[&str] = &[
    "inc", "inc.", "corp", "corp.", "corporation", "co", "co.", "ltd",
    "ltd.", "llc", "company", "group", "foundation", "institute",
    "university", "college", "bank", "church", "museum", "ministry",
];

/// Window-heuristic tagger over the noun list.
///
/// The noun list carries no sentence context, so the cues are word shape and
/// the neighboring nouns: titles and first names mark people, organization
/// suffixes mark organizations, and remaining capitalized nouns default to
/// locations (which stay disambiguation candidates downstream). Lowercase
/// nouns are common nouns and get no category.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTagger;

impl HeuristicTagger {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn classify(words: &[String], i: usize) -> EntityLabel {
        let word = &words[i];
        let lower = word.to_lowercase();
        let capitalized = word.chars().next().is_some_and(char::is_uppercase);
        if !capitalized {
            return EntityLabel::None;
        }

        let prev = i.checked_sub(1).map(|p| words[p].to_lowercase());
        let next = words.get(i + 1).map(|n| n.to_lowercase());

        if COMMON_FIRST_NAMES.contains(&lower.as_str())
            || prev
                .as_deref()
                .is_some_and(|p| PERSON_TITLES.contains(&p) || COMMON_FIRST_NAMES.contains(&p))
        {
            return EntityLabel::Person;
        }

        let all_caps = word.len() > 1 && word.chars().all(|c| !c.is_alphabetic() || c.is_uppercase());
        if ORG_SUFFIXES.contains(&lower.as_str())
            || next.as_deref().is_some_and(|n| ORG_SUFFIXES.contains(&n))
            || (all_caps && word.len() <= 5)
        {
            return EntityLabel::Organization;
        }

        EntityLabel::Location
    }
}

impl EntityTagger for HeuristicTagger {
    fn tag(&self, words: &[String]) -> Result<Vec<(String, EntityLabel)>> {
        Ok(words
            .iter()
            .enumerate()
            .map(|(i, word)| (word.clone(), Self::classify(words, i)))
            .collect())
    }
}

// =============================================================================
// Mock tagger for tests
// =============================================================================

/// A tagger with pre-registered labels; unregistered words get no category.
#[derive(Debug, Clone, Default)]
pub struct MockTagger {
    labels: std::collections::HashMap<String, EntityLabel>,
}

impl MockTagger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the label returned for `word`.
    #[must_use]
    pub fn with_label(mut self, word: &str, label: EntityLabel) -> Self {
        self.labels.insert(word.to_string(), label);
        self
    }
}

impl EntityTagger for MockTagger {
    fn tag(&self, words: &[String]) -> Result<Vec<(String, EntityLabel)>> {
        Ok(words
            .iter()
            .map(|w| (w.clone(), self.labels.get(w).copied().unwrap_or(EntityLabel::None)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(words: &[&str]) -> Vec<EntityLabel> {
        let words: Vec<String> = words.iter().map(ToString::to_string).collect();
        HeuristicTagger::new()
            .tag(&words)
            .unwrap()
            .into_iter()
            .map(|(_, label)| label)
            .collect()
    }

    #[test]
    fn test_label_round_trip() {
        for label in [
            EntityLabel::Person,
            EntityLabel::Organization,
            EntityLabel::Location,
            EntityLabel::None,
        ] {
            assert_eq!(EntityLabel::parse(label.as_str()), label);
        }
        assert_eq!(EntityLabel::parse("MISC"), EntityLabel::None);
    }

    #[test]
    fn test_label_views_partition() {
        assert!(EntityLabel::None.needs_disambiguation());
        assert!(EntityLabel::Location.needs_disambiguation());
        assert!(!EntityLabel::Person.needs_disambiguation());
        assert!(EntityLabel::Person.is_trusted());
        assert!(EntityLabel::Organization.is_trusted());
        assert!(!EntityLabel::Location.is_trusted());
    }

    #[test]
    fn test_parse_slash_tags() {
        let tagged = parse_slash_tags("Paris/LOCATION city/O Smith/PERSON");
        assert_eq!(
            tagged,
            vec![
                ("Paris".to_string(), EntityLabel::Location),
                ("city".to_string(), EntityLabel::None),
                ("Smith".to_string(), EntityLabel::Person),
            ]
        );
    }

    #[test]
    fn test_parse_slash_tags_keeps_inner_slashes() {
        let tagged = parse_slash_tags("and/or/O");
        assert_eq!(tagged, vec![("and/or".to_string(), EntityLabel::None)]);
    }

    #[test]
    fn test_heuristic_lowercase_is_no_category() {
        assert_eq!(tag(&["city", "sport"]), vec![EntityLabel::None, EntityLabel::None]);
    }

    #[test]
    fn test_heuristic_first_name_marks_person() {
        assert_eq!(
            tag(&["George", "Washington"]),
            vec![EntityLabel::Person, EntityLabel::Person]
        );
    }

    #[test]
    fn test_heuristic_org_suffix() {
        assert_eq!(
            tag(&["Acme", "Corp"]),
            vec![EntityLabel::Organization, EntityLabel::Organization]
        );
    }

    #[test]
    fn test_heuristic_capitalized_defaults_to_location() {
        assert_eq!(tag(&["Paris"]), vec![EntityLabel::Location]);
    }

    #[test]
    fn test_heuristic_preserves_order_and_length() {
        let words: Vec<String> = ["Paris", "city", "Paris"].iter().map(ToString::to_string).collect();
        let tagged = HeuristicTagger::new().tag(&words).unwrap();
        assert_eq!(tagged.len(), 3);
        assert_eq!(tagged[0].0, "Paris");
        assert_eq!(tagged[2].0, "Paris");
    }

    #[test]
    fn test_auto_without_paths_is_heuristic() {
        let config = PipelineConfig::new("/corpus", "/wordnet");
        // Just exercising selection; the boxed tagger must work.
        let tagger = auto(&config);
        assert!(tagger.tag(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_mock_tagger_defaults_to_no_category() {
        let tagger = MockTagger::new().with_label("Paris", EntityLabel::Location);
        let tagged = tagger
            .tag(&["Paris".to_string(), "city".to_string()])
            .unwrap();
        assert_eq!(tagged[0].1, EntityLabel::Location);
        assert_eq!(tagged[1].1, EntityLabel::None);
    }
}
