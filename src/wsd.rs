//! Word-sense disambiguation.
//!
//! [`SenseOracle`] is the seam: given a context string and a word, return the
//! best noun sense or abstain. [`Lesk`] is the default implementation, a
//! simplified Lesk that scores each candidate sense by the overlap between
//! its definition and the context words.
//!
//! The disambiguation stage itself lives in [`disambiguate`]. Its result type
//! is deliberately split: a noun with several senses resolves to the oracle's
//! single best sense, while a noun with one (or zero) senses resolves to its
//! full raw sense list whenever the oracle still answers for it. The split is
//! collapsed by [`SenseResolution::normalize`] before category resolution.

use std::collections::HashSet;
use std::sync::Arc;

use crate::lexicon::{LexicalGraph, Sense, WordNet};

/// The outcome of disambiguating one noun.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SenseResolution {
    /// The oracle's best sense for an ambiguous noun.
    Best(Sense),
    /// The full sense list of a noun with at most one known sense.
    AllSenses(Vec<Sense>),
}

impl SenseResolution {
    /// Collapse to a single sense: the best sense as-is, or the first item
    /// of a sense list. An empty list collapses to `None`.
    #[must_use]
    pub fn normalize(self) -> Option<Sense> {
        match self {
            SenseResolution::Best(sense) => Some(sense),
            SenseResolution::AllSenses(senses) => senses.into_iter().next(),
        }
    }
}

/// A word-sense disambiguation oracle.
pub trait SenseOracle {
    /// The best sense of `word` (with part of speech `pos`, `'n'` for nouns)
    /// given `context`, or `None` to abstain.
    fn best_sense(&self, context: &str, word: &str, pos: char) -> Option<Sense>;
}

/// Disambiguate each noun against the whole-corpus context.
///
/// A noun with more than one known sense is recorded with the oracle's best
/// sense, if any. A noun with one or zero senses is recorded with its raw
/// sense list, provided the oracle still answers for it. Nouns the oracle
/// abstains on are dropped silently.
#[must_use]
pub fn disambiguate(
    graph: &dyn LexicalGraph,
    oracle: &dyn SenseOracle,
    context: &str,
    nouns: &[String],
) -> Vec<(String, SenseResolution)> {
    let mut resolutions = Vec::new();
    for noun in nouns {
        let senses = graph.senses_of(noun);
        if senses.len() > 1 {
            if let Some(best) = oracle.best_sense(context, noun, 'n') {
                resolutions.push((noun.clone(), SenseResolution::Best(best)));
            }
        } else if oracle.best_sense(context, noun, 'n').is_some() {
            resolutions.push((noun.clone(), SenseResolution::AllSenses(senses)));
        }
    }
    log::debug!("disambiguated {} of {} nouns", resolutions.len(), nouns.len());
    resolutions
}

/// Simplified Lesk disambiguation over the WordNet glosses.
///
/// Each candidate sense is scored by how many distinct context words appear
/// in its definition (examples excluded). Ties go to the lower sense number,
/// so an all-zero overlap still yields the first sense rather than an
/// abstention; the oracle only abstains for words the lexicon does not know.
pub struct Lesk {
    wordnet: Arc<WordNet>,
}

impl Lesk {
    /// Create a Lesk oracle over a loaded WordNet database.
    #[must_use]
    pub fn new(wordnet: Arc<WordNet>) -> Self {
        Self { wordnet }
    }
}

impl SenseOracle for Lesk {
    fn best_sense(&self, context: &str, word: &str, pos: char) -> Option<Sense> {
        if pos != 'n' {
            // Only the noun database is loaded.
            return None;
        }
        let senses = self.wordnet.senses_of(word);
        let context_words = word_set(context);

        let mut best: Option<(usize, Sense)> = None;
        for sense in senses {
            let overlap = self
                .wordnet
                .definition(&sense)
                .map_or(0, |def| word_set(&def).intersection(&context_words).count());
            match &best {
                Some((top, _)) if *top >= overlap => {}
                _ => best = Some((overlap, sense)),
            }
        }
        best.map(|(_, sense)| sense)
    }
}

fn word_set(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-')
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

// =============================================================================
// Mock oracle for tests
// =============================================================================

/// An in-memory oracle for testing the disambiguation stage.
#[derive(Debug, Clone, Default)]
pub struct MockOracle {
    answers: std::collections::HashMap<String, Sense>,
}

impl MockOracle {
    /// Create an oracle that abstains on everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `sense` for `word`, regardless of context.
    #[must_use]
    pub fn with_answer(mut self, word: &str, sense: &str) -> Self {
        self.answers.insert(word.to_lowercase(), Sense::new(sense));
        self
    }
}

impl SenseOracle for MockOracle {
    fn best_sense(&self, _context: &str, word: &str, pos: char) -> Option<Sense> {
        if pos != 'n' {
            return None;
        }
        self.answers.get(&word.to_lowercase()).cloned()
    }
}
