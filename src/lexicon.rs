//! Lexical-semantic graph access.
//!
//! The pipeline needs two things from a lexical resource: the senses of a
//! noun, and the hypernym paths of a sense. [`LexicalGraph`] is that seam;
//! [`WordNet`] is the default implementation, reading the Princeton WordNet
//! database files (`index.noun`, `data.noun`, and the optional `noun.exc`
//! exception list) for the noun part of speech, which is the only part this
//! pipeline disambiguates.
//!
//! Sense names follow the `lemma.n.NN` convention (first lemma of the
//! synset, part of speech, 1-based zero-padded sense number), so
//! `Sense::bare_name` on `body_of_water.n.01` yields the category-table key
//! `body_of_water`.
//!
//! Hypernym paths are produced root-first: the most general ancestor comes
//! first and the queried sense itself is the final element of every path.
//! Category resolution's last-match-wins fold depends on this order.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::{Error, Result};

/// One meaning of a word: a node in the lexical graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sense {
    name: String,
}

impl Sense {
    /// Create a sense from its canonical `lemma.pos.NN` name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The canonical name, e.g. `city.n.01`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name with the part-of-speech and sense-number suffix stripped,
    /// e.g. `city` for `city.n.01`. Lemmas containing periods survive:
    /// `u.s._army.n.01` yields `u.s._army`.
    #[must_use]
    pub fn bare_name(&self) -> &str {
        self.name.rsplitn(3, '.').nth(2).unwrap_or(&self.name)
    }
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A lexical-semantic graph: senses per word, hypernym paths per sense.
pub trait LexicalGraph {
    /// All senses of `word`, best-known sense first. Surface forms are
    /// normalized by the implementation (case, plural inflection); an
    /// unknown word yields an empty list.
    fn senses_of(&self, word: &str) -> Vec<Sense>;

    /// Every hypernym path of `sense`, root-first, each path ending at
    /// `sense` itself. A sense unknown to the graph yields no paths.
    fn hypernym_paths(&self, sense: &Sense) -> Vec<Vec<Sense>>;
}

// =============================================================================
// WordNet database
// =============================================================================

/// Morphological detachment rules for nouns, applied when a surface form is
/// not itself in the lexicon (`cities` → `city`).
const NOUN_SUFFIX_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// One synset record from the data file.
#[derive(Debug, Clone)]
struct SynsetRecord {
    /// Member words, database casing preserved.
    words: Vec<String>,
    /// Hypernym and instance-hypernym targets.
    hypernyms: Vec<u64>,
    /// Raw gloss: definition plus quoted examples.
    gloss: String,
}

/// The Princeton WordNet noun database.
///
/// Only the noun files are loaded; the pipeline never asks for any other
/// part of speech.
pub struct WordNet {
    /// Lemma (lowercase, underscores) → synset offsets in sense order.
    index: HashMap<String, Vec<u64>>,
    synsets: HashMap<u64, SynsetRecord>,
    /// Offset → canonical `lemma.n.NN` name.
    names: HashMap<u64, String>,
    /// Canonical name → offset, for path traversal.
    by_name: HashMap<String, u64>,
    /// Inflected form → base forms, from the exception list.
    exceptions: HashMap<String, Vec<String>>,
}

impl WordNet {
    /// Load the noun database from a WordNet `dict` directory.
    ///
    /// `index.noun` and `data.noun` are required; `noun.exc` is used when
    /// present.
    pub fn load(dir: impl AsRef<Path>) -> Result<WordNet> {
        let dir = dir.as_ref();
        let index_src = read_required(&dir.join("index.noun"))?;
        let data_src = read_required(&dir.join("data.noun"))?;
        let exc_src = std::fs::read_to_string(dir.join("noun.exc")).unwrap_or_default();
        let wordnet = Self::from_sources(&index_src, &data_src, &exc_src)?;
        log::info!(
            "loaded WordNet noun database from {}: {} lemmas, {} synsets",
            dir.display(),
            wordnet.index.len(),
            wordnet.synsets.len()
        );
        Ok(wordnet)
    }

    /// Build a database from in-memory file contents. Useful for embedded
    /// subsets and tests.
    pub fn from_sources(index_src: &str, data_src: &str, exc_src: &str) -> Result<WordNet> {
        let mut index: HashMap<String, Vec<u64>> = HashMap::new();
        for line in content_lines(index_src) {
            if let Some((lemma, offsets)) = parse_index_line(line) {
                index.insert(lemma, offsets);
            } else {
                log::debug!("skipping malformed index line: {line:?}");
            }
        }

        let mut synsets: HashMap<u64, SynsetRecord> = HashMap::new();
        for line in content_lines(data_src) {
            if let Some((offset, record)) = parse_data_line(line) {
                synsets.insert(offset, record);
            } else {
                log::debug!("skipping malformed data line: {line:?}");
            }
        }

        if index.is_empty() || synsets.is_empty() {
            return Err(Error::lexicon("noun database is empty"));
        }

        let mut exceptions: HashMap<String, Vec<String>> = HashMap::new();
        for line in content_lines(exc_src) {
            let mut fields = line.split_whitespace().map(String::from);
            if let Some(inflected) = fields.next() {
                let bases: Vec<String> = fields.collect();
                if !bases.is_empty() {
                    exceptions.insert(inflected, bases);
                }
            }
        }

        // Canonical names: first lemma of the synset plus the 1-based
        // position of the synset among that lemma's senses.
        let mut names = HashMap::new();
        let mut by_name = HashMap::new();
        for (&offset, record) in &synsets {
            let Some(first) = record.words.first() else {
                continue;
            };
            let lemma = first.to_lowercase();
            let number = index
                .get(&lemma)
                .and_then(|offsets| offsets.iter().position(|&o| o == offset))
                .map_or(1, |p| p + 1);
            let name = format!("{lemma}.n.{number:02}");
            by_name.insert(name.clone(), offset);
            names.insert(offset, name);
        }

        Ok(WordNet {
            index,
            synsets,
            names,
            by_name,
            exceptions,
        })
    }

    /// The definition part of a sense's gloss, without the quoted examples.
    #[must_use]
    pub fn definition(&self, sense: &Sense) -> Option<String> {
        let offset = self.by_name.get(sense.name())?;
        let gloss = &self.synsets.get(offset)?.gloss;
        let parts: Vec<&str> = gloss
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty() && !part.starts_with('"'))
            .collect();
        Some(parts.join("; "))
    }

    fn sense_at(&self, offset: u64) -> Sense {
        match self.names.get(&offset) {
            Some(name) => Sense::new(name.clone()),
            // Data/index mismatch; keep traversal total.
            None => Sense::new(format!("unknown.n.{offset:02}")),
        }
    }

    /// Base forms of `form` that exist in the lexicon, exception list
    /// first, then suffix detachment.
    fn base_forms(&self, form: &str) -> Vec<String> {
        if let Some(bases) = self.exceptions.get(form) {
            let mut forms = vec![form.to_string()];
            forms.extend(bases.iter().cloned());
            return self.keep_known(forms);
        }

        let mut forms = apply_suffix_rules(&[form.to_string()]);
        let mut candidates = vec![form.to_string()];
        candidates.extend(forms.iter().cloned());
        let known = self.keep_known(candidates);
        if !known.is_empty() {
            return known;
        }

        // Keep detaching until something matches or nothing is left.
        while !forms.is_empty() {
            forms = apply_suffix_rules(&forms);
            let known = self.keep_known(forms.clone());
            if !known.is_empty() {
                return known;
            }
        }
        Vec::new()
    }

    fn keep_known(&self, forms: Vec<String>) -> Vec<String> {
        let mut seen = Vec::new();
        for form in forms {
            if self.index.contains_key(&form) && !seen.contains(&form) {
                seen.push(form);
            }
        }
        seen
    }

    fn collect_paths(&self, offset: u64, chain: &mut Vec<u64>, out: &mut Vec<Vec<Sense>>) {
        if chain.contains(&offset) {
            // Cycle in a malformed database; drop this branch.
            log::debug!("hypernym cycle at synset {offset}");
            return;
        }
        chain.push(offset);
        let hypernyms: &[u64] = self
            .synsets
            .get(&offset)
            .map_or(&[], |record| record.hypernyms.as_slice());
        if hypernyms.is_empty() {
            // Reached a root: emit the chain most-general-first.
            out.push(chain.iter().rev().map(|&o| self.sense_at(o)).collect());
        } else {
            for &hypernym in hypernyms {
                self.collect_paths(hypernym, chain, out);
            }
        }
        chain.pop();
    }
}

impl LexicalGraph for WordNet {
    fn senses_of(&self, word: &str) -> Vec<Sense> {
        let normalized = word.to_lowercase().replace(' ', "_");
        let mut senses = Vec::new();
        let mut seen = Vec::new();
        for form in self.base_forms(&normalized) {
            if let Some(offsets) = self.index.get(&form) {
                for &offset in offsets {
                    if !seen.contains(&offset) {
                        seen.push(offset);
                        senses.push(self.sense_at(offset));
                    }
                }
            }
        }
        senses
    }

    fn hypernym_paths(&self, sense: &Sense) -> Vec<Vec<Sense>> {
        let Some(&offset) = self.by_name.get(sense.name()) else {
            return Vec::new();
        };
        let mut paths = Vec::new();
        let mut chain = Vec::new();
        self.collect_paths(offset, &mut chain, &mut paths);
        paths
    }
}

fn read_required(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::lexicon(format!("cannot read {}: {e}", path.display())))
}

/// Database lines minus the license header (header lines start with two
/// spaces) and blanks.
fn content_lines(src: &str) -> impl Iterator<Item = &str> {
    src.lines()
        .filter(|line| !line.starts_with(' ') && !line.trim().is_empty())
}

/// `lemma pos synset_cnt p_cnt [ptr...] sense_cnt tagsense_cnt offset...`
///
/// The offsets are the final `synset_cnt` fields, which sidesteps the
/// variable-length pointer-symbol list.
fn parse_index_line(line: &str) -> Option<(String, Vec<u64>)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let lemma = (*fields.first()?).to_string();
    if *fields.get(1)? != "n" {
        return None;
    }
    let count: usize = fields.get(2)?.parse().ok()?;
    if count == 0 || fields.len() < 6 + count {
        return None;
    }
    let offsets = fields[fields.len() - count..]
        .iter()
        .map(|f| f.parse().ok())
        .collect::<Option<Vec<u64>>>()?;
    Some((lemma, offsets))
}

/// `offset lex_filenum ss_type w_cnt (word lex_id)+ p_cnt ptr* | gloss`
/// where each pointer is `symbol offset pos source_target`.
fn parse_data_line(line: &str) -> Option<(u64, SynsetRecord)> {
    let (head, gloss) = match line.split_once(" | ") {
        Some((head, gloss)) => (head, gloss.trim().to_string()),
        None => (line, String::new()),
    };
    let fields: Vec<&str> = head.split_whitespace().collect();
    let offset: u64 = fields.first()?.parse().ok()?;

    // Word count is two-digit hexadecimal.
    let word_count = usize::from_str_radix(fields.get(3)?, 16).ok()?;
    if word_count == 0 {
        return None;
    }
    let mut words = Vec::with_capacity(word_count);
    for i in 0..word_count {
        words.push((*fields.get(4 + 2 * i)?).to_string());
    }

    // Pointer count is decimal; each pointer spans four fields.
    let pointer_base = 4 + 2 * word_count;
    let pointer_count: usize = fields.get(pointer_base)?.parse().ok()?;
    let mut hypernyms = Vec::new();
    for i in 0..pointer_count {
        let at = pointer_base + 1 + 4 * i;
        let symbol = *fields.get(at)?;
        let target: u64 = fields.get(at + 1)?.parse().ok()?;
        let target_pos = *fields.get(at + 2)?;
        if (symbol == "@" || symbol == "@i") && target_pos == "n" {
            hypernyms.push(target);
        }
    }

    Some((
        offset,
        SynsetRecord {
            words,
            hypernyms,
            gloss,
        },
    ))
}

fn apply_suffix_rules(forms: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for form in forms {
        for (suffix, replacement) in NOUN_SUFFIX_RULES {
            if let Some(stem) = form.strip_suffix(suffix) {
                out.push(format!("{stem}{replacement}"));
            }
        }
    }
    out
}

// =============================================================================
// Mock graph for tests
// =============================================================================

/// An in-memory lexical graph for testing pipeline stages without a
/// database on disk.
///
/// # Example
///
/// ```rust
/// use wikify::{LexicalGraph, MockGraph, Sense};
///
/// let graph = MockGraph::new()
///     .with_senses("Paris", &["paris.n.01"])
///     .with_path("paris.n.01", &["entity.n.01", "city.n.01", "paris.n.01"]);
///
/// assert_eq!(graph.senses_of("Paris").len(), 1);
/// assert_eq!(graph.hypernym_paths(&Sense::new("paris.n.01")).len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockGraph {
    senses: HashMap<String, Vec<Sense>>,
    paths: HashMap<String, Vec<Vec<Sense>>>,
}

impl MockGraph {
    /// Create an empty mock graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the senses of a word (stored against the normalized form).
    #[must_use]
    pub fn with_senses(mut self, word: &str, names: &[&str]) -> Self {
        let senses = names.iter().map(|n| Sense::new(*n)).collect();
        self.senses.insert(normalize(word), senses);
        self
    }

    /// Register one hypernym path for a sense, root-first, ending at the
    /// sense itself.
    #[must_use]
    pub fn with_path(mut self, sense: &str, path: &[&str]) -> Self {
        self.paths
            .entry(sense.to_string())
            .or_default()
            .push(path.iter().map(|n| Sense::new(*n)).collect());
        self
    }
}

impl LexicalGraph for MockGraph {
    fn senses_of(&self, word: &str) -> Vec<Sense> {
        self.senses.get(&normalize(word)).cloned().unwrap_or_default()
    }

    fn hypernym_paths(&self, sense: &Sense) -> Vec<Vec<Sense>> {
        self.paths.get(sense.name()).cloned().unwrap_or_default()
    }
}

fn normalize(word: &str) -> String {
    word.to_lowercase().replace(' ', "_")
}
