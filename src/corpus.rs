//! Corpus discovery and loading.
//!
//! A corpus is a directory tree containing tokenized-and-tagged files
//! (`*.tok.off.pos`, one token per line, five whitespace-separated fields)
//! and raw sentence files (`*.raw`, one sentence per line). Loading is a
//! lenient batch operation: malformed lines are skipped, unreadable files
//! are skipped, and a missing root yields an empty corpus rather than an
//! error. Discovery order is lexicographic over full paths so repeated runs
//! see the same corpus in the same order.

use std::fs;
use std::path::{Path, PathBuf};

/// One parsed line of a tokenized file.
///
/// The five fields are token index, character start offset, character end
/// offset, surface form, and part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    /// Position of the token within its sentence.
    pub index: usize,
    /// Character offset of the first character.
    pub start: usize,
    /// Character offset one past the last character.
    pub end: usize,
    /// Surface form as it appears in the text.
    pub form: String,
    /// Part-of-speech tag (Penn Treebank tag set).
    pub pos: String,
}

impl TokenRecord {
    /// Parse one line of a tokenized file.
    ///
    /// Returns `None` for any line that does not have exactly five
    /// whitespace-separated fields with numeric index and offsets. Such
    /// lines are not part of the token stream (the writer still copies them
    /// through by re-reading the raw file).
    #[must_use]
    pub fn parse(line: &str) -> Option<TokenRecord> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 5 {
            return None;
        }
        Some(TokenRecord {
            index: fields[0].parse().ok()?,
            start: fields[1].parse().ok()?,
            end: fields[2].parse().ok()?,
            form: fields[3].to_string(),
            pos: fields[4].to_string(),
        })
    }

    /// Whether this token is a noun the pipeline cares about.
    ///
    /// Exactly `NN`, `NNS`, and `NNP`; plural proper nouns (`NNPS`) are not
    /// included.
    #[must_use]
    pub fn is_noun(&self) -> bool {
        matches!(self.pos.as_str(), "NN" | "NNS" | "NNP")
    }
}

/// A loaded corpus: token records, raw sentences, and the sorted list of
/// token files they came from.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    /// All well-formed token records, in file-then-line order.
    pub records: Vec<TokenRecord>,
    /// All non-empty sentences, trimmed and with trailing periods stripped.
    pub sentences: Vec<String>,
    /// The token files that produced `records`, lexicographically sorted.
    /// The writer re-reads these to produce the `.ent` siblings.
    pub token_files: Vec<PathBuf>,
}

impl Corpus {
    /// Surface forms of all noun tokens, in corpus order. Duplicates are
    /// preserved.
    #[must_use]
    pub fn nouns(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| r.is_noun())
            .map(|r| r.form.clone())
            .collect()
    }

    /// The whole corpus text as a single disambiguation context string.
    #[must_use]
    pub fn context(&self) -> String {
        self.sentences.join(" ")
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.sentences.is_empty()
    }
}

/// Discovers and loads a corpus from a root directory.
pub struct CorpusLoader {
    root: PathBuf,
}

impl CorpusLoader {
    /// Create a loader rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load the corpus under the root.
    ///
    /// A missing or unreadable root yields an empty corpus; per-file read
    /// failures and malformed lines are skipped with a log entry.
    #[must_use]
    pub fn load(&self) -> Corpus {
        let token_files = find_files(&self.root, "*.tok.off.pos");
        let raw_files = find_files(&self.root, "*.raw");

        let mut records = Vec::new();
        for path in &token_files {
            let Some(text) = read_lenient(path) else {
                continue;
            };
            for line in text.lines() {
                match TokenRecord::parse(line) {
                    Some(record) => records.push(record),
                    None => {
                        if !line.trim().is_empty() {
                            log::debug!("skipping malformed token line in {}: {line:?}", path.display());
                        }
                    }
                }
            }
        }

        let mut sentences = Vec::new();
        for path in &raw_files {
            let Some(text) = read_lenient(path) else {
                continue;
            };
            sentences.extend(text.lines().filter_map(normalize_sentence));
        }

        log::info!(
            "loaded {} token records and {} sentences from {}",
            records.len(),
            sentences.len(),
            self.root.display()
        );

        Corpus {
            records,
            sentences,
            token_files,
        }
    }
}

/// Trim a raw line and strip trailing periods; `None` for blank results.
fn normalize_sentence(line: &str) -> Option<String> {
    let sentence = line.trim().trim_end_matches('.');
    if sentence.is_empty() {
        None
    } else {
        Some(sentence.to_string())
    }
}

/// All files under `root` matching `pattern`, lexicographically sorted.
fn find_files(root: &Path, pattern: &str) -> Vec<PathBuf> {
    let full = root.join("**").join(pattern);
    let Some(full) = full.to_str() else {
        log::warn!("corpus root is not valid UTF-8: {}", root.display());
        return Vec::new();
    };
    let paths = match glob::glob(full) {
        Ok(paths) => paths,
        Err(e) => {
            log::warn!("bad corpus glob {full}: {e}");
            return Vec::new();
        }
    };
    let mut files: Vec<PathBuf> = paths.filter_map(std::result::Result::ok).collect();
    files.sort();
    files
}

fn read_lenient(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            log::warn!("skipping unreadable file {}: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_line() {
        let record = TokenRecord::parse("0 0 10 Paris NNP").unwrap();
        assert_eq!(record.index, 0);
        assert_eq!(record.start, 0);
        assert_eq!(record.end, 10);
        assert_eq!(record.form, "Paris");
        assert_eq!(record.pos, "NNP");
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        assert!(TokenRecord::parse("").is_none());
        assert!(TokenRecord::parse("0 0 10 Paris").is_none());
        assert!(TokenRecord::parse("0 0 10 Paris NNP extra").is_none());
    }

    #[test]
    fn test_parse_rejects_non_numeric_offsets() {
        assert!(TokenRecord::parse("a b c Paris NNP").is_none());
    }

    #[test]
    fn test_parse_handles_arbitrary_whitespace() {
        let record = TokenRecord::parse("  3\t14   19\tRhine\tNNP ").unwrap();
        assert_eq!(record.form, "Rhine");
    }

    #[test]
    fn test_noun_filter_is_exact() {
        for (pos, expected) in [
            ("NN", true),
            ("NNS", true),
            ("NNP", true),
            ("NNPS", false),
            ("VBZ", false),
            ("DT", false),
        ] {
            let record = TokenRecord::parse(&format!("0 0 1 x {pos}")).unwrap();
            assert_eq!(record.is_noun(), expected, "pos {pos}");
        }
    }

    #[test]
    fn test_normalize_sentence() {
        assert_eq!(normalize_sentence("  Paris is a city.  "), Some("Paris is a city".into()));
        assert_eq!(normalize_sentence("No final stop"), Some("No final stop".into()));
        assert_eq!(normalize_sentence("...."), None);
        assert_eq!(normalize_sentence("   "), None);
    }

    #[test]
    fn test_nouns_preserve_order_and_duplicates() {
        let corpus = Corpus {
            records: vec![
                TokenRecord::parse("0 0 5 Paris NNP").unwrap(),
                TokenRecord::parse("1 6 8 is VBZ").unwrap(),
                TokenRecord::parse("2 9 13 city NN").unwrap(),
                TokenRecord::parse("3 14 19 Paris NNP").unwrap(),
            ],
            sentences: Vec::new(),
            token_files: Vec::new(),
        };
        assert_eq!(corpus.nouns(), vec!["Paris", "city", "Paris"]);
    }

    #[test]
    fn test_missing_root_yields_empty_corpus() {
        let corpus = CorpusLoader::new("/definitely/not/a/real/dir").load();
        assert!(corpus.is_empty());
        assert!(corpus.token_files.is_empty());
    }
}
