//! Named-entity chunking over raw sentences.
//!
//! The entity tagger works token-by-token over the noun list and never sees
//! multi-word groupings like "George Washington". This stage recovers them
//! from the raw sentences independently: [`Chunker`] turns a sentence into a
//! sequence of nodes, and [`EntitySpans`] collects the multi-word named spans
//! into a lookup from each constituent word to the full span text.
//!
//! [`HeuristicChunker`] is the default implementation: an offset-preserving
//! tokenizer plus capitalized-run grouping, allowing `of`/`the`/`and` as
//! connectors inside a run (so "Bank of America" stays one span).

/// One node of a chunked sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkNode {
    /// A named-entity span: label plus constituent words in sentence order.
    Span {
        /// Chunker-assigned label; the pipeline only uses the span shape.
        label: String,
        /// Constituent words in original order.
        words: Vec<String>,
    },
    /// A word outside any named span.
    Word(String),
}

/// Groups a sentence into named spans and loose words.
pub trait Chunker {
    /// Chunk one sentence. Implementations tokenize internally.
    fn chunk(&self, sentence: &str) -> Vec<ChunkNode>;
}

/// Lookup from a word to the multi-word entity span containing it.
///
/// Keyed by the tuple of constituent words; insertion-ordered, and a
/// re-discovered key keeps its original position, as re-inserting into the
/// span dictionary this replaces would. When several spans contain the same
/// word, [`EntitySpans::span_for`] returns the last one in that order.
#[derive(Debug, Clone, Default)]
pub struct EntitySpans {
    spans: Vec<(Vec<String>, String)>,
}

impl EntitySpans {
    /// Chunk every sentence and keep the spans with at least two words.
    #[must_use]
    pub fn collect(chunker: &dyn Chunker, sentences: &[String]) -> Self {
        let mut spans: Vec<(Vec<String>, String)> = Vec::new();
        for sentence in sentences {
            for node in chunker.chunk(sentence) {
                let ChunkNode::Span { words, .. } = node else {
                    continue;
                };
                if words.len() < 2 {
                    continue;
                }
                // Re-discovered keys keep their original position.
                if spans.iter().any(|(key, _)| *key == words) {
                    continue;
                }
                let joined = words.join(" ");
                spans.push((words, joined));
            }
        }
        log::debug!("collected {} multi-word entity spans", spans.len());
        Self { spans }
    }

    /// The full text of the last span containing `word`, if any.
    #[must_use]
    pub fn span_for(&self, word: &str) -> Option<&str> {
        self.spans
            .iter()
            .filter(|(key, _)| key.iter().any(|w| w == word))
            .map(|(_, joined)| joined.as_str())
            .last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

// =============================================================================
// Heuristic chunker
// =============================================================================

/// Connectors allowed inside a span when the following word is capitalized.
const SPAN_CONNECTORS: &[&str] = &["of", "the", "and"];

/// Capitalized words that never start or extend a span on their own.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of",
    "with", "by", "from", "as", "is", "was", "are", "were", "be", "been",
    "he", "she", "it", "they", "we", "you", "i", "this", "that", "these",
    "those", "there", "here", "when", "where", "what", "which", "who", "how",
];

/// Capitalized-run chunker.
///
/// Tokenizes with a simple offset-preserving tokenizer, then groups maximal
/// runs of capitalized non-stop words into spans, letting lowercase
/// connectors join two capitalized parts.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicChunker;

impl HeuristicChunker {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Chunker for HeuristicChunker {
    fn chunk(&self, sentence: &str) -> Vec<ChunkNode> {
        let words = tokenize(sentence);
        let mut nodes = Vec::new();
        let mut run: Vec<String> = Vec::new();

        let mut i = 0;
        while i < words.len() {
            let word = &words[i];
            let lower = word.to_lowercase();
            let capitalized = word.chars().next().is_some_and(char::is_uppercase);

            if capitalized && !STOP_WORDS.contains(&lower.as_str()) {
                run.push(word.clone());
            } else if !run.is_empty()
                && SPAN_CONNECTORS.contains(&lower.as_str())
                && words
                    .get(i + 1)
                    .is_some_and(|next| next.chars().next().is_some_and(char::is_uppercase))
            {
                run.push(word.clone());
            } else {
                flush(&mut run, &mut nodes);
                nodes.push(ChunkNode::Word(word.clone()));
            }
            i += 1;
        }
        flush(&mut run, &mut nodes);
        nodes
    }
}

fn flush(run: &mut Vec<String>, nodes: &mut Vec<ChunkNode>) {
    if !run.is_empty() {
        nodes.push(ChunkNode::Span {
            label: "NE".to_string(),
            words: std::mem::take(run),
        });
    }
}

/// Word tokenizer keeping apostrophes and hyphens inside tokens.
fn tokenize(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() || c == '\'' || c == '-' {
            current.push(c);
        } else if !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

// =============================================================================
// Mock chunker for tests
// =============================================================================

/// A chunker returning pre-registered spans, for testing the span stages
/// without word-shape heuristics.
#[derive(Debug, Clone, Default)]
pub struct MockChunker {
    spans: Vec<Vec<String>>,
}

impl MockChunker {
    /// Create a chunker that finds no spans.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `words` as a span for every sentence that contains all of them.
    #[must_use]
    pub fn with_span(mut self, words: &[&str]) -> Self {
        self.spans.push(words.iter().map(ToString::to_string).collect());
        self
    }
}

impl Chunker for MockChunker {
    fn chunk(&self, sentence: &str) -> Vec<ChunkNode> {
        self.spans
            .iter()
            .filter(|words| words.iter().all(|w| sentence.contains(w.as_str())))
            .map(|words| ChunkNode::Span {
                label: "NE".to_string(),
                words: words.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans_of(sentence: &str) -> Vec<Vec<String>> {
        HeuristicChunker::new()
            .chunk(sentence)
            .into_iter()
            .filter_map(|node| match node {
                ChunkNode::Span { words, .. } => Some(words),
                ChunkNode::Word(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_tokenize_keeps_hyphens_and_apostrophes() {
        assert_eq!(
            tokenize("O'Brien's twenty-one, right?"),
            vec!["O'Brien's", "twenty-one", "right"]
        );
    }

    #[test]
    fn test_capitalized_run_becomes_one_span() {
        assert_eq!(
            spans_of("He met George Washington yesterday"),
            vec![vec!["George".to_string(), "Washington".into()]]
        );
    }

    #[test]
    fn test_connector_joins_capitalized_parts() {
        assert_eq!(
            spans_of("She works at Bank of America now"),
            vec![vec!["Bank".to_string(), "of".into(), "America".into()]]
        );
    }

    #[test]
    fn test_connector_without_following_capital_ends_span() {
        assert_eq!(
            spans_of("Paris of course is lovely"),
            vec![vec!["Paris".to_string()]]
        );
    }

    #[test]
    fn test_lowercase_sentence_has_no_spans() {
        assert!(spans_of("the quick brown fox").is_empty());
    }

    #[test]
    fn test_collect_keeps_only_multi_word_spans() {
        let chunker = HeuristicChunker::new();
        let sentences = vec!["Paris is near the Eiffel Tower".to_string()];
        let spans = EntitySpans::collect(&chunker, &sentences);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans.span_for("Eiffel"), Some("Eiffel Tower"));
        assert_eq!(spans.span_for("Tower"), Some("Eiffel Tower"));
        assert_eq!(spans.span_for("Paris"), None);
    }

    #[test]
    fn test_span_for_prefers_last_discovered() {
        let chunker = MockChunker::new()
            .with_span(&["Washington", "State"])
            .with_span(&["George", "Washington"]);
        let sentences = vec!["Washington State and George Washington".to_string()];
        let spans = EntitySpans::collect(&chunker, &sentences);
        assert_eq!(spans.span_for("Washington"), Some("George Washington"));
        assert_eq!(spans.span_for("State"), Some("Washington State"));
    }

    #[test]
    fn test_rediscovered_span_keeps_original_position() {
        let chunker = MockChunker::new()
            .with_span(&["Washington", "State"])
            .with_span(&["George", "Washington"]);
        let sentences = vec![
            "Washington State".to_string(),
            "George Washington".to_string(),
            "Washington State again".to_string(),
        ];
        let spans = EntitySpans::collect(&chunker, &sentences);
        assert_eq!(spans.len(), 2);
        // The third sentence re-discovers the first span; it does not move
        // behind the second, so the second still wins the shared word.
        assert_eq!(spans.span_for("Washington"), Some("George Washington"));
    }

    #[test]
    fn test_duplicate_span_is_stored_once() {
        let chunker = MockChunker::new().with_span(&["New", "York"]);
        let sentences = vec!["New York".to_string(), "New York again".to_string()];
        let spans = EntitySpans::collect(&chunker, &sentences);
        assert_eq!(spans.len(), 1);
    }
}
