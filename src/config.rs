//! Pipeline configuration.
//!
//! Everything the original batch job hardcoded lives here instead: the
//! corpus location, the lexical database directory, and the paths to the
//! external tagger's model and jar. The CLI builds one of these and hands it
//! to the loader and tagger constructors.

use std::path::PathBuf;

/// Configuration for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Root directory searched recursively for `*.tok.off.pos` and `*.raw`
    /// files.
    pub root_dir: PathBuf,
    /// Directory holding the WordNet database files (`index.noun`,
    /// `data.noun`, optionally `noun.exc`).
    pub wordnet_dir: PathBuf,
    /// Serialized CRF classifier for the external entity tagger.
    pub ner_model_path: Option<PathBuf>,
    /// Jar providing the external entity tagger.
    pub ner_jar_path: Option<PathBuf>,
}

impl PipelineConfig {
    /// Create a configuration rooted at `root_dir` with the WordNet database
    /// under `wordnet_dir`, and no external tagger configured.
    #[must_use]
    pub fn new(root_dir: impl Into<PathBuf>, wordnet_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            wordnet_dir: wordnet_dir.into(),
            ner_model_path: None,
            ner_jar_path: None,
        }
    }

    /// Configure the external entity tagger.
    #[must_use]
    pub fn with_tagger(mut self, model: impl Into<PathBuf>, jar: impl Into<PathBuf>) -> Self {
        self.ner_model_path = Some(model.into());
        self.ner_jar_path = Some(jar.into());
        self
    }
}
