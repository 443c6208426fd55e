//! # wikify
//!
//! Entity tagging and encyclopedia linking for tokenized corpora.
//!
//! Given a directory of tokenized-and-tagged files (`*.tok.off.pos`) and
//! their raw sentences (`*.raw`), the pipeline identifies noun tokens,
//! classifies them as named entities, disambiguates the remaining common
//! nouns against WordNet, maps them to coarse category codes, fetches a
//! Wikipedia link for each, and writes augmented `.ent` sibling files.
//!
//! ## Stages
//!
//! ```text
//! load corpus ─ extract nouns ─ chunk sentences ─ classify entities
//!      └─ disambiguate senses ─ resolve categories ─ link spans
//!           └─ fetch reference links ─ write .ent files
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wikify::{Pipeline, PipelineConfig};
//!
//! fn main() -> wikify::Result<()> {
//!     let config = PipelineConfig::new("corpus/", "wordnet/dict/");
//!     let annotations = Pipeline::from_config(config)?.run()?;
//!     for (form, code) in &annotations.tags {
//!         println!("{form}\t{code}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Capability Seams
//!
//! Every external capability is a trait with a shipped default and an
//! in-memory mock for tests:
//!
//! | Seam | Default | Mock |
//! |------|---------|------|
//! | [`Chunker`] | [`HeuristicChunker`] | [`MockChunker`] |
//! | [`EntityTagger`] | [`StanfordTagger`] / [`HeuristicTagger`] | [`MockTagger`] |
//! | [`LexicalGraph`] | [`WordNet`] | [`MockGraph`] |
//! | [`SenseOracle`] | [`Lesk`] | [`MockOracle`] |
//! | [`ReferenceService`] | [`WikipediaClient`] | [`MockReference`] |
//!
//! ```rust
//! use wikify::{MockChunker, MockGraph, MockOracle, MockReference, MockTagger};
//! use wikify::{Pipeline, PipelineConfig};
//!
//! let pipeline = Pipeline::builder(PipelineConfig::new("/no/such/corpus", "/unused"))
//!     .chunker(MockChunker::new())
//!     .tagger(MockTagger::new())
//!     .graph(MockGraph::new())
//!     .oracle(MockOracle::new())
//!     .reference(MockReference::new())
//!     .build()
//!     .unwrap();
//!
//! // A missing corpus root is an empty corpus, not an error.
//! let annotations = pipeline.run().unwrap();
//! assert!(annotations.tags.is_empty());
//! ```
//!
//! ## Error Posture
//!
//! Per-item misses never abort: a malformed input line, a noun the oracle
//! abstains on, or a title without a page simply leave no tag or link
//! behind. Infrastructure failures (unreadable WordNet files, a tagger that
//! cannot spawn, an unreachable reference service) propagate as [`Error`].

pub mod category;
pub mod chunk;
pub mod config;
pub mod corpus;
pub mod error;
pub mod lexicon;
pub mod pipeline;
pub mod tagger;
pub mod wiki;
pub mod writer;
pub mod wsd;

pub use category::{combine, resolve, CATEGORY_TABLE};
pub use chunk::{ChunkNode, Chunker, EntitySpans, HeuristicChunker, MockChunker};
pub use config::PipelineConfig;
pub use corpus::{Corpus, CorpusLoader, TokenRecord};
pub use error::{Error, Result};
pub use lexicon::{LexicalGraph, MockGraph, Sense, WordNet};
pub use pipeline::{Annotations, Pipeline, PipelineBuilder};
pub use tagger::{
    auto, EntityLabel, EntityTagger, HeuristicTagger, MockTagger, StanfordTagger,
};
pub use wiki::{link, LinkError, MockReference, Page, ReferenceService, WikipediaClient};
pub use writer::write_annotated;
pub use wsd::{disambiguate, Lesk, MockOracle, SenseOracle, SenseResolution};
