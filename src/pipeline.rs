//! Pipeline orchestration.
//!
//! [`Pipeline`] wires the five capability seams together and runs the stages
//! in order: load the corpus, chunk the raw sentences, classify the nouns,
//! disambiguate the candidates, resolve categories, link spans, fetch
//! reference links, and write the `.ent` siblings. Everything is rebuilt
//! from scratch on each run; the only durable effect is the output files.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::category;
use crate::chunk::{Chunker, EntitySpans, HeuristicChunker};
use crate::config::PipelineConfig;
use crate::corpus::CorpusLoader;
use crate::lexicon::{LexicalGraph, WordNet};
use crate::tagger::{self, EntityTagger};
use crate::wiki::{self, ReferenceService, WikipediaClient};
use crate::writer;
use crate::wsd::{self, Lesk, SenseOracle};
use crate::Result;

/// Everything one run produced.
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    /// Surface form → 3-character category code.
    pub tags: BTreeMap<String, String>,
    /// Surface form → reference page URL.
    pub links: BTreeMap<String, String>,
    /// The `.ent` files written, in corpus order.
    pub outputs: Vec<PathBuf>,
}

/// The batch annotation pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    chunker: Box<dyn Chunker>,
    tagger: Box<dyn EntityTagger>,
    graph: Arc<dyn LexicalGraph>,
    oracle: Box<dyn SenseOracle>,
    reference: Box<dyn ReferenceService>,
}

impl Pipeline {
    /// Build a pipeline with the default capability implementations: the
    /// heuristic chunker, [`tagger::auto`] selection, the WordNet database
    /// under the configured directory with Lesk disambiguation over it, and
    /// the Wikipedia client.
    pub fn from_config(config: PipelineConfig) -> Result<Pipeline> {
        Pipeline::builder(config).build()
    }

    /// Start building a pipeline, overriding capabilities as needed.
    #[must_use]
    pub fn builder(config: PipelineConfig) -> PipelineBuilder {
        PipelineBuilder {
            config,
            chunker: None,
            tagger: None,
            graph: None,
            oracle: None,
            reference: None,
        }
    }

    /// Run every stage and write the `.ent` files.
    pub fn run(&self) -> Result<Annotations> {
        let corpus = CorpusLoader::new(&self.config.root_dir).load();
        let nouns = corpus.nouns();

        let spans = EntitySpans::collect(self.chunker.as_ref(), &corpus.sentences);

        let tagged = self.tagger.tag(&nouns)?;
        let candidates: Vec<String> = tagged
            .iter()
            .filter(|(_, label)| label.needs_disambiguation())
            .map(|(form, _)| form.clone())
            .collect();
        let trusted: Vec<_> = tagged
            .into_iter()
            .filter(|(_, label)| label.is_trusted())
            .collect();

        let context = corpus.context();
        let resolutions =
            wsd::disambiguate(self.graph.as_ref(), self.oracle.as_ref(), &context, &candidates);

        let tags = category::resolve(&trusted, resolutions, self.graph.as_ref());
        let combined = category::combine(&tags, &spans);
        let links = wiki::link(self.reference.as_ref(), &tags, &combined)?;

        let outputs = writer::write_annotated(&corpus.token_files, &tags, &links)?;

        Ok(Annotations {
            tags,
            links,
            outputs,
        })
    }
}

/// Builder over the pipeline's capability seams.
///
/// Any seam left unset gets its default implementation at [`build`] time;
/// the WordNet database is only loaded when the lexical graph or the sense
/// oracle still need it.
///
/// [`build`]: PipelineBuilder::build
pub struct PipelineBuilder {
    config: PipelineConfig,
    chunker: Option<Box<dyn Chunker>>,
    tagger: Option<Box<dyn EntityTagger>>,
    graph: Option<Arc<dyn LexicalGraph>>,
    oracle: Option<Box<dyn SenseOracle>>,
    reference: Option<Box<dyn ReferenceService>>,
}

impl PipelineBuilder {
    #[must_use]
    pub fn chunker(mut self, chunker: impl Chunker + 'static) -> Self {
        self.chunker = Some(Box::new(chunker));
        self
    }

    #[must_use]
    pub fn tagger(mut self, tagger: impl EntityTagger + 'static) -> Self {
        self.tagger = Some(Box::new(tagger));
        self
    }

    #[must_use]
    pub fn graph(mut self, graph: impl LexicalGraph + 'static) -> Self {
        self.graph = Some(Arc::new(graph));
        self
    }

    #[must_use]
    pub fn oracle(mut self, oracle: impl SenseOracle + 'static) -> Self {
        self.oracle = Some(Box::new(oracle));
        self
    }

    #[must_use]
    pub fn reference(mut self, reference: impl ReferenceService + 'static) -> Self {
        self.reference = Some(Box::new(reference));
        self
    }

    /// Fill the remaining seams with defaults and assemble the pipeline.
    pub fn build(self) -> Result<Pipeline> {
        let chunker = self
            .chunker
            .unwrap_or_else(|| Box::new(HeuristicChunker::new()));
        let tagger = match self.tagger {
            Some(tagger) => tagger,
            None => tagger::auto(&self.config),
        };
        let (graph, oracle) = match (self.graph, self.oracle) {
            (Some(graph), Some(oracle)) => (graph, oracle),
            (graph, oracle) => {
                let wordnet = Arc::new(WordNet::load(&self.config.wordnet_dir)?);
                let graph: Arc<dyn LexicalGraph> = match graph {
                    Some(graph) => graph,
                    None => wordnet.clone(),
                };
                let oracle: Box<dyn SenseOracle> = match oracle {
                    Some(oracle) => oracle,
                    None => Box::new(Lesk::new(wordnet)),
                };
                (graph, oracle)
            }
        };
        let reference = self
            .reference
            .unwrap_or_else(|| Box::new(WikipediaClient::new()));

        Ok(Pipeline {
            config: self.config,
            chunker,
            tagger,
            graph,
            oracle,
            reference,
        })
    }
}
