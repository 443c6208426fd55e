//! Reference-encyclopedia lookup and the link stage.
//!
//! [`ReferenceService`] is the seam: resolve a title to a page, or fail with
//! a distinguishable outcome. [`WikipediaClient`] is the default
//! implementation over the MediaWiki action API.
//!
//! The policy in [`link`] is best-effort per item, strict on infrastructure:
//! a missing page or an exhausted disambiguation retry just leaves the noun
//! unlinked, while a transport-level failure aborts the whole run. Missing a
//! link is acceptable; a half-broken service silently producing an
//! unannotated corpus is not.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::{Error, Result};

/// A resolved encyclopedia page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Canonical title after redirects.
    pub title: String,
    /// Plain-text page content.
    pub content: String,
    /// Canonical page URL.
    pub url: String,
}

/// Why a title failed to resolve.
#[derive(Debug, Clone, Error)]
pub enum LinkError {
    /// The title names a disambiguation page; the alternatives are its
    /// outgoing article titles, service order.
    #[error("ambiguous title ({} alternatives)", .0.len())]
    Ambiguous(Vec<String>),

    /// No page with this title.
    #[error("page not found")]
    NotFound,

    /// Transport, HTTP, or decode failure; the service itself is suspect.
    #[error("transient failure: {0}")]
    Transient(String),
}

/// A reference-encyclopedia lookup service.
pub trait ReferenceService {
    /// Resolve `title` to a page.
    fn page(&self, title: &str) -> std::result::Result<Page, LinkError>;
}

/// Resolve a link for every tagged surface form.
///
/// Forms inside a multi-word span (per `combined`) are queried by the full
/// span text, and the URL is kept only when the page content contains that
/// span verbatim, guarding against wrong-page hits on generic titles. Other
/// forms are queried directly. An ambiguous title is retried once with the
/// first suggested alternative; the retry's success is stored without the
/// containment guard since the queried title is the alternative, not the
/// span. `Transient` failures propagate, including during the retry.
pub fn link(
    service: &dyn ReferenceService,
    tags: &BTreeMap<String, String>,
    combined: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>> {
    let mut links = BTreeMap::new();
    for form in tags.keys() {
        let url = match combined.get(form) {
            Some(span) => match service.page(span) {
                Ok(page) if page.content.contains(span.as_str()) => Some(page.url),
                Ok(_) => {
                    log::debug!("dropping link for {form:?}: page does not mention {span:?}");
                    None
                }
                Err(e) => retry_or_drop(service, form, e)?,
            },
            None => match service.page(form) {
                Ok(page) => Some(page.url),
                Err(e) => retry_or_drop(service, form, e)?,
            },
        };
        if let Some(url) = url {
            links.insert(form.clone(), url);
        }
    }
    log::info!("linked {} of {} tagged forms", links.len(), tags.len());
    Ok(links)
}

/// Handle a failed lookup: retry an ambiguous title once, drop a missing
/// page, propagate anything transient.
fn retry_or_drop(
    service: &dyn ReferenceService,
    form: &str,
    error: LinkError,
) -> Result<Option<String>> {
    match error {
        LinkError::NotFound => Ok(None),
        LinkError::Transient(msg) => Err(Error::reference(msg)),
        LinkError::Ambiguous(alternatives) => {
            let Some(first) = alternatives.first() else {
                return Ok(None);
            };
            log::debug!("ambiguous title for {form:?}, retrying with {first:?}");
            match service.page(first) {
                Ok(page) => Ok(Some(page.url)),
                Err(LinkError::Transient(msg)) => Err(Error::reference(msg)),
                Err(_) => Ok(None),
            }
        }
    }
}

// =============================================================================
// MediaWiki client
// =============================================================================

const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";
const USER_AGENT: &str = concat!(
    "wikify/",
    env!("CARGO_PKG_VERSION"),
    " (corpus entity linker)"
);

/// MediaWiki action API client over a blocking agent.
///
/// One `action=query` request fetches URL, plain-text extract, and page
/// properties, following redirects. A `disambiguation` page property turns
/// into [`LinkError::Ambiguous`] with the page's main-namespace links as
/// the alternatives. Missing and invalid titles are [`LinkError::NotFound`];
/// a top-level API error object is [`LinkError::Transient`].
pub struct WikipediaClient {
    agent: ureq::Agent,
    endpoint: String,
}

impl WikipediaClient {
    /// Client against the English Wikipedia.
    #[must_use]
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Client against an arbitrary MediaWiki API endpoint.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            endpoint: endpoint.into(),
        }
    }

    fn query(&self, pairs: &[(&str, &str)]) -> std::result::Result<QueryBody, LinkError> {
        let mut request = self
            .agent
            .get(&self.endpoint)
            .query("action", "query")
            .query("format", "json")
            .query("formatversion", "2");
        for (key, value) in pairs {
            request = request.query(key, value);
        }
        let response = request
            .call()
            .map_err(|e| LinkError::Transient(e.to_string()))?;
        let response: QueryResponse = response
            .into_json()
            .map_err(|e| LinkError::Transient(format!("bad API response: {e}")))?;
        into_body(response)
    }

    /// The main-namespace link titles of a page, API order.
    fn alternatives(&self, title: &str) -> std::result::Result<Vec<String>, LinkError> {
        let body = self.query(&[
            ("prop", "links"),
            ("plnamespace", "0"),
            ("pllimit", "50"),
            ("titles", title),
            ("redirects", "1"),
        ])?;
        let links = body
            .pages
            .into_iter()
            .next()
            .and_then(|page| page.links)
            .unwrap_or_default();
        Ok(links.into_iter().map(|l| l.title).collect())
    }
}

impl Default for WikipediaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceService for WikipediaClient {
    fn page(&self, title: &str) -> std::result::Result<Page, LinkError> {
        let body = self.query(&[
            ("prop", "info|extracts|pageprops"),
            ("inprop", "url"),
            ("explaintext", "1"),
            ("titles", title),
            ("redirects", "1"),
        ])?;
        match interpret_page(body)? {
            PageLookup::Resolved(page) => Ok(page),
            PageLookup::Disambiguation(title) => {
                Err(LinkError::Ambiguous(self.alternatives(&title)?))
            }
        }
    }
}

/// Outcome of the main page query, before any disambiguation follow-up.
enum PageLookup {
    Resolved(Page),
    /// Canonical title of a disambiguation page.
    Disambiguation(String),
}

/// Surface an API-level error object as a transient failure; otherwise the
/// query body.
fn into_body(response: QueryResponse) -> std::result::Result<QueryBody, LinkError> {
    match response.error {
        Some(error) => Err(LinkError::Transient(format!(
            "API error {}: {}",
            error.code, error.info
        ))),
        None => Ok(response.query),
    }
}

/// Interpret the first page entry of a query body.
///
/// A missing page and an invalid title (a query token the API cannot treat
/// as a title at all) are both per-item absences, not failures; a resolved
/// entry without a URL is a malformed response and therefore transient.
fn interpret_page(body: QueryBody) -> std::result::Result<PageLookup, LinkError> {
    let Some(page) = body.pages.into_iter().next() else {
        return Err(LinkError::NotFound);
    };
    if page.missing || page.invalid {
        return Err(LinkError::NotFound);
    }
    if page
        .pageprops
        .as_ref()
        .is_some_and(|props| props.disambiguation.is_some())
    {
        return Ok(PageLookup::Disambiguation(page.title));
    }
    let url = page
        .fullurl
        .ok_or_else(|| LinkError::Transient(format!("no URL for page {:?}", page.title)))?;
    Ok(PageLookup::Resolved(Page {
        title: page.title,
        content: page.extract.unwrap_or_default(),
        url,
    }))
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: QueryBody,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<PageBody>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct PageBody {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    fullurl: Option<String>,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    pageprops: Option<PageProps>,
    #[serde(default)]
    links: Option<Vec<PageLink>>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(default)]
    disambiguation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageLink {
    title: String,
}

// =============================================================================
// Mock service for tests
// =============================================================================

/// A reference service with canned outcomes per title; unregistered titles
/// are not found.
#[derive(Debug, Clone, Default)]
pub struct MockReference {
    outcomes: std::collections::HashMap<String, MockOutcome>,
}

#[derive(Debug, Clone)]
enum MockOutcome {
    Page(Page),
    Ambiguous(Vec<String>),
    Transient(String),
}

impl MockReference {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `title` to a page with the given content and URL.
    #[must_use]
    pub fn with_page(mut self, title: &str, content: &str, url: &str) -> Self {
        self.outcomes.insert(
            title.to_string(),
            MockOutcome::Page(Page {
                title: title.to_string(),
                content: content.to_string(),
                url: url.to_string(),
            }),
        );
        self
    }

    /// Make `title` a disambiguation with the given alternatives.
    #[must_use]
    pub fn with_ambiguous(mut self, title: &str, alternatives: &[&str]) -> Self {
        self.outcomes.insert(
            title.to_string(),
            MockOutcome::Ambiguous(alternatives.iter().map(ToString::to_string).collect()),
        );
        self
    }

    /// Make `title` fail with a transient error.
    #[must_use]
    pub fn with_transient(mut self, title: &str) -> Self {
        self.outcomes.insert(
            title.to_string(),
            MockOutcome::Transient("mock outage".to_string()),
        );
        self
    }
}

impl ReferenceService for MockReference {
    fn page(&self, title: &str) -> std::result::Result<Page, LinkError> {
        match self.outcomes.get(title) {
            Some(MockOutcome::Page(page)) => Ok(page.clone()),
            Some(MockOutcome::Ambiguous(alts)) => Err(LinkError::Ambiguous(alts.clone())),
            Some(MockOutcome::Transient(msg)) => Err(LinkError::Transient(msg.clone())),
            None => Err(LinkError::NotFound),
        }
    }
}
