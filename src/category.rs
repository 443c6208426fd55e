//! Coarse entity categorization.
//!
//! Two writers populate the category-tag map. Person and organization nouns
//! take the first three characters of their recognizer label. Disambiguated
//! common nouns take a code from the fixed ancestor table: every hypernym
//! path of the resolved sense is walked root-first, and every ancestor whose
//! bare name is in the table overwrites the noun's tag. That fold is
//! last-match-wins in path-then-position order, a deterministic tie-break
//! rather than a best-match selection; since paths end at the queried sense,
//! the surviving tag comes from the most specific matching ancestor of the
//! final path.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;

use crate::chunk::EntitySpans;
use crate::lexicon::LexicalGraph;
use crate::tagger::EntityLabel;
use crate::wsd::SenseResolution;

/// Ancestor bare name → 3-character category code.
pub static CATEGORY_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("country", "COU"),
        ("district", "COU"),
        ("city", "CIT"),
        ("town", "CIT"),
        ("geological_formation", "NAT"),
        ("animal", "ANI"),
        ("sport", "SPO"),
        ("entertainment", "ENT"),
        ("body_of_water", "NAT"),
        ("desert", "NAT"),
    ])
});

/// Build the category-tag map.
///
/// `recognized` is the trusted person/organization view of the tagger's
/// output; `resolutions` the disambiguation outcomes for the remaining
/// candidates. A hypernym-derived code can overwrite a recognizer-derived
/// one for the same surface form.
#[must_use]
pub fn resolve(
    recognized: &[(String, EntityLabel)],
    resolutions: Vec<(String, SenseResolution)>,
    graph: &dyn LexicalGraph,
) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();

    for (form, label) in recognized {
        if label.is_trusted() {
            let code = &label.as_str()[..3];
            tags.insert(form.clone(), code.to_string());
        }
    }

    for (form, resolution) in resolutions {
        let Some(sense) = resolution.normalize() else {
            continue;
        };
        for path in graph.hypernym_paths(&sense) {
            for ancestor in &path {
                if let Some(code) = CATEGORY_TABLE.get(ancestor.bare_name()) {
                    tags.insert(form.clone(), (*code).to_string());
                }
            }
        }
    }

    log::info!("categorized {} surface forms", tags.len());
    tags
}

/// Map each tagged surface form inside a multi-word span to the span's full
/// text, so the reference lookup can search for "George Washington" instead
/// of just "Washington".
#[must_use]
pub fn combine(
    tags: &BTreeMap<String, String>,
    spans: &EntitySpans,
) -> BTreeMap<String, String> {
    tags.keys()
        .filter_map(|form| {
            spans
                .span_for(form)
                .map(|span| (form.clone(), span.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::MockChunker;
    use crate::lexicon::{MockGraph, Sense};

    #[test]
    fn test_recognizer_labels_truncate_to_three_chars() {
        let recognized = vec![
            ("Smith".to_string(), EntityLabel::Person),
            ("Acme".to_string(), EntityLabel::Organization),
        ];
        let tags = resolve(&recognized, Vec::new(), &MockGraph::new());
        assert_eq!(tags["Smith"], "PER");
        assert_eq!(tags["Acme"], "ORG");
    }

    #[test]
    fn test_untrusted_labels_are_ignored() {
        let recognized = vec![
            ("Paris".to_string(), EntityLabel::Location),
            ("city".to_string(), EntityLabel::None),
        ];
        assert!(resolve(&recognized, Vec::new(), &MockGraph::new()).is_empty());
    }

    #[test]
    fn test_hypernym_ancestor_maps_through_table() {
        let graph = MockGraph::new().with_path(
            "paris.n.01",
            &["entity.n.01", "district.n.01", "city.n.01", "paris.n.01"],
        );
        let resolutions = vec![(
            "Paris".to_string(),
            SenseResolution::Best(Sense::new("paris.n.01")),
        )];
        let tags = resolve(&[], resolutions, &graph);
        // district (COU) matches first, city (CIT) later; last match wins.
        assert_eq!(tags["Paris"], "CIT");
    }

    #[test]
    fn test_last_path_wins_across_paths() {
        let graph = MockGraph::new()
            .with_path("delta.n.01", &["entity.n.01", "city.n.01", "delta.n.01"])
            .with_path("delta.n.01", &["entity.n.01", "body_of_water.n.01", "delta.n.01"]);
        let resolutions = vec![(
            "delta".to_string(),
            SenseResolution::Best(Sense::new("delta.n.01")),
        )];
        let tags = resolve(&[], resolutions, &graph);
        assert_eq!(tags["delta"], "NAT");
    }

    #[test]
    fn test_hypernym_code_overwrites_recognizer_code() {
        let graph = MockGraph::new().with_path(
            "jordan.n.01",
            &["entity.n.01", "country.n.01", "jordan.n.01"],
        );
        let recognized = vec![("Jordan".to_string(), EntityLabel::Person)];
        let resolutions = vec![(
            "Jordan".to_string(),
            SenseResolution::Best(Sense::new("jordan.n.01")),
        )];
        let tags = resolve(&recognized, resolutions, &graph);
        assert_eq!(tags["Jordan"], "COU");
    }

    #[test]
    fn test_sense_list_is_normalized_to_first() {
        let graph = MockGraph::new().with_path(
            "paris.n.01",
            &["entity.n.01", "city.n.01", "paris.n.01"],
        );
        let resolutions = vec![(
            "Paris".to_string(),
            SenseResolution::AllSenses(vec![Sense::new("paris.n.01"), Sense::new("paris.n.02")]),
        )];
        let tags = resolve(&[], resolutions, &graph);
        assert_eq!(tags["Paris"], "CIT");
    }

    #[test]
    fn test_unmatched_ancestors_leave_no_tag() {
        let graph = MockGraph::new().with_path(
            "dog.n.01",
            &["entity.n.01", "organism.n.01", "dog.n.01"],
        );
        let resolutions = vec![(
            "dog".to_string(),
            SenseResolution::Best(Sense::new("dog.n.01")),
        )];
        assert!(resolve(&[], resolutions, &graph).is_empty());
    }

    #[test]
    fn test_combine_maps_members_to_span_text() {
        let chunker = MockChunker::new().with_span(&["George", "Washington"]);
        let sentences = vec!["George Washington".to_string()];
        let spans = EntitySpans::collect(&chunker, &sentences);

        let mut tags = BTreeMap::new();
        tags.insert("Washington".to_string(), "PER".to_string());
        tags.insert("Paris".to_string(), "CIT".to_string());

        let combined = combine(&tags, &spans);
        assert_eq!(combined.get("Washington").map(String::as_str), Some("George Washington"));
        assert!(!combined.contains_key("Paris"));
    }
}
