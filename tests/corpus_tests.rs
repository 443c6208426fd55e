//! Corpus discovery and loading over real directory trees.

use std::fs;

use tempfile::TempDir;

use wikify::CorpusLoader;

#[test]
fn test_discovery_is_recursive_and_sorted() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("p16/d002")).unwrap();
    fs::create_dir_all(dir.path().join("p16/d001")).unwrap();
    fs::write(
        dir.path().join("p16/d002/en.tok.off.pos"),
        "0 0 4 Rome NNP\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("p16/d001/en.tok.off.pos"),
        "0 0 5 Paris NNP\n",
    )
    .unwrap();

    let corpus = CorpusLoader::new(dir.path()).load();
    assert_eq!(corpus.token_files.len(), 2);
    // Lexicographic path order, not creation order.
    assert!(corpus.token_files[0].ends_with("p16/d001/en.tok.off.pos"));
    assert!(corpus.token_files[1].ends_with("p16/d002/en.tok.off.pos"));
    let forms: Vec<&str> = corpus.records.iter().map(|r| r.form.as_str()).collect();
    assert_eq!(forms, vec!["Paris", "Rome"]);
}

#[test]
fn test_only_matching_extensions_are_picked_up() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("doc.tok.off.pos"), "0 0 5 Paris NNP\n").unwrap();
    fs::write(dir.path().join("doc.raw"), "Paris is a city.\n").unwrap();
    fs::write(dir.path().join("doc.tok"), "0 0 5 Ghost NNP\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "Not part of the corpus.\n").unwrap();

    let corpus = CorpusLoader::new(dir.path()).load();
    assert_eq!(corpus.token_files.len(), 1);
    assert_eq!(corpus.records.len(), 1);
    assert_eq!(corpus.sentences, vec!["Paris is a city"]);
}

#[test]
fn test_sentences_are_normalized_and_blanks_dropped() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("doc.raw"),
        "  First sentence.  \n\n....\nSecond sentence\n",
    )
    .unwrap();

    let corpus = CorpusLoader::new(dir.path()).load();
    assert_eq!(corpus.sentences, vec!["First sentence", "Second sentence"]);
    assert_eq!(corpus.context(), "First sentence Second sentence");
}

#[test]
fn test_malformed_token_lines_are_skipped() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("doc.tok.off.pos"),
        "0 0 5 Paris NNP\nshort line\n1 6 8 is VBZ extra\n2 9 13 city NN\n",
    )
    .unwrap();

    let corpus = CorpusLoader::new(dir.path()).load();
    let forms: Vec<&str> = corpus.records.iter().map(|r| r.form.as_str()).collect();
    assert_eq!(forms, vec!["Paris", "city"]);
}

#[test]
fn test_nouns_cross_file_order_follows_path_order() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("b.tok.off.pos"),
        "0 0 4 Rome NNP\n1 5 9 town NN\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("a.tok.off.pos"),
        "0 0 5 Paris NNP\n1 6 11 river NN\n2 12 14 at IN\n",
    )
    .unwrap();

    let corpus = CorpusLoader::new(dir.path()).load();
    assert_eq!(corpus.nouns(), vec!["Paris", "river", "Rome", "town"]);
}

#[test]
fn test_missing_root_yields_empty_corpus() {
    let corpus = CorpusLoader::new("/no/such/corpus/root").load();
    assert!(corpus.is_empty());
    assert!(corpus.nouns().is_empty());
    assert_eq!(corpus.context(), "");
}
