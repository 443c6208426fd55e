//! Augmented output files.
//!
//! The final stage re-reads each original token file and writes a sibling
//! with `.ent` appended to the name, one output line per input line. A
//! five-field line whose surface form (fourth field) carries a category tag
//! gets the tag appended, then the link when one was resolved. Matching is
//! by surface form only: every occurrence of a form receives the same tag.
//! Lines are rejoined with single spaces, so the copy is field-normalized
//! rather than byte-for-byte.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::Result;

/// Write the `.ent` sibling of every token file.
///
/// Returns the output paths, in input order. Files with zero matches still
/// get their copy. I/O failures here are infrastructure and abort the run.
pub fn write_annotated(
    token_files: &[PathBuf],
    tags: &BTreeMap<String, String>,
    links: &BTreeMap<String, String>,
) -> Result<Vec<PathBuf>> {
    let mut outputs = Vec::with_capacity(token_files.len());
    for path in token_files {
        let out_path = sibling_path(path);
        let text = fs::read_to_string(path)?;
        let mut out = BufWriter::new(File::create(&out_path)?);
        for line in text.lines() {
            writeln!(out, "{}", annotate_line(line, tags, links))?;
        }
        out.flush()?;
        log::debug!("wrote {}", out_path.display());
        outputs.push(out_path);
    }
    Ok(outputs)
}

/// `<input>.ent`, next to the input.
fn sibling_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".ent");
    PathBuf::from(name)
}

fn annotate_line(
    line: &str,
    tags: &BTreeMap<String, String>,
    links: &BTreeMap<String, String>,
) -> String {
    let mut fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() == 5 {
        let form = fields[3];
        if let Some(tag) = tags.get(form) {
            fields.push(tag);
        }
        if let Some(url) = links.get(form) {
            fields.push(url);
        }
    }
    fields.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maps() -> (BTreeMap<String, String>, BTreeMap<String, String>) {
        let mut tags = BTreeMap::new();
        tags.insert("Paris".to_string(), "CIT".to_string());
        tags.insert("Rhine".to_string(), "NAT".to_string());
        let mut links = BTreeMap::new();
        links.insert("Paris".to_string(), "https://en.wikipedia.org/wiki/Paris".to_string());
        (tags, links)
    }

    #[test]
    fn test_tag_and_link_appended_in_order() {
        let (tags, links) = maps();
        assert_eq!(
            annotate_line("0 0 10 Paris NNP", &tags, &links),
            "0 0 10 Paris NNP CIT https://en.wikipedia.org/wiki/Paris"
        );
    }

    #[test]
    fn test_tag_without_link() {
        let (tags, links) = maps();
        assert_eq!(
            annotate_line("3 14 19 Rhine NNP", &tags, &links),
            "3 14 19 Rhine NNP NAT"
        );
    }

    #[test]
    fn test_untagged_line_passes_through() {
        let (tags, links) = maps();
        assert_eq!(
            annotate_line("1 11 13 is VBZ", &tags, &links),
            "1 11 13 is VBZ"
        );
    }

    #[test]
    fn test_malformed_line_copied_without_appends() {
        let (tags, links) = maps();
        // Four fields; even though "Paris" is the last one, nothing is added.
        assert_eq!(annotate_line("0 0 Paris NNP", &tags, &links), "0 0 Paris NNP");
        assert_eq!(annotate_line("", &tags, &links), "");
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let (tags, links) = maps();
        assert_eq!(
            annotate_line("1  11\t13  is   VBZ", &tags, &links),
            "1 11 13 is VBZ"
        );
    }

    #[test]
    fn test_sibling_path_appends_suffix() {
        assert_eq!(
            sibling_path(Path::new("/corpus/d001/en.tok.off.pos")),
            PathBuf::from("/corpus/d001/en.tok.off.pos.ent")
        );
    }

    #[test]
    fn test_write_annotated_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("en.tok.off.pos");
        fs::write(&input, "0 0 10 Paris NNP\n1 11 13 is VBZ\nbroken line\n").unwrap();

        let (tags, links) = maps();
        let outputs = write_annotated(&[input.clone()], &tags, &links).unwrap();
        assert_eq!(outputs, vec![dir.path().join("en.tok.off.pos.ent")]);

        let written = fs::read_to_string(&outputs[0]).unwrap();
        assert_eq!(
            written,
            "0 0 10 Paris NNP CIT https://en.wikipedia.org/wiki/Paris\n1 11 13 is VBZ\nbroken line\n"
        );
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let (tags, links) = maps();
        let result = write_annotated(&[PathBuf::from("/no/such/file")], &tags, &links);
        assert!(result.is_err());
    }
}
