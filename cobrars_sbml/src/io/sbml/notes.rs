//! Conversion between SBML notes and `key: value` dictionaries
//!
//! Only paragraphs of the form `<p>key: value</p>` are understood, any other content of
//! the notes is ignored on reading.
use std::sync::LazyLock;

use quick_xml::escape::{escape, unescape};
use regex::Regex;

use crate::metabolic_model::annotation::Notes;
use crate::sbml::{SBase, XHTML_NAMESPACE};

static NOTES_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p>\s*(\w+\s*\w*)\s*:\s*([^<]+)<").unwrap());

/// Read the `key: value` paragraphs of an element's notes
///
/// Keys and values are trimmed and unescaped, entries with an empty value are dropped and
/// later duplicates replace earlier ones.
pub fn parse_notes(sbase: &SBase) -> Notes {
    let mut notes = Notes::new();
    let Some(content) = sbase.notes_string() else {
        return notes;
    };
    for captures in NOTES_PATTERN.captures_iter(content) {
        let key = unescape_text(captures[1].trim());
        let value = unescape_text(captures[2].trim());
        if !value.is_empty() {
            notes.insert(key, value);
        }
    }
    notes
}

fn unescape_text(text: &str) -> String {
    match unescape(text) {
        Ok(unescaped) => unescaped.trim().to_string(),
        Err(_) => text.to_string(),
    }
}

/// Render a notes dictionary as XHTML paragraphs
pub fn notes_to_xhtml(notes: &Notes) -> String {
    let mut xhtml = format!(r#"<html xmlns="{XHTML_NAMESPACE}">"#);
    for (key, value) in notes {
        xhtml.push_str(&format!("<p>{}: {}</p>", escape(key.as_str()), escape(value.as_str())));
    }
    xhtml.push_str("</html>");
    xhtml
}

/// Install a notes dictionary on an element
///
/// Nothing is written for an empty dictionary. Notes the element refuses are logged and
/// dropped.
pub fn set_notes(sbase: &mut SBase, notes: &Notes) {
    if notes.is_empty() {
        return;
    }
    if let Err(e) = sbase.set_notes(&notes_to_xhtml(notes)) {
        log::warn!(
            "Unable to set notes on '{}': {e}",
            sbase.id.as_deref().unwrap_or_default()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_notes(content: &str) -> SBase {
        let mut sbase = SBase::with_id("M_glc");
        sbase.set_notes(content).unwrap();
        sbase
    }

    #[test]
    fn parse_paragraphs() {
        let sbase = with_notes(
            r#"<html xmlns="http://www.w3.org/1999/xhtml"><p>CHARGE: -2</p><p>FORMULA: C6H12O6</p><p>EMPTY: </p></html>"#,
        );
        let notes = parse_notes(&sbase);
        assert_eq!(notes.len(), 2);
        assert_eq!(notes["CHARGE"], "-2");
        assert_eq!(notes["FORMULA"], "C6H12O6");
    }

    #[test]
    fn parse_whitespace_entities_and_duplicates() {
        let sbase = with_notes(
            "<body><p> GENE ASSOCIATION :  b1 &amp;&amp; b2 </p><p>KEY: first</p><p>KEY: second</p></body>",
        );
        let notes = parse_notes(&sbase);
        assert_eq!(notes["GENE ASSOCIATION"], "b1 && b2");
        assert_eq!(notes["KEY"], "second");
        assert!(parse_notes(&SBase::default()).is_empty());
    }

    #[test]
    fn set_and_reparse() {
        let mut sbase = SBase::with_id("R_PGI");
        set_notes(&mut sbase, &Notes::new());
        assert_eq!(sbase.notes_string(), None);

        let notes = Notes::from([
            ("SUBSYSTEM".to_string(), "Glycolysis <upper>".to_string()),
            ("Confidence".to_string(), "4".to_string()),
        ]);
        set_notes(&mut sbase, &notes);
        assert!(sbase
            .notes_string()
            .unwrap()
            .starts_with(r#"<html xmlns="http://www.w3.org/1999/xhtml"><p>"#));
        assert_eq!(parse_notes(&sbase), notes);
    }
}
