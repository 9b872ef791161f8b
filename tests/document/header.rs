//! Integration tests for metadata header parsing and version gating.

use riddleforge_document::{DocHeader, SUPPORTED_VERSION, split_front_matter};
use riddleforge_foundation::ErrorKind;

fn parse_doc(raw: &str) -> riddleforge_foundation::Result<DocHeader> {
    let source = split_front_matter(raw)?;
    DocHeader::parse(&source.header)
}

#[test]
fn full_document_header_parses() {
    let header = parse_doc(
        "+++\nversion = 2\ntitle = \"Day Four\"\nreleased = \"2024-12-04T06:00:00Z\"\nitems = [\"lantern\", \"sled\"]\ntags = [\"outdoor\"]\n+++\n\n## story\nHello.\n",
    )
    .expect("parse failed");
    assert_eq!(header.version, SUPPORTED_VERSION);
    assert_eq!(header.title, "Day Four");
    assert_eq!(header.items.len(), 2);
}

#[test]
fn version_gate_never_partially_succeeds() {
    // Any version other than the supported one fails outright, even when
    // the rest of the document is pristine.
    let err = parse_doc(
        "+++\nversion = 3\ntitle = \"Day Four\"\nreleased = \"2024-12-04T06:00:00Z\"\n+++\n\n## story\nHello.\n",
    )
    .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::UnsupportedVersion {
            found: 3,
            supported: SUPPORTED_VERSION
        }
    ));
}

#[test]
fn unknown_header_fields_are_ignored() {
    let header = parse_doc(
        "+++\nversion = 2\ntitle = \"T\"\nreleased = \"now\"\nauthor = \"elf\"\n+++\nbody\n",
    )
    .expect("parse failed");
    assert_eq!(header.title, "T");
}

#[test]
fn solved_condition_passes_through_raw() {
    let header = parse_doc(
        "+++\nversion = 2\ntitle = \"T\"\nreleased = \"now\"\nsolved_when = { and = [\"p1\", \"p2\"] }\n+++\n",
    )
    .expect("parse failed");
    let value = header.solved_when.expect("solved_when present");
    assert!(value.as_table().is_some_and(|t| t.contains_key("and")));
}
