//! Unit tests for the WordNet reader.

use super::*;

use std::fs;

use rstest::rstest;
use sensedist_test_support::wordnet::{WordNetFixture, bank_fixture};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

fn open_fixture(fixture: &WordNetFixture) -> (TempDir, WordNetInventory) {
    let dir = temp_dir();
    if let Err(err) = fixture.write(dir.path()) {
        panic!("failed to write fixture: {err}");
    }
    match WordNetInventory::open(dir.path()) {
        Ok(inventory) => (dir, inventory),
        Err(err) => panic!("fixture must open: {err}"),
    }
}

fn definitions(inventory: &WordNetInventory, word: &str) -> Vec<String> {
    match inventory.noun_senses(word) {
        Ok(senses) => senses
            .iter()
            .map(|sense| sense.definition().to_owned())
            .collect(),
        Err(err) => panic!("lookup of `{word}` failed: {err}"),
    }
}

#[rstest]
#[case::plain("sloping land; \"they pulled the canoe up\"", "sloping land")]
#[case::several_examples(
    " a container; \"a tank of water\"; \"fill the tank\"  ",
    "a container"
)]
#[case::no_examples("an armoured combat vehicle", "an armoured combat vehicle")]
#[case::unterminated_quote("a thing; \"dangling", "a thing; \"dangling")]
#[case::only_examples("\"just an example\"", "")]
fn definition_from_gloss_strips_examples(#[case] gloss: &str, #[case] expected: &str) {
    assert_eq!(definition_from_gloss(gloss), expected);
}

#[test]
fn lookup_returns_senses_in_index_order() {
    let (_dir, inventory) = open_fixture(&bank_fixture());
    assert_eq!(
        definitions(&inventory, "bank"),
        vec![
            "sloping land (especially the slope beside a body of water)",
            "a financial institution that accepts deposits and channels the money into lending activities",
        ]
    );
    assert_eq!(inventory.name(), "WordNet");
}

#[rstest]
#[case::plural("banks")]
#[case::capitalised("Bank")]
#[case::padded("  bank ")]
fn lookup_normalises_surface_forms(#[case] word: &str) {
    let (_dir, inventory) = open_fixture(&bank_fixture());
    assert_eq!(definitions(&inventory, word).len(), 2);
}

#[test]
fn lookup_uses_exception_list() {
    let fixture = WordNetFixture::new()
        .noun("goose", &["web-footed long-necked typically gregarious migratory aquatic birds"])
        .exception("geese", "goose");
    let (_dir, inventory) = open_fixture(&fixture);
    assert_eq!(definitions(&inventory, "geese").len(), 1);
}

#[test]
fn lookup_joins_multiword_lemmas() {
    let fixture = WordNetFixture::new().noun(
        "bank_account",
        &["a fund that a customer has entrusted to a bank"],
    );
    let (_dir, inventory) = open_fixture(&fixture);
    assert_eq!(definitions(&inventory, "bank account").len(), 1);
}

#[test]
fn unknown_word_yields_no_senses() {
    let (_dir, inventory) = open_fixture(&bank_fixture());
    assert!(definitions(&inventory, "xylophonist").is_empty());
}

#[test]
fn blank_word_is_rejected() {
    let (_dir, inventory) = open_fixture(&bank_fixture());
    let err = inventory
        .noun_senses("   ")
        .expect_err("blank words must fail");
    assert!(matches!(err, InventoryError::EmptyWord));
}

#[test]
fn open_reports_missing_files() {
    let dir = temp_dir();
    let err = WordNetInventory::open(dir.path()).expect_err("empty dir must fail");
    match err {
        InventoryError::MissingFile { path, .. } => assert!(path.ends_with("data.noun")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn open_reports_malformed_index_line() {
    let dir = temp_dir();
    if let Err(err) = bank_fixture().write(dir.path()) {
        panic!("failed to write fixture: {err}");
    }
    let index = "  1 licence\nbank n 2 0 2 0 00000001\n";
    if let Err(err) = fs::write(dir.path().join("index.noun"), index) {
        panic!("failed to overwrite index: {err}");
    }
    let err = WordNetInventory::open(dir.path()).expect_err("short offset list must fail");
    match err {
        InventoryError::MalformedIndex { line, reason, .. } => {
            assert_eq!(line, 2);
            assert!(reason.contains("expected 2 synset offsets"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn lookup_rejects_offsets_that_miss_a_record() {
    let dir = temp_dir();
    if let Err(err) = bank_fixture().write(dir.path()) {
        panic!("failed to write fixture: {err}");
    }
    if let Err(err) = fs::write(dir.path().join("index.noun"), "bank n 1 0 1 0 00000003\n") {
        panic!("failed to overwrite index: {err}");
    }
    let inventory = match WordNetInventory::open(dir.path()) {
        Ok(inventory) => inventory,
        Err(err) => panic!("index must parse: {err}"),
    };
    let err = inventory
        .noun_senses("bank")
        .expect_err("misaligned offset must fail");
    assert!(matches!(err, InventoryError::MalformedData { offset: 3, .. }));
    assert_eq!(err.code().as_str(), "INVENTORY_MALFORMED_DATA");
}

#[test]
fn missing_exception_list_is_tolerated() {
    let dir = temp_dir();
    if let Err(err) = bank_fixture().write(dir.path()) {
        panic!("failed to write fixture: {err}");
    }
    if let Err(err) = fs::remove_file(dir.path().join("noun.exc")) {
        panic!("failed to remove exception list: {err}");
    }
    let inventory = match WordNetInventory::open(dir.path()) {
        Ok(inventory) => inventory,
        Err(err) => panic!("exception list is optional: {err}"),
    };
    assert!(inventory.contains("bank"));
}
