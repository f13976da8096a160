//! Miniature WordNet noun database for tests.
//!
//! Writes `index.noun`, `data.noun` and `noun.exc` in the WordNet 3.x layout,
//! with real byte offsets, so readers can be exercised without the full
//! database.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

const LICENCE_HEADER: &str = "  1 This software and database is being provided to you, the LICENSEE, by\n  2 Princeton University under the following license.\n";

/// Builder for a noun-only WordNet directory.
///
/// # Examples
/// ```
/// use sensedist_test_support::wordnet::WordNetFixture;
///
/// let dir = tempfile::tempdir().expect("temp dir");
/// WordNetFixture::new()
///     .noun("bank", &["sloping land", "a financial institution"])
///     .write(dir.path())
///     .expect("fixture must write");
/// assert!(dir.path().join("index.noun").exists());
/// ```
#[derive(Debug, Clone, Default)]
pub struct WordNetFixture {
    nouns: Vec<(String, Vec<String>)>,
    exceptions: Vec<(String, String)>,
}

impl WordNetFixture {
    /// Creates an empty fixture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `lemma` with one synset per gloss, in order.
    #[must_use]
    pub fn noun(mut self, lemma: &str, glosses: &[&str]) -> Self {
        self.nouns.push((
            lemma.to_owned(),
            glosses.iter().map(|gloss| (*gloss).to_owned()).collect(),
        ));
        self
    }

    /// Adds an irregular form to `noun.exc`.
    #[must_use]
    pub fn exception(mut self, inflected: &str, base: &str) -> Self {
        self.exceptions
            .push((inflected.to_owned(), base.to_owned()));
        self
    }

    /// Writes the database files into `dir`.
    ///
    /// # Errors
    /// Returns an I/O error when a file cannot be written.
    pub fn write(&self, dir: &Path) -> io::Result<()> {
        let mut data = String::from(LICENCE_HEADER);
        let mut index_lines = Vec::with_capacity(self.nouns.len());
        for (lemma, glosses) in &self.nouns {
            let mut offsets = Vec::with_capacity(glosses.len());
            for gloss in glosses {
                let offset = data.len();
                offsets.push(format!("{offset:08}"));
                // offset lex_filenum ss_type w_cnt word lex_id p_cnt | gloss
                let _ = writeln!(data, "{offset:08} 17 n 01 {lemma} 0 000 | {gloss}  ");
            }
            index_lines.push(format!(
                "{lemma} n {count} 1 @ {count} 0 {offsets}  ",
                count = offsets.len(),
                offsets = offsets.join(" "),
            ));
        }
        index_lines.sort();

        let mut index = String::from(LICENCE_HEADER);
        for line in index_lines {
            index.push_str(&line);
            index.push('\n');
        }

        let mut exceptions = String::new();
        for (inflected, base) in &self.exceptions {
            let _ = writeln!(exceptions, "{inflected} {base}");
        }

        fs::write(dir.join("index.noun"), index)?;
        fs::write(dir.join("data.noun"), data)?;
        fs::write(dir.join("noun.exc"), exceptions)
    }
}

/// The two `bank` senses used across scenario tests.
#[must_use]
pub fn bank_fixture() -> WordNetFixture {
    WordNetFixture::new().noun(
        "bank",
        &[
            "sloping land (especially the slope beside a body of water); \"they pulled the canoe up on the bank\"",
            "a financial institution that accepts deposits and channels the money into lending activities; \"he cashed a check at the bank\"",
        ],
    )
}
