//! Sense inventory abstraction.
//!
//! A [`SenseInventory`] answers one question: which noun senses does a word
//! have, and in which order. The order fixes the ordinal-to-definition mapping
//! used by the seed file and the classifier labels for the rest of a run.

use std::collections::HashMap;
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use thiserror::Error;

use crate::error::define_error_codes;

/// One dictionary meaning of a word.
///
/// # Examples
/// ```
/// use sensedist_core::Sense;
///
/// let sense = Sense::new(1, "sloping land").expect("ordinal is non-zero");
/// assert_eq!(sense.ordinal().get(), 1);
/// assert_eq!(sense.definition(), "sloping land");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sense {
    ordinal: NonZeroUsize,
    definition: String,
}

impl Sense {
    /// Creates a sense with a one-based `ordinal`. Returns `None` for zero.
    #[must_use]
    pub fn new(ordinal: usize, definition: impl Into<String>) -> Option<Self> {
        NonZeroUsize::new(ordinal).map(|ordinal| Self {
            ordinal,
            definition: definition.into(),
        })
    }

    /// One-based position of this sense in the inventory's answer.
    #[must_use]
    pub fn ordinal(&self) -> NonZeroUsize {
        self.ordinal
    }

    /// Natural-language definition.
    #[must_use]
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Numbers `definitions` from one in iteration order.
    ///
    /// # Examples
    /// ```
    /// use sensedist_core::Sense;
    ///
    /// let senses = Sense::enumerate(["a", "b"]);
    /// assert_eq!(senses[1].ordinal().get(), 2);
    /// ```
    pub fn enumerate<I, S>(definitions: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        definitions
            .into_iter()
            .zip(1_usize..)
            .filter_map(|(definition, ordinal)| Self::new(ordinal, definition))
            .collect()
    }
}

/// Errors raised by [`SenseInventory`] implementations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The looked-up word was empty after normalisation.
    #[error("cannot look up an empty word")]
    EmptyWord,
    /// A database file was not found.
    #[error("lexical database file `{}` is missing: {source}", path.display())]
    MissingFile {
        /// Expected location of the file.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Reading a database file failed.
    #[error("failed to read lexical database file `{}`: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// An index line could not be parsed.
    #[error("malformed index entry in `{}` at line {line}: {reason}", path.display())]
    MalformedIndex {
        /// Index file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// What was wrong with the entry.
        reason: String,
    },
    /// A data record could not be parsed.
    #[error("malformed data record in `{}` at offset {offset}: {reason}", path.display())]
    MalformedData {
        /// Data file.
        path: PathBuf,
        /// Byte offset of the record.
        offset: u64,
        /// What was wrong with the record.
        reason: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`InventoryError`] variants.
    enum InventoryErrorCode for InventoryError {
        /// The looked-up word was empty after normalisation.
        EmptyWord => EmptyWord => "INVENTORY_EMPTY_WORD",
        /// A database file was not found.
        MissingFile => MissingFile { .. } => "INVENTORY_MISSING_FILE",
        /// Reading a database file failed.
        Io => Io { .. } => "INVENTORY_IO",
        /// An index line could not be parsed.
        MalformedIndex => MalformedIndex { .. } => "INVENTORY_MALFORMED_INDEX",
        /// A data record could not be parsed.
        MalformedData => MalformedData { .. } => "INVENTORY_MALFORMED_DATA",
    }
}

/// Source of noun sense definitions.
///
/// Implementations return senses in a stable order; an unknown word yields an
/// empty list rather than an error.
pub trait SenseInventory {
    /// Human-readable name of the backing database, used in console output.
    fn name(&self) -> &str;

    /// Returns the noun senses of `word`, numbered from one.
    ///
    /// # Errors
    /// Returns [`InventoryError`] when the backing store cannot be read.
    fn noun_senses(&self, word: &str) -> Result<Vec<Sense>, InventoryError>;
}

/// In-memory inventory keyed by exact word.
///
/// # Examples
/// ```
/// use sensedist_core::{SenseInventory, StaticInventory};
///
/// let inventory = StaticInventory::new("demo")
///     .with_word("bank", ["sloping land", "a financial institution"]);
/// let senses = inventory.noun_senses("bank").expect("static lookups succeed");
/// assert_eq!(senses.len(), 2);
/// assert!(inventory.noun_senses("tank").expect("static lookups succeed").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    name: String,
    entries: HashMap<String, Vec<String>>,
}

impl StaticInventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
        }
    }

    /// Registers the definitions of `word`, replacing earlier ones.
    #[must_use]
    pub fn with_word<I, S>(mut self, word: impl Into<String>, definitions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.insert(
            word.into(),
            definitions.into_iter().map(Into::into).collect(),
        );
        self
    }
}

impl SenseInventory for StaticInventory {
    fn name(&self) -> &str {
        &self.name
    }

    fn noun_senses(&self, word: &str) -> Result<Vec<Sense>, InventoryError> {
        if word.trim().is_empty() {
            return Err(InventoryError::EmptyWord);
        }
        Ok(self
            .entries
            .get(word)
            .map(|definitions| Sense::enumerate(definitions.iter().cloned()))
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn sense_rejects_zero_ordinal() {
        assert!(Sense::new(0, "nothing").is_none());
    }

    #[test]
    fn enumerate_numbers_from_one_in_order() {
        let senses = Sense::enumerate(["first", "second", "third"]);
        let ordinals: Vec<usize> = senses.iter().map(|sense| sense.ordinal().get()).collect();
        let definitions: Vec<&str> = senses.iter().map(Sense::definition).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
        assert_eq!(definitions, vec!["first", "second", "third"]);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn static_inventory_rejects_blank_words(#[case] word: &str) {
        let inventory = StaticInventory::new("demo");
        let err = inventory
            .noun_senses(word)
            .expect_err("blank words must be rejected");
        assert!(matches!(err, InventoryError::EmptyWord));
        assert_eq!(err.code().as_str(), "INVENTORY_EMPTY_WORD");
    }

    #[test]
    fn static_inventory_replaces_definitions() {
        let inventory = StaticInventory::new("demo")
            .with_word("bank", ["old"])
            .with_word("bank", ["new", "newer"]);
        let senses = inventory.noun_senses("bank").expect("lookup must succeed");
        assert_eq!(senses.len(), 2);
        assert_eq!(senses[0].definition(), "new");
        assert_eq!(inventory.name(), "demo");
    }
}
