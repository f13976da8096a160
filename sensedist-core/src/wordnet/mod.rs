//! Reader for a WordNet 3.x database directory.
//!
//! Only the noun files are consulted: `index.noun` maps lemmas to synset
//! offsets, `data.noun` holds one synset record per line at those byte
//! offsets, and the optional `noun.exc` lists irregular plurals.

mod morphy;

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{Span, debug, field, instrument};

use crate::inventory::{InventoryError, Sense, SenseInventory};

/// Directory searched when no database location is configured.
pub const DEFAULT_DATABASE_DIR: &str = "/usr/share/wordnet";

const INDEX_FILE: &str = "index.noun";
const DATA_FILE: &str = "data.noun";
const EXCEPTION_FILE: &str = "noun.exc";

/// [`SenseInventory`] backed by the WordNet noun files.
///
/// The index and exception list are loaded once by [`Self::open`]; synset
/// records are read on demand by seeking into the data file.
#[derive(Debug, Clone)]
pub struct WordNetInventory {
    data_path: PathBuf,
    offsets: HashMap<String, Vec<u64>>,
    exceptions: HashMap<String, Vec<String>>,
}

impl WordNetInventory {
    /// Loads the noun index and exception list from `dir`.
    ///
    /// # Errors
    /// Returns [`InventoryError::MissingFile`] when `index.noun` or
    /// `data.noun` is absent, [`InventoryError::MalformedIndex`] for an
    /// unparsable index line, and [`InventoryError::Io`] for read failures.
    #[instrument(name = "inventory.open", err, fields(dir = %dir.display()))]
    pub fn open(dir: &Path) -> Result<Self, InventoryError> {
        let index_path = dir.join(INDEX_FILE);
        let data_path = dir.join(DATA_FILE);
        if !data_path.is_file() {
            return Err(InventoryError::MissingFile {
                path: data_path,
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        }

        let offsets = load_index(&index_path)?;
        let exceptions = load_exceptions(&dir.join(EXCEPTION_FILE))?;
        debug!(
            lemmas = offsets.len(),
            exceptions = exceptions.len(),
            "loaded noun index"
        );
        Ok(Self {
            data_path,
            offsets,
            exceptions,
        })
    }

    /// Returns `true` when `lemma` has at least one noun synset.
    #[must_use]
    pub fn contains(&self, lemma: &str) -> bool {
        self.offsets.contains_key(lemma)
    }

    fn read_definition(
        &self,
        reader: &mut BufReader<File>,
        offset: u64,
    ) -> Result<String, InventoryError> {
        let io_error = |source| InventoryError::Io {
            path: self.data_path.clone(),
            source,
        };
        reader.seek(SeekFrom::Start(offset)).map_err(io_error)?;
        let mut record = String::new();
        reader.read_line(&mut record).map_err(io_error)?;

        let malformed = |reason: &str| InventoryError::MalformedData {
            path: self.data_path.clone(),
            offset,
            reason: reason.to_owned(),
        };
        let recorded_offset = record
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<u64>().ok())
            .ok_or_else(|| malformed("record does not start with an offset"))?;
        if recorded_offset != offset {
            return Err(malformed("record offset does not match the index"));
        }
        let (_, gloss) = record
            .split_once('|')
            .ok_or_else(|| malformed("record has no gloss"))?;
        Ok(definition_from_gloss(gloss))
    }
}

impl SenseInventory for WordNetInventory {
    fn name(&self) -> &str {
        "WordNet"
    }

    #[instrument(
        name = "inventory.lookup",
        err,
        skip(self),
        fields(forms = field::Empty, senses = field::Empty),
    )]
    fn noun_senses(&self, word: &str) -> Result<Vec<Sense>, InventoryError> {
        let lemma = normalise(word);
        if lemma.is_empty() {
            return Err(InventoryError::EmptyWord);
        }

        let forms = morphy::base_forms(&lemma, &self.exceptions, |form| self.contains(form));
        let span = Span::current();
        span.record("forms", field::debug(&forms));
        if forms.is_empty() {
            span.record("senses", 0_usize);
            return Ok(Vec::new());
        }

        let file = File::open(&self.data_path).map_err(|source| InventoryError::Io {
            path: self.data_path.clone(),
            source,
        })?;
        let mut reader = BufReader::new(file);
        let mut seen = HashSet::new();
        let mut definitions = Vec::new();
        for offset in forms
            .iter()
            .filter_map(|form| self.offsets.get(form))
            .flatten()
        {
            if seen.insert(*offset) {
                definitions.push(self.read_definition(&mut reader, *offset)?);
            }
        }

        span.record("senses", definitions.len());
        Ok(Sense::enumerate(definitions))
    }
}

fn normalise(word: &str) -> String {
    word.trim().to_lowercase().replace(' ', "_")
}

/// Strips quoted example sentences and trailing separators from a gloss.
pub(crate) fn definition_from_gloss(gloss: &str) -> String {
    let mut definition = String::with_capacity(gloss.len());
    let mut rest = gloss;
    while let Some((before, after_open)) = rest.split_once('"') {
        let Some((_, after_close)) = after_open.split_once('"') else {
            break;
        };
        definition.push_str(before);
        rest = after_close;
    }
    definition.push_str(rest);
    definition
        .trim()
        .trim_matches(|c: char| c == ';' || c == ' ')
        .to_owned()
}

fn open_required(path: &Path) -> Result<BufReader<File>, InventoryError> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            Err(InventoryError::MissingFile {
                path: path.to_path_buf(),
                source,
            })
        }
        Err(source) => Err(InventoryError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn load_index(path: &Path) -> Result<HashMap<String, Vec<u64>>, InventoryError> {
    let reader = open_required(path)?;
    let mut offsets = HashMap::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| InventoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        // The licence header is indented.
        if line.starts_with(' ') || line.trim().is_empty() {
            continue;
        }
        let (lemma, entry) = parse_index_line(&line).map_err(|reason| {
            InventoryError::MalformedIndex {
                path: path.to_path_buf(),
                line: index + 1,
                reason,
            }
        })?;
        offsets.insert(lemma, entry);
    }
    Ok(offsets)
}

/// Parses `lemma pos synset_cnt p_cnt [ptr...] sense_cnt tagsense_cnt offset...`.
fn parse_index_line(line: &str) -> Result<(String, Vec<u64>), String> {
    let mut fields = line.split_whitespace();
    let lemma = fields.next().ok_or("missing lemma")?.to_owned();
    let _pos = fields.next().ok_or("missing part of speech")?;
    let synset_count = parse_count(fields.next(), "synset count")?;
    let pointer_count = parse_count(fields.next(), "pointer count")?;
    let mut fields = fields.skip(pointer_count);
    let _sense_count = parse_count(fields.next(), "sense count")?;
    let _tagged_count = parse_count(fields.next(), "tagged sense count")?;
    let offsets = fields
        .map(|token| {
            token
                .parse::<u64>()
                .map_err(|_| format!("invalid synset offset `{token}`"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if offsets.len() != synset_count {
        return Err(format!(
            "expected {synset_count} synset offsets, found {}",
            offsets.len()
        ));
    }
    Ok((lemma, offsets))
}

fn parse_count(token: Option<&str>, what: &str) -> Result<usize, String> {
    let token = token.ok_or_else(|| format!("missing {what}"))?;
    token
        .parse()
        .map_err(|_| format!("invalid {what} `{token}`"))
}

fn load_exceptions(path: &Path) -> Result<HashMap<String, Vec<String>>, InventoryError> {
    let reader = match File::open(path) {
        Ok(file) => BufReader::new(file),
        Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(source) => {
            return Err(InventoryError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let mut exceptions = HashMap::new();
    for line in reader.lines() {
        let line = line.map_err(|source| InventoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut words = line.split_whitespace();
        let Some(inflected) = words.next() else {
            continue;
        };
        let bases: Vec<String> = words.map(ToOwned::to_owned).collect();
        if !bases.is_empty() {
            exceptions.insert(inflected.to_owned(), bases);
        }
    }
    Ok(exceptions)
}

#[cfg(test)]
mod tests;
