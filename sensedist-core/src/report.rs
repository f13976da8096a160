//! Console rendering of the run transcript and the sense distribution.

use std::io::{self, Write};
use std::time::Duration;

use crate::corpus::Corpus;
use crate::histogram::{BucketShare, Histogram};
use crate::inventory::Sense;
use crate::labels::Classification;
use crate::summary::RunSummary;

/// Line separating the transcript sections.
pub const SEPARATOR: &str = "-----------------------------";

const EXAMPLE_INDENT: &str = "    ";

/// Optional extras of the distribution report.
///
/// # Examples
/// ```
/// use sensedist_core::ReportOptions;
///
/// let options = ReportOptions::default().with_examples(2);
/// assert_eq!(options.examples(), 2);
/// assert_eq!(options.examples_per_sense(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    examples: usize,
    examples_per_sense: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            examples: 0,
            examples_per_sense: 3,
        }
    }
}

impl ReportOptions {
    /// Shows example lines under the `buckets` largest buckets; `0` disables
    /// examples.
    #[must_use]
    pub fn with_examples(mut self, buckets: usize) -> Self {
        self.examples = buckets;
        self
    }

    /// Caps the example lines shown per bucket.
    #[must_use]
    pub fn with_examples_per_sense(mut self, lines: usize) -> Self {
        self.examples_per_sense = lines;
        self
    }

    /// Number of buckets that receive example lines.
    #[must_use]
    pub fn examples(&self) -> usize {
        self.examples
    }

    /// Maximum example lines per bucket.
    #[must_use]
    pub fn examples_per_sense(&self) -> usize {
        self.examples_per_sense
    }
}

/// Writes the target word and its numbered sense definitions, naming the
/// inventory they came from.
///
/// # Errors
/// Propagates write failures.
pub fn write_sense_listing<W: Write + ?Sized>(
    out: &mut W,
    word: &str,
    inventory: &str,
    senses: &[Sense],
) -> io::Result<()> {
    writeln!(out, "Word to be disambiguated: {word}. The senses in the {inventory} are:")?;
    for sense in senses {
        writeln!(out, "{}: {}", sense.ordinal(), sense.definition())?;
    }
    writeln!(out, "{SEPARATOR}")
}

/// Announces a phase without a line break so its completion can follow.
///
/// # Errors
/// Propagates write failures.
pub fn write_phase_start<W: Write + ?Sized>(out: &mut W, label: &str) -> io::Result<()> {
    write!(out, "{label} ... ")?;
    out.flush()
}

/// Completes a phase line with its elapsed wall-clock time.
///
/// # Errors
/// Propagates write failures.
pub fn write_phase_done<W: Write + ?Sized>(out: &mut W, elapsed: Duration) -> io::Result<()> {
    writeln!(out, "done. Elapsed time is {:.4} seconds.", elapsed.as_secs_f64())
}

/// Writes the distribution report for a finished run.
///
/// # Errors
/// Propagates write failures.
///
/// # Examples
/// ```
/// use sensedist_core::{Corpus, Histogram, ReportOptions, parse_output, render_distribution};
///
/// let corpus = Corpus::from_text("bank", "a river bank\nbank loan\nno match\n");
/// let classification = parse_output("-1 x\n2 y\n-1 z\n", corpus.len(), 2).expect("valid");
/// let histogram = Histogram::from_classification(2, &classification);
/// let mut out = Vec::new();
/// render_distribution(&mut out, &histogram, &classification, &corpus, &ReportOptions::default())
///     .expect("writing to a Vec succeeds");
/// let text = String::from_utf8(out).expect("utf-8");
/// assert!(text.contains("N/A:      66%\nSense  1:  0%\nSense  2: 33%\n"));
/// ```
pub fn render_distribution<W: Write + ?Sized>(
    out: &mut W,
    histogram: &Histogram,
    classification: &Classification,
    corpus: &Corpus,
    options: &ReportOptions,
) -> io::Result<()> {
    let total = histogram.total();
    let Some(shares) = histogram.shares() else {
        return writeln!(
            out,
            "Total number of {total} lines were processed. No lines were classified, so there is no sense distribution."
        );
    };

    writeln!(out, "Total number of {total} lines were processed. The sense distribution is:")?;
    let featured = histogram.largest_buckets(options.examples);
    for share in &shares {
        writeln!(out, "{}", bucket_line(share))?;
        if featured.contains(&share.bucket) {
            let lines = example_lines(
                share.bucket,
                classification,
                corpus,
                options.examples_per_sense,
            );
            for line in lines {
                writeln!(out, "{EXAMPLE_INDENT}{line}")?;
            }
        }
    }
    Ok(())
}

/// Writes the distribution report of `summary`.
///
/// # Errors
/// Propagates write failures.
pub fn render_report<W: Write + ?Sized>(
    out: &mut W,
    summary: &RunSummary,
    options: &ReportOptions,
) -> io::Result<()> {
    render_distribution(
        out,
        summary.histogram(),
        summary.classification(),
        summary.corpus(),
        options,
    )
}

fn bucket_line(share: &BucketShare) -> String {
    if share.is_not_applicable() {
        format!("N/A:      {:2}%", share.percent)
    } else {
        format!("Sense {:2}: {:2}%", share.bucket, share.percent)
    }
}

fn example_lines<'a>(
    bucket: usize,
    classification: &'a Classification,
    corpus: &'a Corpus,
    limit: usize,
) -> impl Iterator<Item = &'a str> + 'a {
    corpus
        .lines()
        .iter()
        .enumerate()
        .filter(move |(index, line)| {
            line.chars().count() > 1
                && classification
                    .label(*index)
                    .is_some_and(|label| label.bucket() == bucket)
        })
        .map(|(_, line)| line.as_str())
        .take(limit)
}
