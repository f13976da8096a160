//! Noun base-form recovery in the manner of WordNet's `morphy`.

use std::collections::{HashMap, HashSet};

/// Suffix detachment rules for nouns, applied in order.
const NOUN_DETACHMENTS: [(&str, &str); 9] = [
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// Returns the base forms of `form` that `is_known` accepts, in discovery
/// order and without duplicates.
///
/// Exception-list entries win outright. Otherwise the surface form and its
/// one-step detachments are tried first; when none is known the rules are
/// reapplied to the detached forms until something is found or nothing is
/// left to detach.
pub(super) fn base_forms<F>(
    form: &str,
    exceptions: &HashMap<String, Vec<String>>,
    is_known: F,
) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    if let Some(bases) = exceptions.get(form) {
        let candidates = std::iter::once(form.to_owned()).chain(bases.iter().cloned());
        return retain_known(candidates, &is_known);
    }

    let mut detached = detach(std::slice::from_ref(&form.to_owned()));
    let found = retain_known(
        std::iter::once(form.to_owned()).chain(detached.iter().cloned()),
        &is_known,
    );
    if !found.is_empty() {
        return found;
    }

    while !detached.is_empty() {
        detached = detach(&detached);
        let found = retain_known(detached.iter().cloned(), &is_known);
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

fn detach(forms: &[String]) -> Vec<String> {
    forms
        .iter()
        .flat_map(|form| {
            NOUN_DETACHMENTS.iter().filter_map(move |(suffix, replacement)| {
                form.strip_suffix(suffix)
                    .filter(|stem| !stem.is_empty())
                    .map(|stem| format!("{stem}{replacement}"))
            })
        })
        .collect()
}

fn retain_known<I, F>(candidates: I, is_known: &F) -> Vec<String>
where
    I: IntoIterator<Item = String>,
    F: Fn(&str) -> bool,
{
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| is_known(candidate) && seen.insert(candidate.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn lexicon(words: &[&str]) -> impl Fn(&str) -> bool {
        let known: HashSet<String> = words.iter().map(|word| (*word).to_owned()).collect();
        move |candidate: &str| known.contains(candidate)
    }

    #[rstest]
    #[case("banks", &["bank"])]
    #[case("bank", &["bank"])]
    #[case("boxes", &["box"])]
    #[case("churches", &["church"])]
    #[case("wolves", &["wolf"])]
    #[case("women", &["woman"])]
    #[case("berries", &["berry"])]
    #[case("glasses", &["glass"])]
    #[case("zzz", &[])]
    fn detaches_regular_plurals(#[case] form: &str, #[case] expected: &[&str]) {
        let known = lexicon(&[
            "bank", "box", "church", "wolf", "woman", "berry", "glass",
        ]);
        let forms = base_forms(form, &HashMap::new(), known);
        assert_eq!(forms, expected);
    }

    #[test]
    fn keeps_surface_form_and_detached_form_when_both_exist() {
        let known = lexicon(&["glasses", "glass"]);
        let forms = base_forms("glasses", &HashMap::new(), known);
        assert_eq!(forms, vec!["glasses", "glass"]);
    }

    #[test]
    fn exceptions_take_precedence_over_rules() {
        let mut exceptions = HashMap::new();
        exceptions.insert("geese".to_owned(), vec!["goose".to_owned()]);
        let known = lexicon(&["goose", "gee"]);
        let forms = base_forms("geese", &exceptions, known);
        assert_eq!(forms, vec!["goose"]);
    }

    #[test]
    fn reapplies_rules_until_a_form_is_known() {
        // "classeses" -> "classes" (unknown) -> "class"
        let known = lexicon(&["class"]);
        let forms = base_forms("classeses", &HashMap::new(), known);
        assert_eq!(forms, vec!["class"]);
    }
}
