//! Field Locator
//!
//! Finds where anchor labels were rendered. Matching is exact, case-sensitive
//! equality against a single extracted word token: callers supply labels
//! exactly as the extractor emits them.

use crate::error::OverlayError;
use crate::fields::FieldMap;
use crate::words::{PositionMatch, Word};
use serde::Serialize;

/// Every occurrence of `label`, across all pages, in word-stream order.
/// An empty result is not an error.
pub fn locate(words: &[Word], label: &str) -> Vec<PositionMatch> {
    words
        .iter()
        .filter(|word| word.text == label)
        .map(PositionMatch::from)
        .collect()
}

/// Like [`locate`], but a missing label is reported as an error
pub fn locate_required(words: &[Word], label: &str) -> Result<Vec<PositionMatch>, OverlayError> {
    let matches = locate(words, label);
    if matches.is_empty() {
        return Err(OverlayError::LabelNotFound(label.to_string()));
    }
    Ok(matches)
}

/// A field value together with the positions it must be drawn at
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldFill {
    pub name: String,
    pub label: String,
    pub value: String,
    pub matches: Vec<PositionMatch>,
}

/// Locate every field of a template, keeping template order
pub fn locate_fields(words: &[Word], template: &FieldMap) -> Vec<FieldFill> {
    template
        .fields()
        .iter()
        .map(|field| {
            let matches = locate(words, &field.label);
            if matches.is_empty() {
                tracing::debug!(field = %field.name, label = %field.label, "label not found");
            }
            FieldFill {
                name: field.name.clone(),
                label: field.label.clone(),
                value: field.value.clone(),
                matches,
            }
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: every match corresponds to a word whose text equals the label
        #[test]
        fn matches_are_exact(
            texts in prop::collection::vec("[A-Za-z:]{1,6}", 0..40),
            label in "[A-Za-z:]{1,6}"
        ) {
            let words: Vec<Word> = texts
                .iter()
                .enumerate()
                .map(|(i, t)| Word::new((i % 3) as u32, t.clone(), i as f64, i as f64))
                .collect();
            let expected = texts.iter().filter(|t| **t == label).count();
            let matches = locate(&words, &label);
            prop_assert_eq!(matches.len(), expected);
            for m in &matches {
                let word = &words[m.x as usize];
                prop_assert_eq!(&word.text, &label);
            }
        }
    }
}
