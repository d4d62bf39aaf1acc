//! Label coding: the bijection between labels and codes `1..=K`.
//!
//! Code 0 is reserved for missing values and never appears as a key.
//! Codes are dense: the label at position `i` of the list carries code
//! `i + 1`, so renumbering is just rebuilding from a reordered list.

use std::collections::HashMap;

use crate::error::{CategoryError, CategoryResult};
use crate::label::Label;

/// Ordered, injective mapping from labels to codes `1..=K`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCoding {
    labels: Vec<Label>,
    codes: HashMap<Label, u16>,
}

impl LabelCoding {
    /// Build a coding from an ordered list of unique labels.
    ///
    /// `labels[i]` is assigned code `i + 1`.
    pub fn build(labels: Vec<Label>) -> CategoryResult<Self> {
        if labels.is_empty() {
            return Err(CategoryError::InvalidInput(
                "label list must not be empty".to_string(),
            ));
        }
        if labels.len() > u16::MAX as usize {
            return Err(CategoryError::InvalidInput(format!(
                "label list has {} entries, at most {} are supported",
                labels.len(),
                u16::MAX
            )));
        }

        let mut codes = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if codes.insert(label.clone(), (i + 1) as u16).is_some() {
                return Err(CategoryError::InvalidInput(format!(
                    "duplicate label in label list: {}",
                    label
                )));
            }
        }

        Ok(Self { labels, codes })
    }

    /// Number of labels (the largest valid code).
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The code for a label, if the label is part of the coding.
    pub fn code_of(&self, label: &Label) -> Option<u16> {
        self.codes.get(label).copied()
    }

    /// The label carrying a code. Code 0 (missing) has no label.
    pub fn label_of(&self, code: u16) -> CategoryResult<&Label> {
        if code == 0 || code as usize > self.labels.len() {
            return Err(CategoryError::OutOfRange {
                code,
                max: self.labels.len() as u16,
            });
        }
        Ok(&self.labels[code as usize - 1])
    }

    pub fn contains(&self, label: &Label) -> bool {
        self.codes.contains_key(label)
    }

    /// Labels in code order (`labels()[i]` carries code `i + 1`).
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Ordered `(label, code)` pairs.
    pub fn pairs(&self) -> Vec<(Label, u16)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), (i + 1) as u16))
            .collect()
    }
}
