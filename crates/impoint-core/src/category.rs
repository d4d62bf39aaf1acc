//! Category: a column of values under a stable label coding.
//!
//! A `Category` owns the integer-coded form of one categorical column
//! (`u16` per row, 0 = missing), the current [`LabelCoding`], and a color
//! per label. The row count is fixed for the category's lifetime; every
//! mutation either renumbers rows consistently or is rejected whole.

use std::collections::{BTreeSet, HashMap};

use crate::coding::LabelCoding;
use crate::color::{palette_color, Color};
use crate::error::{CategoryError, CategoryResult};
use crate::label::{Label, LabelDomain};

/// What `set_label_list` does with rows whose label is absent from the
/// new list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingLabelPolicy {
    /// Reject the new list.
    #[default]
    Error,
    /// Recode affected rows to missing (code 0).
    SetMissing,
}

/// A categorical column: coded values, label coding, and palette.
#[derive(Debug, Clone)]
pub struct Category {
    name: Option<String>,
    domain: LabelDomain,
    coding: LabelCoding,
    coded: Vec<u16>,
    palette: Vec<Color>,
    missing_color: Color,
}

impl Category {
    /// Build a category from a column of nullable values.
    ///
    /// With an explicit `label_list`, every distinct observed value must
    /// appear in it; the list order determines the codes. Without one,
    /// labels are the sorted distinct values. Missing values encode to 0.
    pub fn from_values(
        values: &[Option<Label>],
        label_list: Option<Vec<Label>>,
    ) -> CategoryResult<Self> {
        let labels = match label_list {
            Some(list) => list,
            None => {
                let distinct: BTreeSet<&Label> = values.iter().flatten().collect();
                if distinct.is_empty() {
                    return Err(CategoryError::InvalidInput(
                        "column has no non-missing values and no label list was given"
                            .to_string(),
                    ));
                }
                distinct.into_iter().cloned().collect()
            }
        };

        let domain = Self::check_domain(&labels, values)?;
        let coding = LabelCoding::build(labels)?;
        let coded = Self::encode(values, &coding)?;
        let palette = Self::build_palette(&coding, None);

        Ok(Self {
            name: None,
            domain,
            coding,
            coded,
            palette,
            missing_color: Color::default(),
        })
    }

    /// Record the source column name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Supply explicit label colors, validated as `[0, 1]` triples.
    pub fn with_colors(mut self, colors: &HashMap<Label, [f32; 3]>) -> CategoryResult<Self> {
        self.create_color_palette(Some(colors))?;
        Ok(self)
    }

    /// Override the color used for missing values.
    pub fn with_missing_color(mut self, color: Color) -> Self {
        self.missing_color = color;
        self
    }

    /// The labels must share one domain, and match the column's values.
    fn check_domain(labels: &[Label], values: &[Option<Label>]) -> CategoryResult<LabelDomain> {
        let mut domains = labels
            .iter()
            .chain(values.iter().flatten())
            .map(Label::domain);
        // check_domain is only called with a non-empty label list
        let first = domains.next().ok_or_else(|| {
            CategoryError::InvalidInput("label list must not be empty".to_string())
        })?;
        if domains.any(|d| d != first) {
            return Err(CategoryError::InvalidInput(
                "labels mix integer and text domains".to_string(),
            ));
        }
        Ok(first)
    }

    /// Encode a column through a coding; unmapped labels are collected
    /// into a `LabelListIncomplete` error.
    fn encode(values: &[Option<Label>], coding: &LabelCoding) -> CategoryResult<Vec<u16>> {
        let mut coded = Vec::with_capacity(values.len());
        let mut unmapped: Vec<Label> = Vec::new();
        for value in values {
            match value {
                None => coded.push(0),
                Some(label) => match coding.code_of(label) {
                    Some(code) => coded.push(code),
                    None => {
                        if !unmapped.contains(label) {
                            unmapped.push(label.clone());
                        }
                    }
                },
            }
        }
        if !unmapped.is_empty() {
            unmapped.sort();
            return Err(CategoryError::LabelListIncomplete { labels: unmapped });
        }
        Ok(coded)
    }

    /// Build a color per label in code order. `overrides` wins over the
    /// cyclic default palette.
    fn build_palette(coding: &LabelCoding, overrides: Option<&HashMap<Label, Color>>) -> Vec<Color> {
        coding
            .labels()
            .iter()
            .enumerate()
            .map(|(i, label)| {
                overrides
                    .and_then(|m| m.get(label).copied())
                    .unwrap_or_else(|| palette_color(i))
            })
            .collect()
    }

    /// Replace the label list, renumbering every row.
    ///
    /// Rows whose label survives keep their label under the new codes.
    /// Rows whose label is dropped become missing under
    /// [`MissingLabelPolicy::SetMissing`], or fail the call under
    /// [`MissingLabelPolicy::Error`]. Labels not previously seen are
    /// allowed and get fresh codes with no rows carrying them.
    ///
    /// Returns `true` if anything changed (an identical list is a no-op).
    pub fn set_label_list(
        &mut self,
        new_labels: Vec<Label>,
        on_missing: MissingLabelPolicy,
    ) -> CategoryResult<bool> {
        if new_labels == self.coding.labels() {
            return Ok(false);
        }

        let removed: Vec<Label> = self
            .coding
            .labels()
            .iter()
            .filter(|l| !new_labels.contains(l))
            .cloned()
            .collect();
        if removed.len() == self.coding.len() {
            return Err(CategoryError::AllLabelsRemoved);
        }
        if on_missing == MissingLabelPolicy::Error && !removed.is_empty() {
            return Err(CategoryError::LabelsMissing { labels: removed });
        }

        for label in &new_labels {
            if label.domain() != self.domain {
                return Err(CategoryError::InvalidInput(format!(
                    "label {} does not belong to the column's {:?} domain",
                    label, self.domain
                )));
            }
        }
        let new_coding = LabelCoding::build(new_labels)?;

        // Old code -> new code, with dropped labels going to 0.
        let mut remap = vec![0u16; self.coding.len() + 1];
        for (label, old_code) in self.coding.pairs() {
            remap[old_code as usize] = new_coding.code_of(&label).unwrap_or(0);
        }

        // Colors follow label identity, not list position.
        let carried: HashMap<Label, Color> = self
            .coding
            .labels()
            .iter()
            .cloned()
            .zip(self.palette.iter().copied())
            .collect();
        let palette = Self::build_palette(&new_coding, Some(&carried));

        for code in &mut self.coded {
            *code = remap[*code as usize];
        }
        self.coding = new_coding;
        self.palette = palette;
        Ok(true)
    }

    /// Replace the coded values wholesale.
    ///
    /// `label_list` re-validates the caller's view of the coding against
    /// races with a concurrent relabel. The buffer is moved in; a caller
    /// that wants to keep its copy clones before the call.
    pub fn set_coded_values(
        &mut self,
        new_codes: Vec<u16>,
        label_list: &[Label],
    ) -> CategoryResult<()> {
        if label_list != self.coding.labels() {
            return Err(CategoryError::LabelListMismatch);
        }
        if new_codes.len() != self.coded.len() {
            return Err(CategoryError::ShapeMismatch {
                expected: self.coded.len(),
                actual: new_codes.len(),
            });
        }
        let max = self.coding.len() as u16;
        if let Some(&code) = new_codes.iter().find(|&&c| c > max) {
            return Err(CategoryError::OutOfRange { code, max });
        }
        self.coded = new_codes;
        Ok(())
    }

    /// Recompute the palette deterministically, as at construction.
    pub fn create_color_palette(
        &mut self,
        explicit: Option<&HashMap<Label, [f32; 3]>>,
    ) -> CategoryResult<()> {
        let overrides = match explicit {
            None => None,
            Some(map) => {
                let mut validated = HashMap::with_capacity(map.len());
                for label in self.coding.labels() {
                    if let Some(&rgb) = map.get(label) {
                        validated.insert(
                            label.clone(),
                            Color::try_rgb(&label.to_string(), rgb)?,
                        );
                    }
                }
                Some(validated)
            }
        };
        self.palette = Self::build_palette(&self.coding, overrides.as_ref());
        Ok(())
    }

    /// Row count, fixed for the category's lifetime.
    pub fn num_values(&self) -> usize {
        self.coded.len()
    }

    /// Rows currently coded missing (code 0).
    pub fn num_unassigned(&self) -> usize {
        self.coded.iter().filter(|&&code| code == 0).count()
    }

    /// Coded values, one `u16` per row, 0 = missing.
    pub fn coded_values(&self) -> &[u16] {
        &self.coded
    }

    /// Labels in code order.
    pub fn label_list(&self) -> &[Label] {
        self.coding.labels()
    }

    pub fn coding(&self) -> &LabelCoding {
        &self.coding
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn domain(&self) -> LabelDomain {
        self.domain
    }

    /// Colors in code order (`colors()[code - 1]`).
    pub fn colors(&self) -> &[Color] {
        &self.palette
    }

    /// The color for a label, if it is part of the coding.
    pub fn color_of(&self, label: &Label) -> Option<Color> {
        self.coding
            .code_of(label)
            .map(|code| self.palette[code as usize - 1])
    }

    /// The color for a code, including 0 -> missing color.
    pub fn color_of_code(&self, code: u16) -> CategoryResult<Color> {
        if code == 0 {
            return Ok(self.missing_color);
        }
        self.coding.label_of(code)?;
        Ok(self.palette[code as usize - 1])
    }

    pub fn missing_color(&self) -> Color {
        self.missing_color
    }

    /// Decode one row back into the label domain (`None` = missing).
    pub fn value_at(&self, row: usize) -> CategoryResult<Option<&Label>> {
        let code = *self.coded.get(row).ok_or_else(|| {
            CategoryError::InvalidInput(format!(
                "row {} out of range for {} values",
                row,
                self.coded.len()
            ))
        })?;
        if code == 0 {
            return Ok(None);
        }
        Ok(Some(self.coding.label_of(code)?))
    }

    /// Decode the whole column back into the label domain.
    pub fn decoded_values(&self) -> Vec<Option<&Label>> {
        self.coded
            .iter()
            .map(|&code| {
                if code == 0 {
                    None
                } else {
                    self.coding.label_of(code).ok()
                }
            })
            .collect()
    }
}
