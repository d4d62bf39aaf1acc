//! Sync bridge: keeps the wire buffers the renderer reads consistent
//! with the live category state.
//!
//! [`ScatterModel`] owns the point geometry, holds the shared
//! [`CategoryHandle`], and derives every externally-visible buffer from
//! them. A change subscription marks the derived state dirty; all buffers
//! are recomputed together before the next read, so a consumer never
//! observes a half-updated set.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use ndarray::Array2;

use impoint_core::{CategoryHandle, SubscriptionId};
use impoint_wire::{pack_codes, pack_geometry, CodeWidth};

use crate::error::{SyncError, SyncResult};

/// The buffers exposed to the rendering surface, byte-exact.
#[derive(Debug, Clone, PartialEq)]
pub struct WireBuffers {
    /// `f32[N * 3]`, row-major, little-endian.
    pub geometry_bytes: Vec<u8>,
    /// `u16[N]`, little-endian, 0 = missing.
    pub code_bytes: Vec<u8>,
    /// Labels as UTF-8 strings, index = code - 1.
    pub labels: Vec<String>,
    /// `[r, g, b]` per label, index = code - 1.
    pub colors: Vec<[f32; 3]>,
    /// `[r, g, b]` for code 0.
    pub missing_color: [f32; 3],
}

/// Geometry plus category, with derived wire buffers.
pub struct ScatterModel {
    geometry: Array2<f32>,
    category: CategoryHandle,
    subscription: SubscriptionId,
    dirty: Rc<Cell<bool>>,
    pending_mask: Option<String>,
    buffers: WireBuffers,
}

impl ScatterModel {
    /// Bind an N x 3 geometry to a category with N values.
    pub fn new(geometry: Array2<f32>, category: CategoryHandle) -> SyncResult<Self> {
        check_binding(&geometry, &category)?;

        let buffers = derive_buffers(&geometry, &category)?;
        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        let subscription = category.subscribe(move |_| flag.set(true));

        Ok(Self {
            geometry,
            category,
            subscription,
            dirty,
            pending_mask: None,
            buffers,
        })
    }

    /// The derived buffers, re-deriving first if the category changed.
    pub fn buffers(&mut self) -> SyncResult<&WireBuffers> {
        self.refresh()?;
        Ok(&self.buffers)
    }

    /// Re-derive the buffers if marked dirty. Returns `true` if work was
    /// done.
    pub fn refresh(&mut self) -> SyncResult<bool> {
        if !self.dirty.get() {
            return Ok(false);
        }
        self.buffers = derive_buffers(&self.geometry, &self.category)?;
        self.dirty.set(false);
        tracing::debug!(
            "re-derived wire buffers for {} points, {} labels",
            self.geometry.nrows(),
            self.buffers.labels.len()
        );
        Ok(true)
    }

    /// Replace the geometry wholesale.
    pub fn set_geometry(&mut self, geometry: Array2<f32>) -> SyncResult<()> {
        check_binding(&geometry, &self.category)?;
        self.geometry = geometry;
        self.dirty.set(true);
        self.refresh()?;
        Ok(())
    }

    /// Rebind to a different category, dropping the old subscription.
    pub fn set_category(&mut self, category: CategoryHandle) -> SyncResult<()> {
        check_binding(&self.geometry, &category)?;

        self.category.unsubscribe(self.subscription);
        let flag = Rc::clone(&self.dirty);
        self.subscription = category.subscribe(move |_| flag.set(true));
        self.category = category;
        self.dirty.set(true);
        self.refresh()?;
        Ok(())
    }

    /// Store the renderer's packed selection mask (base64) for the next
    /// edit request.
    pub fn set_selection_mask(&mut self, mask_b64: impl Into<String>) {
        self.pending_mask = Some(mask_b64.into());
    }

    /// The stored mask, left in place for the next request.
    pub(crate) fn selection_mask(&self) -> Option<&str> {
        self.pending_mask.as_deref()
    }

    /// Take the stored mask; consumed by one applied request.
    pub(crate) fn take_selection_mask(&mut self) -> Option<String> {
        self.pending_mask.take()
    }

    pub fn category(&self) -> &CategoryHandle {
        &self.category
    }

    pub fn geometry(&self) -> &Array2<f32> {
        &self.geometry
    }

    pub fn num_points(&self) -> usize {
        self.geometry.nrows()
    }
}

impl fmt::Debug for ScatterModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScatterModel")
            .field("num_points", &self.geometry.nrows())
            .field("dirty", &self.dirty.get())
            .field("pending_mask", &self.pending_mask.is_some())
            .field("buffers", &self.buffers)
            .finish_non_exhaustive()
    }
}

impl Drop for ScatterModel {
    fn drop(&mut self) {
        self.category.unsubscribe(self.subscription);
    }
}

fn check_binding(geometry: &Array2<f32>, category: &CategoryHandle) -> SyncResult<()> {
    if geometry.ncols() != 3 {
        return Err(impoint_wire::WireError::Shape {
            rows: geometry.nrows(),
            cols: geometry.ncols(),
        }
        .into());
    }
    let values = category.with(|c| c.num_values());
    if geometry.nrows() != values {
        return Err(SyncError::SizeMismatch {
            points: geometry.nrows(),
            values,
        });
    }
    Ok(())
}

fn derive_buffers(geometry: &Array2<f32>, category: &CategoryHandle) -> SyncResult<WireBuffers> {
    let category = category.read();
    Ok(WireBuffers {
        geometry_bytes: pack_geometry(geometry.view())?,
        code_bytes: pack_codes(category.coded_values(), CodeWidth::U16)?,
        labels: category.label_list().iter().map(|l| l.to_string()).collect(),
        colors: category.colors().iter().map(|c| c.to_array()).collect(),
        missing_color: category.missing_color().to_array(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use impoint_core::{Category, Label, MissingLabelPolicy};
    use ndarray::array;

    fn country_handle() -> CategoryHandle {
        let values = vec![
            Some(Label::from("Spain")),
            Some(Label::from("Italy")),
            None,
            Some(Label::from("Spain")),
        ];
        CategoryHandle::new(
            Category::from_values(
                &values,
                Some(vec![Label::from("Italy"), Label::from("Spain")]),
            )
            .unwrap(),
        )
    }

    fn zeros(n: usize) -> Array2<f32> {
        Array2::zeros((n, 3))
    }

    #[test]
    fn new_rejects_row_count_mismatch() {
        let err = ScatterModel::new(zeros(3), country_handle()).unwrap_err();
        assert!(matches!(
            err,
            SyncError::SizeMismatch {
                points: 3,
                values: 4
            }
        ));
    }

    #[test]
    fn new_rejects_non_three_column_geometry() {
        let geometry = Array2::<f32>::zeros((4, 2));
        assert!(matches!(
            ScatterModel::new(geometry, country_handle()),
            Err(SyncError::Wire(_))
        ));
    }

    #[test]
    fn buffers_reflect_category_state() {
        let mut model = ScatterModel::new(zeros(4), country_handle()).unwrap();
        let buffers = model.buffers().unwrap();

        assert_eq!(buffers.labels, vec!["Italy", "Spain"]);
        assert_eq!(buffers.geometry_bytes.len(), 48);
        // Spain=2, Italy=1, missing=0, Spain=2 as little-endian u16
        assert_eq!(buffers.code_bytes, vec![2, 0, 1, 0, 0, 0, 2, 0]);
        assert_eq!(buffers.colors.len(), 2);
        assert_eq!(buffers.missing_color, [0.5, 0.5, 0.5]);
    }

    #[test]
    fn geometry_bytes_pack_converted_float32() {
        let geometry = array![[1.0f32, 2.0, 3.0], [4.5, 5.5, 6.5]];
        let values = vec![Some(Label::from(1)), Some(Label::from(1))];
        let handle = CategoryHandle::new(Category::from_values(&values, None).unwrap());

        let mut model = ScatterModel::new(geometry, handle).unwrap();
        let mut expected = Vec::new();
        for v in [1.0f32, 2.0, 3.0, 4.5, 5.5, 6.5] {
            expected.extend_from_slice(&v.to_le_bytes());
        }
        assert_eq!(model.buffers().unwrap().geometry_bytes, expected);
    }

    #[test]
    fn relabeling_rederives_code_bytes() {
        let handle = country_handle();
        let mut model = ScatterModel::new(zeros(4), handle.clone()).unwrap();
        model.buffers().unwrap();

        handle
            .set_label_list(
                vec![Label::from("Spain"), Label::from("Italy")],
                MissingLabelPolicy::Error,
            )
            .unwrap();

        let buffers = model.buffers().unwrap();
        assert_eq!(buffers.labels, vec!["Spain", "Italy"]);
        assert_eq!(buffers.code_bytes, vec![1, 0, 2, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn refresh_is_noop_when_clean() {
        let mut model = ScatterModel::new(zeros(4), country_handle()).unwrap();
        assert!(!model.refresh().unwrap());

        let handle = model.category().clone();
        let labels = handle.with(|c| c.label_list().to_vec());
        handle.set_coded_values(vec![1, 1, 1, 1], &labels).unwrap();
        assert!(model.refresh().unwrap());
        assert!(!model.refresh().unwrap());
    }

    #[test]
    fn set_geometry_validates_before_replacing() {
        let mut model = ScatterModel::new(zeros(4), country_handle()).unwrap();
        assert!(model.set_geometry(zeros(5)).is_err());
        assert_eq!(model.num_points(), 4);

        let replacement = Array2::from_elem((4, 3), 1.0f32);
        model.set_geometry(replacement).unwrap();
        assert_eq!(model.buffers().unwrap().geometry_bytes.len(), 48);
    }

    #[test]
    fn rebinding_drops_the_old_subscription() {
        let first = country_handle();
        let second = country_handle();
        let mut model = ScatterModel::new(zeros(4), first.clone()).unwrap();
        assert_eq!(first.num_subscribers(), 1);

        model.set_category(second.clone()).unwrap();
        assert_eq!(first.num_subscribers(), 0);
        assert_eq!(second.num_subscribers(), 1);

        // mutations on the old category no longer dirty the model
        let labels = first.with(|c| c.label_list().to_vec());
        first.set_coded_values(vec![1, 1, 1, 1], &labels).unwrap();
        assert!(!model.refresh().unwrap());
    }

    #[test]
    fn rebind_size_mismatch_leaves_binding_intact() {
        let first = country_handle();
        let mut model = ScatterModel::new(zeros(4), first.clone()).unwrap();

        let short = CategoryHandle::new(
            Category::from_values(&[Some(Label::from("a"))], None).unwrap(),
        );
        assert!(model.set_category(short).is_err());
        assert_eq!(first.num_subscribers(), 1);
    }

    #[test]
    fn model_debug_output_is_renderable() {
        let model = ScatterModel::new(zeros(4), country_handle()).unwrap();
        let dump = format!("{model:?}");
        assert!(dump.contains("num_points: 4"));
    }

    #[test]
    fn drop_unsubscribes() {
        let handle = country_handle();
        {
            let _model = ScatterModel::new(zeros(4), handle.clone()).unwrap();
            assert_eq!(handle.num_subscribers(), 1);
        }
        assert_eq!(handle.num_subscribers(), 0);
    }
}
