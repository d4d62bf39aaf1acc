//! impoint-widget - Widget-facing model for the 3D scatter surface
//!
//! Glues a point geometry and a shared category into the byte-exact
//! buffers a rendering surface consumes, and handles the lasso edit
//! requests it produces:
//!
//! - **ScatterModel**: geometry + category binding with derived wire
//!   buffers, kept consistent through change subscriptions
//! - **EditRequest / EditResult**: the request/result protocol for
//!   committing a selection-based edit
//!
//! The flow is synchronous and strictly ordered: host code constructs
//! geometry and a category, the model derives buffers, the renderer
//! later stores a selection mask and submits a request, the edit commits
//! through the category, and the buffers re-derive.

pub mod bridge;
pub mod edit;
pub mod error;

pub use bridge::{ScatterModel, WireBuffers};
pub use edit::{
    apply_lasso, EditOp, EditRequest, EditResult, EditStatus, LASSO_COMMIT_KIND,
};
pub use error::{EditError, SyncError, SyncResult};
