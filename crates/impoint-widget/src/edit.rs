//! Lasso edit protocol: validate and apply a selection-based category
//! edit, producing a structured result.
//!
//! A request either fully applies or is fully rejected; every validation
//! failure short-circuits to an error result and leaves the category
//! untouched. Requests are processed synchronously in arrival order, and
//! the result always echoes the request id.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use impoint_core::{CategoryHandle, Label};
use impoint_wire::unpack_selection_mask;

use crate::bridge::ScatterModel;
use crate::error::EditError;

/// The one request kind the protocol accepts.
pub const LASSO_COMMIT_KIND: &str = "lasso_commit";

/// What a lasso edit does to the selected rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditOp {
    /// Assign the target code to every selected row.
    Add,
    /// Reset selected rows currently carrying the target code to missing.
    Remove,
}

/// An incoming edit request, paired with the stored selection mask.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRequest {
    pub kind: String,
    pub request_id: u64,
    pub op: EditOp,
    /// Target label; ignored when `code` is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    /// Explicit target code; takes precedence over `label`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl EditRequest {
    /// An add request targeting a label.
    pub fn add(request_id: u64, label: impl Into<Label>) -> Self {
        Self {
            kind: LASSO_COMMIT_KIND.to_string(),
            request_id,
            op: EditOp::Add,
            label: Some(label.into()),
            code: None,
        }
    }

    /// A remove request targeting a label.
    pub fn remove(request_id: u64, label: impl Into<Label>) -> Self {
        Self {
            kind: LASSO_COMMIT_KIND.to_string(),
            request_id,
            op: EditOp::Remove,
            label: Some(label.into()),
            code: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditStatus {
    Ok,
    Error,
}

/// The outcome reported back to the requesting surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditResult {
    pub request_id: u64,
    pub status: EditStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_selected: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_changed: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EditResult {
    fn ok(request_id: u64, num_selected: usize, num_changed: usize) -> Self {
        Self {
            request_id,
            status: EditStatus::Ok,
            num_selected: Some(num_selected),
            num_changed: Some(num_changed),
            message: None,
        }
    }

    fn error(request_id: u64, message: impl Into<String>) -> Self {
        Self {
            request_id,
            status: EditStatus::Error,
            num_selected: None,
            num_changed: None,
            message: Some(message.into()),
        }
    }
}

/// Apply a lasso edit to a shared category.
///
/// `mask_b64` is the base64-encoded packed selection mask. The commit
/// goes through `set_coded_values`, so subscribers (and any bound
/// [`ScatterModel`]) see exactly one change notification per applied
/// request.
pub fn apply_lasso(
    category: &CategoryHandle,
    request: &EditRequest,
    mask_b64: Option<&str>,
) -> EditResult {
    match try_apply(category, request, mask_b64) {
        Ok((num_selected, num_changed)) => {
            tracing::debug!(
                "lasso request {} applied: {} selected, {} changed",
                request.request_id,
                num_selected,
                num_changed
            );
            EditResult::ok(request.request_id, num_selected, num_changed)
        }
        Err(err) => {
            tracing::warn!("lasso request {} rejected: {}", request.request_id, err);
            EditResult::error(request.request_id, err.to_string())
        }
    }
}

fn try_apply(
    category: &CategoryHandle,
    request: &EditRequest,
    mask_b64: Option<&str>,
) -> Result<(usize, usize), EditError> {
    if request.kind != LASSO_COMMIT_KIND {
        return Err(EditError::UnsupportedKind(request.kind.clone()));
    }
    let mask_b64 = mask_b64.ok_or(EditError::MissingMask)?;
    let mask_bytes = STANDARD
        .decode(mask_b64)
        .map_err(|e| EditError::MaskEncoding(e.to_string()))?;

    // Validate everything against a read snapshot before mutating.
    let (mut codes, label_list, target, bits) = {
        let cat = category.read();
        let max = cat.label_list().len() as u16;

        let target = match (request.code, &request.label) {
            (Some(0), _) if request.op == EditOp::Add => return Err(EditError::ReservedCode),
            (Some(code), _) if code > max => return Err(EditError::UnknownCode { code, max }),
            (Some(code), _) => code,
            (None, Some(label)) => cat
                .coding()
                .code_of(label)
                .ok_or_else(|| EditError::UnknownLabel(label.clone()))?,
            (None, None) => return Err(EditError::MissingTarget),
        };

        let bits = unpack_selection_mask(&mask_bytes, cat.num_values())?;
        (
            cat.coded_values().to_vec(),
            cat.label_list().to_vec(),
            target,
            bits,
        )
    };

    let num_selected = bits.iter().filter(|&&b| b).count();
    let mut num_changed = 0;
    match request.op {
        EditOp::Add => {
            for (code, &selected) in codes.iter_mut().zip(&bits) {
                if selected && *code != target {
                    *code = target;
                    num_changed += 1;
                }
            }
        }
        EditOp::Remove => {
            for (code, &selected) in codes.iter_mut().zip(&bits) {
                // target 0 matches only already-missing rows: nothing to do
                if selected && *code == target && *code != 0 {
                    *code = 0;
                    num_changed += 1;
                }
            }
        }
    }

    category.set_coded_values(codes, &label_list)?;
    Ok((num_selected, num_changed))
}

impl ScatterModel {
    /// Commit a lasso edit against the stored selection mask.
    ///
    /// The mask is consumed once a request applies; a rejected request
    /// leaves it stored, so the caller may resubmit a corrected request
    /// against the same selection.
    pub fn commit_lasso(&mut self, request: &EditRequest) -> EditResult {
        let result = apply_lasso(self.category(), request, self.selection_mask());
        if result.status == EditStatus::Ok {
            self.take_selection_mask();
        }
        result
    }

    /// Handle a JSON-encoded edit request.
    ///
    /// Salvages the request id from malformed payloads where possible so
    /// the error result can still be routed.
    pub fn handle_request_json(&mut self, json: &str) -> EditResult {
        let value: serde_json::Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(err) => return EditResult::error(0, format!("malformed request: {err}")),
        };
        let request_id = value
            .get("request_id")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0);
        match serde_json::from_value::<EditRequest>(value) {
            Ok(request) => self.commit_lasso(&request),
            Err(err) => EditResult::error(request_id, format!("malformed request: {err}")),
        }
    }
}
