//! End-to-end widget scenarios: construct a model, read its wire
//! buffers, renumber labels, and commit lasso edits through the JSON
//! request surface.

use base64::{engine::general_purpose::STANDARD, Engine};
use ndarray::Array2;

use impoint_core::{Category, CategoryHandle, Label, MissingLabelPolicy};
use impoint_wire::pack_selection_mask;
use impoint_widget::{EditStatus, ScatterModel};

fn country_model() -> ScatterModel {
    let values = vec![
        Some(Label::from("Spain")),
        Some(Label::from("Italy")),
        None,
        Some(Label::from("Spain")),
    ];
    let category = Category::from_values(
        &values,
        Some(vec![Label::from("Italy"), Label::from("Spain")]),
    )
    .unwrap()
    .with_name("country");

    ScatterModel::new(Array2::zeros((4, 3)), CategoryHandle::new(category)).unwrap()
}

fn mask_b64(indices: &[usize], n: usize) -> String {
    let mut bits = vec![false; n];
    for &i in indices {
        bits[i] = true;
    }
    STANDARD.encode(pack_selection_mask(&bits))
}

fn decode_u16(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect()
}

#[test]
fn buffers_expose_codes_and_labels() {
    let mut model = country_model();
    let buffers = model.buffers().unwrap();

    assert_eq!(buffers.labels, vec!["Italy", "Spain"]);
    assert_eq!(decode_u16(&buffers.code_bytes), vec![2, 1, 0, 2]);
    assert_eq!(buffers.geometry_bytes.len(), 4 * 12);
}

#[test]
fn relabeling_updates_buffers() {
    let mut model = country_model();
    model.buffers().unwrap();

    model
        .category()
        .set_label_list(
            vec![Label::from("Spain"), Label::from("Italy")],
            MissingLabelPolicy::Error,
        )
        .unwrap();

    let buffers = model.buffers().unwrap();
    assert_eq!(buffers.labels, vec!["Spain", "Italy"]);
    assert_eq!(decode_u16(&buffers.code_bytes), vec![1, 2, 0, 1]);
}

#[test]
fn lasso_add_through_json_request() {
    let mut model = country_model();
    model.set_selection_mask(mask_b64(&[1, 2], 4));

    let result = model.handle_request_json(
        r#"{"kind":"lasso_commit","op":"add","label":"Spain","request_id":1}"#,
    );

    assert_eq!(result.status, EditStatus::Ok);
    assert_eq!(result.request_id, 1);
    assert_eq!(result.num_selected, Some(2));
    assert_eq!(result.num_changed, Some(2));
    assert_eq!(
        decode_u16(&model.buffers().unwrap().code_bytes),
        vec![2, 2, 2, 2]
    );
}

#[test]
fn lasso_remove_through_json_request() {
    let mut model = country_model();
    model.set_selection_mask(mask_b64(&[0, 1, 3], 4));

    let result = model.handle_request_json(
        r#"{"kind":"lasso_commit","op":"remove","label":"Spain","request_id":2}"#,
    );

    assert_eq!(result.status, EditStatus::Ok);
    assert_eq!(
        decode_u16(&model.buffers().unwrap().code_bytes),
        vec![0, 1, 0, 0]
    );
}

#[test]
fn short_mask_errors_and_leaves_buffers_unchanged() {
    let mut model = country_model();
    let before = model.buffers().unwrap().clone();

    model.set_selection_mask(""); // zero bytes, N=4 needs one
    let result = model.handle_request_json(
        r#"{"kind":"lasso_commit","op":"add","label":"Spain","request_id":3}"#,
    );

    assert_eq!(result.status, EditStatus::Error);
    assert_eq!(model.buffers().unwrap(), &before);
}

#[test]
fn unknown_label_errors_and_leaves_buffers_unchanged() {
    let mut model = country_model();
    let before = model.buffers().unwrap().clone();

    model.set_selection_mask(mask_b64(&[0, 1], 4));
    let result = model.handle_request_json(
        r#"{"kind":"lasso_commit","op":"add","label":"Portugal","request_id":4}"#,
    );

    assert_eq!(result.status, EditStatus::Error);
    assert_eq!(result.request_id, 4);
    assert_eq!(model.buffers().unwrap(), &before);
}

#[test]
fn rejected_request_keeps_the_mask_for_resubmission() {
    let mut model = country_model();
    model.set_selection_mask(mask_b64(&[1, 2], 4));

    let rejected = model.handle_request_json(
        r#"{"kind":"lasso_commit","op":"add","label":"Portugal","request_id":8}"#,
    );
    assert_eq!(rejected.status, EditStatus::Error);

    // the corrected request reuses the same selection
    let corrected = model.handle_request_json(
        r#"{"kind":"lasso_commit","op":"add","label":"Spain","request_id":9}"#,
    );
    assert_eq!(corrected.status, EditStatus::Ok);
    assert_eq!(corrected.num_selected, Some(2));
    assert_eq!(corrected.num_changed, Some(2));
    assert_eq!(
        decode_u16(&model.buffers().unwrap().code_bytes),
        vec![2, 2, 2, 2]
    );
}

#[test]
fn mask_is_consumed_by_one_request() {
    let mut model = country_model();
    model.set_selection_mask(mask_b64(&[1, 2], 4));

    let first = model.handle_request_json(
        r#"{"kind":"lasso_commit","op":"add","label":"Spain","request_id":5}"#,
    );
    assert_eq!(first.status, EditStatus::Ok);

    // no mask stored anymore
    let second = model.handle_request_json(
        r#"{"kind":"lasso_commit","op":"add","label":"Spain","request_id":6}"#,
    );
    assert_eq!(second.status, EditStatus::Error);
    assert_eq!(second.request_id, 6);
}

#[test]
fn malformed_request_salvages_the_request_id() {
    let mut model = country_model();
    let result = model.handle_request_json(r#"{"request_id": 9, "op": "explode"}"#);
    assert_eq!(result.status, EditStatus::Error);
    assert_eq!(result.request_id, 9);

    let result = model.handle_request_json("not json at all");
    assert_eq!(result.status, EditStatus::Error);
    assert_eq!(result.request_id, 0);
}

#[test]
fn result_serializes_to_the_protocol_shape() {
    let mut model = country_model();
    model.set_selection_mask(mask_b64(&[1], 4));
    let result = model.handle_request_json(
        r#"{"kind":"lasso_commit","op":"add","label":"Italy","request_id":7}"#,
    );

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "request_id": 7,
            "status": "ok",
            "num_selected": 1,
            "num_changed": 0
        })
    );
}
