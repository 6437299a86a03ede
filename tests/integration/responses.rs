use crate::*;

use runwire_core::{classify, from_wire_form, from_wire_value, BinaryLeaf, TranscodeError, TypeTag};
use serde_json::json;

#[test]
fn test_string_response() {
    assert_eq!(from_wire_form("test").unwrap(), DataTree::from("test"));
}

#[test]
fn test_number_response() {
    assert_eq!(from_wire_form("1").unwrap(), DataTree::from(1i64));
    assert_eq!(from_wire_value(json!(1)).unwrap(), DataTree::from(1i64));
}

#[test]
fn test_object_response() {
    let body = json!({"test": 1});
    assert_eq!(from_wire_form(&body.to_string()).unwrap(), DataTree::from(body));
}

#[test]
fn test_buffer_response() {
    let body = serde_json::to_string(&BinaryLeaf::new(&b"test"[..])).unwrap();
    let parsed = from_wire_form(&body).unwrap();
    let file = parsed.as_file().unwrap();
    assert_eq!(file.payload.as_bytes(), b"test");
    assert_eq!(file.type_tag, TypeTag::String);
}

#[test]
fn test_local_file_response() {
    let image = jpeg_fixture();
    let body = serde_json::to_string(&BinaryLeaf::new(image.clone())).unwrap();
    let parsed = from_wire_form(&body).unwrap();
    let file = parsed.as_file().unwrap();
    assert_eq!(file.type_tag, TypeTag::Jpg);
    assert_eq!(file.payload.as_bytes(), &image[..]);
}

#[test]
fn test_nested_buffer_response() {
    let image = jpeg_fixture();
    let body = serde_json::to_string(&DataTree::Object(fields(vec![
        (
            "file",
            DataTree::Object(fields(vec![
                ("test", 1i64.into()),
                ("file", image.clone().into()),
            ])),
        ),
        ("width", 100i64.into()),
    ])))
    .unwrap();

    let parsed = from_wire_form(&body).unwrap();
    let inner = parsed.get("file").unwrap();
    let file = inner.get("file").and_then(DataTree::as_file).unwrap();
    assert_eq!(file.type_tag, TypeTag::Jpg);
    assert_eq!(file.payload.as_bytes(), &image[..]);
    assert_eq!(inner.get("test"), Some(&DataTree::from(1i64)));
    assert_eq!(parsed.get("width"), Some(&DataTree::from(100i64)));
}

#[test]
fn test_tag_agrees_with_sniffer() {
    for data in [jpeg_fixture(), png_fixture(), Bytes::from_static(b"GIF89a..")] {
        let body = serde_json::to_string(&BinaryLeaf::new(data.clone())).unwrap();
        let parsed = from_wire_form(&body).unwrap();
        assert_eq!(parsed.as_file().unwrap().type_tag, classify(&data));
    }
}

#[test]
fn test_malformed_marker_reports_path() {
    let body = json!({"results": [{"ok": true}, {"type": "Buffer", "data": [12, 300]}]});
    match from_wire_value(body) {
        Err(TranscodeError::MalformedMarker { path, .. }) => assert_eq!(path, "/results/1"),
        other => panic!("expected malformed marker, got {other:?}"),
    }
}

#[test]
fn test_invalid_json_passes_through() {
    let body = "{\"truncated\": ";
    assert_eq!(from_wire_form(body).unwrap(), DataTree::from(body));
}
