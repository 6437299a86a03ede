use crate::*;

use runwire_core::{from_wire_form, split, to_wire_fields, to_wire_form, ByteStream, FileDescriptor};
use serde_json::{json, Value};

/// Scalars and containers with no binary content survive the outbound pass
/// untouched.
#[tokio::test]
async fn test_scalar_trees_are_fixed_points() {
    let samples = [
        json!(null),
        json!(true),
        json!(-12.5),
        json!("text"),
        json!([]),
        json!({}),
        json!({"a": [1, {"b": [null, false, "c"]}], "d": {"e": {}}}),
    ];
    for sample in samples {
        let tree = DataTree::from(sample);
        assert_eq!(to_wire_form(&tree).await.unwrap(), tree);
    }
}

/// One buffer plus N scalars: `data` decodes to exactly the scalars and
/// `file` carries the original bytes.
#[tokio::test]
async fn test_split_roundtrip() {
    let image = jpeg_fixture();
    for n in 0..4usize {
        let mut pairs: Vec<(String, DataTree)> = (0..n)
            .map(|i| (format!("k{i}"), DataTree::from(i as i64)))
            .collect();
        pairs.insert(n / 2, ("upload".to_string(), image.clone().into()));
        let map: Fields = pairs.into_iter().collect();

        let tuple = split(&to_wire_fields(&map).await.unwrap()).unwrap();
        let data: Value = serde_json::from_str(&tuple.data).unwrap();
        let expected: serde_json::Map<String, Value> =
            (0..n).map(|i| (format!("k{i}"), json!(i))).collect();
        assert_eq!(data, Value::Object(expected));
        assert_eq!(tuple.file.unwrap().payload.as_bytes(), &image[..]);
    }
}

/// Outbound output serialized to JSON decodes back to the same descriptors.
#[tokio::test]
async fn test_outbound_then_inbound() {
    let image = jpeg_fixture();
    let tree = DataTree::Object(fields(vec![
        ("name", "cat".into()),
        ("photo", ByteStream::from_reader(std::io::Cursor::new(image.to_vec())).into()),
        ("thumbs", DataTree::Array(vec![png_fixture().into()])),
    ]));

    let wire = to_wire_form(&tree).await.unwrap();
    let text = serde_json::to_string(&wire).unwrap();
    let back = from_wire_form(&text).unwrap();

    assert_eq!(back.get("name"), Some(&DataTree::from("cat")));
    // A descriptor serializes as {payload, type}; the payload marker is
    // rebuilt in place and the tag string stays a plain string.
    let photo = back.get("photo").unwrap();
    let payload = photo.get("payload").and_then(DataTree::as_file).unwrap();
    assert_eq!(payload, &FileDescriptor::new(image.clone().into()));
    assert_eq!(photo.get("type"), Some(&DataTree::from("jpg")));
}
