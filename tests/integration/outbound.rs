use crate::*;

use futures::stream;
use runwire_core::{
    split, to_wire_fields, to_wire_form, BinaryLeaf, ByteStream, TranscodeError, TypeTag,
};
use serde_json::json;

#[tokio::test]
async fn test_file_stream_becomes_descriptor() {
    let image = jpeg_fixture();
    let path = temp_file("stream.jpg", &image);

    let file = tokio::fs::File::open(&path).await.unwrap();
    let data = DataTree::Object(fields(vec![("image", ByteStream::from_reader(file).into())]));
    let parsed = to_wire_form(&data).await.unwrap();

    let descriptor = parsed.get("image").and_then(DataTree::as_file).unwrap();
    assert_eq!(descriptor.type_tag, TypeTag::Jpg);
    assert_eq!(descriptor.payload.as_bytes(), &image[..]);

    // Serialized form matches the buffer's own wire encoding.
    let wire = serde_json::to_value(&parsed).unwrap();
    let expected = serde_json::to_value(BinaryLeaf::new(image.clone())).unwrap();
    assert_eq!(wire["image"]["payload"], expected);
    assert_eq!(wire["image"]["type"], "jpg");

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_buffer_becomes_descriptor() {
    let data = DataTree::Object(fields(vec![("image", jpeg_fixture().into())]));
    let parsed = to_wire_form(&data).await.unwrap();
    assert_eq!(
        serde_json::to_value(&parsed).unwrap()["image"]["type"],
        json!("jpg")
    );
}

#[tokio::test]
async fn test_other_types_left_alone() {
    let data = DataTree::from(json!({"a": 1, "b": 2}));
    assert_eq!(to_wire_form(&data).await.unwrap(), data);
}

#[tokio::test]
async fn test_original_left_unmodified() {
    let data = DataTree::Object(fields(vec![
        ("image", jpeg_fixture().into()),
        ("nested", DataTree::from(json!({"list": [1, 2, {"deep": true}]}))),
    ]));
    let original = data.clone();
    to_wire_form(&data).await.unwrap();
    assert_eq!(data, original);
}

#[tokio::test]
async fn test_several_streams_keep_their_keys() {
    let image = jpeg_fixture();
    let logo = png_fixture();
    let data = fields(vec![
        ("first", ByteStream::from_reader(std::io::Cursor::new(image.to_vec())).into()),
        (
            "second",
            ByteStream::from_chunks(stream::iter(
                logo.chunks(3)
                    .map(|c| Ok(Bytes::copy_from_slice(c)))
                    .collect::<Vec<std::io::Result<Bytes>>>(),
            ))
            .into(),
        ),
        ("third", "plain".into()),
    ]);

    let parsed = to_wire_fields(&data).await.unwrap();
    let first = parsed["first"].as_file().unwrap();
    let second = parsed["second"].as_file().unwrap();
    assert_eq!((first.type_tag, first.payload.as_bytes()), (TypeTag::Jpg, &image[..]));
    assert_eq!((second.type_tag, second.payload.as_bytes()), (TypeTag::Png, &logo[..]));
    assert_eq!(parsed["third"], DataTree::from("plain"));
}

#[tokio::test]
async fn test_drain_failure_surfaces_field_path() {
    let broken = ByteStream::from_chunks(stream::iter(vec![Err(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        "truncated upload",
    ))]));
    let data = fields(vec![("width", 100i64.into()), ("image", broken.into())]);
    match to_wire_fields(&data).await {
        Err(TranscodeError::Drain { path, .. }) => assert_eq!(path, "/image"),
        other => panic!("expected drain failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_split_after_transcode() {
    let image = jpeg_fixture();
    let data = fields(vec![
        ("width", 100i64.into()),
        ("image", ByteStream::from_reader(std::io::Cursor::new(image.to_vec())).into()),
        ("height", 200i64.into()),
    ]);
    let tuple = split(&to_wire_fields(&data).await.unwrap()).unwrap();

    assert_eq!(tuple.data, r#"{"width":100,"height":200}"#);
    let part = tuple.file.unwrap();
    assert_eq!(part.field, "image");
    assert_eq!(part.file_name(), "image.jpg");
    assert_eq!(part.type_tag.mime(), "image/jpeg");
    assert_eq!(part.payload.as_bytes(), &image[..]);
}

#[tokio::test]
async fn test_split_rejects_two_files() {
    let data = fields(vec![("a", jpeg_fixture().into()), ("b", png_fixture().into())]);
    let err = split(&to_wire_fields(&data).await.unwrap()).unwrap_err();
    assert!(matches!(err, TranscodeError::MultipleBinaryFields { .. }));
}
