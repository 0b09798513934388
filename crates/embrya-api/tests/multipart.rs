use embrya_api::multipart::{content_type_for_extension, MultipartForm};

#[test]
fn form_encodes_file_and_text_parts() {
    let metadata = r#"{"patient_audit_code":"PT-2026-0124","cycle_id":"3","embryo_id":"EMB-001"}"#;
    let (content_type, body) = MultipartForm::new()
        .file("file", "embryo.png", "image/png", b"\x89PNG\r\n")
        .text("prediction_data", metadata)
        .finish();

    let boundary = content_type
        .strip_prefix("multipart/form-data; boundary=")
        .expect("content type carries the boundary");

    let text = String::from_utf8_lossy(&body);
    assert!(text.contains(&format!("--{boundary}\r\n")));
    assert!(text.ends_with(&format!("--{boundary}--\r\n")));
    assert!(text.contains(
        "Content-Disposition: form-data; name=\"file\"; filename=\"embryo.png\"\r\n"
    ));
    assert!(text.contains("Content-Type: image/png\r\n"));
    assert!(text.contains("Content-Disposition: form-data; name=\"prediction_data\"\r\n"));
    assert!(text.contains(metadata));
}

#[test]
fn file_bytes_survive_verbatim() {
    let payload: Vec<u8> = (0u8..=255).collect();
    let (_, body) = MultipartForm::new()
        .file("file", "scan.tiff", "image/tiff", &payload)
        .finish();
    assert!(body
        .windows(payload.len())
        .any(|window| window == payload.as_slice()));
}

#[test]
fn boundaries_are_unique_per_form() {
    let (a, _) = MultipartForm::new().finish();
    let (b, _) = MultipartForm::new().finish();
    assert_ne!(a, b);
}

#[test]
fn extension_mapping_covers_supported_image_types() {
    assert_eq!(content_type_for_extension("png"), "image/png");
    assert_eq!(content_type_for_extension("JPG"), "image/jpeg");
    assert_eq!(content_type_for_extension("jpeg"), "image/jpeg");
    assert_eq!(content_type_for_extension("tiff"), "image/tiff");
    assert_eq!(
        content_type_for_extension("webp"),
        "application/octet-stream"
    );
}
