// 摄取流水线场景：磁盘文件、粘贴文本、剪贴板复制
mod common;

use common::Recorder;
use data_url_drop::ingest::{
    IngestConfig, IngestError, IngestPipeline, IngestionRequest, LocalFile, SourceKind,
    ValidationError, decode_data_url,
};

const PNG_HEADER: [u8; 16] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
];

#[tokio::test]
async fn text_file_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("note.txt");
    std::fs::write(&path, "hello note").expect("write");

    let mut pipeline = IngestPipeline::default();
    let file = LocalFile::open(&path).expect("open");
    let output = pipeline
        .ingest(IngestionRequest::File(Box::new(file)))
        .await
        .expect("ingest");

    assert_eq!(output.uri(), "data:text/plain;base64,aGVsbG8gbm90ZQ==");
    assert_eq!(output.source_kind(), SourceKind::NonImage);
    assert_eq!(output.byte_length(), 10);
    assert!(!pipeline.is_loading());
}

#[tokio::test]
async fn extensionless_png_is_sniffed_as_image() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("screenshot");
    std::fs::write(&path, PNG_HEADER).expect("write");

    let mut pipeline = IngestPipeline::default();
    let file = LocalFile::open(&path).expect("open");
    let output = pipeline.ingest_file(&file).await.expect("ingest");

    assert!(output.uri().starts_with("data:image/png;base64,"));
    assert_eq!(output.source_kind(), SourceKind::Image);
    let (_, bytes) = decode_data_url(output.uri()).expect("decode");
    assert_eq!(bytes, PNG_HEADER);
}

#[tokio::test]
async fn oversized_disk_file_is_rejected_before_reading() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("big.bin");
    std::fs::write(&path, vec![0u8; 2048]).expect("write");

    let mut pipeline = IngestPipeline::new(IngestConfig {
        max_file_size: 1024,
        ..IngestConfig::default()
    });
    pipeline.submit_text("keep me").expect("text");

    let file = LocalFile::open(&path).expect("open");
    let err = pipeline.ingest_file(&file).await.map(|_| ()).unwrap_err();

    assert_eq!(
        err,
        IngestError::Validation(ValidationError::FileTooLarge {
            size: 2048,
            limit: 1024
        })
    );
    assert!(!pipeline.is_loading());
    assert_eq!(
        pipeline.output().map(|o| o.uri()),
        Some("data:text/plain;base64,a2VlcCBtZQ==")
    );
}

#[tokio::test]
async fn file_deleted_after_open_reports_read_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("gone.txt");
    std::fs::write(&path, "soon gone").expect("write");

    let mut pipeline = IngestPipeline::default();
    let file = LocalFile::open(&path).expect("open");
    std::fs::remove_file(&path).expect("remove");

    let result = pipeline.ingest_file(&file).await.map(|_| ());

    assert!(matches!(result, Err(IngestError::Read(_))));
    assert!(!pipeline.is_loading());
    assert!(pipeline.output().is_none());
}

#[tokio::test]
async fn html_paste_is_not_an_image() {
    let mut pipeline = IngestPipeline::default();
    let output = pipeline
        .ingest(IngestionRequest::Text("<html><svg></svg></html>".to_string()))
        .await
        .expect("ingest");

    assert!(output.uri().starts_with("data:text/html;base64,"));
    assert_eq!(output.source_kind(), SourceKind::NonImage);
}

#[tokio::test]
async fn copy_writes_current_uri_and_confirms() {
    let recorder = Recorder::default();
    let mut pipeline = IngestPipeline::default();

    assert_eq!(pipeline.copy_to_clipboard(&recorder).await, Ok(false));
    assert!(!pipeline.is_confirming_copy());

    pipeline.submit_text("hi").expect("text");
    assert_eq!(pipeline.copy_to_clipboard(&recorder).await, Ok(true));

    assert!(pipeline.is_confirming_copy());
    assert!(pipeline.next_deadline().is_some());
    assert_eq!(recorder.get().copied, vec!["data:text/plain;base64,aGk=".to_string()]);
}

#[tokio::test]
async fn failed_copy_does_not_confirm() {
    let recorder = Recorder::failing_clipboard();
    let mut pipeline = IngestPipeline::default();
    pipeline.submit_text("hi").expect("text");

    let result = pipeline.copy_to_clipboard(&recorder).await;

    assert!(matches!(result, Err(IngestError::Clipboard(_))));
    assert!(!pipeline.is_confirming_copy());
}
