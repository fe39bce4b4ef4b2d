//! Integration tests: annotation adapter against a local stub server.

mod common;

use face_labeller_core::annotation::domain::video_annotator::VideoAnnotator;
use face_labeller_core::annotation::infrastructure::video_indexer_client::VideoIndexerClient;

#[test]
fn label_face_puts_encoded_query() {
    let server = common::stub_server::start(vec![(200, "")]);
    let client = VideoIndexerClient::with_base_url("vi-key", &server.base_url).unwrap();

    client.label_face("bd1", "f1", "Jane Doe").unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(
        requests[0].target,
        "/Breakdowns/Api/Partner/Breakdowns/UpdateFaceName/bd1?faceId=f1&newName=Jane+Doe"
    );
    assert_eq!(requests[0].subscription_key.as_deref(), Some("vi-key"));
}

#[test]
fn unknown_breakdown_is_error() {
    let server = common::stub_server::start(vec![(
        404,
        r#"{"ErrorType":"BREAKDOWN_NOT_FOUND","Message":"Breakdown not found"}"#,
    )]);
    let client = VideoIndexerClient::with_base_url("vi-key", &server.base_url).unwrap();

    let err = client.label_face("nope", "f1", "Jane Doe").unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("BREAKDOWN_NOT_FOUND"));
}
