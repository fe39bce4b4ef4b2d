//! Integration tests: paged blob listing against a local stub server.

mod common;

use face_labeller_core::shared::service_error::ServiceError;
use face_labeller_core::storage::domain::headshot_source::HeadshotSource;
use face_labeller_core::storage::infrastructure::blob_headshot_source::BlobHeadshotSource;

const FIRST_PAGE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<EnumerationResults ContainerName="faces">
  <Blobs>
    <Blob><Name>Smith, John [No Logo].jpg</Name></Blob>
    <Blob><Name>Doe, Jane.jpg</Name></Blob>
  </Blobs>
  <NextMarker>page-2</NextMarker>
</EnumerationResults>"#;

const LAST_PAGE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<EnumerationResults ContainerName="faces">
  <Blobs>
    <Blob><Name>Murphy, Paul.jpg</Name></Blob>
  </Blobs>
  <NextMarker />
</EnumerationResults>"#;

#[test]
fn follows_markers_across_pages() {
    let server = common::stub_server::start(vec![(200, FIRST_PAGE), (200, LAST_PAGE)]);
    let source = BlobHeadshotSource::with_base_url(&server.base_url, "faces", "sv=1&sig=s").unwrap();

    let headshots = source.headshots().unwrap();

    let names: Vec<&str> = headshots.iter().map(|h| h.file_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Smith, John [No Logo].jpg", "Doe, Jane.jpg", "Murphy, Paul.jpg"]
    );
    assert_eq!(
        headshots[1].url,
        format!("{}/faces/Doe,%20Jane.jpg", server.base_url)
    );

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].target,
        "/faces?sv=1&sig=s&restype=container&comp=list"
    );
    assert_eq!(
        requests[1].target,
        "/faces?sv=1&sig=s&restype=container&comp=list&marker=page-2"
    );
    assert!(requests[0].subscription_key.is_none());
}

#[test]
fn listing_failure_is_error() {
    let server = common::stub_server::start(vec![(
        403,
        "<Error><Code>AuthenticationFailed</Code></Error>",
    )]);
    let source = BlobHeadshotSource::with_base_url(&server.base_url, "faces", "sig=bad").unwrap();

    let err = source.headshots().unwrap_err();

    assert_eq!(err.status(), Some(403));
}

#[test]
fn repeated_marker_stops_listing() {
    let server = common::stub_server::start(vec![(200, FIRST_PAGE), (200, FIRST_PAGE)]);
    let source = BlobHeadshotSource::with_base_url(&server.base_url, "faces", "sv=1&sig=s").unwrap();

    let err = source.headshots().unwrap_err();

    match err {
        ServiceError::RepeatedMarker { url, marker } => {
            assert_eq!(marker, "page-2");
            assert!(url.contains("sig=REDACTED"));
        }
        other => panic!("expected RepeatedMarker, got {other}"),
    }
    assert_eq!(server.requests().len(), 2);
}
