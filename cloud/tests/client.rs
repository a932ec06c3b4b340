// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Client integration tests with wiremock.

use cirrus_cloud::{CloudClient, CloudConfig, CloudError, Tag};
use reqwest::StatusCode;
use wiremock::matchers::{body_json, body_string, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NOT_FOUND_FAULT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:error xmlns:d="DAV:" xmlns:s="http://sabredav.org/ns">
  <s:exception>Sabre\DAV\Exception\NotFound</s:exception>
  <s:message>File with name Missing could not be located</s:message>
</d:error>"#;

const NOT_ALLOWED_FAULT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:error xmlns:d="DAV:" xmlns:s="http://sabredav.org/ns">
  <s:exception>Sabre\DAV\Exception\MethodNotAllowed</s:exception>
  <s:message>The resource you tried to create already exists</s:message>
</d:error>"#;

const CONFLICT_FAULT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:error xmlns:d="DAV:" xmlns:s="http://sabredav.org/ns">
  <s:exception>Sabre\DAV\Exception\Conflict</s:exception>
  <s:message>Tag already exists</s:message>
</d:error>"#;

const TEST_DIR_LISTING: &str = r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:" xmlns:s="http://sabredav.org/ns" xmlns:oc="http://owncloud.org/ns" xmlns:nc="http://nextcloud.org/ns">
  <d:response>
    <d:href>/remote.php/dav/files/alice/Test/</d:href>
    <d:propstat>
      <d:prop>
        <d:getlastmodified>Mon, 12 Oct 2026 09:00:00 GMT</d:getlastmodified>
        <d:resourcetype><d:collection/></d:resourcetype>
        <oc:fileid>100</oc:fileid>
        <oc:size>13</oc:size>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>/remote.php/dav/files/alice/Test/test.txt</d:href>
    <d:propstat>
      <d:prop>
        <d:getlastmodified>Mon, 12 Oct 2026 09:00:00 GMT</d:getlastmodified>
        <d:getcontenttype>text/plain</d:getcontenttype>
        <d:resourcetype/>
        <d:getcontentlength>13</d:getcontentlength>
        <oc:fileid>101</oc:fileid>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#;

const TEST_FILE_LISTING: &str = r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns">
  <d:response>
    <d:href>/remote.php/dav/files/alice/Test/test.txt</d:href>
    <d:propstat>
      <d:prop>
        <oc:fileid>101</oc:fileid>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#;

const SYSTEM_TAGS: &str = r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns">
  <d:response>
    <d:href>/remote.php/dav/systemtags/</d:href>
    <d:propstat>
      <d:prop>
        <oc:id/>
        <oc:display-name/>
      </d:prop>
      <d:status>HTTP/1.1 404 Not Found</d:status>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>/remote.php/dav/systemtags/7</d:href>
    <d:propstat>
      <d:prop>
        <oc:id>7</oc:id>
        <oc:display-name>Test123</oc:display-name>
        <oc:user-visible>true</oc:user-visible>
        <oc:user-assignable>true</oc:user-assignable>
        <oc:can-assign>true</oc:can-assign>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#;

fn client_for(server: &MockServer) -> CloudClient {
    let config = CloudConfig::new(
        format!("{}/remote.php/dav/", server.uri()),
        "alice",
        "secret",
    );
    CloudClient::new(config).expect("Failed to create client")
}

fn test_tag() -> Tag {
    Tag {
        name: "Test123".to_string(),
        can_assign: true,
        user_assignable: true,
        user_visible: true,
    }
}

async fn mount_tag_resolution(server: &MockServer) {
    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/dav/files/alice/Test/test.txt"))
        .and(header("Depth", "0"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(TEST_FILE_LISTING, "application/xml"))
        .mount(server)
        .await;

    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/dav/systemtags/"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(SYSTEM_TAGS, "application/xml"))
        .mount(server)
        .await;
}

#[test]
fn client_dial_rejects_invalid_url() {
    let err = CloudClient::dial("not a url", "alice", "secret").unwrap_err();
    assert!(matches!(err, CloudError::Config(_)));
}

#[tokio::test]
async fn client_mkdir_is_idempotent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("MKCOL"))
        .and(path("/remote.php/dav/files/alice/Test"))
        .respond_with(ResponseTemplate::new(201))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("MKCOL"))
        .and(path("/remote.php/dav/files/alice/Test"))
        .respond_with(
            ResponseTemplate::new(405).set_body_raw(NOT_ALLOWED_FAULT, "application/xml"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.mkdir("Test").await.expect("First mkdir failed");
    client.mkdir("Test").await.expect("Second mkdir failed");
}

#[tokio::test]
async fn client_mkdir_propagates_other_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("MKCOL"))
        .and(path("/remote.php/dav/files/alice/Missing/Test"))
        .respond_with(ResponseTemplate::new(409).set_body_raw(CONFLICT_FAULT, "application/xml"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.mkdir("Missing/Test").await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::CONFLICT));
}

#[tokio::test]
async fn client_upload_then_download_round_trips() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/remote.php/dav/files/alice/Test/test.txt"))
        .and(body_string("Hello World!\n"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/remote.php/dav/files/alice/Test/test.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Hello World!\n"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client
        .upload(b"Hello World!\n".to_vec(), "Test/test.txt")
        .await
        .expect("Failed to upload");
    let data = client
        .download("Test/test.txt")
        .await
        .expect("Failed to download");

    assert_eq!(data, b"Hello World!\n");
}

#[tokio::test]
async fn client_download_returns_binary_content() {
    let mock_server = MockServer::start().await;
    let content: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x00, 0xff, 0xfe];

    Mock::given(method("GET"))
        .and(path("/remote.php/dav/files/alice/image.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.clone()))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let data = client.download("image.png").await.expect("Failed to download");

    assert_eq!(data, content);
}

#[tokio::test]
async fn client_list_directory_contains_uploaded_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/dav/files/alice/Test/"))
        .and(header("Depth", "1"))
        .and(header("Content-Type", "application/xml; charset=utf-8"))
        .and(body_string_contains("<oc:fileid>"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(TEST_DIR_LISTING, "application/xml"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let listing = client
        .list_directory("Test/", 1)
        .await
        .expect("Failed to list directory");

    assert_eq!(listing.responses.len(), 2);
    assert!(listing.responses[0].properties[0].is_collection());

    let file = listing
        .find_by_name("test.txt")
        .expect("Could not find test.txt in directory");
    assert_eq!(file.properties[0].content_type, "text/plain");
    assert_eq!(file.properties[0].content_length_bytes(), Some(13));
    assert_eq!(file.properties[0].file_id.as_str(), "101");
}

#[tokio::test]
async fn client_list_directory_reports_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/dav/files/alice/Missing/"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(NOT_FOUND_FAULT, "application/xml"))
        .mount(&mock_server)
        .await;

    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/dav/files/alice/Gone/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let err = client.list_directory("Missing/", 1).await.unwrap_err();
    match err {
        CloudError::NotFound(href) => assert_eq!(href.as_str(), "files/alice/Missing/"),
        other => panic!("unexpected error: {other:?}"),
    }

    let err = client.list_directory("Gone/", 1).await.unwrap_err();
    assert!(matches!(err, CloudError::NotFound(_)));
}

#[tokio::test]
async fn client_list_directory_reports_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/dav/files/alice/Test/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html><body>Internal error"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.list_directory("Test/", 1).await.unwrap_err();

    match err {
        CloudError::Decode { status, body, .. } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(body.contains("Internal error"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn client_delete_propagates_server_fault() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/remote.php/dav/files/alice/Test"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/remote.php/dav/files/alice/Missing"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(NOT_FOUND_FAULT, "application/xml"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.delete("Test").await.expect("Failed to delete");

    let err = client.delete("Missing").await.unwrap_err();
    match err {
        CloudError::Server { exception, .. } => {
            assert_eq!(exception, "Sabre\\DAV\\Exception\\NotFound");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn client_exists_follows_property_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/dav/files/alice/Test"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(TEST_FILE_LISTING, "application/xml"))
        .mount(&mock_server)
        .await;

    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/dav/files/alice/Missing"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(NOT_FOUND_FAULT, "application/xml"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert!(client.exists("Test").await);
    assert!(!client.exists("Missing").await);
}

#[tokio::test]
async fn client_basic_auth_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("MKCOL"))
        .and(path("/remote.php/dav/files/alice/Test"))
        .and(header("authorization", "Basic YWxpY2U6c2VjcmV0")) // base64 of "alice:secret"
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.mkdir("Test").await.expect("Failed to mkdir");
}

#[tokio::test]
async fn client_system_tags_and_find() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/dav/systemtags/"))
        .and(body_string_contains("<oc:display-name>"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(SYSTEM_TAGS, "application/xml"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let tags = client.system_tags().await.expect("Failed to list tags");
    assert_eq!(tags.responses.len(), 2);

    let found = client
        .find_system_tag("Test123")
        .await
        .expect("Failed to find tag")
        .expect("Tag not found");
    assert_eq!(found.href.as_str(), "/remote.php/dav/systemtags/7");
    let tag = found.properties[0].to_tag().expect("Invalid tag flags");
    assert_eq!(tag, test_tag());

    let missing = client
        .find_system_tag("Nope")
        .await
        .expect("Failed to find tag");
    assert!(missing.is_none());
}

#[tokio::test]
async fn client_add_system_tag_tolerates_conflict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/remote.php/dav/systemtags/"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({
            "name": "Test123",
            "canAssign": true,
            "userAssignable": true,
            "userVisible": true,
        })))
        .respond_with(ResponseTemplate::new(201))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/remote.php/dav/systemtags/"))
        .respond_with(ResponseTemplate::new(409).set_body_raw(CONFLICT_FAULT, "application/xml"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let tag = test_tag();

    assert!(client.add_system_tag(&tag).await.expect("First create failed"));
    assert!(!client.add_system_tag(&tag).await.expect("Second create failed"));
}

#[tokio::test]
async fn client_add_tag_associates_and_tolerates_repeat() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/remote.php/dav/systemtags/"))
        .respond_with(ResponseTemplate::new(409).set_body_raw(CONFLICT_FAULT, "application/xml"))
        .mount(&mock_server)
        .await;

    mount_tag_resolution(&mock_server).await;

    Mock::given(method("PUT"))
        .and(path("/remote.php/dav/systemtags-relations/files/101/7"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(201))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/remote.php/dav/systemtags-relations/files/101/7"))
        .respond_with(ResponseTemplate::new(409).set_body_raw(CONFLICT_FAULT, "application/xml"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let tag = test_tag();

    assert!(client.add_tag("Test/test.txt", &tag).await.expect("First association failed"));
    assert!(!client.add_tag("Test/test.txt", &tag).await.expect("Second association failed"));
}

#[tokio::test]
async fn client_add_tag_reports_unresolvable_tag() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/remote.php/dav/systemtags/"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;

    mount_tag_resolution(&mock_server).await;

    let client = client_for(&mock_server);
    let tag = Tag::new("Unknown");

    let err = client.add_tag("Test/test.txt", &tag).await.unwrap_err();
    match err {
        CloudError::TagNotFound(name) => assert_eq!(name, "Unknown"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn client_add_tag_leaves_created_tag_on_assignment_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/remote.php/dav/systemtags/"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_tag_resolution(&mock_server).await;

    Mock::given(method("PUT"))
        .and(path("/remote.php/dav/systemtags-relations/files/101/7"))
        .respond_with(ResponseTemplate::new(403).set_body_raw(
            r#"<d:error xmlns:d="DAV:" xmlns:s="http://sabredav.org/ns"><s:exception>Sabre\DAV\Exception\Forbidden</s:exception><s:message>No permission to assign tag 7</s:message></d:error>"#,
            "application/xml",
        ))
        .mount(&mock_server)
        .await;

    // No DELETE on systemtags/ may follow the failed assignment.
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.add_tag("Test/test.txt", &test_tag()).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
}

#[tokio::test]
async fn client_add_tag_returns_false_for_empty_listing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/remote.php/dav/systemtags/"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;

    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/dav/files/alice/empty.txt"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(
            r#"<d:multistatus xmlns:d="DAV:"></d:multistatus>"#,
            "application/xml",
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let tagged = client
        .add_tag("empty.txt", &test_tag())
        .await
        .expect("Association failed");

    assert!(!tagged);
}
