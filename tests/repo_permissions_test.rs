//! Tests for permission resolution against a mocked Bitbucket API
//!
//! The mock server answers the three per-level grant listings and the
//! group-membership expansion the resolver issues.

use mockito::Matcher;
use url::Url;

use bitfetch::bitbucket::{
    BitbucketClient, BitbucketConfig, BitbucketError, PermissionLevel, resolve_repo_permissions,
};

fn test_client(server: &mockito::Server) -> BitbucketClient {
    let config = BitbucketConfig::new("user", "secret")
        .with_api_base(Url::parse(&server.url()).expect("mock server URL must parse"));
    BitbucketClient::new(config).expect("client must build")
}

fn grants_mock(
    server: &mut mockito::Server,
    level: &str,
    body: &str,
) -> mockito::Mock {
    server
        .mock("GET", "/repositories/my-team/test-repo/permissions")
        .match_query(Matcher::UrlEncoded("permission".into(), level.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
}

#[tokio::test]
async fn test_resolve_repo_permissions() {
    let mut server = mockito::Server::new_async().await;

    let admin = grants_mock(
        &mut server,
        "admin",
        r#"{"values": [{"user": {"username": "user1", "display_name": "User One"}}]}"#,
    )
    .expect(1)
    .create_async()
    .await;
    let write = grants_mock(
        &mut server,
        "write",
        r#"{"values": [{"group": {"full_slug": "group1"}}]}"#,
    )
    .expect(1)
    .create_async()
    .await;
    let read = grants_mock(&mut server, "read", r#"{"values": []}"#)
        .expect(1)
        .create_async()
        .await;
    let members = server
        .mock("GET", "/groups/group1/members")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"values": [{"username": "user2", "display_name": "User Two"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server);
    let permissions = resolve_repo_permissions(&client, "my-team", "test-repo")
        .await
        .expect("resolve must succeed");

    admin.assert_async().await;
    write.assert_async().await;
    read.assert_async().await;
    members.assert_async().await;

    let admin_grant = &permissions[&PermissionLevel::Admin];
    assert_eq!(admin_grant.user.as_ref().unwrap().username, "user1");
    assert!(admin_grant.group.is_none());

    let write_grant = &permissions[&PermissionLevel::Write];
    assert_eq!(write_grant.group.as_ref().unwrap().full_slug, "group1");
    assert_eq!(write_grant.users.len(), 1);
    assert_eq!(write_grant.users[0].username, "user2");
    assert_eq!(write_grant.users[0].display_name, "User Two");

    // Levels without grant entries are absent, never present-with-empty.
    assert!(!permissions.contains_key(&PermissionLevel::Read));
    assert_eq!(permissions.len(), 2);
}

#[tokio::test]
async fn test_resolve_with_no_grants_returns_empty_map() {
    let mut server = mockito::Server::new_async().await;
    let _grants = grants_mock(&mut server, "admin", r#"{"values": []}"#)
        .create_async()
        .await;
    let _write = grants_mock(&mut server, "write", r#"{"values": []}"#)
        .create_async()
        .await;
    let _read = grants_mock(&mut server, "read", r#"{"values": []}"#)
        .create_async()
        .await;

    let client = test_client(&server);
    let permissions = resolve_repo_permissions(&client, "my-team", "test-repo")
        .await
        .unwrap();

    assert!(permissions.is_empty());
}

#[tokio::test]
async fn test_group_expansion_failure_aborts_resolve() {
    let mut server = mockito::Server::new_async().await;
    let _admin = grants_mock(
        &mut server,
        "admin",
        r#"{"values": [{"group": {"full_slug": "group1"}}]}"#,
    )
    .create_async()
    .await;
    let _members = server
        .mock("GET", "/groups/group1/members")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let client = test_client(&server);
    let err = resolve_repo_permissions(&client, "my-team", "test-repo")
        .await
        .expect_err("a failed expansion must abort the resolve");

    match err {
        BitbucketError::Http { status, url } => {
            assert_eq!(status.as_u16(), 500);
            assert!(url.ends_with("/groups/group1/members"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_grant_listing_http_error_propagates() {
    let mut server = mockito::Server::new_async().await;
    let _admin = grants_mock(&mut server, "admin", "")
        .with_status(403)
        .create_async()
        .await;

    let client = test_client(&server);
    let err = resolve_repo_permissions(&client, "my-team", "test-repo")
        .await
        .expect_err("a 403 grant listing must abort the resolve");

    match err {
        BitbucketError::Http { status, .. } => assert_eq!(status.as_u16(), 403),
        other => panic!("unexpected error: {other}"),
    }
}
