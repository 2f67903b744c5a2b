//! Tests for workspace repository listing against a mocked Bitbucket API

use mockito::Matcher;
use url::Url;

use bitfetch::bitbucket::{
    BitbucketClient, BitbucketConfig, BitbucketError, list_repositories, repository_info,
};

fn test_client(server: &mockito::Server) -> BitbucketClient {
    let config = BitbucketConfig::new("user", "secret")
        .with_api_base(Url::parse(&server.url()).expect("mock server URL must parse"));
    BitbucketClient::new(config).expect("client must build")
}

fn repo_object(slug: &str) -> String {
    format!(
        r#"{{
            "type": "repository",
            "full_name": "my-team/{slug}",
            "name": "Repo {slug}",
            "slug": "{slug}",
            "description": "",
            "scm": "git",
            "website": null,
            "owner": {{"display_name": "Owner", "type": "user", "uuid": "{{owner-uuid}}", "username": "owner"}},
            "workspace": {{"type": "workspace", "uuid": "{{workspace-uuid}}", "name": "My Team", "slug": "my-team"}},
            "is_private": true,
            "project": {{"type": "project", "key": "PROJ", "uuid": "{{project-uuid}}", "name": "Project"}},
            "fork_policy": "no_public_forks",
            "created_on": "2023-01-01T12:00:00Z",
            "updated_on": "2023-01-02T12:00:00Z",
            "size": 1024,
            "language": "rust",
            "uuid": "{{{slug}-uuid}}",
            "mainbranch": {{"name": "main", "type": "branch"}},
            "override_settings": {{"default_merge_strategy": false, "branching_model": false}},
            "has_issues": false,
            "has_wiki": false,
            "links": {{
                "self": {{"href": "https://api.bitbucket.org/2.0/repositories/my-team/{slug}"}},
                "source": {{"href": "https://api.bitbucket.org/2.0/repositories/my-team/{slug}/src"}},
                "clone": {{"href": "https://bitbucket.org/my-team/{slug}.git"}}
            }}
        }}"#
    )
}

#[tokio::test]
async fn test_list_repositories_follows_next_links() {
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();

    let page_one = server
        .mock("GET", "/repositories/my-team")
        .match_query(Matcher::UrlEncoded("pagelen".into(), "100".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"values": [{}], "next": "{}/repositories/my-team?pagelen=100&page=2"}}"#,
            repo_object("alpha"),
            server_url
        ))
        .expect(1)
        .create_async()
        .await;
    let page_two = server
        .mock("GET", "/repositories/my-team")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("pagelen".into(), "100".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"values": [{}]}}"#, repo_object("beta")))
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server);
    let repos = list_repositories(&client, "my-team")
        .await
        .expect("listing must succeed");

    page_one.assert_async().await;
    page_two.assert_async().await;

    let slugs: Vec<&str> = repos.iter().map(|r| r.slug.as_str()).collect();
    assert_eq!(slugs, vec!["alpha", "beta"]);
}

#[tokio::test]
async fn test_repository_info_returns_typed_record() {
    let mut server = mockito::Server::new_async().await;

    let _meta = server
        .mock("GET", "/repositories/my-team/alpha")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(repo_object("alpha"))
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server);
    let repo = repository_info(&client, "my-team", "alpha").await.unwrap();

    assert_eq!(repo.slug, "alpha");
    assert_eq!(repo.mainbranch.name, "main");
    assert_eq!(repo.workspace.slug, "my-team");
}

#[tokio::test]
async fn test_http_error_carries_status_and_url() {
    let mut server = mockito::Server::new_async().await;

    let _meta = server
        .mock("GET", "/repositories/my-team/gone")
        .with_status(404)
        .with_body("not found")
        .create_async()
        .await;

    let client = test_client(&server);
    let err = repository_info(&client, "my-team", "gone")
        .await
        .expect_err("a 404 must fail the fetch");

    match err {
        BitbucketError::Http { status, url } => {
            assert_eq!(status.as_u16(), 404);
            assert!(url.ends_with("/repositories/my-team/gone"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_basic_auth_credentials_are_sent() {
    let mut server = mockito::Server::new_async().await;

    // "user:secret" base64-encoded.
    let meta = server
        .mock("GET", "/repositories/my-team/alpha")
        .match_header("authorization", "Basic dXNlcjpzZWNyZXQ=")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(repo_object("alpha"))
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server);
    repository_info(&client, "my-team", "alpha").await.unwrap();

    meta.assert_async().await;
}
