//! Integration tests for the QuickSight group resource using wiremock
//!
//! These tests drive the provider through the SDK-backed client against
//! mocked endpoints, checking request shapes and how responses and errors
//! land in state.

use aws_credential_types::Credentials;
use qsgroup::aws::client::AwsClient;
use qsgroup::error::ApiError;
use qsgroup::provider::{Changes, Provider, ProviderMeta};
use qsgroup::quicksight::api::{GroupApi, GroupKey};
use qsgroup::resource::ResourceData;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCOUNT: &str = "123456789012";
const GROUP_TYPE: &str = "aws_quicksight_group";
const GROUPS_PATH: &str = "/accounts/123456789012/namespaces/default/groups";
const ANALYSTS_PATH: &str = "/accounts/123456789012/namespaces/default/groups/analysts";

const CALLER_IDENTITY: &str = r#"<GetCallerIdentityResponse xmlns="https://sts.amazonaws.com/doc/2011-06-15/">
  <GetCallerIdentityResult>
    <Arn>arn:aws:iam::210987654321:user/ci</Arn>
    <UserId>AIDAEXAMPLE</UserId>
    <Account>210987654321</Account>
  </GetCallerIdentityResult>
  <ResponseMetadata>
    <RequestId>01234567-89ab-cdef-0123-456789abcdef</RequestId>
  </ResponseMetadata>
</GetCallerIdentityResponse>"#;

fn client(server: &MockServer) -> AwsClient {
    AwsClient::with_credentials(
        Credentials::new("AKIDTEST", "test-secret", None, None, "test"),
        "us-east-1",
        Some(&server.uri()),
    )
}

fn provider(server: &MockServer) -> Provider {
    Provider::new(ProviderMeta::new(Arc::new(client(server)), ACCOUNT))
}

fn group_body(name: &str, description: Option<&str>) -> Value {
    let mut group = json!({
        "Arn": format!("arn:aws:quicksight:us-east-1:{}:group/default/{}", ACCOUNT, name),
        "GroupName": name,
        "PrincipalId": format!("group/d-90000/{}", name)
    });
    if let Some(description) = description {
        group["Description"] = json!(description);
    }
    json!({"Group": group, "RequestId": "req-1", "Status": 200})
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404)
        .insert_header("x-amzn-ErrorType", "ResourceNotFoundException:http://internal.amazon.com/")
        .set_body_json(json!({"Message": "Group not found"}))
}

fn stored(id: &str) -> ResourceData {
    let mut d = ResourceData::new();
    d.set_id(id);
    d
}

/// Test module for lifecycle operations over HTTP
mod lifecycle_tests {
    use super::*;

    /// Create posts the group, then reads it back
    #[tokio::test]
    async fn test_create_then_read() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GROUPS_PATH))
            .and(header_exists("authorization"))
            .and(header_exists("x-amz-date"))
            .and(body_json(json!({"GroupName": "analysts", "Description": "BI team"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(group_body("analysts", Some("BI team"))))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(ANALYSTS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(group_body("analysts", Some("BI team"))))
            .expect(1)
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        let mut d = ResourceData::from_config([
            ("group_name", Some("analysts")),
            ("description", Some("BI team")),
        ]);

        let diags = provider(&server)
            .create(&cancel, GROUP_TYPE, &mut d)
            .await
            .expect("known resource type");

        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
        assert_eq!(d.id(), "123456789012/default/analysts");
        assert_eq!(d.get("namespace"), Some("default"));
        assert_eq!(d.get("aws_account_id"), Some(ACCOUNT));
        assert_eq!(
            d.get("arn"),
            Some("arn:aws:quicksight:us-east-1:123456789012:group/default/analysts")
        );
    }

    /// Create without a description sends only the group name
    #[tokio::test]
    async fn test_create_omits_description() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GROUPS_PATH))
            .and(body_json(json!({"GroupName": "analysts"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(group_body("analysts", None)))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(ANALYSTS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(group_body("analysts", None)))
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        let mut d = ResourceData::from_config([("group_name", Some("analysts"))]);

        let diags = provider(&server)
            .create(&cancel, GROUP_TYPE, &mut d)
            .await
            .unwrap();

        assert!(diags.is_empty());
        assert_eq!(d.get("description"), None);
    }

    /// A failed create leaves no identifier behind
    #[tokio::test]
    async fn test_create_conflict() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GROUPS_PATH))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "__type": "ResourceExistsException",
                "Message": "Group analysts already exists"
            })))
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        let mut d = ResourceData::from_config([("group_name", Some("analysts"))]);

        let diags = provider(&server)
            .create(&cancel, GROUP_TYPE, &mut d)
            .await
            .unwrap();

        assert_eq!(
            diags.errors(),
            vec!["creating QuickSight Group: ResourceExistsException: Group analysts already exists (status 409)"]
        );
        assert!(!d.exists());
    }

    /// Invalid namespace is rejected without any request
    #[tokio::test]
    async fn test_invalid_namespace_makes_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        let long_namespace = "n".repeat(64);
        let mut d = ResourceData::from_config([
            ("group_name", Some("analysts")),
            ("namespace", Some(long_namespace.as_str())),
        ]);

        let diags = provider(&server)
            .create(&cancel, GROUP_TYPE, &mut d)
            .await
            .unwrap();

        assert!(diags.has_error());
        assert!(!d.exists());
    }

    /// A group deleted outside of qsgroup disappears from state on read
    #[tokio::test]
    async fn test_read_drift_clears_state() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(ANALYSTS_PATH))
            .respond_with(not_found())
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        let mut d = stored("123456789012/default/analysts");

        let diags = provider(&server)
            .read(&cancel, GROUP_TYPE, &mut d)
            .await
            .unwrap();

        assert!(!diags.has_error());
        assert_eq!(diags.len(), 1);
        assert_eq!(d.id(), "");
    }

    /// Other read failures are reported and keep the identifier
    #[tokio::test]
    async fn test_read_access_denied() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(ANALYSTS_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "__type": "AccessDeniedException",
                "Message": "not allowed"
            })))
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        let mut d = stored("123456789012/default/analysts");

        let diags = provider(&server)
            .read(&cancel, GROUP_TYPE, &mut d)
            .await
            .unwrap();

        assert_eq!(
            diags.errors(),
            vec!["reading QuickSight Group (123456789012/default/analysts): AccessDeniedException: not allowed (status 403)"]
        );
        assert_eq!(d.id(), "123456789012/default/analysts");
    }

    /// Update puts the description, then refreshes
    #[tokio::test]
    async fn test_update_description() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(ANALYSTS_PATH))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"Description": "renamed team"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(group_body("analysts", Some("renamed team"))))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(ANALYSTS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(group_body("analysts", Some("renamed team"))))
            .expect(1)
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        let mut d = stored("123456789012/default/analysts");
        d.set("group_name", Some("analysts"));
        d.set("description", Some("old"));

        let mut changes = Changes::new();
        changes.insert("description".to_string(), Some("renamed team".to_string()));

        let diags = provider(&server)
            .update(&cancel, GROUP_TYPE, &mut d, &changes)
            .await
            .unwrap();

        assert!(diags.is_empty());
        assert_eq!(d.get("description"), Some("renamed team"));
    }

    /// Clearing the description sends an empty body
    #[tokio::test]
    async fn test_update_clear_description() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(ANALYSTS_PATH))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"RequestId": "r", "Status": 200})))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(ANALYSTS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(group_body("analysts", None)))
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        let mut d = stored("123456789012/default/analysts");
        d.set("description", Some("old"));

        let mut changes = Changes::new();
        changes.insert("description".to_string(), None);

        let diags = provider(&server)
            .update(&cancel, GROUP_TYPE, &mut d, &changes)
            .await
            .unwrap();

        assert!(diags.is_empty());
        assert_eq!(d.get("description"), None);
    }

    /// Deleting an already absent group succeeds
    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(ANALYSTS_PATH))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "__type": "com.amazonaws.quicksight#ResourceNotFoundException",
                "Message": "Group not found"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        let mut d = stored("123456789012/default/analysts");

        let diags = provider(&server)
            .delete(&cancel, GROUP_TYPE, &mut d)
            .await
            .unwrap();

        assert!(diags.is_empty());
        assert!(!d.exists());
    }

    /// Delete failures other than not-found keep the identifier
    #[tokio::test]
    async fn test_delete_failure() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(ANALYSTS_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "__type": "InvalidParameterValueException",
                "Message": "bad group name"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        let mut d = stored("123456789012/default/analysts");

        let diags = provider(&server)
            .delete(&cancel, GROUP_TYPE, &mut d)
            .await
            .unwrap();

        assert_eq!(
            diags.errors(),
            vec!["deleting QuickSight Group 123456789012/default/analysts: InvalidParameterValueException: bad group name (status 400)"]
        );
        assert!(d.exists());
    }

    /// Import reads the group named by the identifier
    #[tokio::test]
    async fn test_import() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(ANALYSTS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(group_body("analysts", Some("BI"))))
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();

        let (d, diags) = provider(&server)
            .import(&cancel, GROUP_TYPE, "123456789012/default/analysts")
            .await
            .unwrap();

        assert!(diags.is_empty());
        assert_eq!(d.get("group_name"), Some("analysts"));
        assert_eq!(d.get("description"), Some("BI"));
    }
}

/// Test module for the raw client
mod client_tests {
    use super::*;

    /// Group names are percent-encoded in the path
    #[tokio::test]
    async fn test_group_name_is_encoded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/accounts/123456789012/namespaces/default/groups/data%20team"))
            .respond_with(ResponseTemplate::new(200).set_body_json(group_body("data team", None)))
            .expect(1)
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        let output = client(&server)
            .describe_group(&cancel, GroupKey::new(ACCOUNT, "default", "data team"))
            .await
            .expect("describe should succeed");

        assert_eq!(output.group.unwrap().group_name.as_deref(), Some("data team"));
    }

    /// Session tokens are sent along with the signature
    #[tokio::test]
    async fn test_session_token_header() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(ANALYSTS_PATH))
            .and(header("x-amz-security-token", "session-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"RequestId": "r", "Status": 200})))
            .expect(1)
            .mount(&server)
            .await;

        let client = AwsClient::with_credentials(
            Credentials::new(
                "AKIDTEST",
                "test-secret",
                Some("session-token".to_string()),
                None,
                "test",
            ),
            "us-east-1",
            Some(&server.uri()),
        );

        let cancel = CancellationToken::new();
        let output = client
            .delete_group(&cancel, GroupKey::new(ACCOUNT, "default", "analysts"))
            .await
            .expect("delete should succeed");

        assert_eq!(output.status, Some(200));
    }

    /// The account comes from STS GetCallerIdentity
    #[tokio::test]
    async fn test_caller_account_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(header_exists("authorization"))
            .and(body_string_contains("Action=GetCallerIdentity"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/xml")
                    .set_body_string(CALLER_IDENTITY),
            )
            .expect(1)
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        let account = client(&server)
            .caller_account_id(&cancel)
            .await
            .expect("caller identity");

        assert_eq!(account, "210987654321");
    }

    /// A cancelled token aborts the request
    #[tokio::test]
    async fn test_cancelled_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(ANALYSTS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(group_body("analysts", None))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = client(&server)
            .describe_group(&cancel, GroupKey::new(ACCOUNT, "default", "analysts"))
            .await;

        assert!(matches!(result, Err(ApiError::Cancelled)));
    }
}
