//! Credential and region resolution through the standard AWS chain
//!
//! Kept in its own test binary: it rewrites process environment variables.

use aws_credential_types::provider::ProvideCredentials;
use qsgroup::aws::auth::load_sdk_config;
use qsgroup::aws::client::AwsClient;

const CREDENTIALS: &str = "\
[default]
aws_access_key_id = AKIDFROMFILE
aws_secret_access_key = file-secret

[work]
aws_access_key_id = AKIDWORK
aws_secret_access_key = work-secret
";

const CONFIG: &str = "\
[default]
region = eu-central-1

[profile work]
region = ap-northeast-1
";

/// Shared files named by the environment are honored, for the default and a named profile
#[tokio::test]
async fn test_shared_files_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let credentials_path = dir.path().join("credentials");
    let config_path = dir.path().join("config");
    std::fs::write(&credentials_path, CREDENTIALS).unwrap();
    std::fs::write(&config_path, CONFIG).unwrap();

    for var in [
        "AWS_ACCESS_KEY_ID",
        "AWS_SECRET_ACCESS_KEY",
        "AWS_SESSION_TOKEN",
        "AWS_PROFILE",
        "AWS_REGION",
        "AWS_DEFAULT_REGION",
        "AWS_ROLE_ARN",
        "AWS_WEB_IDENTITY_TOKEN_FILE",
        "AWS_CONTAINER_CREDENTIALS_RELATIVE_URI",
        "AWS_CONTAINER_CREDENTIALS_FULL_URI",
    ] {
        std::env::remove_var(var);
    }
    std::env::set_var("AWS_SHARED_CREDENTIALS_FILE", &credentials_path);
    std::env::set_var("AWS_CONFIG_FILE", &config_path);
    std::env::set_var("AWS_EC2_METADATA_DISABLED", "true");

    let config = load_sdk_config(None, None, None).await;
    let credentials = config
        .credentials_provider()
        .expect("credentials provider")
        .provide_credentials()
        .await
        .expect("credentials from the shared file");
    assert_eq!(credentials.access_key_id(), "AKIDFROMFILE");
    assert_eq!(AwsClient::from_config(&config).region(), "eu-central-1");

    let config = load_sdk_config(None, Some("work"), None).await;
    let credentials = config
        .credentials_provider()
        .expect("credentials provider")
        .provide_credentials()
        .await
        .expect("credentials for the named profile");
    assert_eq!(credentials.access_key_id(), "AKIDWORK");
    assert_eq!(AwsClient::from_config(&config).region(), "ap-northeast-1");

    let config = load_sdk_config(Some("sa-east-1"), Some("work"), None).await;
    assert_eq!(AwsClient::from_config(&config).region(), "sa-east-1");
}
