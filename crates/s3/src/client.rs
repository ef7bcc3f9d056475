//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from bm-core.

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;

use bm_core::{Credentials, Error, ObjectInfo, ObjectListing, ObjectStore, Result};

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client from static credentials
    ///
    /// No request is sent here. SDK retries are disabled so every operation
    /// maps to exactly one backend call.
    pub async fn new(credentials: Credentials, endpoint: Option<&str>) -> Result<Self> {
        let Credentials {
            access_key,
            secret_key,
            region,
        } = credentials;

        let provider = aws_credential_types::Credentials::new(
            access_key,
            secret_key,
            None, // session token
            None, // expiry
            "bm-static-credentials",
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(provider)
            .region(aws_config::Region::new(region))
            .retry_config(aws_config::retry::RetryConfig::disabled());

        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let config = loader.load().await;

        // Custom endpoints are usually S3-compatible servers without virtual-host routing
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(endpoint.is_some())
            .build();

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }

    #[cfg(test)]
    fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<ObjectListing> {
        let response = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, bucket))?;

        let items = response
            .contents()
            .iter()
            .map(|object| {
                let mut info =
                    ObjectInfo::file(object.key().unwrap_or_default(), object.size().unwrap_or(0));
                if let Some(modified) = object.last_modified() {
                    info.last_modified = jiff::Timestamp::from_second(modified.secs()).ok();
                }
                info
            })
            .collect();

        Ok(ObjectListing::new(
            items,
            response.is_truncated().unwrap_or(false),
        ))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<()> {
        self.inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .set_content_type(content_type)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("{bucket}/{key}")))?;

        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("{bucket}/{key}")))?;

        Ok(())
    }
}

fn map_sdk_error<E, R>(err: SdkError<E, R>, target: &str) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    tracing::debug!(code = ?err.code(), %message, "S3 request failed");
    classify(err.code(), message, target)
}

/// Map an S3 error code onto the core error taxonomy
fn classify(code: Option<&str>, message: String, target: &str) -> Error {
    match code {
        Some("AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch" | "ExpiredToken") => {
            Error::Auth(message)
        }
        Some("NoSuchBucket" | "NoSuchKey" | "NotFound") => Error::NotFound(target.to_string()),
        _ => Error::Network(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_auth_codes() {
        for code in ["AccessDenied", "InvalidAccessKeyId", "SignatureDoesNotMatch"] {
            let err = classify(Some(code), "denied".into(), "developer-task");
            assert!(matches!(err, Error::Auth(_)), "{code}");
        }
    }

    #[test]
    fn test_classify_not_found_uses_target() {
        let err = classify(Some("NoSuchBucket"), "gone".into(), "developer-task");
        assert_eq!(err.to_string(), "Not found: developer-task");
    }

    #[test]
    fn test_classify_unknown_is_network() {
        assert!(matches!(
            classify(None, "dispatch failure".into(), "b"),
            Error::Network(_)
        ));
        assert!(matches!(
            classify(Some("SlowDown"), "throttled".into(), "b"),
            Error::Network(_)
        ));
    }

    #[tokio::test]
    async fn test_new_does_not_contact_backend() {
        let credentials = Credentials {
            access_key: "AKIAEXAMPLE".into(),
            secret_key: "secret".into(),
            region: "us-east-1".into(),
        };
        let client = S3Client::new(credentials, Some("http://127.0.0.1:9"))
            .await
            .unwrap();
        let region = client.inner().config().region().map(|r| r.to_string());
        assert_eq!(region.as_deref(), Some("us-east-1"));
    }
}
