//! AWS S3 storage implementation.
//!
//! Catalogs are stored at the bucket root. User metadata travels as
//! `x-amz-meta-*` headers, which is why the program name is base64 encoded
//! before it reaches this layer.

use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::StorageConfig;
use crate::storage::{KeyPage, ObjectHead, ObjectStore, PutObject};

/// S3-based catalog storage.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    page_size: i32,
}

impl S3Storage {
    /// Create a new S3 storage instance.
    pub fn new(client: Client, bucket: impl Into<String>, page_size: usize) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            page_size: i32::try_from(page_size).unwrap_or(i32::MAX),
        }
    }

    /// Create S3 storage with credentials and region from the environment.
    pub async fn from_config(config: &StorageConfig) -> Self {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&sdk_config);

        Self::new(client, config.bucket.clone(), config.page_size)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3Storage {
    async fn list_page(&self, token: Option<String>) -> Result<KeyPage> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .max_keys(self.page_size)
            .set_continuation_token(token)
            .send()
            .await
            .map_err(|e| AppError::storage(DisplayErrorContext(&e)))?;

        let keys: Vec<String> = output
            .contents()
            .iter()
            .filter_map(|obj| obj.key().map(str::to_string))
            .collect();

        let next_token = if output.is_truncated().unwrap_or(false) {
            output.next_continuation_token().map(str::to_string)
        } else {
            None
        };

        debug!(
            "Listed {} keys from s3://{} (more: {})",
            keys.len(),
            self.bucket,
            next_token.is_some()
        );
        Ok(KeyPage { keys, next_token })
    }

    async fn head(&self, key: &str) -> Result<ObjectHead> {
        let output = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    AppError::NotFound(key.to_string())
                } else {
                    AppError::storage(DisplayErrorContext(&service_err))
                }
            })?;

        Ok(ObjectHead {
            metadata: output.metadata().cloned().unwrap_or_default(),
            content_type: output.content_type().map(str::to_string),
            content_language: output.content_language().map(str::to_string),
        })
    }

    async fn get_body(&self, key: &str) -> Result<Vec<u8>> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    AppError::NotFound(key.to_string())
                } else {
                    AppError::storage(DisplayErrorContext(&service_err))
                }
            })?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| AppError::storage(format!("s3://{}/{}: {}", self.bucket, key, e)))?;
        Ok(bytes.into_bytes().to_vec())
    }

    async fn put_object(&self, object: PutObject) -> Result<()> {
        let size = object.body.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object.key)
            .body(ByteStream::from(object.body))
            .content_type(object.content_type)
            .content_language(object.content_language)
            .set_metadata(Some(object.metadata))
            .send()
            .await
            .map_err(|e| AppError::storage_write(DisplayErrorContext(&e)))?;

        info!("Wrote {} bytes to s3://{}/{}", size, self.bucket, object.key);
        Ok(())
    }
}
