use super::*;
use aws_sdk_s3::primitives::ByteStream;

/// [`ObjectStore`] over an S3 bucket, with every key rooted under `root`.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
    root: String,
}

impl S3Store {
    /// Builds a store from `bucket/root` (the `s3://` scheme already stripped).
    pub async fn from_url(rest: &str) -> Result<Self, TransferError> {
        let (bucket, root) = match rest.split_once('/') {
            Some((bucket, root)) => (bucket, root.trim_matches('/')),
            None => (rest, ""),
        };
        if bucket.is_empty() {
            return Err(TransferError::Url(format!("s3://{}", rest)));
        }
        Ok(Self {
            client: client_from_env().await,
            bucket: bucket.to_string(),
            root: root.to_string(),
        })
    }

    fn join(&self, key: &str) -> String {
        match self.root.is_empty() {
            true => key.to_string(),
            false => format!("{}/{}", self.root, key),
        }
    }

    fn strip(&self, key: String) -> String {
        match self.root.is_empty() {
            true => key,
            false => key
                .strip_prefix(&format!("{}/", self.root))
                .map(str::to_string)
                .unwrap_or(key),
        }
    }

    /// S3 only offers an exclusive `start_after`; the inclusive bound needs
    /// the bound key itself checked separately.
    async fn exists(&self, key: &str) -> Result<bool, TransferError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(self.join(key))
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().map_or(false, |se| se.is_not_found()) => Ok(false),
            Err(e) => Err(TransferError::remote(key, e)),
        }
    }
}

/// Build an S3 client from the ambient environment.
///
/// - Default: standard AWS resolution (region/creds from env/config/role).
/// - `LRN_S3_ENDPOINT_URL` overrides the endpoint (MinIO and other S3-compatible stores).
/// - Path-style addressing is forced whenever the endpoint is overridden.
async fn client_from_env() -> aws_sdk_s3::Client {
    let cfg = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let mut b = aws_sdk_s3::config::Builder::from(&cfg);
    if let Ok(url) = std::env::var("LRN_S3_ENDPOINT_URL") {
        b = b.endpoint_url(url).force_path_style(true);
    }
    aws_sdk_s3::Client::from_conf(b.build())
}

#[async_trait::async_trait]
impl ObjectStore for S3Store {
    async fn list(&self, prefix: &str, from: Option<&str>) -> Result<Vec<String>, TransferError> {
        let mut keys = Vec::new();
        if let Some(from) = from.filter(|f| f.starts_with(prefix)) {
            if self.exists(from).await? {
                keys.push(from.to_string());
            }
        }
        let mut token: Option<String> = None;
        loop {
            let resp = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(self.join(prefix))
                .set_start_after(from.map(|f| self.join(f)))
                .set_continuation_token(token.take())
                .send()
                .await
                .map_err(|e| TransferError::remote(prefix, e))?;
            keys.extend(
                resp.contents()
                    .iter()
                    .filter_map(|obj| obj.key())
                    .filter(|k| !k.ends_with('/'))
                    .map(|k| self.strip(k.to_string())),
            );
            match resp.next_continuation_token() {
                Some(next) if resp.is_truncated().unwrap_or(false) => {
                    token = Some(next.to_string())
                }
                _ => break,
            }
        }
        keys.sort();
        Ok(bounded(keys.iter(), prefix, from))
    }
    async fn get(&self, key: &str) -> Result<Vec<u8>, TransferError> {
        let out = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(self.join(key))
            .send()
            .await
            .map_err(|e| match e.as_service_error().map_or(false, |se| se.is_no_such_key()) {
                true => TransferError::NotFound(key.to_string()),
                false => TransferError::remote(key, e),
            })?;
        let bytes = out
            .body
            .collect()
            .await
            .map_err(|e| TransferError::remote(key, e))?;
        Ok(bytes.into_bytes().to_vec())
    }
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), TransferError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(self.join(key))
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| TransferError::remote(key, e))?;
        Ok(())
    }
}
