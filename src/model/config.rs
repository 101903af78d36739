use std::env;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }
}

/// Settings used by [`crate::S3Client::new`] to build the underlying SDK client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub region: Option<String>,
    pub credentials: Credentials,
    /// Overrides the resolved endpoint, e.g. for MinIO or localstack.
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
}

impl ClientConfig {
    pub fn new(region: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            region: Some(region.into()),
            credentials,
            ..Default::default()
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        Self {
            region: non_empty("AWS_REGION").or_else(|| non_empty("AWS_DEFAULT_REGION")),
            credentials: Credentials {
                access_key_id: non_empty("AWS_ACCESS_KEY_ID").unwrap_or_default(),
                secret_access_key: non_empty("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
                session_token: non_empty("AWS_SESSION_TOKEN"),
            },
            endpoint_url: non_empty("AWS_ENDPOINT_URL"),
            force_path_style: false,
        }
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref().filter(|r| !r.is_empty())
    }
}

/// Connection settings layered over a loaded `aws-config` configuration.
/// Unset fields keep whatever the provider chain resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SdkOverrides {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
}

impl SdkOverrides {
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref().filter(|r| !r.is_empty())
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref().filter(|u| !u.is_empty())
    }
}
