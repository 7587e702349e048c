use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use extraction::{PollConfig, UploadConfig};

use crate::domains::documents::DocumentType;

const DEFAULT_REGION: &str = "us-west-2";
const DEFAULT_PORT: u16 = 8501;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub s3_bucket_name: String,
    pub aws_region: String,
    pub port: u16,
    pub payslip_data_automation_arn: Option<String>,
    pub data_automation_profile_arn: Option<String>,
    pub input_prefix: String,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
    pub poll_max_attempts: u32,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            s3_bucket_name: var("S3_BUCKET_NAME").context("S3_BUCKET_NAME must be set")?,
            aws_region: var("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            port: parse_or(var("PORT"), DEFAULT_PORT).context("PORT must be a valid number")?,
            payslip_data_automation_arn: var(DocumentType::Payslip.project_arn_var()),
            data_automation_profile_arn: var("DATA_AUTOMATION_PROFILE_ARN"),
            input_prefix: var("INPUT_PREFIX").unwrap_or_else(|| "input_data".to_string()),
            poll_interval: Duration::from_secs(
                parse_or(var("POLL_INTERVAL_SECS"), 5)
                    .context("POLL_INTERVAL_SECS must be a whole number of seconds")?,
            ),
            poll_timeout: Duration::from_secs(
                parse_or(var("POLL_TIMEOUT_SECS"), 600)
                    .context("POLL_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            poll_max_attempts: parse_or(var("POLL_MAX_ATTEMPTS"), 120)
                .context("POLL_MAX_ATTEMPTS must be a valid number")?,
            max_upload_bytes: parse_or(var("MAX_UPLOAD_BYTES"), DEFAULT_MAX_UPLOAD_BYTES)
                .context("MAX_UPLOAD_BYTES must be a valid number")?,
        })
    }

    /// Project ARN configured for a document type.
    pub fn project_arn(&self, document_type: DocumentType) -> Option<&str> {
        match document_type {
            DocumentType::Payslip => self.payslip_data_automation_arn.as_deref(),
        }
    }

    pub fn upload_config(&self) -> UploadConfig {
        UploadConfig::new(&self.s3_bucket_name).with_input_prefix(&self.input_prefix)
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig::new()
            .with_interval(self.poll_interval)
            .with_timeout(self.poll_timeout)
            .with_max_attempts(self.poll_max_attempts)
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(value) => Ok(value.trim().parse()?),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("S3_BUCKET_NAME", "docs")]).unwrap();

        assert_eq!(config.aws_region, "us-west-2");
        assert_eq!(config.port, 8501);
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.poll_timeout, Duration::from_secs(600));
        assert_eq!(config.poll_max_attempts, 120);
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.project_arn(DocumentType::Payslip), None);
        assert_eq!(config.upload_config().input_prefix, "input_data");
    }

    #[test]
    fn test_bucket_is_required() {
        let err = config(&[("PORT", "9000")]).unwrap_err();
        assert!(err.to_string().contains("S3_BUCKET_NAME"));

        // Blank counts as unset
        assert!(config(&[("S3_BUCKET_NAME", "  ")]).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("S3_BUCKET_NAME", "docs"),
            ("PORT", "9000"),
            ("PAYSLIP_DATA_AUTOMATION_ARN", "arn:aws:bedrock:us-west-2:1:data-automation-project/p"),
            ("POLL_INTERVAL_SECS", "1"),
            ("POLL_MAX_ATTEMPTS", "3"),
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(
            config.project_arn(DocumentType::Payslip),
            Some("arn:aws:bedrock:us-west-2:1:data-automation-project/p")
        );
        let poll = config.poll_config();
        assert_eq!(poll.interval, Duration::from_secs(1));
        assert_eq!(poll.max_attempts, 3);
    }

    #[test]
    fn test_invalid_port() {
        let err = config(&[("S3_BUCKET_NAME", "docs"), ("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
