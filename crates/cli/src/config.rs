use crate::CheckArgs;
use mapping_detector::DEFAULT_CLIENTS;
use mapping_protocol::join_url;
use mapping_registry::DEFAULT_REGISTRY_NAME;
use mapping_schema::SchemaFetcher;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REGISTRY_FILE: &str = "src/config/api.ts";
pub const DEFAULT_SOURCE_DIR: &str = "src";
pub const DEFAULT_REPORT_PATH: &str = "reports/mapping-report.json";

pub const ENV_API_BASE_URL: &str = "API_BASE_URL";
pub const ENV_OPENAPI_URL: &str = "OPENAPI_URL";

/// Where the backend schema comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    Url(String),
    File(PathBuf),
}

impl SchemaSource {
    /// Value recorded as `openapiUrl` in the report
    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub root: PathBuf,
    pub registry_file: PathBuf,
    pub registry_name: String,
    pub source_dir: PathBuf,
    pub report_path: PathBuf,
    pub api_base_url: String,
    pub schema: SchemaSource,
    pub clients: Vec<String>,
    pub fetcher: SchemaFetcher,
    pub fail_on_drift: bool,
    pub json: bool,
}

impl CheckConfig {
    /// Resolve flags, then environment (`API_BASE_URL`, `OPENAPI_URL`), then defaults.
    /// Relative paths are taken from `args.root`.
    pub fn resolve(args: &CheckArgs, env: impl Fn(&str) -> Option<String>) -> Self {
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());
        let root = args.root.clone();

        let api_base_url = args
            .api_base_url
            .clone()
            .or_else(|| env(ENV_API_BASE_URL))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let schema = match &args.openapi_file {
            Some(file) => SchemaSource::File(under(&root, file)),
            None => SchemaSource::Url(
                args.openapi_url
                    .clone()
                    .or_else(|| env(ENV_OPENAPI_URL))
                    .unwrap_or_else(|| join_url(&api_base_url, "openapi.json")),
            ),
        };

        let clients = if args.clients.is_empty() {
            DEFAULT_CLIENTS.iter().map(|c| c.to_string()).collect()
        } else {
            args.clients.clone()
        };

        Self {
            registry_file: under(
                &root,
                args.registry_file
                    .as_deref()
                    .unwrap_or(Path::new(DEFAULT_REGISTRY_FILE)),
            ),
            registry_name: args
                .registry_name
                .clone()
                .unwrap_or_else(|| DEFAULT_REGISTRY_NAME.to_string()),
            source_dir: under(
                &root,
                args.src.as_deref().unwrap_or(Path::new(DEFAULT_SOURCE_DIR)),
            ),
            report_path: under(
                &root,
                args.out.as_deref().unwrap_or(Path::new(DEFAULT_REPORT_PATH)),
            ),
            api_base_url,
            schema,
            clients,
            fetcher: SchemaFetcher {
                timeout: Duration::from_secs(args.timeout_secs),
                retries: args.retries,
                ..SchemaFetcher::default()
            },
            fail_on_drift: args.fail_on_drift,
            json: args.json,
            root,
        }
    }
}

fn under(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
