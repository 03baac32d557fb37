use serde::Deserialize;

/// Lesson-search endpoint used when no config file overrides it
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://fdjwgl.fudan.edu.cn/student/for-all/lesson-search/semester/{sid}/search/504";

/// Placeholder substituted with the semester id
pub const SEMESTER_PLACEHOLDER: &str = "{sid}";

/// Records requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Default output file name
pub const DEFAULT_OUTPUT_PATH: &str = "courses.json";

/// Main configuration structure for Course-Crawler
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub output: OutputConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Endpoint URL containing a `{sid}` placeholder
    #[serde(rename = "url-template")]
    pub url_template: String,

    /// Number of records requested per page
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Skip certificate chain and hostname verification.
    ///
    /// The lesson-search host serves an incomplete certificate chain, so this
    /// is on unless explicitly disabled.
    #[serde(rename = "accept-invalid-certs")]
    pub accept_invalid_certs: bool,

    /// User-Agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: 300,
            connect_timeout_secs: 10,
            accept_invalid_certs: true,
            user_agent: format!("course-crawler/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON file to write
    pub path: String,

    /// Spaces per indentation level
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_OUTPUT_PATH.to_string(),
            indent: 2,
        }
    }
}
