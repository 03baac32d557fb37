//! Configuration module for Course-Crawler
//!
//! Every setting has a default, so a config file is optional. When one is
//! given it is a TOML file with kebab-case keys.
//!
//! # Example
//!
//! ```no_run
//! use course_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Page size: {}", config.api.page_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ApiConfig, Config, OutputConfig, DEFAULT_OUTPUT_PATH, DEFAULT_PAGE_SIZE,
    DEFAULT_URL_TEMPLATE, SEMESTER_PLACEHOLDER,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
