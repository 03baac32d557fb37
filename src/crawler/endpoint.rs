//! Endpoint descriptor for one semester's lesson search

use crate::config::SEMESTER_PLACEHOLDER;
use crate::Result;
use std::fmt;
use url::Url;

/// A resolved lesson-search endpoint
///
/// Built once per crawl and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    semester_id: u32,
    url: Url,
}

impl Endpoint {
    /// Substitutes `semester_id` into `template` and parses the result
    ///
    /// # Example
    ///
    /// ```
    /// use course_crawler::crawler::Endpoint;
    ///
    /// let endpoint = Endpoint::resolve("https://example.com/semester/{sid}/search", 504).unwrap();
    /// assert_eq!(endpoint.url().as_str(), "https://example.com/semester/504/search");
    /// ```
    pub fn resolve(template: &str, semester_id: u32) -> Result<Self> {
        let url = Url::parse(&template.replace(SEMESTER_PLACEHOLDER, &semester_id.to_string()))?;
        Ok(Self { semester_id, url })
    }

    pub fn semester_id(&self) -> u32 {
        self.semester_id
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}
