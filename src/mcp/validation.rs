//! Error context builder for structured, actionable error messages
//!
//! Every tool failure is rendered the same way:
//! - Operation that failed
//! - What went wrong
//! - Actionable suggestions for resolution

use crate::error::SpiderError;

/// Builder for structured error messages with context and suggestions
#[derive(Debug, Clone)]
pub struct ErrorContext {
    operation: String,
    details: Vec<String>,
    suggestions: Vec<String>,
}

impl ErrorContext {
    /// Create new error context for an operation
    ///
    /// # Example
    /// ```
    /// # use kodegen_tools_seo_spider::mcp::ErrorContext;
    /// let ctx = ErrorContext::new("Export crawl");
    /// ```
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            details: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Context for a [`SpiderError`], using its message and remediation
    #[must_use]
    pub fn from_error(operation: impl Into<String>, error: &SpiderError) -> Self {
        Self::new(operation)
            .detail(error.to_string())
            .suggest(error.remediation())
    }

    /// Add detail about what was checked or why it failed
    ///
    /// # Example
    /// ```
    /// # use kodegen_tools_seo_spider::mcp::ErrorContext;
    /// let ctx = ErrorContext::new("Crawl status")
    ///     .detail("crawl_id: crawl-1a2b3c4d")
    ///     .detail("Handle not found in registry");
    /// ```
    #[must_use]
    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    /// Add actionable suggestion for resolution
    ///
    /// # Example
    /// ```
    /// # use kodegen_tools_seo_spider::mcp::ErrorContext;
    /// let ctx = ErrorContext::new("Delete crawl")
    ///     .suggest("Use list_crawls to see valid crawl ids");
    /// ```
    #[must_use]
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Build formatted error message
    ///
    /// Format:
    /// ```text
    /// Operation failed: {operation}
    ///
    /// Details:
    ///   - {detail1}
    ///
    /// Suggestions:
    ///   - {suggestion1}
    /// ```
    #[must_use]
    pub fn build(self) -> String {
        let mut msg = format!("Operation failed: {}\n", self.operation);

        if !self.details.is_empty() {
            msg.push_str("\nDetails:\n");
            for detail in &self.details {
                for (i, line) in detail.lines().enumerate() {
                    let marker = if i == 0 { "  - " } else { "    " };
                    msg.push_str(&format!("{marker}{line}\n"));
                }
            }
        }

        if !self.suggestions.is_empty() {
            msg.push_str("\nSuggestions:\n");
            for suggestion in &self.suggestions {
                msg.push_str(&format!("  - {suggestion}\n"));
            }
        }

        msg
    }
}
