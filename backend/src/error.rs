//! Error types for the analysis core.
//!
//! Every failure carries an [`ErrorContext`] describing where it happened so
//! that a rejected query can be reported with enough detail to debug it.

use std::fmt;

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Structured context for analysis errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "parse_interval", "pivot")
    pub operation: Option<String>,
    /// The entity involved (e.g., "interval", "edge", "trip")
    pub entity: Option<String>,
    /// The offending value if applicable
    pub entity_id: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the entity type.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Set the entity ID.
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn is_empty(&self) -> bool {
        self.operation.is_none()
            && self.entity.is_none()
            && self.entity_id.is_none()
            && self.details.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={}", id));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for the analysis core.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Malformed interval token or time label.
    #[error("Format error: {message} {context}")]
    FormatError {
        message: String,
        context: ErrorContext,
    },

    /// A metric column was requested that the loaded table does not carry.
    #[error("Missing column: {message} {context}")]
    MissingColumnError {
        message: String,
        context: ErrorContext,
    },

    /// A time-range selection outside the timeline.
    #[error("Invalid range: {message} {context}")]
    InvalidRange {
        message: String,
        context: ErrorContext,
    },

    /// Metric name not in the catalogue.
    #[error("Unknown metric: {message} {context}")]
    UnknownMetric {
        message: String,
        context: ErrorContext,
    },

    /// Input file could not be read or decoded.
    #[error("Load error: {message} {context}")]
    LoadError {
        message: String,
        context: ErrorContext,
    },

    /// Configuration or initialization error.
    #[error("Configuration error: {message} {context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },
}

impl AnalysisError {
    /// Create a format error with context.
    pub fn format(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::FormatError {
            message: message.into(),
            context,
        }
    }

    /// Create a missing column error for `column`.
    pub fn missing_column(column: impl Into<String>, context: ErrorContext) -> Self {
        let column = column.into();
        Self::MissingColumnError {
            message: format!("column '{}' is not present in the table", column),
            context: context.with_entity_id(column),
        }
    }

    /// Create an invalid range error with context.
    pub fn invalid_range(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::InvalidRange {
            message: message.into(),
            context,
        }
    }

    /// Create an unknown metric error for `name`.
    pub fn unknown_metric(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::UnknownMetric {
            message: format!("'{}' is not a known metric", name),
            context: ErrorContext::new("parse_metric").with_entity_id(name),
        }
    }

    /// Create a load error with context.
    pub fn load(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::LoadError {
            message: message.into(),
            context,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::FormatError { context, .. }
            | Self::MissingColumnError { context, .. }
            | Self::InvalidRange { context, .. }
            | Self::UnknownMetric { context, .. }
            | Self::LoadError { context, .. }
            | Self::ConfigurationError { context, .. } => context,
        }
    }

    /// Whether the error stems from caller input rather than the loaded data.
    pub fn is_rejected_query(&self) -> bool {
        matches!(
            self,
            Self::FormatError { .. } | Self::InvalidRange { .. } | Self::UnknownMetric { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_display() {
        let ctx = ErrorContext::new("parse_interval")
            .with_entity("interval")
            .with_entity_id("abc");
        assert_eq!(
            ctx.to_string(),
            "[operation=parse_interval, entity=interval, id=abc]"
        );
    }

    #[test]
    fn test_empty_context_displays_nothing() {
        assert_eq!(ErrorContext::default().to_string(), "");
    }

    #[test]
    fn test_missing_column_message() {
        let err = AnalysisError::missing_column("edge_speed", ErrorContext::new("pivot"));
        let msg = err.to_string();
        assert!(msg.contains("edge_speed"));
        assert!(msg.contains("operation=pivot"));
        assert!(!err.is_rejected_query());
    }

    #[test]
    fn test_rejected_query_classification() {
        assert!(AnalysisError::unknown_metric("foo").is_rejected_query());
        assert!(AnalysisError::format("bad", ErrorContext::default()).is_rejected_query());
        assert!(!AnalysisError::configuration("x").is_rejected_query());
    }
}
