// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for store operations.

/// The error type reported by store operations.
///
/// Storage backends differ in how they fail, so the error is deliberately
/// opaque: a display message plus, when the backend supplied one, the
/// underlying cause behind [`std::error::Error::source`].
///
/// # Example
///
/// ```
/// use recall_store::Error;
///
/// let error = Error::from_message("backend unavailable");
/// ```
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Creates an error carrying just a message, with no underlying cause.
    ///
    /// # Examples
    ///
    /// ```
    /// use recall_store::Error;
    ///
    /// let error = Error::from_message("backend unavailable");
    /// assert_eq!(error.to_string(), "backend unavailable");
    /// ```
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error from an underlying cause, keeping it as the source.
    ///
    /// # Examples
    ///
    /// ```
    /// use recall_store::Error;
    ///
    /// let error = Error::caused_by(std::io::Error::other("disk unplugged"));
    /// assert!(std::error::Error::source(&error).is_some());
    /// ```
    pub fn caused_by(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        let source = cause.into();
        Self {
            message: source.to_string(),
            source: Some(source),
        }
    }
}

/// A specialized [`Result`] type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_displayed() {
        let error = Error::from_message("store unavailable");

        assert_eq!(error.to_string(), "store unavailable");
        assert!(std::error::Error::source(&error).is_none());
    }

    #[test]
    fn cause_is_kept_as_source() {
        let error = Error::caused_by(std::io::Error::other("disk unplugged"));

        assert_eq!(error.to_string(), "disk unplugged");
        let source = std::error::Error::source(&error).expect("cause should be kept");
        assert!(source.to_string().contains("disk unplugged"));
    }

    #[test]
    fn debug_output_includes_the_message() {
        let error = Error::from_message("refused");

        assert!(format!("{error:?}").contains("refused"));
    }

    #[test]
    fn result_alias_works_with_question_mark() {
        fn lookup() -> Result<u32> {
            Err(Error::from_message("lookup failed"))
        }

        fn forward() -> Result<u32> {
            let value = lookup()?;
            Ok(value)
        }

        let error = forward().expect_err("the failure should propagate");
        assert!(error.to_string().contains("lookup failed"));
    }
}
