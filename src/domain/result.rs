//! Result type alias
//!
//! Convenience alias that uses [`AilError`] as the error type.

use super::errors::AilError;

/// Result type alias for configuration and store operations
///
/// # Examples
///
/// ```
/// use ail_config::domain::result::Result;
/// use ail_config::domain::errors::AilError;
///
/// fn lookup() -> Result<String> {
///     Ok("localhost".to_string())
/// }
///
/// fn failing_lookup() -> Result<()> {
///     Err(AilError::SectionNotFound("Redis_Cache".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, AilError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<u16> {
            Ok(6379)
        }

        let value = inner()?;
        assert_eq!(value, 6379);
        Ok(())
    }
}
