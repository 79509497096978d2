//! Result type alias for pt2onnx

use super::errors::Pt2OnnxError;

/// Result type alias for pt2onnx operations
///
/// # Examples
///
/// ```
/// use pt2onnx::domain::result::Result;
/// use pt2onnx::domain::errors::Pt2OnnxError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(Pt2OnnxError::Configuration("no jobs configured".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, Pt2OnnxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(Pt2OnnxError::Other("test error".to_string()));
        assert!(result.is_err());
    }
}
