use thiserror::Error;

pub type ConverterResult<T> = Result<T, ConverterError>;

#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input text could not be parsed as JSON
    #[error("Failed to parse JSON string: {0}")]
    MalformedInput(String),

    /// Input parsed, but is not a usable array of objects
    #[error("{0}")]
    Shape(String),

    /// The workbook writer rejected the data or failed to encode it
    #[error("Failed to build spreadsheet: {0}")]
    Serialization(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to read spreadsheet: {0}")]
    Import(String),
}

impl ConverterError {
    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ConverterError::Io(_) => "io",
            ConverterError::Json(_) => "json",
            ConverterError::MalformedInput(_) => "malformed_input",
            ConverterError::Shape(_) => "shape",
            ConverterError::Serialization(_) => "serialization",
            ConverterError::InvalidParameter(_) => "invalid_parameter",
            ConverterError::Import(_) => "import",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_input_message() {
        let err = ConverterError::MalformedInput("expected value at line 1 column 1".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to parse JSON string: expected value at line 1 column 1"
        );
        assert_eq!(err.kind(), "malformed_input");
    }

    #[test]
    fn test_shape_message_is_verbatim() {
        let err = ConverterError::Shape("Input data is not an array".to_string());
        assert_eq!(err.to_string(), "Input data is not an array");
        assert_eq!(err.kind(), "shape");
    }

    #[test]
    fn test_io_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: ConverterError = io.into();
        assert!(err.to_string().starts_with("IO error"));
        assert_eq!(err.kind(), "io");
    }
}
