use finance_forecast::error::ForecastError;
use finance_math::MathError;
use std::io;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);
    assert!(matches!(forecast_error, ForecastError::IoError(_)));

    let math_error = MathError::CalculationError("singular matrix".to_string());
    assert!(matches!(
        ForecastError::from(math_error),
        ForecastError::FitFailure(msg) if msg == "singular matrix"
    ));

    let math_error = MathError::InvalidInput("test_size".to_string());
    assert!(matches!(
        ForecastError::from(math_error),
        ForecastError::InvalidParameter(_)
    ));
}

#[test]
fn test_error_display() {
    let error = ForecastError::InvalidParameter("test_size must be between 0 and 1".to_string());
    assert!(error.to_string().contains("test_size must be between 0 and 1"));

    let error = ForecastError::InsufficientData {
        required: 3,
        actual: 1,
    };
    assert_eq!(
        error.to_string(),
        "Insufficient data: need at least 3 training rows, got 1"
    );

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error_string = ForecastError::from(io_error).to_string();
    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));
}

#[test]
fn test_training_error_classification() {
    assert!(ForecastError::NoData.is_training_error());
    assert!(ForecastError::FitFailure("x".to_string()).is_training_error());
    assert!(ForecastError::InsufficientData {
        required: 3,
        actual: 0
    }
    .is_training_error());

    assert!(!ForecastError::ModelNotTrained.is_training_error());
    assert!(!ForecastError::ForecastingError("x".to_string()).is_training_error());
}
