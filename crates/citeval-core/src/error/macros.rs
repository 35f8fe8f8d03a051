//! Error macros for citeval

/// Macro for creating invalid value errors
#[macro_export]
macro_rules! bail_invalid {
    ($context:expr, $value:expr) => {
        return Err($crate::error::CitevalError::invalid_value($context, $value))
    };
}
