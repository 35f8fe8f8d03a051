const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Parse a worker count; at least one
pub fn parse_jobs(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Accept a bare level or anything that looks like filter directives
pub fn parse_log_level(s: &str) -> std::result::Result<String, String> {
    if s.contains('=') {
        return Ok(s.to_string());
    }
    let level = s.trim().to_ascii_lowercase();
    if LEVELS.contains(&level.as_str()) {
        Ok(level)
    } else {
        Err(format!(
            "unknown level '{s}' (expected one of: {})",
            LEVELS.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_jobs() {
        assert_eq!(parse_jobs("8"), Ok(8));
        assert!(parse_jobs("0").is_err());
        assert!(parse_jobs("-1").is_err());
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("INFO"), Ok("info".to_string()));
        assert_eq!(
            parse_log_level("citeval_core=trace"),
            Ok("citeval_core=trace".to_string())
        );
        assert!(parse_log_level("loud").is_err());
    }
}
