//! Validation helpers for configuration values

use std::net::SocketAddr;
use validator::ValidationError;

/// Validate a `host:port` socket address (IP literal hosts only)
pub fn validate_bind_address(address: &str) -> Result<(), ValidationError> {
    address
        .parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_bind_address"))
}

/// Validate file path (basic check for valid path characters)
pub fn validate_file_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::new("empty_file_path"));
    }

    // Colon stays allowed for Windows drive letters
    let invalid_chars = ['<', '>', '"', '|', '?', '*', '\0'];
    if path.chars().any(|c| invalid_chars.contains(&c)) {
        return Err(ValidationError::new("invalid_file_path_characters"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        assert!(validate_bind_address("127.0.0.1:3000").is_ok());
        assert!(validate_bind_address("[::1]:8080").is_ok());
        assert!(validate_bind_address("0.0.0.0").is_err());
        assert!(validate_bind_address("example.com:80").is_err());
    }

    #[test]
    fn test_file_path() {
        assert!(validate_file_path("catalogs/catalog-index.json").is_ok());
        assert!(validate_file_path("C:\\catalogs\\index.json").is_ok());
        assert!(validate_file_path("").is_err());
        assert!(validate_file_path("catalogs/*.json").is_err());
    }
}
