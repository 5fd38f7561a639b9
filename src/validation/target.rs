//! Scan target validation.
//!
//! A target is an IPv4 address or CIDR range. Validation happens before the
//! rate limiter and before any external call, and failures carry a specific,
//! user-facing message.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ScanError;
use crate::scanner::client::Credentials;

/// Upper bound on target length.
pub const MAX_TARGET_LEN: usize = 100;
/// Upper bound on credential field length.
pub const MAX_CRED_LEN: usize = 255;

lazy_static! {
    /// Strict IPv4 address with optional /0-32 prefix.
    static ref TARGET_PATTERN: Regex = Regex::new(
        r"^((25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)(/(3[0-2]|[12]?\d))?$"
    )
    .unwrap();
}

/// Validate a scan target.
pub fn validate_target(target: &str) -> Result<(), ScanError> {
    if target.is_empty() {
        return Err(ScanError::InvalidTarget(
            "Target IP or range is required.".to_string(),
        ));
    }
    if target.len() > MAX_TARGET_LEN {
        return Err(ScanError::InvalidTarget(format!(
            "Target exceeds {} characters.",
            MAX_TARGET_LEN
        )));
    }
    if !TARGET_PATTERN.is_match(target) {
        return Err(ScanError::InvalidTarget(
            "Invalid target format. Only IP addresses and CIDR ranges are allowed.".to_string(),
        ));
    }
    Ok(())
}

/// Validate optional credentials.
pub fn validate_creds(creds: Option<&Credentials>) -> Result<(), ScanError> {
    if let Some(creds) = creds {
        if creds.user.len() > MAX_CRED_LEN || creds.pass.len() > MAX_CRED_LEN {
            return Err(ScanError::InvalidTarget(format!(
                "Credential fields exceed {} characters.",
                MAX_CRED_LEN
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_targets() {
        assert!(validate_target("127.0.0.1").is_ok());
        assert!(validate_target("192.168.1.0/24").is_ok());
        assert!(validate_target("10.0.0.0/8").is_ok());
        assert!(validate_target("255.255.255.255/32").is_ok());
    }

    #[test]
    fn test_invalid_targets() {
        assert!(validate_target("").is_err());
        assert!(validate_target("broker.local").is_err());
        assert!(validate_target("256.1.1.1").is_err());
        assert!(validate_target("10.0.0.1/33").is_err());
        assert!(validate_target("10.0.0.1; rm -rf /").is_err());
        assert!(validate_target("10.0.0").is_err());
    }

    #[test]
    fn test_overlong_target() {
        let long = format!("{}{}", "1".repeat(MAX_TARGET_LEN), ".2.3.4");
        assert!(validate_target(&long).is_err());
    }

    #[test]
    fn test_rejection_before_external_call_has_specific_message() {
        let err = validate_target("not-an-ip").unwrap_err();
        assert!(err
            .to_string()
            .contains("Only IP addresses and CIDR ranges are allowed"));
    }

    #[test]
    fn test_cred_limits() {
        let ok = Credentials {
            user: "mqtt".to_string(),
            pass: "secret".to_string(),
        };
        assert!(validate_creds(Some(&ok)).is_ok());
        assert!(validate_creds(None).is_ok());

        let bad = Credentials {
            user: "u".repeat(MAX_CRED_LEN + 1),
            pass: String::new(),
        };
        assert!(validate_creds(Some(&bad)).is_err());
    }
}
