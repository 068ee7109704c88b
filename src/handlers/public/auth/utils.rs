use chrono_tz::Tz;
use validator::ValidateEmail;

/// Validate email format (HTML5 rules via `validator`)
pub fn validate_email_format(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if !email.validate_email() {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Accept only IANA zone names (`America/New_York`, `UTC`).
pub fn validate_timezone(timezone: &str) -> Result<Tz, String> {
    timezone
        .parse::<Tz>()
        .map_err(|_| format!("Unknown timezone {timezone}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for email in ["a@b.com", "first.last@example.co.uk", "x+tag@mail.example.org"] {
            assert!(validate_email_format(email).is_ok(), "{email}");
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in ["", "plain", "@b.com", "a@", "a@@b.com", "a@b@c.com", "a b@c.com", "a@.com", "a@-b.com"] {
            assert!(validate_email_format(email).is_err(), "{email}");
        }
    }

    #[test]
    fn test_timezones() {
        assert!(validate_timezone("America/New_York").is_ok());
        assert!(validate_timezone("UTC").is_ok());
        assert!(validate_timezone("Mars/Olympus_Mons").is_err());
        assert!(validate_timezone("").is_err());
    }
}
