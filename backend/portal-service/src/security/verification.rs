/// One-shot verification codes sent by email.
/// Codes are 6 decimal digits and expire after 10 minutes; the same
/// mechanism backs email verification and password reset.
use mongodb::bson::DateTime;
use rand::Rng;

pub const VERIFICATION_CODE_TTL_SECS: i64 = 600; // 10 minutes

/// Generate a random 6-digit verification code.
pub fn generate_verification_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    code.to_string()
}

/// Expiry instant for a code generated now.
pub fn code_expiry_from_now() -> DateTime {
    DateTime::from_millis(DateTime::now().timestamp_millis() + VERIFICATION_CODE_TTL_SECS * 1000)
}

/// True when the stored expiry lies in the past.
pub fn is_code_expired(expires: DateTime) -> bool {
    expires < DateTime::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_six_digits() {
        for _ in 0..50 {
            let code = generate_verification_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert!(!code.starts_with('0'));
        }
    }

    #[test]
    fn test_expiry_is_in_the_future() {
        let expiry = code_expiry_from_now();
        assert!(!is_code_expired(expiry));
        assert!(expiry > DateTime::now());
    }

    #[test]
    fn test_past_expiry_detected() {
        let past = DateTime::from_millis(DateTime::now().timestamp_millis() - 1000);
        assert!(is_code_expired(past));
    }
}
