//! Validation helpers shared by the backend's request handling

use rust_decimal::Decimal;

/// Validate a product or meal name: non-empty after trimming, bounded length
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty");
    }
    if trimmed.len() > 200 {
        return Err("Name must be at most 200 characters");
    }
    Ok(())
}

/// Validate a username: 3+ characters, no surrounding whitespace
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.trim() != username {
        return Err("Username cannot start or end with whitespace");
    }
    if username.len() < 3 {
        return Err("Username must be at least 3 characters");
    }
    if username.len() > 64 {
        return Err("Username must be at most 64 characters");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters");
    }
    Ok(())
}

/// A delivery quantity or per-portion requirement must be strictly positive
pub fn validate_positive_grams(grams: Decimal) -> Result<(), &'static str> {
    if grams <= Decimal::ZERO {
        return Err("Quantity in grams must be greater than zero");
    }
    Ok(())
}

/// Initial stock may be zero but never negative
pub fn validate_non_negative_grams(grams: Decimal) -> Result<(), &'static str> {
    if grams < Decimal::ZERO {
        return Err("Quantity in grams cannot be negative");
    }
    Ok(())
}

/// Validate a calendar month number
pub fn validate_month(month: u32) -> Result<(), &'static str> {
    if !(1..=12).contains(&month) {
        return Err("Month must be between 1 and 12");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn rejects_blank_names() {
        assert!(validate_name("Rice").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("").is_err());
    }

    #[test]
    fn grams_bounds() {
        assert!(validate_positive_grams(Decimal::new(1, 2)).is_ok());
        assert!(validate_positive_grams(Decimal::ZERO).is_err());
        assert!(validate_positive_grams(Decimal::from(-5)).is_err());

        assert!(validate_non_negative_grams(Decimal::ZERO).is_ok());
        assert!(validate_non_negative_grams(Decimal::from(-1)).is_err());
    }

    #[test]
    fn month_bounds() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }
}
