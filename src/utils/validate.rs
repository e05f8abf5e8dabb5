use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::users::entities::UserRole;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_FULL_NAME_LEN: usize = 2;

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters long");
    }
    Ok(())
}

pub fn validate_full_name(full_name: &str) -> Result<(), &'static str> {
    if full_name.trim().chars().count() < MIN_FULL_NAME_LEN {
        return Err("Full name must be at least 2 characters long");
    }
    Ok(())
}

pub fn validate_role(role: &str) -> Result<UserRole, &'static str> {
    role.parse::<UserRole>()
        .map_err(|_| "Role must be one of admin, teacher, student, staff, parent")
}

/// 注册/建号时的通用校验
pub fn validate_new_user(
    email: &str,
    password: &str,
    full_name: &str,
    role: &str,
) -> Result<UserRole, &'static str> {
    validate_email(email)?;
    validate_password(password)?;
    validate_full_name(full_name)?;
    validate_role(role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(validate_email("teacher@school.edu").is_ok());
        assert!(validate_email("first.last+tag@sub.example.in").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_password_min_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_full_name() {
        assert!(validate_full_name(" A ").is_err());
        assert!(validate_full_name("Al").is_ok());
    }

    #[test]
    fn test_role() {
        assert_eq!(validate_role("teacher").unwrap(), UserRole::Teacher);
        assert!(validate_role("principal").is_err());
    }

    #[test]
    fn test_new_user_order() {
        assert_eq!(
            validate_new_user("bad", "x", "", "nope"),
            Err("Email format is invalid")
        );
        assert!(validate_new_user("p@school.in", "parent1", "Pat", "parent").is_ok());
    }
}
