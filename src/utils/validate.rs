use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9@.+_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

pub const USERNAME_MAX_LEN: usize = 30;
pub const NAME_MAX_LEN: usize = 30;

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度：3 <= x <= 30
    let len = username.chars().count();
    if !(3..=USERNAME_MAX_LEN).contains(&len) {
        return Err("Username length must be between 3 and 30 characters");
    }
    // 只允许字母、数字以及 @ . + - _
    if !USERNAME_RE.is_match(username) {
        return Err("Username may only contain letters, digits and @/./+/-/_");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 姓名类字段：非空且不超过 30 个字符
pub fn validate_name(value: &str) -> Result<(), &'static str> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err("Name must not be empty");
    }
    if len > NAME_MAX_LEN {
        return Err("Name must be at most 30 characters long");
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// - 至少 8 个字符
/// - 不能全为数字
/// - 必须同时包含字母与数字
/// - 不能是常见弱密码
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.push("Password must not be entirely numeric");
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    if !password.chars().any(|c| c.is_alphabetic()) && !password.is_empty() {
        errors.push("Password must contain at least one letter");
    }

    let weak_passwords = [
        "password",
        "password1",
        "azerty123",
        "qwerty123",
        "motdepasse1",
        "admin123",
        "abcd1234",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("lucie.m").is_ok());
        assert!(validate_username("a+b@c_d-e").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("with space").is_err());
        assert!(validate_username(&"x".repeat(31)).is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("parent@example.fr").is_ok());
        assert!(validate_email("parent@example").is_err());
        assert!(validate_email("no-at-sign.com").is_err());
    }

    #[test]
    fn test_name_rules() {
        assert!(validate_name("Élodie").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"n".repeat(31)).is_err());
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("Secret123").is_valid);
        assert!(validate_password("maths2024!").is_valid);
    }

    #[test]
    fn test_numeric_password() {
        let result = validate_password("12345678");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must not be entirely numeric")
        );
    }

    #[test]
    fn test_short_and_common_passwords() {
        let result = validate_password("ab1");
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );

        let result = validate_password("Password1");
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }
}
