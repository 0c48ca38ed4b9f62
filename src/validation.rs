//! Form Validation
//!
//! Login and registration form rules. Each field reports its first failing
//! rule only.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_FULL_NAME_LEN: usize = 2;

/// Form fields that can carry an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    Email,
    Password,
    ConfirmPassword,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::Email => "email",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
        }
    }
}

/// Field -> message for every failing field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, &'static str>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.errors.iter().map(|(f, m)| (*f, *m))
    }

    fn check(&mut self, field: Field, result: Result<(), &'static str>) {
        if let Err(message) = result {
            self.errors.insert(field, message);
        }
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<&str> = self.errors.values().copied().collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"))
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.trim().is_empty() {
        return Err("Email is required");
    }
    if !email_regex().is_match(email.trim()) {
        return Err("Enter a valid email");
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.is_empty() {
        return Err("Password is required");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password should be at least 6 characters long");
    }
    Ok(())
}

pub fn validate_full_name(full_name: &str) -> Result<(), &'static str> {
    let trimmed = full_name.trim();
    if trimmed.is_empty() {
        return Err("Full Name is required");
    }
    if trimmed.chars().count() < MIN_FULL_NAME_LEN {
        return Err("Full Name must be at least 2 characters");
    }
    Ok(())
}

pub fn validate_confirm_password(password: &str, confirm: &str) -> Result<(), &'static str> {
    if confirm.is_empty() {
        return Err("Confirm Password is required");
    }
    if password != confirm {
        return Err("Passwords must match");
    }
    Ok(())
}

/// Login form values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub keep_logged_in: bool,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check(Field::Email, validate_email(&self.email));
        errors.check(Field::Password, validate_password(&self.password));
        errors.into_result()
    }
}

/// Registration form values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check(Field::FullName, validate_full_name(&self.full_name));
        errors.check(Field::Email, validate_email(&self.email));
        errors.check(Field::Password, validate_password(&self.password));
        errors.check(
            Field::ConfirmPassword,
            validate_confirm_password(&self.password, &self.confirm_password),
        );
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_rules() {
        assert_eq!(validate_email(""), Err("Email is required"));
        assert_eq!(validate_email("john"), Err("Enter a valid email"));
        assert_eq!(validate_email("john@example"), Err("Enter a valid email"));
        assert_eq!(validate_email("jo hn@example.com"), Err("Enter a valid email"));
        assert_eq!(validate_email("john.doe@example.com"), Ok(()));
    }

    #[test]
    fn test_login_form_first_failure_per_field() {
        let form = LoginForm {
            email: String::new(),
            password: "abc".into(),
            keep_logged_in: false,
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(Field::Email), Some("Email is required"));
        assert_eq!(
            errors.get(Field::Password),
            Some("Password should be at least 6 characters long")
        );

        let ok = LoginForm {
            email: "a@b.co".into(),
            password: "secret1".into(),
            keep_logged_in: true,
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_register_form() {
        let form = RegisterForm {
            full_name: "J".into(),
            email: "jane@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get(Field::FullName),
            Some("Full Name must be at least 2 characters")
        );
        assert_eq!(errors.get(Field::ConfirmPassword), Some("Passwords must match"));

        let empty = RegisterForm::default().validate().unwrap_err();
        assert_eq!(empty.get(Field::FullName), Some("Full Name is required"));
        assert_eq!(empty.get(Field::Password), Some("Password is required"));
        assert_eq!(
            empty.get(Field::ConfirmPassword),
            Some("Confirm Password is required")
        );
    }
}
