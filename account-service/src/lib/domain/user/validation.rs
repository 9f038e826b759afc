use crate::user::errors::Rule;
use crate::user::errors::ValidationError;
use crate::user::models::EmailAddress;
use crate::user::models::NewUser;
use crate::user::models::UserLogin;
use crate::user::models::Username;
use crate::user::models::ValidatedUser;

/// Structural validator for registration candidates and login requests.
///
/// Each field reports its first violated rule. Across fields (username, password,
/// email for registration) the first violation with a field-specific message is
/// reported; a generic one is reported only when no other field failed.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    password_min_length: usize,
    login_password_min_length: usize,
}

impl Validator {
    pub const PASSWORD_FIELD: &'static str = "password";
    pub const PASSWORD_MIN_LENGTH: usize = 8;
    pub const LOGIN_PASSWORD_MIN_LENGTH: usize = 6;

    pub fn new() -> Self {
        Self {
            password_min_length: Self::PASSWORD_MIN_LENGTH,
            login_password_min_length: Self::LOGIN_PASSWORD_MIN_LENGTH,
        }
    }

    /// Validate a registration candidate.
    ///
    /// # Arguments
    /// * `candidate` - Raw registration request
    ///
    /// # Returns
    /// Candidate with typed username and email, password still in plaintext
    ///
    /// # Errors
    /// * `ValidationError` - Reported field/rule violation
    pub fn validate(&self, candidate: NewUser) -> Result<ValidatedUser, ValidationError> {
        let username = Username::new(candidate.username);
        let password = Self::check_password(&candidate.password, self.password_min_length);
        let email = EmailAddress::new(candidate.email);

        if let Some(violation) = Self::reported([
            username.as_ref().err(),
            password.as_ref().err(),
            email.as_ref().err(),
        ]) {
            return Err(violation);
        }

        Ok(ValidatedUser {
            username: username?,
            email: email?,
            password: candidate.password,
        })
    }

    /// Validate the shape of a login request.
    ///
    /// This never touches stored accounts, so a failure here says nothing about
    /// whether the email is registered.
    ///
    /// # Errors
    /// * `ValidationError` - Reported field/rule violation
    pub fn validate_login(&self, credentials: &UserLogin) -> Result<(), ValidationError> {
        let email = EmailAddress::new(credentials.email.clone());
        let password = Self::check_password(&credentials.password, self.login_password_min_length);

        match Self::reported([email.as_ref().err(), password.as_ref().err()]) {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }

    /// Pick the violation to report from per-field results given in field order.
    fn reported<const N: usize>(
        violations: [Option<&ValidationError>; N],
    ) -> Option<ValidationError> {
        let violations: Vec<&ValidationError> = violations.into_iter().flatten().collect();

        violations
            .iter()
            .find(|violation| violation.rule.has_message())
            .or(violations.first())
            .map(|violation| **violation)
    }

    fn check_password(password: &str, min_length: usize) -> Result<(), ValidationError> {
        if password.is_empty() {
            Err(ValidationError::new(Self::PASSWORD_FIELD, Rule::Required))
        } else if password.chars().count() < min_length {
            Err(ValidationError::new(
                Self::PASSWORD_FIELD,
                Rule::Min(min_length),
            ))
        } else {
            Ok(())
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(username: &str, email: &str, password: &str) -> NewUser {
        NewUser::new(username, email, password)
    }

    #[test]
    fn test_valid_candidate() {
        let validated = Validator::new()
            .validate(candidate("alice123", "a@x.com", "secret123"))
            .expect("Candidate should be valid");

        assert_eq!(validated.username.as_str(), "alice123");
        assert_eq!(validated.email.as_str(), "a@x.com");
        assert_eq!(validated.password, "secret123");
    }

    #[test]
    fn test_each_rule_names_its_field() {
        let validator = Validator::new();
        let cases = [
            (candidate("al", "a@x.com", "secret123"), "username", Rule::Min(3)),
            (candidate("alice123", "a@x.com", "secret1"), "password", Rule::Min(8)),
            (candidate("alice123", "a@", "secret123"), "email", Rule::Email),
            (candidate("alice123", "", "secret123"), "email", Rule::Required),
            (candidate("alice123", "a@x.com", ""), "password", Rule::Required),
            (candidate("", "a@x.com", "secret123"), "username", Rule::Required),
            (
                candidate("alice-123", "a@x.com", "secret123"),
                "username",
                Rule::Alphanumeric,
            ),
        ];

        for (input, field, rule) in cases {
            let err = match validator.validate(input) {
                Ok(_) => panic!("Expected {} to fail {:?}", field, rule),
                Err(e) => e,
            };
            assert_eq!(err, ValidationError::new(field, rule));
        }
    }

    #[test]
    fn test_first_failure_wins() {
        // Every field has a field-specific violation; username is checked first.
        let err = match Validator::new().validate(candidate("a", "bad", "short")) {
            Ok(_) => panic!("Expected validation failure"),
            Err(e) => e,
        };
        assert_eq!(err.field, "username");
        assert_eq!(err.to_string(), "username must be at least 3 characters long");
    }

    #[test]
    fn test_generic_violation_yields_to_later_field() {
        let err = match Validator::new().validate(candidate("alice-123", "bad", "secret123")) {
            Ok(_) => panic!("Expected validation failure"),
            Err(e) => e,
        };
        assert_eq!(err, ValidationError::new("email", Rule::Email));
        assert_eq!(err.to_string(), "email must be a valid email address");

        let err = match Validator::new().validate(candidate("alice-123", "a@x.com", "short")) {
            Ok(_) => panic!("Expected validation failure"),
            Err(e) => e,
        };
        assert_eq!(err.to_string(), "password must be at least 8 characters long");
    }

    #[test]
    fn test_generic_violation_alone() {
        let err = match Validator::new().validate(candidate("alice-123", "a@x.com", "secret123")) {
            Ok(_) => panic!("Expected validation failure"),
            Err(e) => e,
        };
        assert_eq!(err, ValidationError::new("username", Rule::Alphanumeric));
        assert_eq!(err.to_string(), "validation failed");
    }

    #[test]
    fn test_validate_login() {
        let validator = Validator::new();

        assert!(validator
            .validate_login(&UserLogin::new("a@x.com", "secret"))
            .is_ok());
        assert_eq!(
            validator.validate_login(&UserLogin::new("a@x.com", "12345")),
            Err(ValidationError::new("password", Rule::Min(6)))
        );
        assert_eq!(
            validator.validate_login(&UserLogin::new("nope", "secret123")),
            Err(ValidationError::new("email", Rule::Email))
        );
    }
}
