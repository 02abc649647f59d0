//! Request and response models for the portal API.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::ApiError;

const NAME_LEN: std::ops::RangeInclusive<usize> = 4..=50;
const PASSWORD_LEN: std::ops::RangeInclusive<usize> = 8..=512;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
}

impl LoginCredentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterData {
    pub name: String,
    pub email: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
}

impl RegisterData {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check the constraints the backend enforces on new accounts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] naming the first violated constraint.
    pub fn validate(&self) -> Result<(), ApiError> {
        if !NAME_LEN.contains(&self.name.chars().count()) {
            return Err(ApiError::validation(format!(
                "Name must be between {} and {} characters",
                NAME_LEN.start(),
                NAME_LEN.end()
            )));
        }
        if !is_plausible_email(&self.email) {
            return Err(ApiError::validation("Email address is not valid"));
        }
        if !PASSWORD_LEN.contains(&self.password.expose_secret().chars().count()) {
            return Err(ApiError::validation(format!(
                "Password must be between {} and {} characters",
                PASSWORD_LEN.start(),
                PASSWORD_LEN.end()
            )));
        }
        Ok(())
    }
}

/// User record returned by `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

fn serialize_secret<S: Serializer>(secret: &SecretString, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(secret.expose_secret())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn credentials_serialize_password_but_debug_redacts_it() {
        let creds = LoginCredentials::new("vishy@example.com", "hunter22".to_owned());
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "email": "vishy@example.com", "password": "hunter22" })
        );
        assert!(!format!("{creds:?}").contains("hunter22"));
    }

    #[test]
    fn register_data_validation() {
        let ok = RegisterData::new("Vishy", "vishy@example.com", "s3cret-pass".to_owned());
        assert!(ok.validate().is_ok());

        let short_name = RegisterData::new("Ana", "a@example.com", "s3cret-pass".to_owned());
        assert!(matches!(
            short_name.validate(),
            Err(ApiError::Validation { .. })
        ));

        let bad_email = RegisterData::new("Vishy", "not-an-email", "s3cret-pass".to_owned());
        assert_eq!(
            bad_email.validate().unwrap_err().message(),
            "Email address is not valid"
        );

        let short_password = RegisterData::new("Vishy", "v@example.com", "short".to_owned());
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn user_deserializes_from_backend_record() {
        let user: User = serde_json::from_str(
            r#"{"id":7,"name":"Vishy","email":"vishy@example.com","password":"$2a$10$hash"}"#,
        )
        .unwrap();
        assert_eq!(
            user,
            User {
                id: 7,
                name: "Vishy".to_owned(),
                email: "vishy@example.com".to_owned(),
            }
        );
    }
}
