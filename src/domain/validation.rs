//! Client-side form validation.
//!
//! These checks run before anything is sent to a store: sign-in and registration
//! fields, profile edits, and the admin article editor. Field-level failures are
//! collected in [`FieldErrors`] so a form can flag every bad field at once; the
//! article editor instead fails fast with a single [`EcoCampusError::Validation`].

use regex::Regex;
use std::sync::OnceLock;

use super::error::{EcoCampusError, Result};
use crate::storage::models::ArticlePayload;

/// Default institutional email domain accepted at registration.
pub const DEFAULT_INSTITUTIONAL_DOMAIN: &str = "alumnos.udg.mx";

/// Symbols accepted (and one of which is required) in passwords.
const PASSWORD_SYMBOLS: &str = "@$!%*?&";

/// Minimum password length.
const MIN_PASSWORD_LEN: usize = 8;

fn email_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
}

fn password_charset() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9@$!%*?&]+$").ok())
        .as_ref()
}

/// Checks the general shape `local@domain.tld`.
///
/// ```
/// use ecocampus::domain::validation::is_valid_email;
///
/// assert!(is_valid_email("ana@udg.mx"));
/// assert!(!is_valid_email("ana@udg"));
/// assert!(!is_valid_email("ana maria@udg.mx"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_some_and(|re| re.is_match(email))
}

/// Checks that `email` is an address on exactly the given institutional domain.
#[must_use]
pub fn is_institutional_email(email: &str, domain: &str) -> bool {
    let pattern = format!(r"^[^\s@]+@{}$", regex::escape(domain));
    Regex::new(&pattern).is_ok_and(|re| re.is_match(email))
}

/// Checks password strength.
///
/// At least eight characters drawn from ASCII letters, digits and `@$!%*?&`, with
/// at least one uppercase letter, one digit and one of those symbols.
///
/// ```
/// use ecocampus::domain::validation::is_strong_password;
///
/// assert!(is_strong_password("Recicla1!"));
/// assert!(!is_strong_password("recicla1!"));
/// assert!(!is_strong_password("Recicla1#"));
/// ```
#[must_use]
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password_charset().is_some_and(|re| re.is_match(password))
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

/// Per-field validation messages for sign-in and registration forms.
///
/// `None` means the field passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub terms: Option<String>,
}

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.confirm_password.is_none()
            && self.terms.is_none()
    }

    /// First failing message in form order, if any.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        [
            &self.name,
            &self.email,
            &self.password,
            &self.confirm_password,
            &self.terms,
        ]
        .into_iter()
        .find_map(|field| field.as_deref())
    }

    /// Converts into a `Result`, failing with the first message.
    ///
    /// # Errors
    ///
    /// Returns [`EcoCampusError::Validation`] when any field failed.
    pub fn into_result(self) -> Result<()> {
        match self.first() {
            Some(message) => Err(EcoCampusError::Validation(message.to_string())),
            None => Ok(()),
        }
    }
}

/// Registration form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accepted_terms: bool,
}

/// Validates the sign-in form.
#[must_use]
pub fn validate_login(email: &str, password: &str) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if !is_valid_email(email) {
        errors.email = Some("Invalid email".to_string());
    }
    if !is_strong_password(password) {
        errors.password = Some(password_rule_message());
    }
    errors
}

/// Validates the registration form against the institutional `domain`.
#[must_use]
pub fn validate_registration(form: &RegistrationForm, domain: &str) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if form.name.trim().is_empty() {
        errors.name = Some("Invalid name".to_string());
    }
    if !is_institutional_email(&form.email, domain) {
        errors.email = Some(format!("Email must be a @{domain} address"));
    }
    if !is_strong_password(&form.password) {
        errors.password = Some(password_rule_message());
    }
    if form.password != form.confirm_password {
        errors.confirm_password = Some("Passwords do not match".to_string());
    }
    if !form.accepted_terms {
        errors.terms = Some("Accept the terms and conditions".to_string());
    }
    errors
}

/// Validates a profile edit; the display name is mandatory.
///
/// # Errors
///
/// Returns [`EcoCampusError::Validation`] for a blank name.
pub fn validate_profile_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EcoCampusError::Validation("Name is required".to_string()));
    }
    Ok(trimmed.to_string())
}

fn password_rule_message() -> String {
    format!(
        "Must have at least {MIN_PASSWORD_LEN} characters, 1 uppercase letter, 1 number and 1 symbol ({PASSWORD_SYMBOLS})"
    )
}

/// Raw contents of the admin article editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleForm {
    pub title: String,
    pub description: String,
    pub content: String,
    pub category: String,
    pub image_url: String,
    pub date: String,
    pub featured: bool,
    pub is_new: bool,
}

/// Validates the article editor and produces a store payload.
///
/// Title, content, category, image URL and date are required after trimming.
/// A blank description is stored as `None`.
///
/// # Errors
///
/// Returns [`EcoCampusError::Validation`] naming the required fields when any of
/// them is blank.
pub fn validate_article_form(form: &ArticleForm) -> Result<ArticlePayload> {
    let required = [
        &form.title,
        &form.content,
        &form.category,
        &form.image_url,
        &form.date,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(EcoCampusError::Validation(
            "Title, content, category, image URL and date are required".to_string(),
        ));
    }

    let description = form.description.trim();

    Ok(ArticlePayload {
        title: form.title.trim().to_string(),
        description: (!description.is_empty()).then(|| description.to_string()),
        image_url: form.image_url.trim().to_string(),
        content: form.content.trim().to_string(),
        category: form.category.trim().to_string(),
        featured: form.featured,
        is_new: form.is_new,
        date: form.date.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn institutional_email_requires_exact_domain() {
        assert!(is_institutional_email("ana@alumnos.udg.mx", DEFAULT_INSTITUTIONAL_DOMAIN));
        assert!(!is_institutional_email("ana@udg.mx", DEFAULT_INSTITUTIONAL_DOMAIN));
        assert!(!is_institutional_email("ana@alumnosXudg.mx", DEFAULT_INSTITUTIONAL_DOMAIN));
        assert!(!is_institutional_email("ana@alumnos.udg.mx.evil", DEFAULT_INSTITUTIONAL_DOMAIN));
        assert!(!is_institutional_email("@alumnos.udg.mx", DEFAULT_INSTITUTIONAL_DOMAIN));
    }

    #[test]
    fn password_rules() {
        assert!(is_strong_password("Abcdef1!"));
        assert!(!is_strong_password("Abcde1!"), "too short");
        assert!(!is_strong_password("Abcdefgh!"), "no digit");
        assert!(!is_strong_password("Abcdefg12"), "no symbol");
        assert!(!is_strong_password("abcdefg1!"), "no uppercase");
        assert!(!is_strong_password("Abcdéfg1!"), "non-ascii letter");
        assert!(!is_strong_password("Abc def1!"), "whitespace");
    }

    #[test]
    fn registration_collects_every_failing_field() {
        let form = RegistrationForm {
            name: " ".to_string(),
            email: "ana@gmail.com".to_string(),
            password: "weak".to_string(),
            confirm_password: "other".to_string(),
            accepted_terms: false,
        };
        let errors = validate_registration(&form, DEFAULT_INSTITUTIONAL_DOMAIN);
        assert!(errors.name.is_some());
        assert!(errors.email.is_some());
        assert!(errors.password.is_some());
        assert!(errors.confirm_password.is_some());
        assert!(errors.terms.is_some());
        assert_eq!(errors.first(), Some("Invalid name"));
    }

    #[test]
    fn valid_registration_passes() {
        let form = RegistrationForm {
            name: "Ana".to_string(),
            email: "ana@alumnos.udg.mx".to_string(),
            password: "Recicla1!".to_string(),
            confirm_password: "Recicla1!".to_string(),
            accepted_terms: true,
        };
        let errors = validate_registration(&form, DEFAULT_INSTITUTIONAL_DOMAIN);
        assert!(errors.is_empty());
        assert!(errors.into_result().is_ok());
    }

    #[test]
    fn login_rejects_bad_email() {
        let errors = validate_login("not-an-email", "Recicla1!");
        assert!(errors.email.is_some());
        assert!(errors.password.is_none());
    }

    #[test]
    fn article_form_requires_fields_and_trims() {
        let mut form = ArticleForm {
            title: "  Nuevo punto limpio ".to_string(),
            description: "   ".to_string(),
            content: "Contenido".to_string(),
            category: "Reciclaje".to_string(),
            image_url: "https://img/1.png".to_string(),
            date: "23 ABR 2025".to_string(),
            featured: true,
            is_new: false,
        };

        let payload = validate_article_form(&form).unwrap();
        assert_eq!(payload.title, "Nuevo punto limpio");
        assert_eq!(payload.description, None);
        assert!(payload.featured);

        form.date = "  ".to_string();
        let err = validate_article_form(&form).unwrap_err();
        assert!(matches!(err, EcoCampusError::Validation(_)));
    }

    #[test]
    fn profile_name_is_required() {
        assert!(validate_profile_name("  ").is_err());
        assert_eq!(validate_profile_name(" Ana ").unwrap(), "Ana");
    }
}
