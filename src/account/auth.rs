//! Sign-in and registration form checks.
//!
//! There is no credential verification: a form with every required field
//! filled in succeeds. Passwords are never stored.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// The only user data kept between sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Accept a filled-in sign-in form; the display name is the email's local part
pub fn sign_in(form: &SignInForm) -> Result<UserProfile> {
    if form.email.is_empty() || form.password.is_empty() {
        return Err(Error::Validation("Please fill in all fields".to_string()));
    }

    let name = form.email.split('@').next().unwrap_or_default();
    Ok(UserProfile {
        name: name.to_string(),
        email: form.email.clone(),
    })
}

/// Accept a filled-in registration form whose passwords match
pub fn register(form: &RegisterForm) -> Result<UserProfile> {
    if form.name.is_empty() || form.email.is_empty() || form.password.is_empty() {
        return Err(Error::Validation("Please fill in all fields".to_string()));
    }

    if form.password != form.confirm_password {
        return Err(Error::Validation("Passwords do not match".to_string()));
    }

    Ok(UserProfile {
        name: form.name.clone(),
        email: form.email.clone(),
    })
}
