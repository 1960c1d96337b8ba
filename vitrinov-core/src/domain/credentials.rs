//! Login and sign-up form validation

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{json, Value as JsonValue};

use super::result::{Error, Result};

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email pattern"))
}

fn check_email(email: &str) -> Result<String> {
    let email = email.trim();
    if !email_re().is_match(email) {
        return Err(Error::validation("Ingresa un correo válido."));
    }
    Ok(email.to_string())
}

fn check_password(password: &str) -> Result<()> {
    if password.chars().count() <= 5 {
        return Err(Error::validation(
            "La contraseña debe tener más de 5 caracteres.",
        ));
    }
    Ok(())
}

/// Email and password for `POST /auth/login`
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Result<Self> {
        let email = check_email(email)?;
        check_password(password)?;
        Ok(Self {
            email,
            password: password.to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn to_json(&self) -> JsonValue {
        json!({ "email": self.email, "password": self.password })
    }
}

// Keep the password out of debug output and logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Fields for `POST /auth/register`
#[derive(Clone)]
pub struct Registration {
    name: String,
    credentials: Credentials,
}

impl Registration {
    pub fn new(name: &str, email: &str, password: &str) -> Result<Self> {
        let name = name.trim();
        if name.chars().count() <= 5 {
            return Err(Error::validation("El nombre debe tener más de 5 caracteres."));
        }
        Ok(Self {
            name: name.to_string(),
            credentials: Credentials::new(email, password)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        self.credentials.email()
    }

    pub fn to_json(&self) -> JsonValue {
        json!({
            "name": self.name,
            "email": self.credentials.email,
            "password": self.credentials.password,
        })
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("credentials", &self.credentials)
            .finish()
    }
}
