//! Auth commands - login, register, logout, whoami

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password};
use serde_json::json;
use vitrinov_core::domain::{Credentials, Registration};

use super::{get_context, require_ok};
use crate::output;

fn prompt_email(email: Option<String>) -> Result<String> {
    Ok(match email {
        Some(e) => e,
        None => Input::new().with_prompt("Correo").interact_text()?,
    })
}

fn prompt_password(password: Option<String>) -> Result<String> {
    Ok(match password {
        Some(p) => p,
        None => Password::new().with_prompt("Contraseña").interact()?,
    })
}

pub fn run_login(email: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let email = prompt_email(email)?;
    let password = prompt_password(password)?;
    let credentials = Credentials::new(&email, &password)?;

    let ctx = get_context("login")?;
    let spinner = output::spinner("Iniciando sesión...");
    let result = ctx.auth_service.login(&credentials);
    output::finish_spinner(spinner);
    let (session, message) = require_ok(result)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "ok": true,
                "message": message,
                "userId": session.user_id(),
            }))?
        );
        return Ok(());
    }

    output::success(&message);
    if let Some(name) = session.profile().as_ref().and_then(|u| u.display_name()) {
        println!("Bienvenido, {}", name.bold());
    }
    Ok(())
}

pub fn run_register(
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Nombre").interact_text()?,
    };
    let email = prompt_email(email)?;
    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Contraseña")
            .with_confirmation("Confirma la contraseña", "Las contraseñas no coinciden")
            .interact()?,
    };
    let registration = Registration::new(&name, &email, &password)?;

    let ctx = get_context("register")?;
    let (_, message) = require_ok(ctx.auth_service.register(&registration))?;
    output::success(&message);
    println!("Ejecuta 'vt login' para iniciar sesión.");
    Ok(())
}

pub fn run_logout() -> Result<()> {
    let ctx = get_context("logout")?;
    ctx.auth_service.logout()?;
    output::success("Sesión cerrada");
    Ok(())
}

pub fn run_whoami(json: bool) -> Result<()> {
    let ctx = get_context("whoami")?;
    let session = ctx.session.get_cached();

    if json {
        let profile = session.profile();
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "authenticated": session.is_authenticated(),
                "userId": session.user_id(),
                "name": profile.as_ref().and_then(|u| u.name.clone()),
                "email": profile.as_ref().and_then(|u| u.email.clone()),
                "apiBaseUrl": ctx.config.api_base_url,
            }))?
        );
        return Ok(());
    }

    if !session.is_authenticated() {
        output::warning("No has iniciado sesión. Usa 'vt login'.");
        return Ok(());
    }

    let profile = session.profile();
    println!("{}", "Sesión activa".bold());
    if let Some(name) = profile.as_ref().and_then(|u| u.name.as_deref()) {
        println!("  Nombre: {}", name);
    }
    if let Some(email) = profile.as_ref().and_then(|u| u.email.as_deref()) {
        println!("  Correo: {}", email);
    }
    if !session.user_id().is_empty() {
        println!("  Usuario: {}", session.user_id());
    }
    println!("  Servidor: {}", ctx.config.api_base_url.dimmed());
    Ok(())
}
