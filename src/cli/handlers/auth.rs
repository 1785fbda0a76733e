//! Account commands: signup, login, logout, whoami

use super::base::HandlerContext;
use crate::cli::OutputFormatter;
use crate::error::{Result, TicketDeskError};
use dialoguer::Password;

fn prompt_password(prompt: &str, confirm: bool) -> Result<String> {
    let mut input = Password::new().with_prompt(prompt);
    if confirm {
        input = input.with_confirmation("Confirm password", "Passwords do not match");
    }
    input
        .interact()
        .map_err(|e| TicketDeskError::custom(format!("Failed to read password: {e}")))
}

/// Handle the `signup` command
pub fn handle_signup(
    email: &str,
    name: &str,
    password: Option<String>,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let password = match password {
        Some(p) => p,
        None => prompt_password("Password", true)?,
    };

    let profile = ctx.auth().sign_up(email, &password, name)?;
    if output.is_json() {
        output.print_json(&serde_json::json!({
            "email": profile.email,
            "name": profile.name,
            "role": profile.role.to_string(),
        }))?;
    } else {
        output.success(&format!(
            "Account created for {} ({})",
            profile.email, profile.role
        ));
    }
    Ok(())
}

/// Handle the `login` command
pub fn handle_login(
    email: &str,
    password: Option<String>,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let password = match password {
        Some(p) => p,
        None => prompt_password("Password", false)?,
    };

    let profile = ctx.auth().sign_in(email, &password)?;
    output.success(&format!("Signed in as {}", profile.email));
    Ok(())
}

/// Handle the `logout` command
pub fn handle_logout(project_dir: Option<&str>, output: &OutputFormatter) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    ctx.auth().sign_out()?;
    output.success("Signed out");
    Ok(())
}

/// Handle the `whoami` command
pub fn handle_whoami(project_dir: Option<&str>, output: &OutputFormatter) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let profile = ctx.current_user()?;
    if output.is_json() {
        output.print_json(&serde_json::json!({
            "name": profile.name,
            "email": profile.email,
            "role": profile.role.to_string(),
        }))?;
    } else {
        output.info(&format!(
            "{} <{}> ({})",
            profile.name, profile.email, profile.role
        ));
    }
    Ok(())
}
