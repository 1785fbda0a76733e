//! `user` commands: account listing and role changes

use super::base::HandlerContext;
use crate::cli::OutputFormatter;
use crate::core::Role;
use crate::error::Result;

pub fn handle_user_list(project_dir: Option<&str>, output: &OutputFormatter) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    ctx.current_user()?;
    let mut profiles = ctx.storage.load_all_profiles()?;
    profiles.sort_by(|a, b| a.email.cmp(&b.email));

    if output.is_json() {
        let rows: Vec<serde_json::Value> = profiles
            .iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "email": p.email,
                    "role": p.role.to_string(),
                })
            })
            .collect();
        return output.print_json(&rows);
    }
    for profile in &profiles {
        output.info(&format!(
            "{:<25}  {:<30}  {}",
            profile.name, profile.email, profile.role
        ));
    }
    output.info(&format!("\n{} account(s)", profiles.len()));
    Ok(())
}

pub fn handle_user_set_role(
    email: &str,
    role: &str,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let acting = ctx.current_user()?;
    let role = role.parse::<Role>()?;

    let updated = ctx.auth().set_role(&acting, email, role)?;
    output.success(&format!("{} is now {}", updated.email, updated.role));
    Ok(())
}
