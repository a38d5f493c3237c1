//! Subcommand implementations

use anyhow::{Context, Result};
use normreg_access::{BlockAccess, DepartmentAccess, SessionProfile};
use normreg_model::{taxonomy, Role, User};
use normreg_registry::{next_code_for_block, RegistryConfig};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// User described on the command line
#[derive(Debug, Clone, Default)]
pub struct Identity {
    /// `admin`, `employee`, or `None` for a role-less user
    pub role: Option<String>,
    pub rank: Option<String>,
    pub department: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    /// Build the user the access rules will see
    ///
    /// # Errors
    /// Unknown role name.
    pub fn to_user(&self) -> Result<User> {
        let mut user = User::new(
            self.name.clone().unwrap_or_else(|| "cli".to_string()),
            self.email.clone().unwrap_or_else(|| "cli@localhost".to_string()),
        );
        if let Some(role) = &self.role {
            let role = role.parse::<Role>().with_context(|| format!("invalid --role '{role}'"))?;
            user = user.with_role(role);
        }
        if let Some(rank) = &self.rank {
            // admins ignore rank; with_role already cleared it
            if !user.is_admin() {
                user = user.with_block_rank(rank.clone());
            }
        }
        if let Some(department) = &self.department {
            user = user.with_department(department.clone());
        }
        Ok(user)
    }
}

/// Text to print plus the process exit status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    pub success: bool,
}

impl Outcome {
    fn ok(output: String) -> Self {
        Self {
            output,
            success: true,
        }
    }

    fn decision(allowed: bool, subject: &str) -> Self {
        Self {
            output: format!("{}: {subject}", if allowed { "ALLOWED" } else { "DENIED" }),
            success: allowed,
        }
    }
}

#[derive(Serialize)]
struct GroupView {
    code: &'static str,
    title: String,
    sub_codes: Vec<SubCodeView>,
}

#[derive(Serialize)]
struct SubCodeView {
    code: &'static str,
    title: String,
}

/// Effective configuration: the file at `path` or the defaults
///
/// # Errors
/// Unreadable or invalid configuration file.
pub fn load_config(path: Option<&Path>) -> Result<RegistryConfig> {
    match path {
        Some(path) => {
            let config = RegistryConfig::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?;
            tracing::debug!(path = %path.display(), "configuration loaded");
            Ok(config)
        }
        None => Ok(RegistryConfig::default()),
    }
}

/// Print the block taxonomy
///
/// # Errors
/// JSON serialization failure.
pub fn taxonomy(json: bool) -> Result<Outcome> {
    let groups: Vec<GroupView> = taxonomy::BLOCK_TAXONOMY
        .iter()
        .map(|g| GroupView {
            code: g.code,
            title: taxonomy::block_title(g.code),
            sub_codes: g
                .sub_codes
                .iter()
                .map(|&code| SubCodeView {
                    code,
                    title: taxonomy::block_title(code),
                })
                .collect(),
        })
        .collect();

    if json {
        return Ok(Outcome::ok(serde_json::to_string_pretty(&groups)?));
    }

    let mut out = String::new();
    for group in &groups {
        writeln!(out, "{}", group.title)?;
        for sub in &group.sub_codes {
            writeln!(out, "  {}", sub.title)?;
        }
    }
    writeln!(out, "{} codes", taxonomy::all_codes().len())?;
    Ok(Outcome::ok(out))
}

/// List the blocks the user can open
///
/// # Errors
/// Invalid identity or JSON serialization failure.
pub fn blocks(identity: &Identity, json: bool) -> Result<Outcome> {
    let user = identity.to_user()?;
    let blocks = BlockAccess::new().accessible_blocks(Some(&user));
    tracing::debug!(count = blocks.len(), "accessible blocks resolved");

    if json {
        return Ok(Outcome::ok(serde_json::to_string_pretty(&blocks)?));
    }
    Ok(Outcome::ok(blocks.join("\n")))
}

/// Decide whether the user may access `block`
///
/// # Errors
/// Invalid identity.
pub fn check_block(identity: &Identity, block: &str) -> Result<Outcome> {
    let user = identity.to_user()?;
    let allowed = BlockAccess::new().user_has_access_to_block(Some(&user), block);
    Ok(Outcome::decision(allowed, &format!("block '{block}'")))
}

/// Decide whether the user may access records of `department`
///
/// # Errors
/// Invalid identity.
pub fn check_department(identity: &Identity, department: Option<&str>) -> Result<Outcome> {
    let user = identity.to_user()?;
    let allowed = DepartmentAccess::new().user_has_access_to_department(Some(&user), department);
    Ok(Outcome::decision(
        allowed,
        &format!("department '{}'", department.unwrap_or_default()),
    ))
}

/// Compute the next code of `block` given the codes already in it
///
/// # Errors
/// Blank block, exhausted sequence space, or JSON serialization failure.
pub fn next_code(block: &str, existing: &[String], json: bool) -> Result<Outcome> {
    let block = block.trim();
    anyhow::ensure!(!block.is_empty(), "block is required");

    let next = next_code_for_block(existing, block)
        .with_context(|| format!("no sequence numbers left in block '{block}'"))?;
    if json {
        return Ok(Outcome::ok(serde_json::to_string_pretty(&next)?));
    }
    Ok(Outcome::ok(next.code))
}

/// Session profile of the described user as JSON
///
/// # Errors
/// Invalid identity or JSON serialization failure.
pub fn profile(identity: &Identity) -> Result<Outcome> {
    let user = identity.to_user()?;
    let profile = SessionProfile::for_user(&user);
    Ok(Outcome::ok(serde_json::to_string_pretty(&profile)?))
}

/// Effective configuration as JSON
///
/// # Errors
/// JSON serialization failure.
pub fn show_config(config: &RegistryConfig) -> Result<Outcome> {
    Ok(Outcome::ok(serde_json::to_string_pretty(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(rank: &str) -> Identity {
        Identity {
            role: Some("employee".into()),
            rank: Some(rank.into()),
            ..Identity::default()
        }
    }

    #[test]
    fn unknown_role_is_an_error() {
        let identity = Identity {
            role: Some("root".into()),
            ..Identity::default()
        };
        assert!(identity.to_user().is_err());
    }

    #[test]
    fn admin_identity_drops_rank() {
        let identity = Identity {
            role: Some("admin".into()),
            rank: Some("3".into()),
            ..Identity::default()
        };
        assert_eq!(identity.to_user().unwrap().block_rank, None);
    }

    #[test]
    fn check_block_reports_decision() {
        let out = check_block(&employee("1"), "1.02").unwrap();
        assert!(out.success);
        assert_eq!(out.output, "ALLOWED: block '1.02'");

        let out = check_block(&employee("1"), "10").unwrap();
        assert!(!out.success);
    }

    #[test]
    fn roleless_identity_sees_no_blocks() {
        let out = blocks(&Identity::default(), false).unwrap();
        assert!(out.output.is_empty());
    }
}
