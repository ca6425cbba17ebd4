use crate::models::Role;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

const DEFAULT_API_BASE: &str = "http://localhost:5000";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub token: String,
    pub user_id: String,
    pub role: Role,
    pub assignment_id: String,
    pub class_id: Option<String>,
}

/// Identity handed out by the login flow. Environment variables win over the
/// session file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    user_id: Option<String>,
    token: Option<String>,
    role: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let session = match env::var("LMS_SESSION_FILE") {
            Ok(path) => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read session file {}", path))?;
                parse_session(&contents)
                    .with_context(|| format!("Failed to parse session file {}", path))?
            }
            Err(_) => SessionFile::default(),
        };

        let api_base =
            env::var("LMS_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let token = env::var("LMS_TOKEN").ok().or(session.token).context(
            "LMS_TOKEN not found. Please set it in .env, the environment, or the session file",
        )?;
        if token.is_empty() {
            anyhow::bail!("LMS_TOKEN is empty");
        }

        let user_id = env::var("LMS_USER_ID").ok().or(session.user_id).context(
            "LMS_USER_ID not found. Please set it in .env, the environment, or the session file",
        )?;
        if user_id.is_empty() {
            anyhow::bail!("LMS_USER_ID is empty");
        }

        let role = env::var("LMS_ROLE")
            .ok()
            .or(session.role)
            .unwrap_or_else(|| "student".to_string())
            .parse::<Role>()
            .map_err(|e| anyhow::anyhow!(e))?;

        let assignment_id = env::var("LMS_ASSIGNMENT_ID")
            .context("LMS_ASSIGNMENT_ID not found. Please set it in .env file or environment")?;
        if assignment_id.is_empty() {
            anyhow::bail!("LMS_ASSIGNMENT_ID is empty");
        }

        let class_id = env::var("LMS_CLASS_ID").ok().filter(|v| !v.is_empty());

        Ok(Config {
            api_base,
            token,
            user_id,
            role,
            assignment_id,
            class_id,
        })
    }
}

fn parse_session(contents: &str) -> Result<SessionFile> {
    serde_yaml::from_str(contents).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_yaml() {
        let yaml = r#"
userId: "u-42"
token: "secret"
role: "trainer"
"#;
        let session = parse_session(yaml).unwrap();
        assert_eq!(session.user_id.as_deref(), Some("u-42"));
        assert_eq!(session.token.as_deref(), Some("secret"));
        assert_eq!(session.role.as_deref(), Some("trainer"));
    }

    #[test]
    fn test_parse_session_yaml_partial() {
        let session = parse_session("userId: \"u-42\"\n").unwrap();
        assert_eq!(session.user_id.as_deref(), Some("u-42"));
        assert!(session.token.is_none());
        assert!(session.role.is_none());
    }
}
