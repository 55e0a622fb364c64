const MAX_ID_LEN: usize = 64;

/// Project ids become `projects/<id>.json` and user ids become
/// `active_users/<id>.json`, so both stay inside a filename-safe alphabet.
pub fn validate_identifier_value(kind: &str, value: &str) -> Result<(), String> {
    check_identifier(kind, value, |_| false)
}

fn check_identifier(kind: &str, value: &str, extra: impl Fn(char) -> bool) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{kind} must be non-empty"));
    }
    if value.chars().count() > MAX_ID_LEN {
        return Err(format!("{kind} must be at most {MAX_ID_LEN} characters"));
    }
    if value.starts_with('.') {
        return Err(format!("{kind} must not start with '.'"));
    }
    match value
        .chars()
        .find(|&ch| !(ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || extra(ch)))
    {
        Some(ch) => Err(format!("{kind} contains unsupported character `{ch}`")),
        None => Ok(()),
    }
}

/// Id of one A3 project, e.g. `A3-0001` or `00002`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectId(String);

impl ProjectId {
    /// Accepts the id with surrounding whitespace and backticks, as users
    /// tend to paste it from the `/projects` list.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim().trim_matches('`').trim();
        validate_identifier_value("project id", trimmed)?;
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Chat user handle. Dots and `@` are allowed so e-mail style handles work.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        check_identifier("user id", trimmed, |ch| ch == '.' || ch == '@')?;
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_ids_strip_backticks_and_reject_paths() {
        assert_eq!(ProjectId::parse(" `X-001` ").expect("valid").as_str(), "X-001");
        assert!(ProjectId::parse("../etc").is_err());
        assert!(ProjectId::parse("a b").is_err());
        assert!(ProjectId::parse("").is_err());
    }

    #[test]
    fn user_ids_allow_mail_style_handles() {
        assert_eq!(UserId::parse("anna.k@site").expect("valid").to_string(), "anna.k@site");
        assert!(UserId::parse(".hidden").is_err());
        assert!(UserId::parse("a/b").is_err());
        assert!(ProjectId::parse("anna.k").is_err());
    }
}
