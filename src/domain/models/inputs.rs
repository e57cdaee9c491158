use secrecy::SecretString;

/// Parameters of one action invocation.
///
/// `Debug` is safe to log: `SecretString` redacts the token.
#[derive(Debug)]
pub struct ActionInputs {
    pub owner: String,
    pub repo: String,
    pub token: SecretString,
    /// Commit the caller is interested in. `None` selects every run.
    pub sha: Option<String>,
}

impl ActionInputs {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
        sha: Option<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            token: SecretString::from(token.into()),
            sha: sha.filter(|sha| !sha.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_debug_output_redacts_token() {
        let inputs = ActionInputs::new("acme", "widgets", "tok123", None);
        let debug = format!("{inputs:?}");

        assert!(!debug.contains("tok123"));
        assert_eq!(inputs.token.expose_secret(), "tok123");
    }

    #[test]
    fn test_empty_sha_means_no_sha() {
        let inputs = ActionInputs::new("acme", "widgets", "tok123", Some(String::new()));
        assert_eq!(inputs.sha, None);
    }
}
