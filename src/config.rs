/// Connection details for the hosted backend. Both values must be present
/// for the remote collaborator to be considered reachable; anything less
/// puts the app in demo mode instead of raising an error.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub anon_key: String,
}

impl RemoteConfig {
    /// Reads `SUPABASE_URL` and `SUPABASE_ANON_KEY` from the environment.
    pub fn from_env() -> Option<Self> {
        Self::from_values(
            std::env::var("SUPABASE_URL").ok(),
            std::env::var("SUPABASE_ANON_KEY").ok(),
        )
    }

    pub fn from_values(base_url: Option<String>, anon_key: Option<String>) -> Option<Self> {
        let base_url = non_blank(base_url)?;
        let anon_key = non_blank(anon_key)?;
        Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_values_mean_unavailable() {
        assert!(RemoteConfig::from_values(None, None).is_none());
        assert!(RemoteConfig::from_values(Some("https://x.supabase.co".into()), None).is_none());
        assert!(RemoteConfig::from_values(Some("  ".into()), Some("key".into())).is_none());
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let config = RemoteConfig::from_values(
            Some("https://x.supabase.co/".into()),
            Some("anon".into()),
        )
        .unwrap();
        assert_eq!(config.base_url, "https://x.supabase.co");
        assert_eq!(config.anon_key, "anon");
    }
}
