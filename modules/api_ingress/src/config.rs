use serde::{Deserialize, Serialize};

/// HTTP host configuration (`modules.api_ingress`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiIngressConfig {
    /// `host:port` to listen on. When unset the server section's host and
    /// port are used.
    #[serde(default)]
    pub bind_addr: Option<String>,
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
    /// Per-request handler timeout. `0` disables it.
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            bind_addr: None,
            cors_enabled: true,
            timeout_sec: default_timeout_sec(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_timeout_sec() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_enables_cors() {
        let cfg: ApiIngressConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(cfg.cors_enabled);
        assert_eq!(cfg.timeout_sec, 30);
        assert!(cfg.bind_addr.is_none());
    }

    #[test]
    fn rejects_unknown_keys() {
        let res: Result<ApiIngressConfig, _> =
            serde_json::from_value(serde_json::json!({"enable_docs": true}));
        assert!(res.is_err());
    }
}
