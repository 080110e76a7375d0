use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Type alias for a HashMap representing key-value pairs of user attributes.
///
/// Values are arbitrary JSON: the wrapper hands them to the underlying client without
/// interpretation.
pub type Attributes = HashMap<String, serde_json::Value>;

/// Context describing the current user or session.
///
/// The wrapper does not inspect the context. It is passed to the underlying client unmodified,
/// both at initialization and on re-identification.
///
/// # Examples
/// ```
/// # use flagwrap::UserContext;
/// let user = UserContext::new("user-1")
///     .with_attribute("plan", "enterprise")
///     .with_attribute("beta_opt_in", true);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    /// Unique key identifying the user or session.
    pub key: String,
    /// Additional attributes describing the user.
    #[serde(default)]
    pub attributes: Attributes,
}

impl UserContext {
    /// Create a context with the given key and no attributes.
    pub fn new(key: impl Into<String>) -> UserContext {
        UserContext {
            key: key.into(),
            attributes: Attributes::new(),
        }
    }

    /// Add an attribute to the context.
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> UserContext {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Opaque configuration map for the underlying client.
///
/// Recognized options are defined by the client implementation; the wrapper passes them through
/// without interpretation. Defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientOptions(HashMap<String, serde_json::Value>);

impl ClientOptions {
    /// Create an empty options map.
    pub fn new() -> ClientOptions {
        ClientOptions::default()
    }

    /// Set an option.
    pub fn with_option(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> ClientOptions {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Look up an option by name.
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.0.get(name)
    }

    /// True if no options are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_context_with_attributes() {
        let user = UserContext::new("user-1").with_attribute("age", 42);
        assert_eq!(user.key, "user-1");
        assert_eq!(user.attributes.get("age"), Some(&serde_json::json!(42)));
    }

    #[test]
    fn options_default_to_empty() {
        let options = ClientOptions::new();
        assert!(options.is_empty());
        assert_eq!(
            ClientOptions::new()
                .with_option("bootstrap", "localStorage")
                .get("bootstrap"),
            Some(&serde_json::json!("localStorage"))
        );
    }
}
