//! Client account
//!
//! Only the identity needed by the schedule engine is kept here: the id that
//! owns a contract and receipt history, and the names printed on exports.
//! Credentials belong to the session layer.

use serde::{Deserialize, Serialize};

/// Fallback display name
pub const DEFAULT_CLIENT_NAME: &str = "Client";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    id: String,
    name: String,
    email: String,
}

impl Client {
    pub fn new(id: String, name: String, email: String) -> Self {
        Self { id, name, email }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Name shown on exports and receipts: name, else email, else "Client"
    ///
    /// # Example
    /// ```
    /// use echeancier_core_rs::Client;
    ///
    /// let client = Client::new("c1".into(), "".into(), "awa@example.com".into());
    /// assert_eq!(client.display_name(), "awa@example.com");
    /// ```
    pub fn display_name(&self) -> &str {
        [self.name.trim(), self.email.trim()]
            .into_iter()
            .find(|candidate| !candidate.is_empty())
            .unwrap_or(DEFAULT_CLIENT_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_name() {
        let client = Client::new("c1".into(), "Awa Diop".into(), "awa@example.com".into());
        assert_eq!(client.display_name(), "Awa Diop");
    }

    #[test]
    fn test_display_name_falls_back_to_default() {
        let client = Client::new("c1".into(), " ".into(), String::new());
        assert_eq!(client.display_name(), DEFAULT_CLIENT_NAME);
    }
}
