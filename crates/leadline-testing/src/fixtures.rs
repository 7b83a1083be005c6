//! Query builders for lead requests.

use leadline_core::LeadKind;
use urlencoding::encode;

/// Builds `/?key=value&...` request paths.
///
/// Values are percent-encoded; keys are appended in call order.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    pairs: Vec<(String, String)>,
}

impl QueryBuilder {
    /// Empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// `action=put&method=<kind method>`.
    pub fn put(kind: LeadKind) -> Self {
        Self::new().param("action", "put").param("method", kind.method())
    }

    /// A product lead carrying every required field.
    pub fn product_lead() -> Self {
        Self::put(LeadKind::Product)
            .param("domain", "acme.com")
            .param("name", "Bob")
            .param("telephone", "555-1234")
            .param("product", "Widget")
    }

    /// A contact lead carrying every required field.
    pub fn contact_lead() -> Self {
        Self::put(LeadKind::Contact)
            .param("domain", "acme.com")
            .param("name", "Carol")
            .param("telephone", "555-9876")
    }

    /// A consultant lead carrying every required field.
    pub fn consultant_lead() -> Self {
        Self::put(LeadKind::Consultant)
            .param("domain", "acme.com")
            .param("name", "Dave")
            .param("telephone", "555-0000")
            .param("email", "dave@acme.com")
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, key: &str, value: &str) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// Drops every occurrence of `key`.
    #[must_use]
    pub fn without(mut self, key: &str) -> Self {
        self.pairs.retain(|(k, _)| k != key);
        self
    }

    /// Request path with the encoded query.
    pub fn path(&self) -> String {
        if self.pairs.is_empty() {
            return "/".to_string();
        }

        let query: Vec<String> =
            self.pairs.iter().map(|(k, v)| format!("{}={}", encode(k), encode(v))).collect();
        format!("/?{}", query.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_reserved_characters() {
        let path = QueryBuilder::new().param("name", " Alice & Bob ").path();
        assert_eq!(path, "/?name=%20Alice%20%26%20Bob%20");
    }

    #[test]
    fn encodes_unicode_and_plus() {
        let path = QueryBuilder::new().param("message", "café+tea").path();
        assert_eq!(path, "/?message=caf%C3%A9%2Btea");
    }

    #[test]
    fn empty_query_is_root() {
        assert_eq!(QueryBuilder::new().path(), "/");
    }

    #[test]
    fn without_removes_a_field() {
        let path = QueryBuilder::contact_lead().without("telephone").path();
        assert!(!path.contains("telephone"));
    }
}
