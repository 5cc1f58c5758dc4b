//! HTTP method types for documented endpoints.

use strum::{Display, EnumIter, EnumString};

/// HTTP methods an endpoint can be documented under.
///
/// ## Examples
///
/// ```rust
/// use apidoc::RestMethod;
///
/// let method = RestMethod::Post;
/// assert!(method.has_body());
/// assert_eq!(method.to_string(), "POST");
///
/// // Parse from string
/// let parsed: RestMethod = "DELETE".parse().unwrap();
/// assert_eq!(parsed, RestMethod::Delete);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum RestMethod {
    /// HTTP GET - Retrieve a resource.
    Get,
    /// HTTP POST - Create a resource or trigger an action.
    Post,
    /// HTTP PUT - Replace a resource entirely.
    Put,
    /// HTTP PATCH - Partially update a resource.
    Patch,
    /// HTTP DELETE - Remove a resource.
    Delete,
}

impl RestMethod {
    /// Returns `true` if this method typically carries a request body.
    ///
    /// POST, PUT, and PATCH typically include request bodies.
    /// GET and DELETE do not.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_display() {
        assert_eq!(RestMethod::Get.to_string(), "GET");
        assert_eq!(RestMethod::Patch.to_string(), "PATCH");
        assert_eq!(RestMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_parse() {
        assert_eq!("GET".parse::<RestMethod>().unwrap(), RestMethod::Get);
        assert_eq!("PUT".parse::<RestMethod>().unwrap(), RestMethod::Put);
        assert!("CONNECT".parse::<RestMethod>().is_err());
    }

    #[test]
    fn test_has_body() {
        assert!(!RestMethod::Get.has_body());
        assert!(RestMethod::Post.has_body());
        assert!(RestMethod::Put.has_body());
        assert!(RestMethod::Patch.has_body());
        assert!(!RestMethod::Delete.has_body());
    }

    #[test]
    fn test_enum_iteration() {
        let methods: Vec<_> = RestMethod::iter().collect();
        assert_eq!(methods.len(), 5);
    }
}
