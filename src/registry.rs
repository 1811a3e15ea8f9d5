//! Schema component registry
//!
//! Schemas emitted for different resource classes share one component
//! namespace, so their display names must be unique across an analysis
//! pass. The registry turns fully-qualified class names into unique
//! short names and remembers every claim.
//!
//! Claiming is an explicit two-phase contract: [`Components::reserve`]
//! performs the side-effecting claim and returns a handle, and
//! [`Components::describe`] renders a handle into display text. Call
//! sites that only need the name can use
//! [`Components::unique_schema_name`].

use std::collections::HashMap;

use serde::Serialize;

/// Separators recognized in fully-qualified class names
const NAME_SEPARATORS: &[char] = &['.', ':', '\\', '/'];

/// Claimed identity of a named schema component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentHandle {
    unique_name: String,
}

impl ComponentHandle {
    /// The unique short name claimed for the component
    pub fn name(&self) -> &str {
        &self.unique_name
    }
}

/// The shared component-name registry for one analysis pass
#[derive(Debug, Default)]
pub struct Components {
    /// Fully-qualified name to claimed unique name
    claimed: HashMap<String, String>,
    /// Unique name back to the fully-qualified name that owns it
    owners: HashMap<String, String>,
}

impl Components {
    pub fn new() -> Self {
        Components::default()
    }

    /// Claim a unique short name for a fully-qualified type name.
    ///
    /// The preferred name is the last segment of the type name. When a
    /// different type already owns it, earlier segments are prepended
    /// until the name is free, with a numeric suffix as the final
    /// fallback. Reserving the same type name again returns the same
    /// handle contents.
    pub fn reserve(&mut self, type_name: &str) -> ComponentHandle {
        if let Some(existing) = self.claimed.get(type_name) {
            return ComponentHandle {
                unique_name: existing.clone(),
            };
        }

        let unique_name = self.next_free_name(type_name);
        self.claimed
            .insert(type_name.to_string(), unique_name.clone());
        self.owners
            .insert(unique_name.clone(), type_name.to_string());

        ComponentHandle { unique_name }
    }

    /// Render the display text for a claimed component
    pub fn describe(&self, handle: &ComponentHandle) -> String {
        format!("`{}`", handle.unique_name)
    }

    /// Claim and render in one step
    pub fn unique_schema_name(&mut self, type_name: &str) -> String {
        self.reserve(type_name).unique_name
    }

    fn next_free_name(&self, type_name: &str) -> String {
        let segments: Vec<&str> = type_name
            .split(NAME_SEPARATORS)
            .filter(|segment| !segment.is_empty())
            .collect();

        if segments.is_empty() {
            if !self.owners.contains_key("Schema") {
                return "Schema".to_string();
            }
            return self.numbered_fallback("Schema");
        }

        // Widen the candidate one segment at a time: UserResource, then
        // V1UserResource, then ApiV1UserResource for "Api.V1.UserResource".
        for width in 1..=segments.len() {
            let candidate = segments[segments.len() - width..].concat();
            if !self.owners.contains_key(&candidate) {
                return candidate;
            }
        }

        self.numbered_fallback(&segments.concat())
    }

    fn numbered_fallback(&self, base: &str) -> String {
        let mut counter = 2;
        loop {
            let candidate = format!("{}{}", base, counter);
            if !self.owners.contains_key(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }
}

/// A pointer into the schema component namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaReference {
    /// Component group, e.g. `schemas`
    pub location: String,

    /// Unique component name within the group
    pub name: String,
}

impl SchemaReference {
    pub fn new(location: impl Into<String>, name: impl Into<String>) -> Self {
        SchemaReference {
            location: location.into(),
            name: name.into(),
        }
    }

    /// The JSON pointer URI for this reference
    pub fn uri(&self) -> String {
        format!("#/components/{}/{}", self.location, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_is_last_segment() {
        let mut components = Components::new();
        let handle = components.reserve("app.resources.UserResource");
        assert_eq!(handle.name(), "UserResource");
    }

    #[test]
    fn test_collision_widens_name() {
        let mut components = Components::new();
        assert_eq!(components.reserve("api.v1.UserResource").name(), "UserResource");
        assert_eq!(components.reserve("api.v2.UserResource").name(), "v2UserResource");
    }

    #[test]
    fn test_reservation_is_idempotent() {
        let mut components = Components::new();
        let first = components.reserve("app.UserResource");
        let second = components.reserve("app.UserResource");
        assert_eq!(first, second);
    }

    #[test]
    fn test_describe_quotes_name() {
        let mut components = Components::new();
        let handle = components.reserve("app.UserResource");
        assert_eq!(components.describe(&handle), "`UserResource`");
    }

    #[test]
    fn test_exhausted_segments_get_numeric_suffix() {
        let mut components = Components::new();
        assert_eq!(components.reserve("UserResource").name(), "UserResource");
        assert_eq!(components.reserve("v1.UserResource").name(), "v1UserResource");
        // Same segments under a different separator: every widened
        // candidate is already owned, so numbering kicks in.
        assert_eq!(components.reserve("v1/UserResource").name(), "v1UserResource2");
    }

    #[test]
    fn test_separator_variants() {
        let mut components = Components::new();
        assert_eq!(components.reserve("App\\Resources\\PostResource").name(), "PostResource");
        assert_eq!(components.reserve("crate::api::TagResource").name(), "TagResource");
    }

    #[test]
    fn test_reference_uri() {
        let reference = SchemaReference::new("schemas", "UserResource");
        assert_eq!(reference.uri(), "#/components/schemas/UserResource");
    }
}
