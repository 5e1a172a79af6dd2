//! Which element a command or query addresses.

use serde::{Deserialize, Serialize};

/// Specifies the element a command targets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// The currently selected element.
    #[default]
    Selection,

    /// An element by full id or by an unambiguous id prefix.
    Element(String),
}

impl Target {
    pub fn element(id: impl Into<String>) -> Self {
        Self::Element(id.into())
    }
}

impl From<node::ElementId> for Target {
    fn from(id: node::ElementId) -> Self {
        Self::Element(id.to_uuid_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_serialization() {
        assert_eq!(serde_json::to_value(Target::Selection).unwrap(), "selection");
        assert_eq!(
            serde_json::to_value(Target::element("ab12")).unwrap(),
            serde_json::json!({ "element": "ab12" })
        );
    }
}
