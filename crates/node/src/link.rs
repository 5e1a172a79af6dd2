use crate::{ElementId, ElementRef};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// How two linked elements relate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LinkType {
    DependsOn,
    Blocks,
    Follows,
    RelatedTo,
}

/// A directed link between two board elements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementLink {
    pub id: ElementId,
    pub source: ElementRef,
    pub target: ElementRef,
    pub link_type: LinkType,
}

impl ElementLink {
    pub fn new(source: ElementRef, target: ElementRef, link_type: LinkType) -> Self {
        Self {
            id: ElementId::new(),
            source,
            target,
            link_type,
        }
    }

    /// Whether either end of the link is `element`.
    pub fn touches(&self, element: ElementRef) -> bool {
        self.source == element || self.target == element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touches_either_end() {
        let a = ElementRef::task(ElementId::from_u128(1));
        let b = ElementRef::note(ElementId::from_u128(2));
        let c = ElementRef::task(ElementId::from_u128(3));
        let link = ElementLink::new(a, b, LinkType::RelatedTo);
        assert!(link.touches(a));
        assert!(link.touches(b));
        assert!(!link.touches(c));
    }

    #[test]
    fn test_link_type_parse() {
        assert_eq!("depends_on".parse::<LinkType>().unwrap(), LinkType::DependsOn);
        assert_eq!(LinkType::RelatedTo.to_string(), "related_to");
    }
}
