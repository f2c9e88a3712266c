//! Identifier value objects
//!
//! All identifiers are opaque strings. Request ids are assigned by the
//! repository on insert; participant and resolution ids are assigned when a
//! draft is built and only need to be unique within their request.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a [`VotingRequest`](crate::request::VotingRequest).
    RequestId
);

string_id!(
    /// Identifier of a participant, unique within one request.
    ParticipantId
);

string_id!(
    /// Identifier of a resolution, unique within one request.
    ResolutionId
);

string_id!(
    /// Identifier of an extension request, unique within one request.
    ExtensionId
);

impl ParticipantId {
    /// Positional id (`p1`, `p2`, ...) used when a draft omits one.
    pub fn positional(index: usize) -> Self {
        Self(format!("p{}", index + 1))
    }
}

impl ResolutionId {
    /// Positional id (`r1`, `r2`, ...) used when a draft omits one.
    pub fn positional(index: usize) -> Self {
        Self(format!("r{}", index + 1))
    }
}

impl ExtensionId {
    pub fn sequential(n: usize) -> Self {
        Self(format!("ext-{}", n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_ids_are_one_based() {
        assert_eq!(ParticipantId::positional(0).as_str(), "p1");
        assert_eq!(ResolutionId::positional(2).as_str(), "r3");
        assert_eq!(ExtensionId::sequential(1).as_str(), "ext-1");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = RequestId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        let back: RequestId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back, id);
    }
}
