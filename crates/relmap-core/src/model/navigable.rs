use std::{fmt, sync::Arc};

///
/// NavigablePath
///
/// Structured address of a position in the object-graph-to-query mapping,
/// e.g. `Person.tags.{element}`. Appending never mutates the parent.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct NavigablePath {
    parent: Option<Arc<Self>>,
    local_name: String,
    full_path: String,
}

impl NavigablePath {
    /// Root path for a queried entity or alias.
    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        let local_name = name.into();

        Self {
            parent: None,
            full_path: local_name.clone(),
            local_name,
        }
    }

    /// Child path one segment below `self`.
    #[must_use]
    pub fn append(&self, segment: &str) -> Self {
        Self {
            parent: Some(Arc::new(self.clone())),
            local_name: segment.to_string(),
            full_path: format!("{}.{segment}", self.full_path),
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }

    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    #[must_use]
    pub fn full_path(&self) -> &str {
        &self.full_path
    }
}

impl fmt::Display for NavigablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_builds_dotted_path_and_keeps_parent() {
        let root = NavigablePath::root("Person");
        let tags = root.append("tags");
        let index = tags.append("{index}");

        assert_eq!(index.full_path(), "Person.tags.{index}");
        assert_eq!(index.local_name(), "{index}");
        assert_eq!(index.parent(), Some(&tags));
        assert_eq!(tags.parent(), Some(&root));
        assert_eq!(root.parent(), None);
    }
}
