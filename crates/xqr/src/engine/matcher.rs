//! Bounded depth-first search over the document tree
//!
//! Matches do not nest: once a node matches, its subtree is not searched.

use std::slice;

use crate::query::ElementSpec;
use crate::xml::{Content, Element};

/// Test a single node against `target`
///
/// A spec with only an attribute ignores the node's name.
pub fn matches(element: &Element, target: &ElementSpec) -> bool {
    let name_ok = target.name().map_or(true, |name| element.name() == name);
    let attribute_ok = target
        .attribute()
        .map_or(true, |attribute| element.has_attribute(attribute));
    name_ok && attribute_ok
}

/// Search configuration for one [`ElementSpec`]
#[derive(Clone, Copy, Debug)]
pub struct Matcher<'q> {
    target: &'q ElementSpec,
    limit: Option<usize>,
    include_root: bool,
}

impl<'q> Matcher<'q> {
    /// Unbounded search that skips the root itself
    pub const fn new(target: &'q ElementSpec) -> Self {
        Self {
            target,
            limit: None,
            include_root: false,
        }
    }

    /// Stop after this many matches
    #[must_use]
    pub const fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Test the root before its children; a matching root ends the search
    #[must_use]
    pub const fn include_root(mut self, include_root: bool) -> Self {
        self.include_root = include_root;
        self
    }

    /// Outermost matches below `root` in document order
    pub fn search<'d>(&self, root: &'d Element) -> Vec<&'d Element> {
        let mut found = Vec::new();
        if self.is_full(&found) {
            return found;
        }

        if self.include_root && matches(root, self.target) {
            found.push(root);
            return found;
        }

        // one pending-children iterator per open level keeps deep trees off the call stack
        let mut stack: Vec<slice::Iter<'d, Content>> = vec![root.children.iter()];
        while let Some(level) = stack.last_mut() {
            let Some(content) = level.next() else {
                stack.pop();
                continue;
            };
            let Content::Element(child) = content else {
                continue;
            };

            if self.is_full(&found) {
                break;
            }

            if matches(child, self.target) {
                found.push(child);
            } else {
                stack.push(child.children.iter());
            }
        }

        found
    }

    fn is_full(&self, found: &[&Element]) -> bool {
        self.limit.is_some_and(|limit| found.len() >= limit)
    }
}

/// Search `root` for `target`, stopping after `limit` matches
pub fn search<'d>(
    root: &'d Element,
    target: &ElementSpec,
    limit: Option<usize>,
    include_root: bool,
) -> Vec<&'d Element> {
    Matcher::new(target)
        .limit(limit)
        .include_root(include_root)
        .search(root)
}
