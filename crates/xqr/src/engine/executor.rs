//! Query execution against a document tree

use tracing::{debug, instrument, trace};

use crate::engine::compare::{compare, extract_value, Comparison};
use crate::engine::matcher::Matcher;
use crate::query::{Predicate, Query};
use crate::xml::Element;

/// Nodes selected by a query
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outcome<'d> {
    /// Selected nodes in document order
    pub nodes: Vec<&'d Element>,
    /// Whether the FROM clause resolved to a node
    pub anchor_found: bool,
}

/// Runs one parsed [`Query`] against document trees
#[derive(Clone, Copy, Debug)]
pub struct Executor<'q> {
    query: &'q Query,
}

impl<'q> Executor<'q> {
    pub const fn new(query: &'q Query) -> Self {
        Self { query }
    }

    /// Execute against the document root
    #[instrument(level = "debug", skip_all, fields(query = %self.query))]
    pub fn run<'d>(&self, root: &'d Element) -> Outcome<'d> {
        let Some(anchor) = self.resolve_anchor(root) else {
            debug!("FROM clause resolved to no node");
            return Outcome::default();
        };

        let candidates = Matcher::new(self.query.select()).search(anchor);
        debug!(candidates = candidates.len(), anchor = %anchor.name, "selected candidates");

        let mut nodes = match self.query.predicate() {
            Some(predicate) => candidates
                .into_iter()
                .filter(|candidate| evaluate(predicate, candidate))
                .collect(),
            None => candidates,
        };

        if let Some(limit) = self.query.limit() {
            nodes.truncate(limit);
        }

        debug!(results = nodes.len(), "query finished");
        Outcome {
            nodes,
            anchor_found: true,
        }
    }

    fn resolve_anchor<'d>(&self, root: &'d Element) -> Option<&'d Element> {
        let from = self.query.from()?;
        if from.is_root() {
            return Some(root);
        }

        Matcher::new(from)
            .limit(Some(1))
            .include_root(true)
            .search(root)
            .into_iter()
            .next()
    }
}

/// Decide whether `candidate` passes the WHERE condition
///
/// The first node under the candidate (itself included) whose value the
/// operator applies to decides; when none does, the candidate is dropped
/// regardless of negation.
pub fn evaluate(predicate: &Predicate, candidate: &Element) -> bool {
    let target = predicate.target();
    let found = Matcher::new(target).include_root(true).search(candidate);

    for node in found {
        let raw = match target.attribute() {
            Some(attribute) => node.attribute(attribute).unwrap_or_default().to_string(),
            None => node.text(),
        };
        let value = extract_value(&raw);

        match compare(&value, predicate.literal(), predicate.operator()) {
            Comparison::Inapplicable => {
                trace!(node = %node.name, %raw, "comparison inapplicable");
            }
            Comparison::Match(matched) => return matched != predicate.negate(),
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    fn run<'d>(query: &str, root: &'d Element) -> Result<Outcome<'d>> {
        let query = Query::parse(query)?;
        Ok(Executor::new(&query).run(root))
    }

    fn values(outcome: &Outcome<'_>) -> Vec<String> {
        outcome
            .nodes
            .iter()
            .map(|node| node.attribute("v").unwrap_or_default().to_string())
            .collect()
    }

    fn shop() -> Element {
        Element::new("shop")
            .with_child(
                Element::new("shelf")
                    .with_attribute("id", "1")
                    .with_child(Element::new("item").with_attribute("v", "a").with_text("10"))
                    .with_child(Element::new("item").with_attribute("v", "b").with_text("3")),
            )
            .with_child(
                Element::new("shelf")
                    .with_attribute("id", "2")
                    .with_child(Element::new("item").with_attribute("v", "c").with_text("7")),
            )
    }

    #[test]
    fn test_from_root() -> Result<()> {
        let root = shop();
        let outcome = run("SELECT item FROM ROOT", &root)?;
        assert!(outcome.anchor_found);
        assert_eq!(values(&outcome), vec!["a", "b", "c"]);
        Ok(())
    }

    #[test]
    fn test_from_first_match_only() -> Result<()> {
        let root = shop();
        assert_eq!(values(&run("SELECT item FROM shelf", &root)?), vec!["a", "b"]);
        assert_eq!(values(&run("SELECT item FROM .id", &root)?), vec!["a", "b"]);
        Ok(())
    }

    #[test]
    fn test_from_can_match_document_root() -> Result<()> {
        let root = shop();
        assert_eq!(values(&run("SELECT item FROM shop", &root)?), vec!["a", "b", "c"]);
        Ok(())
    }

    #[test]
    fn test_unresolved_anchor() -> Result<()> {
        let root = shop();
        let outcome = run("SELECT item FROM cellar", &root)?;
        assert!(!outcome.anchor_found);
        assert!(outcome.nodes.is_empty());

        let outcome = run("SELECT item FROM", &root)?;
        assert!(!outcome.anchor_found);
        assert!(outcome.nodes.is_empty());
        Ok(())
    }

    #[test]
    fn test_where_on_text() -> Result<()> {
        let root = shop();
        assert_eq!(values(&run("SELECT item FROM ROOT WHERE item>5", &root)?), vec!["a", "c"]);
        assert_eq!(values(&run("SELECT item FROM ROOT WHERE NOT item>5", &root)?), vec!["b"]);
        Ok(())
    }

    #[test]
    fn test_where_on_descendant_attribute() -> Result<()> {
        let root = shop();
        let outcome = run("SELECT shelf FROM ROOT WHERE item.v=\"c\"", &root)?;
        assert_eq!(
            outcome.nodes.iter().map(|n| n.attribute("id")).collect::<Vec<_>>(),
            vec![Some("2")]
        );
        Ok(())
    }

    #[test]
    fn test_first_applicable_node_decides() -> Result<()> {
        // the first `item` in each shelf decides, even when a later one would match
        let root = shop();
        let outcome = run("SELECT shelf FROM ROOT WHERE item<5", &root)?;
        assert!(outcome.nodes.is_empty());
        Ok(())
    }

    #[test]
    fn test_inapplicable_values_are_skipped() -> Result<()> {
        let root = Element::new("r").with_child(
            Element::new("group")
                .with_child(Element::new("n").with_text("n/a"))
                .with_child(Element::new("n").with_text("8")),
        );
        let outcome = run("SELECT group FROM ROOT WHERE n>5", &root)?;
        assert_eq!(outcome.nodes.len(), 1);
        Ok(())
    }

    #[test]
    fn test_no_applicable_value_drops_candidate_even_when_negated() -> Result<()> {
        let root = Element::new("r").with_child(Element::new("item").with_text("abc"));
        assert!(run("SELECT item FROM ROOT WHERE item>5", &root)?.nodes.is_empty());
        assert!(run("SELECT item FROM ROOT WHERE NOT item>5", &root)?.nodes.is_empty());
        assert!(run("SELECT item FROM ROOT WHERE missing=1", &root)?.nodes.is_empty());
        Ok(())
    }

    #[test]
    fn test_limit_applies_after_filter() -> Result<()> {
        let root = shop();
        assert_eq!(
            values(&run("SELECT item FROM ROOT WHERE item>5 LIMIT 1", &root)?),
            vec!["a"]
        );
        let outcome = run("SELECT item FROM ROOT LIMIT 0", &root)?;
        assert!(outcome.anchor_found);
        assert!(outcome.nodes.is_empty());
        Ok(())
    }
}
