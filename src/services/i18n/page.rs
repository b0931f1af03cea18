//! Page model the translator writes into
//!
//! The translator never keeps a list of bindings, each pass asks the
//! [Page] to scan for them again. The scan is the only place that knows
//! how bindings are found, which keeps the translator usable with a real
//! DOM, a virtual one or the in-memory [Document] below.

use std::collections::{BTreeMap, BTreeSet};

/// Handle to a node within a [Page]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Node annotated with a raw binding string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingElement {
    pub node: NodeId,
    /// Raw binding value such as `[placeholder]form.name`
    pub binding: String,
}

/// Language selector control and the language code it selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorControl {
    pub node: NodeId,
    pub code: String,
}

/// Queryable page that translated values are applied to
pub trait Page: Send {
    /// Finds every node carrying `attribute`, in document order
    fn scan(&self, attribute: &str) -> Vec<BindingElement>;

    /// Finds every language selector control carrying `attribute`
    fn selectors(&self, attribute: &str) -> Vec<SelectorControl>;

    /// Replaces the text content of `node`
    fn set_text(&mut self, node: NodeId, text: &str);

    /// Sets the attribute `name` on `node`
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Adds or removes the visual `class` marking the active selector
    fn set_active(&mut self, node: NodeId, class: &str, active: bool);
}

/// Element within a [Document]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
    pub text: String,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// Flat in-memory document, elements are kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<Element>,
    /// Number of writes applied to the document
    mutations: usize,
}

impl Document {
    /// Appends an element returning its handle
    pub fn push(&mut self, element: Element) -> NodeId {
        let id = NodeId(self.elements.len());
        self.elements.push(element);
        id
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.elements.get(node.0)
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|element| element.text.as_str())
    }

    pub fn mutations(&self) -> usize {
        self.mutations
    }

    fn attribute_matches(&self, attribute: &str) -> impl Iterator<Item = (NodeId, &str)> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(move |(index, element)| {
                element
                    .attribute(attribute)
                    .map(|value| (NodeId(index), value))
            })
    }
}

impl Page for Document {
    fn scan(&self, attribute: &str) -> Vec<BindingElement> {
        self.attribute_matches(attribute)
            .map(|(node, binding)| BindingElement {
                node,
                binding: binding.to_string(),
            })
            .collect()
    }

    fn selectors(&self, attribute: &str) -> Vec<SelectorControl> {
        self.attribute_matches(attribute)
            .map(|(node, code)| SelectorControl {
                node,
                code: code.to_string(),
            })
            .collect()
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(element) = self.elements.get_mut(node.0) {
            element.text = text.to_string();
            self.mutations += 1;
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.elements.get_mut(node.0) {
            element
                .attributes
                .insert(name.to_string(), value.to_string());
            self.mutations += 1;
        }
    }

    fn set_active(&mut self, node: NodeId, class: &str, active: bool) {
        let Some(element) = self.elements.get_mut(node.0) else {
            return;
        };

        let changed = if active {
            element.classes.insert(class.to_string())
        } else {
            element.classes.remove(class)
        };

        if changed {
            self.mutations += 1;
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Document, Element, NodeId, Page};

    #[test]
    fn test_scan_document_order() {
        let mut doc = Document::default();
        let title = doc.push(Element::new("h1").attr("data-i18n", "hero.title"));
        doc.push(Element::new("div"));
        let input = doc.push(Element::new("input").attr("data-i18n", "[placeholder]form.name"));

        let bindings = doc.scan("data-i18n");
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].node, title);
        assert_eq!(bindings[1].node, input);
        assert_eq!(bindings[1].binding, "[placeholder]form.name");
    }

    #[test]
    fn test_selectors() {
        let mut doc = Document::default();
        doc.push(Element::new("button").attr("data-lang", "en"));
        doc.push(Element::new("button").attr("data-lang", "de"));

        let selectors = doc.selectors("data-lang");
        let codes: Vec<&str> = selectors.iter().map(|value| value.code.as_str()).collect();
        assert_eq!(codes, vec!["en", "de"]);
    }

    #[test]
    fn test_set_active_counts_changes_only() {
        let mut doc = Document::default();
        let button = doc.push(Element::new("button").class("active"));

        doc.set_active(button, "active", true);
        assert_eq!(doc.mutations(), 0);

        doc.set_active(button, "active", false);
        assert_eq!(doc.mutations(), 1);
        assert!(!doc.element(button).unwrap().has_class("active"));
    }

    #[test]
    fn test_writes_to_unknown_node_ignored() {
        let mut doc = Document::default();
        doc.set_text(NodeId(4), "value");
        doc.set_attribute(NodeId(4), "title", "value");
        assert_eq!(doc.mutations(), 0);
    }
}
