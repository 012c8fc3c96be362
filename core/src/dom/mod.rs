//! Namespace-aware XML element tree.
//!
//! The tree is fully owned and resolved at build time: every element and
//! attribute carries the namespace URI its prefix was bound to, so lookups do
//! not depend on which prefixes a client happened to choose.

mod parser;

use quick_xml::escape::escape;
use std::collections::BTreeMap;

pub use parser::parse_document;

/// Content that can appear inside an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
}

impl Node {
    /// Returns `Some(&Element)` if this is an element.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the character data of a text or CDATA node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(t) | Node::CData(t) => Some(t),
            Node::Element(_) => None,
        }
    }
}

/// Attribute with its resolved namespace. Unprefixed attributes have none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub name: String,
    pub value: String,
}

/// `xmlns` / `xmlns:prefix` declaration as written on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub prefix: Option<String>,
    pub uri: String,
}

/// An XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Resolved namespace URI.
    pub namespace: Option<String>,
    /// Prefix as written in the source, kept for serialization.
    pub prefix: Option<String>,
    /// Local name.
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub namespace_decls: Vec<NamespaceDecl>,
    pub children: Vec<Node>,
}

/// A parsed document. Holds exactly one root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse a UTF-8 XML string.
    pub fn parse(xml: &str) -> crate::errors::ParseResult<Self> {
        parse_document(xml).map(|root| Self { root })
    }

    /// Parse raw bytes, rejecting anything that is not UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> crate::errors::ParseResult<Self> {
        let xml = std::str::from_utf8(bytes).map_err(|e| {
            crate::errors::ParseError::no_applicable_code(format!(
                "Invalid UTF-8 in XML document: {}",
                e
            ))
        })?;
        Self::parse(xml)
    }

    /// Wrap an already-built root element.
    pub fn from_root(root: Element) -> Self {
        Self { root }
    }

    /// The document element.
    pub fn root(&self) -> &Element {
        &self.root
    }
}

impl Element {
    /// True if this element has the given namespace and local name. An empty
    /// `namespace` matches elements in no namespace.
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref().unwrap_or("") == namespace
    }

    /// First child element with the given namespace and local name.
    pub fn child_ns(&self, namespace: &str, name: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.is(namespace, name))
    }

    /// Child elements with the given namespace and local name, in order.
    pub fn children_ns<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.child_elements().filter(move |e| e.is(namespace, name))
    }

    /// Iterate over child elements, skipping character data.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First child element, if any.
    pub fn first_child_element(&self) -> Option<&Element> {
        self.child_elements().next()
    }

    /// First descendant in document order with the given namespace and local
    /// name.
    pub fn first_descendant_ns(&self, namespace: &str, name: &str) -> Option<&Element> {
        for child in self.child_elements() {
            if child.is(namespace, name) {
                return Some(child);
            }
            if let Some(found) = child.first_descendant_ns(namespace, name) {
                return Some(found);
            }
        }
        None
    }

    /// Attribute in `namespace`, falling back to the unprefixed attribute of
    /// the same local name. Schema attributes are unqualified, so clients
    /// write either form.
    pub fn attribute_ns(&self, namespace: &str, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name && a.namespace.as_deref().unwrap_or("") == namespace)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|a| a.name == name && a.namespace.is_none())
            })
            .map(|a| a.value.as_str())
    }

    /// First attribute with this local name, whatever its namespace.
    pub fn attribute_any(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Concatenated text and CDATA of the direct children.
    pub fn direct_text(&self) -> String {
        self.children.iter().filter_map(Node::as_text).collect()
    }

    /// Qualified name as written in the source.
    pub fn qualified_name(&self) -> String {
        qualified(self.prefix.as_deref(), &self.name)
    }

    /// Serialize this element and its subtree.
    ///
    /// Namespaces bound on ancestors but used inside the subtree are declared
    /// on the emitted root, so the fragment parses on its own.
    pub fn to_xml(&self) -> String {
        let mut inherited = BTreeMap::new();
        let mut scope = Vec::new();
        self.collect_free_namespaces(&mut scope, &mut inherited);

        let mut out = String::new();
        self.write_xml(&mut out, &inherited);
        out
    }

    fn collect_free_namespaces(
        &self,
        scope: &mut Vec<Option<String>>,
        out: &mut BTreeMap<Option<String>, String>,
    ) {
        let mark = scope.len();
        scope.extend(self.namespace_decls.iter().map(|d| d.prefix.clone()));

        if let Some(ns) = &self.namespace {
            if !scope.contains(&self.prefix) {
                out.entry(self.prefix.clone()).or_insert_with(|| ns.clone());
            }
        }
        for attr in &self.attributes {
            if let (Some(ns), Some(_)) = (&attr.namespace, &attr.prefix) {
                if !scope.contains(&attr.prefix) {
                    out.entry(attr.prefix.clone()).or_insert_with(|| ns.clone());
                }
            }
        }
        for child in self.child_elements() {
            child.collect_free_namespaces(scope, out);
        }

        scope.truncate(mark);
    }

    fn write_xml(&self, out: &mut String, extra_decls: &BTreeMap<Option<String>, String>) {
        let tag = self.qualified_name();
        out.push('<');
        out.push_str(&tag);

        let own = self.namespace_decls.iter().map(|d| (&d.prefix, &d.uri));
        for (prefix, uri) in own.chain(extra_decls.iter()) {
            match prefix {
                Some(p) => out.push_str(&format!(" xmlns:{}=\"{}\"", p, escape(uri.as_str()))),
                None => out.push_str(&format!(" xmlns=\"{}\"", escape(uri.as_str()))),
            }
        }
        for attr in &self.attributes {
            out.push_str(&format!(
                " {}=\"{}\"",
                qualified(attr.prefix.as_deref(), &attr.name),
                escape(attr.value.as_str())
            ));
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');

        let none = BTreeMap::new();
        for child in &self.children {
            match child {
                Node::Element(e) => e.write_xml(out, &none),
                Node::Text(t) => out.push_str(&escape(t.as_str())),
                Node::CData(t) => {
                    out.push_str("<![CDATA[");
                    out.push_str(t);
                    out.push_str("]]>");
                }
            }
        }

        out.push_str("</");
        out.push_str(&tag);
        out.push('>');
    }
}

fn qualified(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(p) => format!("{}:{}", p, name),
        None => name.to_string(),
    }
}
