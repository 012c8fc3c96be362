//! Builds an owned [`Element`] tree from XML text using quick-xml's
//! namespace-resolving reader.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, PrefixDeclaration, ResolveResult};
use quick_xml::NsReader;

use super::{Attribute, Element, NamespaceDecl, Node};
use crate::errors::{ParseError, ParseResult};

/// Parse `xml` and return its document element.
pub fn parse_document(xml: &str) -> ParseResult<Element> {
    let mut reader = NsReader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let element = build_element(&reader, &start)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = build_element(&reader, &start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ParseError::no_applicable_code("Unexpected closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(text.unescape()?.into_owned()));
                }
            }
            Event::CData(cdata) => {
                if let Some(parent) = stack.last_mut() {
                    let content = std::str::from_utf8(&cdata).map_err(|e| {
                        ParseError::no_applicable_code(format!("Invalid UTF-8 in CDATA: {}", e))
                    })?;
                    parent.children.push(Node::CData(content.to_string()));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes
            // carry nothing the request model needs.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ParseError::no_applicable_code(
            "Malformed XML: unclosed element at end of document",
        ));
    }
    root.ok_or_else(|| ParseError::no_applicable_code("Empty XML document"))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> ParseResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(ParseError::no_applicable_code(
                "Malformed XML: more than one document element",
            ))
        }
    }
    Ok(())
}

fn build_element(reader: &NsReader<&[u8]>, start: &BytesStart<'_>) -> ParseResult<Element> {
    let (ns, local) = reader.resolve_element(start.name());
    let mut element = Element {
        namespace: namespace_uri(ns)?,
        prefix: start.name().prefix().map(|p| utf8(p.as_ref())).transpose()?,
        name: utf8(local.as_ref())?,
        ..Element::default()
    };

    for attr in start.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();

        match attr.key.as_namespace_binding() {
            Some(PrefixDeclaration::Default) => {
                element.namespace_decls.push(NamespaceDecl { prefix: None, uri: value });
            }
            Some(PrefixDeclaration::Named(prefix)) => {
                element.namespace_decls.push(NamespaceDecl {
                    prefix: Some(utf8(prefix)?),
                    uri: value,
                });
            }
            None => {
                let (ns, local) = reader.resolve_attribute(attr.key);
                element.attributes.push(Attribute {
                    namespace: namespace_uri(ns)?,
                    prefix: attr.key.prefix().map(|p| utf8(p.as_ref())).transpose()?,
                    name: utf8(local.as_ref())?,
                    value,
                });
            }
        }
    }

    Ok(element)
}

fn namespace_uri(ns: ResolveResult<'_>) -> ParseResult<Option<String>> {
    match ns {
        ResolveResult::Bound(Namespace(uri)) => utf8(uri).map(Some),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(ParseError::no_applicable_code(format!(
            "Unknown namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

fn utf8(bytes: &[u8]) -> ParseResult<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| ParseError::no_applicable_code(format!("Invalid UTF-8 in XML name: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_default_and_prefixed_namespaces() {
        let root = parse_document(
            r#"<Execute xmlns="urn:wps" xmlns:ows="urn:ows"><ows:Identifier>p</ows:Identifier></Execute>"#,
        )
        .unwrap();
        assert!(root.is("urn:wps", "Execute"));
        assert_eq!(root.namespace_decls.len(), 2);
        let ident = root.first_child_element().unwrap();
        assert!(ident.is("urn:ows", "Identifier"));
        assert_eq!(ident.prefix.as_deref(), Some("ows"));
    }

    #[test]
    fn test_unprefixed_attributes_have_no_namespace() {
        let root = parse_document(r#"<r xmlns="urn:x" version="1.0.0"/>"#).unwrap();
        assert_eq!(root.attributes[0].namespace, None);
        assert_eq!(root.attributes[0].value, "1.0.0");
    }

    #[test]
    fn test_cdata_is_kept() {
        let root = parse_document("<r><![CDATA[<raw> & text]]></r>").unwrap();
        assert_eq!(root.children, vec![Node::CData("<raw> & text".to_string())]);
    }

    #[test]
    fn test_rejects_malformed_documents() {
        assert!(parse_document("").is_err());
        assert!(parse_document("<a><b></a>").is_err());
        assert!(parse_document("<a>").is_err());
        assert!(parse_document("<x:a/>").is_err());
    }
}
