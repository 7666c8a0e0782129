//! Generic, namespace resolved XML element tree
//!
//! The SBML document layer reads XML into this tree before interpreting it, and builds this tree
//! before serializing it. Namespaces are resolved while reading so that the typed layer can
//! match on namespace URIs rather than on whatever prefix a document happens to use.
use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

/// Namespace bound to the reserved `xml:` prefix
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A single attribute of an [`XmlElement`]
#[derive(Clone, Debug, PartialEq)]
pub struct XmlAttribute {
    /// Qualified name, as written (e.g. `fbc:charge`)
    pub name: String,
    /// Resolved namespace URI, only set for prefixed attributes
    pub namespace: Option<String>,
    /// Unescaped value
    pub value: String,
}

impl XmlAttribute {
    /// Name without its prefix
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Whether the attribute is a namespace declaration
    pub fn is_namespace_declaration(&self) -> bool {
        self.name == "xmlns" || self.name.starts_with("xmlns:")
    }
}

/// Node in the element tree
#[derive(Clone, Debug, PartialEq)]
pub enum XmlNode {
    /// A nested element
    Element(XmlElement),
    /// Unescaped character data
    Text(String),
}

/// An XML element with its attributes and children
#[derive(Clone, Debug, Default, PartialEq)]
pub struct XmlElement {
    /// Qualified name, as written (e.g. `fbc:geneProduct`)
    pub name: String,
    /// Resolved namespace URI of the element
    pub namespace: Option<String>,
    /// Attributes in document order, namespace declarations included
    pub attributes: Vec<XmlAttribute>,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create a new element without attributes or children
    pub fn new(name: &str) -> Self {
        XmlElement {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Name without its prefix
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Builder style variant of [`XmlElement::set_attribute`]
    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Set an attribute, replacing an existing attribute with the same qualified name
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(XmlAttribute {
                name: name.to_string(),
                namespace: None,
                value,
            }),
        }
    }

    /// Set an attribute only if a value is present
    pub fn set_optional_attribute(&mut self, name: &str, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.set_attribute(name, value.to_string());
        }
    }

    /// Get an attribute by its qualified name, as written
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Get an attribute without a prefix (and so without a namespace) by name
    pub fn unprefixed_attribute(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| !a.is_namespace_declaration() && a.namespace.is_none() && a.name == local)
            .map(|a| a.value.as_str())
    }

    /// Get a prefixed attribute whose namespace satisfies `namespace`
    pub fn namespaced_attribute<F>(&self, local: &str, namespace: F) -> Option<&str>
    where
        F: Fn(&str) -> bool,
    {
        self.attributes
            .iter()
            .filter(|a| !a.is_namespace_declaration())
            .find(|a| a.local_name() == local && a.namespace.as_deref().is_some_and(&namespace))
            .map(|a| a.value.as_str())
    }

    /// Append a child element
    pub fn push_element(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    /// Append character data
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(XmlNode::Text(text.into()));
    }

    /// Iterate over child elements, skipping text
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Concatenated text content of the element and its descendants
    pub fn text(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            match child {
                XmlNode::Text(t) => text.push_str(t),
                XmlNode::Element(e) => text.push_str(&e.text()),
            }
        }
        text
    }

    /// Parse an XML document into its root element
    pub fn parse(input: &str) -> Result<XmlElement, XmlError> {
        let mut nodes = parse_nodes(input, Vec::new())?;
        let mut roots = nodes.drain(..).filter_map(|n| match n {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        });
        let root = roots
            .next()
            .ok_or_else(|| XmlError::Malformed("document has no root element".to_string()))?;
        if roots.next().is_some() {
            return Err(XmlError::Malformed(
                "document has more than one root element".to_string(),
            ));
        }
        Ok(root)
    }

    /// Parse a fragment which may contain several top level nodes
    ///
    /// `namespaces` are the `(prefix, uri)` declarations in scope around the fragment.
    pub fn parse_fragment(
        input: &str,
        namespaces: Vec<(Option<String>, String)>,
    ) -> Result<Vec<XmlNode>, XmlError> {
        parse_nodes(input, namespaces)
    }

    /// Serialize the element (without an XML declaration and without indentation)
    pub fn to_xml_string(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        write_element(&mut writer, self)?;
        into_string(writer)
    }

    /// Serialize the element as a complete, indented XML document
    pub fn to_xml_document(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| XmlError::Write(e.to_string()))?;
        write_element(&mut writer, self)?;
        let mut output = into_string(writer)?;
        output.push('\n');
        Ok(output)
    }
}

/// Serialize a list of nodes back to a string
pub fn nodes_to_string(nodes: &[XmlNode]) -> Result<String, XmlError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    for node in nodes {
        write_node(&mut writer, node)?;
    }
    into_string(writer)
}

/// Errors from reading or writing XML
#[derive(Debug, Error)]
pub enum XmlError {
    /// The underlying XML parser failed
    #[error("XML parse error at position {position}: {message}")]
    Parse { position: u64, message: String },
    /// The XML was well formed at the token level but not as a tree
    #[error("Malformed XML: {0}")]
    Malformed(String),
    /// Serialization failed
    #[error("XML write error: {0}")]
    Write(String),
}

type Scope = Vec<(Option<String>, String)>;

fn parse_nodes(input: &str, outer: Scope) -> Result<Vec<XmlNode>, XmlError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(false);

    let mut top_level: Vec<XmlNode> = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut scopes: Vec<Scope> = vec![outer];

    loop {
        let event = reader.read_event().map_err(|e| XmlError::Parse {
            position: reader.error_position() as u64,
            message: e.to_string(),
        })?;
        match event {
            Event::Start(ref e) => {
                let element = open_element(e, &mut scopes)?;
                stack.push(element);
            }
            Event::Empty(ref e) => {
                let element = open_element(e, &mut scopes)?;
                scopes.pop();
                attach(XmlNode::Element(element), &mut stack, &mut top_level);
            }
            Event::End(_) => {
                scopes.pop();
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::Malformed("unexpected closing tag".to_string()))?;
                attach(XmlNode::Element(element), &mut stack, &mut top_level);
            }
            Event::Text(ref t) => {
                let text = t.unescape().map_err(|e| XmlError::Parse {
                    position: reader.buffer_position() as u64,
                    message: e.to_string(),
                })?;
                // Whitespace between elements carries no information in SBML
                if !text.trim().is_empty() {
                    attach(XmlNode::Text(text.into_owned()), &mut stack, &mut top_level);
                }
            }
            Event::CData(t) => {
                let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                attach(XmlNode::Text(text), &mut stack, &mut top_level);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Malformed(format!(
            "element <{}> is never closed",
            open.name
        )));
    }
    Ok(top_level)
}

fn attach(node: XmlNode, stack: &mut [XmlElement], top_level: &mut Vec<XmlNode>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => top_level.push(node),
    }
}

fn open_element(start: &BytesStart<'_>, scopes: &mut Vec<Scope>) -> Result<XmlElement, XmlError> {
    let name = utf8(start.name().as_ref())?.to_string();
    let mut attributes = Vec::new();
    let mut declarations: Scope = Vec::new();

    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::Malformed(format!("attribute of <{name}>: {e}")))?;
        let key = utf8(attr.key.as_ref())?.to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| XmlError::Malformed(format!("attribute {key} of <{name}>: {e}")))?
            .into_owned();
        if key == "xmlns" {
            declarations.push((None, value.clone()));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            declarations.push((Some(prefix.to_string()), value.clone()));
        }
        attributes.push(XmlAttribute {
            name: key,
            namespace: None,
            value,
        });
    }
    scopes.push(declarations);

    let namespace = resolve(scopes, prefix_part(&name));
    for attr in attributes.iter_mut() {
        if attr.is_namespace_declaration() {
            continue;
        }
        if let Some(prefix) = prefix_part(&attr.name) {
            attr.namespace = if prefix == "xml" {
                Some(XML_NAMESPACE.to_string())
            } else {
                resolve(scopes, Some(prefix))
            };
        }
    }

    Ok(XmlElement {
        name,
        namespace,
        attributes,
        children: Vec::new(),
    })
}

fn resolve(scopes: &[Scope], prefix: Option<&str>) -> Option<String> {
    scopes
        .iter()
        .rev()
        .flat_map(|scope| scope.iter().rev())
        .find(|(p, _)| p.as_deref() == prefix)
        .map(|(_, uri)| uri.clone())
        .filter(|uri| !uri.is_empty())
}

fn write_node<W: std::io::Write>(writer: &mut Writer<W>, node: &XmlNode) -> Result<(), XmlError> {
    match node {
        XmlNode::Element(e) => write_element(writer, e),
        XmlNode::Text(t) => writer
            .write_event(Event::Text(BytesText::new(t)))
            .map_err(|e| XmlError::Write(e.to_string())),
    }
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    element: &XmlElement,
) -> Result<(), XmlError> {
    let mut start = BytesStart::new(element.name.as_str());
    for attr in &element.attributes {
        start.push_attribute((attr.name.as_str(), attr.value.as_str()));
    }
    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| XmlError::Write(e.to_string()));
    }
    writer
        .write_event(Event::Start(start))
        .map_err(|e| XmlError::Write(e.to_string()))?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| XmlError::Write(e.to_string()))
}

fn into_string(writer: Writer<Cursor<Vec<u8>>>) -> Result<String, XmlError> {
    String::from_utf8(writer.into_inner().into_inner()).map_err(|e| XmlError::Write(e.to_string()))
}

fn utf8(bytes: &[u8]) -> Result<&str, XmlError> {
    std::str::from_utf8(bytes).map_err(|e| XmlError::Malformed(format!("invalid UTF-8: {e}")))
}

fn local_part(name: &str) -> &str {
    name.split_once(':').map(|(_, local)| local).unwrap_or(name)
}

fn prefix_part(name: &str) -> Option<&str> {
    name.split_once(':').map(|(prefix, _)| prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_namespaces() {
        let xml = r#"<sbml xmlns="urn:core" xmlns:fbc="urn:fbc">
            <species id="a" fbc:charge="-1"/>
        </sbml>"#;
        let root = XmlElement::parse(xml).unwrap();
        assert_eq!(root.namespace.as_deref(), Some("urn:core"));
        let species = root.child_elements().next().unwrap();
        assert_eq!(species.local_name(), "species");
        assert_eq!(species.namespace.as_deref(), Some("urn:core"));
        assert_eq!(species.unprefixed_attribute("id"), Some("a"));
        assert_eq!(
            species.namespaced_attribute("charge", |ns| ns == "urn:fbc"),
            Some("-1")
        );
        assert_eq!(species.unprefixed_attribute("charge"), None);
    }

    #[test]
    fn keeps_text_and_unescapes() {
        let root = XmlElement::parse("<p>A &amp; B</p>").unwrap();
        assert_eq!(root.text(), "A & B");
        assert_eq!(root.to_xml_string().unwrap(), "<p>A &amp; B</p>");
    }

    #[test]
    fn fragment_with_outer_namespace() {
        let nodes = XmlElement::parse_fragment(
            "<x:p>one</x:p><x:p>two</x:p>",
            vec![(Some("x".to_string()), "urn:x".to_string())],
        )
        .unwrap();
        assert_eq!(nodes.len(), 2);
        match &nodes[1] {
            XmlNode::Element(e) => {
                assert_eq!(e.namespace.as_deref(), Some("urn:x"));
                assert_eq!(e.text(), "two");
            }
            XmlNode::Text(_) => panic!("Expected an element"),
        }
    }

    #[test]
    fn rejects_unbalanced_documents() {
        assert!(XmlElement::parse("<a><b></a>").is_err());
        assert!(XmlElement::parse("<a><b>").is_err());
        assert!(XmlElement::parse("just text").is_err());
    }

    #[test]
    fn document_output_has_declaration() {
        let element = XmlElement::new("root").with_attribute("id", "r");
        let output = element.to_xml_document().unwrap();
        assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(output.contains("<root id=\"r\"/>"));
    }
}
