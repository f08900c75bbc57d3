// SPDX-License-Identifier: MIT OR Apache-2.0
//! XML reading and writing for [`Document`].
//!
//! Parsing builds a plain element tree first and then maps it onto the typed
//! model; writing goes the other way.

use super::{
    insert_unique, BindInput, Document, Material, Node, NodeDef, NodeGraph, OutputElement,
    ShaderRef, ValueElement,
};
use crate::error::{DocumentError, Result};
use crate::types::MtlxType;
use indexmap::IndexMap;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;

const ROOT: &str = "materialx";

fn xml_err<E: Display>(e: E) -> DocumentError {
    DocumentError::Xml(e.to_string())
}

/// Generic element: tag, attributes, children
#[derive(Debug, Default)]
struct Element {
    tag: String,
    attributes: IndexMap<String, String>,
    children: Vec<Element>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    fn opt_attr(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.attr(key, value),
            None => self,
        }
    }

    fn take(&mut self, key: &str) -> Option<String> {
        self.attributes.shift_remove(key)
    }

    fn require(&mut self, key: &'static str) -> Result<String> {
        self.take(key).ok_or_else(|| DocumentError::MissingAttribute {
            element: self.tag.clone(),
            attribute: key,
        })
    }

    fn ty(&mut self) -> MtlxType {
        self.take("type")
            .map_or_else(|| MtlxType::Other(String::new()), |t| MtlxType::parse(&t))
    }
}

fn start_element(e: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(&String::from_utf8_lossy(e.name().as_ref()));
    for attr in e.attributes() {
        let attr = attr.map_err(xml_err)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value().map_err(xml_err)?.to_string();
        element.attributes.insert(key, value);
    }
    Ok(element)
}

fn parse_tree(text: &str) -> Result<Element> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) => stack.push(start_element(&e)?),
            Event::Empty(e) => {
                let element = start_element(&e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| DocumentError::Xml("unbalanced end tag".to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Eof => break,
            // Declarations, comments and whitespace carry no model data
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(DocumentError::Xml("unexpected end of document".to_string()));
    }
    root.ok_or_else(|| DocumentError::Xml("empty document".to_string()))
}

fn value_element(mut element: Element) -> Result<ValueElement> {
    Ok(ValueElement {
        name: element.require("name")?,
        ty: element.ty(),
        value: element.take("value"),
        interface_name: element.take("interfacename"),
        node_name: element.take("nodename"),
        output: element.take("output"),
    })
}

fn output_element(mut element: Element) -> Result<OutputElement> {
    Ok(OutputElement {
        name: element.require("name")?,
        ty: element.ty(),
        node_name: element.take("nodename"),
        output: element.take("output"),
    })
}

fn node_def(mut element: Element) -> Result<NodeDef> {
    let mut def = NodeDef::new(
        &element.require("name")?,
        &element.require("node")?,
        element.ty(),
    );
    def.target = element.take("target");

    for child in element.children {
        match child.tag.as_str() {
            "input" => {
                def.add_input(value_element(child)?)?;
            }
            "parameter" => {
                def.add_parameter(value_element(child)?)?;
            }
            "output" => {
                let output = output_element(child)?;
                let name = output.name.clone();
                insert_unique(&mut def.outputs, "output", &name, output)?;
            }
            other => tracing::debug!(tag = other, "Ignoring nodedef child"),
        }
    }
    Ok(def)
}

fn graph_node(mut element: Element) -> Result<Node> {
    let mut node = Node {
        name: element.require("name")?,
        ty: element.ty(),
        category: element.tag.clone(),
        attributes: IndexMap::new(),
        inputs: IndexMap::new(),
        parameters: IndexMap::new(),
    };

    for child in std::mem::take(&mut element.children) {
        match child.tag.as_str() {
            "input" => {
                node.add_input(value_element(child)?)?;
            }
            "parameter" => {
                node.add_parameter(value_element(child)?)?;
            }
            other => tracing::debug!(tag = other, "Ignoring node child"),
        }
    }
    node.attributes = element.attributes;
    Ok(node)
}

fn node_graph(mut element: Element) -> Result<NodeGraph> {
    let mut graph = NodeGraph::new(&element.require("name")?);
    graph.node_def = element.take("nodedef");

    for child in element.children {
        if child.tag == "output" {
            let output = output_element(child)?;
            let name = output.name.clone();
            insert_unique(&mut graph.outputs, "output", &name, output)?;
        } else {
            let node = graph_node(child)?;
            let name = node.name.clone();
            insert_unique(&mut graph.nodes, "node", &name, node)?;
        }
    }
    Ok(graph)
}

fn bind_input(mut element: Element) -> Result<BindInput> {
    Ok(BindInput {
        name: element.require("name")?,
        ty: element.ty(),
        node_graph: element.take("nodegraph"),
        output: element.take("output"),
    })
}

fn material(mut element: Element) -> Result<Material> {
    let mut material = Material::new(&element.require("name")?);

    for mut child in element.children {
        if child.tag != "shaderref" {
            tracing::debug!(tag = %child.tag, "Ignoring material child");
            continue;
        }
        let mut shader_ref = ShaderRef {
            name: child.require("name")?,
            node_def: child.take("node").unwrap_or_default(),
            attributes: IndexMap::new(),
            bind_inputs: IndexMap::new(),
        };
        for bind in std::mem::take(&mut child.children) {
            if bind.tag == "bindinput" {
                let bind = bind_input(bind)?;
                let name = bind.name.clone();
                insert_unique(&mut shader_ref.bind_inputs, "bindinput", &name, bind)?;
            }
        }
        shader_ref.attributes = child.attributes;
        let name = shader_ref.name.clone();
        insert_unique(&mut material.shader_refs, "shaderref", &name, shader_ref)?;
    }
    Ok(material)
}

/// Parse XML text into a document
pub(super) fn parse(text: &str) -> Result<Document> {
    let mut root = parse_tree(text)?;
    if root.tag != ROOT {
        return Err(DocumentError::UnexpectedRoot(root.tag));
    }

    let mut doc = Document::new();
    if let Some(version) = root.take("version") {
        doc.version = version;
    }

    for child in root.children {
        match child.tag.as_str() {
            "nodedef" => {
                let def = node_def(child)?;
                doc.add_node_def(def)?;
            }
            "nodegraph" => {
                let graph = node_graph(child)?;
                let name = graph.name.clone();
                insert_unique(&mut doc.node_graphs, "nodegraph", &name, graph)?;
            }
            "material" => {
                let material = material(child)?;
                let name = material.name.clone();
                insert_unique(&mut doc.materials, "material", &name, material)?;
            }
            other => tracing::debug!(tag = other, "Ignoring top-level element"),
        }
    }
    Ok(doc)
}

fn value_tree(tag: &str, value: &ValueElement) -> Element {
    Element::new(tag)
        .attr("name", value.name.as_str())
        .attr("type", value.ty.as_str())
        .opt_attr("value", value.value.as_deref())
        .opt_attr("interfacename", value.interface_name.as_deref())
        .opt_attr("nodename", value.node_name.as_deref())
        .opt_attr("output", value.output.as_deref())
}

fn output_tree(output: &OutputElement) -> Element {
    Element::new("output")
        .attr("name", output.name.as_str())
        .attr("type", output.ty.as_str())
        .opt_attr("nodename", output.node_name.as_deref())
        .opt_attr("output", output.output.as_deref())
}

fn document_tree(doc: &Document) -> Element {
    let mut root = Element::new(ROOT).attr("version", doc.version.as_str());

    for def in doc.node_defs() {
        let mut element = Element::new("nodedef")
            .attr("name", def.name.as_str())
            .attr("node", def.node.as_str())
            .attr("type", def.ty.as_str())
            .opt_attr("target", def.target.as_deref());
        element.children.extend(def.inputs().map(|i| value_tree("input", i)));
        element.children.extend(def.parameters().map(|p| value_tree("parameter", p)));
        element.children.extend(def.outputs().map(output_tree));
        root.children.push(element);
    }

    for graph in doc.node_graphs() {
        let mut element = Element::new("nodegraph")
            .attr("name", graph.name.as_str())
            .opt_attr("nodedef", graph.node_def.as_deref());
        for node in graph.nodes() {
            let mut child = Element::new(&node.category)
                .attr("name", node.name.as_str())
                .attr("type", node.ty.as_str());
            for (key, value) in &node.attributes {
                child = child.attr(key, value.as_str());
            }
            child.children.extend(node.inputs().map(|i| value_tree("input", i)));
            child.children.extend(node.parameters().map(|p| value_tree("parameter", p)));
            element.children.push(child);
        }
        element.children.extend(graph.outputs().map(output_tree));
        root.children.push(element);
    }

    for material in doc.materials() {
        let mut element = Element::new("material").attr("name", material.name.as_str());
        for shader_ref in material.shader_refs() {
            let mut child = Element::new("shaderref")
                .attr("name", shader_ref.name.as_str())
                .attr("node", shader_ref.node_def.as_str());
            for (key, value) in &shader_ref.attributes {
                child = child.attr(key, value.as_str());
            }
            for bind in shader_ref.bind_inputs() {
                child.children.push(
                    Element::new("bindinput")
                        .attr("name", bind.name.as_str())
                        .attr("type", bind.ty.as_str())
                        .opt_attr("nodegraph", bind.node_graph.as_deref())
                        .opt_attr("output", bind.output.as_deref()),
                );
            }
            element.children.push(child);
        }
        root.children.push(element);
    }

    root
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.tag.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start)).map_err(xml_err)?;
        return Ok(());
    }

    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.tag.as_str())))
        .map_err(xml_err)?;
    Ok(())
}

/// Serialize a document as indented XML
pub(super) fn write(doc: &Document) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;
    write_element(&mut writer, &document_tree(doc))?;

    let mut text = String::from_utf8(writer.into_inner()).map_err(xml_err)?;
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<materialx version="1.36">
  <!-- sample -->
  <nodedef name="nd_rgb" node="rgb" type="color4" target="cycles">
    <input name="color.003" type="color4" value="0.5, 0.5, 0.5, 1.0" />
    <output name="out" type="color4" />
  </nodedef>
  <nodegraph name="ng_brick">
    <rgb name="rgb" type="color4" xpos="-200.0" ypos="50.0">
      <input name="color.003" type="color4" value="0.1, 0.2, 0.3, 1.0" />
    </rgb>
    <output name="ng_surface_out" type="surfaceshader" nodename="rgb" />
  </nodegraph>
  <material name="brick">
    <shaderref name="mtlx_output" node="material_output_def" xpos="300.0" ypos="0.0">
      <bindinput name="surface" type="surfaceshader" nodegraph="ng_brick" output="ng_surface_out" />
    </shaderref>
  </material>
</materialx>
"#;

    #[test]
    fn test_parse_sample() {
        let doc = parse(SAMPLE).unwrap();
        assert_eq!(doc.version, "1.36");

        let def = doc.node_def("nd_rgb").unwrap();
        assert_eq!(def.target.as_deref(), Some("cycles"));
        assert_eq!(def.inputs().count(), 1);
        assert_eq!(def.output_count(), 1);

        let graph = doc.node_graph("ng_brick").unwrap();
        let rgb = graph.node("rgb").unwrap();
        assert_eq!(rgb.category, "rgb");
        assert_eq!(rgb.position(), Some([-200.0, 50.0]));
        assert_eq!(
            rgb.input("color.003").unwrap().value.as_deref(),
            Some("0.1, 0.2, 0.3, 1.0")
        );
        assert_eq!(graph.output("ng_surface_out").unwrap().connected_node(), Some("rgb"));

        let shader_ref = doc.material("brick").unwrap().shader_ref("mtlx_output").unwrap();
        assert_eq!(shader_ref.position(), Some([300.0, 0.0]));
        let bind = shader_ref.bind_input("surface").unwrap();
        assert_eq!(bind.node_graph.as_deref(), Some("ng_brick"));
    }

    #[test]
    fn test_write_then_parse() {
        let doc = parse(SAMPLE).unwrap();
        let text = write(&doc).unwrap();
        assert!(text.starts_with("<?xml"));
        assert_eq!(parse(&text).unwrap(), doc);
    }

    #[test]
    fn test_attribute_escaping() {
        let mut doc = Document::new();
        let def = doc
            .add_node_def(NodeDef::new("nd_attr", "attribute", MtlxType::Color4))
            .unwrap();
        def.add_parameter(ValueElement::new("attribute_name", MtlxType::String).with_value("a<b & \"c\""))
            .unwrap();
        let parsed = parse(&write(&doc).unwrap()).unwrap();
        let value = parsed.node_def("nd_attr").unwrap().parameters().next().unwrap().value.clone();
        assert_eq!(value.as_deref(), Some("a<b & \"c\""));
    }

    #[test]
    fn test_wrong_root() {
        assert!(matches!(parse("<mtlx/>"), Err(DocumentError::UnexpectedRoot(tag)) if tag == "mtlx"));
    }

    #[test]
    fn test_missing_name() {
        let text = r#"<materialx><nodedef node="rgb" type="color4"/></materialx>"#;
        assert!(matches!(
            parse(text),
            Err(DocumentError::MissingAttribute { attribute: "name", .. })
        ));
    }

    #[test]
    fn test_duplicate_elements_rejected() {
        let twin_nodes = r#"<materialx>
  <nodegraph name="ng">
    <rgb name="n" type="color4" />
    <diffuse_bsdf name="n" type="surfaceshader" />
  </nodegraph>
</materialx>"#;
        assert!(matches!(
            parse(twin_nodes),
            Err(DocumentError::Duplicate { kind: "node", name }) if name == "n"
        ));

        let twin_materials = r#"<materialx><material name="a"/><material name="a"/></materialx>"#;
        assert!(matches!(
            parse(twin_materials),
            Err(DocumentError::Duplicate { kind: "material", .. })
        ));

        let twin_outputs = r#"<materialx>
  <nodedef name="nd" node="split" type="multioutput">
    <output name="r" type="float" />
    <output name="r" type="float" />
  </nodedef>
</materialx>"#;
        assert!(matches!(
            parse(twin_outputs),
            Err(DocumentError::Duplicate { kind: "output", .. })
        ));
    }
}
