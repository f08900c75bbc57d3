// SPDX-License-Identifier: MIT OR Apache-2.0
//! Write-then-read passes through a MaterialX file.

use float_eq::assert_float_eq;
use ordoplay_materialx::{Document, MtlxType, Session};
use ordoplay_shader_graph::{
    create_shader_registry, Material, MaterialLibrary, NodeId, ParamValue, RendererTag, SocketValue,
};
use std::collections::HashSet;
use std::path::Path;

struct Fixture {
    material: Material,
    rgb: NodeId,
    diffuse: NodeId,
}

fn color_to_diffuse(path: &Path) -> Fixture {
    let catalog = create_shader_registry();
    let mut material = Material::with_output("Brick", &catalog);
    let location = path.to_string_lossy().into_owned();
    material.mtlx_props.write_path = location.clone();
    material.mtlx_props.read_path = location;

    let mut rgb = catalog.create_node("ShaderNodeRGB").unwrap().with_position(-420.0, 80.0);
    rgb.outputs[0].default_value = Some(SocketValue::Color([0.8, 0.25, 0.1, 1.0]));
    let diffuse = catalog
        .create_node("ShaderNodeBsdfDiffuse")
        .unwrap()
        .with_position(-200.0, 60.0);

    let terminal = material.graph.active_output().unwrap().id;
    let rgb = material.graph.add_node(rgb);
    let diffuse = material.graph.add_node(diffuse);
    material.graph.connect_by_index(rgb, 0, diffuse, 0).unwrap();
    material.graph.connect_by_index(diffuse, 0, terminal, 0).unwrap();

    Fixture { material, rgb, diffuse }
}

#[test]
fn test_color_diffuse_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("brick.mtlx");
    let session = Session::new().unwrap();

    let mut fixture = color_to_diffuse(&path);
    let report = session.network().export(&mut fixture.material).unwrap();
    assert!(report.is_complete());
    assert!(path.exists());

    let mut library = MaterialLibrary::new();
    library.insert(fixture.material);
    let read = session.network().read_network(&mut library, "Brick").unwrap();
    assert_eq!(read.material, "mtlx_Brick");
    assert_eq!(read.nodes_created, 2);
    assert!(read.skipped.is_empty(), "skipped: {:?}", read.skipped);

    let rebuilt = library.get("mtlx_Brick").unwrap();
    let graph = &rebuilt.graph;
    let terminal = graph.active_output().unwrap();
    let non_terminal: Vec<_> = graph.nodes().filter(|n| !n.is_output_node()).collect();
    assert_eq!(non_terminal.len(), 2);

    let rgb = non_terminal.iter().find(|n| n.node_type == "ShaderNodeRGB").unwrap();
    let diffuse = non_terminal
        .iter()
        .find(|n| n.node_type == "ShaderNodeBsdfDiffuse")
        .unwrap();

    let between: Vec<_> = graph
        .connections()
        .filter(|c| c.from_node == rgb.id && c.to_node == diffuse.id)
        .collect();
    assert_eq!(between.len(), 1);

    let to_terminal: Vec<_> = graph.connections().filter(|c| c.to_node == terminal.id).collect();
    assert_eq!(to_terminal.len(), 1);
    assert_eq!(to_terminal[0].from_node, diffuse.id);
    assert_eq!(to_terminal[0].to_socket, terminal.inputs[0].id);
    assert_eq!(graph.connection_count(), 2);

    let components = rgb.outputs[0].default_value.as_ref().unwrap().components();
    assert_float_eq!(components[0], 0.8, abs <= 1e-5);
    assert_float_eq!(components[1], 0.25, abs <= 1e-5);
    assert_float_eq!(components[2], 0.1, abs <= 1e-5);

    assert_eq!(rgb.position, [-420.0, 80.0]);
    assert_eq!(diffuse.renderer, Some(RendererTag::Cycles));
}

#[test]
fn test_socket_names_unique_after_write() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::new().unwrap();
    let mut fixture = color_to_diffuse(&dir.path().join("brick.mtlx"));
    session.network().update_network(&mut fixture.material).unwrap();

    let graph = &fixture.material.graph;
    let names: HashSet<_> = graph
        .nodes()
        .flat_map(|n| n.sockets().map(|s| s.mtlx_name.clone()))
        .collect();
    assert_eq!(names.len(), graph.socket_count());

    let rgb = graph.node(fixture.rgb).unwrap();
    let diffuse = graph.node(fixture.diffuse).unwrap();
    assert!(rgb.outputs[0].mtlx_name.starts_with("color."));
    assert!(diffuse.inputs[1].mtlx_name.starts_with("roughness."));
}

#[test]
fn test_multi_output_node_def() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("split.mtlx");
    let catalog = create_shader_registry();
    let session = Session::new().unwrap();

    let mut material = Material::with_output("Split", &catalog);
    material.mtlx_props.write_path = path.to_string_lossy().into_owned();
    let split = material.graph.add_node(catalog.create_node("ShaderNodeSeparateRGB").unwrap());
    let math = material.graph.add_node(catalog.create_node("ShaderNodeMath").unwrap());
    material.graph.connect_by_index(split, 1, math, 0).unwrap();
    session.network().export(&mut material).unwrap();

    let document = Document::read_from_file(&path).unwrap();
    let def = document.node_def("shadernodeseparatergb").unwrap();
    assert_eq!(def.ty, MtlxType::MultiOutput);
    let outputs: Vec<_> = def.outputs().map(|o| o.name.split('.').next().unwrap().to_string()).collect();
    assert_eq!(outputs, ["r", "g", "b"]);
    assert!(def.outputs().all(|o| o.ty == MtlxType::Float));

    // The downstream input names the upstream socket it reads
    let graph = document.node_graph("ng_split").unwrap();
    let input = graph.node("math").unwrap().inputs().next().unwrap();
    assert_eq!(input.connected_node(), Some("separate_rgb"));
    assert!(input.output.as_deref().unwrap().starts_with("g."));
}

#[test]
fn test_multi_output_link_survives_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("split.mtlx");
    let catalog = create_shader_registry();
    let session = Session::new().unwrap();

    let mut material = Material::with_output("Split", &catalog);
    let location = path.to_string_lossy().into_owned();
    material.mtlx_props.write_path = location.clone();
    material.mtlx_props.read_path = location;
    let terminal = material.graph.active_output().unwrap().id;
    let split = material.graph.add_node(catalog.create_node("ShaderNodeSeparateRGB").unwrap());
    let emission = material.graph.add_node(catalog.create_node("ShaderNodeEmission").unwrap());
    material.graph.connect_by_index(split, 2, emission, 1).unwrap();
    material.graph.connect_by_index(emission, 0, terminal, 0).unwrap();
    session.network().export(&mut material).unwrap();

    let mut library = MaterialLibrary::new();
    library.insert(material);
    let report = session.network().read_network(&mut library, "Split").unwrap();
    assert_eq!(report.nodes_created, 2);
    assert_eq!(report.links_created, 2);

    let graph = &library.get("mtlx_Split").unwrap().graph;
    let split = graph.nodes().find(|n| n.node_type == "ShaderNodeSeparateRGB").unwrap();
    let emission = graph.nodes().find(|n| n.node_type == "ShaderNodeEmission").unwrap();
    let link = graph.connections().find(|c| c.to_node == emission.id).unwrap();
    assert_eq!(link.from_socket, split.outputs[2].id);
    assert_eq!(link.to_socket, emission.inputs[1].id);
}

#[test]
fn test_volume_channel_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fog.mtlx");
    let catalog = create_shader_registry();
    let session = Session::new().unwrap();

    let mut material = Material::with_output("Fog", &catalog);
    let location = path.to_string_lossy().into_owned();
    material.mtlx_props.write_path = location.clone();
    material.mtlx_props.read_path = location;
    let terminal = material.graph.active_output().unwrap().id;
    let scatter = material.graph.add_node(catalog.create_node("ShaderNodeVolumeScatter").unwrap());
    material.graph.connect_by_index(scatter, 0, terminal, 1).unwrap();
    session.network().export(&mut material).unwrap();

    let mut library = MaterialLibrary::new();
    library.insert(material);
    session.network().read_network(&mut library, "Fog").unwrap();

    let graph = &library.get("mtlx_Fog").unwrap().graph;
    let terminal = graph.active_output().unwrap();
    let link = graph.connections().next().unwrap();
    assert_eq!(link.to_socket, terminal.inputs[1].id);
}

#[test]
fn test_parameters_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mix.mtlx");
    let catalog = create_shader_registry();
    let session = Session::new().unwrap();

    let mut material = Material::with_output("Mix", &catalog);
    let location = path.to_string_lossy().into_owned();
    material.mtlx_props.write_path = location.clone();
    material.mtlx_props.read_path = location;
    let mut mix = catalog.create_node("ShaderNodeMixRGB").unwrap();
    mix.set_parameter("blend_type", ParamValue::Enum("MULTIPLY".into()));
    mix.set_parameter("use_clamp", ParamValue::Bool(true));
    mix.inputs[0].default_value = Some(SocketValue::Float(0.75));
    let mix = material.graph.add_node(mix);
    let emission = material.graph.add_node(catalog.create_node("ShaderNodeEmission").unwrap());
    let terminal = material.graph.active_output().unwrap().id;
    material.graph.connect_by_index(mix, 0, emission, 0).unwrap();
    material.graph.connect_by_index(emission, 0, terminal, 0).unwrap();
    session.network().export(&mut material).unwrap();

    let mut library = MaterialLibrary::new();
    library.insert(material);
    session.network().read_network(&mut library, "Mix").unwrap();

    let graph = &library.get("mtlx_Mix").unwrap().graph;
    let mix = graph.nodes().find(|n| n.node_type == "ShaderNodeMixRGB").unwrap();
    assert_eq!(mix.parameter("blend_type"), Some(&ParamValue::Enum("MULTIPLY".into())));
    assert_eq!(mix.parameter("use_clamp"), Some(&ParamValue::Bool(true)));
    assert_float_eq!(mix.inputs[0].default_value.as_ref().unwrap().components()[0], 0.75, abs <= 1e-5);
}
