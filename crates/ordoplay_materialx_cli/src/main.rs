// SPDX-License-Identifier: MIT OR Apache-2.0
//! `OrdoPlay` MaterialX command line host.
//!
//! Runs write and read passes on materials of a RON scene file:
//!
//! ```text
//! ordoplay_mtlx write <scene.ron> <material> [--settings <file>]
//! ordoplay_mtlx read  <scene.ron> <material> [--settings <file>]
//! ordoplay_mtlx demo  <directory>            [--settings <file>]
//! ```
//!
//! `write` exports to the material's write path, `read` rebuilds
//! `mtlx_<material>` from its read path. Both save the scene afterwards.

use ordoplay_materialx::settings::SETTINGS_FILE_NAME;
use ordoplay_materialx::{BridgeSettings, DocumentError, NetworkError, Session};
use ordoplay_shader_graph::{create_shader_registry, GraphError, Material, MaterialLibrary};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("usage: ordoplay_mtlx <write|read> <scene.ron> <material> | demo <directory> [--settings <file>]")]
    Usage,

    #[error("Scene has no material named '{0}'")]
    UnknownMaterial(String),

    #[error("Settings: {0}")]
    Settings(#[from] std::io::Error),

    #[error(transparent)]
    Scene(#[from] GraphError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

enum Command {
    Write { scene: PathBuf, material: String },
    Read { scene: PathBuf, material: String },
    Demo { directory: PathBuf },
}

struct Invocation {
    command: Command,
    settings: PathBuf,
}

fn parse_args(args: &[String]) -> Result<Invocation, CliError> {
    let mut positional = Vec::new();
    let mut settings = PathBuf::from(SETTINGS_FILE_NAME);
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--settings" {
            settings = iter.next().map(PathBuf::from).ok_or(CliError::Usage)?;
        } else {
            positional.push(arg.as_str());
        }
    }

    let command = match positional.as_slice() {
        ["write", scene, material] => Command::Write {
            scene: PathBuf::from(scene),
            material: (*material).to_string(),
        },
        ["read", scene, material] => Command::Read {
            scene: PathBuf::from(scene),
            material: (*material).to_string(),
        },
        ["demo", directory] => Command::Demo {
            directory: PathBuf::from(directory),
        },
        _ => return Err(CliError::Usage),
    };
    Ok(Invocation { command, settings })
}

fn init_logging(settings: &BridgeSettings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn write(session: &Session, scene: &Path, name: &str) -> Result<(), CliError> {
    let mut library = MaterialLibrary::load(scene)?;
    let material = library
        .get_mut(name)
        .ok_or_else(|| CliError::UnknownMaterial(name.to_string()))?;

    let report = session.network().export(material)?;
    if !report.is_complete() {
        tracing::warn!(missing = report.missing.len(), "Some links were not written");
    }
    library.save(scene)?;
    Ok(())
}

fn read(session: &Session, scene: &Path, name: &str) -> Result<(), CliError> {
    let mut library = MaterialLibrary::load(scene)?;
    let report = session.network().read_network(&mut library, name)?;
    for skipped in &report.skipped {
        tracing::warn!(element = %skipped, "Skipped while reading");
    }
    library.save(scene)?;
    Ok(())
}

/// Build a small scene, export it and read it back
fn demo(session: &Session, directory: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(directory)?;
    let catalog = create_shader_registry();
    let document_path = directory.join("brick.mtlx").to_string_lossy().into_owned();

    let mut material = Material::with_output("Brick", &catalog);
    material.mtlx_props.write_path = document_path.clone();
    material.mtlx_props.read_path = document_path;

    let nodes = catalog
        .create_node("ShaderNodeRGB")
        .zip(catalog.create_node("ShaderNodeBsdfDiffuse"));
    let terminal = material.graph.active_output().map(|n| n.id);
    if let (Some((rgb, diffuse)), Some(terminal)) = (nodes, terminal) {
        let rgb = material.graph.add_node(rgb.with_position(-400.0, 0.0));
        let diffuse = material.graph.add_node(diffuse.with_position(-200.0, 0.0));
        for (from, to, input) in [(rgb, diffuse, 0), (diffuse, terminal, 0)] {
            if let Err(e) = material.graph.connect_by_index(from, 0, to, input) {
                tracing::warn!("Demo link skipped: {e}");
            }
        }
    }

    let mut library = MaterialLibrary::new();
    library.insert(material);
    let scene = directory.join("scene.ron");
    library.save(&scene)?;

    write(session, &scene, "Brick")?;
    read(session, &scene, "Brick")?;
    tracing::info!(scene = %scene.display(), "Demo scene written and read back");
    Ok(())
}

fn run(args: &[String]) -> Result<(), CliError> {
    let invocation = parse_args(args)?;
    let settings = BridgeSettings::load_or_default(&invocation.settings)?;
    init_logging(&settings);
    tracing::info!("Starting OrdoPlay MaterialX v{}", env!("CARGO_PKG_VERSION"));

    let session = Session::with_settings(&settings)?;
    match invocation.command {
        Command::Write { scene, material } => write(&session, &scene, &material),
        Command::Read { scene, material } => read(&session, &scene, &material),
        Command::Demo { directory } => demo(&session, &directory),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        // Logging may not be up yet when argument parsing fails
        eprintln!("{e}");
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
