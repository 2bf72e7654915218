use anyhow::Result;
use polygmsh_io::export_geo;
use polygmsh_mesher::{MeshFormat, MeshOptions, Mesher, MesherConfig};
use polygmsh_topology::LatticeBuilder;
use std::path::Path;

fn main() -> Result<()> {
    let model = LatticeBuilder::build(4, 2, 2)?;
    let script = Path::new("out/lattice.geo");
    export_geo(&model, script)?;

    let config = match MesherConfig::default_path() {
        Some(path) => MesherConfig::load(path)?,
        None => MesherConfig::default(),
    };
    let options = MeshOptions {
        format: Some(MeshFormat::Msh41),
        preferred_length: Some(0.5),
        ..MeshOptions::default()
    };
    Mesher::locate(&config)?.run(script, Path::new("out/lattice.msh"), &options)?;
    Ok(())
}
