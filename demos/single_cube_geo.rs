use anyhow::Result;
use polygmsh_io::export_geo;
use polygmsh_topology::LatticeBuilder;

fn main() -> Result<()> {
    let model = LatticeBuilder::build(1, 1, 1)?;
    export_geo(&model, "out/cube.geo")?;
    Ok(())
}
