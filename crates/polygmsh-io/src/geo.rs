use anyhow::{Context, Result};
use polygmsh_topology::{GeometryModel, Oriented};
use std::fmt;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_SCRIPT_NAME: &str = "cubes.geo";

/// Gmsh built-in kernel script for a lattice model.
///
/// Identifiers are arena indices plus one, so every entity keeps the same tag
/// wherever it is referenced. Line loop `k` bounds plane surface `k` and
/// surface loop `k` bounds volume `k`.
pub struct GeoDisplay<'a> {
    model: &'a GeometryModel,
}

impl<'a> GeoDisplay<'a> {
    pub fn new(model: &'a GeometryModel) -> Self {
        Self { model }
    }
}

impl fmt::Display for GeoDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.model;
        let counts = model.counts();
        writeln!(f, "// polygmsh: {} lattice of unit cubes", model.dims())?;
        writeln!(
            f,
            "// points: {}, lines: {}, surfaces: {}, volumes: {}",
            counts.points, counts.lines, counts.surfaces, counts.volumes
        )?;

        writeln!(f)?;
        for (index, point) in model.points().iter().enumerate() {
            let p = point.position;
            writeln!(f, "Point({}) = {{{}, {}, {}}};", tag(index), p.x, p.y, p.z)?;
        }

        writeln!(f)?;
        for (index, line) in model.lines().iter().enumerate() {
            writeln!(
                f,
                "Line({}) = {{{}, {}}};",
                tag(index),
                tag(line.start.index()),
                tag(line.end.index())
            )?;
        }

        writeln!(f)?;
        for (index, surface) in model.surfaces().iter().enumerate() {
            let refs = surface.boundary.map(|line| Signed(line.map(|id| id.index())));
            writeln!(f, "Line Loop({}) = {{{}}};", tag(index), join(&refs))?;
            writeln!(f, "Plane Surface({0}) = {{{0}}};", tag(index))?;
        }

        writeln!(f)?;
        for (index, volume) in model.volumes().iter().enumerate() {
            let refs = volume.boundary.map(|surface| Signed(surface.map(|id| id.index())));
            writeln!(f, "Surface Loop({}) = {{{}}};", tag(index), join(&refs))?;
            writeln!(f, "Volume({0}) = {{{0}}};", tag(index))?;
        }
        Ok(())
    }
}

struct Signed(Oriented<usize>);

impl fmt::Display for Signed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_reversed() {
            f.write_str("-")?;
        }
        write!(f, "{}", tag(self.0.entity()))
    }
}

fn tag(index: usize) -> usize {
    index + 1
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn to_geo_string(model: &GeometryModel) -> String {
    GeoDisplay::new(model).to_string()
}

pub fn write_geo(model: &GeometryModel, mut writer: impl std::io::Write) -> std::io::Result<()> {
    write!(writer, "{}", GeoDisplay::new(model))?;
    writer.flush()
}

pub fn export_geo(model: &GeometryModel, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }

    let script = to_geo_string(model);
    std::fs::write(path, &script)
        .with_context(|| format!("write geo script {}", path.display()))?;
    debug!(path = %path.display(), bytes = script.len(), "geo script written");
    Ok(())
}
