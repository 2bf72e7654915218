use crate::{GeometryModel, LineId, Oriented, Result};
use polygmsh_base::GridDims;
use polygmsh_geometry::{Axis, GridCoord, cells, vertices};
use tracing::debug;

/// Builds the boundary representation of an `nx x ny x nz` block of unit cubes.
///
/// Neighbouring cubes share their common points, lines and surfaces; a shared
/// surface is referenced forward by one cube and reversed by the other, so
/// every cube boundary is oriented outward.
pub struct LatticeBuilder;

impl LatticeBuilder {
    pub fn build(nx: usize, ny: usize, nz: usize) -> Result<GeometryModel> {
        let dims = GridDims::new(nx, ny, nz)?;
        Ok(Self::build_dims(dims))
    }

    pub fn build_dims(dims: GridDims) -> GeometryModel {
        let mut model = GeometryModel::with_capacity(dims);

        add_points(&mut model, dims);
        add_lines(&mut model, dims);
        add_surfaces(&mut model, dims);
        add_volumes(&mut model, dims);

        let counts = model.counts();
        debug!(
            %dims,
            points = counts.points,
            lines = counts.lines,
            surfaces = counts.surfaces,
            volumes = counts.volumes,
            "lattice built"
        );
        model
    }
}

fn add_points(model: &mut GeometryModel, dims: GridDims) {
    for coord in vertices(dims) {
        model.add_point(coord);
    }
}

fn add_lines(model: &mut GeometryModel, dims: GridDims) {
    for coord in vertices(dims) {
        for axis in Axis::ALL {
            if coord.has_room(axis, &dims) {
                model.add_line(coord, axis);
            }
        }
    }
}

fn add_surfaces(model: &mut GeometryModel, dims: GridDims) {
    for coord in vertices(dims) {
        for normal in Axis::ALL {
            let (u, v) = normal.plane_axes();
            if coord.has_room(u, &dims) && coord.has_room(v, &dims) {
                let boundary = square_boundary(model, coord, u, v);
                model.add_surface(coord, normal, boundary);
            }
        }
    }
}

// coord -> coord+u -> coord+u+v -> coord+v -> coord
fn square_boundary(
    model: &GeometryModel,
    coord: GridCoord,
    u: Axis,
    v: Axis,
) -> [Oriented<LineId>; 4] {
    [
        Oriented::forward(model.line_id(coord, u)),
        Oriented::forward(model.line_id(coord.step(u), v)),
        Oriented::backward(model.line_id(coord.step(v), u)),
        Oriented::backward(model.line_id(coord, v)),
    ]
}

fn add_volumes(model: &mut GeometryModel, dims: GridDims) {
    for cell in cells(dims) {
        let near = Axis::ALL.map(|normal| -Oriented::forward(model.surface_id(cell, normal)));
        let far = Axis::ALL
            .map(|normal| Oriented::forward(model.surface_id(cell.step(normal), normal)));
        model.add_volume(cell, [near[0], near[1], near[2], far[0], far[1], far[2]]);
    }
}
