//! Arena storage for lattice topology.
//!
//! Entities live in per-kind `Vec`s and reference each other through typed
//! indices. Coordinate-keyed maps give O(1) lookup of the entity anchored at a
//! lattice vertex; entities that fall outside the grid simply have no entry.

use crate::Oriented;
use polygmsh_base::GridDims;
use polygmsh_geometry::{Axis, GridCoord, Point3};
use std::collections::HashMap;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
        pub struct $name(usize);

        impl $name {
            /// Zero-based position in the owning arena.
            pub const fn index(self) -> usize {
                self.0
            }
        }
    };
}

entity_id!(PointId);
entity_id!(LineId);
entity_id!(SurfaceId);
entity_id!(VolumeId);

#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub coord: GridCoord,
    pub position: Point3,
}

/// Unit segment from `origin` to `origin + axis`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Line {
    pub origin: GridCoord,
    pub axis: Axis,
    pub start: PointId,
    pub end: PointId,
}

/// Unit square anchored at `origin`, normal to `normal`.
///
/// The boundary winds counter-clockwise when viewed from `+normal`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Surface {
    pub origin: GridCoord,
    pub normal: Axis,
    pub boundary: [Oriented<LineId>; 4],
}

/// Unit cube whose low corner is `cell`.
///
/// Boundary order: the three low faces (reversed) normal to x, y, z, then the
/// three high faces (forward) normal to x, y, z.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Volume {
    pub cell: GridCoord,
    pub boundary: [Oriented<SurfaceId>; 6],
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EntityCounts {
    pub points: usize,
    pub lines: usize,
    pub surfaces: usize,
    pub volumes: usize,
}

impl EntityCounts {
    /// Counts a complete lattice of `dims` must have.
    pub const fn expected(dims: &GridDims) -> Self {
        Self {
            points: dims.point_count(),
            lines: dims.line_count(),
            surfaces: dims.surface_count(),
            volumes: dims.cell_count(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GeometryModel {
    dims: GridDims,
    points: Vec<Point>,
    lines: Vec<Line>,
    surfaces: Vec<Surface>,
    volumes: Vec<Volume>,
    point_index: HashMap<GridCoord, PointId>,
    line_index: HashMap<(GridCoord, Axis), LineId>,
    surface_index: HashMap<(GridCoord, Axis), SurfaceId>,
    volume_index: HashMap<GridCoord, VolumeId>,
}

impl GeometryModel {
    pub(crate) fn with_capacity(dims: GridDims) -> Self {
        Self {
            dims,
            points: Vec::with_capacity(dims.point_count()),
            lines: Vec::with_capacity(dims.line_count()),
            surfaces: Vec::with_capacity(dims.surface_count()),
            volumes: Vec::with_capacity(dims.cell_count()),
            point_index: HashMap::with_capacity(dims.point_count()),
            line_index: HashMap::with_capacity(dims.line_count()),
            surface_index: HashMap::with_capacity(dims.surface_count()),
            volume_index: HashMap::with_capacity(dims.cell_count()),
        }
    }

    // --- Construction ---

    pub(crate) fn add_point(&mut self, coord: GridCoord) -> PointId {
        let id = PointId(self.points.len());
        self.points.push(Point {
            coord,
            position: coord.to_point(),
        });
        self.point_index.insert(coord, id);
        id
    }

    pub(crate) fn add_line(&mut self, origin: GridCoord, axis: Axis) -> LineId {
        let line = Line {
            origin,
            axis,
            start: self.point_id(origin),
            end: self.point_id(origin.step(axis)),
        };
        let id = LineId(self.lines.len());
        self.lines.push(line);
        self.line_index.insert((origin, axis), id);
        id
    }

    pub(crate) fn add_surface(
        &mut self,
        origin: GridCoord,
        normal: Axis,
        boundary: [Oriented<LineId>; 4],
    ) -> SurfaceId {
        let id = SurfaceId(self.surfaces.len());
        self.surfaces.push(Surface {
            origin,
            normal,
            boundary,
        });
        self.surface_index.insert((origin, normal), id);
        id
    }

    pub(crate) fn add_volume(
        &mut self,
        cell: GridCoord,
        boundary: [Oriented<SurfaceId>; 6],
    ) -> VolumeId {
        let id = VolumeId(self.volumes.len());
        self.volumes.push(Volume { cell, boundary });
        self.volume_index.insert(cell, id);
        id
    }

    // Panicking lookups for the builder, which only asks for entities its
    // earlier passes are known to have created.

    fn point_id(&self, coord: GridCoord) -> PointId {
        self.point_index[&coord]
    }

    pub(crate) fn line_id(&self, origin: GridCoord, axis: Axis) -> LineId {
        self.line_index[&(origin, axis)]
    }

    pub(crate) fn surface_id(&self, origin: GridCoord, normal: Axis) -> SurfaceId {
        self.surface_index[&(origin, normal)]
    }

    // --- Queries ---

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    pub fn surface_ids(&self) -> impl Iterator<Item = SurfaceId> + use<> {
        (0..self.surfaces.len()).map(SurfaceId)
    }

    #[cfg(test)]
    pub(crate) fn volumes_mut(&mut self) -> &mut [Volume] {
        &mut self.volumes
    }

    pub fn point(&self, id: PointId) -> &Point {
        &self.points[id.0]
    }

    pub fn line(&self, id: LineId) -> &Line {
        &self.lines[id.0]
    }

    pub fn surface(&self, id: SurfaceId) -> &Surface {
        &self.surfaces[id.0]
    }

    pub fn volume(&self, id: VolumeId) -> &Volume {
        &self.volumes[id.0]
    }

    pub fn point_at(&self, coord: GridCoord) -> Option<PointId> {
        self.point_index.get(&coord).copied()
    }

    /// Line starting at `origin` and running along `+axis`.
    pub fn line_at(&self, origin: GridCoord, axis: Axis) -> Option<LineId> {
        self.line_index.get(&(origin, axis)).copied()
    }

    /// Surface anchored at `origin` and normal to `normal`.
    pub fn surface_at(&self, origin: GridCoord, normal: Axis) -> Option<SurfaceId> {
        self.surface_index.get(&(origin, normal)).copied()
    }

    pub fn volume_at(&self, cell: GridCoord) -> Option<VolumeId> {
        self.volume_index.get(&cell).copied()
    }

    /// `(tail, head)` of a line after applying the reference's direction.
    pub fn oriented_endpoints(&self, line: Oriented<LineId>) -> (PointId, PointId) {
        let Line { start, end, .. } = *self.line(line.entity());
        if line.is_reversed() {
            (end, start)
        } else {
            (start, end)
        }
    }

    /// Whether a surface lies on the outer hull of the lattice.
    pub fn is_on_hull(&self, id: SurfaceId) -> bool {
        let surface = self.surface(id);
        let at = surface.origin.get(surface.normal);
        at == 0 || at == surface.normal.extent(&self.dims)
    }

    pub fn counts(&self) -> EntityCounts {
        EntityCounts {
            points: self.points.len(),
            lines: self.lines.len(),
            surfaces: self.surfaces.len(),
            volumes: self.volumes.len(),
        }
    }
}
