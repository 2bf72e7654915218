//! Consistency checks for a built lattice.
//!
//! - every surface boundary is a closed loop lying in the surface's plane
//! - hull surfaces bound one volume, interior surfaces bound two with opposite signs
//! - every volume boundary is a closed, consistently oriented hexahedron
//! - the cell complex has Euler characteristic 1 (V - E + F - C)

use crate::{EntityCounts, GeometryModel, LineId, Oriented, SurfaceId};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn validate(model: &GeometryModel) -> ValidationReport {
    let mut errors = Vec::new();

    let expected = EntityCounts::expected(&model.dims());
    let counts = model.counts();
    if counts != expected {
        errors.push(format!(
            "entity counts {counts:?} differ from {expected:?} for a {} lattice",
            model.dims()
        ));
    }

    check_surface_loops(model, &mut errors);
    check_surface_sharing(model, &mut errors);
    check_volume_shells(model, &mut errors);

    let euler = counts.points as i64 - counts.lines as i64 + counts.surfaces as i64
        - counts.volumes as i64;
    if euler != 1 {
        errors.push(format!("Euler characteristic V-E+F-C = {euler} (expected 1)"));
    }

    ValidationReport { errors }
}

fn check_surface_loops(model: &GeometryModel, errors: &mut Vec<String>) {
    for (index, surface) in model.surfaces().iter().enumerate() {
        let boundary = &surface.boundary;
        for (i, &line) in boundary.iter().enumerate() {
            let next = boundary[(i + 1) % boundary.len()];
            let (_, head) = model.oriented_endpoints(line);
            let (tail, _) = model.oriented_endpoints(next);
            if head != tail {
                errors.push(format!(
                    "surface {index}: line {i} ends at {head:?} but line {} starts at {tail:?}",
                    (i + 1) % boundary.len()
                ));
            }
            if model.line(line.entity()).axis == surface.normal {
                errors.push(format!(
                    "surface {index}: line {i} runs along the surface normal {}",
                    surface.normal
                ));
            }
        }
    }
}

fn check_surface_sharing(model: &GeometryModel, errors: &mut Vec<String>) {
    let mut uses: HashMap<SurfaceId, Vec<bool>> = HashMap::new();
    for volume in model.volumes() {
        for surface in volume.boundary {
            uses.entry(surface.entity())
                .or_default()
                .push(surface.is_reversed());
        }
    }

    for id in model.surface_ids() {
        let index = id.index();
        let orientations = uses.get(&id).map(Vec::as_slice).unwrap_or_default();
        let on_hull = model.is_on_hull(id);
        match (on_hull, orientations) {
            (true, [_]) => {}
            (false, [a, b]) if a != b => {}
            (false, [_, _]) => errors.push(format!(
                "surface {index}: both adjacent volumes use the same orientation"
            )),
            _ => errors.push(format!(
                "surface {index}: referenced {} times (hull: {on_hull})",
                orientations.len()
            )),
        }
    }
}

fn check_volume_shells(model: &GeometryModel, errors: &mut Vec<String>) {
    for (index, volume) in model.volumes().iter().enumerate() {
        let distinct: HashSet<SurfaceId> = volume.boundary.iter().map(|s| s.entity()).collect();
        if distinct.len() != volume.boundary.len() {
            errors.push(format!("volume {index}: repeats a boundary surface"));
        }

        // A closed outward shell traverses each of its lines once in each direction.
        let mut traversals: HashMap<LineId, Vec<bool>> = HashMap::new();
        for face in volume.boundary {
            for line in model.surface(face.entity()).boundary {
                let effective =
                    Oriented::new(line.entity(), line.is_reversed() != face.is_reversed());
                traversals
                    .entry(effective.entity())
                    .or_default()
                    .push(effective.is_reversed());
            }
        }
        if traversals.len() != 12 {
            errors.push(format!(
                "volume {index}: boundary uses {} distinct lines (expected 12)",
                traversals.len()
            ));
        }
        for (line, directions) in &traversals {
            if !matches!(directions.as_slice(), [a, b] if a != b) {
                errors.push(format!(
                    "volume {index}: line {} traversed as {directions:?}",
                    line.index()
                ));
            }
        }
    }
}
