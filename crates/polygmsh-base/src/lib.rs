use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of unit cubes along each axis of a lattice.
///
/// Always at least one cube per axis; the entity counts of the lattice are
/// guaranteed to fit in `usize`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDims")]
pub struct GridDims {
    nx: usize,
    ny: usize,
    nz: usize,
}

#[derive(Deserialize)]
struct RawDims {
    nx: usize,
    ny: usize,
    nz: usize,
}

impl TryFrom<RawDims> for GridDims {
    type Error = Error;

    fn try_from(raw: RawDims) -> Result<Self> {
        Self::new(raw.nx, raw.ny, raw.nz)
    }
}

impl GridDims {
    pub fn new(nx: usize, ny: usize, nz: usize) -> Result<Self> {
        ensure_positive("nx", nx)?;
        ensure_positive("ny", ny)?;
        ensure_positive("nz", nz)?;

        let dims = Self { nx, ny, nz };
        if dims.checked_entity_total().is_none() {
            return Err(Error::InvalidParameter(format!(
                "lattice {dims} is too large to index"
            )));
        }
        Ok(dims)
    }

    /// Same number of cubes along every axis.
    pub fn cubic(n: usize) -> Result<Self> {
        Self::new(n, n, n)
    }

    pub const fn nx(&self) -> usize {
        self.nx
    }

    pub const fn ny(&self) -> usize {
        self.ny
    }

    pub const fn nz(&self) -> usize {
        self.nz
    }

    pub const fn point_count(&self) -> usize {
        (self.nx + 1) * (self.ny + 1) * (self.nz + 1)
    }

    pub const fn line_count(&self) -> usize {
        self.nx * (self.ny + 1) * (self.nz + 1)
            + (self.nx + 1) * self.ny * (self.nz + 1)
            + (self.nx + 1) * (self.ny + 1) * self.nz
    }

    pub const fn surface_count(&self) -> usize {
        (self.nx + 1) * self.ny * self.nz
            + self.nx * (self.ny + 1) * self.nz
            + self.nx * self.ny * (self.nz + 1)
    }

    pub const fn cell_count(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    // Every per-kind count is bounded by 3 * (nx+1)(ny+1)(nz+1).
    fn checked_entity_total(&self) -> Option<usize> {
        (self.nx.checked_add(1)?)
            .checked_mul(self.ny.checked_add(1)?)?
            .checked_mul(self.nz.checked_add(1)?)?
            .checked_mul(3)
    }
}

impl std::fmt::Display for GridDims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.nx, self.ny, self.nz)
    }
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, Error>;

fn ensure_positive(name: &str, value: usize) -> Result<()> {
    if value < 1 {
        return Err(Error::InvalidParameter(format!("{name} must be >= 1")));
    }
    Ok(())
}
