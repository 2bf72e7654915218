use thiserror::Error;

pub mod lattice;
pub mod model;
pub mod oriented;
pub mod validate;

pub use lattice::LatticeBuilder;
pub use model::{
    EntityCounts, GeometryModel, Line, LineId, Point, PointId, Surface, SurfaceId, Volume,
    VolumeId,
};
pub use oriented::Oriented;
pub use polygmsh_base::GridDims;
pub use polygmsh_geometry::{Axis, GridCoord, Point3};
pub use validate::{ValidationReport, validate};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Base(#[from] polygmsh_base::Error),
}

impl Error {
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Error::Base(polygmsh_base::Error::InvalidParameter(_)))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
