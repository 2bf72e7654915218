use polygmsh_base::GridDims;

pub type Point3 = cgmath::Point3<f64>;
pub type Vector3 = cgmath::Vector3<f64>;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// In-plane axes `(u, v)` of the plane normal to `self`, ordered so that
    /// `u x v` points along `+self`.
    pub const fn plane_axes(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::Z, Axis::X),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }

    pub fn unit(self) -> Vector3 {
        match self {
            Axis::X => Vector3::unit_x(),
            Axis::Y => Vector3::unit_y(),
            Axis::Z => Vector3::unit_z(),
        }
    }

    pub const fn extent(self, dims: &GridDims) -> usize {
        match self {
            Axis::X => dims.nx(),
            Axis::Y => dims.ny(),
            Axis::Z => dims.nz(),
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Integer lattice vertex (or cell, when naming a cell by its low corner).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl GridCoord {
    pub const ORIGIN: GridCoord = GridCoord::new(0, 0, 0);

    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    pub const fn get(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Neighbour one unit step along `+axis`.
    pub const fn step(self, axis: Axis) -> Self {
        match axis {
            Axis::X => Self::new(self.x + 1, self.y, self.z),
            Axis::Y => Self::new(self.x, self.y + 1, self.z),
            Axis::Z => Self::new(self.x, self.y, self.z + 1),
        }
    }

    /// Whether a unit step along `+axis` stays inside the vertex range of `dims`.
    pub const fn has_room(&self, axis: Axis, dims: &GridDims) -> bool {
        self.get(axis) < axis.extent(dims)
    }

    pub fn to_point(self) -> Point3 {
        Point3::new(self.x as f64, self.y as f64, self.z as f64)
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Every lattice vertex of `dims`, x outermost and z innermost.
pub fn vertices(dims: GridDims) -> impl Iterator<Item = GridCoord> {
    (0..=dims.nx()).flat_map(move |x| {
        (0..=dims.ny()).flat_map(move |y| (0..=dims.nz()).map(move |z| GridCoord::new(x, y, z)))
    })
}

/// Every cell of `dims` named by its low corner, x outermost and z innermost.
pub fn cells(dims: GridDims) -> impl Iterator<Item = GridCoord> {
    (0..dims.nx()).flat_map(move |x| {
        (0..dims.ny()).flat_map(move |y| (0..dims.nz()).map(move |z| GridCoord::new(x, y, z)))
    })
}
