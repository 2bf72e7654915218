use crate::MesherError;
use std::fmt;
use std::str::FromStr;

macro_rules! mesh_formats {
    ($($variant:ident => $name:literal,)*) => {
        /// Output formats accepted by `gmsh -format`.
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
        pub enum MeshFormat {
            $($variant,)*
        }

        impl MeshFormat {
            pub const ALL: &'static [MeshFormat] = &[$(MeshFormat::$variant,)*];

            pub const fn name(self) -> &'static str {
                match self {
                    $(MeshFormat::$variant => $name,)*
                }
            }
        }
    };
}

mesh_formats! {
    Msh1 => "msh1",
    Msh2 => "msh2",
    Msh22 => "msh22",
    Msh3 => "msh3",
    Msh4 => "msh4",
    Msh40 => "msh40",
    Msh41 => "msh41",
    Msh => "msh",
    Unv => "unv",
    Vtk => "vtk",
    Wrl => "wrl",
    Mail => "mail",
    Stl => "stl",
    P3d => "p3d",
    Mesh => "mesh",
    Bdf => "bdf",
    Cgns => "cgns",
    Med => "med",
    Diff => "diff",
    Ir3 => "ir3",
    Inp => "inp",
    Ply2 => "ply2",
    Celum => "celum",
    Su2 => "su2",
    X3d => "x3d",
    Dat => "dat",
    Neu => "neu",
    M => "m",
    Key => "key",
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MeshFormat {
    type Err = MesherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        MeshFormat::ALL
            .iter()
            .copied()
            .find(|format| format.name() == wanted)
            .ok_or_else(|| MesherError::UnknownFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        assert_eq!(MeshFormat::ALL.len(), 29);
        for &format in MeshFormat::ALL {
            assert_eq!(format.to_string().parse::<MeshFormat>().ok(), Some(format));
        }
    }

    #[test]
    fn parsing_ignores_case_and_rejects_unknown() {
        assert_eq!("VTK".parse::<MeshFormat>().ok(), Some(MeshFormat::Vtk));
        assert!(matches!(
            "obj".parse::<MeshFormat>(),
            Err(MesherError::UnknownFormat(name)) if name == "obj"
        ));
    }
}
