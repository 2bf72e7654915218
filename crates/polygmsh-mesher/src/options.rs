use crate::{MeshFormat, MesherError, Result};

pub const DEFAULT_ALGORITHM: &str = "del3d";
pub const DEFAULT_SMOOTHING_STEPS: u32 = 10;
pub const DEFAULT_VERBOSITY: u32 = 4;

/// Settings forwarded to gmsh. `None` leaves the choice to gmsh.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshOptions {
    pub format: Option<MeshFormat>,
    /// Preferred tetrahedron edge length, used as both the minimum and maximum
    /// characteristic length.
    pub preferred_length: Option<f64>,
    pub threads: Option<u32>,
    pub algorithm: String,
    pub smoothing_steps: u32,
    pub optimize: bool,
    pub verbosity: u32,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            format: None,
            preferred_length: None,
            threads: None,
            algorithm: DEFAULT_ALGORITHM.to_string(),
            smoothing_steps: DEFAULT_SMOOTHING_STEPS,
            optimize: true,
            verbosity: DEFAULT_VERBOSITY,
        }
    }
}

impl MeshOptions {
    pub fn validate(&self) -> Result<()> {
        if let Some(length) = self.preferred_length {
            if !length.is_finite() || length <= 0.0 {
                return Err(MesherError::InvalidOption(format!(
                    "preferred length must be a positive number, got {length}"
                )));
            }
        }
        if self.threads == Some(0) {
            return Err(MesherError::InvalidOption(
                "thread count must be >= 1".to_string(),
            ));
        }
        if self.algorithm.trim().is_empty() {
            return Err(MesherError::InvalidOption(
                "algorithm must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let options = MeshOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.algorithm, "del3d");
        assert!(options.optimize);
    }

    #[test]
    fn rejects_bad_length_and_threads() {
        for length in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let options = MeshOptions {
                preferred_length: Some(length),
                ..MeshOptions::default()
            };
            assert!(matches!(
                options.validate(),
                Err(MesherError::InvalidOption(_))
            ));
        }

        let options = MeshOptions {
            threads: Some(0),
            ..MeshOptions::default()
        };
        assert!(options.validate().is_err());
    }
}
