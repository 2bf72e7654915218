use crate::{MeshOptions, MesherConfig, MesherError, Result};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::info;

pub const GMSH_EXECUTABLE: &str = if cfg!(windows) { "gmsh.exe" } else { "gmsh" };

/// A located gmsh executable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mesher {
    executable: PathBuf,
}

impl Mesher {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Uses the configured location when there is one, otherwise searches `PATH`.
    pub fn locate(config: &MesherConfig) -> Result<Self> {
        Self::locate_with(config, std::env::var_os("PATH"))
    }

    /// [`Mesher::locate`] with an explicit search path in place of `PATH`.
    pub fn locate_with(config: &MesherConfig, path_var: Option<OsString>) -> Result<Self> {
        match &config.gmsh_path {
            Some(path) => resolve_configured(path).map(Self::new),
            None => find_on_path(path_var)
                .map(Self::new)
                .ok_or(MesherError::NotConfigured),
        }
    }

    /// Arguments for a 3-D mesh of `script` written to `output`. Unset options
    /// are omitted so gmsh falls back to its own defaults.
    pub fn command_args(script: &Path, output: &Path, options: &MeshOptions) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-open".into(),
            script.into(),
            "-o".into(),
            output.into(),
            "-3".into(),
            "-algo".into(),
            options.algorithm.as_str().into(),
            "-smooth".into(),
            options.smoothing_steps.to_string().into(),
        ];
        if options.optimize {
            args.push("-optimize".into());
        }
        args.extend(["-v".into(), options.verbosity.to_string().into()]);

        if let Some(format) = options.format {
            args.extend(["-format".into(), format.name().into()]);
        }
        if let Some(threads) = options.threads {
            args.extend(["-nt".into(), threads.to_string().into()]);
        }
        if let Some(length) = options.preferred_length {
            let length = OsString::from(length.to_string());
            args.extend(["-clmin".into(), length.clone(), "-clmax".into(), length]);
        }
        args
    }

    /// Runs gmsh to completion. A non-zero exit is reported with its code.
    pub fn run(&self, script: &Path, output: &Path, options: &MeshOptions) -> Result<ExitStatus> {
        options.validate()?;
        let args = Self::command_args(script, output, options);
        info!(
            executable = %self.executable.display(),
            script = %script.display(),
            output = %output.display(),
            "running gmsh"
        );

        let status = Command::new(&self.executable)
            .args(&args)
            .status()
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => MesherError::NotFound {
                    path: self.executable.clone(),
                },
                _ => MesherError::Io(err),
            })?;

        if status.success() {
            info!(output = %output.display(), "gmsh finished");
            return Ok(status);
        }
        match status.code() {
            Some(code) => Err(MesherError::Failed { code }),
            None => Err(MesherError::Terminated),
        }
    }
}

fn resolve_configured(path: &Path) -> Result<PathBuf> {
    if path.is_dir() {
        let candidate = path.join(GMSH_EXECUTABLE);
        if candidate.is_file() {
            return Ok(candidate);
        }
        return Err(MesherError::NotFound { path: candidate });
    }
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    Err(MesherError::NotFound {
        path: path.to_path_buf(),
    })
}

fn find_on_path(path_var: Option<OsString>) -> Option<PathBuf> {
    let path_var = path_var?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(GMSH_EXECUTABLE))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MeshFormat;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name: &str) -> std::io::Result<PathBuf> {
        let mut path = std::env::temp_dir();
        let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_nanos(),
            Err(_) => 0,
        };
        path.push(format!("polygmsh_mesher_{stamp}_{name}"));
        std::fs::create_dir_all(&path)?;
        Ok(path)
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn default_args_omit_unset_options() {
        let args = Mesher::command_args(
            Path::new("cubes.geo"),
            Path::new("mesh.key"),
            &MeshOptions::default(),
        );
        assert_eq!(
            strings(&args),
            [
                "-open", "cubes.geo", "-o", "mesh.key", "-3", "-algo", "del3d", "-smooth", "10",
                "-optimize", "-v", "4",
            ]
        );
    }

    #[test]
    fn length_sets_both_bounds() {
        let options = MeshOptions {
            format: Some(MeshFormat::Msh41),
            preferred_length: Some(0.25),
            threads: Some(8),
            optimize: false,
            ..MeshOptions::default()
        };
        let args = strings(&Mesher::command_args(
            Path::new("in.geo"),
            Path::new("out.msh"),
            &options,
        ));
        assert!(!args.contains(&"-optimize".to_string()));
        assert_eq!(
            &args[args.len() - 8..],
            ["-format", "msh41", "-nt", "8", "-clmin", "0.25", "-clmax", "0.25"]
        );
    }

    #[test]
    fn configured_directory_resolves_to_executable() -> Result<()> {
        let dir = temp_dir("bin")?;
        let exe = dir.join(GMSH_EXECUTABLE);
        std::fs::write(&exe, "")?;

        let mesher = Mesher::locate(&MesherConfig::with_gmsh_path(&dir))?;
        assert_eq!(mesher.executable(), exe.as_path());
        let mesher = Mesher::locate(&MesherConfig::with_gmsh_path(&exe))?;
        assert_eq!(mesher.executable(), exe.as_path());

        assert_eq!(find_on_path(Some(dir.clone().into_os_string())), Some(exe));
        let _ = std::fs::remove_dir_all(&dir);
        Ok(())
    }

    #[test]
    fn missing_configured_path_is_not_found() -> Result<()> {
        let dir = temp_dir("empty")?;
        let err = Mesher::locate(&MesherConfig::with_gmsh_path(&dir)).unwrap_err();
        assert!(matches!(err, MesherError::NotFound { ref path } if path.ends_with(GMSH_EXECUTABLE)));

        let absent = dir.join("nowhere").join("gmsh");
        let err = Mesher::locate(&MesherConfig::with_gmsh_path(&absent)).unwrap_err();
        assert!(matches!(err, MesherError::NotFound { .. }));

        assert_eq!(find_on_path(None), None);
        let _ = std::fs::remove_dir_all(&dir);
        Ok(())
    }

    #[test]
    fn unconfigured_without_gmsh_on_path_is_not_configured() -> Result<()> {
        let config = MesherConfig::default();
        for path_var in [None, Some(OsString::new())] {
            let err = Mesher::locate_with(&config, path_var).unwrap_err();
            assert!(matches!(err, MesherError::NotConfigured), "{err}");
        }

        let dir = temp_dir("no_gmsh")?;
        let err = Mesher::locate_with(&config, Some(dir.clone().into_os_string())).unwrap_err();
        assert!(matches!(err, MesherError::NotConfigured), "{err}");
        let _ = std::fs::remove_dir_all(&dir);
        Ok(())
    }

    #[test]
    fn unconfigured_picks_up_gmsh_from_search_path() -> Result<()> {
        let empty = temp_dir("path_empty")?;
        let bin = temp_dir("path_bin")?;
        let exe = bin.join(GMSH_EXECUTABLE);
        std::fs::write(&exe, "")?;

        let search = std::env::join_paths([&empty, &bin]).map_err(std::io::Error::other)?;
        let mesher = Mesher::locate_with(&MesherConfig::default(), Some(search))?;
        assert_eq!(mesher.executable(), exe.as_path());

        // A configured location wins over the search path.
        let err = Mesher::locate_with(
            &MesherConfig::with_gmsh_path(&empty),
            Some(bin.clone().into_os_string()),
        )
        .unwrap_err();
        assert!(matches!(err, MesherError::NotFound { .. }));

        let _ = std::fs::remove_dir_all(&empty);
        let _ = std::fs::remove_dir_all(&bin);
        Ok(())
    }

    #[test]
    fn spawning_a_missing_executable_is_not_found() {
        let mesher = Mesher::new("/definitely/not/here/gmsh");
        let err = mesher
            .run(
                Path::new("cubes.geo"),
                Path::new("mesh.key"),
                &MeshOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, MesherError::NotFound { .. }));
    }

    #[test]
    fn invalid_options_fail_before_spawning() {
        let mesher = Mesher::new("/definitely/not/here/gmsh");
        let options = MeshOptions {
            threads: Some(0),
            ..MeshOptions::default()
        };
        let err = mesher
            .run(Path::new("cubes.geo"), Path::new("mesh.key"), &options)
            .unwrap_err();
        assert!(matches!(err, MesherError::InvalidOption(_)));
    }

    #[cfg(unix)]
    #[test]
    fn exit_status_is_propagated() -> Result<()> {
        let (script, output) = (Path::new("cubes.geo"), Path::new("mesh.key"));
        let options = MeshOptions::default();

        if Path::new("/bin/true").is_file() {
            let status = Mesher::new("/bin/true").run(script, output, &options)?;
            assert!(status.success());
        }
        if Path::new("/bin/false").is_file() {
            let err = Mesher::new("/bin/false")
                .run(script, output, &options)
                .unwrap_err();
            assert!(matches!(err, MesherError::Failed { code: 1 }));
        }
        Ok(())
    }
}
