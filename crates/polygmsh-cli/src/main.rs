use anyhow::{Context, Result, bail};
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{Args, Parser, Subcommand};
use polygmsh_base::GridDims;
use polygmsh_io::{DEFAULT_SCRIPT_NAME, export_geo};
use polygmsh_mesher::{MeshFormat, MeshOptions, Mesher, MesherConfig, MesherError};
use polygmsh_topology::{GeometryModel, LatticeBuilder};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "polygmsh")]
#[command(about = "Mesh a block of unit cubes with gmsh")]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    mesh: MeshArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Write the geometry script without running gmsh.
    Geo(GeoArgs),
    /// Remember where gmsh is installed.
    #[command(name = "set-gmsh-path", alias = "set_gmsh_path")]
    SetGmshPath(SetGmshPathArgs),
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct LatticeArgs {
    /// Number of cubes along each axis.
    #[arg(short = 'n', long = "neach", value_parser = clap::value_parser!(u32).range(1..))]
    neach: Option<u32>,
    /// Numbers of cubes along the X, Y and Z axes. Also accepted as `-ns`.
    /// Cannot be combined with `-n`.
    #[arg(
        long = "ns",
        num_args = 3,
        value_names = ["NX", "NY", "NZ"],
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    ns: Option<Vec<u32>>,
}

#[derive(Args)]
struct MeshArgs {
    #[command(flatten)]
    lattice: LatticeArgs,
    /// Output mesh file.
    #[arg(short, long, default_value = "mesh.key")]
    out: PathBuf,
    /// Output mesh format.
    #[arg(
        short = 'f',
        long = "fmt",
        value_parser = PossibleValuesParser::new(MeshFormat::ALL.iter().map(|f| f.name()))
            .try_map(|name| name.parse::<MeshFormat>())
    )]
    fmt: Option<MeshFormat>,
    /// Preferred tetrahedron edge length.
    #[arg(short = 'p', long = "preflen")]
    preflen: Option<f64>,
    /// Number of gmsh threads.
    #[arg(long)]
    nthrs: Option<u32>,
    /// Path of the intermediate geometry script.
    #[arg(long, default_value = DEFAULT_SCRIPT_NAME)]
    geo: PathBuf,
    /// Mesher config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct GeoArgs {
    #[command(flatten)]
    lattice: LatticeArgs,
    /// Output script file.
    #[arg(short, long, default_value = DEFAULT_SCRIPT_NAME)]
    out: PathBuf,
}

#[derive(Args)]
struct SetGmshPathArgs {
    /// The gmsh executable or the directory that contains it.
    path: PathBuf,
    /// Mesher config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl LatticeArgs {
    fn dims(&self) -> Result<GridDims> {
        let dims = match (self.neach, self.ns.as_deref()) {
            (Some(n), _) => GridDims::cubic(n as usize),
            (None, Some(&[nx, ny, nz])) => GridDims::new(nx as usize, ny as usize, nz as usize),
            (None, Some(other)) => bail!("--ns expects three values, got {}", other.len()),
            (None, None) => bail!("one of --neach or --ns is required"),
        };
        dims.context("invalid lattice dimensions")
    }
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse_from(legacy_args(std::env::args_os()));

    match cli.command {
        Some(Command::Geo(args)) => write_script(args).map(|()| ExitCode::SUCCESS),
        Some(Command::SetGmshPath(args)) => set_gmsh_path(args).map(|()| ExitCode::SUCCESS),
        None => generate_mesh(cli.mesh),
    }
}

// Older scripts spell `--ns` with a single dash, which clap would read as
// `-n` followed by the value `s`.
fn legacy_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut after_separator = false;
    args.into_iter()
        .map(|arg| {
            if arg == "--" {
                after_separator = true;
            }
            if !after_separator && arg == "-ns" {
                OsString::from("--ns")
            } else {
                arg
            }
        })
        .collect()
}

fn build_lattice(dims: GridDims) -> GeometryModel {
    let start = Instant::now();
    let model = LatticeBuilder::build_dims(dims);
    info!(
        %dims,
        seconds = format_args!("{:.3}", start.elapsed().as_secs_f64()),
        "done generating geometry"
    );
    model
}

fn write_script(args: GeoArgs) -> Result<()> {
    let model = build_lattice(args.lattice.dims()?);
    export_geo(&model, &args.out).context("geo export failed")?;
    info!(path = %args.out.display(), "geo script written");
    Ok(())
}

fn generate_mesh(args: MeshArgs) -> Result<ExitCode> {
    let options = MeshOptions {
        format: args.fmt,
        preferred_length: args.preflen,
        threads: args.nthrs,
        ..MeshOptions::default()
    };
    options.validate().context("invalid mesh options")?;

    let model = build_lattice(args.lattice.dims()?);
    export_geo(&model, &args.geo).context("geo export failed")?;
    info!(path = %args.geo.display(), "geo script written");

    let config = load_config(args.config.as_deref())?;
    let mesher = Mesher::locate(&config).context("cannot run gmsh")?;

    match mesher.run(&args.geo, &args.out, &options) {
        Ok(_) => {
            info!(path = %args.out.display(), "mesh written");
            Ok(ExitCode::SUCCESS)
        }
        Err(MesherError::Failed { code }) => {
            error!(code, "gmsh failed");
            Ok(ExitCode::from(exit_byte(code)))
        }
        Err(err) => Err(err).context("mesh generation failed"),
    }
}

fn set_gmsh_path(args: SetGmshPathArgs) -> Result<()> {
    let path = config_path(args.config.as_deref())
        .context("cannot determine where to store the mesher config; pass --config")?;
    if !args.path.exists() {
        warn!(path = %args.path.display(), "gmsh path does not exist yet");
    }

    let mut config = MesherConfig::load(&path)
        .with_context(|| format!("read mesher config {}", path.display()))?;
    config.gmsh_path = Some(args.path);
    config
        .save(&path)
        .with_context(|| format!("write mesher config {}", path.display()))?;
    info!(config = %path.display(), "done saving gmsh path");
    Ok(())
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(MesherConfig::default_path)
}

fn load_config(explicit: Option<&Path>) -> Result<MesherConfig> {
    match config_path(explicit) {
        Some(path) => MesherConfig::load(&path)
            .with_context(|| format!("read mesher config {}", path.display())),
        None => Ok(MesherConfig::default()),
    }
}

// Mirrors the gmsh exit code; codes that do not fit a process exit byte map to 1.
fn exit_byte(code: i32) -> u8 {
    u8::try_from(code)
        .ok()
        .filter(|&byte| byte != 0)
        .unwrap_or(1)
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn neach_sets_every_axis() -> Result<()> {
        let cli = Cli::try_parse_from(["polygmsh", "-n", "3", "-f", "msh41", "-p", "0.5"])?;
        assert!(cli.command.is_none());
        assert_eq!(cli.mesh.lattice.dims()?, GridDims::cubic(3)?);
        assert_eq!(cli.mesh.fmt, Some(MeshFormat::Msh41));
        assert_eq!(cli.mesh.preflen, Some(0.5));
        assert_eq!(cli.mesh.out, PathBuf::from("mesh.key"));
        assert_eq!(cli.mesh.geo, PathBuf::from("cubes.geo"));
        Ok(())
    }

    #[test]
    fn ns_sets_axes_independently() -> Result<()> {
        let cli = Cli::try_parse_from(["polygmsh", "--ns", "2", "1", "4", "--nthrs", "8"])?;
        assert_eq!(cli.mesh.lattice.dims()?, GridDims::new(2, 1, 4)?);
        assert_eq!(cli.mesh.nthrs, Some(8));
        Ok(())
    }

    #[test]
    fn single_dash_ns_is_accepted() -> Result<()> {
        let args = legacy_args(["polygmsh", "-ns", "1", "2", "3"].map(OsString::from));
        let cli = Cli::try_parse_from(args)?;
        assert_eq!(cli.mesh.lattice.dims()?, GridDims::new(1, 2, 3)?);

        let args = legacy_args(["polygmsh", "geo", "-ns", "2", "2", "1"].map(OsString::from));
        match Cli::try_parse_from(args)?.command {
            Some(Command::Geo(args)) => assert_eq!(args.lattice.dims()?, GridDims::new(2, 2, 1)?),
            _ => bail!("expected geo subcommand"),
        }

        let args = legacy_args(["polygmsh", "-n", "2", "-ns", "1", "2", "3"].map(OsString::from));
        assert!(Cli::try_parse_from(args).is_err());

        let args = legacy_args(["polygmsh", "--", "-ns"].map(OsString::from));
        assert_eq!(args[2], OsString::from("-ns"));
        Ok(())
    }

    #[test]
    fn lattice_size_is_required_and_positive() {
        assert!(Cli::try_parse_from(["polygmsh"]).is_err());
        assert!(Cli::try_parse_from(["polygmsh", "-n", "0"]).is_err());
        assert!(Cli::try_parse_from(["polygmsh", "-n", "-2"]).is_err());
        assert!(Cli::try_parse_from(["polygmsh", "--ns", "1", "2"]).is_err());
        assert!(Cli::try_parse_from(["polygmsh", "-n", "2", "--ns", "1", "2", "3"]).is_err());
        assert!(Cli::try_parse_from(["polygmsh", "-n", "2", "-f", "obj"]).is_err());
    }

    #[test]
    fn subcommands_parse() -> Result<()> {
        let cli = Cli::try_parse_from(["polygmsh", "geo", "--ns", "1", "1", "2", "-o", "a.geo"])?;
        match cli.command {
            Some(Command::Geo(args)) => {
                assert_eq!(args.lattice.dims()?, GridDims::new(1, 1, 2)?);
                assert_eq!(args.out, PathBuf::from("a.geo"));
            }
            _ => bail!("expected geo subcommand"),
        }

        let cli = Cli::try_parse_from(["polygmsh", "set_gmsh_path", "/opt/gmsh"])?;
        match cli.command {
            Some(Command::SetGmshPath(args)) => assert_eq!(args.path, PathBuf::from("/opt/gmsh")),
            _ => bail!("expected set-gmsh-path subcommand"),
        }
        Ok(())
    }

    #[test]
    fn failing_exit_codes_are_mirrored() {
        assert_eq!(exit_byte(3), 3);
        assert_eq!(exit_byte(-1), 1);
        assert_eq!(exit_byte(300), 1);
    }
}
