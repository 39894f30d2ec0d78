//! Subcommand arguments and their execution.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;
use mesh_io::sml::{segment_headers, HEADER_LEN};
use mesh_io::{decode_sml, load_mesh, save_obj, save_sml, save_stl, MeshFormat, SmlWriteOptions};
use mesh_strip::{StripError, StripStrategy};
use mesh_types::{weld_vertices, Mesh};
use tracing::{info, warn};

/// Strip search requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripMode {
    /// Write a plain triangle list.
    None,
    /// Search for strips with the given strategy.
    Strategy(StripStrategy),
}

impl FromStr for StripMode {
    type Err = StripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("none") {
            Ok(Self::None)
        } else {
            s.parse().map(Self::Strategy)
        }
    }
}

/// Arguments shared by every conversion.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Remove each input file once its output has been written
    #[arg(long)]
    pub rm: bool,

    /// Input files
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Arguments for `to-sml`.
#[derive(Args, Debug)]
pub struct ToSmlArgs {
    /// Add a comment to each output file (repeatable)
    #[arg(short, long, value_name = "TEXT")]
    pub comment: Vec<String>,

    /// Search for triangle strips: grid (map), window (next), exhaustive (all), link or none
    #[arg(
        short,
        long,
        value_name = "MODE",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "link"
    )]
    pub strip: Option<StripMode>,

    /// Merge vertices closer than TOL on every axis before writing
    #[arg(
        long,
        value_name = "TOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "0.0001"
    )]
    pub weld: Option<f32>,

    #[command(flatten)]
    pub convert: ConvertArgs,
}

/// Arguments for `to-stl`.
#[derive(Args, Debug)]
pub struct ToStlArgs {
    /// Write ASCII STL instead of binary
    #[arg(long)]
    pub ascii: bool,

    #[command(flatten)]
    pub convert: ConvertArgs,
}

/// Arguments for `inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// SML file to inspect
    pub file: PathBuf,
}

/// Convert each input to SML beside it.
pub fn to_sml(args: &ToSmlArgs) -> Result<()> {
    let options = match args.strip {
        Some(StripMode::Strategy(strategy)) => SmlWriteOptions::with_strips(strategy),
        Some(StripMode::None) | None => SmlWriteOptions::default(),
    };

    convert_all(&args.convert, MeshFormat::Sml, |mesh, output| {
        if let Some(tolerance) = args.weld {
            let removed = weld_vertices(mesh, tolerance);
            info!(removed, tolerance, "Welded vertices");
        }
        mesh.comments.extend(args.comment.iter().cloned());

        let summary = save_sml(mesh, output, &options)?;
        info!("{summary}");
        Ok(())
    })
}

/// Convert each input to OBJ beside it.
pub fn to_obj(args: &ConvertArgs) -> Result<()> {
    convert_all(args, MeshFormat::Obj, |mesh, output| {
        save_obj(mesh, output)?;
        Ok(())
    })
}

/// Convert each input to STL beside it.
pub fn to_stl(args: &ToStlArgs) -> Result<()> {
    convert_all(&args.convert, MeshFormat::Stl, |mesh, output| {
        save_stl(mesh, output, !args.ascii)?;
        Ok(())
    })
}

fn convert_all(
    args: &ConvertArgs,
    format: MeshFormat,
    mut write: impl FnMut(&mut Mesh, &Path) -> Result<()>,
) -> Result<()> {
    for input in &args.files {
        let mut mesh =
            load_mesh(input).with_context(|| format!("failed to read {}", input.display()))?;
        let output = input.with_extension(format.extension());

        write(&mut mesh, &output)
            .with_context(|| format!("failed to write {}", output.display()))?;
        info!(
            "{} -> {} ({} vertices, {} triangles)",
            input.display(),
            output.display(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        if args.rm {
            remove_source(input, &output)?;
        }
    }

    info!("All done");
    Ok(())
}

fn remove_source(input: &Path, output: &Path) -> Result<()> {
    let same = match (fs::canonicalize(input), fs::canonicalize(output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if same {
        warn!("Not removing {}: it is also the output", input.display());
        return Ok(());
    }
    fs::remove_file(input).with_context(|| format!("failed to remove {}", input.display()))
}

/// Print the segment table and checksum of an SML file.
pub fn inspect(args: &InspectArgs) -> Result<()> {
    let path = &args.file;
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    print!("{}", describe(&bytes).with_context(|| format!("invalid SML file {}", path.display()))?);
    Ok(())
}

fn describe(bytes: &[u8]) -> Result<String> {
    use std::fmt::Write as _;

    let headers = segment_headers(bytes)?;
    let mesh = decode_sml(bytes)?;
    let stored = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

    let mut out = String::new();
    writeln!(out, "{} bytes, crc32c {stored:08x} (ok)", bytes.len())?;
    writeln!(out, "{:>10}  {:<12} {:>10} {:>10}", "offset", "segment", "bytes", "elements")?;
    for h in &headers {
        writeln!(
            out,
            "{:>10}  {:<12} {:>10} {:>10}",
            h.offset,
            h.kind.name(),
            h.length,
            h.element_count()
        )?;
    }
    writeln!(
        out,
        "{} segments after the {HEADER_LEN}-byte header: {} vertices, {} triangles, {} quads",
        headers.len(),
        mesh.vertex_count(),
        mesh.triangle_count(),
        mesh.quad_count()
    )?;
    for comment in &mesh.comments {
        writeln!(out, "# {comment}")?;
    }
    Ok(out)
}
