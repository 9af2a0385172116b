mod logging;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use xrif_codecs::{codec_by_id, difference_by_id, reorder_by_id};
use xrif_core::format::{CompressMethod, DifferenceMethod, ReorderMethod, TypeCode, XrifHeader};
use xrif_core::{read_artifact, write_artifact, Handle, Role, HEADER_SIZE};

use crate::logging::{init_logging, LogFormat, LogLevel};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xrif",
    about = "Lossless compression of multi-frame data cubes: compress, decompress and inspect xrif files",
    version
)]
struct Cli {
    /// Log verbosity (logs go to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a raw cube into an xrif file
    Compress {
        /// Raw cube, samples in little-endian order ("-" reads stdin)
        input: PathBuf,
        /// Destination xrif file ("-" writes stdout)
        output: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        #[arg(long, default_value_t = 1)]
        depth: u32,
        #[arg(long, default_value_t = 1)]
        frames: u32,
        /// Sample type: uint8, int8, uint16, int16, ..., half
        #[arg(short = 't', long = "type", value_parser = parse_type_code)]
        type_code: TypeCode,
        /// Compression method
        #[arg(short, long, value_enum, default_value_t = CompressArg::Lz4)]
        compress: CompressArg,
        /// LZ4 acceleration (values below 1 are raised to 1)
        #[arg(long, default_value_t = 1)]
        lz4_acceleration: u16,
        /// Compress into a separate buffer instead of over the raw buffer
        #[arg(long)]
        separate_buffer: bool,
    },
    /// Decompress an xrif file back to the raw cube
    Decompress {
        /// Source xrif file ("-" reads stdin)
        input: PathBuf,
        /// Destination raw file ("-" writes stdout)
        output: PathBuf,
    },
    /// Print the header of an xrif file
    Inspect {
        file: PathBuf,
        /// Emit a JSON document instead of the text report
        #[arg(long)]
        json: bool,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum CompressArg {
    Lz4,
    None,
}

impl From<CompressArg> for CompressMethod {
    fn from(arg: CompressArg) -> Self {
        match arg {
            CompressArg::Lz4 => CompressMethod::Lz4,
            CompressArg::None => CompressMethod::None,
        }
    }
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn parse_type_code(name: &str) -> Result<TypeCode, String> {
    let wanted = name.to_ascii_lowercase();
    TypeCode::ALL
        .into_iter()
        .find(|t| t.name() == wanted)
        .ok_or_else(|| {
            let valid: Vec<&str> = TypeCode::ALL.iter().map(|t| t.name()).collect();
            format!("unknown type '{}'. Valid options: {}", name, valid.join(", "))
        })
}

fn is_stdio(path: &Path) -> bool {
    path.to_str() == Some("-")
}

fn open_input(path: &Path) -> anyhow::Result<Box<dyn Read>> {
    if is_stdio(path) {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).with_context(|| format!("opening input file {:?}", path))?;
    Ok(Box::new(BufReader::new(file)))
}

fn create_output(path: &Path) -> anyhow::Result<Box<dyn Write>> {
    if is_stdio(path) {
        return Ok(Box::new(io::stdout().lock()));
    }
    let file = File::create(path).with_context(|| format!("creating output file {:?}", path))?;
    Ok(Box::new(BufWriter::new(file)))
}

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

fn ratio(raw: usize, compressed: usize) -> f64 {
    if compressed == 0 {
        0.0
    } else {
        raw as f64 / compressed as f64
    }
}

// ── Subcommand implementations ─────────────────────────────────────────────

struct CompressOptions {
    shape: (u32, u32, u32, u32),
    type_code: TypeCode,
    method: CompressMethod,
    lz4_acceleration: u16,
    separate_buffer: bool,
}

fn run_compress(input: PathBuf, output: PathBuf, opts: CompressOptions) -> anyhow::Result<()> {
    let (width, height, depth, frames) = opts.shape;
    let mut handle = Handle::new();
    handle.setup(width, height, depth, frames, opts.type_code);
    handle.set_difference_method(DifferenceMethod::None);
    handle.set_reorder_method(ReorderMethod::None);
    handle.set_compress_method(opts.method);
    handle.set_lz4_acceleration(opts.lz4_acceleration);
    handle.set_compress_on_raw(!opts.separate_buffer);

    let mut raw = Vec::new();
    open_input(&input)?
        .read_to_end(&mut raw)
        .with_context(|| format!("reading {:?}", input))?;
    if raw.len() != handle.raw_size() {
        bail!(
            "input holds {} bytes but a {}x{}x{}x{} {} cube needs {}",
            raw.len(),
            width,
            height,
            depth,
            frames,
            opts.type_code.name(),
            handle.raw_size()
        );
    }

    handle.allocate().context("allocating cube buffers")?;
    handle
        .buffer_mut(Role::Raw)
        .context("raw buffer is not bound")?[..raw.len()]
        .copy_from_slice(&raw);

    let difference = difference_by_id(handle.difference_method)?;
    let reorder = reorder_by_id(handle.reorder_method)?;
    let codec = codec_by_id(handle.compress_method);

    let t0 = Instant::now();
    difference.forward(&mut handle)?;
    reorder.forward(&mut handle)?;
    handle.compress(codec.as_ref())?;
    let elapsed = t0.elapsed();

    let mut dst = create_output(&output)?;
    let total = write_artifact(&mut dst, &handle)
        .with_context(|| format!("writing artifact to {:?}", output))?;
    info!(codec = codec.name(), total, "compressed cube written");

    eprintln!("  codec       : {}", codec.name());
    eprintln!("  shape       : {}x{}x{}x{}", width, height, depth, frames);
    eprintln!("  type        : {}", opts.type_code.name());
    eprintln!("  raw size    : {}", human_bytes(raw.len() as u64));
    eprintln!("  compressed  : {}", human_bytes(handle.compressed_size as u64));
    eprintln!("  file size   : {}", human_bytes(total));
    eprintln!("  ratio       : {:.2}x", ratio(raw.len(), handle.compressed_size));
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_decompress(input: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let mut handle = Handle::new();
    let payload = read_artifact(open_input(&input)?, &mut handle)
        .with_context(|| format!("reading artifact {:?}", input))?;
    if handle.type_code().is_none() {
        bail!("artifact declares no sample type");
    }

    handle.allocate().context("allocating cube buffers")?;
    let target = handle.compression_target();
    let slot = handle
        .buffer_mut(target)
        .with_context(|| format!("{} buffer is not bound", target))?;
    if payload.len() > slot.len() {
        bail!(
            "payload of {} bytes exceeds the {}-byte compression bound for this cube",
            payload.len(),
            slot.len()
        );
    }
    slot[..payload.len()].copy_from_slice(&payload);
    debug!(payload = payload.len(), target = %target, "payload staged");

    let difference = difference_by_id(handle.difference_method)?;
    let reorder = reorder_by_id(handle.reorder_method)?;
    let codec = codec_by_id(handle.compress_method);

    let t0 = Instant::now();
    handle.decompress(codec.as_ref())?;
    reorder.inverse(&mut handle)?;
    difference.inverse(&mut handle)?;
    let elapsed = t0.elapsed();

    let raw_len = handle.raw_size();
    let raw = handle.buffer(Role::Raw).context("raw buffer is not bound")?;
    let mut dst = create_output(&output)?;
    dst.write_all(&raw[..raw_len])?;
    dst.flush()?;

    eprintln!("  codec       : {}", codec.name());
    eprintln!("  raw size    : {}", human_bytes(raw_len as u64));
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_inspect(file: PathBuf, json: bool) -> anyhow::Result<()> {
    let mut f = File::open(&file).with_context(|| format!("opening {:?}", file))?;
    let mut buf = [0u8; HEADER_SIZE];
    f.read_exact(&mut buf)
        .with_context(|| format!("{:?} is shorter than an xrif header", file))?;
    let header = XrifHeader::from_bytes(&buf)?;

    let file_size = f.metadata()?.len();
    let payload_size = file_size.saturating_sub(header.header_size as u64) as usize;
    let mut handle = Handle::new();
    handle.apply_header(&header);
    let raw_size = handle.raw_size();

    if json {
        let report = serde_json::json!({
            "file": file.display().to_string(),
            "header": header,
            "raw_size": raw_size,
            "payload_size": payload_size,
            "file_size": file_size,
            "ratio": ratio(raw_size, payload_size),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("=== xrif file: {:?} ===", file);
    println!();
    println!("  format version : {}", header.version);
    println!("  header size    : {} B", header.header_size);
    println!(
        "  shape          : {}x{}x{}x{}",
        header.width, header.height, header.depth, header.frames
    );
    println!(
        "  type           : {}",
        header.type_code.map_or("none", TypeCode::name)
    );
    println!("  difference     : {:?}", header.difference_method);
    println!("  reorder        : {:?}", header.reorder_method);
    println!("  compress       : {:?}", header.compress_method);
    println!("  lz4 accel      : {}", header.lz4_acceleration);
    println!("  raw size       : {}", human_bytes(raw_size as u64));
    println!("  payload        : {}", human_bytes(payload_size as u64));
    println!("  file on disk   : {}", human_bytes(file_size));
    println!("  ratio          : {:.2}x", ratio(raw_size, payload_size));
    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match cli.command {
        Commands::Compress {
            input,
            output,
            width,
            height,
            depth,
            frames,
            type_code,
            compress,
            lz4_acceleration,
            separate_buffer,
        } => run_compress(
            input,
            output,
            CompressOptions {
                shape: (width, height, depth, frames),
                type_code,
                method: compress.into(),
                lz4_acceleration,
                separate_buffer,
            },
        ),
        Commands::Decompress { input, output } => run_decompress(input, output),
        Commands::Inspect { file, json } => run_inspect(file, json),
    }
}
