use std::fs;
use std::io::{self, Read as _};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use spranim_animation_core::{
    AnimationDecoder, AnimationEncoder, AnimationModel, Config, EditorBus, RowLayout,
    SceneDescription,
};
use spranim_codec_core::{binary_string_to_bytes, BitBuffer, BitOrder};

#[derive(Parser, Debug)]
#[command(name = "spranim", version, about = "Encode and inspect sprite animation streams")]
struct Cli {
    /// Model config JSON (bounds, fps, default polygon).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity; repeat for more. RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack a scene JSON into the animation stream.
    Encode(EncodeArgs),
    /// Unpack a stream into CSV tables or a scene JSON.
    Decode(DecodeArgs),
    /// Sample a playback CSV table at a (fractional) frame.
    Sample(SampleArgs),
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum BlobFormat {
    Base64,
    /// One char per byte, as handed to QR encoders.
    BinaryString,
    Hex,
    /// The raw bit sequence as 0/1 characters.
    Bits,
}

#[derive(Parser, Debug)]
struct EncodeArgs {
    /// Scene JSON; `-` reads stdin.
    scene: PathBuf,

    #[arg(long, value_enum, default_value_t = BlobFormat::Base64)]
    format: BlobFormat,
}

#[derive(Parser, Debug)]
struct DecodeArgs {
    /// File holding the stream; `-` reads stdin.
    blob: PathBuf,

    #[arg(long, value_enum, default_value_t = BlobFormat::Base64)]
    format: BlobFormat,

    /// Write the polygon table here instead of stdout.
    #[arg(long)]
    polygons: Option<PathBuf>,

    /// Write the per-frame animation table here instead of stdout.
    #[arg(long)]
    animation: Option<PathBuf>,

    /// Print a scene JSON instead of the CSV tables.
    #[arg(long, default_value_t = false)]
    scene: bool,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Playback CSV; `-` reads stdin.
    table: PathBuf,

    #[arg(long)]
    frame: f64,

    /// The table has no rotation rows.
    #[arg(long, default_value_t = false)]
    no_rotation: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::from_json_str(&read_input(path)?)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => Config::default(),
    };

    match cli.cmd {
        Command::Encode(args) => cmd_encode(&config, args),
        Command::Decode(args) => cmd_decode(&config, args),
        Command::Sample(args) => cmd_sample(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

fn cmd_encode(config: &Config, args: EncodeArgs) -> anyhow::Result<()> {
    let scene = SceneDescription::from_json_str(&read_input(&args.scene)?)
        .with_context(|| format!("parse scene '{}'", args.scene.display()))?;
    let model = scene.build(config.clone(), EditorBus::new())?;
    let buf = AnimationEncoder::new(&model).encode().context("encode scene")?;
    info!(
        "{} polygon(s), {} bit(s), {} byte(s)",
        model.polygon_count(),
        buf.len(),
        buf.to_byte_array().len()
    );

    let out = match args.format {
        BlobFormat::Base64 => buf.to_base64(),
        BlobFormat::BinaryString => buf.to_binary_string(),
        BlobFormat::Hex => buf
            .to_byte_array()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect(),
        BlobFormat::Bits => buf.to_string(),
    };
    println!("{out}");
    Ok(())
}

fn parse_blob(text: &str, format: BlobFormat) -> anyhow::Result<BitBuffer> {
    let buf = match format {
        BlobFormat::Base64 => BitBuffer::from_base64(text, BitOrder::Big)?,
        BlobFormat::BinaryString => BitBuffer::from_bytes(
            &binary_string_to_bytes(text.trim_end_matches(['\r', '\n']))?,
            BitOrder::Big,
        ),
        BlobFormat::Hex => {
            let digits: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
            if digits.len() % 2 != 0 {
                bail!("hex blob has an odd number of digits");
            }
            let bytes = digits
                .chunks(2)
                .map(|pair| {
                    let s: String = pair.iter().collect();
                    u8::from_str_radix(&s, 16).with_context(|| format!("bad hex byte '{s}'"))
                })
                .collect::<anyhow::Result<Vec<u8>>>()?;
            BitBuffer::from_bytes(&bytes, BitOrder::Big)
        }
        BlobFormat::Bits => {
            let mut buf = BitBuffer::new();
            for c in text.chars().filter(|c| !c.is_whitespace()) {
                match c {
                    '0' => buf.write_bits(1, 0)?,
                    '1' => buf.write_bits(1, 1)?,
                    other => bail!("unexpected character {other:?} in bit string"),
                }
            }
            buf
        }
    };
    Ok(buf)
}

fn cmd_decode(config: &Config, args: DecodeArgs) -> anyhow::Result<()> {
    let text = read_input(&args.blob)?;
    let mut buf = parse_blob(&text, args.format)
        .with_context(|| format!("parse blob '{}'", args.blob.display()))?;
    let decoded = AnimationDecoder::new(config)
        .decode(&mut buf)
        .context("decode stream")?;
    info!("decoded {} polygon(s)", decoded.polygons.len());

    if args.scene {
        println!("{}", decoded.to_scene().to_json_string()?);
        return Ok(());
    }

    let polygons = decoded.polygons_csv();
    let animation = decoded.animation_csv();
    match &args.polygons {
        Some(path) => fs::write(path, polygons)
            .with_context(|| format!("write polygons '{}'", path.display()))?,
        None => print!("{polygons}"),
    }
    match &args.animation {
        Some(path) => fs::write(path, animation)
            .with_context(|| format!("write animation '{}'", path.display()))?,
        None => print!("{animation}"),
    }
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let layout = if args.no_rotation {
        RowLayout::PositionOnly
    } else {
        RowLayout::PositionAndRotation
    };
    let model = AnimationModel::from_csv_str(&read_input(&args.table)?, layout)
        .with_context(|| format!("parse table '{}'", args.table.display()))?;

    let rows: Vec<serde_json::Value> = model
        .objects()
        .iter()
        .map(|object| {
            let (position, rotation) = object.sample(args.frame);
            serde_json::json!({
                "id": object.id,
                "x": position.x(),
                "y": position.y(),
                "rotation": rotation.radians(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
