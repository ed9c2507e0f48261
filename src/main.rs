//! zbuff CLI - pack values ke hex, atau unpack hex sesuai format
//!
//! Usage:
//!   zbuff pack --capacity 32 ">IIHA" 0x1234 0x4567 0x12 abcdefg
//!   zbuff unpack ">IIHA7" 0000123400004567001261626364656667
//!
//! Log level via `RUST_LOG` (default: warn).

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use zbuff::codec::{Code, Directive};
use zbuff::{Buffer, Config, Format, Init, StorageKind, Value, Whence};

/// Fixed-capacity buffer pack/unpack tool
#[derive(Parser)]
#[command(name = "zbuff")]
#[command(about = "Pack and unpack binary data with a format string")]
struct Cli {
    /// Pakai anonymous mmap sebagai backing storage
    #[arg(long, global = true)]
    mapped: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack values ke buffer baru, print hasil sebagai hex
    Pack {
        /// Kapasitas buffer dalam bytes
        #[arg(short, long, default_value_t = 256)]
        capacity: usize,

        /// Byte pengisi awal
        #[arg(long)]
        fill: Option<i64>,

        /// Format string, contoh ">IIHA"
        format: String,

        /// Values, diparse sesuai directive yang memakainya
        #[arg(allow_hyphen_values = true)]
        values: Vec<String>,
    },

    /// Unpack hex input sesuai format
    Unpack {
        /// Format string, contoh ">IIHA7"
        format: String,

        /// Data dalam hex
        hex: String,
    },
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::new();
        if self.mapped {
            config = config.with_storage(StorageKind::Mapped);
        }
        config
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    match cli.command {
        Commands::Pack {
            capacity,
            fill,
            format,
            values,
        } => run_pack(&config, capacity, fill, &format, &values),
        Commands::Unpack { format, hex } => run_unpack(&config, &format, &hex),
    }
}

fn run_pack(
    config: &Config,
    capacity: usize,
    fill: Option<i64>,
    format: &str,
    raw_values: &[String],
) -> Result<()> {
    let init = fill.map_or(Init::Zeroed, Init::Fill);
    let mut buffer =
        Buffer::with_config(capacity, init, config).context("Failed to create buffer")?;

    let format = Format::parse(format).context("Invalid format string")?;
    let values = parse_values(&format, raw_values)?;

    let written = format
        .pack(&mut buffer, &values)
        .context("Failed to pack values")?;

    println!("written: {} bytes", written);
    println!("{}", hex::encode(&buffer.as_bytes()[..buffer.cursor()]));
    Ok(())
}

fn run_unpack(config: &Config, format: &str, input: &str) -> Result<()> {
    let data = hex::decode(input.trim()).context("Input is not valid hex")?;
    if data.is_empty() {
        bail!("Input is empty");
    }

    let mut buffer = Buffer::with_config(data.len(), Init::Bytes(&data), config)
        .context("Failed to create buffer")?;
    buffer.seek(0, Whence::Start);

    let format = Format::parse(format).context("Invalid format string")?;
    let unpacked = format.unpack(&mut buffer);

    println!("consumed: {} of {} bytes", unpacked.consumed, data.len());
    for (i, value) in unpacked.values.iter().enumerate() {
        println!("  [{}] {}", i, value);
    }
    Ok(())
}

/// Ubah argumen string menjadi Value sesuai directive yang memakainya
fn parse_values(format: &Format, raw: &[String]) -> Result<Vec<Value>> {
    let mut raw = raw.iter();
    let mut values = Vec::new();

    for directive in format.directives() {
        let Directive::Data { code, repeat } = *directive else {
            continue;
        };
        for _ in 0..repeat {
            // Kekurangan value dilaporkan oleh pack sebagai MissingValue
            let Some(arg) = raw.next() else {
                return Ok(values);
            };
            values.push(parse_value(code, arg)?);
        }
    }

    Ok(values)
}

fn parse_value(code: Code, arg: &str) -> Result<Value> {
    if code == Code::String {
        return Ok(Value::from(arg));
    }
    if code.is_float() {
        let v: f64 = arg
            .parse()
            .with_context(|| format!("`{}' is not a number (directive {})", arg, code.as_char()))?;
        return Ok(Value::Float(v));
    }
    parse_int(arg)
        .map(Value::Int)
        .with_context(|| format!("`{}' is not an integer (directive {})", arg, code.as_char()))
}

fn parse_int(arg: &str) -> Result<i64> {
    let (negative, digits) = match arg.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, arg),
    };
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16)?,
        None => digits.parse::<u64>()?,
    };
    // Nilai di atas i64::MAX (mis. u64) wrap, sama seperti koersi pack
    let v = magnitude as i64;
    Ok(if negative { v.wrapping_neg() } else { v })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42").unwrap(), 42);
        assert_eq!(parse_int("0x1234").unwrap(), 0x1234);
        assert_eq!(parse_int("-0x10").unwrap(), -16);
        assert_eq!(parse_int("18446744073709551615").unwrap(), -1);
        assert!(parse_int("abc").is_err());
    }

    #[test]
    fn test_parse_values_follow_directives() {
        let format = Format::parse(">IdA").unwrap();
        let raw: Vec<String> = ["0x10", "2.5", "hi"].iter().map(|s| s.to_string()).collect();
        let values = parse_values(&format, &raw).unwrap();
        assert_eq!(
            values,
            vec![Value::Int(16), Value::Float(2.5), Value::from("hi")]
        );
    }

    #[test]
    fn test_parse_values_rejects_bad_number() {
        let format = Format::parse("i").unwrap();
        assert!(parse_values(&format, &["x".to_string()]).is_err());
    }
}
