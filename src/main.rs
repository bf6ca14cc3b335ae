use anyhow::{bail, Context, Result};
use chrono::DateTime;
use itertools::Itertools;
use riak_ts_cell::Cell;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = std::env::args().collect::<Vec<_>>();
    match args.len() {
        0 | 1 => bail!("Missing <command>"),
        2 => bail!("Missing arguments for {}", args[1]),
        _ => {}
    }

    // Parse command and act accordingly
    let command = &args[1];
    match command.as_str() {
        "encode" => {
            let Some(value) = args.get(3) else {
                bail!("Missing <value>");
            };
            let cell = parse_cell(&args[2], value)?;
            println!("{}", to_hex(&cell.encode_to_vec()));
        }
        "decode" => {
            let bytes = from_hex(&args[2])?;
            let cell = Cell::decode_nullable(&bytes)?;
            println!("{:?} {}", cell.kind(), cell);
        }
        _ => bail!("Missing or invalid command passed: {}", command),
    }

    Ok(())
}

fn parse_cell(kind: &str, value: &str) -> Result<Cell> {
    let cell = match kind {
        "varchar" => Cell::new_varchar(value),
        "binary" => Cell::new_binary(from_hex(value)?),
        "sint64" => Cell::new_sint64(value.parse().context("sint64 value")?),
        "double" => Cell::new_double(value.parse().context("double value")?),
        "boolean" => Cell::new_boolean(value.parse().context("boolean value")?),
        "timestamp" => match value.parse::<i64>() {
            Ok(millis) => Cell::new_timestamp(millis),
            Err(_) => Cell::from(
                DateTime::parse_from_rfc3339(value)
                    .with_context(|| format!("timestamp {value:?} is neither millis nor RFC 3339"))?,
            ),
        },
        _ => bail!("unknown cell kind {kind:?}"),
    };
    Ok(cell)
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).join("")
}

fn from_hex(text: &str) -> Result<Vec<u8>> {
    if text.len() % 2 != 0 {
        bail!("odd number of hex digits in {text:?}");
    }
    text.as_bytes()
        .chunks(2)
        .map(|pair| {
            if !pair.iter().all(u8::is_ascii_hexdigit) {
                bail!("invalid hex byte {:?}", String::from_utf8_lossy(pair));
            }
            let digits = std::str::from_utf8(pair)?;
            u8::from_str_radix(digits, 16).with_context(|| format!("invalid hex byte {digits:?}"))
        })
        .try_collect()
}
