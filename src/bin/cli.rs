//! xedbg CLI Client
//!
//! Command-line interface for talking to a debug monitor.

use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use xedbg::memory::TextEncoding;
use xedbg::protocol::ResponseBody;
use xedbg::transfer::Progress;
use xedbg::{Config, Session, XeError};

/// xedbg CLI
#[derive(Parser, Debug)]
#[command(name = "xedbg-cli")]
#[command(about = "CLI for the Xbox 360 debug monitor")]
#[command(version)]
struct Args {
    /// Console host name or IP address
    #[arg(short = 'H', long)]
    host: String,

    /// Debug monitor port
    #[arg(short, long, default_value = "730")]
    port: u16,

    /// Decode status sub-codes from the last digit only
    #[arg(long)]
    legacy_status: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that the console answers
    Ping {
        /// Deadline in milliseconds
        #[arg(short, long, default_value = "1000")]
        timeout: u64,
    },

    /// Show server capabilities
    Info,

    /// Send a raw command and print the response
    Send {
        /// The command line
        command: String,
    },

    /// Read memory as hex
    Peek {
        /// Address (decimal or 0x-prefixed)
        #[arg(value_parser = parse_u32)]
        addr: u32,

        /// Number of bytes
        #[arg(value_parser = parse_u32)]
        length: u32,
    },

    /// Read a null-terminated string
    ReadString {
        /// Address (decimal or 0x-prefixed)
        #[arg(value_parser = parse_u32)]
        addr: u32,

        /// Read 16-bit big-endian units
        #[arg(long)]
        wide: bool,
    },

    /// Write hex bytes to memory
    Poke {
        /// Address (decimal or 0x-prefixed)
        #[arg(value_parser = parse_u32)]
        addr: u32,

        /// Bytes as hex, e.g. 60000000
        data: String,
    },

    /// Download a remote file
    Download {
        /// Remote path
        remote: String,

        /// Local path
        local: String,
    },

    /// Upload a local file
    Upload {
        /// Local path
        local: String,

        /// Remote path
        remote: String,
    },
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,xedbg=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> xedbg::Result<()> {
    let mut builder = Config::builder().port(args.port);
    if args.legacy_status {
        builder = builder.subcode_decoding(xedbg::protocol::SubCodeDecoding::LastDigit);
    }
    let config = builder.build();

    tracing::info!("xedbg CLI v{}", xedbg::VERSION);
    let mut session = Session::connect(&args.host, config)?;

    match args.command {
        Commands::Ping { timeout } => {
            let alive = session.ping(std::time::Duration::from_millis(timeout));
            println!("{}", if alive { "alive" } else { "no response" });
        }
        Commands::Info => {
            let caps = session.capabilities();
            println!("host:      {}", session.host());
            println!("version:   {}", caps.debugger_version);
            println!("freeboot:  {}", caps.freeboot_dialect);
        }
        Commands::Send { command } => {
            let response = session.send_command(&command, false)?.ok_or(XeError::NotConnected)?;
            println!("{}- {}", response.status, response.message);
            match response.body {
                ResponseBody::Lines(lines) => {
                    for line in lines {
                        println!("{}", line);
                    }
                }
                ResponseBody::BinaryPending => {
                    let data = session.read_binary(&mut |_: Progress| {})?;
                    println!("<{} bytes of binary data>", data.len());
                }
                ResponseBody::None => {}
            }
        }
        Commands::Peek { addr, length } => {
            let data = session.memory().read_bytes(addr, length)?;
            for (i, row) in data.chunks(16).enumerate() {
                let offset = addr.wrapping_add((i * 16) as u32);
                println!("{:08X}  {}", offset, hex::encode_upper(row));
            }
        }
        Commands::ReadString { addr, wide } => {
            let encoding = if wide { TextEncoding::Utf16Be } else { TextEncoding::Utf8 };
            println!("{}", session.memory().read_c_string(addr, encoding)?);
        }
        Commands::Poke { addr, data } => {
            let bytes = hex::decode(data.trim())?;
            let response = session.memory().write_bytes(addr, &bytes)?;
            println!("{}- {}", response.status, response.message);
        }
        Commands::Download { remote, local } => {
            let file = File::create(&local)?;
            let mut sink = BufWriter::new(file);
            let copied = session.download_to(&remote, &mut sink, &mut report)?;
            println!("{} bytes -> {}", copied, local);
        }
        Commands::Upload { local, remote } => {
            let data = std::fs::read(&local)?;
            let response = session.upload(&remote, &data, &mut report)?;
            println!("{}- {}", response.status, response.message);
        }
    }

    session.disconnect();
    Ok(())
}

fn report(progress: Progress) {
    if progress.is_complete() {
        tracing::info!("Transferred {} bytes", progress.total);
    } else {
        tracing::debug!("{}/{} bytes", progress.transferred, progress.total);
    }
}

fn parse_u32(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(digits) => u32::from_str_radix(digits, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid number '{}': {}", s, e))
}
