use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use simd_support::{HostSource, Platform, Prober};

/// Reports whether this CPU supports AVX2 and AVX512
#[derive(Parser, Debug)]
#[command(name = "simd-support", version, about)]
struct Args {
    /// Read processor info from this file instead of /proc/cpuinfo
    #[arg(long, value_name = "PATH")]
    cpuinfo: Option<PathBuf>,

    /// Print the results as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .context("failed to install logger")
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.verbose)?;

    let source = args
        .cpuinfo
        .map_or_else(HostSource::default, HostSource::with_cpuinfo_path);
    let prober = Prober::new(Platform::host(), source);
    log::info!(
        "probing {:?} using {}",
        prober.platform(),
        prober.source().cpuinfo_path().display()
    );
    let caps = prober.capabilities();

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&caps).context("failed to serialize results")?
        );
    } else {
        println!("avx2: {}", caps.avx2);
        println!("avx512: {}", caps.avx512);
    }

    Ok(())
}
