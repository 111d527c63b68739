use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use power_vector::capability::{self, ALTIVEC_AVAILABLE, POWER7_AVAILABLE, POWER8_AVAILABLE, Tier};
use power_vector::simd_abstraction::{ByteOrder, NativeEndian, VectorUnit};
use power_vector::selftest;

#[derive(Parser)]
#[command(name = "power-vector")]
#[command(about = "Endian-normalized AltiVec/VSX vector layer with AES and SHA-2 round primitives", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the configured tier, backend, byte order and capability flags
    Info,

    /// Run the known-answer suite
    Selftest {
        /// Only run the build's default engine (skip the emulated tiers and byte orders)
        #[arg(long)]
        default_only: bool,
    },
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None) // Don't show timestamps
        .format_target(false) // Don't show module names
        .init();
}

fn print_info() {
    let tier = Tier::active();
    println!(
        "tier:        {}",
        tier.map(|t| t.description()).unwrap_or("none (no tier feature enabled)")
    );
    println!(
        "backend:     {}",
        <power_vector::simd_abstraction::DefaultUnit as VectorUnit>::NAME
    );
    println!("byte order:  {}", <NativeEndian as ByteOrder>::NAME);
    println!("altivec:     {}", ALTIVEC_AVAILABLE);
    println!("power7:      {}", POWER7_AVAILABLE);
    println!("power8:      {}", POWER8_AVAILABLE);
    capability::log_capabilities();
}

fn run_selftest(default_only: bool) -> Result<()> {
    if Tier::active().is_none() {
        bail!("no vector tier is enabled in this build");
    }

    let mut reports = Vec::new();
    if !default_only {
        reports.extend(selftest::run_emulated().context("emulated engine self test failed")?);
    }
    reports.push(selftest::run_default().context("default engine self test failed")?);

    let total: usize = reports.iter().map(|r| r.checks).sum();
    for report in &reports {
        println!("ok  {:<60} {:>3} checks", report.engine, report.checks);
    }
    println!("{} engines, {} checks passed", reports.len(), total);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info => {
            print_info();
            Ok(())
        }
        Commands::Selftest { default_only } => run_selftest(default_only),
    }
}
