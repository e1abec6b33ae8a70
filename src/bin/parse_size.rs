use anyhow::Result;
use clap::Parser;
use syscap::{cli::ParseSizeCli, logging::init_tracing, size::parse_size};

fn main() -> Result<()> {
    let args = ParseSizeCli::parse();

    init_tracing(args.debug);

    let bytes = parse_size(&args.size)?;
    tracing::debug!("{} -> {} bytes", args.size, bytes);
    println!("{}", bytes);

    Ok(())
}
