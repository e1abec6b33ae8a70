use anyhow::{Context, Result};
use clap::Parser;
use syscap::{cli::TaggerCli, logging::init_tracing, tagger};

fn main() -> Result<()> {
    let args = TaggerCli::parse();

    init_tracing(args.debug);

    let tags = tagger::tag_file(&args.input, &args.output, args.extra_marker.as_deref())
        .with_context(|| format!("Failed to tag {}", args.input.display()))?;

    tracing::info!(
        "{} -> {}: {}",
        args.input.display(),
        args.output.display(),
        if tags.is_empty() {
            "(no tags)".to_string()
        } else {
            tags.join(" ")
        }
    );

    Ok(())
}
