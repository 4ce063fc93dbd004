//! Render a TMS9918 dump (16K VRAM + 8 registers) to a PNG file.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;
use ti_tms9918::{Tms9918, VdpConfig};
use tms9918_dump::{Dump, MAX_SCALE, write_png};

#[derive(Parser, Debug)]
#[command(name = "tms9918-dump", version, about = "Render a TMS9918 VRAM/register dump to PNG")]
struct Args {
    /// Dump file: 16384 bytes of VRAM followed by 8 register bytes
    dump: PathBuf,

    /// Output PNG [default: dump path with a .png extension]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Integer upscale factor
    #[arg(short, long, default_value_t = 1,
          value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SCALE)))]
    scale: u32,

    /// Draw every sprite on a line instead of stopping at four
    #[arg(long)]
    no_sprite_limit: bool,

    /// Print the status register after rendering
    #[arg(long)]
    status: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let bytes =
        fs::read(&args.dump).with_context(|| format!("reading {}", args.dump.display()))?;
    let dump = Dump::from_bytes(&bytes)
        .with_context(|| format!("parsing {}", args.dump.display()))?;

    let mut vdp = Tms9918::with_config(VdpConfig {
        sprite_limit: !args.no_sprite_limit,
        ..VdpConfig::default()
    });
    dump.apply(&mut vdp)?;
    info!(
        "loaded {}: {:?}, display {}",
        args.dump.display(),
        vdp.mode(),
        if vdp.display_enabled() { "on" } else { "blanked" }
    );

    let frame = vdp.run_frame();

    let output = args
        .output
        .unwrap_or_else(|| args.dump.with_extension("png"));
    write_png(&frame, args.scale, &output)
        .with_context(|| format!("writing {}", output.display()))?;
    info!("wrote {} (x{})", output.display(), args.scale);

    if args.status {
        println!("status: ${:02X}", vdp.read_status());
    }
    Ok(())
}
