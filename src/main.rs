mod category;
mod constraint;
mod entropy;
mod generator;
mod presets;
mod range;
mod ui;

use anyhow::{Result, bail};
use clap::Parser;
use presets::Registry;

const DEFAULT_BITS: u32 = 88;
const DEFAULT_GENERATOR: &str = "qwerty";
const DEFAULT_ITERATIONS: u32 = 1000;

#[derive(Parser)]
#[command(
    name = "pwforge",
    version,
    about = "Deterministic password encoder: entropy bytes to constrained, typable passwords"
)]
struct Cli {
    /// Bits of entropy the password must carry
    #[arg(short, long, default_value_t = DEFAULT_BITS, value_parser = clap::value_parser!(u32).range(1..))]
    bits: u32,

    /// Preset name (case-insensitive); see --list
    #[arg(short, long, default_value = DEFAULT_GENERATOR)]
    generator: String,

    /// Derive entropy from this password instead of the random source
    #[arg(short, long)]
    password: Option<String>,

    /// Salt for password derivation, typically the site URL
    #[arg(short, long)]
    site: Option<String>,

    /// PBKDF2 iteration count for password derivation
    #[arg(short, long, default_value_t = DEFAULT_ITERATIONS, value_parser = clap::value_parser!(u32).range(1..))]
    iterations: u32,

    /// List available presets with a sample encoding each
    #[arg(short, long)]
    list: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let registry = Registry::with_defaults()?;

    if cli.list {
        return ui::list_presets(&registry, DEFAULT_BITS);
    }

    let generator = registry.find(&cli.generator)?;

    let buf = match (&cli.password, &cli.site) {
        (Some(password), Some(site)) => {
            entropy::derive_bytes(cli.bits, password, site, cli.iterations)?
        }
        (Some(_), None) => bail!("Missing required argument: site"),
        (None, Some(_)) => bail!("Missing required argument: password"),
        (None, None) => entropy::random_bytes(cli.bits),
    };

    let password = generator.generate(&buf);
    ui::print_password(&password);

    Ok(())
}
