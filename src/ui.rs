use crate::entropy;
use crate::presets::Registry;
use anyhow::Result;
use console::{Style, Term};
use zeroize::Zeroizing;

/// Prints every registered preset with a sample encoding of one shared
/// random buffer, so the shapes are comparable at a glance.
pub fn list_presets(registry: &Registry, sample_bits: u32) -> Result<()> {
    let term = Term::stdout();
    let name_style = Style::new().bold();
    let width = registry
        .iter()
        .map(|g| g.name().chars().count())
        .max()
        .unwrap_or(4);

    let buf = entropy::random_bytes(sample_bits);
    for generator in registry.iter() {
        let sample = generator.encode(&buf);
        // Pad before styling; escape codes would throw the alignment off.
        let padded = format!("{:>width$}", generator.name(), width = width);
        term.write_line(&format!("  {}:  {}", name_style.apply_to(padded), sample))?;
    }
    Ok(())
}

/// Prints the generated password on its own line. Kept boring on
/// purpose: stdout may be piped into another tool.
pub fn print_password(password: &Zeroizing<String>) {
    println!("{}", password.as_str());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_presets_runs_against_defaults() {
        let registry = Registry::with_defaults().unwrap();
        list_presets(&registry, 88).unwrap();
    }
}
