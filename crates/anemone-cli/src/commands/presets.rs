//! Preset listing command.

use crate::preset::{FACTORY_PRESET_NAMES, factory_presets, load_preset};
use clap::Args;

#[derive(Args)]
pub struct PresetsArgs {
    /// Preset name or path to print as TOML (lists factory presets if omitted)
    name: Option<String>,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.name {
        Some(name) => {
            let preset = load_preset(&name)?;
            print!("{}", preset.to_toml()?);
        }
        None => {
            println!("Factory Presets:");
            println!("================");
            for (key, preset) in factory_presets() {
                let desc = preset.description.as_deref().unwrap_or("");
                println!("  {:12} - {}", key, desc);
            }
            println!();
            println!(
                "Show one with: anemone presets <{}>",
                FACTORY_PRESET_NAMES.join("|")
            );
        }
    }
    Ok(())
}
