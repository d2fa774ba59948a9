use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::config::Config;
use crate::tidy::NamingConfig;

/// Run the init command - write a starter config file
pub fn run(config_override: Option<&Path>, library: Option<&Path>, force: bool) -> Result<()> {
    let config_path = match config_override {
        Some(path) => path.to_path_buf(),
        None => Config::config_path()?,
    };

    // Check if config already exists
    if config_path.exists() && !force {
        eprintln!(
            "{}: Config already exists at {}",
            "Error".red().bold(),
            config_path.display()
        );
        eprintln!();
        eprintln!("Use {} to overwrite.", "--force".cyan());
        bail!("Config file already exists");
    }

    if let Some(library) = library {
        if !library.is_dir() {
            println!(
                "{}: Library {} does not exist yet.",
                "Note".yellow(),
                library.display()
            );
        }
    }

    // Create config directory
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    std::fs::write(&config_path, render_config(library))
        .with_context(|| format!("Failed to write {:?}", config_path))?;

    println!(
        "{} Config written to {}",
        "✓".green(),
        config_path.display()
    );
    println!();
    println!("You can now use:");
    println!(
        "  {} - preview the changes needed",
        "tidylibrary scan".cyan()
    );
    println!(
        "  {} - apply them",
        "tidylibrary apply --no-dry-run".cyan()
    );

    Ok(())
}

fn render_config(library: Option<&Path>) -> String {
    let naming = NamingConfig::default();
    let library_line = match library {
        Some(path) => format!("path = {:?}", path.display().to_string()),
        None => "# path = \"/audiobooks\"".to_string(),
    };

    format!(
        r#"# tidylibrary configuration
# See 'tidylibrary formats' for available values

[naming]
folder_format = "{}"
file_format = "{}"

[library]
{}

[log]
enabled = true
file = "tidy_library_log.txt"
"#,
        naming.folder_format, naming.file_format, library_line
    )
}
