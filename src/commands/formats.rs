use anyhow::Result;

use crate::tidy::{FILE_FORMATS, FOLDER_FORMATS};

/// Run the formats command - list recognized naming options
pub fn run() -> Result<()> {
    println!("Folder formats (--folder-format, [naming] folder_format):");
    for (name, description) in FOLDER_FORMATS {
        println!("  {:<20} - {}", name, description);
    }

    println!();
    println!("File formats (--file-format, [naming] file_format):");
    for (name, description) in FILE_FORMATS {
        println!("  {:<20} - {}", name, description);
    }

    println!();
    println!("Series fields like \"Mistborn #3.5\" give book number 03.5.");

    Ok(())
}
