pub mod apply;
pub mod check;
pub mod formats;
pub mod init;
pub mod scan;

use anyhow::Result;
use std::io::{self, Write};
use std::path::Path;

use crate::tidy::scanner::scan_library;
use crate::tidy::{scan_library_with_progress, NamingConfig, ScanResult};

/// Scan a library, showing a single updating progress line unless `quiet`
fn scan_with_status(library: &Path, naming: &NamingConfig, quiet: bool) -> Result<ScanResult> {
    if quiet {
        return Ok(scan_library(library, naming)?);
    }

    print!("Scanning {:?}... ", library);
    io::stdout().flush().ok();
    let mut count = 0;
    let result = scan_library_with_progress(library, naming, |dir| {
        count += 1;
        print!(
            "\r\x1b[KScanning {:?}... {} ({})",
            library,
            count,
            dir.file_name().unwrap_or_default().to_string_lossy()
        );
        io::stdout().flush().ok();
    });
    // Clear the progress line
    print!("\r\x1b[K");
    io::stdout().flush().ok();

    Ok(result?)
}
