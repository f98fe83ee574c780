//! List command - show the remote directory without downloading.

use shareport::FileEntry;

use super::common::ConnectionArgs;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the list command.
pub fn run(mut runner: CliRunner, connection: ConnectionArgs) -> Result<(), CliError> {
    connection.apply(runner.config_mut())?;
    runner.log_startup("list");

    let session = runner.session()?;
    let remote_path = runner.config().transfer.remote_path.clone();

    let token = session.authenticate()?;
    let files = session.list_files(&token, &remote_path)?;

    if files.is_empty() {
        println!("No files in /{}", remote_path.trim_matches('/'));
        return Ok(());
    }

    let width = files.iter().map(|f| f.name.len()).max().unwrap_or(0);
    for file in &files {
        println!("  {:<width$}  {:>12}", file.name, file.size, width = width);
    }
    println!();
    println!("{} files, {} bytes", files.len(), total_size(&files));

    Ok(())
}

/// Sum of the listed sizes. Sizes come from the device, so the sum saturates.
fn total_size(files: &[FileEntry]) -> u64 {
    files
        .iter()
        .fold(0u64, |total, file| total.saturating_add(file.size))
}
