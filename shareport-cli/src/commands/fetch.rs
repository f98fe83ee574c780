//! Fetch command - download every file in the remote directory.

use indicatif::{ProgressBar, ProgressStyle};
use shareport::session::FileProgressCallback;
use shareport::{DownloadOutcome, TransferReport};

use super::common::{ConnectionArgs, SaveArgs};
use crate::error::CliError;
use crate::progress;
use crate::runner::CliRunner;

/// Arguments for the fetch command.
pub struct FetchArgs {
    pub connection: ConnectionArgs,
    pub save: SaveArgs,
}

/// Run the fetch command.
pub fn run(mut runner: CliRunner, args: FetchArgs) -> Result<(), CliError> {
    args.connection.apply(runner.config_mut())?;
    args.save.apply(runner.config_mut());
    runner.log_startup("fetch");

    let session = runner.session()?;
    let job = runner.config().transfer_job();

    println!(
        "Fetching {}/{} into {}",
        session.endpoints().base(),
        job.remote_path.trim_matches('/'),
        job.save_dir.display()
    );

    let bar = ProgressBar::new(0);
    bar.set_style(progress_style());
    let report = {
        let _registered = progress::register(&bar);
        session.run(&job, Some(progress_callback(bar.clone())))
    };
    bar.finish_and_clear();
    let report = report?;

    print_report(&report);
    Ok(())
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} files {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

fn progress_callback(bar: ProgressBar) -> FileProgressCallback {
    Box::new(move |done, total, bytes| {
        bar.set_length(total as u64);
        bar.set_position(done as u64);
        bar.set_message(format!("({} bytes)", bytes));
    })
}

fn print_report(report: &TransferReport) {
    if report.listed == 0 {
        println!("No files for transfer");
    }

    for download in &report.downloads {
        if let DownloadOutcome::SizeMismatch {
            path,
            expected,
            actual,
        } = download
        {
            println!(
                "  warning: {}: expected {} bytes, but got {} bytes",
                path.display(),
                expected,
                actual
            );
        }
    }

    for failed in &report.failed {
        println!("  failed: {}: {}", failed.name, failed.reason);
    }

    println!("All done: {}", report);
}
