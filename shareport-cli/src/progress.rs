//! Console log output that stays clear of the progress bar.
//!
//! Log lines and the `fetch` progress bar both go to stderr. While a bar is
//! registered here, each log line is written with the bar suspended, so the
//! bar is cleared, the line printed, and the bar redrawn below it.

use std::io::{self, Write};
use std::sync::Mutex;

use indicatif::ProgressBar;
use tracing_subscriber::fmt::MakeWriter;

static ACTIVE_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// `MakeWriter` for the console log layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleWriter;

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = EventWriter<io::Stderr>;

    fn make_writer(&'a self) -> Self::Writer {
        EventWriter::new(io::stderr())
    }
}

/// Collects one formatted event and writes it on drop.
pub struct EventWriter<W: Write> {
    sink: W,
    buf: Vec<u8>,
}

impl<W: Write> EventWriter<W> {
    fn new(sink: W) -> Self {
        Self {
            sink,
            buf: Vec::new(),
        }
    }
}

impl<W: Write> Write for EventWriter<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<W: Write> Drop for EventWriter<W> {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let (sink, buf) = (&mut self.sink, &self.buf);
        // Nowhere left to report a failed log write
        match active_bar() {
            Some(bar) => bar.suspend(|| {
                let _ = sink.write_all(buf);
            }),
            None => {
                let _ = sink.write_all(buf);
            }
        }
    }
}

fn active_bar() -> Option<ProgressBar> {
    ACTIVE_BAR.lock().ok().and_then(|bar| bar.clone())
}

/// Unregisters the bar when dropped.
#[must_use = "the bar is unregistered when the guard is dropped"]
pub struct ActiveBarGuard(());

impl Drop for ActiveBarGuard {
    fn drop(&mut self) {
        if let Ok(mut bar) = ACTIVE_BAR.lock() {
            *bar = None;
        }
    }
}

/// Route console log lines around `bar` until the guard is dropped.
pub fn register(bar: &ProgressBar) -> ActiveBarGuard {
    if let Ok(mut active) = ACTIVE_BAR.lock() {
        *active = Some(bar.clone());
    }
    ActiveBarGuard(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_is_written_once_on_drop() {
        let mut out = Vec::new();
        {
            let mut writer = EventWriter::new(&mut out);
            writer.write_all(b"2026-10-19 INFO ").unwrap();
            writer.write_all(b"Downloading file\n").unwrap();
        }
        assert_eq!(out, b"2026-10-19 INFO Downloading file\n");
    }

    #[test]
    fn test_register_and_release() {
        let bar = ProgressBar::hidden();
        let guard = register(&bar);
        assert!(active_bar().is_some());

        // With a bar registered the line still reaches the sink
        let mut out = Vec::new();
        drop({
            let mut writer = EventWriter::new(&mut out);
            writer.write_all(b"line\n").unwrap();
            writer
        });
        assert_eq!(out, b"line\n");

        drop(guard);
        assert!(active_bar().is_none());
    }
}
