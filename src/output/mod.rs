// Report stream plumbing and process exit codes
//
// Diagnostics (warnings, load failures) go through `tracing`, which the
// binary routes to stderr; this module only handles the report stream
// that metrics are written to, and the codes the process exits with.

use std::io::{self, Write};

/// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FILE_LOAD: i32 = 1;
pub const EXIT_PARSE_FORMAT: i32 = 2;

/// Writer that duplicates everything onto each underlying stream
///
/// Used to tee the report stream to a log file while it still reaches
/// the console.
pub struct TeeWriter {
    streams: Vec<Box<dyn Write>>,
}

impl TeeWriter {
    pub fn new(streams: Vec<Box<dyn Write>>) -> Self {
        Self { streams }
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for s in &mut self.streams {
            s.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        for s in &mut self.streams {
            s.flush()?;
        }
        Ok(())
    }
}
