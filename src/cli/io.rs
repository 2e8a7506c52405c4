//! Line-oriented JSON I/O for `exec`
//!
//! - Input: one request envelope per line on stdin
//! - Output: one response envelope per line on stdout
//! - Blank lines are skipped

use std::io::{self, BufRead, Write};

use super::errors::{CliError, CliResult};

/// Iterate over non-blank request lines from `reader`
pub fn read_requests<R: BufRead>(reader: R) -> impl Iterator<Item = CliResult<String>> {
    reader
        .lines()
        .filter(|line| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
        .map(|line| line.map_err(CliError::from))
}

/// Write one JSON document followed by a newline and flush
pub fn write_json<W: Write>(writer: &mut W, json: &str) -> CliResult<()> {
    writeln!(writer, "{}", json)?;
    writer.flush()?;
    Ok(())
}

/// Process every request line from stdin with `handle`, writing each
/// response to stdout.
pub fn run_lines<F>(mut handle: F) -> CliResult<()>
where
    F: FnMut(&str) -> String,
{
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in read_requests(stdin.lock()) {
        let response = handle(&line?);
        write_json(&mut stdout, &response)?;
    }
    Ok(())
}
