//! Human-readable dumps of buffer contents.

use std::fmt;
use std::io::{self, Write};

use crate::buffer::SafePtr;
use crate::mode::Tracking;

/// Label used by [`SafePtr::print_all`] callers that have no name to give.
pub const PRINT_ALL_LABEL: &str = "SafePtr::print_all";

/// Label used by [`SafePtr::print`] callers that have no name to give.
pub const PRINT_LABEL: &str = "SafePtr::print";

/// Buffers longer than this are elided by the summary printers.
pub const SUMMARY_LIMIT: usize = 26;

const SUMMARY_HEAD: usize = 13;
const SUMMARY_TAIL: usize = 12;

impl<T: fmt::Display, M: Tracking> SafePtr<T, M> {
    /// Write every element, one `index: value,` line each, under `label`.
    ///
    /// ```text
    /// label: {
    ///     0: 4,
    ///     1: 3
    /// }
    /// ```
    pub fn write_all<W: Write>(&self, out: &mut W, label: &str) -> io::Result<()> {
        self.check();
        self.write_all_unchecked(out, label)
    }

    /// Like [`write_all`](Self::write_all), but buffers longer than
    /// [`SUMMARY_LIMIT`] show only their first 13 and last 12 elements
    /// around a `...` line.
    pub fn write_summary<W: Write>(&self, out: &mut W, label: &str) -> io::Result<()> {
        self.check();
        let len = self.storage.len();
        if len <= SUMMARY_LIMIT {
            return self.write_all_unchecked(out, label);
        }
        writeln!(out, "{label}: {{")?;
        for (i, value) in self.storage[..SUMMARY_HEAD].iter().enumerate() {
            write_entry(out, i, value, false)?;
        }
        writeln!(out, "    ...")?;
        let tail_start = len - SUMMARY_TAIL;
        for (i, value) in self.storage[tail_start..].iter().enumerate() {
            let index = tail_start + i;
            write_entry(out, index, value, index + 1 == len)?;
        }
        writeln!(out, "}}")
    }

    /// [`write_all`](Self::write_all) to stdout.
    pub fn print_all(&self, label: &str) -> io::Result<()> {
        self.write_all(&mut io::stdout().lock(), label)
    }

    /// [`write_summary`](Self::write_summary) to stdout.
    pub fn print(&self, label: &str) -> io::Result<()> {
        self.write_summary(&mut io::stdout().lock(), label)
    }

    fn write_all_unchecked<W: Write>(&self, out: &mut W, label: &str) -> io::Result<()> {
        writeln!(out, "{label}: {{")?;
        let len = self.storage.len();
        for (i, value) in self.storage.iter().enumerate() {
            write_entry(out, i, value, i + 1 == len)?;
        }
        writeln!(out, "}}")
    }
}

fn write_entry<W: Write, T: fmt::Display>(
    out: &mut W,
    index: usize,
    value: &T,
    last: bool,
) -> io::Result<()> {
    let sep = if last { "" } else { "," };
    writeln!(out, "    {index}: {value}{sep}")
}

impl<T: fmt::Debug, M: Tracking> fmt::Debug for SafePtr<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
