//! Syscall capability tagger
//!
//! Scans a textual riscv64 listing for `li a7,<n>` / `ecall` pairs and
//! reports which capability classes the program's syscalls touch.
//!
//! The scan is a single forward pass carrying one value: the last number
//! loaded into `a7`. Every `ecall` is attributed to that value, even when the
//! load sits on an unrelated control-flow path or never happened (the
//! register starts at 0). Build pipelines rely on this coarse attribution,
//! so it is kept as is.

use crate::error::{Result, TagError};
use crate::syscalls::{classify, syscall_name, SyscallClass};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::num::IntErrorKind;
use std::path::Path;
use tracing::{debug, trace, warn};

/// Load-immediate into the syscall-number register
pub const SYSCALL_ID_LOAD: &str = "li a7";

/// Trap instruction
pub const TRAP: &str = "ecall";

/// Extra marker that appends the `img` tag
pub const IMG_MARKER: &str = "img";

/// Classification of a single listing line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `li a7,<n>` with exactly one operand after the register
    LoadSyscallId(i64),
    /// `ecall`
    Trap,
    /// Anything else, including `li a7` with the wrong operand count
    Other,
}

/// Collapse whitespace runs (tabs included) to single spaces and trim
fn normalize(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classify one line of the listing
///
/// Mnemonics are matched as a suffix of the first comma-separated segment,
/// so addresses, encodings or other noise before the instruction are ignored.
/// `line_no` is only used for error reporting.
pub fn parse_line(line: &str, line_no: usize) -> Result<LineKind> {
    let normalized = normalize(line);
    let mut segments = normalized.split(',');
    let head = segments.next().unwrap_or_default();

    if head.ends_with(SYSCALL_ID_LOAD) {
        let operands: Vec<&str> = segments.collect();
        let [operand] = operands.as_slice() else {
            return Ok(LineKind::Other);
        };
        let operand = operand.trim();
        let value = match operand.parse::<i64>() {
            Ok(value) => value,
            // Out-of-range integers are still integers; they match no class
            Err(err) if *err.kind() == IntErrorKind::PosOverflow => i64::MAX,
            Err(err) if *err.kind() == IntErrorKind::NegOverflow => i64::MIN,
            Err(source) => {
                return Err(TagError::MalformedOperand {
                    line: line_no,
                    operand: operand.to_string(),
                    source,
                })
            }
        };
        return Ok(LineKind::LoadSyscallId(value));
    }

    if head.ends_with(TRAP) {
        return Ok(LineKind::Trap);
    }

    Ok(LineKind::Other)
}

/// Capability flags accumulated over a scan
///
/// Flags only ever go from false to true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub filesystem: bool,
    pub memory: bool,
    pub network: bool,
    pub task: bool,
    pub futex: bool,
    pub schedule: bool,
    pub signal: bool,
}

impl Capabilities {
    /// Record a hit on `class`; task sub-groups also set the task flag
    pub fn mark(&mut self, class: SyscallClass) {
        match class {
            SyscallClass::Filesystem => self.filesystem = true,
            SyscallClass::Memory => self.memory = true,
            SyscallClass::Network => self.network = true,
            SyscallClass::Task => self.task = true,
            SyscallClass::Futex => self.futex = true,
            SyscallClass::Schedule => self.schedule = true,
            SyscallClass::Signal => self.signal = true,
        }
        if class.implies_task() {
            self.task = true;
        }
    }

    pub fn contains(&self, class: SyscallClass) -> bool {
        match class {
            SyscallClass::Filesystem => self.filesystem,
            SyscallClass::Memory => self.memory,
            SyscallClass::Network => self.network,
            SyscallClass::Task => self.task,
            SyscallClass::Futex => self.futex,
            SyscallClass::Schedule => self.schedule,
            SyscallClass::Signal => self.signal,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Tags for the set flags, in fixed output order
    pub fn tags(&self) -> Vec<&'static str> {
        SyscallClass::ALL
            .iter()
            .filter(|class| self.contains(**class))
            .map(|class| class.tag())
            .collect()
    }
}

/// Final state of a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub capabilities: Capabilities,
    /// Lines consumed
    pub lines: usize,
    /// `ecall` lines seen
    pub traps: usize,
}

/// Forward fold over listing lines
#[derive(Debug, Default)]
pub struct Scanner {
    syscall_id: i64,
    loaded_at: Option<usize>,
    capabilities: Capabilities,
    lines: usize,
    traps: usize,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the next line of the listing
    pub fn feed(&mut self, line: &str) -> Result<()> {
        self.lines += 1;
        match parse_line(line, self.lines)? {
            LineKind::LoadSyscallId(id) => {
                trace!(line = self.lines, id, "a7 loaded");
                self.syscall_id = id;
                self.loaded_at = Some(self.lines);
            }
            LineKind::Trap => self.trap(),
            LineKind::Other => {}
        }
        Ok(())
    }

    fn trap(&mut self) {
        self.traps += 1;
        if self.loaded_at.is_none() {
            warn!(
                line = self.lines,
                "ecall before any a7 load, attributing initial value {}", self.syscall_id
            );
        }

        match classify(self.syscall_id) {
            Some(class) => {
                debug!(
                    line = self.lines,
                    loaded_at = ?self.loaded_at,
                    "ecall -> {} ({}) => {}",
                    self.syscall_id,
                    syscall_name(self.syscall_id),
                    class.tag()
                );
                self.capabilities.mark(class);
            }
            None => {
                trace!(
                    line = self.lines,
                    "ecall -> {} ({}) matches no class",
                    self.syscall_id,
                    syscall_name(self.syscall_id)
                );
            }
        }
    }

    pub fn finish(self) -> ScanReport {
        debug!(
            lines = self.lines,
            traps = self.traps,
            tags = ?self.capabilities.tags(),
            "scan finished"
        );
        ScanReport {
            capabilities: self.capabilities,
            lines: self.lines,
            traps: self.traps,
        }
    }
}

/// Scan in-memory lines
pub fn scan_lines<I, S>(lines: I) -> Result<ScanReport>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut scanner = Scanner::new();
    for line in lines {
        scanner.feed(line.as_ref())?;
    }
    Ok(scanner.finish())
}

/// Stream a listing line by line
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected; they
/// can only appear in the noise before a mnemonic.
pub fn scan<R: BufRead>(mut reader: R) -> Result<ScanReport> {
    let mut scanner = Scanner::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        scanner.feed(&String::from_utf8_lossy(&buf))?;
    }
    Ok(scanner.finish())
}

/// Tags for a finished scan plus the optional extra marker
pub fn render_tags(capabilities: &Capabilities, extra_marker: Option<&str>) -> Vec<&'static str> {
    let mut tags = capabilities.tags();
    if extra_marker == Some(IMG_MARKER) {
        tags.push(IMG_MARKER);
    }
    tags
}

/// `tag(input_lines, extra_tag)` over in-memory lines
pub fn tag<I, S>(lines: I, extra_marker: Option<&str>) -> Result<Vec<&'static str>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let report = scan_lines(lines)?;
    Ok(render_tags(&report.capabilities, extra_marker))
}

/// Write one tag per line, replacing any existing file
pub fn write_tags(path: &Path, tags: &[&str]) -> Result<()> {
    let write = || -> std::io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        for tag in tags {
            writeln!(out, "{}", tag)?;
        }
        out.flush()
    };
    write().map_err(|source| TagError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Tag `input` and write the result to `output`
///
/// The whole listing is scanned before `output` is opened, so a malformed
/// operand leaves an existing tag file untouched.
pub fn tag_file(
    input: &Path,
    output: &Path,
    extra_marker: Option<&str>,
) -> Result<Vec<&'static str>> {
    let file = File::open(input).map_err(|source| TagError::InputNotFound {
        path: input.to_path_buf(),
        source,
    })?;

    let report = scan(BufReader::new(file)).map_err(|err| match err {
        TagError::Io(source) => TagError::Read {
            path: input.to_path_buf(),
            source,
        },
        other => other,
    })?;

    let tags = render_tags(&report.capabilities, extra_marker);
    write_tags(output, &tags)?;
    debug!(output = %output.display(), count = tags.len(), "tag file written");
    Ok(tags)
}
