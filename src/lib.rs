//! syscap - Syscall capability tagging for kernel image builds
//!
//! Scans riscv64 listings for `li a7` / `ecall` pairs and reports which
//! syscall capability classes a program needs, so the kernel build can
//! enable only the matching feature set. Also ships the small helpers the
//! same build uses: a benchmark deviation summariser and a size parser.

pub mod cli;
pub mod deviation;
pub mod error;
pub mod logging;
pub mod size;
pub mod syscalls;
pub mod tagger;
