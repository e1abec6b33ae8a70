//! Syscall number tables for riscv64 (generic Linux numbering)
//!
//! Numbers are grouped into the seven capability classes the kernel build
//! understands. The groups are disjoint; `classify` resolves a number with
//! a single hash lookup.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Filesystem and I/O syscalls
pub const FS_IDS: &[i64] = &[
    17, 19, 20, 21, 22, 23, 24, 25, 29, 34, 35, 37, 38, 39, 40, 43, 45, 46, 48, 49, 53, 54, 56,
    57, 59, 61, 62, 63, 64, 65, 66, 67, 68, 71, 72, 73, 78, 79, 80, 81, 82, 83, 88, 276, 285, 291,
];

/// Address space and shared memory syscalls
pub const MEM_IDS: &[i64] = &[194, 195, 196, 197, 214, 215, 216, 222, 226, 227, 233, 283];

/// Socket syscalls
pub const NET_IDS: &[i64] = &[
    198, 199, 200, 201, 202, 203, 204, 205, 206, 207, 208, 209, 210, 211, 212, 242,
];

/// Process, identity and clock syscalls
pub const TASK_IDS: &[i64] = &[
    93, 94, 96, 101, 102, 103, 113, 114, 115, 116, 153, 154, 155, 157, 160, 163, 164, 165, 166,
    167, 169, 172, 173, 174, 175, 176, 177, 178, 179, 220, 221, 260, 261, 278, 435,
];

/// Futex and robust-list syscalls
pub const FUTEX_IDS: &[i64] = &[98, 99, 100];

/// Scheduler policy and affinity syscalls
pub const SCHEDULE_IDS: &[i64] = &[118, 119, 120, 121, 122, 123, 124];

/// Signal delivery and handling syscalls
pub const SIGNAL_IDS: &[i64] = &[129, 130, 131, 132, 133, 134, 135, 136, 137, 138, 139];

/// Capability class a syscall number belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyscallClass {
    Filesystem,
    Memory,
    Network,
    Task,
    Futex,
    Schedule,
    Signal,
}

impl SyscallClass {
    /// All classes in precedence (and tag output) order
    pub const ALL: [SyscallClass; 7] = [
        SyscallClass::Filesystem,
        SyscallClass::Memory,
        SyscallClass::Network,
        SyscallClass::Task,
        SyscallClass::Futex,
        SyscallClass::Schedule,
        SyscallClass::Signal,
    ];

    /// Syscall numbers in this class
    pub fn ids(self) -> &'static [i64] {
        match self {
            SyscallClass::Filesystem => FS_IDS,
            SyscallClass::Memory => MEM_IDS,
            SyscallClass::Network => NET_IDS,
            SyscallClass::Task => TASK_IDS,
            SyscallClass::Futex => FUTEX_IDS,
            SyscallClass::Schedule => SCHEDULE_IDS,
            SyscallClass::Signal => SIGNAL_IDS,
        }
    }

    /// Tag written to the capability file for this class
    pub fn tag(self) -> &'static str {
        match self {
            SyscallClass::Filesystem => "syscall_fs",
            SyscallClass::Memory => "syscall_mem",
            SyscallClass::Network => "syscall_net",
            SyscallClass::Task => "syscall_task",
            SyscallClass::Futex => "futex",
            SyscallClass::Schedule => "schedule",
            SyscallClass::Signal => "signal",
        }
    }

    /// Futex, schedule and signal are sub-groups of the task family
    pub fn implies_task(self) -> bool {
        matches!(
            self,
            SyscallClass::Futex | SyscallClass::Schedule | SyscallClass::Signal
        )
    }
}

static CLASS_BY_ID: LazyLock<HashMap<i64, SyscallClass>> = LazyLock::new(|| {
    let mut table = HashMap::new();
    for class in SyscallClass::ALL {
        for &id in class.ids() {
            // First class in precedence order wins
            table.entry(id).or_insert(class);
        }
    }
    table
});

/// Resolve a syscall number to its capability class, if any
pub fn classify(num: i64) -> Option<SyscallClass> {
    CLASS_BY_ID.get(&num).copied()
}

/// Resolve syscall number to name for riscv64
///
/// Returns "unknown" for numbers outside the table
pub fn syscall_name(num: i64) -> &'static str {
    match num {
        17 => "getcwd",
        19 => "eventfd2",
        20 => "epoll_create1",
        21 => "epoll_ctl",
        22 => "epoll_pwait",
        23 => "dup",
        24 => "dup3",
        25 => "fcntl",
        29 => "ioctl",
        34 => "mkdirat",
        35 => "unlinkat",
        37 => "linkat",
        38 => "renameat",
        39 => "umount2",
        40 => "mount",
        43 => "statfs",
        45 => "truncate",
        46 => "ftruncate",
        48 => "faccessat",
        49 => "chdir",
        53 => "fchmodat",
        54 => "fchownat",
        56 => "openat",
        57 => "close",
        59 => "pipe2",
        61 => "getdents64",
        62 => "lseek",
        63 => "read",
        64 => "write",
        65 => "readv",
        66 => "writev",
        67 => "pread64",
        68 => "pwrite64",
        71 => "sendfile",
        72 => "pselect6",
        73 => "ppoll",
        78 => "readlinkat",
        79 => "newfstatat",
        80 => "fstat",
        81 => "sync",
        82 => "fsync",
        83 => "fdatasync",
        88 => "utimensat",
        93 => "exit",
        94 => "exit_group",
        96 => "set_tid_address",
        98 => "futex",
        99 => "set_robust_list",
        100 => "get_robust_list",
        101 => "nanosleep",
        102 => "getitimer",
        103 => "setitimer",
        113 => "clock_gettime",
        114 => "clock_getres",
        115 => "clock_nanosleep",
        116 => "syslog",
        118 => "sched_setparam",
        119 => "sched_setscheduler",
        120 => "sched_getscheduler",
        121 => "sched_getparam",
        122 => "sched_setaffinity",
        123 => "sched_getaffinity",
        124 => "sched_yield",
        129 => "kill",
        130 => "tkill",
        131 => "tgkill",
        132 => "sigaltstack",
        133 => "rt_sigsuspend",
        134 => "rt_sigaction",
        135 => "rt_sigprocmask",
        136 => "rt_sigpending",
        137 => "rt_sigtimedwait",
        138 => "rt_sigqueueinfo",
        139 => "rt_sigreturn",
        153 => "times",
        154 => "setpgid",
        155 => "getpgid",
        157 => "setsid",
        160 => "uname",
        163 => "getrlimit",
        164 => "setrlimit",
        165 => "getrusage",
        166 => "umask",
        167 => "prctl",
        169 => "gettimeofday",
        172 => "getpid",
        173 => "getppid",
        174 => "getuid",
        175 => "geteuid",
        176 => "getgid",
        177 => "getegid",
        178 => "gettid",
        179 => "sysinfo",
        194 => "shmget",
        195 => "shmctl",
        196 => "shmat",
        197 => "shmdt",
        198 => "socket",
        199 => "socketpair",
        200 => "bind",
        201 => "listen",
        202 => "accept",
        203 => "connect",
        204 => "getsockname",
        205 => "getpeername",
        206 => "sendto",
        207 => "recvfrom",
        208 => "setsockopt",
        209 => "getsockopt",
        210 => "shutdown",
        211 => "sendmsg",
        212 => "recvmsg",
        214 => "brk",
        215 => "munmap",
        216 => "mremap",
        220 => "clone",
        221 => "execve",
        222 => "mmap",
        226 => "mprotect",
        227 => "msync",
        233 => "madvise",
        242 => "accept4",
        260 => "wait4",
        261 => "prlimit64",
        276 => "renameat2",
        278 => "getrandom",
        283 => "membarrier",
        285 => "copy_file_range",
        291 => "statx",
        435 => "clone3",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_common_syscalls() {
        assert_eq!(syscall_name(56), "openat");
        assert_eq!(syscall_name(63), "read");
        assert_eq!(syscall_name(64), "write");
        assert_eq!(syscall_name(98), "futex");
        assert_eq!(syscall_name(222), "mmap");
    }

    #[test]
    fn test_unknown_syscall() {
        assert_eq!(syscall_name(9999), "unknown");
        assert_eq!(syscall_name(-1), "unknown");
    }

    #[test]
    fn test_tables_are_disjoint() {
        let mut seen = HashSet::new();
        for class in SyscallClass::ALL {
            for id in class.ids() {
                assert!(seen.insert(*id), "{} appears in more than one class", id);
            }
        }
    }

    #[test]
    fn test_every_table_entry_has_a_name() {
        for class in SyscallClass::ALL {
            for &id in class.ids() {
                assert_ne!(syscall_name(id), "unknown", "missing name for {}", id);
            }
        }
    }

    #[test]
    fn test_classify_each_class() {
        assert_eq!(classify(63), Some(SyscallClass::Filesystem));
        assert_eq!(classify(222), Some(SyscallClass::Memory));
        assert_eq!(classify(198), Some(SyscallClass::Network));
        assert_eq!(classify(93), Some(SyscallClass::Task));
        assert_eq!(classify(98), Some(SyscallClass::Futex));
        assert_eq!(classify(124), Some(SyscallClass::Schedule));
        assert_eq!(classify(134), Some(SyscallClass::Signal));
    }

    #[test]
    fn test_classify_unlisted() {
        assert_eq!(classify(0), None);
        assert_eq!(classify(-5), None);
        assert_eq!(classify(10_000), None);
    }

    #[test]
    fn test_task_family() {
        assert!(SyscallClass::Futex.implies_task());
        assert!(SyscallClass::Schedule.implies_task());
        assert!(SyscallClass::Signal.implies_task());
        assert!(!SyscallClass::Task.implies_task());
        assert!(!SyscallClass::Filesystem.implies_task());
    }

    #[test]
    fn test_tag_order_matches_precedence() {
        let tags: Vec<_> = SyscallClass::ALL.iter().map(|c| c.tag()).collect();
        assert_eq!(
            tags,
            vec![
                "syscall_fs",
                "syscall_mem",
                "syscall_net",
                "syscall_task",
                "futex",
                "schedule",
                "signal"
            ]
        );
    }
}
