//! `mlock` status and core dump limits. Unix only.

use bulwark_secrets::{disable_core_dumps, SecretBuffer};

#[cfg(unix)]
#[test]
fn secret_buffer_reports_mlock_status() {
    let buf = SecretBuffer::new(b"mlock test data");
    // Containers often run with a tiny RLIMIT_MEMLOCK; either answer is valid.
    eprintln!("mlock status: {}", buf.is_mlocked());
}

#[cfg(unix)]
#[test]
fn disable_core_dumps_sets_rlimit_zero() {
    disable_core_dumps().expect("disable_core_dumps should succeed");

    let mut limit = libc::rlimit {
        rlim_cur: 1,
        rlim_max: 1,
    };
    let ret = unsafe { libc::getrlimit(libc::RLIMIT_CORE, &raw mut limit) };
    assert_eq!(ret, 0, "getrlimit failed");
    assert_eq!(limit.rlim_cur, 0, "RLIMIT_CORE soft limit should be 0");
    assert_eq!(limit.rlim_max, 0, "RLIMIT_CORE hard limit should be 0");
}
