//! Verify that secrets are really wiped, not just logically released.
//!
//! `SecretText` lives inline, so the drop check runs the destructor in place
//! inside a `MaybeUninit` slot and inspects the same bytes afterwards. The
//! heap `SecretBuffer` check scans for a sentinel pattern after free; that
//! read is best-effort and only meaningful under the debug profile.

use std::mem::{size_of, MaybeUninit};

use bulwark_secrets::{Password, SecretBuffer, SecretText, WipeGuard};

/// Sentinel pattern used to verify zeroization.
const SENTINEL: &str = "\u{00DE}\u{00AD}BEEF";

fn contains_sentinel(bytes: &[u8]) -> bool {
    let needle = SENTINEL.as_bytes();
    bytes.windows(needle.len()).any(|w| w == needle)
}

#[test]
fn secret_text_is_zeroed_by_drop_in_place() {
    let mut slot = MaybeUninit::<SecretText<64>>::uninit();
    let ptr = slot.as_mut_ptr();

    // SAFETY: `ptr` points to writable storage owned by `slot`. After
    // `drop_in_place` the storage is still owned by `slot`; the destructor
    // wrote every byte with zeroize's volatile writes, so reading the raw
    // bytes back is reading initialized memory.
    let bytes_after_drop: Vec<u8> = unsafe {
        ptr.write(SecretText::from_text(&SENTINEL.repeat(4)));
        assert!(contains_sentinel((*ptr).as_bytes()));
        std::ptr::drop_in_place(ptr);
        std::slice::from_raw_parts(ptr.cast::<u8>(), size_of::<SecretText<64>>()).to_vec()
    };

    assert!(
        bytes_after_drop.iter().all(|&b| b == 0),
        "SecretText storage not zeroed after drop"
    );
}

#[test]
fn wipe_guard_zeroes_password_on_panic_unwind() {
    let mut password = Password::from_text(SENTINEL);
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _guard = WipeGuard::new(&mut password);
        panic!("collaborator failed mid-flow");
    }));
    assert!(result.is_err());
    assert!(password.is_zeroed());
}

#[test]
fn secret_buffer_sentinel_not_found_after_drop() {
    let sentinel_data = SENTINEL.repeat(128).into_bytes();

    let data_ptr: *const u8;
    let data_len: usize;

    {
        let buf = SecretBuffer::new(&sentinel_data);
        let exposed = buf.expose();
        data_ptr = exposed.as_ptr();
        data_len = exposed.len();
        assert!(contains_sentinel(exposed));
    }

    // SAFETY: Reads freed memory on purpose. With the standard allocator
    // the block is still mapped right after free; allocator metadata may
    // overwrite a few bytes, which is why we scan for the pattern rather
    // than asserting all zeros.
    let sentinel_found = unsafe {
        let slice = std::slice::from_raw_parts(data_ptr, data_len);
        contains_sentinel(slice)
    };

    assert!(
        !sentinel_found,
        "sentinel pattern found in memory after SecretBuffer drop"
    );
}
