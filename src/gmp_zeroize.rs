//! Erasure of GMP buffers.
//!
//! Shares, reconstructed seeds and Lagrange intermediates are `BigNumber`s
//! backed by GMP. GMP allocates, grows and copies limb buffers on its own, out
//! of sight of the Rust code, so zeroizing a `BigNumber` only wipes its final
//! buffer. GMP lets the application replace its memory functions; we install
//! realloc and free wrappers that wipe every buffer before handing it back.

use gmp_mpfr_sys::gmp::{
    self, allocate_function, free_function, reallocate_function,
};
use std::{
    ffi::c_void,
    slice,
    sync::{Once, OnceLock},
};
use zeroize::Zeroize;

static INSTALL: Once = Once::new();

/// GMP's own allocator, captured before the wrappers are installed.
static GMP_MEMORY: OnceLock<GmpMemory> = OnceLock::new();

#[derive(Clone, Copy)]
struct GmpMemory {
    alloc: allocate_function,
    free: free_function,
}

/// Enable zeroization of GMP memory allocations.
///
/// This should be called on startup, before any share is parsed. Calling it
/// again has no effect.
pub fn enable_zeroize() {
    INSTALL.call_once(|| {
        let mut alloc: allocate_function = None;
        let mut realloc: reallocate_function = None;
        let mut free: free_function = None;

        // SAFETY: Calling a C API documented here: https://gmplib.org/manual/Custom-Allocation
        unsafe { gmp::get_memory_functions(&mut alloc, &mut realloc, &mut free) };
        assert!(
            alloc.is_some() && realloc.is_some() && free.is_some(),
            "GMP should return its memory functions."
        );

        if GMP_MEMORY.set(GmpMemory { alloc, free }).is_ok() {
            // SAFETY: The wrappers only rely on GMP_MEMORY, which is set above.
            // Allocation stays with GMP.
            unsafe {
                gmp::set_memory_functions(None, Some(realloc_and_zeroize), Some(free_and_zeroize))
            };
        }
    });
}

fn original() -> GmpMemory {
    match GMP_MEMORY.get() {
        Some(memory) => *memory,
        // The wrappers are never installed without the originals.
        None => std::process::abort(),
    }
}

extern "C" fn realloc_and_zeroize(
    old_ptr: *mut c_void,
    old_size: usize,
    new_size: usize,
) -> *mut c_void {
    // A real realloc would release the old block before we could wipe it, so
    // move the data by hand.
    let Some(alloc) = original().alloc else {
        std::process::abort()
    };

    unsafe {
        // SAFETY: GMP's allocator either returns a block of `new_size` bytes or
        // aborts.
        let new_ptr = alloc(new_size);

        // SAFETY: Per GMP doc, "ptr is never NULL, it’s always a previously
        // allocated block" of `old_size` bytes.
        let len = old_size.min(new_size);
        let old_data = slice::from_raw_parts(old_ptr as *const u8, len);
        let new_data = slice::from_raw_parts_mut(new_ptr as *mut u8, len);
        new_data.copy_from_slice(old_data);

        free_and_zeroize(old_ptr, old_size);
        new_ptr
    }
}

extern "C" fn free_and_zeroize(ptr: *mut c_void, size: usize) {
    let Some(free) = original().free else {
        std::process::abort()
    };

    unsafe {
        // SAFETY: Per GMP doc, "ptr is never NULL, it’s always a previously
        // allocated block of size bytes."
        slice::from_raw_parts_mut(ptr as *mut u8, size).zeroize();
        free(ptr, size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{bn_from_u32, parse_decimal};

    #[test]
    fn arithmetic_still_works_with_wiping_allocator() {
        enable_zeroize();
        enable_zeroize();

        // Large enough to force GMP to grow its buffers several times.
        let digits = "9".repeat(600);
        let value = parse_decimal(&digits).unwrap();
        let plus_one = value + bn_from_u32(1);
        assert_eq!(plus_one.to_string(), format!("1{}", "0".repeat(600)));
    }
}
