//! Owned buffers handed across the C boundary.

use std::mem::ManuallyDrop;

/// A heap buffer described by pointer, length and capacity.
///
/// Buffers returned by matepar functions are owned by the caller and must be
/// released with the matching `*_free` function. Buffers returned by hooks stay
/// owned by the hook side; the engine hands them back through
/// [`MateparHooks::free_node_list`](crate::MateparHooks::free_node_list).
#[repr(C)]
#[derive(Debug)]
pub struct MateparBuffer<T> {
    /// First element, or null for an empty buffer.
    pub ptr: *mut T,
    /// Number of elements.
    pub len: usize,
    /// Allocated capacity, needed to free the allocation.
    pub cap: usize,
}

/// A list of node indices.
pub type MateparNodeList = MateparBuffer<u32>;

/// UTF-8 text, not NUL-terminated.
pub type MateparString = MateparBuffer<u8>;

impl<T> MateparBuffer<T> {
    /// An empty buffer with a null pointer.
    pub fn empty() -> Self {
        Self {
            ptr: std::ptr::null_mut(),
            len: 0,
            cap: 0,
        }
    }

    /// Transfers ownership of a vector's allocation into a buffer.
    pub fn from_vec(vec: Vec<T>) -> Self {
        let mut vec = ManuallyDrop::new(vec);
        Self {
            ptr: vec.as_mut_ptr(),
            len: vec.len(),
            cap: vec.capacity(),
        }
    }

    /// Takes the allocation back.
    ///
    /// # Safety
    ///
    /// The buffer must come from [`from_vec`](Self::from_vec) (or be empty) and
    /// must not be used afterwards.
    pub unsafe fn into_vec(self) -> Vec<T> {
        if self.ptr.is_null() {
            Vec::new()
        } else {
            Vec::from_raw_parts(self.ptr, self.len, self.cap)
        }
    }

    /// Views the elements.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or point to `len` initialized elements that stay
    /// valid for the returned lifetime.
    pub unsafe fn as_slice<'a>(&self) -> &'a [T] {
        if self.ptr.is_null() {
            &[]
        } else {
            std::slice::from_raw_parts(self.ptr, self.len)
        }
    }
}

impl MateparString {
    /// Copies a Rust string into an owned buffer.
    pub fn from_string(s: String) -> Self {
        Self::from_vec(s.into_bytes())
    }
}

/// Frees a node list returned by matepar.
///
/// # Safety
///
/// `list` must have been returned by a matepar function and not freed before.
#[no_mangle]
pub unsafe extern "C" fn matepar_node_list_free(list: MateparNodeList) {
    drop(list.into_vec());
}

/// Frees a string returned by matepar.
///
/// # Safety
///
/// `s` must have been returned by a matepar function and not freed before.
#[no_mangle]
pub unsafe extern "C" fn matepar_string_free(s: MateparString) {
    drop(s.into_vec());
}

/// Reads a length-prefixed string argument; invalid UTF-8 is replaced.
///
/// # Safety
///
/// `ptr` must be null or point to `len` readable bytes.
pub(crate) unsafe fn str_arg(ptr: *const u8, len: usize) -> String {
    if ptr.is_null() {
        return String::new();
    }
    String::from_utf8_lossy(std::slice::from_raw_parts(ptr, len)).into_owned()
}
