use std::marker::PhantomData;
use std::ops::Range;
use std::slice;

// shared mutable view over a slice, for algorithms whose scheduling guarantees
// that concurrently live ranges never overlap
pub(crate) struct SharedSlice<'s, T> {
    ptr: *mut T,
    len: usize,
    _marker: PhantomData<&'s mut [T]>,
}

unsafe impl<'s, T: Send> Send for SharedSlice<'s, T> {}
unsafe impl<'s, T: Send> Sync for SharedSlice<'s, T> {}

impl<'s, T> SharedSlice<'s, T> {
    pub fn new(slice: &'s mut [T]) -> Self {
        return SharedSlice {
            ptr: slice.as_mut_ptr(),
            len: slice.len(),
            _marker: PhantomData,
        };
    }

    // safety: no overlapping mutable view may be live while the result is
    pub unsafe fn range(&self, range: Range<usize>) -> &'s [T] {
        assert!(range.start <= range.end && range.end <= self.len);
        return slice::from_raw_parts(self.ptr.add(range.start), range.end - range.start);
    }

    // safety: this must be the only live view of the range
    pub unsafe fn range_mut(&self, range: Range<usize>) -> &'s mut [T] {
        assert!(range.start <= range.end && range.end <= self.len);
        return slice::from_raw_parts_mut(self.ptr.add(range.start), range.end - range.start);
    }
}
