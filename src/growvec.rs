use std::alloc::{self, Layout, alloc, dealloc, realloc};
use std::fmt::{self, Debug, Display};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::ptr::{self, NonNull};
use std::{mem, slice};

use crate::error::OutOfRangeError;
use crate::policy::GrowthPolicy;

/// A contiguous, growable array whose positional operations are bounds checked
/// and report violations as [`OutOfRangeError`] instead of panicking.
///
/// Elements live in `[0, len)` of a single heap block of `cap` slots. The block
/// only grows when an insert would not fit, by the amount its [`GrowthPolicy`] asks for.
pub struct GrowVec<T> {
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    policy: GrowthPolicy,
    marker: PhantomData<T>,
}

#[macro_export]
macro_rules! growvec {
    ( $( $x:expr ),* $(,)? ) => {
        {
            let mut temp_vec = $crate::GrowVec::new();
            $(
                temp_vec.push($x);
            )*
            temp_vec
        }
    };
}

impl<T> GrowVec<T> {
    /// Constructs a new, empty `GrowVec<T>` with the default policy.
    ///
    /// Allocates room for `DEFAULT_INITIAL_CAPACITY` elements up front.
    pub fn new() -> Self {
        Self::with_policy(GrowthPolicy::default())
    }

    /// Constructs a new, empty `GrowVec<T>` with room for `capacity` elements.
    ///
    /// A capacity of 0 does not allocate.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_policy(GrowthPolicy::default().with_initial_capacity(capacity))
    }

    /// Constructs a new, empty `GrowVec<T>` that allocates and grows as `policy` says.
    pub fn with_policy(policy: GrowthPolicy) -> Self {
        assert!(
            mem::size_of::<T>() != 0,
            "This data structure does not support ZST's"
        );
        let mut out = Self {
            ptr: NonNull::dangling(),
            cap: 0,
            len: 0,
            policy,
            marker: PhantomData,
        };
        if policy.initial_capacity() > 0 {
            out.grow_to(policy.initial_capacity());
        }
        out
    }

    /// Reallocates the backing store to exactly `new_cap` slots.
    fn grow_to(&mut self, new_cap: usize) {
        debug_assert!(new_cap > self.cap);
        let new_layout = Layout::array::<T>(new_cap).expect("capacity overflow");

        let handle = if self.cap == 0 {
            unsafe { alloc(new_layout) }
        } else {
            // this layout cannot error because its size is based on an allocation that already exists
            let old_layout = unsafe { Layout::array::<T>(self.cap).unwrap_unchecked() };
            let old_handle = self.ptr.as_ptr() as *mut u8;
            unsafe { realloc(old_handle, old_layout, new_layout.size()) }
        };

        self.ptr = NonNull::new(handle as *mut T)
            .unwrap_or_else(|| alloc::handle_alloc_error(new_layout));
        tracing::trace!(old_cap = self.cap, new_cap, len = self.len, "grew backing store");
        self.cap = new_cap;
    }

    /// Grows through the policy if fewer than `required` slots are allocated.
    #[inline]
    fn reserve_for(&mut self, required: usize) {
        if required > self.cap {
            let max_cap = isize::MAX as usize / mem::size_of::<T>();
            let new_cap = self.policy.next_capacity(self.cap, required, max_cap);
            self.grow_to(new_cap);
        }
    }

    /// Makes sure at least `additional` more elements fit without another reallocation.
    pub fn reserve(&mut self, additional: usize) {
        let required = self.len.checked_add(additional).expect("capacity overflow");
        self.reserve_for(required);
    }

    /// Adds `val` to the end of the GrowVec, increasing its length by 1.
    pub fn push(&mut self, val: T) {
        if self.len == self.cap {
            self.reserve_for(self.len + 1);
        }
        unsafe { self.ptr.add(self.len).write(val) };
        self.len += 1;
    }

    /// Removes the last value on the GrowVec and returns it in an Option.
    /// If the GrowVec is empty, returns None.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            Some(unsafe { self.ptr.add(self.len).read() })
        }
    }

    /// Inserts `val` at `index`, shifting everything at or after it one slot to the right.
    ///
    /// `index == len` appends.
    pub fn insert(&mut self, index: usize, val: T) -> Result<(), OutOfRangeError> {
        if index > self.len {
            return Err(self.out_of_range(index));
        }
        self.reserve_for(self.len + 1);
        unsafe {
            let p = self.ptr.as_ptr().add(index);
            ptr::copy(p, p.add(1), self.len - index);
            ptr::write(p, val);
        }
        self.len += 1;
        Ok(())
    }

    /// Returns the element at `index`.
    pub fn get(&self, index: usize) -> Result<&T, OutOfRangeError> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(OutOfRangeError { index, len })
    }

    /// Returns the element at `index` for in-place mutation.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, OutOfRangeError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(OutOfRangeError { index, len })
    }

    /// Replaces the element at `index` and returns the one it replaced.
    pub fn set(&mut self, index: usize, val: T) -> Result<T, OutOfRangeError> {
        let slot = self.get_mut(index)?;
        Ok(mem::replace(slot, val))
    }

    /// Removes and returns the element at `index`, shifting everything after it one slot to the left.
    pub fn remove(&mut self, index: usize) -> Result<T, OutOfRangeError> {
        if index >= self.len {
            return Err(self.out_of_range(index));
        }
        let out = unsafe {
            let p = self.ptr.as_ptr().add(index);
            let out = ptr::read(p);
            ptr::copy(p.add(1), p, self.len - index - 1);
            out
        };
        self.len -= 1;
        Ok(out)
    }

    /// Swaps the elements at indices `ix1` and `ix2`.
    pub fn swap(&mut self, ix1: usize, ix2: usize) -> Result<(), OutOfRangeError> {
        for ix in [ix1, ix2] {
            if ix >= self.len {
                return Err(self.out_of_range(ix));
            }
        }
        self.as_mut_slice().swap(ix1, ix2);
        Ok(())
    }

    /// Returns the length of the GrowVec (number of elements)
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the growvec is empty and false otherwise
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub fn policy(&self) -> &GrowthPolicy {
        &self.policy
    }

    /// Drops every element from `new_len` on. Does nothing if `new_len >= len`.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail = ptr::slice_from_raw_parts_mut(
            unsafe { self.ptr.as_ptr().add(new_len) },
            self.len - new_len,
        );
        // shorten first so a panicking drop cannot cause a double drop
        self.len = new_len;
        unsafe { ptr::drop_in_place(tail) };
    }

    /// clears the growvec dropping all present elements but
    /// maintaining the currently allocated space
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Appends every item of `other` in iteration order.
    /// Returns true if anything was appended.
    pub fn append_all<I: IntoIterator<Item = T>>(&mut self, other: I) -> bool {
        let iter = other.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(lower);

        let before = self.len;
        for val in iter {
            self.push(val);
        }
        self.len != before
    }

    /// Inserts every item of `other`, in order, starting at `index`.
    /// Returns true if anything was inserted.
    ///
    /// `other` is drained into a staging buffer before anything is shifted, so if
    /// it panics the GrowVec is left exactly as it was.
    pub fn insert_all<I: IntoIterator<Item = T>>(
        &mut self,
        index: usize,
        other: I,
    ) -> Result<bool, OutOfRangeError> {
        if index > self.len {
            return Err(self.out_of_range(index));
        }
        let mut staged = GrowVec::with_policy(self.policy.with_initial_capacity(0));
        staged.append_all(other);
        let added = staged.len;
        if added == 0 {
            return Ok(false);
        }

        self.reserve_for(self.len + added);
        unsafe {
            let p = self.ptr.as_ptr().add(index);
            ptr::copy(p, p.add(added), self.len - index);
            ptr::copy_nonoverlapping(staged.ptr.as_ptr(), p, added);
        }
        // the staged items are moved out, only its allocation is left to free
        staged.len = 0;
        self.len += added;
        Ok(true)
    }

    /// Keeps only the elements `keep` returns true for, preserving their order.
    /// Returns true if any element was removed.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut keep: F) -> bool {
        let len = self.len;
        let mut kept = 0;
        let items = self.as_mut_slice();
        for ix in 0..len {
            if keep(&items[ix]) {
                items.swap(kept, ix);
                kept += 1;
            }
        }
        self.truncate(kept);
        kept != len
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Iterates over the elements front to back. Can be called again to restart.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            data: self,
            ix: 0,
            end: self.len,
        }
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    #[inline]
    fn out_of_range(&self, index: usize) -> OutOfRangeError {
        OutOfRangeError {
            index,
            len: self.len,
        }
    }
}

impl<T: PartialEq> GrowVec<T> {
    /// Index of the first element equal to `val`.
    pub fn index_of(&self, val: &T) -> Option<usize> {
        self.iter().position(|item| item == val)
    }

    /// Index of the last element equal to `val`.
    pub fn last_index_of(&self, val: &T) -> Option<usize> {
        self.iter().rposition(|item| item == val)
    }

    pub fn contains(&self, val: &T) -> bool {
        self.index_of(val).is_some()
    }

    /// Removes the first element equal to `val`. Returns false if there was none.
    pub fn remove_item(&mut self, val: &T) -> bool {
        match self.index_of(val) {
            Some(ix) => self.remove(ix).is_ok(),
            None => false,
        }
    }

    /// Removes every element that has no equal in `other`.
    /// Returns true if any element was removed.
    pub fn retain_all_present_in(&mut self, other: &[T]) -> bool {
        self.retain(|item| other.contains(item))
    }
}

impl<T> Drop for GrowVec<T> {
    fn drop(&mut self) {
        // drop items in GrowVec
        if mem::needs_drop::<T>() {
            unsafe { ptr::drop_in_place(self.as_mut_slice()) };
        }
        if self.cap == 0 {
            return;
        }
        unsafe {
            dealloc(
                self.ptr.as_ptr() as *mut u8,
                Layout::array::<T>(self.cap).unwrap_unchecked(),
            )
        };
    }
}

/// Borrowing iterator over a [`GrowVec`], front to back.
pub struct Iter<'a, T> {
    data: &'a GrowVec<T>,
    ix: usize,
    end: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ix == self.end {
            return None;
        }
        let out = &self.data.as_slice()[self.ix];
        self.ix += 1;
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.end - self.ix;
        (left, Some(left))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.ix == self.end {
            return None;
        }
        self.end -= 1;
        Some(&self.data.as_slice()[self.end])
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            ix: self.ix,
            end: self.end,
        }
    }
}

impl<'a, T> IntoIterator for &'a GrowVec<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut GrowVec<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> Default for GrowVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for GrowVec<T> {
    fn clone(&self) -> Self {
        let mut out = Self::with_policy(self.policy.with_initial_capacity(self.len));
        out.policy = self.policy;
        out.append_all(self.iter().cloned());
        out
    }
}

impl<T> FromIterator<T> for GrowVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut out = Self::new();
        out.append_all(iter);
        out
    }
}

impl<T> Extend<T> for GrowVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.append_all(iter);
    }
}

impl<T> From<Vec<T>> for GrowVec<T> {
    fn from(vec: Vec<T>) -> Self {
        vec.into_iter().collect()
    }
}

impl<T: Clone> From<&[T]> for GrowVec<T> {
    fn from(items: &[T]) -> Self {
        items.iter().cloned().collect()
    }
}

impl<T> Index<usize> for GrowVec<T> {
    type Output = T;

    fn index(&self, ix: usize) -> &Self::Output {
        assert!(ix < self.len, "Index out of bounds.");
        &self.as_slice()[ix]
    }
}

impl<T> IndexMut<usize> for GrowVec<T> {
    fn index_mut(&mut self, ix: usize) -> &mut Self::Output {
        assert!(ix < self.len, "Index out of bounds.");
        &mut self.as_mut_slice()[ix]
    }
}

impl<T: Debug> Debug for GrowVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Space separated elements, e.g. `5 10 15`.
impl<T: Display> Display for GrowVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut items = self.iter();
        if let Some(first) = items.next() {
            write!(f, "{first}")?;
            for item in items {
                write!(f, " {item}")?;
            }
        }
        Ok(())
    }
}

unsafe impl<T: Send> Send for GrowVec<T> {}
unsafe impl<T: Sync> Sync for GrowVec<T> {}

impl<T: PartialEq> PartialEq for GrowVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for GrowVec<T> {}

impl<T: PartialEq> PartialEq<Vec<T>> for GrowVec<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq> PartialEq<GrowVec<T>> for Vec<T> {
    fn eq(&self, other: &GrowVec<T>) -> bool {
        other == self
    }
}

impl<T: PartialEq> PartialEq<[T]> for GrowVec<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for GrowVec<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}
