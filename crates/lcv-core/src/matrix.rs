//! The matrix buffer type.
//!
//! [`Matrix`] owns (or shares) a contiguous block of interleaved pixel
//! memory, described by a [`MatType`], a width/height in pixels, and a
//! line stride in bytes.
//!
//! # Ownership model
//!
//! The byte allocation is held behind an [`Arc`], so every `Matrix`
//! value that aliases it — clones and [`roi`](Matrix::roi) views — shares
//! one atomically refcounted block. The block is freed exactly when the
//! last aliasing `Matrix` is dropped or reassigned. Unlike a
//! copy-on-write container, mutation through one alias is visible
//! through all of them; isolation is explicit via
//! [`deep_clone`](Matrix::deep_clone) / [`copy_to`](Matrix::copy_to).
//!
//! # Memory layout
//!
//! Pixels are stored row-major, channels interleaved:
//!
//! ```text
//! memory: [B G R B G R B G R ...]  <- row 0, line_stride bytes apart
//!         [B G R B G R B G R ...]  <- row 1
//! ```
//!
//! For a freshly created matrix `line_stride == cols * pixel_stride`;
//! a sub-region view keeps its parent's strides, so its rows are not
//! contiguous ([`is_continuous`](Matrix::is_continuous) is `false`).
//!
//! # Access tiers
//!
//! - raw pointers ([`row_ptr`](Matrix::row_ptr),
//!   [`pixel_ptr`](Matrix::pixel_ptr)) and unchecked typed references
//!   ([`at`](Matrix::at), [`at_mut`](Matrix::at_mut)): the per-pixel
//!   fast path, no bounds checks in release builds;
//! - checked accessors ([`get`](Matrix::get), [`set`](Matrix::set)):
//!   validate coordinates and element size, for tests and cold paths;
//! - row slices ([`row_bytes`](Matrix::row_bytes)): what codec and
//!   display adapters consume.
//!
//! # Concurrency
//!
//! The refcount is atomic, so aliases may be created and dropped on any
//! thread and concurrent *reads* through aliases are safe. Concurrent
//! *writes* to overlapping regions are not synchronized here; callers
//! must serialize them. Pixel algorithms built on this core follow one
//! convention instead: read the source, write a freshly created
//! destination, never mutate a source in place.
//!
//! # Usage
//!
//! ```rust
//! use lcv_core::{Matrix, Rect};
//!
//! let mut image = Matrix::zeros(640, 480, "8uc3")?;
//! image.set_to([0u8, 255, 0]);
//!
//! let tile = image.roi(Rect::new(16, 16, 64, 64))?;
//! assert!(tile.is_submatrix());
//! assert_eq!(tile.get::<[u8; 3]>(0, 0)?, [0, 255, 0]);
//! # Ok::<(), lcv_core::Error>(())
//! ```

use std::alloc::{self, Layout};
use std::fmt;
use std::mem;
use std::ptr::{self, NonNull};
use std::sync::Arc;

use crate::format::{IntoMatType, NOT_A_TYPE};
use crate::{Error, MatType, Rect, Result, Size};

/// Alignment of matrix allocations; enough for 16-byte vector loads.
const ALLOC_ALIGN: usize = 16;

/// The shared byte block behind one matrix family.
///
/// Freed exactly once, when the last `Arc` holder goes away.
struct Allocation {
    ptr: NonNull<u8>,
    layout: Layout,
}

// The block itself carries no interior bookkeeping; access through the
// derived pointers is governed by the caller-serialization contract.
unsafe impl Send for Allocation {}
unsafe impl Sync for Allocation {}

impl Allocation {
    fn new(size: usize, zeroed: bool) -> Result<Self> {
        let layout = Layout::from_size_align(size, ALLOC_ALIGN)
            .map_err(|_| Error::AllocationFailed { requested: size })?;
        let raw = unsafe {
            if zeroed {
                alloc::alloc_zeroed(layout)
            } else {
                alloc::alloc(layout)
            }
        };
        match NonNull::new(raw) {
            Some(ptr) => Ok(Self { ptr, layout }),
            None => Err(Error::AllocationFailed { requested: size }),
        }
    }

    #[inline]
    fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }
}

impl Drop for Allocation {
    fn drop(&mut self) {
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) };
    }
}

/// 2-D interleaved pixel buffer with shared-ownership semantics.
///
/// See the [module docs](self) for the ownership and access model.
///
/// `Clone` is a **shallow alias**: the clone shares the same bytes and
/// bumps the shared refcount. Use [`deep_clone`](Matrix::deep_clone)
/// for an isolated copy.
pub struct Matrix {
    cols: u32,
    rows: u32,
    ty: Option<MatType>,
    pixel_stride: usize,
    line_stride: usize,
    /// Byte offset of this view's first pixel inside the allocation.
    offset: usize,
    buf: Option<Arc<Allocation>>,
}

impl Matrix {
    /// Creates an empty matrix owning nothing.
    #[inline]
    pub const fn new() -> Self {
        Self {
            cols: 0,
            rows: 0,
            ty: None,
            pixel_stride: 0,
            line_stride: 0,
            offset: 0,
            buf: None,
        }
    }

    /// Allocates an uninitialized `cols x rows` matrix of the given type.
    ///
    /// The type may be a [`MatType`] or a channel string:
    ///
    /// ```rust
    /// use lcv_core::Matrix;
    ///
    /// let m = Matrix::create(4, 2, "8uc1")?;
    /// assert_eq!((m.cols(), m.rows(), m.elem_size()), (4, 2, 1));
    /// # Ok::<(), lcv_core::Error>(())
    /// ```
    ///
    /// The pixel contents are unspecified until written; use
    /// [`zeros`](Matrix::zeros) for a defined initial state.
    /// Reassigning over an existing `Matrix` variable releases its
    /// previous reference first.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] for zero or overflowing extents,
    /// [`Error::InvalidTypeSpec`] for unusable types (including the
    /// zero-size depth-only projection), [`Error::AllocationFailed`]
    /// when the allocator refuses — never a half-initialized buffer.
    pub fn create<T: IntoMatType>(cols: u32, rows: u32, ty: T) -> Result<Self> {
        Self::alloc_new(cols, rows, ty.into_mat_type()?, false)
    }

    /// Allocates a zero-filled `cols x rows` matrix of the given type.
    pub fn zeros<T: IntoMatType>(cols: u32, rows: u32, ty: T) -> Result<Self> {
        Self::alloc_new(cols, rows, ty.into_mat_type()?, true)
    }

    fn alloc_new(cols: u32, rows: u32, ty: MatType, zeroed: bool) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
                reason: "zero dimension".into(),
            });
        }
        let pixel_stride = ty.byte_size();
        if pixel_stride == 0 {
            return Err(Error::InvalidTypeSpec {
                spec: ty.to_string(),
            });
        }
        let line_stride = (cols as usize)
            .checked_mul(pixel_stride)
            .ok_or_else(|| Error::InvalidDimensions {
                width: cols,
                height: rows,
                reason: "byte extent overflows usize".into(),
            })?;
        let total = (rows as usize)
            .checked_mul(line_stride)
            .ok_or_else(|| Error::InvalidDimensions {
                width: cols,
                height: rows,
                reason: "byte extent overflows usize".into(),
            })?;
        let buf = Allocation::new(total, zeroed)?;
        Ok(Self {
            cols,
            rows,
            ty: Some(ty),
            pixel_stride,
            line_stride,
            offset: 0,
            buf: Some(Arc::new(buf)),
        })
    }

    /// Width in pixels.
    #[inline]
    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Height in pixels.
    #[inline]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Dimensions as a [`Size`].
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.cols, self.rows)
    }

    /// The element type descriptor, or `None` for an empty matrix.
    #[inline]
    pub const fn mat_type(&self) -> Option<MatType> {
        self.ty
    }

    /// Number of interleaved channels (0 for an empty matrix).
    #[inline]
    pub fn channels(&self) -> u8 {
        self.ty.map_or(0, MatType::channels)
    }

    /// Depth-only projection of the element type.
    #[inline]
    pub fn depth(&self) -> Option<MatType> {
        self.ty.map(MatType::depth)
    }

    /// Canonical component type name (`"uint8"`, `"float32"`, ...).
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty.map_or(NOT_A_TYPE, MatType::name)
    }

    /// Byte size of one full element; equals the pixel stride.
    #[inline]
    pub const fn elem_size(&self) -> usize {
        self.pixel_stride
    }

    /// Byte size of a single component.
    #[inline]
    pub fn elem_size1(&self) -> usize {
        self.ty.map_or(0, MatType::component_byte_size)
    }

    /// Byte distance between horizontally adjacent pixels.
    #[inline]
    pub const fn pixel_stride(&self) -> usize {
        self.pixel_stride
    }

    /// Byte distance between the starts of consecutive rows.
    ///
    /// Exceeds `cols * pixel_stride` for sub-region views.
    #[inline]
    pub const fn line_stride(&self) -> usize {
        self.line_stride
    }

    /// `true` if this matrix references no allocation.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.buf.is_none()
    }

    /// `true` if this view starts past the beginning of its allocation.
    #[inline]
    pub const fn is_submatrix(&self) -> bool {
        self.offset != 0
    }

    /// `true` if rows are stored back to back with no gap.
    ///
    /// Freshly created matrices are continuous; sub-region views
    /// narrower than their parent are not.
    #[inline]
    pub const fn is_continuous(&self) -> bool {
        self.line_stride == self.cols as usize * self.pixel_stride
    }

    #[inline]
    fn base(&self) -> *mut u8 {
        match &self.buf {
            Some(buf) => buf.as_ptr(),
            None => ptr::null_mut(),
        }
    }

    #[inline]
    fn addr(&self, y: u32, x: u32) -> *mut u8 {
        debug_assert!(
            y < self.rows && x < self.cols,
            "pixel ({x}, {y}) out of range for {}x{} matrix",
            self.cols,
            self.rows
        );
        let base = self.base();
        if base.is_null() {
            return base;
        }
        unsafe {
            base.add(self.offset + y as usize * self.line_stride + x as usize * self.pixel_stride)
        }
    }

    /// Address of this view's first pixel; null for an empty matrix.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        match &self.buf {
            Some(buf) => unsafe { buf.as_ptr().add(self.offset) },
            None => ptr::null(),
        }
    }

    /// Mutable address of this view's first pixel; null when empty.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.as_ptr() as *mut u8
    }

    /// Address of the start of row `y`.
    ///
    /// No bounds check in release builds; `y` must be less than
    /// [`rows`](Matrix::rows), or the returned address is meaningless.
    #[inline]
    pub fn row_ptr(&self, y: u32) -> *const u8 {
        debug_assert!(y < self.rows, "row {y} out of range ({} rows)", self.rows);
        let base = self.base();
        if base.is_null() {
            return base;
        }
        unsafe { base.add(self.offset + y as usize * self.line_stride) }
    }

    /// Mutable address of the start of row `y`; same contract as
    /// [`row_ptr`](Matrix::row_ptr).
    #[inline]
    pub fn row_ptr_mut(&mut self, y: u32) -> *mut u8 {
        self.row_ptr(y) as *mut u8
    }

    /// Address of pixel `(y, x)` — `data + y*line_stride + x*pixel_stride`.
    ///
    /// No bounds check in release builds.
    #[inline]
    pub fn pixel_ptr(&self, y: u32, x: u32) -> *const u8 {
        self.addr(y, x)
    }

    /// Mutable address of pixel `(y, x)`; same contract as
    /// [`pixel_ptr`](Matrix::pixel_ptr).
    #[inline]
    pub fn pixel_ptr_mut(&mut self, y: u32, x: u32) -> *mut u8 {
        self.addr(y, x)
    }

    /// Typed unchecked reference to pixel `(y, x)`.
    ///
    /// # Safety
    ///
    /// `y < rows`, `x < cols`, `size_of::<E>() <= elem_size()`, and the
    /// pixel address must be aligned for `E` (holds for the
    /// [`element`](crate::element) aliases on matching matrix types).
    #[inline]
    pub unsafe fn at<E: Copy>(&self, y: u32, x: u32) -> &E {
        let p = self.addr(y, x);
        debug_assert!(mem::size_of::<E>() <= self.pixel_stride);
        debug_assert_eq!(p as usize % mem::align_of::<E>(), 0);
        unsafe { &*(p as *const E) }
    }

    /// Typed unchecked mutable reference to pixel `(y, x)`.
    ///
    /// # Safety
    ///
    /// Same contract as [`at`](Matrix::at); additionally the caller must
    /// serialize writes with any other alias of this allocation.
    #[inline]
    pub unsafe fn at_mut<E: Copy>(&mut self, y: u32, x: u32) -> &mut E {
        let p = self.addr(y, x);
        debug_assert!(mem::size_of::<E>() <= self.pixel_stride);
        debug_assert_eq!(p as usize % mem::align_of::<E>(), 0);
        unsafe { &mut *(p as *mut E) }
    }

    #[inline]
    fn check_access<E>(&self, y: u32, x: u32) -> Result<()> {
        if x >= self.cols || y >= self.rows {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.cols,
                height: self.rows,
            });
        }
        if mem::size_of::<E>() > self.pixel_stride {
            return Err(Error::ElemSizeMismatch {
                expected: self.pixel_stride,
                got: mem::size_of::<E>(),
            });
        }
        Ok(())
    }

    /// Checked read of pixel `(y, x)`.
    ///
    /// The slow sibling of [`at`](Matrix::at): validates coordinates and
    /// element size, reads unaligned.
    pub fn get<E: Copy>(&self, y: u32, x: u32) -> Result<E> {
        self.check_access::<E>(y, x)?;
        Ok(unsafe { (self.addr(y, x) as *const E).read_unaligned() })
    }

    /// Checked write of pixel `(y, x)`.
    pub fn set<E: Copy>(&mut self, y: u32, x: u32, value: E) -> Result<()> {
        self.check_access::<E>(y, x)?;
        unsafe { (self.addr(y, x) as *mut E).write_unaligned(value) };
        Ok(())
    }

    /// The `cols * elem_size()` payload bytes of row `y`.
    ///
    /// Excludes any inter-row gap, so it is what codec and display
    /// adapters should consume.
    ///
    /// # Panics
    ///
    /// Panics if `y >= rows`.
    pub fn row_bytes(&self, y: u32) -> &[u8] {
        assert!(y < self.rows, "row {y} out of range ({} rows)", self.rows);
        unsafe {
            std::slice::from_raw_parts(self.row_ptr(y), self.cols as usize * self.pixel_stride)
        }
    }

    /// Mutable payload bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= rows`.
    pub fn row_bytes_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(y < self.rows, "row {y} out of range ({} rows)", self.rows);
        unsafe {
            std::slice::from_raw_parts_mut(
                self.row_ptr(y) as *mut u8,
                self.cols as usize * self.pixel_stride,
            )
        }
    }

    /// Broadcasts `value` to every pixel.
    ///
    /// ```rust
    /// use lcv_core::Matrix;
    ///
    /// let mut m = Matrix::zeros(4, 2, "8uc1")?;
    /// m.set_to(200u8);
    /// assert!(m.row_bytes(1).iter().all(|&b| b == 200));
    /// # Ok::<(), lcv_core::Error>(())
    /// ```
    ///
    /// # Panics
    ///
    /// `size_of::<E>()` must equal [`elem_size`](Matrix::elem_size);
    /// a mismatch is a caller defect and asserts.
    pub fn set_to<E: Copy>(&mut self, value: E) {
        assert_eq!(
            mem::size_of::<E>(),
            self.pixel_stride,
            "set_to value size must match the matrix element size"
        );
        for y in 0..self.rows {
            let mut p = self.row_ptr(y) as *mut u8;
            for _ in 0..self.cols {
                unsafe {
                    (p as *mut E).write_unaligned(value);
                    p = p.add(self.pixel_stride);
                }
            }
        }
    }

    /// Aliasing view of the rectangular sub-region `rect`.
    ///
    /// O(1): no pixel is touched. The view shares the parent's
    /// allocation and inherits both strides, so its rows sit
    /// `line_stride` bytes apart inside the wider parent.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRegion`] if `rect` is empty or does not lie
    /// within `[0, cols) x [0, rows)`. Out-of-range regions are
    /// rejected rather than clamped.
    pub fn roi(&self, rect: Rect) -> Result<Matrix> {
        let (Some(buf), Some(ty)) = (self.buf.as_ref(), self.ty) else {
            return Err(Error::InvalidRegion {
                rx: rect.x,
                ry: rect.y,
                rw: rect.width,
                rh: rect.height,
                width: self.cols,
                height: self.rows,
            });
        };
        let fits = !rect.is_empty()
            && rect.x as u64 + rect.width as u64 <= self.cols as u64
            && rect.y as u64 + rect.height as u64 <= self.rows as u64;
        if !fits {
            return Err(Error::InvalidRegion {
                rx: rect.x,
                ry: rect.y,
                rw: rect.width,
                rh: rect.height,
                width: self.cols,
                height: self.rows,
            });
        }
        Ok(Matrix {
            cols: rect.width,
            rows: rect.height,
            ty: Some(ty),
            pixel_stride: self.pixel_stride,
            line_stride: self.line_stride,
            offset: self.offset
                + rect.y as usize * self.line_stride
                + rect.x as usize * self.pixel_stride,
            buf: Some(Arc::clone(buf)),
        })
    }

    /// Isolated deep copy: fresh allocation, byte-identical content.
    ///
    /// A continuous source is copied as one block; a sub-region view is
    /// copied row by row, since its backing allocation is wider than
    /// the copied region. The copy is always continuous and never a
    /// submatrix.
    pub fn deep_clone(&self) -> Result<Matrix> {
        let Some(ty) = self.ty else {
            return Ok(Matrix::new());
        };
        let mut dst = Matrix::create(self.cols, self.rows, ty)?;
        if self.is_continuous() {
            unsafe {
                ptr::copy_nonoverlapping(
                    self.as_ptr(),
                    dst.as_mut_ptr(),
                    self.rows as usize * self.line_stride,
                );
            }
        } else {
            let row_len = self.cols as usize * self.pixel_stride;
            for y in 0..self.rows {
                unsafe {
                    ptr::copy_nonoverlapping(self.row_ptr(y), dst.row_ptr_mut(y), row_len);
                }
            }
        }
        Ok(dst)
    }

    /// Deep-copies this matrix into `dst`, replacing whatever `dst`
    /// referenced before.
    pub fn copy_to(&self, dst: &mut Matrix) -> Result<()> {
        *dst = self.deep_clone()?;
        Ok(())
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Matrix {
    /// Shallow alias: shares the allocation, bumps the refcount.
    fn clone(&self) -> Self {
        Self {
            cols: self.cols,
            rows: self.rows,
            ty: self.ty,
            pixel_stride: self.pixel_stride,
            line_stride: self.line_stride,
            offset: self.offset,
            buf: self.buf.clone(),
        }
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spec = self.ty.map(|ty| ty.to_string());
        f.debug_struct("Matrix")
            .field("cols", &self.cols)
            .field("rows", &self.rows)
            .field("type", &spec.as_deref().unwrap_or(NOT_A_TYPE))
            .field("line_stride", &self.line_stride)
            .field("submatrix", &self.is_submatrix())
            .finish()
    }
}

/// Alias in the tradition of dense-matrix image libraries.
pub type Mat = Matrix;
