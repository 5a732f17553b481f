use crate::foundation::core::rgba_len;
use crate::foundation::error::{GifloomError, GifloomResult};
use image::RgbaImage;
use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

/// Pool configuration for cached surfaces.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct SurfacePoolOpts {
    /// Maximum bytes retained across all buckets.
    pub max_pool_bytes: usize,
    /// Maximum number of retained surfaces per (w,h) bucket.
    pub max_surfaces_per_bucket: usize,
    /// Largest width or height a surface may have. Larger requests fail to acquire.
    pub max_surface_dim: u32,
}

impl Default for SurfacePoolOpts {
    fn default() -> Self {
        Self {
            max_pool_bytes: 256 * 1024 * 1024,
            max_surfaces_per_bucket: 8,
            max_surface_dim: 16_384,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SurfaceKey {
    w: u32,
    h: u32,
}

impl SurfaceKey {
    fn byte_len(self) -> usize {
        (self.w as usize)
            .saturating_mul(self.h as usize)
            .saturating_mul(4)
    }
}

/// Counters describing pool behavior since creation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SurfacePoolStats {
    /// Surfaces currently parked in the pool.
    pub retained_surfaces: usize,
    /// Bytes currently parked in the pool.
    pub retained_bytes: usize,
    /// Surfaces checked out and not yet returned.
    pub in_use: usize,
    /// Fresh allocations (pool misses).
    pub alloc_surfaces: u64,
    /// Bytes allocated on pool misses.
    pub alloc_bytes: u64,
    /// Surfaces dropped instead of retained because a cap was hit.
    pub dropped_on_release: u64,
}

struct Bucket {
    key: SurfaceKey,
    surfaces: Vec<RgbaImage>,
}

#[derive(Default)]
struct PoolState {
    stats: SurfacePoolStats,

    // Hash lookup is acceptable here: this is op-level, not per-pixel.
    bucket_idx_by_key: HashMap<SurfaceKey, usize>,
    buckets: Vec<Bucket>,
}

/// Bounded pool of reusable RGBA surfaces, keyed by `(width, height)`.
///
/// The pool is owned by whoever drives the pipeline (normally a [`crate::Transcoder`]). Surfaces
/// are checked out with [`SurfacePool::acquire`] and go back automatically when the returned
/// [`PooledSurface`] guard is dropped, on success and error paths alike. The guard borrows the
/// pool, so a surface can never outlive it or be used after release.
///
/// The pool uses `RefCell` and is therefore `!Sync`. Hosts that run pipelines on several threads
/// need one pool per thread.
pub struct SurfacePool {
    opts: SurfacePoolOpts,
    state: RefCell<PoolState>,
}

impl SurfacePool {
    /// Create an empty pool.
    pub fn new(opts: SurfacePoolOpts) -> Self {
        Self {
            opts,
            state: RefCell::new(PoolState::default()),
        }
    }

    /// Pool options.
    pub fn opts(&self) -> SurfacePoolOpts {
        self.opts
    }

    /// Snapshot of the pool counters.
    pub fn stats(&self) -> SurfacePoolStats {
        self.state.borrow().stats.clone()
    }

    /// Check that a `width x height` surface could be acquired from this pool.
    pub fn admit(&self, width: u32, height: u32) -> GifloomResult<()> {
        if width == 0 || height == 0 {
            return Err(GifloomError::surface(format!(
                "cannot create a {width}x{height} surface"
            )));
        }
        let max = self.opts.max_surface_dim;
        if width > max || height > max {
            return Err(GifloomError::surface(format!(
                "surface {width}x{height} exceeds the {max}px limit"
            )));
        }
        rgba_len(width, height).map_err(|e| GifloomError::surface(e.to_string()))?;
        Ok(())
    }

    /// Check out a cleared (fully transparent) surface.
    pub fn acquire(&self, width: u32, height: u32) -> GifloomResult<PooledSurface<'_>> {
        self.admit(width, height)?;
        let key = SurfaceKey {
            w: width,
            h: height,
        };

        let mut guard = self.state.borrow_mut();
        let st = &mut *guard;
        let reused = match st.bucket_idx_by_key.get(&key).copied() {
            Some(bi) => st.buckets[bi].surfaces.pop(),
            None => None,
        };

        let image = match reused {
            Some(mut img) => {
                st.stats.retained_surfaces = st.stats.retained_surfaces.saturating_sub(1);
                st.stats.retained_bytes = st.stats.retained_bytes.saturating_sub(key.byte_len());
                let buf: &mut [u8] = &mut img;
                buf.fill(0);
                img
            }
            None => {
                st.stats.alloc_surfaces = st.stats.alloc_surfaces.saturating_add(1);
                st.stats.alloc_bytes = st.stats.alloc_bytes.saturating_add(key.byte_len() as u64);
                RgbaImage::new(width, height)
            }
        };
        st.stats.in_use = st.stats.in_use.saturating_add(1);

        Ok(PooledSurface {
            pool: self,
            key,
            image,
        })
    }

    fn release(&self, key: SurfaceKey, image: RgbaImage) {
        let mut guard = self.state.borrow_mut();
        let st = &mut *guard;
        st.stats.in_use = st.stats.in_use.saturating_sub(1);

        if self.opts.max_pool_bytes == 0 || self.opts.max_surfaces_per_bucket == 0 {
            st.stats.dropped_on_release = st.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let bytes = key.byte_len();
        if st.stats.retained_bytes.saturating_add(bytes) > self.opts.max_pool_bytes {
            st.stats.dropped_on_release = st.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let bi = match st.bucket_idx_by_key.get(&key).copied() {
            Some(i) => i,
            None => {
                let i = st.buckets.len();
                st.buckets.push(Bucket {
                    key,
                    surfaces: Vec::new(),
                });
                st.bucket_idx_by_key.insert(key, i);
                i
            }
        };

        let bucket = &mut st.buckets[bi];
        debug_assert_eq!(bucket.key, key);
        if bucket.surfaces.len() >= self.opts.max_surfaces_per_bucket {
            st.stats.dropped_on_release = st.stats.dropped_on_release.saturating_add(1);
            return;
        }

        bucket.surfaces.push(image);
        st.stats.retained_surfaces = st.stats.retained_surfaces.saturating_add(1);
        st.stats.retained_bytes = st.stats.retained_bytes.saturating_add(bytes);
    }
}

impl Default for SurfacePool {
    fn default() -> Self {
        Self::new(SurfacePoolOpts::default())
    }
}

/// A surface checked out of a [`SurfacePool`]. Returned to the pool on drop.
pub struct PooledSurface<'p> {
    pool: &'p SurfacePool,
    key: SurfaceKey,
    image: RgbaImage,
}

impl PooledSurface<'_> {
    /// Copy of the current pixel buffer.
    pub fn snapshot(&self) -> Vec<u8> {
        self.image.as_raw().clone()
    }
}

impl Deref for PooledSurface<'_> {
    type Target = RgbaImage;

    fn deref(&self) -> &RgbaImage {
        &self.image
    }
}

impl DerefMut for PooledSurface<'_> {
    fn deref_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }
}

impl Drop for PooledSurface<'_> {
    fn drop(&mut self) {
        let image = std::mem::take(&mut self.image);
        self.pool.release(self.key, image);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/surface_pool.rs"]
mod tests;
