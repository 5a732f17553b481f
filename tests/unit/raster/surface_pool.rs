use super::*;

#[test]
fn pool_honors_bucket_cap() {
    let p = SurfacePool::new(SurfacePoolOpts {
        max_pool_bytes: 1 << 30,
        max_surfaces_per_bucket: 1,
        ..Default::default()
    });

    let a = p.acquire(8, 8).unwrap();
    let b = p.acquire(8, 8).unwrap();
    assert_eq!(p.stats().in_use, 2);
    drop(a);
    drop(b);

    let st = p.stats();
    assert_eq!(st.retained_surfaces, 1);
    assert_eq!(st.in_use, 0);
    assert_eq!(st.dropped_on_release, 1);
}

#[test]
fn pool_honors_global_byte_cap() {
    let bytes_8x8 = SurfaceKey { w: 8, h: 8 }.byte_len();
    let p = SurfacePool::new(SurfacePoolOpts {
        max_pool_bytes: bytes_8x8,
        max_surfaces_per_bucket: 8,
        ..Default::default()
    });

    let a = p.acquire(8, 8).unwrap();
    let b = p.acquire(8, 8).unwrap();
    drop(a);
    drop(b);

    let st = p.stats();
    assert_eq!(st.retained_bytes, bytes_8x8);
    assert_eq!(st.retained_surfaces, 1);
    assert!(st.dropped_on_release >= 1);
}

#[test]
fn reacquired_surface_is_cleared_and_not_reallocated() {
    let p = SurfacePool::default();
    {
        let mut s = p.acquire(4, 4).unwrap();
        s.put_pixel(1, 1, image::Rgba([255, 0, 0, 255]));
    }
    let s = p.acquire(4, 4).unwrap();
    assert!(s.as_raw().iter().all(|&b| b == 0));
    assert_eq!(p.stats().alloc_surfaces, 1);
}

#[test]
fn surface_returns_to_pool_on_error_path() {
    fn fails(p: &SurfacePool) -> GifloomResult<()> {
        let _s = p.acquire(2, 2)?;
        Err(GifloomError::input("bail"))
    }

    let p = SurfacePool::default();
    assert!(fails(&p).is_err());
    let st = p.stats();
    assert_eq!(st.in_use, 0);
    assert_eq!(st.retained_surfaces, 1);
}

#[test]
fn acquire_rejects_empty_and_oversized() {
    let p = SurfacePool::new(SurfacePoolOpts {
        max_surface_dim: 64,
        ..Default::default()
    });
    assert!(matches!(p.acquire(0, 4), Err(GifloomError::Surface(_))));
    assert!(matches!(p.acquire(65, 4), Err(GifloomError::Surface(_))));
    assert!(p.acquire(64, 64).is_ok());
}

#[test]
fn zero_capacity_pool_drops_everything() {
    let p = SurfacePool::new(SurfacePoolOpts {
        max_pool_bytes: 0,
        ..Default::default()
    });
    drop(p.acquire(3, 3).unwrap());
    let st = p.stats();
    assert_eq!(st.retained_surfaces, 0);
    assert_eq!(st.dropped_on_release, 1);
}
