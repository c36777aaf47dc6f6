// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar float helpers that dispatch to `std` or `libm` intrinsics.

#[cfg(all(not(feature = "std"), not(feature = "libm")))]
compile_error!("canopy_transform requires either the `std` or `libm` feature");

/// Sine of `x` radians.
#[inline]
pub(crate) fn sinf(x: f32) -> f32 {
    #[cfg(feature = "std")]
    {
        x.sin()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::sinf(x)
    }
}
