//! Float helpers that resolve to `std` or `libm` depending on the build.

#[inline]
pub(crate) fn sqrt(x: f32) -> f32 {
    #[cfg(feature = "std")]
    {
        x.sqrt()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::sqrtf(x)
    }
}

#[inline]
pub(crate) fn sin_cos(angle: f32) -> (f32, f32) {
    #[cfg(feature = "std")]
    {
        angle.sin_cos()
    }
    #[cfg(not(feature = "std"))]
    {
        (libm::sinf(angle), libm::cosf(angle))
    }
}

#[inline]
pub(crate) fn atan2(y: f32, x: f32) -> f32 {
    #[cfg(feature = "std")]
    {
        y.atan2(x)
    }
    #[cfg(not(feature = "std"))]
    {
        libm::atan2f(y, x)
    }
}
