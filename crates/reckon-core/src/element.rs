//! Element arithmetic for extrapolated quantities
//!
//! An extrapolator tracks a vector of `N` elements. Each element only needs
//! the handful of operations below; the extrapolator never looks inside it.
//! All operations write into a caller-owned destination so struct elements
//! can be updated in place and scalars reduce to plain assignment.

/// Arithmetic capability required of an extrapolated element
///
/// Implementations must be deterministic and must not introduce rounding
/// beyond what the underlying numeric type already does.
pub trait Element: Clone {
    /// The additive identity
    fn zero() -> Self;

    /// `out = a + b`
    fn add(out: &mut Self, a: &Self, b: &Self);

    /// `out = a - b`
    fn subtract(out: &mut Self, a: &Self, b: &Self);

    /// `out = a * k`
    fn scale(out: &mut Self, a: &Self, k: f64);

    /// `dst = src`
    #[inline]
    fn assign(dst: &mut Self, src: &Self) {
        dst.clone_from(src);
    }

    /// `dst = 0`
    #[inline]
    fn set_zero(dst: &mut Self) {
        *dst = Self::zero();
    }

    /// `out = base + dir * k`
    #[inline]
    fn add_scaled(out: &mut Self, base: &Self, dir: &Self, k: f64) {
        let mut term = Self::zero();
        Self::scale(&mut term, dir, k);
        Self::add(out, base, &term);
    }

    /// `out = (a - b) * k`
    #[inline]
    fn scaled_difference(out: &mut Self, a: &Self, b: &Self, k: f64) {
        let mut diff = Self::zero();
        Self::subtract(&mut diff, a, b);
        Self::scale(out, &diff, k);
    }
}

impl Element for f64 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn add(out: &mut Self, a: &Self, b: &Self) {
        *out = a + b;
    }

    #[inline]
    fn subtract(out: &mut Self, a: &Self, b: &Self) {
        *out = a - b;
    }

    #[inline]
    fn scale(out: &mut Self, a: &Self, k: f64) {
        *out = a * k;
    }

    #[inline]
    fn assign(dst: &mut Self, src: &Self) {
        *dst = *src;
    }
}

/// Single precision elements scale in `f64` and narrow the product, so the
/// time factor never loses precision before the multiply.
impl Element for f32 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn add(out: &mut Self, a: &Self, b: &Self) {
        *out = a + b;
    }

    #[inline]
    fn subtract(out: &mut Self, a: &Self, b: &Self) {
        *out = a - b;
    }

    #[inline]
    fn scale(out: &mut Self, a: &Self, k: f64) {
        *out = (f64::from(*a) * k) as f32;
    }

    #[inline]
    fn assign(dst: &mut Self, src: &Self) {
        *dst = *src;
    }
}

// Fixed-size arrays behave component-wise, reusing the scalar bindings.
macro_rules! impl_array_element {
    ($scalar:ty) => {
        impl<const N: usize> Element for [$scalar; N] {
            #[inline]
            fn zero() -> Self {
                [0.0; N]
            }

            #[inline]
            fn add(out: &mut Self, a: &Self, b: &Self) {
                for i in 0..N {
                    <$scalar as Element>::add(&mut out[i], &a[i], &b[i]);
                }
            }

            #[inline]
            fn subtract(out: &mut Self, a: &Self, b: &Self) {
                for i in 0..N {
                    <$scalar as Element>::subtract(&mut out[i], &a[i], &b[i]);
                }
            }

            #[inline]
            fn scale(out: &mut Self, a: &Self, k: f64) {
                for i in 0..N {
                    <$scalar as Element>::scale(&mut out[i], &a[i], k);
                }
            }

            #[inline]
            fn assign(dst: &mut Self, src: &Self) {
                *dst = *src;
            }
        }
    };
}

impl_array_element!(f64);
impl_array_element!(f32);
