/// Trait for mapping a value from one scale to another.
pub trait Scalable {
    /// Maps `self` from the `[from_low, from_high]` scale onto the `[to_low, to_high]` one.
    ///
    /// Values outside the originating scale are extrapolated, not clamped: easing curves
    /// (back, elastic) rely on it to overshoot their target.
    fn scale(self, from_low: Self, from_high: Self, to_low: Self, to_high: Self) -> Self;
}

macro_rules! impl_from_scalable {
    ($($variant:ty),*) => {
        $(
            impl Scalable for $variant {
                fn scale(self, from_low: Self, from_high: Self, to_low: Self, to_high: Self) -> Self {
                    if from_high == from_low {
                        return to_high;
                    }
                    ((self as f64 - from_low as f64) * (to_high as f64 - to_low as f64)
                        / (from_high as f64 - from_low as f64)
                        + to_low as f64) as Self
                }
            }
        )*
    };
}

impl_from_scalable!(u64, i64, f32, f64);
