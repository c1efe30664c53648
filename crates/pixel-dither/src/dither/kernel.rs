//! Diffusion weights for error-diffusion dithering.

/// One neighbor that receives a share of the quantization error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tap {
    /// Column offset from the current pixel.
    pub dx: i32,
    /// Row offset from the current pixel; never negative.
    pub dy: u32,
    /// Share numerator; the denominator is [`Kernel::divisor`].
    pub weight: u8,
}

impl Tap {
    const fn new(dx: i32, dy: u32, weight: u8) -> Self {
        Self { dx, dy, weight }
    }
}

/// A fixed set of taps plus the common denominator of their weights.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    pub taps: &'static [Tap],
    pub divisor: u8,
}

impl Kernel {
    /// How many rows below the current one the kernel writes into.
    pub fn reach(&self) -> usize {
        self.taps.iter().map(|t| t.dy as usize).max().unwrap_or(0)
    }

    /// Share of the error handed to `tap`, in `0.0..=1.0`.
    #[inline]
    pub fn share(&self, tap: &Tap) -> f32 {
        f32::from(tap.weight) / f32::from(self.divisor)
    }

    /// Total share of the error the kernel passes on.
    pub fn total_share(&self) -> f32 {
        self.taps.iter().map(|t| self.share(t)).sum()
    }
}

/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    taps: &[
        Tap::new(1, 0, 7),
        Tap::new(-1, 1, 3),
        Tap::new(0, 1, 5),
        Tap::new(1, 1, 1),
    ],
    divisor: 16,
};
