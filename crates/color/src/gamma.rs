// Piecewise sRGB-style transfer function: linear below a small knee,
// power curve above it.

pub struct GammaCorrection {
    gamma: f64,
    transition: f64,
    knee: f64,
    slope: f64,
    offset: f64,
}

impl GammaCorrection {
    #[must_use]
    pub const fn new(gamma: f64, transition: f64, knee: f64, slope: f64, offset: f64) -> Self {
        Self {
            gamma,
            transition,
            knee,
            slope,
            offset,
        }
    }

    /// Linear to encoded
    #[must_use]
    pub fn transform(&self, value: f64) -> f64 {
        if value <= self.transition {
            self.slope * value
        } else {
            (1.0 + self.offset).mul_add(value.powf(self.gamma), -self.offset)
        }
    }

    /// Encoded to linear
    #[must_use]
    pub fn inverse(&self, value: f64) -> f64 {
        if value <= self.knee {
            value / self.slope
        } else {
            ((value + self.offset) / (1.0 + self.offset)).powf(1.0 / self.gamma)
        }
    }
}

impl Default for GammaCorrection {
    fn default() -> Self {
        Self::NONE
    }
}

impl GammaCorrection {
    /// Identity mapping ("f(x) -> x"), i.e. no gamma correction
    pub const NONE: Self = Self {
        gamma: 1.0,
        transition: 0.0,
        knee: 0.0,
        slope: 1.0,
        offset: 0.0,
    };

    /// Standard gamma correction for sRGB color space
    pub const SRGB: Self = Self::new(1.0 / 2.4, 0.003_130_8, 0.040_45, 12.92, 0.055);
}
