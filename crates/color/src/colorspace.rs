// Wide gamut RGB (D65) conversion matrices, see:
//
//   https://github.com/usolved/cie-rgb-converter

#[derive(Clone, Debug)]
pub struct Matrix3(pub [f64; 3 * 3]);

impl Matrix3 {
    #[allow(clippy::suboptimal_flops)]
    #[must_use]
    pub fn mult(&self, d: [f64; 3]) -> [f64; 3] {
        let m = self.0;
        let cx = d[0] * m[0] + d[1] * m[1] + d[2] * m[2];
        let cy = d[0] * m[3] + d[1] * m[4] + d[2] * m[5];
        let cz = d[0] * m[6] + d[1] * m[7] + d[2] * m[8];
        [cx, cy, cz]
    }
}

pub struct ColorSpace {
    rgb: Matrix3,
    xyz: Matrix3,
}

impl ColorSpace {
    #[must_use]
    pub fn xyz_to_rgb(&self, x: f64, y: f64, z: f64) -> [f64; 3] {
        self.rgb.mult([x, y, z])
    }

    #[must_use]
    pub fn rgb_to_xyz(&self, r: f64, g: f64, b: f64) -> [f64; 3] {
        self.xyz.mult([r, g, b])
    }

    /// Chromaticity of an rgb triple. Black has no chromaticity and maps to
    /// the origin.
    #[allow(clippy::many_single_char_names)]
    #[must_use]
    pub fn rgb_to_xy(&self, r: f64, g: f64, b: f64) -> [f64; 2] {
        let [cx, cy, cz] = self.rgb_to_xyz(r, g, b);
        let sum = cx + cy + cz;

        if sum == 0.0 {
            [0.0, 0.0]
        } else {
            [cx / sum, cy / sum]
        }
    }

    #[allow(non_snake_case)]
    #[must_use]
    pub fn xyy_to_rgb(&self, x: f64, y: f64, Y: f64) -> [f64; 3] {
        let z = 1.0 - x - y;
        self.xyz_to_rgb((Y / y) * x, Y, (Y / y) * z)
    }
}

/// Wide gamut RGB with D65 white point
pub const WIDE_D65: ColorSpace = ColorSpace {
    rgb: Matrix3([
        1.656_492, -0.354_851, -0.255_038, //
        -0.707_196, 1.655_397, 0.036_152, //
        0.051_713, -0.121_364, 1.011_53, //
    ]),
    xyz: Matrix3([
        0.664_511, 0.154_324, 0.162_028, //
        0.283_881, 0.668_433, 0.047_685, //
        0.000_088, 0.072_31, 0.986_039, //
    ]),
};
