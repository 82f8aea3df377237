/// RGBA color in linear space with values in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit sRGB components
    pub fn from_srgb8(r: u8, g: u8, b: u8) -> Self {
        fn srgb_to_linear(c: u8) -> f32 {
            let x = c as f32 / 255.0;
            if x <= 0.04045 {
                x / 12.92
            } else {
                ((x + 0.055) / 1.055).powf(2.4)
            }
        }

        Self::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), 1.0)
    }

    pub fn from_catppuccin(color: &catppuccin::Color) -> Self {
        Self::from_srgb8(color.rgb.r, color.rgb.g, color.rgb.b)
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<Color> for wgpu::Color {
    fn from(color: Color) -> Self {
        wgpu::Color {
            r: color.r as f64,
            g: color.g as f64,
            b: color.b as f64,
            a: color.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srgb_endpoints() {
        assert_eq!(Color::from_srgb8(0, 0, 0), Color::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(Color::from_srgb8(255, 255, 255), Color::new(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn test_srgb_midpoint_is_darker_in_linear() {
        let gray = Color::from_srgb8(128, 128, 128);
        assert!(gray.r > 0.2 && gray.r < 0.25);
    }

    #[test]
    fn test_with_alpha() {
        let c = Color::from_srgb8(10, 20, 30).with_alpha(0.3);
        assert_eq!(c.a, 0.3);
        assert_eq!(c.to_array()[3], 0.3);
    }
}
