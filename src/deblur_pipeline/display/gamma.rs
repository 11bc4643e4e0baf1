use crate::deblur_pipeline::io::types::FloatImage;

pub const DEFAULT_GAMMA: f32 = 0.9;

/// `clip(x, 0, 1) ^ gamma`
pub fn gamma_value(value: f32, gamma: f32) -> f32 {
    value.clamp(0.0, 1.0).powf(gamma)
}

/// Element-wise power-law remap for display.
pub fn adjust_gamma(image: &FloatImage, gamma: f32) -> FloatImage {
    image.map(|v| gamma_value(v, gamma))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_points() {
        for &gamma in &[0.1, 0.9, 1.0, 2.2, 7.5] {
            assert_eq!(gamma_value(0.0, gamma), 0.0);
            assert_eq!(gamma_value(1.0, gamma), 1.0);
        }
    }

    #[test]
    fn test_clips_before_remap() {
        assert_eq!(gamma_value(-0.3, DEFAULT_GAMMA), 0.0);
        assert_eq!(gamma_value(1.7, DEFAULT_GAMMA), 1.0);
    }

    #[test]
    fn test_brightens_midtones_below_one() {
        let v = gamma_value(0.25, DEFAULT_GAMMA);
        assert!(v > 0.25 && v < 1.0);
        assert!((v - 0.25f32.powf(0.9)).abs() < 1e-7);
    }

    #[test]
    fn test_adjust_gamma_maps_every_channel() {
        let image = FloatImage::filled(3, 4, 0.5).unwrap();
        let adjusted = adjust_gamma(&image, 2.0);
        for channel in adjusted.channels() {
            assert!(channel.iter().all(|&v| (v - 0.25).abs() < 1e-7));
        }
    }
}
