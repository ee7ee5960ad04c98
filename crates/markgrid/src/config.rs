//! Top-level scan configuration.

use crate::detect::CornerDetectConfig;
use crate::resolve::ResolveConfig;

/// All pipeline tunables in one place.
///
/// Defaults mirror the values the engine was tuned with in the field; they
/// are empirical, not laws. Construct with `ScanConfig::default()` and
/// override individual fields as needed.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum decoded width in pixels; wider inputs are downscaled.
    /// Bounds the cost of every later full-frame scan.
    pub max_decode_width: u32,
    /// Corner marker detection controls.
    pub corner: CornerDetectConfig,
    /// Bubble resolution and confidence-gate controls.
    pub resolve: ResolveConfig,
    /// Inset (pixels) of the fallback rectangle used when corner detection
    /// fails.
    pub fallback_margin_px: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_decode_width: 800,
            corner: CornerDetectConfig::default(),
            resolve: ResolveConfig::default(),
            fallback_margin_px: 40.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_stable() {
        let cfg = ScanConfig::default();
        assert_eq!(cfg.max_decode_width, 800);
        assert_eq!(cfg.corner.scan_stride, 4);
        assert!((cfg.corner.darkness_threshold - 100.0).abs() < 1e-9);
        assert_eq!(cfg.corner.min_box_score, 5);
        assert!((cfg.resolve.darkness_threshold - 180.0).abs() < 1e-9);
        assert!((cfg.resolve.min_gap - 15.0).abs() < 1e-9);
        assert!((cfg.resolve.sample_radius_frac - 0.02).abs() < 1e-12);
        assert!((cfg.fallback_margin_px - 40.0).abs() < 1e-9);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: ScanConfig =
            serde_json::from_str(r#"{"resolve": {"min_gap": 20.0}}"#).expect("partial config");
        assert!((cfg.resolve.min_gap - 20.0).abs() < 1e-9);
        assert!((cfg.resolve.darkness_threshold - 180.0).abs() < 1e-9);
        assert_eq!(cfg.max_decode_width, 800);
    }
}
