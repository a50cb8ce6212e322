//! Target-dimension planning.
//!
//! Given the source dimensions and a pixel-area budget, compute the target
//! width and height that preserve the aspect ratio while approximating the
//! budget, and decide whether resampling is needed at all. Thumbnailing
//! only reduces size: a budget that does not shrink the image results in a
//! pass-through, never an upscale.

use crate::pipeline::ThumbnailError;

/// Outcome of dimension planning for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePlan {
    /// The budget does not shrink the image; use the source raster as-is.
    PassThrough,
    /// Resample into a fresh raster of the given dimensions.
    Resample { width: u32, height: u32 },
}

/// Compute target dimensions for a pixel-area budget.
///
/// `target_width = floor(sqrt(budget * aspect))` and
/// `target_height = floor(budget / target_width)`, where
/// `aspect = src_width / src_height`. The product approximates the budget
/// to within one pixel per axis (integer truncation), and the ratio of the
/// results matches the source aspect ratio to within rounding.
///
/// Deterministic, no hidden state.
///
/// # Errors
///
/// Returns [`ThumbnailError::InvalidInput`] if either source dimension or
/// the budget is zero, or if the computed target width or height would be
/// zero.
pub fn plan_dimensions(
    src_width: u32,
    src_height: u32,
    target_pixels: u64,
) -> Result<ResizePlan, ThumbnailError> {
    if src_width == 0 || src_height == 0 {
        return Err(ThumbnailError::InvalidInput {
            reason: format!("source dimensions must be positive, got {src_width}x{src_height}"),
        });
    }
    if target_pixels == 0 {
        return Err(ThumbnailError::InvalidInput {
            reason: "target pixel budget must be positive".to_string(),
        });
    }

    let aspect = f64::from(src_width) / f64::from(src_height);
    let target_width = (target_pixels as f64 * aspect).sqrt().floor() as u64;
    if target_width == 0 {
        return Err(ThumbnailError::InvalidInput {
            reason: format!(
                "pixel budget {target_pixels} is too small for aspect ratio {src_width}:{src_height}"
            ),
        });
    }
    let target_height = (target_pixels as f64 / target_width as f64).floor() as u64;
    if target_height == 0 {
        return Err(ThumbnailError::InvalidInput {
            reason: format!(
                "pixel budget {target_pixels} is too small for aspect ratio {src_width}:{src_height}"
            ),
        });
    }

    if target_width >= u64::from(src_width) {
        return Ok(ResizePlan::PassThrough);
    }

    Ok(ResizePlan::Resample {
        width: target_width as u32,
        height: target_height as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_4000x3000_at_300k() {
        // aspect 4:3, budget 300 000 -> 632x474 (299 568 pixels)
        let plan = plan_dimensions(4000, 3000, 300_000).unwrap();
        assert_eq!(
            plan,
            ResizePlan::Resample {
                width: 632,
                height: 474
            }
        );
    }

    #[test]
    fn test_plan_preserves_aspect_ratio() {
        for &(w, h) in &[(4000u32, 3000u32), (1920, 1080), (3000, 4000), (5000, 5000)] {
            let plan = plan_dimensions(w, h, 300_000).unwrap();
            let ResizePlan::Resample { width, height } = plan else {
                panic!("expected resample for {}x{}", w, h);
            };
            let src_aspect = f64::from(w) / f64::from(h);
            let dst_aspect = f64::from(width) / f64::from(height);
            assert!(
                (src_aspect - dst_aspect).abs() < 0.01,
                "{}x{} -> {}x{} distorts aspect",
                w,
                h,
                width,
                height
            );
        }
    }

    #[test]
    fn test_plan_area_approximates_budget() {
        for &budget in &[10_000u64, 300_000, 2_000_000] {
            let plan = plan_dimensions(6000, 4000, budget).unwrap();
            let ResizePlan::Resample { width, height } = plan else {
                panic!("expected resample");
            };
            let area = u64::from(width) * u64::from(height);
            // floor() on each axis loses at most one pixel per axis
            assert!(area <= budget);
            assert!(area > budget - u64::from(width), "area {area} too far under budget {budget}");
        }
    }

    #[test]
    fn test_plan_pass_through_when_budget_exceeds_source() {
        // 100x100 source, 300 000 pixel budget: target width would be
        // >= source width, so the planner bypasses resampling.
        assert_eq!(
            plan_dimensions(100, 100, 300_000).unwrap(),
            ResizePlan::PassThrough
        );
    }

    #[test]
    fn test_plan_pass_through_at_equal_size() {
        assert_eq!(
            plan_dimensions(100, 100, 10_000).unwrap(),
            ResizePlan::PassThrough
        );
    }

    #[test]
    fn test_plan_zero_inputs_rejected() {
        assert!(matches!(
            plan_dimensions(0, 100, 1000),
            Err(ThumbnailError::InvalidInput { .. })
        ));
        assert!(matches!(
            plan_dimensions(100, 0, 1000),
            Err(ThumbnailError::InvalidInput { .. })
        ));
        assert!(matches!(
            plan_dimensions(100, 100, 0),
            Err(ThumbnailError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_plan_degenerate_budget_rejected() {
        // A tall, narrow source with a tiny budget floors the target width
        // to zero.
        assert!(matches!(
            plan_dimensions(1, 10_000, 10),
            Err(ThumbnailError::InvalidInput { .. })
        ));
    }
}
