use artwork_model::{Orientation, SizeClass};
use serde::Serialize;

/// Integer pixel size of an artwork inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Fraction of the limiting container dimension an artwork may occupy.
pub fn size_factor(orientation: Orientation, size: SizeClass) -> f64 {
    match orientation {
        Orientation::Portrait => match size {
            SizeClass::Xl => 1.0,
            SizeClass::Lg => 0.85,
            SizeClass::Md => 0.7,
            SizeClass::Sm => 0.55,
        },
        Orientation::Landscape => match size {
            SizeClass::Xl => 1.0,
            SizeClass::Lg => 0.9,
            SizeClass::Md => 0.75,
            SizeClass::Sm => 0.6,
        },
        Orientation::Square => match size {
            SizeClass::Xl => 0.95,
            SizeClass::Lg => 0.8,
            SizeClass::Md => 0.65,
            SizeClass::Sm => 0.5,
        },
    }
}

/// Fits an artwork of the given aspect ratio (width / height) into a container
/// while preserving the ratio.
///
/// Portrait and landscape pieces are limited by whichever container side is
/// tighter relative to the image; square pieces are limited by the shorter
/// container side. The result never exceeds the container.
pub fn fit(
    aspect_ratio: f64,
    orientation: Orientation,
    size: SizeClass,
    container_w: f64,
    container_h: f64,
) -> Dimensions {
    let cw = sanitize(container_w);
    let ch = sanitize(container_h);
    if cw == 0.0 || ch == 0.0 {
        return Dimensions { width: 0, height: 0 };
    }
    let ar = if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        aspect_ratio
    } else {
        1.0
    };
    let factor = size_factor(orientation, size);

    let (mut w, mut h) = match orientation {
        Orientation::Portrait | Orientation::Landscape => {
            if cw / ch > ar {
                let h = ch * factor;
                (h * ar, h)
            } else {
                let w = cw * factor;
                (w, w / ar)
            }
        }
        Orientation::Square => {
            let limit = cw.min(ch) * factor;
            if ar >= 1.0 {
                (limit, limit / ar)
            } else {
                (limit * ar, limit)
            }
        }
    };

    if w > cw {
        h *= cw / w;
        w = cw;
    }
    if h > ch {
        w *= ch / h;
        h = ch;
    }

    Dimensions {
        width: w.round().clamp(0.0, cw) as u32,
        height: h.round().clamp(0.0, ch) as u32,
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_aspect_preserved(ar: f64, dims: Dimensions) {
        let r = f64::from(dims.width) / f64::from(dims.height);
        assert!((r - ar).abs() < 0.01, "aspect changed: {} vs {}", ar, r);
    }

    #[test]
    fn landscape_in_wide_container_is_height_limited() {
        let dims = fit(1.5, Orientation::Landscape, SizeClass::Xl, 2000.0, 800.0);
        assert_eq!(dims, Dimensions { width: 1200, height: 800 });
        assert_aspect_preserved(1.5, dims);
    }

    #[test]
    fn portrait_in_square_container_is_height_limited() {
        let dims = fit(0.75, Orientation::Portrait, SizeClass::Lg, 800.0, 800.0);
        // 800 * 0.85 = 680 tall, 510 wide
        assert_eq!(dims, Dimensions { width: 510, height: 680 });
    }

    #[test]
    fn landscape_in_tall_container_is_width_limited() {
        let dims = fit(2.0, Orientation::Landscape, SizeClass::Md, 400.0, 1000.0);
        assert_eq!(dims, Dimensions { width: 300, height: 150 });
    }

    #[test]
    fn square_uses_shorter_side() {
        let dims = fit(1.0, Orientation::Square, SizeClass::Sm, 1000.0, 600.0);
        assert_eq!(dims, Dimensions { width: 300, height: 300 });
    }

    #[test]
    fn square_tag_with_wide_image_fits_box() {
        let dims = fit(2.0, Orientation::Square, SizeClass::Lg, 500.0, 500.0);
        assert_eq!(dims, Dimensions { width: 400, height: 200 });
    }

    #[test]
    fn extreme_ratio_never_exceeds_container() {
        let dims = fit(50.0, Orientation::Portrait, SizeClass::Xl, 300.0, 300.0);
        assert!(dims.width <= 300 && dims.height <= 300);
        let dims = fit(0.01, Orientation::Landscape, SizeClass::Xl, 300.0, 300.0);
        assert!(dims.width <= 300 && dims.height <= 300);
    }

    #[test]
    fn invalid_ratio_defaults_to_square() {
        let dims = fit(f64::NAN, Orientation::Square, SizeClass::Xl, 200.0, 200.0);
        assert_eq!(dims, Dimensions { width: 190, height: 190 });
    }

    #[test]
    fn empty_container_yields_zero() {
        let dims = fit(1.0, Orientation::Square, SizeClass::Xl, 0.0, 400.0);
        assert_eq!(dims, Dimensions { width: 0, height: 0 });
    }
}
