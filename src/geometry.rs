use crate::models::{NormalizedBox, PixelBox};

/// Gap between a box edge and its caption, in pixels.
pub const CAPTION_MARGIN: i32 = 5;

/// Map a normalized center/size box onto a concrete image.
///
/// Raw corners are computed first and truncated toward zero; clamping to the
/// image bounds happens only afterwards, so an off-image box keeps its shape
/// up to the crop. A non-positive width or height collapses to a zero-area
/// box rather than erroring.
pub fn to_pixel_box(bbox: &NormalizedBox, image_width: u32, image_height: u32) -> PixelBox {
    let x_c = bbox.x_center * f64::from(image_width);
    let y_c = bbox.y_center * f64::from(image_height);
    let bw = bbox.width * f64::from(image_width);
    let bh = bbox.height * f64::from(image_height);

    let x1 = ((x_c - bw / 2.0) as i32).clamp(0, image_width as i32);
    let y1 = ((y_c - bh / 2.0) as i32).clamp(0, image_height as i32);
    let x2 = ((x_c + bw / 2.0) as i32).clamp(0, image_width as i32);
    let y2 = ((y_c + bh / 2.0) as i32).clamp(0, image_height as i32);

    PixelBox {
        x1,
        y1,
        x2: x2.max(x1),
        y2: y2.max(y1),
    }
}

/// Bottom-left anchor for a caption of `text_size` pixels near `bbox`.
///
/// Default is just above the box's top-left corner. If that would clip at
/// the top of the image the caption flips below the box's top edge; if its
/// right edge would leave the image it is shifted left flush with the
/// border. Both corrections are independent and may apply together. The
/// final clamp keeps `anchor_x >= 0` and `anchor_y >= text_h`.
pub fn place_caption(
    bbox: &PixelBox,
    text_size: (i32, i32),
    image_width: u32,
    _image_height: u32,
) -> (i32, i32) {
    let (text_w, text_h) = text_size;

    let mut anchor_x = bbox.x1;
    let mut anchor_y = bbox.y1 - CAPTION_MARGIN;

    if anchor_y - text_h < 0 {
        anchor_y = bbox.y1 + text_h + CAPTION_MARGIN;
    }
    if anchor_x + text_w > image_width as i32 {
        anchor_x = image_width as i32 - text_w;
    }

    (anchor_x.max(0), anchor_y.max(text_h))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(x_center: f64, y_center: f64, width: f64, height: f64) -> NormalizedBox {
        NormalizedBox {
            x_center,
            y_center,
            width,
            height,
        }
    }

    #[test]
    fn centered_box_maps_to_expected_pixels() {
        let pixel = to_pixel_box(&norm(0.5, 0.5, 0.2, 0.4), 100, 100);
        assert_eq!(
            pixel,
            PixelBox {
                x1: 40,
                y1: 30,
                x2: 60,
                y2: 70
            }
        );
    }

    #[test]
    fn oversized_box_is_clamped_after_corner_computation() {
        let pixel = to_pixel_box(&norm(0.5, 0.5, 1.4, 1.4), 100, 100);
        assert_eq!(
            pixel,
            PixelBox {
                x1: 0,
                y1: 0,
                x2: 100,
                y2: 100
            }
        );
    }

    #[test]
    fn off_image_center_yields_edge_box() {
        let pixel = to_pixel_box(&norm(1.2, -0.1, 0.2, 0.2), 100, 100);
        assert!(pixel.x1 <= pixel.x2 && pixel.y1 <= pixel.y2);
        assert_eq!(pixel.x1, 100);
        assert_eq!(pixel.x2, 100);
        assert_eq!(pixel.y1, 0);
        assert_eq!(pixel.y2, 0);
    }

    #[test]
    fn degenerate_size_collapses_to_zero_area() {
        let pixel = to_pixel_box(&norm(0.5, 0.5, -0.2, 0.0), 100, 100);
        assert_eq!(pixel.width(), 0);
        assert_eq!(pixel.height(), 0);
    }

    #[test]
    fn output_stays_inside_image_for_varied_inputs() {
        let cases = [
            norm(0.0, 0.0, 0.5, 0.5),
            norm(1.0, 1.0, 0.5, 0.5),
            norm(0.5, 0.5, 2.0, 2.0),
            norm(-0.3, 0.5, 0.1, 0.1),
            norm(0.5, 1.3, 0.4, 0.4),
        ];
        for bbox in cases {
            let pixel = to_pixel_box(&bbox, 640, 480);
            assert!(0 <= pixel.x1 && pixel.x1 <= pixel.x2 && pixel.x2 <= 640, "{pixel:?}");
            assert!(0 <= pixel.y1 && pixel.y1 <= pixel.y2 && pixel.y2 <= 480, "{pixel:?}");
        }
    }

    #[test]
    fn roundtrip_reproduces_box_within_one_pixel() {
        let original = PixelBox {
            x1: 40,
            y1: 30,
            x2: 60,
            y2: 70,
        };
        let (w, h) = (100u32, 100u32);
        let bbox = norm(
            f64::from(original.x1 + original.x2) / 2.0 / f64::from(w),
            f64::from(original.y1 + original.y2) / 2.0 / f64::from(h),
            f64::from(original.width()) / f64::from(w),
            f64::from(original.height()) / f64::from(h),
        );
        let back = to_pixel_box(&bbox, w, h);
        assert!((back.x1 - original.x1).abs() <= 1);
        assert!((back.y1 - original.y1).abs() <= 1);
        assert!((back.x2 - original.x2).abs() <= 1);
        assert!((back.y2 - original.y2).abs() <= 1);
    }

    #[test]
    fn caption_sits_above_top_left_by_default() {
        let bbox = PixelBox {
            x1: 40,
            y1: 30,
            x2: 60,
            y2: 70,
        };
        let (x, y) = place_caption(&bbox, (20, 10), 200, 100);
        assert_eq!((x, y), (40, 25));
    }

    #[test]
    fn caption_flips_below_when_clipped_at_top() {
        let bbox = PixelBox {
            x1: 0,
            y1: 2,
            x2: 40,
            y2: 60,
        };
        let (x, y) = place_caption(&bbox, (50, 10), 200, 100);
        assert_eq!(x, 0);
        assert_eq!(y, 17);
        assert!(y >= 10);
    }

    #[test]
    fn caption_shifts_left_at_right_edge() {
        let bbox = PixelBox {
            x1: 180,
            y1: 50,
            x2: 195,
            y2: 80,
        };
        let (x, y) = place_caption(&bbox, (50, 10), 200, 100);
        assert_eq!(x, 150);
        assert_eq!(y, 45);
    }

    #[test]
    fn caption_stays_inside_image_when_it_fits() {
        let boxes = [
            PixelBox { x1: 0, y1: 0, x2: 10, y2: 10 },
            PixelBox { x1: 190, y1: 0, x2: 200, y2: 20 },
            PixelBox { x1: 100, y1: 95, x2: 140, y2: 100 },
            PixelBox { x1: 0, y1: 50, x2: 200, y2: 100 },
        ];
        let (text_w, text_h) = (60, 12);
        for bbox in boxes {
            let (x, y) = place_caption(&bbox, (text_w, text_h), 200, 100);
            assert!(x >= 0, "{bbox:?}");
            assert!(y >= text_h, "{bbox:?}");
            assert!(x + text_w <= 200, "{bbox:?}");
        }
    }
}
