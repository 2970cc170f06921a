// THEORY:
// The `region` module is the spatial grouping stage. It takes the binary mask from
// the `hsv` stage and turns it into candidate regions, each summarised by its
// bounding box and area.
//
// Algorithm:
// 1.  **Border Following**: `imageproc::contours::find_contours` traces every border
//     in the mask, outer borders and hole borders alike, with a parent link for
//     nesting.
// 2.  **External Only**: Only outer borders without a parent are kept. Anything
//     sitting inside another region's hole belongs to that region, not to a
//     candidate of its own.
// 3.  **Polygon Area**: The area of a region is the area of the polygon through its
//     border points (shoelace formula). Holes are part of that polygon, so a hollow
//     ring counts as big as the disc it outlines.
//
// Contours come back in raster order of their first border pixel, and ties in
// `largest_region` keep the earlier one.

use image::GrayImage;
use imageproc::contours::{BorderType, Contour, find_contours};
use imageproc::point::Point;

/// Axis-aligned box enclosing a region, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Vertical centre, rounded down the same way integer pixel maths does.
    pub fn center_y(&self) -> u32 {
        self.y + self.height / 2
    }
}

/// One external contour of the mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub bounding_box: BoundingBox,
    /// Area enclosed by the contour polygon, in square pixels.
    pub area: f64,
}

/// Extracts the external contours of the mask, ordered by the raster position of
/// their first border pixel. Any non-zero mask value counts as selected.
pub fn find_regions(mask: &GrayImage) -> Vec<Region> {
    find_contours::<i32>(mask)
        .iter()
        .filter(|contour| matches!(contour.border_type, BorderType::Outer) && contour.parent.is_none())
        .filter_map(region_from_contour)
        .collect()
}

fn region_from_contour(contour: &Contour<i32>) -> Option<Region> {
    let first = contour.points.first()?;
    let (min_x, max_x, min_y, max_y) = contour.points.iter().fold(
        (first.x, first.x, first.y, first.y),
        |(min_x, max_x, min_y, max_y), point| {
            (min_x.min(point.x), max_x.max(point.x), min_y.min(point.y), max_y.max(point.y))
        },
    );

    Some(Region {
        bounding_box: BoundingBox {
            x: u32::try_from(min_x).ok()?,
            y: u32::try_from(min_y).ok()?,
            width: u32::try_from(max_x - min_x + 1).ok()?,
            height: u32::try_from(max_y - min_y + 1).ok()?,
        },
        area: polygon_area(&contour.points),
    })
}

/// Shoelace area of a closed polygon. Degenerate outlines (a dot, a line) give zero.
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    let Some(last) = points.last() else {
        return 0.0;
    };
    let twice: i64 = std::iter::once(last)
        .chain(points.iter())
        .zip(points.iter())
        .map(|(a, b)| i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y))
        .sum();
    twice.abs() as f64 / 2.0
}

/// The region with the largest area. Ties go to the region found first.
pub fn largest_region(regions: &[Region]) -> Option<&Region> {
    regions.iter().fold(None, |best: Option<&Region>, region| match best {
        Some(current) if current.area >= region.area => Some(current),
        _ => Some(region),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn fill(mask: &mut GrayImage, x: u32, y: u32, w: u32, h: u32) {
        for py in y..y + h {
            for px in x..x + w {
                mask.put_pixel(px, py, Luma([255]));
            }
        }
    }

    fn mask_with_rects(width: u32, height: u32, rects: &[(u32, u32, u32, u32)]) -> GrayImage {
        let mut mask = GrayImage::new(width, height);
        for &(x, y, w, h) in rects {
            fill(&mut mask, x, y, w, h);
        }
        mask
    }

    /// A square outline of side `side` with walls `wall` pixels thick.
    fn draw_ring(mask: &mut GrayImage, x: u32, y: u32, side: u32, wall: u32) {
        fill(mask, x, y, side, wall);
        fill(mask, x, y + side - wall, side, wall);
        fill(mask, x, y, wall, side);
        fill(mask, x + side - wall, y, wall, side);
    }

    #[test]
    fn empty_mask_has_no_regions() {
        let mask = GrayImage::new(32, 24);
        let regions = find_regions(&mask);
        assert!(regions.is_empty());
        assert!(largest_region(&regions).is_none());
    }

    #[test]
    fn single_rectangle_is_recovered_exactly() {
        let mask = mask_with_rects(64, 48, &[(10, 20, 8, 6)]);
        let regions = find_regions(&mask);

        assert_eq!(regions.len(), 1);
        let region = &regions[0];
        assert_eq!(
            region.bounding_box,
            BoundingBox { x: 10, y: 20, width: 8, height: 6 }
        );
        // The polygon runs through border pixel centres: 7 x 5.
        assert_eq!(region.area, 35.0);
        assert_eq!(region.bounding_box.center_y(), 23);
    }

    #[test]
    fn odd_height_center_rounds_down() {
        let bounding_box = BoundingBox { x: 0, y: 5, width: 3, height: 7 };
        assert_eq!(bounding_box.center_y(), 8);
    }

    #[test]
    fn diagonal_line_is_one_flat_region() {
        let mut mask = GrayImage::new(5, 5);
        for i in 0..5 {
            mask.put_pixel(i, i, Luma([255]));
        }
        let regions = find_regions(&mask);

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].area, 0.0);
        assert_eq!(
            regions[0].bounding_box,
            BoundingBox { x: 0, y: 0, width: 5, height: 5 }
        );
    }

    #[test]
    fn separate_blobs_are_reported_in_raster_order() {
        let mask = mask_with_rects(40, 40, &[(30, 2, 4, 4), (2, 10, 10, 10)]);
        let regions = find_regions(&mask);

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].bounding_box.x, 30);
        assert_eq!(regions[1].bounding_box.x, 2);

        let largest = largest_region(&regions).unwrap();
        assert_eq!(largest.area, 81.0);
        assert_eq!(largest.bounding_box.center_y(), 15);
    }

    #[test]
    fn ties_go_to_the_first_region() {
        let mask = mask_with_rects(40, 20, &[(1, 1, 3, 3), (20, 10, 3, 3)]);
        let regions = find_regions(&mask);

        let largest = largest_region(&regions).unwrap();
        assert_eq!(largest.bounding_box.x, 1);
    }

    #[test]
    fn hollow_ring_outranks_a_solid_square_with_more_pixels() {
        let mut mask = GrayImage::new(64, 140);
        // 30 x 30 ring with 2 px walls: 224 pixels, outline area 29 x 29.
        draw_ring(&mut mask, 10, 10, 30, 2);
        // 16 x 16 solid square: 256 pixels, outline area 15 x 15.
        fill(&mut mask, 10, 100, 16, 16);

        let regions = find_regions(&mask);
        assert_eq!(regions.len(), 2);

        let largest = largest_region(&regions).unwrap();
        assert_eq!(largest.area, 841.0);
        assert_eq!(largest.bounding_box.center_y(), 25);
    }

    #[test]
    fn blob_inside_a_hole_is_not_a_separate_region() {
        let mut mask = GrayImage::new(64, 64);
        draw_ring(&mut mask, 10, 10, 30, 2);
        fill(&mut mask, 18, 18, 10, 10);

        let regions = find_regions(&mask);
        assert_eq!(regions.len(), 1);
        assert_eq!(
            regions[0].bounding_box,
            BoundingBox { x: 10, y: 10, width: 30, height: 30 }
        );
    }

    #[test]
    fn shoelace_area_of_a_triangle() {
        let points = [Point::new(0, 0), Point::new(4, 0), Point::new(0, 3)];
        assert_eq!(polygon_area(&points), 6.0);
        assert_eq!(polygon_area(&[]), 0.0);
        assert_eq!(polygon_area(&[Point::new(2, 2)]), 0.0);
    }
}
