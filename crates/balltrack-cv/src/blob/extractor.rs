//! Mask to blob reduction using outer contours

use super::{min_enclosing_circle, Blob, BlobCollection, BlobConfig};
use crate::Mask;
use image::imageops;
use imageproc::contours::{self, BorderType, Contour};

/// Finds external regions of a mask and reduces them to circles
#[derive(Debug, Clone, Default)]
pub struct BlobExtractor {
    config: BlobConfig,
}

impl BlobExtractor {
    pub fn new(config: BlobConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BlobConfig {
        &self.config
    }

    /// Blobs in discovery order.
    ///
    /// Only top-level outer borders count: holes and regions nested inside
    /// holes are ignored.
    pub fn extract(&self, mask: &Mask) -> BlobCollection {
        if mask.width() == 0 || mask.height() == 0 {
            return BlobCollection::new();
        }

        // Border following treats a region touching (0, 0) as a hole, so trace
        // inside a one-pixel background frame and shift the points back.
        let mut padded = Mask::new(mask.width() + 2, mask.height() + 2);
        imageops::replace(&mut padded, mask, 1, 1);

        contours::find_contours::<i32>(&padded)
            .into_iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
            .filter_map(|c| self.reduce(&c))
            .collect()
    }

    fn reduce(&self, contour: &Contour<i32>) -> Option<Blob> {
        let points: Vec<(f64, f64)> = contour
            .points
            .iter()
            .map(|p| ((p.x - 1) as f64, (p.y - 1) as f64))
            .collect();

        let area = polygon_area(&points);
        if area <= self.config.min_area {
            return None;
        }

        let circle = min_enclosing_circle(&points)?;
        if circle.radius <= self.config.min_radius {
            return None;
        }

        Some(Blob::new(circle.center, circle.radius, area))
    }
}

/// Shoelace area of a closed polygon given by its vertices.
pub fn polygon_area(points: &[(f64, f64)]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let twice: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.0 * b.1 - b.0 * a.1)
        .sum();

    twice.abs() / 2.0
}
