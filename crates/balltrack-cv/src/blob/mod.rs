//! Blob extraction and blob collections
//!
//! A blob is a connected, area-filtered mask region reduced to its minimum
//! enclosing circle.

pub mod enclosing;
pub mod extractor;

pub use enclosing::{min_enclosing_circle, Circle};
pub use extractor::BlobExtractor;

use serde::{Deserialize, Serialize};

/// Circle descriptor of one mask region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Blob {
    /// Center in pixel coordinates (x, y)
    pub center: (f64, f64),
    /// Enclosing radius in pixels
    pub radius: f64,
    /// Polygon area of the region's outer contour
    pub area: f64,
}

impl Blob {
    pub fn new(center: (f64, f64), radius: f64, area: f64) -> Self {
        Self {
            center,
            radius,
            area,
        }
    }
}

/// Extraction thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobConfig {
    /// Regions with contour area at or below this are dropped
    pub min_area: f64,
    /// Regions whose enclosing radius is at or below this are dropped
    pub min_radius: f64,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            min_area: 50.0,
            min_radius: 5.0,
        }
    }
}

/// Blobs in discovery order (raster order of each region's first pixel)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlobCollection {
    blobs: Vec<Blob>,
}

impl BlobCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(blobs: Vec<Blob>) -> Self {
        Self { blobs }
    }

    pub fn push(&mut self, blob: Blob) {
        self.blobs.push(blob);
    }

    pub fn as_slice(&self) -> &[Blob] {
        &self.blobs
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// First discovered blob; not ranked by size or shape.
    pub fn first(&self) -> Option<&Blob> {
        self.blobs.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Blob> {
        self.blobs.iter()
    }

    pub fn stats(&self) -> BlobStats {
        let mut total_radius = 0.0;
        let mut max_radius: f64 = 0.0;
        let mut total_area = 0.0;

        for blob in &self.blobs {
            total_radius += blob.radius;
            max_radius = max_radius.max(blob.radius);
            total_area += blob.area;
        }

        let mean_radius = if self.blobs.is_empty() {
            0.0
        } else {
            total_radius / self.blobs.len() as f64
        };

        BlobStats {
            total_blobs: self.blobs.len(),
            mean_radius,
            max_radius,
            total_area,
        }
    }
}

impl IntoIterator for BlobCollection {
    type Item = Blob;
    type IntoIter = std::vec::IntoIter<Blob>;

    fn into_iter(self) -> Self::IntoIter {
        self.blobs.into_iter()
    }
}

impl FromIterator<Blob> for BlobCollection {
    fn from_iter<T: IntoIterator<Item = Blob>>(iter: T) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

/// Summary of a blob collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobStats {
    pub total_blobs: usize,
    pub mean_radius: f64,
    pub max_radius: f64,
    pub total_area: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_keeps_discovery_order() {
        let collection: BlobCollection = vec![
            Blob::new((10.0, 10.0), 6.0, 100.0),
            Blob::new((50.0, 5.0), 20.0, 1200.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.first().map(|b| b.center), Some((10.0, 10.0)));

        let stats = collection.stats();
        assert_eq!(stats.total_blobs, 2);
        assert_eq!(stats.max_radius, 20.0);
        assert_eq!(stats.mean_radius, 13.0);
    }

    #[test]
    fn test_empty_stats() {
        let stats = BlobCollection::new().stats();
        assert_eq!(stats.total_blobs, 0);
        assert_eq!(stats.mean_radius, 0.0);
    }
}
