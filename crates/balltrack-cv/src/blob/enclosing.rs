//! Minimum enclosing circle (Welzl, iterative form)

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

const EPS: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: (f64, f64),
    pub radius: f64,
}

impl Circle {
    fn contains(&self, p: (f64, f64)) -> bool {
        dist(self.center, p) <= self.radius + EPS * (1.0 + self.radius)
    }

    fn from_two(a: (f64, f64), b: (f64, f64)) -> Self {
        let center = ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
        Self {
            center,
            radius: dist(a, b) / 2.0,
        }
    }

    fn from_three(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Self {
        let d = 2.0 * (a.0 * (b.1 - c.1) + b.0 * (c.1 - a.1) + c.0 * (a.1 - b.1));
        if d.abs() < EPS {
            // Collinear: the widest pair spans the other point.
            return [Self::from_two(a, b), Self::from_two(a, c), Self::from_two(b, c)]
                .into_iter()
                .fold(Self::from_two(a, b), |best, cand| if cand.radius > best.radius { cand } else { best });
        }

        let a2 = a.0 * a.0 + a.1 * a.1;
        let b2 = b.0 * b.0 + b.1 * b.1;
        let c2 = c.0 * c.0 + c.1 * c.1;
        let ux = (a2 * (b.1 - c.1) + b2 * (c.1 - a.1) + c2 * (a.1 - b.1)) / d;
        let uy = (a2 * (c.0 - b.0) + b2 * (a.0 - c.0) + c2 * (b.0 - a.0)) / d;
        let center = (ux, uy);

        Self {
            center,
            radius: dist(center, a).max(dist(center, b)).max(dist(center, c)),
        }
    }
}

fn dist(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// Smallest circle containing every point, `None` for no points.
///
/// Points are shuffled with a fixed seed, giving expected linear time and
/// reproducible floating point results.
pub fn min_enclosing_circle(points: &[(f64, f64)]) -> Option<Circle> {
    let mut pts = points.to_vec();
    pts.shuffle(&mut StdRng::seed_from_u64(0x0ba1_1ba1));

    let mut circle = Circle {
        center: *pts.first()?,
        radius: 0.0,
    };

    for i in 1..pts.len() {
        if circle.contains(pts[i]) {
            continue;
        }
        circle = Circle {
            center: pts[i],
            radius: 0.0,
        };
        for j in 0..i {
            if circle.contains(pts[j]) {
                continue;
            }
            circle = Circle::from_two(pts[i], pts[j]);
            for k in 0..j {
                if !circle.contains(pts[k]) {
                    circle = Circle::from_three(pts[i], pts[j], pts[k]);
                }
            }
        }
    }

    Some(circle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_trivial_inputs() {
        assert!(min_enclosing_circle(&[]).is_none());

        let single = min_enclosing_circle(&[(3.0, 4.0)]).unwrap();
        assert_eq!(single.center, (3.0, 4.0));
        assert_eq!(single.radius, 0.0);

        let pair = min_enclosing_circle(&[(0.0, 0.0), (4.0, 0.0)]).unwrap();
        assert_abs_diff_eq!(pair.center.0, 2.0);
        assert_abs_diff_eq!(pair.radius, 2.0);
    }

    #[test]
    fn test_square_corners() {
        let circle = min_enclosing_circle(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (5.0, 5.0)]).unwrap();
        assert_abs_diff_eq!(circle.center.0, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(circle.center.1, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(circle.radius, 50f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_collinear_points() {
        let circle = min_enclosing_circle(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (5.0, 5.0)]).unwrap();
        assert_abs_diff_eq!(circle.center.0, 2.5, epsilon = 1e-9);
        assert_abs_diff_eq!(circle.radius, 50f64.sqrt() / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ring_of_points() {
        let points: Vec<(f64, f64)> = (0..64)
            .map(|i| {
                let t = i as f64 * std::f64::consts::TAU / 64.0;
                (100.0 + 25.0 * t.cos(), 50.0 + 25.0 * t.sin())
            })
            .collect();
        let circle = min_enclosing_circle(&points).unwrap();

        assert_abs_diff_eq!(circle.center.0, 100.0, epsilon = 1e-6);
        assert_abs_diff_eq!(circle.center.1, 50.0, epsilon = 1e-6);
        assert_abs_diff_eq!(circle.radius, 25.0, epsilon = 1e-6);
        assert!(points.iter().all(|&p| circle.contains(p)));
    }
}
