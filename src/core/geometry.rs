use crate::error::{Error, Result};
use rand::{rngs::StdRng, Rng};

/// Rectangular simulation domain `[0, width] x [0, height]`.
///
/// Extents are fixed for the simulation's lifetime.
#[derive(Debug, Clone, Copy)]
pub struct Domain {
    width: f64,
    height: f64,
}

impl Domain {
    /// Create a domain after validating both extents are finite and > 0.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !width.is_finite() || width <= 0.0 {
            return Err(Error::InvalidConfig("width must be finite and > 0".into()));
        }
        if !height.is_finite() || height <= 0.0 {
            return Err(Error::InvalidConfig("height must be finite and > 0".into()));
        }
        Ok(Self { width, height })
    }

    /// Domain extent along the x axis.
    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Domain extent along the y axis.
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Extent along `axis` (0 = x, 1 = y).
    #[inline]
    pub fn extent(&self, axis: usize) -> f64 {
        if axis == 0 {
            self.width
        } else {
            self.height
        }
    }

    /// Clamp a position into `[0, width] x [0, height]` in place.
    #[inline]
    pub fn clamp(&self, r: &mut [f64; 2]) {
        r[0] = r[0].clamp(0.0, self.width);
        r[1] = r[1].clamp(0.0, self.height);
    }

    /// True iff `r` lies inside the closed domain.
    #[inline]
    pub fn contains(&self, r: &[f64; 2]) -> bool {
        (0.0..=self.width).contains(&r[0]) && (0.0..=self.height).contains(&r[1])
    }
}

/// One of the four domain edges.
///
/// The tag drives a single table of normal axis / side / plane coordinate,
/// so leak tests and reflections share one implementation instead of four
/// near-duplicate code paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Top,
    Bottom,
    Left,
    Right,
}

/// All four walls, in the order random placement indexes them.
pub const WALLS: [Wall; 4] = [Wall::Top, Wall::Bottom, Wall::Left, Wall::Right];

impl Wall {
    /// Axis of the wall's normal (0 for Left/Right, 1 for Top/Bottom).
    #[inline]
    pub fn normal_axis(&self) -> usize {
        match self {
            Wall::Left | Wall::Right => 0,
            Wall::Top | Wall::Bottom => 1,
        }
    }

    /// Axis running along the wall.
    #[inline]
    pub fn tangent_axis(&self) -> usize {
        1 - self.normal_axis()
    }

    /// Whether the wall sits at the far end of its normal axis.
    #[inline]
    pub fn is_max(&self) -> bool {
        matches!(self, Wall::Top | Wall::Right)
    }

    /// Wall-plane coordinate along the normal axis (0 or the domain extent).
    #[inline]
    pub fn coordinate(&self, domain: &Domain) -> f64 {
        if self.is_max() {
            domain.extent(self.normal_axis())
        } else {
            0.0
        }
    }

    /// Signed distance past the wall plane; > 0 means outside the domain.
    #[inline]
    pub fn overshoot(&self, r: &[f64; 2], domain: &Domain) -> f64 {
        let x = r[self.normal_axis()];
        if self.is_max() {
            x - self.coordinate(domain)
        } else {
            -x
        }
    }

    /// Lowercase edge name, as exposed to embedders.
    pub fn as_str(&self) -> &'static str {
        match self {
            Wall::Top => "top",
            Wall::Bottom => "bottom",
            Wall::Left => "left",
            Wall::Right => "right",
        }
    }

    /// Parse an edge name accepted by the configuration surface.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "top" => Ok(Wall::Top),
            "bottom" => Ok(Wall::Bottom),
            "left" => Ok(Wall::Left),
            "right" => Ok(Wall::Right),
            other => Err(Error::InvalidConfig(format!(
                "unknown leak edge {other:?}; expected one of top/bottom/left/right"
            ))),
        }
    }
}

/// Absorbing aperture on one wall: a particle reaching it is permanently
/// removed from the ensemble.
///
/// `center` is measured along the host edge; the segment
/// `[center - width/2, center + width/2]` must lie fully inside that edge.
/// Created once at setup and immutable thereafter.
#[derive(Debug, Clone, Copy)]
pub struct Leak {
    wall: Wall,
    center: f64,
    width: f64,
}

impl Leak {
    /// Place a leak of `width` centered at `center` along `wall`.
    pub fn new(domain: &Domain, wall: Wall, center: f64, width: f64) -> Result<Self> {
        if !width.is_finite() || width <= 0.0 {
            return Err(Error::InvalidConfig(
                "leak width must be finite and > 0".into(),
            ));
        }
        if !center.is_finite() {
            return Err(Error::InvalidConfig("leak position must be finite".into()));
        }
        let edge_len = domain.extent(wall.tangent_axis());
        let half = 0.5 * width;
        if center - half < 0.0 || center + half > edge_len {
            return Err(Error::InvalidConfig(format!(
                "leak [{:.3}, {:.3}] does not fit the {} edge (length {})",
                center - half,
                center + half,
                wall.as_str(),
                edge_len
            )));
        }
        Ok(Self {
            wall,
            center,
            width,
        })
    }

    /// Sample a leak placement: one of the four walls uniformly, then a
    /// center uniform over the sub-range where the whole segment fits.
    pub fn sample(domain: &Domain, width: f64, rng: &mut StdRng) -> Result<Self> {
        if !width.is_finite() || width <= 0.0 {
            return Err(Error::InvalidConfig(
                "leak width must be finite and > 0".into(),
            ));
        }
        let wall = WALLS[rng.random_range(0..WALLS.len())];
        let edge_len = domain.extent(wall.tangent_axis());
        if width > edge_len {
            return Err(Error::InvalidConfig(format!(
                "leak width {} exceeds the {} edge (length {})",
                width,
                wall.as_str(),
                edge_len
            )));
        }
        let half = 0.5 * width;
        let center = rng.random_range(half..=edge_len - half);
        Self::new(domain, wall, center, width)
    }

    /// Host wall.
    #[inline]
    pub fn wall(&self) -> Wall {
        self.wall
    }

    /// Aperture center along the host edge.
    #[inline]
    pub fn center(&self) -> f64 {
        self.center
    }

    /// Aperture width.
    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Radius-inflated containment test, used by the diffusive walk: a
    /// particle whose disc touches the wall inside the aperture span is
    /// absorbed (on Bottom: `y - radius <= 0 && |x - center| <= width/2`).
    #[inline]
    pub fn admits(&self, r: &[f64; 2], radius: f64, domain: &Domain) -> bool {
        self.within_span(r) && self.wall.overshoot(r, domain) + radius >= 0.0
    }

    /// Strict past-the-wall test, used by ballistic flight: the provisional
    /// position must lie beyond the wall plane (on Bottom: `y < 0`).
    #[inline]
    pub fn crossed_into(&self, r: &[f64; 2], domain: &Domain) -> bool {
        self.within_span(r) && self.wall.overshoot(r, domain) > 0.0
    }

    #[inline]
    fn within_span(&self, r: &[f64; 2]) -> bool {
        (r[self.wall.tangent_axis()] - self.center).abs() <= 0.5 * self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ten_by_ten() -> Domain {
        Domain::new(10.0, 10.0).expect("valid domain")
    }

    #[test]
    fn domain_rejects_bad_extents() {
        assert!(Domain::new(0.0, 10.0).is_err());
        assert!(Domain::new(10.0, -1.0).is_err());
        assert!(Domain::new(f64::NAN, 10.0).is_err());
        assert!(Domain::new(10.0, f64::INFINITY).is_err());
    }

    #[test]
    fn leak_must_fit_its_edge() {
        let domain = ten_by_ten();
        // Fits exactly
        assert!(Leak::new(&domain, Wall::Bottom, 5.0, 10.0).is_ok());
        // Spills over either end
        assert!(Leak::new(&domain, Wall::Bottom, 0.4, 1.0).is_err());
        assert!(Leak::new(&domain, Wall::Bottom, 9.7, 1.0).is_err());
        // Wider than the edge
        assert!(Leak::new(&domain, Wall::Left, 5.0, 11.0).is_err());
        // Degenerate width
        assert!(Leak::new(&domain, Wall::Top, 5.0, 0.0).is_err());
    }

    #[test]
    fn bottom_leak_tests_match_definitions() -> Result<()> {
        let domain = ten_by_ten();
        let leak = Leak::new(&domain, Wall::Bottom, 5.0, 1.0)?;

        // Disc touching the wall inside the span is admitted
        assert!(leak.admits(&[5.0, 0.2], 0.3, &domain));
        // Same height, outside the span
        assert!(!leak.admits(&[6.0, 0.2], 0.3, &domain));
        // Inside the span but too far from the wall
        assert!(!leak.admits(&[5.0, 0.5], 0.3, &domain));
        // Span boundary is inclusive
        assert!(leak.admits(&[5.5, 0.0], 0.0, &domain));

        // Crossing requires being strictly past the plane
        assert!(leak.crossed_into(&[5.0, -0.01], &domain));
        assert!(!leak.crossed_into(&[5.0, 0.0], &domain));
        assert!(!leak.crossed_into(&[6.2, -0.01], &domain));
        Ok(())
    }

    #[test]
    fn side_leak_uses_x_normal() -> Result<()> {
        let domain = ten_by_ten();
        let leak = Leak::new(&domain, Wall::Right, 3.0, 2.0)?;
        assert!(leak.crossed_into(&[10.5, 3.9], &domain));
        assert!(!leak.crossed_into(&[9.5, 3.0], &domain));
        assert!(leak.admits(&[9.8, 3.0], 0.3, &domain));
        assert!(!leak.admits(&[9.8, 6.0], 0.3, &domain));
        Ok(())
    }

    #[test]
    fn sampled_leak_fits_every_time() -> Result<()> {
        let domain = Domain::new(7.0, 3.0)?;
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let leak = Leak::sample(&domain, 1.5, &mut rng)?;
            let edge_len = domain.extent(leak.wall().tangent_axis());
            assert!(leak.center() - 0.75 >= 0.0);
            assert!(leak.center() + 0.75 <= edge_len);
        }
        Ok(())
    }

    #[test]
    fn overshoot_signs() {
        let domain = ten_by_ten();
        assert!(Wall::Bottom.overshoot(&[5.0, -0.1], &domain) > 0.0);
        assert!(Wall::Bottom.overshoot(&[5.0, 0.1], &domain) < 0.0);
        assert!(Wall::Top.overshoot(&[5.0, 10.1], &domain) > 0.0);
        assert!(Wall::Left.overshoot(&[-0.2, 5.0], &domain) > 0.0);
        assert!(Wall::Right.overshoot(&[10.2, 5.0], &domain) > 0.0);
    }

    #[test]
    fn wall_names_round_trip() -> Result<()> {
        for wall in WALLS {
            assert_eq!(Wall::parse(wall.as_str())?, wall);
        }
        assert!(Wall::parse("diagonal").is_err());
        Ok(())
    }
}
