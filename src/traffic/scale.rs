/// Marker radius range in pixels with no time filter.
pub const UNFILTERED_RANGE: (f64, f64) = (2.0, 25.0);

/// Marker radius range in pixels under an active time filter. Fewer trips
/// survive a filter, so the range is wider.
pub const FILTERED_RANGE: (f64, f64) = (3.0, 50.0);

/// Square-root scale from `[0, max_traffic]` onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    max_traffic: usize,
    range: (f64, f64),
}

impl RadiusScale {
    pub fn new(max_traffic: usize, filter_active: bool) -> Self {
        let range = if filter_active {
            FILTERED_RANGE
        } else {
            UNFILTERED_RANGE
        };
        Self { max_traffic, range }
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// With an empty domain (`max_traffic == 0`) every radius is the lower bound.
    pub fn radius(&self, total_traffic: usize) -> f64 {
        let (r0, r1) = self.range;
        if self.max_traffic == 0 {
            return r0;
        }

        let t = (total_traffic as f64 / self.max_traffic as f64).sqrt();
        r0 + (r1 - r0) * t
    }
}

pub fn radius_for(total_traffic: usize, max_traffic: usize, filter_active: bool) -> f64 {
    RadiusScale::new(max_traffic, filter_active).radius(total_traffic)
}
