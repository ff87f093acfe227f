use glam::Vec3;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Tightest box around a point set, or `None` when there are no points
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let bounds = rest.iter().fold(AABB::new(*first, *first), |acc, &p| AABB {
            min: acc.min.min(p),
            max: acc.max.max(p),
        });
        Some(bounds)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full extent along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }

    /// Box after a uniform scale about the origin followed by a translation
    pub fn scaled_then_translated(&self, scale: f32, offset: Vec3) -> AABB {
        let a = self.min * scale + offset;
        let b = self.max * scale + offset;
        AABB {
            min: a.min(b),
            max: a.max(b),
        }
    }
}
