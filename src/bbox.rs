use nalgebra as na;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    min: na::Vector3<f32>,
    max: na::Vector3<f32>,
}

impl Aabb {
    #[inline]
    pub fn from_point(p: na::Vector3<f32>) -> Self {
        Self { min: p, max: p }
    }

    #[inline]
    pub fn from_points(a: na::Vector3<f32>, b: na::Vector3<f32>) -> Self {
        let mut bbox = Self::from_point(a);
        bbox.encapsulate(&b);
        bbox
    }

    #[inline]
    pub fn encapsulate(&mut self, p: &na::Vector3<f32>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    #[inline]
    pub fn contains(&self, p: &na::Vector3<f32>) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    #[inline(always)]
    pub fn min(&self) -> &na::Vector3<f32> {
        &self.min
    }

    #[inline(always)]
    pub fn max(&self) -> &na::Vector3<f32> {
        &self.max
    }

    #[inline(always)]
    pub fn center(&self) -> na::Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    #[inline(always)]
    pub fn size(&self) -> na::Vector3<f32> {
        self.max - self.min
    }
}
