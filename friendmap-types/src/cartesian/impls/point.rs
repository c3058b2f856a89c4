use crate::cartesian::traits::cartesian_point::{CartesianPoint2d, NewCartesianPoint2d};
use nalgebra::{Point2, Scalar};

/// 2d point with `f64` coordinates.
pub type Point2d = Point2<f64>;

impl<Num: num_traits::Num + Copy + PartialOrd + Scalar> CartesianPoint2d for Point2<Num> {
    type Num = Num;

    fn x(&self) -> Num {
        self.x
    }
    fn y(&self) -> Num {
        self.y
    }
}

impl<Num: num_traits::Num + Copy + PartialOrd + Scalar> NewCartesianPoint2d<Num> for Point2<Num> {
    fn new(x: Num, y: Num) -> Self {
        Point2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_sq() {
        let a = Point2d::new(1.0, 1.0);
        let b = Point2d::new(4.0, 5.0);
        assert_eq!(a.distance_sq(&b), 25.0);
        assert_eq!(CartesianPoint2d::sub(&b, &a).x, 3.0);
    }
}
