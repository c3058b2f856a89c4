pub mod cartesian_point;
