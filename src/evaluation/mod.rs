pub mod distance;
pub mod references;

pub use distance::{
    classify, min_valid_distance, DistanceEvaluator, DistanceSample, EvaluationResult, Proximity,
    DEFAULT_NEAR_THRESHOLD_KM,
};
pub use references::ReferenceSet;
