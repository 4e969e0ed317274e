use lumen_core::TransformField;
use thiserror::Error;

/// Problems with a single sampler's keyframe data, independent of where it lives.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplerError {
    #[error("sampler has {count} keyframes, at least 2 are required")]
    TooFewKeyframes { count: usize },

    #[error("keyframe time {time} at position {position} does not increase on the previous one")]
    NonIncreasingTimes { position: usize, time: f32 },

    #[error("keyframe time {time} is negative or not finite")]
    InvalidTime { time: f32 },

    #[error("sampler has {times} times but {values} values")]
    LengthMismatch { times: usize, values: usize },

    #[error("sampler has {values} floats, not a whole number of {components}-component values")]
    PartialValue { values: usize, components: usize },

    #[error("{field:?} needs {expected} components per value, sampler has {found}")]
    ComponentMismatch {
        field: TransformField,
        expected: usize,
        found: usize,
    },

    #[error("cubic spline interpolation is not supported")]
    UnsupportedInterpolation,
}

#[derive(Error, Debug, PartialEq)]
pub enum AnimationError {
    #[error("Animation {animation} channel {channel}: {source}")]
    InvalidSampler {
        animation: usize,
        channel: usize,
        #[source]
        source: SamplerError,
    },

    #[error("Animation {animation} channel {channel} targets node {node}, which does not exist")]
    NodeNotFound {
        animation: usize,
        channel: usize,
        node: usize,
    },

    #[error(
        "Animation {animation} channel {channel} targets {field:?} of node {node}, whose transform is a baked matrix"
    )]
    MatrixTarget {
        animation: usize,
        channel: usize,
        node: usize,
        field: TransformField,
    },

    #[error(
        "Channels {first:?} and {second:?} (animation, channel) both drive {field:?} of node {node}"
    )]
    ConflictingChannels {
        node: usize,
        field: TransformField,
        first: (usize, usize),
        second: (usize, usize),
    },

    #[error("Failed to start the animation worker pool: {0}")]
    WorkerPool(String),
}

impl From<rayon::ThreadPoolBuildError> for AnimationError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        AnimationError::WorkerPool(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnimationError>;
