pub mod channel;
pub mod dispatch;
mod error;
pub mod sampler;
pub mod track;

pub use channel::{Channel, evaluate};
pub use dispatch::{AnimationDispatch, DispatchStats};
pub use error::{AnimationError, Result, SamplerError};
pub use sampler::{KeyframeSampler, SampledValue};
pub use track::{Interpolate, KeyframeTrack};
