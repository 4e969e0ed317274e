use glam::{Quat, Vec3};
use lumen_assets::SamplerRecord;
use lumen_core::{Transform, TransformField};

use crate::{error::SamplerError, track::KeyframeTrack};

/// A keyframe track typed by the property it drives.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyframeSampler {
    Vec3(KeyframeTrack<Vec3>),
    Quat(KeyframeTrack<Quat>),
}

/// One interpolated value, ready to be written into a TRS field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampledValue {
    Vec3(Vec3),
    Quat(Quat),
}

impl KeyframeSampler {
    /// Copies and validates a sampler's keyframes for `field`.
    pub fn from_record(record: &SamplerRecord, field: TransformField) -> Result<Self, SamplerError> {
        let expected = match field {
            TransformField::Rotation => 4,
            TransformField::Translation | TransformField::Scale => 3,
        };
        if record.components != expected {
            return Err(SamplerError::ComponentMismatch {
                field,
                expected,
                found: record.components,
            });
        }
        if record.values.len() % expected != 0 {
            return Err(SamplerError::PartialValue {
                values: record.values.len(),
                components: expected,
            });
        }

        let times = record.times.clone();
        match field {
            TransformField::Rotation => {
                let values = record.values.chunks_exact(4).map(Quat::from_slice).collect();
                KeyframeTrack::new(times, values, record.interpolation).map(KeyframeSampler::Quat)
            }
            TransformField::Translation | TransformField::Scale => {
                let values = record.values.chunks_exact(3).map(Vec3::from_slice).collect();
                KeyframeTrack::new(times, values, record.interpolation).map(KeyframeSampler::Vec3)
            }
        }
    }

    pub fn sample(&self, time: f32) -> SampledValue {
        match self {
            KeyframeSampler::Vec3(track) => SampledValue::Vec3(track.sample(time)),
            KeyframeSampler::Quat(track) => SampledValue::Quat(track.sample(time)),
        }
    }

    pub fn end_time(&self) -> f32 {
        match self {
            KeyframeSampler::Vec3(track) => track.end_time(),
            KeyframeSampler::Quat(track) => track.end_time(),
        }
    }
}

impl SampledValue {
    /// Overwrites `field` of `transform`. A value whose type does not
    /// match the field is ignored, which a validated channel never produces.
    pub fn write(self, transform: &mut Transform, field: TransformField) {
        match (field, self) {
            (TransformField::Translation, SampledValue::Vec3(v)) => transform.translation = v,
            (TransformField::Scale, SampledValue::Vec3(v)) => transform.scale = v,
            (TransformField::Rotation, SampledValue::Quat(q)) => transform.rotation = q,
            (field, value) => log::warn!("Dropping {value:?}, it cannot be written to {field:?}"),
        }
    }
}
