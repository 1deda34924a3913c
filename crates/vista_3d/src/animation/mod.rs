//! Keyframe animation
//!
//! [`AnimationClip`]s hold sampled tracks for node transforms; an
//! [`AnimationMixer`] component plays them against a set of target entities
//! and blends overlapping clips during crossfades.

mod clip;
mod mixer;

pub use clip::{AnimationClip, Channel, Interpolation, Property, PropertyValue};
pub use mixer::{AnimationAction, AnimationMixer, NodePose, Pose};
