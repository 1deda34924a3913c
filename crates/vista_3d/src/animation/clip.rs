//! Animation clips and channel sampling

use glam::{Quat, Vec3, Vec4};

/// Node property a channel drives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    Translation,
    Rotation,
    Scale,
}

/// Keyframe interpolation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    Step,
    #[default]
    Linear,
    /// Hermite spline; values are stored as (in-tangent, value, out-tangent)
    /// triplets per keyframe
    CubicSpline,
}

/// A sampled property value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyValue {
    Translation(Vec3),
    Rotation(Quat),
    Scale(Vec3),
}

/// One animated property of one node
///
/// `node` indexes the target list of the mixer playing the clip. Values are
/// stored as `Vec4` (xyz for vectors, xyzw for quaternions).
#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    pub node: usize,
    pub property: Property,
    pub interpolation: Interpolation,
    pub times: Vec<f32>,
    pub values: Vec<Vec4>,
}

impl Channel {
    /// Number of keyframes, accounting for spline tangents
    pub fn keyframe_count(&self) -> usize {
        let stride = match self.interpolation {
            Interpolation::CubicSpline => 3,
            _ => 1,
        };
        self.times.len().min(self.values.len() / stride)
    }

    fn value(&self, key: usize) -> Vec4 {
        match self.interpolation {
            Interpolation::CubicSpline => self.values[key * 3 + 1],
            _ => self.values[key],
        }
    }

    /// Sample at time `t` (seconds); clamps outside the keyframe range
    pub fn sample(&self, t: f32) -> Option<PropertyValue> {
        let count = self.keyframe_count();
        if count == 0 {
            return None;
        }
        let times = &self.times[..count];

        let i = times.partition_point(|&k| k <= t);
        let raw = if i == 0 {
            self.value(0)
        } else if i == count {
            self.value(count - 1)
        } else {
            let (k0, k1) = (i - 1, i);
            let dt = times[k1] - times[k0];
            let u = if dt > 0.0 { (t - times[k0]) / dt } else { 0.0 };
            match self.interpolation {
                Interpolation::Step => self.value(k0),
                Interpolation::Linear => {
                    let (a, b) = (self.value(k0), self.value(k1));
                    if self.property == Property::Rotation {
                        let q = Quat::from_vec4(a).normalize().slerp(Quat::from_vec4(b).normalize(), u);
                        Vec4::from(q)
                    } else {
                        a.lerp(b, u)
                    }
                }
                Interpolation::CubicSpline => {
                    let p0 = self.values[k0 * 3 + 1];
                    let m0 = self.values[k0 * 3 + 2] * dt;
                    let p1 = self.values[k1 * 3 + 1];
                    let m1 = self.values[k1 * 3] * dt;
                    let (u2, u3) = (u * u, u * u * u);
                    p0 * (2.0 * u3 - 3.0 * u2 + 1.0)
                        + m0 * (u3 - 2.0 * u2 + u)
                        + p1 * (-2.0 * u3 + 3.0 * u2)
                        + m1 * (u3 - u2)
                }
            }
        };

        Some(match self.property {
            Property::Translation => PropertyValue::Translation(raw.truncate()),
            Property::Scale => PropertyValue::Scale(raw.truncate()),
            Property::Rotation => PropertyValue::Rotation(Quat::from_vec4(raw).normalize()),
        })
    }
}

/// A named set of channels
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    /// Seconds; the last keyframe time across channels
    pub duration: f32,
    pub channels: Vec<Channel>,
}

impl AnimationClip {
    /// Build a clip, deriving the duration from the channels
    pub fn new(name: impl Into<String>, channels: Vec<Channel>) -> Self {
        let duration = channels
            .iter()
            .filter_map(|c| c.times.last().copied())
            .fold(0.0f32, f32::max);
        Self {
            name: name.into(),
            duration,
            channels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn translation(interpolation: Interpolation) -> Channel {
        Channel {
            node: 0,
            property: Property::Translation,
            interpolation,
            times: vec![0.0, 1.0, 2.0],
            values: vec![Vec4::ZERO, Vec4::new(10.0, 0.0, 0.0, 0.0), Vec4::new(10.0, 10.0, 0.0, 0.0)],
        }
    }

    #[test]
    fn test_linear_sample() {
        let c = translation(Interpolation::Linear);
        assert_eq!(c.sample(0.5), Some(PropertyValue::Translation(Vec3::new(5.0, 0.0, 0.0))));
        assert_eq!(c.sample(1.5), Some(PropertyValue::Translation(Vec3::new(10.0, 5.0, 0.0))));
        // clamped
        assert_eq!(c.sample(-1.0), Some(PropertyValue::Translation(Vec3::ZERO)));
        assert_eq!(c.sample(9.0), Some(PropertyValue::Translation(Vec3::new(10.0, 10.0, 0.0))));
    }

    #[test]
    fn test_step_sample() {
        let c = translation(Interpolation::Step);
        assert_eq!(c.sample(0.99), Some(PropertyValue::Translation(Vec3::ZERO)));
        assert_eq!(c.sample(1.0), Some(PropertyValue::Translation(Vec3::new(10.0, 0.0, 0.0))));
    }

    #[test]
    fn test_rotation_slerp() {
        let end = Quat::from_rotation_y(FRAC_PI_2);
        let c = Channel {
            node: 0,
            property: Property::Rotation,
            interpolation: Interpolation::Linear,
            times: vec![0.0, 1.0],
            values: vec![Vec4::from(Quat::IDENTITY), Vec4::from(end)],
        };
        let Some(PropertyValue::Rotation(q)) = c.sample(0.5) else {
            panic!("expected rotation");
        };
        let expected = Quat::from_rotation_y(FRAC_PI_2 / 2.0);
        assert!(q.dot(expected).abs() > 1.0 - 1e-5);
        assert!((q.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_cubic_spline_hits_keyframes() {
        let c = Channel {
            node: 0,
            property: Property::Scale,
            interpolation: Interpolation::CubicSpline,
            times: vec![0.0, 1.0],
            values: vec![
                Vec4::ZERO,
                Vec4::splat(1.0),
                Vec4::ZERO,
                Vec4::ZERO,
                Vec4::splat(3.0),
                Vec4::ZERO,
            ],
        };
        assert_eq!(c.keyframe_count(), 2);
        assert_eq!(c.sample(0.0), Some(PropertyValue::Scale(Vec3::splat(1.0))));
        assert_eq!(c.sample(1.0), Some(PropertyValue::Scale(Vec3::splat(3.0))));
        // zero tangents: smoothstep midpoint
        let Some(PropertyValue::Scale(mid)) = c.sample(0.5) else {
            panic!("expected scale");
        };
        assert!((mid.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_clip_duration() {
        let clip = AnimationClip::new("walk", vec![translation(Interpolation::Linear)]);
        assert_eq!(clip.duration, 2.0);
        assert!(Channel { times: vec![], values: vec![], ..translation(Interpolation::Linear) }
            .sample(0.0)
            .is_none());
    }
}
