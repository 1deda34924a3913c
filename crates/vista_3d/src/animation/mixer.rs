//! Clip playback and blending

use super::{AnimationClip, PropertyValue};
use crate::ecs::{Component, Entity};
use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

/// Playback state of one clip
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationAction {
    pub clip: usize,
    /// Seconds into the clip
    pub time: f32,
    pub weight: f32,
    pub speed: f32,
    pub looping: bool,
    /// Weight when the current crossfade began
    start_weight: f32,
}

impl AnimationAction {
    fn new(clip: usize, weight: f32) -> Self {
        Self {
            clip,
            time: 0.0,
            weight,
            speed: 1.0,
            looping: true,
            start_weight: weight,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Crossfade {
    target: usize,
    elapsed: f32,
    duration: f32,
}

/// Plays [`AnimationClip`]s against target entities
///
/// Channel `node` indices resolve through `targets`; channels on a `None`
/// target are skipped. Weights of the active
/// actions always sum to 1 while anything plays.
#[derive(Clone, Debug, Default)]
pub struct AnimationMixer {
    clips: Vec<AnimationClip>,
    targets: Vec<Option<Entity>>,
    actions: Vec<AnimationAction>,
    fade: Option<Crossfade>,
}

impl Component for AnimationMixer {}

/// Blended transform of one node; `None` fields are not animated
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodePose {
    pub translation: Option<Vec3>,
    pub rotation: Option<Quat>,
    pub scale: Option<Vec3>,
}

/// Blended pose keyed by target entity
pub type Pose = Vec<(Entity, NodePose)>;

#[derive(Default)]
struct Accum {
    translation: (Vec3, f32),
    rotation: (glam::Vec4, f32),
    scale: (Vec3, f32),
    first_rotation: Option<Quat>,
}

impl AnimationMixer {
    pub fn new(clips: Vec<AnimationClip>, targets: Vec<Option<Entity>>) -> Self {
        Self {
            clips,
            targets,
            actions: Vec::new(),
            fade: None,
        }
    }

    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    pub fn targets(&self) -> &[Option<Entity>] {
        &self.targets
    }

    pub fn actions(&self) -> &[AnimationAction] {
        &self.actions
    }

    pub fn clip_index(&self, name: &str) -> Option<usize> {
        self.clips.iter().position(|c| c.name == name)
    }

    /// Clip with the highest weight
    pub fn current(&self) -> Option<&AnimationClip> {
        if let Some(fade) = &self.fade {
            return self
                .actions
                .get(fade.target)
                .and_then(|a| self.clips.get(a.clip));
        }
        self.actions
            .iter()
            .max_by(|a, b| a.weight.total_cmp(&b.weight))
            .and_then(|a| self.clips.get(a.clip))
    }

    /// Name of the clip after the current one, wrapping around
    pub fn next_clip_name(&self) -> Option<&str> {
        if self.clips.is_empty() {
            return None;
        }
        let next = match self.current().and_then(|c| self.clip_index(&c.name)) {
            Some(i) => (i + 1) % self.clips.len(),
            None => 0,
        };
        Some(self.clips[next].name.as_str())
    }

    pub fn is_playing(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Play a clip alone at full weight. Returns `false` for unknown names.
    pub fn play(&mut self, name: &str) -> bool {
        let Some(clip) = self.clip_index(name) else {
            return false;
        };
        self.fade = None;
        self.actions.clear();
        self.actions.push(AnimationAction::new(clip, 1.0));
        true
    }

    /// Play the first clip, if any
    pub fn play_first(&mut self) -> bool {
        match self.clips.first().map(|c| c.name.clone()) {
            Some(name) => self.play(&name),
            None => false,
        }
    }

    /// Fade every playing action out and `name` in over `duration` seconds
    pub fn crossfade_to(&mut self, name: &str, duration: f32) -> bool {
        let Some(clip) = self.clip_index(name) else {
            return false;
        };
        if duration <= 0.0 || self.actions.is_empty() {
            return self.play(name);
        }

        let target = match self.actions.iter().position(|a| a.clip == clip) {
            Some(i) => i,
            None => {
                self.actions.push(AnimationAction::new(clip, 0.0));
                self.actions.len() - 1
            }
        };
        for action in &mut self.actions {
            action.start_weight = action.weight;
        }
        self.fade = Some(Crossfade {
            target,
            elapsed: 0.0,
            duration,
        });
        true
    }

    pub fn stop(&mut self) {
        self.actions.clear();
        self.fade = None;
    }

    /// Advance playback and fades by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        for action in &mut self.actions {
            let duration = self.clips.get(action.clip).map_or(0.0, |c| c.duration);
            action.time += dt * action.speed;
            if duration > 0.0 {
                if action.looping {
                    action.time = action.time.rem_euclid(duration);
                } else {
                    action.time = action.time.clamp(0.0, duration);
                }
            } else {
                action.time = 0.0;
            }
        }

        let Some(fade) = self.fade.as_mut() else {
            return;
        };
        fade.elapsed += dt;
        let f = (fade.elapsed / fade.duration).clamp(0.0, 1.0);
        let target = fade.target;
        for (i, action) in self.actions.iter_mut().enumerate() {
            action.weight = action.start_weight * (1.0 - f) + if i == target { f } else { 0.0 };
        }

        if f >= 1.0 {
            self.fade = None;
            if let Some(keep) = self.actions.get(target).cloned() {
                self.actions = vec![AnimationAction {
                    weight: 1.0,
                    start_weight: 1.0,
                    ..keep
                }];
            }
        }
    }

    /// Blend every active action into one pose
    ///
    /// Translations and scales are weighted sums; rotations are a
    /// normalized weighted sum (nlerp) aligned to the first contributor.
    /// Each property is normalized by the weight of the actions that
    /// animate it.
    pub fn sample_pose(&self) -> Pose {
        let mut accum: FxHashMap<usize, Accum> = FxHashMap::default();

        for action in &self.actions {
            if action.weight <= 0.0 {
                continue;
            }
            let Some(clip) = self.clips.get(action.clip) else {
                continue;
            };
            let w = action.weight;
            for channel in &clip.channels {
                let Some(value) = channel.sample(action.time) else {
                    continue;
                };
                let acc = accum.entry(channel.node).or_default();
                match value {
                    PropertyValue::Translation(v) => {
                        acc.translation.0 += v * w;
                        acc.translation.1 += w;
                    }
                    PropertyValue::Scale(v) => {
                        acc.scale.0 += v * w;
                        acc.scale.1 += w;
                    }
                    PropertyValue::Rotation(q) => {
                        let first = *acc.first_rotation.get_or_insert(q);
                        let q = if first.dot(q) < 0.0 { -q } else { q };
                        acc.rotation.0 += glam::Vec4::from(q) * w;
                        acc.rotation.1 += w;
                    }
                }
            }
        }

        let mut pose: Pose = accum
            .into_iter()
            .filter_map(|(node, acc)| {
                let entity = (*self.targets.get(node)?)?;
                let translation = (acc.translation.1 > 0.0).then(|| acc.translation.0 / acc.translation.1);
                let scale = (acc.scale.1 > 0.0).then(|| acc.scale.0 / acc.scale.1);
                let rotation = (acc.rotation.1 > 0.0)
                    .then(|| Quat::from_vec4(acc.rotation.0).normalize())
                    .filter(|q| q.is_finite());
                Some((
                    entity,
                    NodePose {
                        translation,
                        rotation,
                        scale,
                    },
                ))
            })
            .collect();
        pose.sort_by_key(|(entity, _)| *entity);
        pose
    }
}
