use std::collections::HashSet;

use log::debug;
use serde_derive::{Deserialize, Serialize};

use crate::bounds::HandBoundsMode;
use crate::classifier::PoseClassifier;
use crate::error::Error;
use crate::frame::HandFrame;
use crate::interaction::MappingInput;
use crate::joint::FINGER_COUNT;
use crate::pose::PoseDefinition;

/// Per-hand controller settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HandStateConfig {
    pub bounds_mode: HandBoundsMode,
    /// Bounds are only computed when hand physics is enabled.
    pub physics_enabled: bool,
    /// Logical inputs published on every update, in order.
    pub mappings: Vec<MappingInput>,
}

impl HandStateConfig {
    #[inline]
    pub fn effective_bounds_mode(&self) -> HandBoundsMode {
        if self.physics_enabled {
            self.bounds_mode
        } else {
            HandBoundsMode::None
        }
    }
}

impl Default for HandStateConfig {
    fn default() -> Self {
        Self {
            bounds_mode: HandBoundsMode::None,
            physics_enabled: false,
            mappings: MappingInput::ALL.to_vec(),
        }
    }
}

/// A reference pose as written in a profile.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PoseRecord {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_baked")]
    pub baked: bool,
    #[serde(default)]
    pub is_gripping: bool,
    #[serde(default)]
    pub grip_strength: f32,
    pub finger_curl_strengths: Vec<f32>,
}

fn default_baked() -> bool {
    true
}

impl PoseRecord {
    fn validate(&self) -> Result<(), Error> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidProfile("pose with empty id".into()));
        }

        if self.finger_curl_strengths.len() != FINGER_COUNT {
            return Err(Error::InvalidProfile(format!(
                "pose `{}` has {} finger curl strengths, expected {}",
                self.id,
                self.finger_curl_strengths.len(),
                FINGER_COUNT
            )));
        }

        let in_range = |v: &f32| (0.0..=1.0).contains(v);
        if !in_range(&self.grip_strength) || !self.finger_curl_strengths.iter().all(in_range) {
            return Err(Error::InvalidProfile(format!(
                "pose `{}` has strengths outside 0..=1",
                self.id
            )));
        }

        Ok(())
    }

    pub fn to_definition(&self) -> Result<PoseDefinition, Error> {
        self.validate()?;

        let def = if self.baked {
            let mut curls = [0.0; FINGER_COUNT];
            curls.copy_from_slice(&self.finger_curl_strengths);

            PoseDefinition::baked(
                self.id.as_str(),
                HandFrame {
                    tracked: true,
                    is_gripping: self.is_gripping,
                    grip_strength: self.grip_strength,
                    finger_curl_strengths: curls,
                    ..Default::default()
                },
            )
        } else {
            PoseDefinition::unbaked(self.id.as_str())
        };

        Ok(match &self.description {
            Some(d) => def.with_description(d.as_str()),
            None => def,
        })
    }
}

/// Hand settings plus the reference poses to recognize.
///
/// ```toml
/// [hand]
/// bounds_mode = "fingers"
/// physics_enabled = true
///
/// [[pose]]
/// id = "fist"
/// is_gripping = true
/// grip_strength = 1.0
/// finger_curl_strengths = [0.9, 0.9, 0.9, 0.9, 0.9]
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct HandProfile {
    #[serde(default)]
    pub hand: HandStateConfig,
    #[serde(default, rename = "pose")]
    pub poses: Vec<PoseRecord>,
}

impl HandProfile {
    pub fn from_toml_str(txt: &str) -> Result<Self, Error> {
        let profile: HandProfile = toml::from_str(txt)?;
        profile.validate()?;
        debug!(
            "loaded hand profile: {} poses, bounds {:?}",
            profile.poses.len(),
            profile.hand.effective_bounds_mode()
        );

        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut seen = HashSet::new();

        for pose in &self.poses {
            pose.validate()?;
            if !seen.insert(pose.id.as_str()) {
                return Err(Error::DuplicatePose(pose.id.clone()));
            }
        }

        Ok(())
    }

    pub fn definitions(&self) -> Result<Vec<PoseDefinition>, Error> {
        self.poses.iter().map(PoseRecord::to_definition).collect()
    }

    /// Builds a classifier over every pose in the profile; any un-baked pose
    /// is a configuration error.
    pub fn classifier(&self) -> Result<PoseClassifier, Error> {
        self.validate()?;

        PoseClassifier::new(self.definitions()?)
    }
}
