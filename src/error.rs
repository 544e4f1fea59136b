use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Pose `{0}` is not baked")]
    UnbakedPose(String),

    #[error("Pose `{0}` is defined more than once")]
    DuplicatePose(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Profile parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
