use crate::core::RenderTarget;

/// Construction parameters for a [`SyncVectorEnv`](super::SyncVectorEnv).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VecEnvConfig {
    /// Number of instances; must be at least 1.
    pub num_envs: usize,
    /// When set, every instance and the action sampler are seeded with it at construction.
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: Option<u64>,
    /// Target used by `render_default`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub render_target: RenderTarget,
}

impl VecEnvConfig {
    pub fn new(num_envs: usize) -> Self {
        Self { num_envs, seed: None, render_target: RenderTarget::default() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_render_target(mut self, target: RenderTarget) -> Self {
        self.render_target = target;
        self
    }
}

impl Default for VecEnvConfig {
    fn default() -> Self { Self::new(1) }
}
