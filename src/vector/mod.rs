// Vectorized environments.
// A synchronous vector environment running N copies of an Env in a loop.

pub mod config;

use tracing::{debug, trace, warn};

use crate::core::{Env, EnvError, Info, RenderFrame, RenderMode, RenderTarget, Result, Step};
use crate::spaces::{Batch, Space};
use crate::utils::rng::{rng_from_seed, RngStream, DEFAULT_SEED};

pub use config::VecEnvConfig;

/// Results of one aggregate step, as parallel vectors in instance order.
#[derive(Clone, Debug, PartialEq)]
pub struct VecStep<Obs> {
    pub observations: Vec<Obs>,
    pub rewards: Vec<f32>,
    pub dones: Vec<bool>,
    pub infos: Vec<Info>,
}

impl<Obs> VecStep<Obs> {
    fn with_capacity(n: usize) -> Self {
        Self {
            observations: Vec::with_capacity(n),
            rewards: Vec::with_capacity(n),
            dones: Vec::with_capacity(n),
            infos: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, step: Step<Obs>) {
        self.observations.push(step.observation);
        self.rewards.push(step.reward);
        self.dones.push(step.done);
        self.infos.push(step.info);
    }

    pub fn len(&self) -> usize { self.observations.len() }
    pub fn is_empty(&self) -> bool { self.observations.is_empty() }

    /// Re-assemble per-instance steps, in instance order.
    pub fn into_steps(self) -> Vec<Step<Obs>> {
        self.observations
            .into_iter()
            .zip(self.rewards)
            .zip(self.dones)
            .zip(self.infos)
            .map(|(((o, r), d), i)| Step::new(o, r, d, i))
            .collect()
    }
}

/// What an aggregate render call hands back.
#[derive(Clone, Debug, PartialEq)]
pub enum Rendered {
    /// The mode only has display side effects.
    Nothing,
    /// Frame of the first instance.
    Frame(RenderFrame),
    /// One frame per instance, in instance order.
    Frames(Vec<RenderFrame>),
}

impl Rendered {
    pub fn is_nothing(&self) -> bool { matches!(self, Rendered::Nothing) }

    pub fn into_frames(self) -> Vec<RenderFrame> {
        match self {
            Rendered::Nothing => Vec::new(),
            Rendered::Frame(frame) => vec![frame],
            Rendered::Frames(frames) => frames,
        }
    }
}

/// Runs N copies of an environment in the current thread.
///
/// - Construct with `SyncVectorEnv::new(n, || MyEnv::default())`
/// - Step with one action per instance: `step(actions)`
/// - Every call visits instances in construction order and returns results in
///   that order. The first instance error aborts the call and is returned as-is.
pub struct SyncVectorEnv<E: Env> {
    envs: Vec<E>,
    closed: Vec<bool>,
    action_space: Batch<E::Space>,
    rng: RngStream,
    render_target: RenderTarget,
}

fn propagate<T>(index: usize, op: &'static str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        warn!(index, op, error = %err, "environment instance failed");
    }
    result
}

impl<E: Env> SyncVectorEnv<E> {
    /// Create N instances using the provided factory closure.
    pub fn new<F>(n: usize, mut factory: F) -> Result<Self>
    where
        F: FnMut() -> E,
    {
        Self::try_new(n, || Ok(factory()))
    }

    /// Create N instances with a fallible factory. Instances built before a
    /// factory failure are closed again.
    pub fn try_new<F>(n: usize, mut factory: F) -> Result<Self>
    where
        F: FnMut() -> Result<E>,
    {
        if n == 0 {
            return Err(EnvError::InvalidInput("a vector environment needs at least one instance".into()));
        }
        let mut envs = Vec::with_capacity(n);
        for index in 0..n {
            match factory() {
                Ok(env) => envs.push(env),
                Err(err) => {
                    warn!(index, error = %err, "environment factory failed");
                    for (built, env) in envs.iter_mut().enumerate() {
                        if let Err(close_err) = env.close() {
                            warn!(index = built, error = %close_err, "failed to close instance after factory failure");
                        }
                    }
                    return Err(err);
                }
            }
        }
        let action_space = Batch::new(envs[0].action_space(), n);
        debug!(num_envs = n, "created vector environment");
        Ok(Self {
            envs,
            closed: vec![false; n],
            action_space,
            rng: rng_from_seed(DEFAULT_SEED),
            render_target: RenderTarget::default(),
        })
    }

    /// Create N clones of a template instance.
    pub fn from_template(template: &E, n: usize) -> Result<Self>
    where
        E: Clone,
    {
        Self::new(n, || template.clone())
    }

    /// Create instances as described by `config`, seeding them if it carries a seed.
    pub fn from_config<F>(config: &VecEnvConfig, factory: F) -> Result<Self>
    where
        F: FnMut() -> Result<E>,
    {
        let mut venv = Self::try_new(config.num_envs, factory)?;
        venv.render_target = config.render_target;
        if let Some(seed) = config.seed {
            venv.seed(seed)?;
        }
        Ok(venv)
    }

    /// Number of contained environments.
    pub fn num_envs(&self) -> usize { self.envs.len() }
    pub fn len(&self) -> usize { self.envs.len() }
    /// Always false: construction rejects N = 0.
    pub fn is_empty(&self) -> bool { self.envs.is_empty() }

    /// True once every instance has been closed.
    pub fn is_closed(&self) -> bool { self.closed.iter().all(|&c| c) }

    /// Read-only access to the instances.
    pub fn envs(&self) -> &[E] { &self.envs }

    /// The shared action space: one action per instance.
    pub fn action_space(&self) -> &Batch<E::Space> { &self.action_space }

    /// Sample one action per instance with the vector environment's own RNG.
    pub fn sample_actions(&mut self) -> Vec<E::Act> {
        self.action_space.sample(&mut self.rng)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.iter().any(|&c| c) {
            return Err(EnvError::Closed("vector environment has been closed".into()));
        }
        Ok(())
    }

    fn check_len(&self, what: &str, len: usize) -> Result<()> {
        if len != self.envs.len() {
            return Err(EnvError::InvalidInput(format!(
                "expected {} {what} (one per environment), got {len}",
                self.envs.len()
            )));
        }
        Ok(())
    }

    /// Reset every environment; returns initial observations in order.
    pub fn reset(&mut self) -> Result<Vec<E::Obs>> {
        self.ensure_open()?;
        self.envs
            .iter_mut()
            .enumerate()
            .map(|(i, e)| propagate(i, "reset", e.reset()))
            .collect()
    }

    /// Step every environment with its positional action.
    /// `actions.len()` must equal `self.len()`; otherwise no instance is stepped.
    pub fn step(&mut self, actions: Vec<E::Act>) -> Result<VecStep<E::Obs>> {
        self.ensure_open()?;
        self.check_len("actions", actions.len())?;
        trace!(num_envs = self.envs.len(), "step");
        let mut out = VecStep::with_capacity(self.envs.len());
        for (i, (env, action)) in self.envs.iter_mut().zip(actions).enumerate() {
            out.push(propagate(i, "step", env.step(action))?);
        }
        Ok(out)
    }

    /// Render the first instance (`RenderTarget::One`) or every instance
    /// (`RenderTarget::All`). Frames are returned only for frame-returning modes.
    pub fn render(&mut self, mode: RenderMode, target: RenderTarget) -> Result<Rendered> {
        self.ensure_open()?;
        trace!(%mode, %target, "render");
        let missing = |i: usize| EnvError::NotSupported(format!("environment {i} produced no frame for render mode {mode}"));
        match target {
            RenderTarget::One => {
                let frame = propagate(0, "render", self.envs[0].render(mode))?;
                if !mode.returns_frame() {
                    return Ok(Rendered::Nothing);
                }
                frame.map(Rendered::Frame).ok_or_else(|| missing(0))
            }
            RenderTarget::All => {
                let mut frames = Vec::with_capacity(self.envs.len());
                for (i, env) in self.envs.iter_mut().enumerate() {
                    let frame = propagate(i, "render", env.render(mode))?;
                    if mode.returns_frame() {
                        frames.push(frame.ok_or_else(|| missing(i))?);
                    }
                }
                if mode.returns_frame() { Ok(Rendered::Frames(frames)) } else { Ok(Rendered::Nothing) }
            }
        }
    }

    /// Render with the configured default target.
    pub fn render_default(&mut self, mode: RenderMode) -> Result<Rendered> {
        self.render(mode, self.render_target)
    }

    /// Snapshot every instance, excluding their RNGs by convention.
    pub fn clone_states(&self) -> Result<Vec<E::State>> {
        self.ensure_open()?;
        self.envs
            .iter()
            .enumerate()
            .map(|(i, e)| propagate(i, "clone_state", e.clone_state()))
            .collect()
    }

    /// Snapshot every instance including their RNGs.
    pub fn clone_full_states(&self) -> Result<Vec<E::State>> {
        self.ensure_open()?;
        self.envs
            .iter()
            .enumerate()
            .map(|(i, e)| propagate(i, "clone_full_state", e.clone_full_state()))
            .collect()
    }

    /// Restore instance i from `states[i]`. `states.len()` must equal `self.len()`.
    pub fn restore_states(&mut self, states: Vec<E::State>) -> Result<()> {
        self.ensure_open()?;
        self.check_len("states", states.len())?;
        for (i, (env, state)) in self.envs.iter_mut().zip(states).enumerate() {
            propagate(i, "restore_state", env.restore_state(state))?;
        }
        Ok(())
    }

    pub fn restore_full_states(&mut self, states: Vec<E::State>) -> Result<()> {
        self.ensure_open()?;
        self.check_len("states", states.len())?;
        for (i, (env, state)) in self.envs.iter_mut().zip(states).enumerate() {
            propagate(i, "restore_full_state", env.restore_full_state(state))?;
        }
        Ok(())
    }

    /// Seed every instance with the same value, and reseed the action sampler.
    pub fn seed(&mut self, seed: u64) -> Result<()> {
        self.ensure_open()?;
        debug!(seed, num_envs = self.envs.len(), "seeding vector environment");
        for (i, env) in self.envs.iter_mut().enumerate() {
            propagate(i, "seed", env.seed(seed))?;
        }
        self.rng = rng_from_seed(seed);
        Ok(())
    }

    /// Close every instance exactly once. Calling again is a no-op; after a
    /// failed close, a later call resumes with the instances still open,
    /// starting with the one that failed. Dropping the vector environment does
    /// the same, so a failed instance sees its close called a second time.
    pub fn close(&mut self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        debug!(num_envs = self.envs.len(), "closing vector environment");
        for (i, (env, closed)) in self.envs.iter_mut().zip(self.closed.iter_mut()).enumerate() {
            if *closed { continue; }
            propagate(i, "close", env.close())?;
            *closed = true;
        }
        Ok(())
    }
}

impl<E: Env> Drop for SyncVectorEnv<E> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(error = %err, "failed to close vector environment on drop");
        }
    }
}
