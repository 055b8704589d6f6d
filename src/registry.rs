//! Registration and specs: a process-wide registry that builds environments,
//! or whole vector environments, from an id plus kwargs.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use tracing::debug;

use crate::core::{Env, EnvError, Result};
use crate::vector::{SyncVectorEnv, VecEnvConfig};

/// Key-value kwargs for `make()`. Stringly-typed; factories parse what they need.
pub type KwArgs = HashMap<String, String>;

/// Environment specification metadata.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvSpec {
    /// Unique identifier like "CartPole-v1".
    pub id: String,
    /// Target reward threshold for a "solved" score, if defined.
    pub reward_threshold: Option<f32>,
    /// Whether the environment has nondeterminism beyond its RNG seed.
    pub nondeterministic: bool,
    pub version: Option<String>,
}

impl EnvSpec {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self { id: id.into(), reward_threshold: None, nondeterministic: false, version: None }
    }
}

type Factory<E> = Arc<dyn Fn(&KwArgs) -> Result<E> + Send + Sync>;

struct Entry {
    spec: EnvSpec,
    // Holds a `Factory<E>` for the registered `E`.
    factory: Box<dyn Any + Send + Sync>,
}

#[derive(Default)]
struct Registry {
    entries: RwLock<HashMap<String, Entry>>,
}

impl Registry {
    fn register(&self, spec: EnvSpec, factory: Box<dyn Any + Send + Sync>) -> Result<()> {
        let mut g = self.entries.write().map_err(|_| EnvError::Other("registry poisoned".into()))?;
        if g.contains_key(&spec.id) {
            return Err(EnvError::InvalidInput(format!("Env id already registered: {}", spec.id)));
        }
        debug!(id = %spec.id, "registered environment");
        g.insert(spec.id.clone(), Entry { spec, factory });
        Ok(())
    }

    fn get_spec(&self, id: &str) -> Option<EnvSpec> {
        let g = self.entries.read().ok()?;
        g.get(id).map(|e| e.spec.clone())
    }

    fn factory<E: 'static>(&self, id: &str) -> Result<Factory<E>> {
        let g = self.entries.read().map_err(|_| EnvError::Other("registry poisoned".into()))?;
        let entry = g
            .get(id)
            .ok_or_else(|| EnvError::InvalidInput(format!("Unknown environment id: {id}")))?;
        entry
            .factory
            .downcast_ref::<Factory<E>>()
            .cloned()
            .ok_or_else(|| {
                EnvError::InvalidInput(format!(
                    "Env id {id} was not registered for type {}",
                    std::any::type_name::<E>()
                ))
            })
    }
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::default)
}

/// Register an environment spec and its factory globally.
pub fn register<E, F>(spec: EnvSpec, factory: F) -> Result<()>
where
    E: Env + 'static,
    F: Fn(&KwArgs) -> Result<E> + Send + Sync + 'static,
{
    let factory: Factory<E> = Arc::new(factory);
    registry().register(spec, Box::new(factory))
}

/// Fetch a registered EnvSpec by id.
pub fn get_spec(id: &str) -> Option<EnvSpec> { registry().get_spec(id) }

/// Construct one environment by id. `E` must be the type the id was registered with.
pub fn make<E: Env + 'static>(id: &str, kwargs: &KwArgs) -> Result<E> {
    let factory = registry().factory::<E>(id)?;
    (*factory)(kwargs)
}

/// Construct a vector environment whose instances all come from the same
/// registered factory and kwargs.
pub fn make_vec<E: Env + 'static>(id: &str, kwargs: &KwArgs, config: &VecEnvConfig) -> Result<SyncVectorEnv<E>> {
    let factory = registry().factory::<E>(id)?;
    debug!(id, num_envs = config.num_envs, "making vector environment");
    SyncVectorEnv::from_config(config, || (*factory)(kwargs))
}
