// Core traits and types: the per-instance capability set every environment exposes.

use std::fmt;
use std::str::FromStr;

use crate::spaces::Space;

/// A small ordered key/value map attached to each step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Info {
    entries: Vec<(String, InfoValue)>,
}

impl Info {
    pub fn new() -> Self { Self { entries: Vec::new() } }

    /// Insert or replace a key with the given value.
    pub fn insert<K: Into<String>, V: Into<InfoValue>>(&mut self, key: K, value: V) {
        let k = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(kk, _)| *kk == k) {
            Some((_, v)) => *v = value,
            None => self.entries.push((k, value)),
        }
    }

    /// Builder-style insert.
    pub fn with<K: Into<String>, V: Into<InfoValue>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&InfoValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InfoValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn len(&self) -> usize { self.entries.len() }
}

/// Value types carried by [`Info`].
#[derive(Clone, Debug, PartialEq)]
pub enum InfoValue {
    Bool(bool),
    I64(i64),
    F64(f64),
    Str(String),
}

impl From<bool> for InfoValue { fn from(v: bool) -> Self { InfoValue::Bool(v) } }
impl From<i64> for InfoValue { fn from(v: i64) -> Self { InfoValue::I64(v) } }
impl From<i32> for InfoValue { fn from(v: i32) -> Self { InfoValue::I64(v as i64) } }
impl From<u32> for InfoValue { fn from(v: u32) -> Self { InfoValue::I64(v as i64) } }
impl From<f64> for InfoValue { fn from(v: f64) -> Self { InfoValue::F64(v) } }
impl From<f32> for InfoValue { fn from(v: f32) -> Self { InfoValue::F64(v as f64) } }
impl From<&str> for InfoValue { fn from(v: &str) -> Self { InfoValue::Str(v.to_string()) } }
impl From<String> for InfoValue { fn from(v: String) -> Self { InfoValue::Str(v) } }

/// A frame produced by `Env::render`.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderFrame {
    /// Textual representation of a frame (ANSI art or a debug string).
    Text(String),
    /// Raw pixel buffer in row-major RGB or RGBA format.
    Pixels {
        width: u32,
        height: u32,
        /// Pixel data. RGB uses 3 bytes per pixel, RGBA uses 4.
        data: Vec<u8>,
    },
}

/// How an environment should render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RenderMode {
    /// Display side effect only; nothing is returned.
    #[default]
    Human,
    /// Return a pixel buffer.
    RgbArray,
    /// Return a text frame.
    Ansi,
}

impl RenderMode {
    /// Whether rendering in this mode hands a frame back to the caller.
    pub fn returns_frame(self) -> bool { !matches!(self, RenderMode::Human) }

    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Human => "human",
            RenderMode::RgbArray => "rgb_array",
            RenderMode::Ansi => "ansi",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for RenderMode {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "human" => Ok(RenderMode::Human),
            "rgb_array" => Ok(RenderMode::RgbArray),
            "ansi" => Ok(RenderMode::Ansi),
            other => Err(EnvError::InvalidInput(format!("unknown render mode: {other}"))),
        }
    }
}

/// Which instances of a vector environment a render call reaches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RenderTarget {
    /// Only the first instance.
    #[default]
    One,
    /// Every instance, in order.
    All,
}

impl RenderTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderTarget::One => "one",
            RenderTarget::All => "all",
        }
    }
}

impl fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for RenderTarget {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "one" => Ok(RenderTarget::One),
            "all" => Ok(RenderTarget::All),
            other => Err(EnvError::InvalidInput(format!("unknown render target: {other}"))),
        }
    }
}

/// The result of a single environment step.
#[derive(Clone, Debug, PartialEq)]
pub struct Step<Obs> {
    pub observation: Obs,
    pub reward: f32,
    pub done: bool,
    pub info: Info,
}

impl<Obs> Step<Obs> {
    pub fn new(observation: Obs, reward: f32, done: bool, info: Info) -> Self {
        Self { observation, reward, done, info }
    }
}

/// Recoverable errors across environment APIs.
///
/// Vector environments return instance errors unchanged, so every variant can
/// surface from an aggregate call.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EnvError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid action: {0}")]
    InvalidAction(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Environment closed: {0}")]
    Closed(String),
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    #[error("Other error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, EnvError>;

/// The capability set of a single environment instance.
///
/// `State` is an opaque snapshot. By convention `clone_state` leaves out the
/// instance's pseudo-random generator and `clone_full_state` includes it, so a
/// full restore also reproduces future resets.
pub trait Env {
    type Obs;
    type Act;
    type State;
    type Space: Space<Element = Self::Act>;

    /// Describes the actions `step` accepts.
    fn action_space(&self) -> Self::Space;

    /// Reset to an initial state and return the first observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Apply an action and advance by one step.
    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>>;

    /// Render the current state. Frame-returning modes yield `Some`.
    fn render(&mut self, mode: RenderMode) -> Result<Option<RenderFrame>>;

    /// Re-seed the instance's random generator.
    fn seed(&mut self, seed: u64) -> Result<()>;

    /// Release any external resources.
    fn close(&mut self) -> Result<()>;

    fn clone_state(&self) -> Result<Self::State>;

    fn clone_full_state(&self) -> Result<Self::State>;

    fn restore_state(&mut self, state: Self::State) -> Result<()>;

    fn restore_full_state(&mut self, state: Self::State) -> Result<()>;
}
