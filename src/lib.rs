pub mod core;
pub mod spaces;
pub mod utils;
pub mod envs;
pub mod registry;
pub mod vector;

pub use crate::core::{Env, EnvError, Info, InfoValue, RenderFrame, RenderMode, RenderTarget, Result, Step};
pub use crate::spaces::{Batch, BoxSpace, Discrete, Space};
pub use crate::envs::{CartPoleEnv, CartPoleState};
pub use crate::registry::{EnvSpec, KwArgs, get_spec, make, make_vec, register};
pub use crate::utils::{encode_png, save_png, save_pngs};
pub use crate::vector::{Rendered, SyncVectorEnv, VecEnvConfig, VecStep};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// A tiny counter environment to validate the trait is implementable in a few lines.
    #[derive(Clone)]
    struct CounterEnv {
        state: i32,
    }

    impl Env for CounterEnv {
        type Obs = i32;
        type Act = u32;
        type State = i32;
        type Space = Discrete;

        fn action_space(&self) -> Discrete { Discrete::new(3) }

        fn reset(&mut self) -> Result<i32> {
            self.state = 0;
            Ok(self.state)
        }

        fn step(&mut self, action: u32) -> Result<Step<i32>> {
            self.state += action as i32;
            Ok(Step::new(self.state, 1.0, self.state >= 3, Info::new()))
        }

        fn render(&mut self, mode: RenderMode) -> Result<Option<RenderFrame>> {
            Ok(mode.returns_frame().then(|| RenderFrame::Text(format!("state={}", self.state))))
        }

        fn seed(&mut self, _seed: u64) -> Result<()> { Ok(()) }
        fn close(&mut self) -> Result<()> { Ok(()) }
        fn clone_state(&self) -> Result<i32> { Ok(self.state) }
        fn clone_full_state(&self) -> Result<i32> { Ok(self.state) }
        fn restore_state(&mut self, state: i32) -> Result<()> { self.state = state; Ok(()) }
        fn restore_full_state(&mut self, state: i32) -> Result<()> { self.state = state; Ok(()) }
    }

    #[test]
    fn counter_env_runs() {
        let mut env = CounterEnv { state: 0 };
        env.reset().unwrap();
        let s1 = env.step(1).unwrap();
        assert_eq!(s1.observation, 1);
        assert!(!s1.done);
        let s2 = env.step(2).unwrap();
        assert!(s2.done);
        assert!(matches!(env.render(RenderMode::Ansi).unwrap(), Some(RenderFrame::Text(_))));
        env.close().unwrap();
    }

    #[test]
    fn counter_env_vectorizes() {
        let mut v = SyncVectorEnv::from_template(&CounterEnv { state: 0 }, 2).unwrap();
        v.reset().unwrap();
        let s = v.step(vec![1, 2]).unwrap();
        assert_eq!(s.observations, vec![1, 2]);
        assert!(matches!(v.render(RenderMode::Ansi, RenderTarget::One).unwrap(), Rendered::Frame(RenderFrame::Text(t)) if t == "state=1"));
    }

    #[test]
    fn render_mode_and_target_parse() {
        assert_eq!("rgb_array".parse::<RenderMode>().unwrap(), RenderMode::RgbArray);
        assert_eq!("human".parse::<RenderMode>().unwrap(), RenderMode::Human);
        assert_eq!(RenderMode::Ansi.to_string(), "ansi");
        assert_eq!("all".parse::<RenderTarget>().unwrap(), RenderTarget::All);
        assert_eq!(RenderTarget::default(), RenderTarget::One);
        assert_eq!(RenderTarget::All.to_string(), "all");
        assert_eq!(RenderTarget::One.as_str().parse::<RenderTarget>().unwrap(), RenderTarget::One);
        assert!(matches!("sideways".parse::<RenderTarget>(), Err(EnvError::InvalidInput(_))));
        assert!(!RenderMode::Human.returns_frame());
    }

    #[test]
    fn info_insert_replaces_existing_key() {
        let mut info = Info::new().with("a", 1).with("b", "x");
        info.insert("a", 2.5f64);
        assert_eq!(info.len(), 2);
        assert_eq!(info.get("a"), Some(&InfoValue::F64(2.5)));
        assert_eq!(info.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn spaces_discrete_and_box() {
        let mut rng = StdRng::seed_from_u64(42);
        let d = Discrete::new(5);
        for _ in 0..100 {
            let v = d.sample(&mut rng);
            assert!(d.contains(&v));
        }

        let b = BoxSpace::new([0.0, -1.0, 2.5], [1.0, 1.0, 3.5]);
        for _ in 0..100 {
            let v = b.sample(&mut rng);
            assert!(b.contains(&v));
        }
        assert!(!b.contains(&[2.0, 0.0, 3.0]));
    }
}
