use synchrony::{CartPoleEnv, Env, EnvError, RenderFrame, RenderMode, RenderTarget, Rendered, SyncVectorEnv, VecEnvConfig};

// A vector env with N=1 produces the same rollout as a single env
// when seeds and actions are the same.
#[test]
fn single_vs_vector_n1_same_rollout() {
    let mut single = CartPoleEnv::default();
    single.seed(0).unwrap();
    single.reset().unwrap();

    let mut vec_env = SyncVectorEnv::new(1, CartPoleEnv::default).unwrap();
    vec_env.seed(0).unwrap();
    vec_env.reset().unwrap();

    for a in [1, 1, 0, 1, 0, 0, 1, 1, 1, 0] {
        let s_single = single.step(a).unwrap();
        let s_vec = vec_env.step(vec![a]).unwrap().into_steps().remove(0);
        assert_eq!(s_single.observation, s_vec.observation);
        assert!((s_single.reward - s_vec.reward).abs() < 1e-6);
        assert_eq!(s_single.done, s_vec.done);
        if s_single.done { break; }
    }
}

#[test]
fn same_seed_gives_every_instance_the_same_start() {
    let mut v = SyncVectorEnv::new(3, CartPoleEnv::default).unwrap();
    v.seed(123).unwrap();
    let obs = v.reset().unwrap();
    assert_eq!(obs.len(), 3);
    assert_eq!(obs[0], obs[1]);
    assert_eq!(obs[1], obs[2]);
}

#[test]
fn restoring_snapshots_replays_the_same_observations() {
    let mut v = SyncVectorEnv::new(2, CartPoleEnv::default).unwrap();
    v.seed(5).unwrap();
    v.reset().unwrap();
    v.step(vec![1, 0]).unwrap();

    let actions = [[0, 1], [1, 1], [0, 0], [1, 0]];
    let snapshot = v.clone_states().unwrap();
    let first: Vec<_> = actions.iter().map(|a| v.step(a.to_vec()).unwrap().observations).collect();

    v.restore_states(snapshot).unwrap();
    let second: Vec<_> = actions.iter().map(|a| v.step(a.to_vec()).unwrap().observations).collect();
    assert_eq!(first, second);
}

#[test]
fn full_snapshots_also_replay_resets() {
    let mut v = SyncVectorEnv::new(2, CartPoleEnv::default).unwrap();
    v.seed(77).unwrap();
    v.reset().unwrap();

    let snapshot = v.clone_full_states().unwrap();
    let first = v.reset().unwrap();
    v.restore_full_states(snapshot).unwrap();
    assert_eq!(v.reset().unwrap(), first);

    let partial = v.clone_states().unwrap();
    assert!(matches!(v.restore_full_states(partial), Err(EnvError::InvalidState(_))));
}

#[test]
fn wrong_snapshot_count_is_rejected() {
    let mut v = SyncVectorEnv::new(3, CartPoleEnv::default).unwrap();
    v.reset().unwrap();
    let mut states = v.clone_states().unwrap();
    states.pop();
    assert!(matches!(v.restore_states(states), Err(EnvError::InvalidInput(_))));
}

#[test]
fn instance_errors_surface_unchanged() {
    let mut v = SyncVectorEnv::new(2, CartPoleEnv::default).unwrap();
    v.reset().unwrap();
    let err = v.step(vec![0, 7]).unwrap_err();
    assert_eq!(err, EnvError::InvalidAction("CartPole action must be 0 or 1, got 7".into()));
}

#[test]
fn rgb_render_of_all_instances() {
    let mut v = SyncVectorEnv::from_config(&VecEnvConfig::new(3).with_seed(1), || Ok(CartPoleEnv::default())).unwrap();
    v.reset().unwrap();
    let Rendered::Frames(frames) = v.render(RenderMode::RgbArray, RenderTarget::All).unwrap() else {
        panic!("expected one frame per instance");
    };
    assert_eq!(frames.len(), 3);
    for frame in &frames {
        let RenderFrame::Pixels { width, height, data } = frame else { panic!("expected pixels") };
        assert_eq!(data.len(), (*width as usize) * (*height as usize) * 4);
    }
    assert!(matches!(v.render(RenderMode::RgbArray, RenderTarget::One).unwrap(), Rendered::Frame(RenderFrame::Pixels { .. })));
}

#[test]
fn sampled_actions_fit_step() {
    let mut v = SyncVectorEnv::new(4, CartPoleEnv::default).unwrap();
    v.reset().unwrap();
    let actions = v.sample_actions();
    assert_eq!(actions.len(), 4);
    let steps = v.step(actions).unwrap();
    assert_eq!(steps.len(), 4);
}

#[test]
fn close_twice_then_refuse_work() {
    let mut v = SyncVectorEnv::new(2, CartPoleEnv::default).unwrap();
    v.close().unwrap();
    v.close().unwrap();
    assert!(v.is_closed());
    assert!(matches!(v.seed(1), Err(EnvError::Closed(_))));
    assert!(matches!(v.render(RenderMode::Ansi, RenderTarget::One), Err(EnvError::Closed(_))));
}
