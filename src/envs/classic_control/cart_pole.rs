use rand::distributions::{Distribution, Uniform};

use crate::core::{Env, EnvError, Info, RenderFrame, RenderMode, Result, Step};
use crate::spaces::Discrete;
use crate::utils::render2d::{Canvas, BEIGE, BLACK, GRAY, MAUVE, WHITE};
use crate::utils::rng::{rng_from_seed, RngStream, DEFAULT_SEED};

const GRAVITY: f32 = 9.8;
const MASSCART: f32 = 1.0;
const MASSPOLE: f32 = 0.1;
const TOTAL_MASS: f32 = MASSCART + MASSPOLE;
const LENGTH: f32 = 0.5; // half the pole's length
const POLEMASS_LENGTH: f32 = MASSPOLE * LENGTH;
const FORCE_MAG: f32 = 10.0;
const TAU: f32 = 0.02; // seconds between state updates
const X_THRESHOLD: f32 = 2.4;

/// Snapshot of a [`CartPoleEnv`].
///
/// `rng` is only present in full snapshots.
#[derive(Clone, Debug)]
pub struct CartPoleState {
    pub physics: [f32; 4],
    pub steps: u32,
    pub rng: Option<RngStream>,
}

/// CartPole-v1 classic control environment.
/// Observation: [x, x_dot, theta, theta_dot]
/// Action space: Discrete(2) {0: push left, 1: push right}
/// Reward: 1.0 per step; done when the pole falls, the cart leaves the track,
/// or `max_episode_steps` elapse.
#[derive(Clone, Debug)]
pub struct CartPoleEnv {
    x: f32,
    x_dot: f32,
    theta: f32,
    theta_dot: f32,

    steps: u32,
    pub max_episode_steps: u32,

    rng: RngStream,
    theta_threshold_radians: f32,
    closed: bool,
}

impl Default for CartPoleEnv {
    fn default() -> Self { Self::new(DEFAULT_SEED) }
}

impl CartPoleEnv {
    pub fn new(seed: u64) -> Self {
        Self {
            x: 0.0,
            x_dot: 0.0,
            theta: 0.0,
            theta_dot: 0.0,
            steps: 0,
            max_episode_steps: 500,
            rng: rng_from_seed(seed),
            theta_threshold_radians: 12.0_f32.to_radians(),
            closed: false,
        }
    }

    /// Number of steps taken since the last reset.
    pub fn steps(&self) -> u32 { self.steps }

    /// RGBA rendering of the current state; does not open a window.
    pub fn render_pixels(&self, width: u32, height: u32) -> RenderFrame {
        let mut canvas = Canvas::new(width.max(64), height.max(48));
        canvas.clear(WHITE);

        let w = canvas.width as i32;
        let h = canvas.height as i32;
        let scale = canvas.width as f32 / (2.0 * X_THRESHOLD); // pixels per meter

        let track_y = (h as f32 * 0.75) as i32;
        canvas.draw_line(0, track_y, w - 1, track_y, GRAY);

        let cart_cx = w as f32 * 0.5 + self.x * scale;
        let (cart_w, cart_h) = (50, 30);
        let cart_x = cart_cx as i32 - cart_w / 2;
        let cart_y = track_y - cart_h;
        canvas.fill_rect(cart_x, cart_y, cart_w, cart_h, BLACK);

        // Pole hinged at the top-center of the cart; theta is measured from vertical.
        let pole_len_px = (2.0 * LENGTH * scale).max(1.0);
        let (top_x, top_y) = (cart_cx as i32, cart_y);
        let end_x = top_x + (self.theta.sin() * pole_len_px) as i32;
        let end_y = top_y - (self.theta.cos() * pole_len_px) as i32;

        let dx = (end_x - top_x) as f32;
        let dy = (end_y - top_y) as f32;
        let len = (dx * dx + dy * dy).sqrt().max(1.0);
        let (nx, ny) = (-dy / len, dx / len);
        for i in -3..=3 {
            let offx = (nx * i as f32).round() as i32;
            let offy = (ny * i as f32).round() as i32;
            canvas.draw_line(top_x + offx, top_y + offy, end_x + offx, end_y + offy, BEIGE);
        }
        canvas.fill_circle(top_x, top_y, 5, MAUVE);

        canvas.into_render_frame()
    }

    fn render_text(&self) -> String {
        format!(
            "x={:+.3} x_dot={:+.3} theta={:+.3} theta_dot={:+.3} steps={}",
            self.x, self.x_dot, self.theta, self.theta_dot, self.steps
        )
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(EnvError::Closed("CartPoleEnv".into()));
        }
        Ok(())
    }

    fn fallen(&self) -> bool {
        self.x.abs() > X_THRESHOLD || self.theta.abs() > self.theta_threshold_radians
    }

    fn obs(&self) -> [f32; 4] { [self.x, self.x_dot, self.theta, self.theta_dot] }

    fn set_physics(&mut self, physics: [f32; 4], steps: u32) {
        [self.x, self.x_dot, self.theta, self.theta_dot] = physics;
        self.steps = steps;
    }
}

impl Env for CartPoleEnv {
    type Obs = [f32; 4];
    type Act = u32;
    type State = CartPoleState;
    type Space = Discrete;

    fn action_space(&self) -> Discrete { Discrete::new(2) }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.ensure_open()?;
        let noise = Uniform::new_inclusive(-0.05f32, 0.05f32);
        self.x = noise.sample(&mut self.rng);
        self.x_dot = noise.sample(&mut self.rng);
        self.theta = noise.sample(&mut self.rng);
        self.theta_dot = noise.sample(&mut self.rng);
        self.steps = 0;
        Ok(self.obs())
    }

    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>> {
        self.ensure_open()?;
        let force = match action {
            0 => -FORCE_MAG,
            1 => FORCE_MAG,
            other => return Err(EnvError::InvalidAction(format!("CartPole action must be 0 or 1, got {other}"))),
        };
        let cos_theta = self.theta.cos();
        let sin_theta = self.theta.sin();

        let temp = (force + POLEMASS_LENGTH * self.theta_dot.powi(2) * sin_theta) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (LENGTH * (4.0 / 3.0 - MASSPOLE * cos_theta.powi(2) / TOTAL_MASS));
        let x_acc = temp - POLEMASS_LENGTH * theta_acc * cos_theta / TOTAL_MASS;

        // Euler integration
        self.x += TAU * self.x_dot;
        self.x_dot += TAU * x_acc;
        self.theta += TAU * self.theta_dot;
        self.theta_dot += TAU * theta_acc;

        self.steps += 1;
        let fallen = self.fallen();
        let truncated = self.steps >= self.max_episode_steps;
        let mut info = Info::new();
        if truncated && !fallen {
            info.insert("TimeLimit.truncated", true);
        }
        Ok(Step::new(self.obs(), 1.0, fallen || truncated, info))
    }

    fn render(&mut self, mode: RenderMode) -> Result<Option<RenderFrame>> {
        self.ensure_open()?;
        match mode {
            RenderMode::RgbArray => Ok(Some(self.render_pixels(600, 400))),
            RenderMode::Ansi => Ok(Some(RenderFrame::Text(self.render_text()))),
            RenderMode::Human => {
                println!("{}", self.render_text());
                Ok(None)
            }
        }
    }

    fn seed(&mut self, seed: u64) -> Result<()> {
        self.ensure_open()?;
        self.rng = rng_from_seed(seed);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }

    fn clone_state(&self) -> Result<CartPoleState> {
        self.ensure_open()?;
        Ok(CartPoleState { physics: self.obs(), steps: self.steps, rng: None })
    }

    fn clone_full_state(&self) -> Result<CartPoleState> {
        self.ensure_open()?;
        Ok(CartPoleState { physics: self.obs(), steps: self.steps, rng: Some(self.rng.clone()) })
    }

    fn restore_state(&mut self, state: CartPoleState) -> Result<()> {
        self.ensure_open()?;
        self.set_physics(state.physics, state.steps);
        Ok(())
    }

    fn restore_full_state(&mut self, state: CartPoleState) -> Result<()> {
        self.ensure_open()?;
        let rng = state
            .rng
            .ok_or_else(|| EnvError::InvalidState("full restore needs a snapshot taken with clone_full_state".into()))?;
        self.set_physics(state.physics, state.steps);
        self.rng = rng;
        Ok(())
    }
}
