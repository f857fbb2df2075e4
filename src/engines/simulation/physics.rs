use crate::config::{ConfigSection, NumericPolicy, PhysicsConfig};
use crate::engines::generation::genome::Genome;
use crate::engines::simulation::trajectory::{ForceSign, Trajectory, TrajectoryStep};
use crate::error::Result;
use std::f64::consts::PI;

/// Initial pole tilt, 5 degrees
pub const INITIAL_ANGLE: f64 = PI / 36.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartPoleState {
    pub cart_position: f64,
    pub cart_velocity: f64,
    pub pole_angle: f64,
    pub pole_angular_velocity: f64,
}

impl CartPoleState {
    pub fn initial() -> Self {
        Self {
            cart_position: 0.0,
            cart_velocity: 0.0,
            pole_angle: INITIAL_ANGLE,
            pole_angular_velocity: 0.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.cart_position.is_finite()
            && self.cart_velocity.is_finite()
            && self.pole_angle.is_finite()
            && self.pole_angular_velocity.is_finite()
    }
}

/// Deterministic cart-pole simulator scoring a genome by survival time
///
/// Integration is semi-implicit Euler with a fixed step: positions advance
/// with the previous step's velocities, then the bang-bang force is chosen
/// and velocities are updated from the coupled equations of motion.
#[derive(Debug, Clone)]
pub struct PhysicsModel {
    config: PhysicsConfig,
}

impl PhysicsModel {
    pub fn new(config: PhysicsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Survival time in milliseconds: the start time of the failing step, or
    /// `time_total_ms` if the pole never falls.
    pub fn evaluate(&self, genome: &Genome) -> u32 {
        self.simulate(genome, |_| {})
    }

    /// Same episode as [`PhysicsModel::evaluate`], keeping every step.
    pub fn trace(&self, genome: &Genome) -> Trajectory {
        // One row per executed step, the failing step included.
        let mut steps = Vec::with_capacity(self.config.max_steps() as usize + 1);
        let fitness = self.simulate(genome, |step| steps.push(*step));
        Trajectory {
            genome: *genome,
            fitness,
            steps,
        }
    }

    fn simulate<F>(&self, genome: &Genome, mut observe: F) -> u32
    where
        F: FnMut(&TrajectoryStep),
    {
        let delta = self.config.delta_seconds();
        let gains = (*genome.genes()).map(f64::from);
        let mut state = CartPoleState::initial();
        let mut t = 0;

        while t < self.config.time_total_ms {
            state.cart_position += delta * state.cart_velocity;
            state.pole_angle += delta * state.pole_angular_velocity;

            let force_sign = control(&gains, &state);
            observe(&TrajectoryStep {
                cart_position: state.cart_position,
                pole_angle: state.pole_angle,
                force_sign,
            });

            let force = force_sign.as_f64() * self.config.force_magnitude;
            let (cart_acceleration, pole_acceleration) = self.accelerations(&state, force);

            state.cart_velocity += delta * cart_acceleration;
            // The pole equation is written for the opposite angular convention.
            state.pole_angular_velocity -= delta * pole_acceleration;

            if self.has_failed(&state, t) {
                break;
            }
            t += self.config.time_step_ms;
        }

        t
    }

    /// Cart and pole accelerations of the inverted pendulum on a cart.
    pub fn accelerations(&self, state: &CartPoleState, force: f64) -> (f64, f64) {
        let l = self.config.pole_length;
        let mp = self.config.pole_mass;
        let mc = self.config.cart_mass;
        let g = self.config.gravity;
        let (sin, cos) = state.pole_angle.sin_cos();
        let w = state.pole_angular_velocity;

        let cart = (force + mp * l * sin * w * w - mp * g * cos * sin)
            / (mc + mp - mp * cos * cos);
        let pole = (force * cos - g * (mc + mp) * sin + mp * l * cos * sin * w)
            / (mp * l * cos * cos - (mc + mp) * l);

        (cart, pole)
    }

    fn has_failed(&self, state: &CartPoleState, t: u32) -> bool {
        if self.config.numeric_policy == NumericPolicy::FailOnNonFinite && !state.is_finite() {
            log::warn!("non-finite cart-pole state at t={}ms, ending episode: {:?}", t, state);
            return true;
        }
        state.cart_position.abs() >= self.config.fail_position_m
            || state.pole_angle.abs() > self.config.fail_angle_rad
    }
}

/// Bang-bang control law; a zero sum pushes in the negative direction.
fn control(gains: &[f64; 4], state: &CartPoleState) -> ForceSign {
    let sum = gains[0] * state.cart_position
        + gains[1] * state.cart_velocity
        + gains[2] * state.pole_angle
        + gains[3] * state.pole_angular_velocity;

    if sum > 0.0 {
        ForceSign::Positive
    } else {
        ForceSign::Negative
    }
}
