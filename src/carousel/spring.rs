// File: ./src/carousel/spring.rs
// Damped spring driven by explicit time steps
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub damping: f32,
    pub stiffness: f32,
    pub mass: f32,
}

impl SpringConfig {
    /// Paging motion toward a neighbouring frame.
    pub const PAGE: SpringConfig = SpringConfig {
        damping: 20.0,
        stiffness: 200.0,
        mass: 0.5,
    };

    /// Snap back to the resting position.
    pub const SNAP_BACK: SpringConfig = SpringConfig {
        damping: 20.0,
        stiffness: 200.0,
        mass: 1.0,
    };
}

const REST_DISPLACEMENT: f32 = 0.5;
const REST_SPEED: f32 = 2.0;
const STEP: f32 = 0.001;
// Hard stop so a pathological config cannot animate forever
const MAX_DURATION: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    config: SpringConfig,
    position: f32,
    velocity: f32,
    target: f32,
    elapsed: f32,
    settled: bool,
}

impl Spring {
    pub fn new(config: SpringConfig, from: f32, to: f32, velocity: f32) -> Self {
        let mut spring = Self {
            config,
            position: from,
            velocity,
            target: to,
            elapsed: 0.0,
            settled: false,
        };
        spring.check_rest();
        spring
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Advances the simulation. Returns true once the spring has come to rest
    /// on its target.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let mut remaining = dt.as_secs_f32();
        while !self.settled && remaining > 0.0 {
            let h = remaining.min(STEP);
            let displacement = self.position - self.target;
            let force = -self.config.stiffness * displacement - self.config.damping * self.velocity;
            self.velocity += force / self.config.mass * h;
            self.position += self.velocity * h;
            self.elapsed += h;
            remaining -= h;
            self.check_rest();
        }
        self.settled
    }

    fn check_rest(&mut self) {
        let at_rest = (self.position - self.target).abs() < REST_DISPLACEMENT
            && self.velocity.abs() < REST_SPEED;
        if at_rest || self.elapsed >= MAX_DURATION {
            self.position = self.target;
            self.velocity = 0.0;
            self.settled = true;
        }
    }
}
