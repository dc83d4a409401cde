//! Closed-form damped harmonic oscillator
//!
//! Solves `m·a = -k·x - γ·v` for a single particle. The damping regime is
//! chosen from the sign of the discriminant `D = (γ/2m)² - k/m`:
//!
//! - `D > 0` overdamped: two real roots, no oscillation
//! - `D = 0` critically damped: one repeated root
//! - `D < 0` underdamped: decaying oscillation
//!
//! Velocities are the analytic derivatives of each branch, not finite
//! differences. Every branch is written in terms of `x₀` and `v₀` directly so
//! that evaluating at `t = 0` returns the initial conditions exactly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors building an oscillator from parameters
#[derive(Debug, Error)]
pub enum OscillatorError {
    #[error("invalid oscillator parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("failed to parse oscillator parameters: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Damping regime selected by the discriminant sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regime {
    Overdamped,
    CriticallyDamped,
    Underdamped,
}

/// A single damped harmonic oscillator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DampedOscillator {
    /// Spring constant `k`
    pub spring_constant: f64,
    /// Damping coefficient `γ`
    pub damping: f64,
    /// Mass `m`
    pub mass: f64,
}

impl DampedOscillator {
    /// Creates an oscillator, rejecting non-physical parameters
    ///
    /// # Errors
    ///
    /// `InvalidParameter` unless `k ≥ 0`, `γ ≥ 0` and `m > 0`, all finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody::oscillator::{DampedOscillator, Regime};
    ///
    /// let osc = DampedOscillator::new(1e4, 100.0, 70.0).unwrap();
    /// assert_eq!(osc.regime(), Regime::Underdamped);
    /// ```
    pub fn new(spring_constant: f64, damping: f64, mass: f64) -> Result<Self, OscillatorError> {
        check("spring_constant", spring_constant, |v| v >= 0.0, "must be finite and >= 0")?;
        check("damping", damping, |v| v >= 0.0, "must be finite and >= 0")?;
        check("mass", mass, |v| v > 0.0, "must be finite and > 0")?;

        Ok(Self {
            spring_constant,
            damping,
            mass,
        })
    }

    /// `(γ/2m)² - k/m`
    pub fn discriminant(&self) -> f64 {
        let half_rate = self.damping / (2.0 * self.mass);
        half_rate * half_rate - self.spring_constant / self.mass
    }

    /// Damping regime from the discriminant sign
    ///
    /// The critical branch needs `D == 0.0` exactly. Generic floating-point
    /// parameters essentially never land on it; it exists for parameters
    /// chosen to be critical (e.g. `k = 1, γ = 2, m = 1`).
    pub fn regime(&self) -> Regime {
        let d = self.discriminant();
        if d > 0.0 {
            Regime::Overdamped
        } else if d == 0.0 {
            Regime::CriticallyDamped
        } else {
            Regime::Underdamped
        }
    }

    /// Damping ratio ζ = γ / (2·sqrt(k·m)); 1 at critical damping
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.spring_constant * self.mass).sqrt())
    }

    /// Solves for the trajectory starting at `x0` with velocity `v0`
    pub fn solve(&self, x0: f64, v0: f64) -> OscillatorSolution {
        let d = self.discriminant();
        let decay = -self.damping / (2.0 * self.mass);

        match self.regime() {
            Regime::Overdamped => {
                let root = d.sqrt();
                OscillatorSolution::Overdamped {
                    r1: decay + root,
                    r2: decay - root,
                    x0,
                    v0,
                }
            }
            Regime::CriticallyDamped => OscillatorSolution::CriticallyDamped {
                r: decay,
                x0,
                v0,
            },
            Regime::Underdamped => OscillatorSolution::Underdamped {
                alpha: decay,
                beta: (-d).sqrt(),
                x0,
                v0,
            },
        }
    }
}

fn check(
    name: &'static str,
    value: f64,
    valid: impl Fn(f64) -> bool,
    reason: &'static str,
) -> Result<(), OscillatorError> {
    if value.is_finite() && valid(value) {
        Ok(())
    } else {
        Err(OscillatorError::InvalidParameter {
            name,
            value,
            reason,
        })
    }
}

/// Closed-form trajectory for one set of initial conditions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OscillatorSolution {
    /// `x = C₁e^(r₁t) + C₂e^(r₂t)`
    Overdamped { r1: f64, r2: f64, x0: f64, v0: f64 },
    /// `x = (C₁ + C₂t)e^(rt)`, `C₁ = x₀`, `C₂ = v₀ - r·x₀`
    CriticallyDamped { r: f64, x0: f64, v0: f64 },
    /// `x = e^(αt)(A·cos βt + B·sin βt)`, `A = x₀`, `B = (v₀ - α·x₀)/β`
    Underdamped {
        alpha: f64,
        beta: f64,
        x0: f64,
        v0: f64,
    },
}

impl OscillatorSolution {
    pub fn regime(&self) -> Regime {
        match self {
            Self::Overdamped { .. } => Regime::Overdamped,
            Self::CriticallyDamped { .. } => Regime::CriticallyDamped,
            Self::Underdamped { .. } => Regime::Underdamped,
        }
    }

    /// The two coefficients multiplying the branch's basis functions
    ///
    /// `(C₁, C₂)` for the overdamped and critical branches, `(A, B)` for the
    /// underdamped one.
    pub fn coefficients(&self) -> (f64, f64) {
        match *self {
            Self::Overdamped { r1, r2, x0, v0 } => {
                let span = r1 - r2;
                ((v0 - r2 * x0) / span, (r1 * x0 - v0) / span)
            }
            Self::CriticallyDamped { r, x0, v0 } => (x0, v0 - r * x0),
            Self::Underdamped {
                alpha,
                beta,
                x0,
                v0,
            } => (x0, (v0 - alpha * x0) / beta),
        }
    }

    /// Position at time `t`
    pub fn position(&self, t: f64) -> f64 {
        match *self {
            Self::Overdamped { r1, r2, x0, v0 } => {
                let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
                let span = r1 - r2;
                x0 * ((r1 * e2 - r2 * e1) / span) + v0 * ((e1 - e2) / span)
            }
            Self::CriticallyDamped { r, x0, v0 } => {
                let c2 = v0 - r * x0;
                (x0 + c2 * t) * (r * t).exp()
            }
            Self::Underdamped {
                alpha,
                beta,
                x0,
                v0,
            } => {
                let b = (v0 - alpha * x0) / beta;
                let (sin, cos) = (beta * t).sin_cos();
                (alpha * t).exp() * (x0 * cos + b * sin)
            }
        }
    }

    /// Velocity at time `t`, the analytic derivative of [`position`](Self::position)
    pub fn velocity(&self, t: f64) -> f64 {
        match *self {
            Self::Overdamped { r1, r2, x0, v0 } => {
                let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
                let span = r1 - r2;
                x0 * (r1 * r2 * (e2 - e1) / span) + v0 * ((r1 * e1 - r2 * e2) / span)
            }
            Self::CriticallyDamped { r, x0, v0 } => {
                // d/dt[(x₀ + C₂t)e^(rt)] = (C₂ + r·x₀ + r·C₂·t)e^(rt), and C₂ + r·x₀ = v₀
                let c2 = v0 - r * x0;
                (v0 + r * c2 * t) * (r * t).exp()
            }
            Self::Underdamped {
                alpha,
                beta,
                x0,
                v0,
            } => {
                // α·A + β·B reduces to v₀
                let b = (v0 - alpha * x0) / beta;
                let (sin, cos) = (beta * t).sin_cos();
                (alpha * t).exp() * (v0 * cos + (alpha * b - beta * x0) * sin)
            }
        }
    }

    /// `(position, velocity)` at time `t`
    pub fn state(&self, t: f64) -> (f64, f64) {
        (self.position(t), self.velocity(t))
    }

    /// Positions sampled on a time grid
    pub fn positions(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.position(t)).collect()
    }
}

/// Oscillator run parameters as written by the simulator's JSON parameter file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscillatorParams {
    /// Integrator step size
    pub dt: f64,
    /// Integrator name tag, e.g. `verlet`
    pub integrator: String,
    pub spring_constant: f64,
    pub damping_coefficient: f64,
    pub mass: f64,
    /// Total integrator steps
    pub steps: f64,
}

impl OscillatorParams {
    /// Parses the JSON parameter file contents
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody::oscillator::OscillatorParams;
    ///
    /// let json = r#"{"dt": 0.001, "integrator": "verlet", "spring_constant": 10000.0,
    ///                "damping_coefficient": 100.0, "mass": 70.0, "steps": 5000.0}"#;
    /// let params = OscillatorParams::from_json(json).unwrap();
    /// assert_eq!(params.integrator, "verlet");
    /// ```
    pub fn from_json(json: &str) -> Result<Self, OscillatorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn oscillator(&self) -> Result<DampedOscillator, OscillatorError> {
        DampedOscillator::new(self.spring_constant, self.damping_coefficient, self.mass)
    }
}
