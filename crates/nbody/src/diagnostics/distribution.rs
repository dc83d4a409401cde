//! Mass distribution: center of mass and half-mass radius

use nalgebra::{Point3, Vector3};

use crate::diagnostics::DiagnosticsError;
use crate::particle::ParticleState;

/// Mean particle position, (1/n) Σ rᵢ
///
/// # Errors
///
/// [`DiagnosticsError::EmptyInput`] when `particles` is empty.
///
/// # Examples
///
/// ```
/// use nbody::diagnostics::center_of_mass;
/// use nbody::particle::ParticleState;
/// use nalgebra::Point3;
///
/// let particles = [
///     ParticleState::at_rest([1.0, 2.0, 0.0]),
///     ParticleState::at_rest([-1.0, 0.0, 0.0]),
/// ];
/// assert_eq!(center_of_mass(&particles).unwrap(), Point3::new(0.0, 1.0, 0.0));
/// ```
pub fn center_of_mass(particles: &[ParticleState]) -> Result<Point3<f64>, DiagnosticsError> {
    // A single particle is returned as-is so its position survives bit for bit.
    match particles {
        [] => Err(DiagnosticsError::EmptyInput {
            diagnostic: "center of mass",
        }),
        [only] => Ok(only.position),
        _ => {
            let sum = particles
                .iter()
                .map(|p| p.position.coords)
                .fold(Vector3::zeros(), |acc, r| acc + r);
            Ok(Point3::from(sum.unscale(particles.len() as f64)))
        }
    }
}

/// Distances of every particle from the center of mass, in file order
pub fn radial_distances(particles: &[ParticleState]) -> Result<Vec<f64>, DiagnosticsError> {
    let com = center_of_mass(particles)?;
    Ok(particles.iter().map(|p| p.distance_from(&com)).collect())
}

/// Radius enclosing half of the total mass
///
/// With unit masses this is the median distance from the center of mass:
/// the middle value for an odd count, the mean of the two middle values for
/// an even count. The result does not depend on particle order.
///
/// # Errors
///
/// [`DiagnosticsError::EmptyInput`] when `particles` is empty.
///
/// # Examples
///
/// ```
/// use nbody::diagnostics::half_mass_radius;
/// use nbody::particle::ParticleState;
///
/// let particles = [
///     ParticleState::at_rest([1.0, 0.0, 0.0]),
///     ParticleState::at_rest([-1.0, 0.0, 0.0]),
/// ];
/// assert_eq!(half_mass_radius(&particles).unwrap(), 1.0);
/// ```
pub fn half_mass_radius(particles: &[ParticleState]) -> Result<f64, DiagnosticsError> {
    if particles.is_empty() {
        return Err(DiagnosticsError::EmptyInput {
            diagnostic: "half-mass radius",
        });
    }

    let mut distances = radial_distances(particles)?;
    distances.sort_by(f64::total_cmp);

    let n = distances.len();
    let mid = n / 2;
    let median = if n % 2 == 0 {
        (distances[mid - 1] + distances[mid]) / 2.0
    } else {
        distances[mid]
    };

    Ok(median)
}
