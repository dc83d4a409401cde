use approx::assert_relative_eq;
use nalgebra::Point3;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use crate::diagnostics::DiagnosticsError;
use crate::diagnostics::distribution::{center_of_mass, half_mass_radius, radial_distances};
use crate::particle::ParticleState;

#[test]
fn test_center_of_mass_empty_is_error() {
    assert_eq!(
        center_of_mass(&[]),
        Err(DiagnosticsError::EmptyInput {
            diagnostic: "center of mass"
        })
    );
}

#[test]
fn test_center_of_mass_single_particle_is_exact() {
    let p = ParticleState::at_rest([0.1, -7.3e-9, 12345.678901]);

    assert_eq!(center_of_mass(&[p]).unwrap(), p.position);
}

#[test]
fn test_center_of_mass_symmetric_pair() {
    let particles = vec![
        ParticleState::at_rest([1.0, 0.0, 0.0]),
        ParticleState::at_rest([-1.0, 0.0, 0.0]),
    ];

    assert_eq!(center_of_mass(&particles).unwrap(), Point3::origin());
}

#[test]
fn test_center_of_mass_is_mean_position() {
    let particles = vec![
        ParticleState::at_rest([0.0, 0.0, 0.0]),
        ParticleState::at_rest([3.0, 0.0, 0.0]),
        ParticleState::at_rest([0.0, 6.0, 0.0]),
        ParticleState::at_rest([1.0, 2.0, 4.0]),
    ];

    assert_eq!(center_of_mass(&particles).unwrap(), Point3::new(1.0, 2.0, 1.0));
}

#[test]
fn test_radial_distances_in_file_order() {
    let particles = vec![
        ParticleState::at_rest([2.0, 0.0, 0.0]),
        ParticleState::at_rest([-2.0, 0.0, 0.0]),
        ParticleState::at_rest([0.0, 0.0, 0.0]),
    ];

    assert_eq!(radial_distances(&particles).unwrap(), vec![2.0, 2.0, 0.0]);
}

#[test]
fn test_half_mass_radius_empty_is_error() {
    assert!(matches!(
        half_mass_radius(&[]),
        Err(DiagnosticsError::EmptyInput { .. })
    ));
}

#[test]
fn test_half_mass_radius_symmetric_pair() {
    let particles = vec![
        ParticleState::at_rest([1.0, 0.0, 0.0]),
        ParticleState::at_rest([-1.0, 0.0, 0.0]),
    ];

    assert_eq!(half_mass_radius(&particles).unwrap(), 1.0);
}

#[test]
fn test_half_mass_radius_odd_count_takes_middle() {
    // Center of mass is the origin; distances are 0, 1, 1, 4, 4 -> median 1
    let particles = vec![
        ParticleState::at_rest([0.0, 0.0, 0.0]),
        ParticleState::at_rest([1.0, 0.0, 0.0]),
        ParticleState::at_rest([-1.0, 0.0, 0.0]),
        ParticleState::at_rest([0.0, 4.0, 0.0]),
        ParticleState::at_rest([0.0, -4.0, 0.0]),
    ];

    assert_eq!(half_mass_radius(&particles).unwrap(), 1.0);
}

#[test]
fn test_half_mass_radius_even_count_averages_middle_pair() {
    // Distances 1, 1, 3, 3 -> median (1 + 3) / 2 = 2
    let particles = vec![
        ParticleState::at_rest([1.0, 0.0, 0.0]),
        ParticleState::at_rest([-1.0, 0.0, 0.0]),
        ParticleState::at_rest([0.0, 3.0, 0.0]),
        ParticleState::at_rest([0.0, -3.0, 0.0]),
    ];

    assert_eq!(half_mass_radius(&particles).unwrap(), 2.0);
}

#[test]
fn test_half_mass_radius_single_particle_is_zero() {
    let particles = vec![ParticleState::at_rest([5.0, 5.0, 5.0])];

    assert_eq!(half_mass_radius(&particles).unwrap(), 0.0);
}

#[test]
fn test_half_mass_radius_order_independent() {
    let mut rng = ChaChaRng::seed_from_u64(42);

    let mut particles: Vec<ParticleState> = (0..101)
        .map(|_| {
            ParticleState::at_rest([
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
            ])
        })
        .collect();

    let reference = half_mass_radius(&particles).unwrap();

    for _ in 0..10 {
        particles.shuffle(&mut rng);
        let shuffled = half_mass_radius(&particles).unwrap();
        assert_relative_eq!(shuffled, reference, max_relative = 1e-12);
    }

    particles.reverse();
    assert_relative_eq!(
        half_mass_radius(&particles).unwrap(),
        reference,
        max_relative = 1e-12
    );
}
