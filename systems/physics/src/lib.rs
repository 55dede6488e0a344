#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Momentum-conserving collision response between two circular bodies.
//!
//! Bodies are first pushed apart until they no longer overlap. Their
//! velocities are then split into a component along the contact normal and
//! an orthogonal component; the normal components exchange momentum through
//! the one-dimensional elastic collision formula with mass proportional to
//! the squared radius, and the orthogonal components are kept unchanged.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec2;
use mosquito_sim_core::{projection, random_angle, wrap_angle, Position};
use rand::Rng;

/// Distance each body moves per separation step.
pub const SEPARATION_STEP: f64 = 0.5;

/// Separation steps attempted before the bodies are placed apart directly.
pub const MAX_SEPARATION_STEPS: usize = 10_000;

/// Centre distance below which two bodies are treated as coincident.
const COINCIDENT_DISTANCE: f64 = 1e-9;

/// Moving circular body exposed to collision response.
pub trait Body {
    /// Centre of the body.
    fn position(&self) -> Position;

    /// Relocates the centre of the body.
    fn set_position(&mut self, position: Position);

    /// Direction of travel in radians.
    fn heading(&self) -> f64;

    /// Distance travelled per tick.
    fn speed(&self) -> f64;

    /// Radius of the body.
    fn radius(&self) -> f64;

    /// Replaces the velocity of the body in polar form.
    fn set_velocity(&mut self, heading: f64, speed: f64);
}

/// Mass proxy of a body: the area of its disc up to a constant factor.
#[must_use]
pub fn mass<B: Body + ?Sized>(body: &B) -> f64 {
    body.radius() * body.radius()
}

/// Cartesian velocity of a body.
#[must_use]
pub fn velocity<B: Body + ?Sized>(body: &B) -> DVec2 {
    DVec2::from_angle(body.heading()) * body.speed()
}

/// Linear momentum of a body using the [`mass`] proxy.
#[must_use]
pub fn momentum<B: Body + ?Sized>(body: &B) -> DVec2 {
    velocity(body) * mass(body)
}

/// Pushes two bodies apart along their centre line until they stop overlapping.
///
/// Each step moves both bodies [`SEPARATION_STEP`] units away from each other.
/// Coincident centres have no centre line, so the second body is nudged by
/// one step in a random direction first. If overlap persists after
/// [`MAX_SEPARATION_STEPS`] the second body is placed at contact distance.
/// Returns the number of separation steps taken.
pub fn separate<A, B, R>(a: &mut A, b: &mut B, rng: &mut R) -> usize
where
    A: Body + ?Sized,
    B: Body + ?Sized,
    R: Rng + ?Sized,
{
    let contact = a.radius() + b.radius();
    let mut steps = 0;

    while a.position().distance(b.position()) < contact {
        if steps == MAX_SEPARATION_STEPS {
            let angle = random_angle(rng);
            b.set_position(a.position().offset(contact, angle));
            break;
        }

        if a.position().distance(b.position()) < COINCIDENT_DISTANCE {
            let angle = random_angle(rng);
            b.set_position(b.position().offset(SEPARATION_STEP, angle));
        }

        let a_away = wrap_angle(PI + a.position().direction_to(b.position()));
        let b_away = wrap_angle(PI + b.position().direction_to(a.position()));
        a.set_position(a.position().offset(SEPARATION_STEP, a_away));
        b.set_position(b.position().offset(SEPARATION_STEP, b_away));
        steps += 1;
    }

    steps
}

/// Resolves an elastic collision between two bodies.
///
/// The bodies are separated first, then their normal velocity components are
/// exchanged so that the total momentum is conserved.
pub fn bounce<A, B, R>(a: &mut A, b: &mut B, rng: &mut R)
where
    A: Body + ?Sized,
    B: Body + ?Sized,
    R: Rng + ?Sized,
{
    let _ = separate(a, b, rng);

    let a_contact = a.position().direction_to(b.position());
    let b_contact = wrap_angle(a_contact + PI);

    let a_normal = DVec2::from_angle(a_contact) * projection(a.heading(), a.speed(), a_contact);
    let b_normal = DVec2::from_angle(b_contact) * projection(b.heading(), b.speed(), b_contact);

    let a_mass = mass(a);
    let b_mass = mass(b);
    let total = a_mass + b_mass;

    let a_normal_after = (a_normal * (a_mass - b_mass) + 2.0 * b_mass * b_normal) / total;
    let b_normal_after = (b_normal * (b_mass - a_mass) + 2.0 * a_mass * a_normal) / total;

    let a_orthogonal_axis = wrap_angle(a_contact + FRAC_PI_2);
    let b_orthogonal_axis = wrap_angle(b_contact + FRAC_PI_2);
    let a_orthogonal = DVec2::from_angle(a_orthogonal_axis)
        * projection(a.heading(), a.speed(), a_orthogonal_axis);
    let b_orthogonal = DVec2::from_angle(b_orthogonal_axis)
        * projection(b.heading(), b.speed(), b_orthogonal_axis);

    let a_velocity = a_normal_after + a_orthogonal;
    let b_velocity = b_normal_after + b_orthogonal;

    a.set_velocity(wrap_angle(a_velocity.y.atan2(a_velocity.x)), a_velocity.length());
    b.set_velocity(wrap_angle(b_velocity.y.atan2(b_velocity.x)), b_velocity.length());
}
