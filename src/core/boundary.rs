use crate::core::geometry::{Domain, Leak, WALLS};
use crate::core::particle::Particle;

/// Outcome of resolving one particle against the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The particle stays in the ensemble, possibly after reflection.
    Retained,
    /// The particle left through the leak and must be deactivated.
    Escaped,
}

/// Resolve a diffusive particle after its clamped move.
///
/// The hard clamp in the motion step already settled every solid-wall
/// interaction, so only leak absorption remains: a disc of `radius`
/// touching the wall inside the aperture span escapes.
#[inline]
pub fn resolve_diffusive(p: &Particle, domain: &Domain, leak: &Leak, radius: f64) -> Outcome {
    if leak.admits(&p.r, radius, domain) {
        Outcome::Escaped
    } else {
        Outcome::Retained
    }
}

/// Resolve a ballistic particle from its provisional post-move state.
///
/// The leak test runs first so a particle inside the aperture is never
/// also reflected by the wall hosting it; crossing any other wall always
/// reflects: the offending coordinate is mirrored about the wall plane
/// and the matching velocity component negated (unit restitution).
///
/// A corner overshoot is mirrored independently on each axis. That is the
/// reference behavior, not an exact corner bounce. An escaping particle
/// keeps its position past the leak wall (its recorded escape position)
/// but still receives any perpendicular-wall correction from the same
/// step.
pub fn resolve_ballistic(p: &mut Particle, domain: &Domain, leak: &Leak) -> Outcome {
    let escaping = leak.crossed_into(&p.r, domain);
    for wall in WALLS {
        if escaping && wall == leak.wall() {
            continue;
        }
        if wall.overshoot(&p.r, domain) > 0.0 {
            let axis = wall.normal_axis();
            p.r[axis] = 2.0 * wall.coordinate(domain) - p.r[axis];
            p.v[axis] = -p.v[axis];
        }
    }
    if escaping {
        Outcome::Escaped
    } else {
        Outcome::Retained
    }
}
