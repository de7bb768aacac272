use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation core.
///
/// Configuration is the only failure source: once a simulation is
/// constructed, every per-step computation is total over its input domain,
/// so the step loop itself never errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected configuration: bad domain size, a leak that does not fit
    /// its edge, non-positive ensemble or motion parameters.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
