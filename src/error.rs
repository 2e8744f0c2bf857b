/// Errors raised by a simulation run
///
/// Numeric edge cases inside the sampler degrade to fallbacks and never
/// surface here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("no valid risks to simulate: every risk needs P10, P50, P90, probability and a distribution model")]
    NoValidRisks,
}
