use sspt::core::io::tsv::DEFAULT_MISSING_VALUE;
use sspt::engine::config::{PermutationScheme, SingularPolicy, SolverBackend};

pub struct DefaultsConfig {
    pub backend: SolverBackend,
    pub on_singular: SingularPolicy,
    pub missing_value: String,
    pub scheme: PermutationScheme,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::ColPivQr,
            on_singular: SingularPolicy::Flag,
            missing_value: DEFAULT_MISSING_VALUE.to_string(),
            scheme: PermutationScheme::WithinSample,
        }
    }
}
