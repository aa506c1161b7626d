use feedpilot_core_types::Platform;

use crate::model::{EngineTunables, PolicySnapshot};
use crate::registry::builtin_profile;

pub fn default_snapshot() -> PolicySnapshot {
    PolicySnapshot {
        rev: 1,
        engine: EngineTunables::default(),
        profiles: Platform::ALL
            .into_iter()
            .map(|platform| (platform, builtin_profile(platform)))
            .collect(),
        provenance: Default::default(),
    }
}
