//! License gating for module initialization

use std::collections::HashSet;

use crate::module::traits::LicenseFlag;

/// Answers whether a capability is licensed
pub trait LicenseState: Send + Sync {
    fn is_licensed(&self, flag: &LicenseFlag) -> bool;
}

/// Fixed set of licensed capabilities
#[derive(Debug, Clone, Default)]
pub struct StaticLicense {
    features: HashSet<LicenseFlag>,
}

impl StaticLicense {
    /// License granting nothing
    pub fn unlicensed() -> Self {
        Self::default()
    }

    pub fn new(features: impl IntoIterator<Item = LicenseFlag>) -> Self {
        Self {
            features: features.into_iter().collect(),
        }
    }

    pub fn grant(&mut self, flag: LicenseFlag) {
        self.features.insert(flag);
    }
}

impl LicenseState for StaticLicense {
    fn is_licensed(&self, flag: &LicenseFlag) -> bool {
        self.features.contains(flag)
    }
}
