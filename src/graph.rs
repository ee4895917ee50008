//! Reverse dependency index over scanned modules

use crate::domain::ModuleDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How the index treats a module referenced by several others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependentsPolicy {
    /// Every referencing module is recorded as a dependent
    #[default]
    Accumulate,
    /// Only the last referencing module in scan order is kept
    Replace,
}

/// Maps a module name to the modules that reference it directly
#[derive(Debug, Clone)]
pub struct DependencyGraph<'a> {
    dependents: HashMap<&'a str, Vec<&'a ModuleDescriptor>>,
}

impl<'a> DependencyGraph<'a> {
    pub fn build(modules: &'a [ModuleDescriptor], policy: DependentsPolicy) -> Self {
        let mut dependents: HashMap<&'a str, Vec<&'a ModuleDescriptor>> = HashMap::new();

        for module in modules {
            for reference in &module.references {
                if *reference == module.name {
                    continue;
                }
                let entry = dependents.entry(reference.as_str()).or_default();
                match policy {
                    DependentsPolicy::Accumulate => {
                        if !entry.iter().any(|existing| existing.name == module.name) {
                            entry.push(module);
                        }
                    }
                    DependentsPolicy::Replace => {
                        entry.clear();
                        entry.push(module);
                    }
                }
            }
        }

        DependencyGraph { dependents }
    }

    /// Direct dependents of `module_name`, in scan order; empty when there are none
    pub fn dependents(&self, module_name: &str) -> &[&'a ModuleDescriptor] {
        self.dependents
            .get(module_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
