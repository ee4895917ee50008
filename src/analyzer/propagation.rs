use crate::domain::{
    BumpLevel, ChangeEntry, Changeset, ModuleChangelog, ModuleDescriptor, Version,
};
use crate::graph::{DependencyGraph, DependentsPolicy};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Description given to the entry a dependent receives when an upstream module is bumped
pub fn dependency_update_description(module_name: &str, new_version: &Version) -> String {
    format!("Updated dependencies: {}:{}", module_name, new_version)
}

/// Turns changesets into one changelog per affected module
pub struct PropagationEngine {
    policy: DependentsPolicy,
}

impl PropagationEngine {
    /// Create a new engine using the given dependents policy
    pub fn new(policy: DependentsPolicy) -> Self {
        PropagationEngine { policy }
    }

    /// Resolve changesets against the scanned modules.
    ///
    /// Directly changed modules come first in the order the changesets name them,
    /// followed by dependents in traversal order. Every module whose version changes
    /// gives each direct dependent one Patch entry naming its new version; this repeats
    /// transitively, so a dependent reached through two upstream modules gets one entry
    /// per upstream module. Names that match no module are dropped.
    pub fn resolve(
        &self,
        changesets: &[Changeset],
        modules: &[ModuleDescriptor],
    ) -> Vec<ModuleChangelog> {
        let mut by_name: HashMap<&str, &ModuleDescriptor> = HashMap::new();
        for module in modules {
            by_name.entry(module.name.as_str()).or_insert(module);
        }

        let mut changelogs: Vec<ModuleChangelog> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();

        for changeset in changesets {
            for name in &changeset.modules {
                let Some(module) = by_name.get(name.as_str()) else {
                    debug!(module = %name, "Changeset names an unknown module, skipping");
                    continue;
                };
                let slot = slot_for(&mut changelogs, &mut slots, module);
                changelogs[slot]
                    .changes
                    .push(ChangeEntry::new(changeset.description.clone(), changeset.bump));
            }
        }

        let graph = DependencyGraph::build(modules, self.policy);
        let mut levels: Vec<BumpLevel> = changelogs.iter().map(|c| c.bump_level()).collect();

        // Depth-first walk over dependents; each module is expanded at most once.
        let mut visited: HashSet<String> = HashSet::new();
        let mut stack: Vec<usize> = Vec::new();
        for slot in (0..changelogs.len()).rev() {
            if levels[slot] > BumpLevel::None {
                visited.insert(changelogs[slot].module_name.clone());
                stack.push(slot);
            }
        }

        while let Some(slot) = stack.pop() {
            let upstream = changelogs[slot].module_name.clone();
            let mut frontier = Vec::new();
            for dependent in graph.dependents(&upstream) {
                let dependent_slot = slot_for(&mut changelogs, &mut slots, dependent);
                if dependent_slot == levels.len() {
                    levels.push(BumpLevel::None);
                }
                levels[dependent_slot] = levels[dependent_slot].max(BumpLevel::Patch);

                if visited.insert(dependent.name.clone()) {
                    debug!(module = %dependent.name, upstream = %upstream, "Propagating bump");
                    frontier.push(dependent_slot);
                }
            }
            stack.extend(frontier.into_iter().rev());
        }

        let mut propagated: Vec<Vec<ChangeEntry>> = vec![Vec::new(); changelogs.len()];
        for (slot, changelog) in changelogs.iter().enumerate() {
            if levels[slot] == BumpLevel::None {
                continue;
            }
            let new_version = changelog.current_version.bump(levels[slot]);
            for dependent in graph.dependents(&changelog.module_name) {
                let dependent_slot = slots[dependent.name.as_str()];
                propagated[dependent_slot].push(ChangeEntry::new(
                    dependency_update_description(&changelog.module_name, &new_version),
                    BumpLevel::Patch,
                ));
            }
        }

        for (changelog, entries) in changelogs.iter_mut().zip(propagated) {
            changelog.changes.extend(entries);
        }

        changelogs
    }
}

/// Index of the module's changelog, created empty on first use
fn slot_for(
    changelogs: &mut Vec<ModuleChangelog>,
    slots: &mut HashMap<String, usize>,
    module: &ModuleDescriptor,
) -> usize {
    *slots.entry(module.name.clone()).or_insert_with(|| {
        changelogs.push(ModuleChangelog::for_module(module));
        changelogs.len() - 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Version;

    fn module(name: &str, version: Version, references: &[&str]) -> ModuleDescriptor {
        ModuleDescriptor::new(
            name,
            version,
            references.iter().map(|r| r.to_string()).collect(),
            format!("/repo/src/{name}/{name}.csproj"),
        )
    }

    fn resolve(changesets: &[Changeset], modules: &[ModuleDescriptor]) -> Vec<ModuleChangelog> {
        PropagationEngine::new(DependentsPolicy::Accumulate).resolve(changesets, modules)
    }

    fn find<'a>(changelogs: &'a [ModuleChangelog], name: &str) -> &'a ModuleChangelog {
        changelogs
            .iter()
            .find(|c| c.module_name == name)
            .unwrap_or_else(|| panic!("no changelog for {}", name))
    }

    fn descriptions(changelog: &ModuleChangelog) -> Vec<&str> {
        changelog
            .changes
            .iter()
            .map(|c| c.description.as_str())
            .collect()
    }

    #[test]
    fn test_single_patch_leaves_unrelated_module_untouched() {
        let modules = vec![
            module("ProjectA", Version::new(1, 0, 0), &[]),
            module("ProjectB", Version::new(1, 1, 0), &[]),
        ];
        let changesets = vec![Changeset::new(["ProjectA"], BumpLevel::Patch, "fix")];

        let changelogs = resolve(&changesets, &modules);

        assert_eq!(changelogs.len(), 1);
        let a = &changelogs[0];
        assert_eq!(a.module_name, "ProjectA");
        assert_eq!(a.new_version(), Version::new(1, 0, 1));
        assert_eq!(a.changes, vec![ChangeEntry::new("fix", BumpLevel::Patch)]);
    }

    #[test]
    fn test_minor_bump_propagates_patch_to_dependent() {
        let modules = vec![
            module("ProjectA", Version::new(1, 0, 0), &[]),
            module("ProjectB", Version::new(1, 1, 0), &["ProjectReferenceY"]),
            module("ProjectC", Version::new(1, 1, 1), &["ProjectA"]),
        ];
        let changesets = vec![Changeset::new(["ProjectA"], BumpLevel::Minor, "feature")];

        let changelogs = resolve(&changesets, &modules);

        assert_eq!(changelogs.len(), 2);
        assert_eq!(find(&changelogs, "ProjectA").new_version(), Version::new(1, 1, 0));

        let c = find(&changelogs, "ProjectC");
        assert_eq!(c.new_version(), Version::new(1, 1, 2));
        assert_eq!(
            c.changes,
            vec![ChangeEntry::new(
                "Updated dependencies: ProjectA:1.1.0",
                BumpLevel::Patch
            )]
        );
    }

    #[test]
    fn test_highest_level_wins_regardless_of_order() {
        let modules = vec![module("ProjectA", Version::new(1, 0, 0), &[])];
        for changesets in [
            vec![
                Changeset::new(["ProjectA"], BumpLevel::Patch, "fix"),
                Changeset::new(["ProjectA"], BumpLevel::Minor, "feature"),
            ],
            vec![
                Changeset::new(["ProjectA"], BumpLevel::Minor, "feature"),
                Changeset::new(["ProjectA"], BumpLevel::Patch, "fix"),
            ],
        ] {
            let changelogs = resolve(&changesets, &modules);
            assert_eq!(changelogs.len(), 1);
            assert_eq!(changelogs[0].changes.len(), 2);
            assert_eq!(changelogs[0].bump_level(), BumpLevel::Minor);
            assert_eq!(changelogs[0].new_version(), Version::new(1, 1, 0));
        }
    }

    #[test]
    fn test_transitive_chain() {
        let modules = vec![
            module("A", Version::new(1, 0, 0), &[]),
            module("B", Version::new(2, 0, 0), &["A"]),
            module("C", Version::new(3, 0, 0), &["B"]),
        ];
        let changesets = vec![Changeset::new(["A"], BumpLevel::Major, "rewrite")];

        let changelogs = resolve(&changesets, &modules);

        let names: Vec<&str> = changelogs.iter().map(|c| c.module_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(find(&changelogs, "A").new_version(), Version::new(2, 0, 0));
        assert_eq!(
            descriptions(find(&changelogs, "B")),
            vec!["Updated dependencies: A:2.0.0"]
        );
        assert_eq!(find(&changelogs, "B").new_version(), Version::new(2, 0, 1));
        assert_eq!(
            descriptions(find(&changelogs, "C")),
            vec!["Updated dependencies: B:2.0.1"]
        );
        assert_eq!(find(&changelogs, "C").new_version(), Version::new(3, 0, 1));
    }

    #[test]
    fn test_diamond_gets_one_entry_per_upstream_module() {
        let modules = vec![
            module("A", Version::new(1, 0, 0), &[]),
            module("B", Version::new(1, 0, 0), &["A"]),
            module("C", Version::new(1, 0, 0), &["A"]),
            module("D", Version::new(1, 0, 0), &["B", "C"]),
        ];
        let changesets = vec![Changeset::new(["A"], BumpLevel::Minor, "feature")];

        let changelogs = resolve(&changesets, &modules);

        assert_eq!(changelogs.len(), 4);
        let d = find(&changelogs, "D");
        assert_eq!(
            descriptions(d),
            vec![
                "Updated dependencies: B:1.0.1",
                "Updated dependencies: C:1.0.1"
            ]
        );
        assert_eq!(d.new_version(), Version::new(1, 0, 1));
    }

    #[test]
    fn test_directly_changed_dependent_merges_entries() {
        let modules = vec![
            module("A", Version::new(1, 0, 0), &[]),
            module("B", Version::new(1, 0, 0), &["A"]),
        ];
        let changesets = vec![
            Changeset::new(["A"], BumpLevel::Patch, "fix in A"),
            Changeset::new(["B"], BumpLevel::Major, "break B"),
        ];

        let changelogs = resolve(&changesets, &modules);

        assert_eq!(changelogs.len(), 2);
        let b = find(&changelogs, "B");
        assert_eq!(
            b.changes,
            vec![
                ChangeEntry::new("break B", BumpLevel::Major),
                ChangeEntry::new("Updated dependencies: A:1.0.1", BumpLevel::Patch),
            ]
        );
        assert_eq!(b.new_version(), Version::new(2, 0, 0));
    }

    #[test]
    fn test_downstream_entry_names_final_upstream_version() {
        let modules = vec![
            module("A", Version::new(1, 0, 0), &[]),
            module("B", Version::new(1, 0, 0), &["A"]),
            module("C", Version::new(1, 0, 0), &["B"]),
        ];
        let changesets = vec![
            Changeset::new(["A"], BumpLevel::Patch, "fix"),
            Changeset::new(["B"], BumpLevel::Minor, "feature"),
        ];

        let changelogs = resolve(&changesets, &modules);

        assert_eq!(
            descriptions(find(&changelogs, "C")),
            vec!["Updated dependencies: B:1.1.0"]
        );
    }

    #[test]
    fn test_unknown_module_is_dropped() {
        let modules = vec![module("ProjectA", Version::new(1, 0, 0), &[])];
        let changesets = vec![Changeset::new(["Gone"], BumpLevel::Major, "old")];
        assert!(resolve(&changesets, &modules).is_empty());
    }

    #[test]
    fn test_changeset_naming_known_and_unknown_modules() {
        let modules = vec![module("ProjectA", Version::new(1, 0, 0), &[])];
        let changesets = vec![Changeset::new(["Gone", "ProjectA"], BumpLevel::Minor, "x")];

        let changelogs = resolve(&changesets, &modules);
        assert_eq!(changelogs.len(), 1);
        assert_eq!(changelogs[0].module_name, "ProjectA");
    }

    #[test]
    fn test_cycle_terminates() {
        let modules = vec![
            module("A", Version::new(1, 0, 0), &["B"]),
            module("B", Version::new(1, 0, 0), &["A"]),
        ];
        let changesets = vec![Changeset::new(["A"], BumpLevel::Minor, "feature")];

        let changelogs = resolve(&changesets, &modules);

        assert_eq!(changelogs.len(), 2);
        let a = find(&changelogs, "A");
        assert_eq!(a.new_version(), Version::new(1, 1, 0));
        assert_eq!(
            descriptions(a),
            vec!["feature", "Updated dependencies: B:1.0.1"]
        );
        assert_eq!(
            descriptions(find(&changelogs, "B")),
            vec!["Updated dependencies: A:1.1.0"]
        );
    }

    #[test]
    fn test_replace_policy_only_reaches_last_dependent() {
        let modules = vec![
            module("Core", Version::new(1, 0, 0), &[]),
            module("Api", Version::new(1, 0, 0), &["Core"]),
            module("Cli", Version::new(1, 0, 0), &["Core"]),
        ];
        let changesets = vec![Changeset::new(["Core"], BumpLevel::Patch, "fix")];

        let accumulated = resolve(&changesets, &modules);
        let replaced =
            PropagationEngine::new(DependentsPolicy::Replace).resolve(&changesets, &modules);

        assert_eq!(accumulated.len(), 3);
        let names: Vec<&str> = replaced.iter().map(|c| c.module_name.as_str()).collect();
        assert_eq!(names, vec!["Core", "Cli"]);
    }

    #[test]
    fn test_none_level_record_is_emitted_without_bump_or_propagation() {
        let modules = vec![
            module("A", Version::new(1, 0, 0), &[]),
            module("B", Version::new(1, 0, 0), &["A"]),
        ];
        let changesets = vec![Changeset::new(["A"], BumpLevel::None, "internal note")];

        let changelogs = resolve(&changesets, &modules);

        assert_eq!(changelogs.len(), 1);
        assert_eq!(changelogs[0].new_version(), Version::new(1, 0, 0));
    }

    #[test]
    fn test_multi_module_changeset_adds_entry_to_each() {
        let modules = vec![
            module("A", Version::new(1, 0, 0), &[]),
            module("B", Version::new(0, 3, 0), &[]),
        ];
        let changesets = vec![Changeset::new(["A", "B"], BumpLevel::Minor, "shared")];

        let changelogs = resolve(&changesets, &modules);

        assert_eq!(changelogs.len(), 2);
        assert_eq!(find(&changelogs, "A").new_version(), Version::new(1, 1, 0));
        assert_eq!(find(&changelogs, "B").new_version(), Version::new(0, 4, 0));
    }
}
