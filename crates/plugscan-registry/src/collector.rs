//! The plugin collector capability

use crate::entry_point::{spec_to_entry_point, to_entry_point_dict, EntryPointDict};
use crate::errors::RegistryError;
use crate::types::PluginSpec;

/// A source of plugin specifications
///
/// Implementors only provide [`collect_plugins`](PluginCollector::collect_plugins);
/// the entry point registry is derived from it.
pub trait PluginCollector {
    fn collect_plugins(&self) -> Vec<PluginSpec>;

    /// Build the entry point registry, keyed by plugin namespace
    fn get_entry_points(&self) -> Result<EntryPointDict, RegistryError> {
        let entry_points = self
            .collect_plugins()
            .iter()
            .map(spec_to_entry_point)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(to_entry_point_dict(&entry_points))
    }
}

#[cfg(test)]
mod tests {
    use crate::collector::*;
    use crate::types::{FactoryKind, FactoryRef};

    struct FixedCollector(Vec<PluginSpec>);

    impl PluginCollector for FixedCollector {
        fn collect_plugins(&self) -> Vec<PluginSpec> {
            self.0.clone()
        }
    }

    #[test]
    fn test_get_entry_points_groups_by_namespace() {
        let collector = FixedCollector(vec![
            PluginSpec::new(
                "demo",
                "thing1",
                FactoryRef::new("mod1", "make_thing", FactoryKind::Function),
            ),
            PluginSpec::new(
                "other",
                "widget",
                FactoryRef::new("mod1", "Widget", FactoryKind::Class),
            ),
            PluginSpec::new(
                "demo",
                "thing2",
                FactoryRef::new("mod2", "make_other", FactoryKind::Function),
            ),
        ]);

        let dict = collector.get_entry_points();
        assert!(dict.is_ok());
        let dict = dict.unwrap_or_default();
        assert_eq!(
            dict["demo"],
            vec!["thing1=mod1:make_thing", "thing2=mod2:make_other"]
        );
        assert_eq!(dict["other"], vec!["widget=mod1:Widget"]);
    }

    #[test]
    fn test_get_entry_points_empty() {
        let collector = FixedCollector(Vec::new());
        assert!(collector.get_entry_points().is_ok_and(|d| d.is_empty()));
    }

    #[test]
    fn test_get_entry_points_propagates_conversion_failure() {
        let collector = FixedCollector(vec![PluginSpec::new(
            "demo",
            "broken",
            FactoryRef::new("", "make", FactoryKind::Function),
        )]);
        assert!(matches!(
            collector.get_entry_points(),
            Err(RegistryError::UnresolvableFactory { .. })
        ));
    }
}
