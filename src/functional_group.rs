//! Functional group abbreviations such as `Ph`, `OMe` or `CH2CH2OH`.
//!
//! A group is drawn as a single atom but stands for a fragment; its
//! components are the expansion used for formulas and weights. The bundled
//! table lives in `resources/functional_groups.json` and is parsed once on
//! first use.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::element::{Element, ElementBase};

const BUNDLED_GROUPS: &str = include_str!("../resources/functional_groups.json");

static GLOBAL_REGISTRY: Lazy<Arc<FunctionalGroupRegistry>> =
    Lazy::new(|| match FunctionalGroupRegistry::from_json(BUNDLED_GROUPS) {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            log::error!("bundled functional group table is unreadable: {e}");
            Arc::new(FunctionalGroupRegistry::default())
        }
    });

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionalGroup {
    name: String,
    components: Vec<(Element, u32)>,
    flippable: bool,
}

impl FunctionalGroup {
    pub fn new(name: impl Into<String>, components: Vec<(Element, u32)>, flippable: bool) -> Self {
        Self {
            name: name.into(),
            components,
            flippable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element counts the group expands to, in declaration order.
    pub fn components(&self) -> &[(Element, u32)] {
        &self.components
    }

    /// Whether the label may be mirrored (`OH` / `HO`) when drawn on the
    /// left of its attachment point.
    pub fn is_flippable(&self) -> bool {
        self.flippable
    }

    pub fn element_count(&self, element: Element) -> u32 {
        self.components
            .iter()
            .filter(|(e, _)| *e == element)
            .map(|(_, n)| n)
            .sum()
    }

    pub fn atomic_weight(&self) -> f64 {
        self.components
            .iter()
            .map(|(e, n)| e.atomic_weight() * *n as f64)
            .sum()
    }
}

#[derive(Deserialize)]
struct RawComponent {
    element: String,
    count: u32,
}

#[derive(Deserialize)]
struct RawGroup {
    name: String,
    components: Vec<RawComponent>,
    #[serde(default)]
    flippable: bool,
}

/// Read-only lookup table of functional groups, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct FunctionalGroupRegistry {
    groups: Vec<Arc<FunctionalGroup>>,
}

impl FunctionalGroupRegistry {
    /// The process-wide table built from the bundled resource.
    pub fn global() -> Arc<FunctionalGroupRegistry> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Parse a table in the bundled schema. Components naming an unknown
    /// element are dropped with a warning; the rest of the group is kept.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let raw: Vec<RawGroup> = serde_json::from_str(text)?;
        let groups = raw
            .into_iter()
            .map(|group| {
                let components = group
                    .components
                    .into_iter()
                    .filter_map(|c| match Element::from_symbol(&c.element) {
                        Some(e) => Some((e, c.count)),
                        None => {
                            log::warn!(
                                "functional group {}: unknown component element {:?}",
                                group.name,
                                c.element
                            );
                            None
                        }
                    })
                    .collect();
                Arc::new(FunctionalGroup::new(group.name, components, group.flippable))
            })
            .collect();
        Ok(Self { groups })
    }

    pub fn from_groups(groups: impl IntoIterator<Item = FunctionalGroup>) -> Self {
        Self {
            groups: groups.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<FunctionalGroup>> {
        self.groups.iter().find(|g| g.name() == name).cloned()
    }

    /// Resolve a label as written in a file: element symbols win over
    /// group names.
    pub fn resolve(&self, label: &str) -> Option<ElementBase> {
        Element::from_symbol(label)
            .map(ElementBase::Element)
            .or_else(|| self.get(label).map(ElementBase::FunctionalGroup))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<FunctionalGroup>> + '_ {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
