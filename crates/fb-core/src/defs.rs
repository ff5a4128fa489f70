//! Immutable unit-definition lookup table.
//!
//! Built once when the host finishes loading content, then shared by
//! reference (or `Arc`) with every stage that needs it.  There is no global
//! cache: a stage that needs definition data receives the table explicitly.

use std::collections::HashMap;

use crate::{CoreError, CoreResult, DefId, Energy, Metal, UnitRole};

/// Static data for one unit definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitDef {
    pub id:          DefId,
    pub name:        String,
    pub role:        UnitRole,
    pub max_health:  f32,
    pub cost_metal:  Metal,
    pub cost_energy: Energy,
}

/// Definition table indexed by `DefId`, with a name index for the host side.
#[derive(Clone, Debug, Default)]
pub struct DefinitionTable {
    defs:    Vec<UnitDef>,
    by_name: HashMap<String, DefId>,
}

impl DefinitionTable {
    pub fn builder() -> DefinitionTableBuilder {
        DefinitionTableBuilder::default()
    }

    #[inline]
    pub fn get(&self, id: DefId) -> Option<&UnitDef> {
        self.defs.get(id.index())
    }

    pub fn by_name(&self, name: &str) -> Option<&UnitDef> {
        self.by_name.get(name).and_then(|&id| self.get(id))
    }

    #[inline]
    pub fn contains(&self, id: DefId) -> bool {
        id.index() < self.defs.len()
    }

    /// Role of `id`, or `None` for unknown definitions.
    #[inline]
    pub fn role(&self, id: DefId) -> Option<UnitRole> {
        self.get(id).map(|d| d.role)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitDef> {
        self.defs.iter()
    }
}

/// Accumulates definitions in load order; ids are assigned sequentially.
#[derive(Default)]
pub struct DefinitionTableBuilder {
    defs:    Vec<UnitDef>,
    by_name: HashMap<String, DefId>,
}

impl DefinitionTableBuilder {
    /// Add a definition.  `categories` is the raw category string; the role
    /// is resolved here and never again.
    pub fn define(
        &mut self,
        name:        &str,
        categories:  &str,
        max_health:  f32,
        cost_metal:  Metal,
        cost_energy: Energy,
    ) -> CoreResult<DefId> {
        if self.by_name.contains_key(name) {
            return Err(CoreError::DuplicateDefinition(name.to_owned()));
        }
        let id = DefId::try_from(self.defs.len())
            .map_err(|_| CoreError::Config(format!("too many unit definitions at {name:?}")))?;
        if id == DefId::INVALID {
            return Err(CoreError::Config(format!("too many unit definitions at {name:?}")));
        }
        self.defs.push(UnitDef {
            id,
            name: name.to_owned(),
            role: UnitRole::from_categories(categories),
            max_health,
            cost_metal,
            cost_energy,
        });
        self.by_name.insert(name.to_owned(), id);
        Ok(id)
    }

    pub fn build(self) -> DefinitionTable {
        DefinitionTable {
            defs:    self.defs,
            by_name: self.by_name,
        }
    }
}
