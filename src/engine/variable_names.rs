//! Optional human-readable names for integer variables, used only in logging/trace output (spec
//! §6's `--trace` flag), grounded on the teacher's `VariableNames`.

use std::collections::HashMap;

use crate::variables::DomainId;

#[derive(Debug, Default)]
pub struct VariableNames {
    names: HashMap<DomainId, String>,
}

impl VariableNames {
    pub fn set_name(&mut self, id: DomainId, name: impl Into<String>) {
        let _ = self.names.insert(id, name.into());
    }

    pub fn get_name(&self, id: DomainId) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("{id:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unnamed_variable_falls_back_to_debug_format() {
        let names = VariableNames::default();
        assert_eq!(names.get_name(DomainId::new(3)), "d3");
    }

    #[test]
    fn named_variable_uses_its_name() {
        let mut names = VariableNames::default();
        names.set_name(DomainId::new(0), "x");
        assert_eq!(names.get_name(DomainId::new(0)), "x");
    }
}
