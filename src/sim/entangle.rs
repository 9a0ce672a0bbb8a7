//! Entanglement relation
//!
//! Pairs are stored by id in both directions, so a body never holds a
//! reference to its partner and the relation is mutual by construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::body::BodyId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntanglementIndex {
    partners: BTreeMap<BodyId, BodyId>,
}

impl EntanglementIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair `a` with `b`, dissolving any previous pair either one was in.
    /// Self-entanglement is ignored.
    pub fn entangle(&mut self, a: BodyId, b: BodyId) {
        if a == b {
            log::warn!("Refusing to entangle {} with itself", a);
            return;
        }
        self.release(a);
        self.release(b);
        self.partners.insert(a, b);
        self.partners.insert(b, a);
    }

    /// Dissolve the pair containing `id`, returning the former partner
    pub fn release(&mut self, id: BodyId) -> Option<BodyId> {
        let partner = self.partners.remove(&id)?;
        self.partners.remove(&partner);
        Some(partner)
    }

    pub fn partner(&self, id: BodyId) -> Option<BodyId> {
        self.partners.get(&id).copied()
    }

    pub fn is_entangled(&self, id: BodyId) -> bool {
        self.partners.contains_key(&id)
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.partners.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    pub fn clear(&mut self) {
        self.partners.clear();
    }

    /// Each pair once, lower id first
    pub fn pairs(&self) -> impl Iterator<Item = (BodyId, BodyId)> + '_ {
        self.partners
            .iter()
            .filter(|(a, b)| a < b)
            .map(|(&a, &b)| (a, b))
    }
}
