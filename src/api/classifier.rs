use indexmap::IndexMap;
use tracing::trace;

use crate::core::{ObjectId, ObjectKind, PlottableObject, Strategy};

/// Placement of every visible plottable object, keyed by owner.
///
/// Built once per chart. Sequences keep the strategy's declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementGroups {
    top: Vec<ObjectId>,
    above: IndexMap<ObjectId, Vec<ObjectId>>,
    below: IndexMap<ObjectId, Vec<ObjectId>>,
    overlay: IndexMap<ObjectId, Vec<ObjectId>>,
}

/// Group an object was placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Top,
    Above(ObjectId),
    Below(ObjectId),
    Overlay(ObjectId),
}

impl PlacementGroups {
    #[must_use]
    pub fn top(&self) -> &[ObjectId] {
        &self.top
    }

    #[must_use]
    pub fn above(&self, owner: ObjectId) -> &[ObjectId] {
        self.above.get(&owner).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn below(&self, owner: ObjectId) -> &[ObjectId] {
        self.below.get(&owner).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn overlay(&self, owner: ObjectId) -> &[ObjectId] {
        self.overlay.get(&owner).map(Vec::as_slice).unwrap_or_default()
    }

    /// Owners with at least one above/below/overlay entry, in first-seen order.
    pub fn owners(&self) -> impl Iterator<Item = ObjectId> + '_ {
        let mut seen = Vec::new();
        self.above
            .keys()
            .chain(self.below.keys())
            .chain(self.overlay.keys())
            .copied()
            .filter(move |owner| {
                if seen.contains(owner) {
                    false
                } else {
                    seen.push(*owner);
                    true
                }
            })
    }

    /// Total number of placed objects across all groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.top.len()
            + [&self.above, &self.below, &self.overlay]
                .into_iter()
                .flat_map(|group| group.values())
                .map(Vec::len)
                .sum::<usize>()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every group an object appears in. Exactly one for placed objects.
    #[must_use]
    pub fn placements_of(&self, id: ObjectId) -> Vec<Placement> {
        let mut found = Vec::new();
        if self.top.contains(&id) {
            found.push(Placement::Top);
        }
        for (owner, members) in &self.above {
            if members.contains(&id) {
                found.push(Placement::Above(*owner));
            }
        }
        for (owner, members) in &self.below {
            if members.contains(&id) {
                found.push(Placement::Below(*owner));
            }
        }
        for (owner, members) in &self.overlay {
            if members.contains(&id) {
                found.push(Placement::Overlay(*owner));
            }
        }
        found
    }

    fn place(&mut self, object: &PlottableObject, placement: Placement) {
        trace!(id = object.id.raw(), name = %object.name, ?placement, "classified plot object");
        match placement {
            Placement::Top => self.top.push(object.id),
            Placement::Above(owner) => self.above.entry(owner).or_default().push(object.id),
            Placement::Below(owner) => self.below.entry(owner).or_default().push(object.id),
            Placement::Overlay(owner) => self.overlay.entry(owner).or_default().push(object.id),
        }
    }
}

/// Partitions observers, then indicators, into placement groups.
#[must_use]
pub fn classify(strategy: &Strategy) -> PlacementGroups {
    let mut groups = PlacementGroups::default();
    for object in strategy.observers().iter().chain(strategy.indicators()) {
        if let Some(placement) = placement_for(object) {
            groups.place(object, placement);
        }
    }
    groups
}

/// Group for one object, `None` when it is hidden, skipped or lacks plot metadata.
#[must_use]
pub fn placement_for(object: &PlottableObject) -> Option<Placement> {
    let info = object.plot_info.as_ref()?;
    if !info.is_visible() {
        return None;
    }

    let owner = object.owner();
    let placement = match (object.kind, info.subplot) {
        (_, false) => Placement::Overlay(owner),
        (ObjectKind::Observer, true) => Placement::Top,
        (ObjectKind::Indicator, true) if info.plot_above => Placement::Above(owner),
        (ObjectKind::Indicator, true) => Placement::Below(owner),
    };
    Some(placement)
}
