//! The relative graph engine.
//!
//! Within one import the `relatives` lists form a symmetric relation: if A
//! lists B then B lists A. Bulk ingestion takes lists as given; every later
//! change to one citizen's list goes through [`set_relatives`], which mirrors
//! the change onto each affected neighbour.
//!
//! The engine never talks to storage directly. It works against a
//! [`RelativeGraph`], a unit of work scoped to a single import that the
//! caller commits or rolls back as a whole.

use std::collections::BTreeSet;

use crate::citizen::CitizenId;

/// Read/write access to the relative lists of one import, inside one
/// transaction.
pub trait RelativeGraph {
  type Error;

  /// The current relatives of `citizen_id`, or `None` if no such citizen
  /// exists in the import.
  fn relatives_of(&mut self, citizen_id: CitizenId) -> Result<Option<Vec<CitizenId>>, Self::Error>;

  /// Overwrite the relatives of an existing citizen.
  fn replace_relatives(
    &mut self,
    citizen_id: CitizenId,
    relatives: &[CitizenId],
  ) -> Result<(), Self::Error>;
}

/// Which links a relatives change creates and which it breaks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelativesDiff {
  pub added:   BTreeSet<CitizenId>,
  pub removed: BTreeSet<CitizenId>,
}

impl RelativesDiff {
  pub fn between(old: &BTreeSet<CitizenId>, new: &BTreeSet<CitizenId>) -> Self {
    Self {
      added:   new.difference(old).copied().collect(),
      removed: old.difference(new).copied().collect(),
    }
  }

  pub fn is_empty(&self) -> bool { self.added.is_empty() && self.removed.is_empty() }
}

/// Outcome of a successful [`set_relatives`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repair {
  /// The target's new relatives, deduplicated and sorted ascending.
  pub relatives: Vec<CitizenId>,
  /// Neighbours whose lists were rewritten to mirror the change.
  pub touched:   Vec<CitizenId>,
}

/// Replace the relatives of `citizen_id` and restore symmetry.
///
/// Every citizen that gained the target as a relative gets the target
/// appended to its own list; every citizen that lost it has the target
/// removed. Ids that do not resolve to a citizen of the import are skipped
/// without error. Returns `None` if the target itself does not exist, in
/// which case nothing is written.
pub fn set_relatives<G, I>(
  graph: &mut G,
  citizen_id: CitizenId,
  new_relatives: I,
) -> Result<Option<Repair>, G::Error>
where
  G: RelativeGraph,
  I: IntoIterator<Item = CitizenId>,
{
  let Some(old) = graph.relatives_of(citizen_id)? else {
    return Ok(None);
  };

  let old: BTreeSet<CitizenId> = old.into_iter().collect();
  let new: BTreeSet<CitizenId> = new_relatives.into_iter().collect();
  let diff = RelativesDiff::between(&old, &new);

  let mut touched = Vec::new();

  // A self-link needs no mirroring; the target's own list is written last.
  for &other in diff.added.iter().filter(|&&id| id != citizen_id) {
    let Some(mut theirs) = graph.relatives_of(other)? else {
      continue;
    };
    if !theirs.contains(&citizen_id) {
      theirs.push(citizen_id);
      graph.replace_relatives(other, &theirs)?;
      touched.push(other);
    }
  }

  for &other in diff.removed.iter().filter(|&&id| id != citizen_id) {
    let Some(mut theirs) = graph.relatives_of(other)? else {
      continue;
    };
    let before = theirs.len();
    theirs.retain(|&id| id != citizen_id);
    if theirs.len() != before {
      graph.replace_relatives(other, &theirs)?;
      touched.push(other);
    }
  }

  let relatives: Vec<CitizenId> = new.into_iter().collect();
  graph.replace_relatives(citizen_id, &relatives)?;

  tracing::debug!(
    citizen_id,
    added = diff.added.len(),
    removed = diff.removed.len(),
    touched = touched.len(),
    "relatives repaired"
  );

  Ok(Some(Repair { relatives, touched }))
}

/// Check the symmetry invariant over a set of relative lists.
///
/// Returns the first pair `(a, b)` where `a` lists `b` but `b` does not list
/// `a`, or `None` if the lists are symmetric. References to ids outside
/// `lists` are not considered asymmetric. Ingestion uses this to flag
/// batches that arrive one-sided; storage tests use it to check that repairs
/// keep the invariant.
pub fn find_asymmetry<'a, I>(lists: I) -> Option<(CitizenId, CitizenId)>
where
  I: IntoIterator<Item = (CitizenId, &'a [CitizenId])>,
{
  let lists: std::collections::HashMap<CitizenId, &[CitizenId]> = lists.into_iter().collect();
  lists.iter().find_map(|(&a, rels)| {
    rels.iter().copied().find_map(|b| match lists.get(&b) {
      Some(theirs) if !theirs.contains(&a) => Some((a, b)),
      _ => None,
    })
  })
}
