//! Referential integrity enforcement.
//!
//! A [`ReferenceType`] may demand that its sources or its targets are not
//! removed while references of that type still point out of (or into)
//! them. The check runs before a removal, over every oid the removal would
//! take out of the map. Self-references never block.

use std::collections::BTreeSet;

use omap_types::{ObjectId, ReferenceType};
use tracing::warn;

use crate::error::{IntegrityError, OmapResult};
use crate::location::Location;
use crate::map::ObjectMap;

/// Verify that removing `removed` breaks no integrity-flagged reference.
///
/// Moves never break references, so the check passes when `moving` is set.
pub fn check_referential_integrity(
    map: &ObjectMap,
    removed: &BTreeSet<ObjectId>,
    moving: bool,
) -> Result<(), IntegrityError> {
    if moving {
        return Ok(());
    }
    let refs = map.reference_map();
    let guarded: Vec<&ReferenceType> = refs
        .get_reftypes()
        .filter(|rt| rt.source_integrity() || rt.target_integrity())
        .collect();

    for &oid in removed {
        for &reftype in &guarded {
            if reftype.source_integrity() {
                let mut targets = refs.targetids(oid, reftype).members();
                targets.remove(&oid);
                if !targets.is_empty() {
                    warn!(%oid, %reftype, blocking = targets.len(), "removal blocked by source integrity");
                    return Err(IntegrityError::Source {
                        oid,
                        reftype: reftype.clone(),
                        oids: targets,
                    });
                }
            }
            if reftype.target_integrity() {
                let mut sources = refs.sourceids(oid, reftype).members();
                sources.remove(&oid);
                if !sources.is_empty() {
                    warn!(%oid, %reftype, blocking = sources.len(), "removal blocked by target integrity");
                    return Err(IntegrityError::Target {
                        oid,
                        reftype: reftype.clone(),
                        oids: sources,
                    });
                }
            }
        }
    }
    Ok(())
}

impl ObjectMap {
    /// Remove the subtree at `loc` unless that would break referential
    /// integrity, in which case nothing is removed.
    pub fn remove_checked<'a>(
        &mut self,
        loc: impl Into<Location<'a>>,
    ) -> OmapResult<BTreeSet<ObjectId>> {
        let path = self.resolve_path(loc)?;
        let doomed = self.pathlookup(&path, None, true)?;
        check_referential_integrity(self, &doomed, false)?;
        self.remove(&path, false)
    }
}
