//! Resolve each close approach's designation to its near-Earth object.

use std::collections::HashMap;
use std::sync::Arc;

use metrics::counter;
use tracing::{debug, warn};

use crate::constants::METRIC_UNLINKED;
use crate::models::{CloseApproach, NearEarthObject};

/// Outcome of a linking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkSummary {
    pub linked: usize,
    pub unlinked: usize,
}

/// Wrap loaded NEOs for sharing with the approaches that reference them.
pub fn share_neos(neos: Vec<NearEarthObject>) -> Vec<Arc<NearEarthObject>> {
    neos.into_iter().map(Arc::new).collect()
}

/// Set `neo` on every approach whose designation matches a NEO.
///
/// Approaches without a match are left unlinked (`neo = None`). When
/// designations repeat in `neos`, the first occurrence wins.
pub fn link_approaches(
    neos: &[Arc<NearEarthObject>],
    approaches: &mut [CloseApproach],
) -> LinkSummary {
    let mut by_designation: HashMap<&str, &Arc<NearEarthObject>> = HashMap::with_capacity(neos.len());
    for neo in neos {
        by_designation.entry(neo.designation.as_str()).or_insert(neo);
    }

    let mut summary = LinkSummary::default();
    for approach in approaches.iter_mut() {
        match by_designation.get(approach.designation.as_str()) {
            Some(neo) => {
                approach.neo = Some(Arc::clone(*neo));
                summary.linked += 1;
            }
            None => {
                approach.neo = None;
                summary.unlinked += 1;
            }
        }
    }

    if summary.unlinked > 0 {
        warn!("{} close approaches have no matching NEO", summary.unlinked);
        counter!(METRIC_UNLINKED).increment(summary.unlinked as u64);
    }
    debug!("Linked {} close approaches", summary.linked);
    summary
}
