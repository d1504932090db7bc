//! Archetype lookup by signature pair. No scoring happens here.

use crate::catalog::{ArchetypeBlock, Catalog};
use crate::scoring::signature::Signature;

/// `None` without a signature or when the catalog has no block for the pair.
pub fn match_archetype<'c>(
    catalog: &'c Catalog,
    signature: Option<&Signature>,
) -> Option<&'c ArchetypeBlock> {
    catalog.archetype(&signature?.pair_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{pair_code, Dimension};
    use crate::scoring::signature::RankingMetric;

    fn signature(a: Dimension, b: Dimension) -> Signature {
        Signature {
            top1: a,
            top2: b,
            pair_code: pair_code(a, b),
            metric: RankingMetric::NetEnergy,
            flat_profile: false,
            close_call: false,
        }
    }

    #[test]
    fn lookup_uses_the_sorted_pair() {
        let catalog = Catalog::builtin();
        let sig = signature(Dimension::R5, Dimension::R1);
        let block = match_archetype(&catalog, Some(&sig)).unwrap();
        assert_eq!(block.pair_code, "R1-R5");
        assert!(match_archetype(&catalog, None).is_none());
    }

    #[test]
    fn unknown_pair_is_none() {
        let mut catalog = Catalog::builtin();
        catalog.archetypes.remove("R1-R5");
        let sig = signature(Dimension::R1, Dimension::R5);
        assert!(match_archetype(&catalog, Some(&sig)).is_none());
    }
}
