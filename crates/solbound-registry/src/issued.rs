//! Set of issued assets keyed by public identity

use solbound_types::{IssuedAsset, Pubkey};
use std::collections::HashMap;

/// Assets the registry reports as minted, with O(1) membership by identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuedSet {
    assets: HashMap<Pubkey, IssuedAsset>,
}

impl IssuedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset: IssuedAsset) {
        self.assets.insert(asset.public_identity, asset);
    }

    pub fn contains(&self, identity: &Pubkey) -> bool {
        self.assets.contains_key(identity)
    }

    pub fn get(&self, identity: &Pubkey) -> Option<&IssuedAsset> {
        self.assets.get(identity)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IssuedAsset> {
        self.assets.values()
    }
}

impl FromIterator<IssuedAsset> for IssuedSet {
    fn from_iter<I: IntoIterator<Item = IssuedAsset>>(iter: I) -> Self {
        let mut set = Self::new();
        for asset in iter {
            set.insert(asset);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_by_identity() {
        let collection = Pubkey::new([9; 32]);
        let set: IssuedSet = (1..=3u8)
            .map(|i| IssuedAsset {
                public_identity: Pubkey::new([i; 32]),
                owner: Pubkey::new([100 + i; 32]),
                collection,
            })
            .collect();

        assert_eq!(set.len(), 3);
        assert!(set.contains(&Pubkey::new([2; 32])));
        assert!(!set.contains(&Pubkey::new([4; 32])));
        assert_eq!(set.get(&Pubkey::new([3; 32])).unwrap().owner, Pubkey::new([103; 32]));
    }
}
