use anchor_lang::{prelude::*, solana_program::keccak};

/// Root of an accumulator that holds no leaves.
pub const EMPTY_ROOT: [u8; 32] = [0u8; 32];

/// Largest supported leaf count. Node positions of larger forests do not fit in a `u64`.
pub const MAX_LEAF_COUNT: u64 = u64::MAX / 2;

/// Inclusion proof for a single leaf.
///
/// `proof` holds the intra-mountain path from the leaf to its mountain peak, followed by every
/// other peak in right-to-left order.
#[derive(Debug, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct Proof {
    pub proof: Vec<[u8; 32]>,
    pub leaf_index: u64,
    pub total_leaf_count: u64,
}

/// One perfect binary tree of the forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mountain {
    pub height: u32,
    /// Index of the first leaf covered by this mountain.
    pub leaf_offset: u64,
    /// Position of the first node of this mountain in the node sequence.
    pub node_offset: u64,
}

impl Mountain {
    pub fn leaf_count(&self) -> u64 {
        1 << self.height
    }

    pub fn peak_position(&self) -> u64 {
        self.node_offset + mountain_size(self.height) - 1
    }

    pub fn contains_leaf(&self, leaf_index: u64) -> bool {
        leaf_index >= self.leaf_offset && leaf_index - self.leaf_offset < self.leaf_count()
    }
}

/// Number of nodes in a mountain of the given height (`2^(height+1) - 1`).
pub const fn mountain_size(height: u32) -> u64 {
    u64::MAX >> (63 - height)
}

/// Number of nodes stored for `leaf_count` leaves. This is also the node position the next
/// leaf is written at.
pub fn node_count_for(leaf_count: u64) -> u64 {
    2 * leaf_count - u64::from(leaf_count.count_ones())
}

/// Number of merges performed when a leaf is appended to a forest of `leaf_count` leaves.
/// Equivalently, the height of the mountain that append completes.
pub fn mountain_height_for(leaf_count: u64) -> u32 {
    leaf_count.trailing_ones()
}

/// Mountains of a forest of `leaf_count` leaves, largest (leftmost) first.
///
/// `leaf_count` must not exceed `MAX_LEAF_COUNT`.
pub fn mountains(leaf_count: u64) -> Vec<Mountain> {
    let mut mountains = Vec::with_capacity(leaf_count.count_ones() as usize);
    let mut leaf_offset = 0;
    let mut node_offset = 0;

    for height in (0..u64::BITS).rev() {
        if (leaf_count >> height) & 1 == 1 {
            let mountain = Mountain {
                height,
                leaf_offset,
                node_offset,
            };
            leaf_offset += mountain.leaf_count();
            node_offset += mountain_size(height);
            mountains.push(mountain);
        }
    }

    mountains
}

/// Peak positions, left to right.
pub fn peak_positions(leaf_count: u64) -> Vec<u64> {
    mountains(leaf_count)
        .iter()
        .map(Mountain::peak_position)
        .collect()
}

/// Position of the sibling of the node at `node_position`, a node at `height`.
pub fn sibling_position(node_position: u64, height: u32, is_right_child: bool) -> Option<u64> {
    let offset = mountain_size(height);
    match is_right_child {
        true => node_position.checked_sub(offset),
        false => node_position.checked_add(offset),
    }
}

/// Position of the parent of the node at `node_position`, a node at `height`.
/// Parents directly follow their right child.
pub fn parent_position(node_position: u64, height: u32, is_right_child: bool) -> Option<u64> {
    match is_right_child {
        true => node_position.checked_add(1),
        false => sibling_position(node_position, height, false)?.checked_add(1),
    }
}

/// Append-only Merkle Mountain Range over 32-byte leaf hashes.
///
/// Nodes are stored in one flat sequence in construction order: each leaf followed by the
/// internal nodes its append completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct Mmr {
    nodes: Vec<[u8; 32]>,
    leaf_count: u64,
}

impl Mmr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_leaves<I>(leaves: I) -> Result<Self>
    where
        I: IntoIterator<Item = [u8; 32]>,
    {
        let mut mmr = Self::new();
        mmr.append_batch(leaves)?;
        Ok(mmr)
    }

    pub fn leaf_count(&self) -> u64 {
        self.leaf_count
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_count == 0
    }

    pub fn nodes(&self) -> &[[u8; 32]] {
        &self.nodes
    }

    /// Hash of the leaf at `leaf_index`.
    pub fn leaf(&self, leaf_index: u64) -> Result<[u8; 32]> {
        require!(
            leaf_index < self.leaf_count,
            MmrError::LeafIndexOutOfBounds
        );
        self.node(node_count_for(leaf_index))
    }

    /// Appends a leaf and returns its position.
    ///
    /// The new nodes are computed before anything is written, so an error leaves the
    /// accumulator unchanged.
    pub fn append(&mut self, leaf_hash: [u8; 32]) -> Result<u64> {
        self.check_consistency()?;

        let position = self.leaf_count;
        require!(position < MAX_LEAF_COUNT, MmrError::LeafCountOverflow);

        let mut pending = Vec::with_capacity(mountain_height_for(position) as usize + 1);
        pending.push(leaf_hash);

        let mut current_position = self.nodes.len() as u64;
        let mut current = leaf_hash;
        for height in 0..mountain_height_for(position) {
            // The left sibling always predates this append.
            let left_position = sibling_position(current_position, height, true)
                .ok_or(error!(MmrError::NodeIndexOutOfBounds))?;
            current = commutative_keccak256(self.node(left_position)?, current);
            pending.push(current);
            current_position += 1;
        }

        self.nodes.extend(pending);
        self.leaf_count = position + 1;

        Ok(position)
    }

    /// Appends leaves in order and returns the position of the first one.
    pub fn append_batch<I>(&mut self, leaves: I) -> Result<u64>
    where
        I: IntoIterator<Item = [u8; 32]>,
    {
        let first = self.leaf_count;
        for leaf in leaves {
            self.append(leaf)?;
        }
        Ok(first)
    }

    pub fn root(&self) -> Result<[u8; 32]> {
        self.check_consistency()?;

        let peaks = peak_positions(self.leaf_count)
            .into_iter()
            .rev()
            .map(|position| self.node(position))
            .collect::<Result<Vec<_>>>()?;

        Ok(bag_peaks(&peaks))
    }

    /// Current peaks of the accumulator, without the rest of the node sequence.
    pub fn peaks(&self) -> Result<MmrPeaks> {
        self.check_consistency()?;

        let peaks = peak_positions(self.leaf_count)
            .into_iter()
            .map(|position| self.node(position))
            .collect::<Result<Vec<_>>>()?;

        Ok(MmrPeaks {
            peaks,
            leaf_count: self.leaf_count,
        })
    }

    pub fn generate_proof(&self, leaf_index: u64) -> Result<Proof> {
        require!(self.leaf_count > 0, MmrError::EmptyMmr);
        require!(
            leaf_index < self.leaf_count,
            MmrError::LeafIndexOutOfBounds
        );
        self.check_consistency()?;

        let mountains = mountains(self.leaf_count);
        let leaf_mountain = mountains
            .iter()
            .find(|m| m.contains_leaf(leaf_index))
            .ok_or(error!(MmrError::LeafMountainNotFound))?;

        let local_leaf_index = leaf_index - leaf_mountain.leaf_offset;
        let mut position = leaf_mountain.node_offset + node_count_for(local_leaf_index);
        let mut proof =
            Vec::with_capacity(leaf_mountain.height as usize + mountains.len().saturating_sub(1));

        for height in 0..leaf_mountain.height {
            let is_right_child = (local_leaf_index >> height) & 1 == 1;
            let sibling = sibling_position(position, height, is_right_child)
                .ok_or(error!(MmrError::NodeIndexOutOfBounds))?;
            proof.push(self.node(sibling)?);
            position = parent_position(position, height, is_right_child)
                .ok_or(error!(MmrError::NodeIndexOutOfBounds))?;
        }

        require_eq!(
            position,
            leaf_mountain.peak_position(),
            MmrError::CorruptedNodeSequence
        );

        for mountain in mountains.iter().rev() {
            if mountain != leaf_mountain {
                proof.push(self.node(mountain.peak_position())?);
            }
        }

        Ok(Proof {
            proof,
            leaf_index,
            total_leaf_count: self.leaf_count,
        })
    }

    fn node(&self, position: u64) -> Result<[u8; 32]> {
        usize::try_from(position)
            .ok()
            .and_then(|position| self.nodes.get(position))
            .copied()
            .ok_or(error!(MmrError::NodeIndexOutOfBounds))
    }

    fn check_consistency(&self) -> Result<()> {
        require!(
            self.leaf_count <= MAX_LEAF_COUNT
                && self.nodes.len() as u64 == node_count_for(self.leaf_count),
            MmrError::CorruptedNodeSequence
        );
        Ok(())
    }
}

/// Peaks of an accumulator, left to right, and its leaf count.
///
/// Appending only ever merges the new leaf with existing peaks, so this is enough to append and
/// compute the root in O(log n). Proofs are generated from a full `Mmr` holding the same leaves.
#[derive(Debug, Clone, Default, PartialEq, Eq, AnchorSerialize, AnchorDeserialize, InitSpace)]
pub struct MmrPeaks {
    #[max_len(64)]
    peaks: Vec<[u8; 32]>,
    leaf_count: u64,
}

impl MmrPeaks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf_count(&self) -> u64 {
        self.leaf_count
    }

    pub fn peaks(&self) -> &[[u8; 32]] {
        &self.peaks
    }

    /// Appends a leaf and returns its position. An error leaves the peaks unchanged.
    pub fn append(&mut self, leaf_hash: [u8; 32]) -> Result<u64> {
        self.check_consistency()?;

        let position = self.leaf_count;
        require!(position < MAX_LEAF_COUNT, MmrError::LeafCountOverflow);

        // The mountains completed by this append are the rightmost ones, smallest last.
        let kept = self.peaks.len() - mountain_height_for(position) as usize;
        let peak = self.peaks[kept..]
            .iter()
            .rev()
            .fold(leaf_hash, |acc, left| commutative_keccak256(*left, acc));

        self.peaks.truncate(kept);
        self.peaks.push(peak);
        self.leaf_count = position + 1;

        Ok(position)
    }

    pub fn root(&self) -> Result<[u8; 32]> {
        self.check_consistency()?;

        let peaks: Vec<[u8; 32]> = self.peaks.iter().rev().copied().collect();
        Ok(bag_peaks(&peaks))
    }

    fn check_consistency(&self) -> Result<()> {
        require!(
            self.leaf_count <= MAX_LEAF_COUNT
                && self.peaks.len() == self.leaf_count.count_ones() as usize,
            MmrError::CorruptedNodeSequence
        );
        Ok(())
    }
}

/// Verifies that `leaf_hash` is included in an MMR with the given root.
///
/// The leaf count carried by the proof defines the shape of the forest the proof is checked
/// against.
pub fn verify_proof(expected_root: &[u8; 32], leaf_hash: &[u8; 32], proof: &Proof) -> Result<()> {
    let Proof {
        proof,
        leaf_index,
        total_leaf_count,
    } = proof;

    require!(*total_leaf_count > 0, MmrError::EmptyMmr);
    require!(
        *total_leaf_count <= MAX_LEAF_COUNT,
        MmrError::LeafCountOverflow
    );
    require!(leaf_index < total_leaf_count, MmrError::InvalidProof);

    let calculated_root =
        calculate_root_from_proof(proof, leaf_hash, *leaf_index, *total_leaf_count)?;
    require!(calculated_root == *expected_root, MmrError::InvalidProof);

    Ok(())
}

fn calculate_root_from_proof(
    proof: &[[u8; 32]],
    leaf_hash: &[u8; 32],
    leaf_index: u64,
    total_leaf_count: u64,
) -> Result<[u8; 32]> {
    let mountains = mountains(total_leaf_count);
    require!(!mountains.is_empty(), MmrError::NoPeaksFoundForNonEmptyMmr);

    let leaf_mountain = mountains
        .iter()
        .find(|m| m.contains_leaf(leaf_index))
        .ok_or(error!(MmrError::LeafMountainNotFound))?;

    let height = leaf_mountain.height as usize;
    require!(
        proof.len() >= height,
        MmrError::InsufficientProofElementsForIntraMountainPath
    );
    let (path, other_peaks) = proof.split_at(height);

    // Sibling order does not matter with a commutative hash.
    let leaf_peak = path
        .iter()
        .fold(*leaf_hash, |acc, sibling| commutative_keccak256(acc, *sibling));

    let mut other_peaks = other_peaks.iter();
    let mut peaks = Vec::with_capacity(mountains.len());
    for mountain in mountains.iter().rev() {
        if mountain == leaf_mountain {
            peaks.push(leaf_peak);
        } else {
            let peak = other_peaks
                .next()
                .ok_or(error!(MmrError::InsufficientProofElementsForOtherMountainPeaks))?;
            peaks.push(*peak);
        }
    }

    require!(
        other_peaks.next().is_none(),
        MmrError::UnusedProofElementsRemaining
    );

    Ok(bag_peaks(&peaks))
}

/// Folds peaks given right-to-left into a single root: `acc = peaks[0]`, then
/// `acc = H(peak, acc)` for each following peak.
pub fn bag_peaks(peaks: &[[u8; 32]]) -> [u8; 32] {
    match peaks.split_first() {
        None => EMPTY_ROOT,
        Some((first, rest)) => rest
            .iter()
            .fold(*first, |acc, peak| commutative_keccak256(*peak, acc)),
    }
}

/// keccak256 over the two inputs, sorted lexicographically.
pub fn commutative_keccak256(a: [u8; 32], b: [u8; 32]) -> [u8; 32] {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    keccak::hashv(&[&low, &high]).0
}

#[error_code]
pub enum MmrError {
    #[msg("Invalid proof")]
    InvalidProof,
    #[msg("MMR is empty")]
    EmptyMmr,
    #[msg("Leaf index is out of bounds")]
    LeafIndexOutOfBounds,
    #[msg("Leaf count overflow")]
    LeafCountOverflow,
    #[msg("Could not find the mountain containing the leaf")]
    LeafMountainNotFound,
    #[msg("Insufficient proof elements for the intra-mountain path")]
    InsufficientProofElementsForIntraMountainPath,
    #[msg("Insufficient proof elements for the other mountain peaks")]
    InsufficientProofElementsForOtherMountainPeaks,
    #[msg("Unused proof elements remaining")]
    UnusedProofElementsRemaining,
    #[msg("No peaks found for a non-empty MMR")]
    NoPeaksFoundForNonEmptyMmr,
    #[msg("Node index is out of bounds")]
    NodeIndexOutOfBounds,
    #[msg("Node sequence does not match the leaf count")]
    CorruptedNodeSequence,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(i: u64) -> [u8; 32] {
        keccak::hash(&i.to_be_bytes()).0
    }

    fn leaves(n: u64) -> Vec<[u8; 32]> {
        (0..n).map(leaf).collect()
    }

    /// Root of a perfect tree over `leaves`, built from scratch.
    fn naive_tree_root(leaves: &[[u8; 32]]) -> [u8; 32] {
        match leaves.len() {
            1 => leaves[0],
            len => {
                let (left, right) = leaves.split_at(len / 2);
                commutative_keccak256(naive_tree_root(left), naive_tree_root(right))
            }
        }
    }

    /// Reference root: build every mountain independently and bag them.
    fn naive_root(leaves: &[[u8; 32]]) -> [u8; 32] {
        let mut peaks = Vec::new();
        let mut rest = leaves;
        for mountain in mountains(leaves.len() as u64) {
            let (tree, tail) = rest.split_at(mountain.leaf_count() as usize);
            peaks.push(naive_tree_root(tree));
            rest = tail;
        }
        peaks.reverse();
        bag_peaks(&peaks)
    }

    #[test]
    fn test_empty_root() {
        let mmr = Mmr::new();
        assert_eq!(mmr.root().unwrap(), EMPTY_ROOT);
        assert!(mmr.is_empty());
    }

    #[test]
    fn test_first_three_appends() {
        let mut mmr = Mmr::new();
        let (l0, l1, l2) = (leaf(0), leaf(1), leaf(2));

        assert_eq!(mmr.append(l0).unwrap(), 0);
        assert_eq!(mmr.root().unwrap(), l0);

        assert_eq!(mmr.append(l1).unwrap(), 1);
        let p01 = commutative_keccak256(l0, l1);
        assert_eq!(mmr.root().unwrap(), p01);

        assert_eq!(mmr.append(l2).unwrap(), 2);
        assert_eq!(mmr.root().unwrap(), commutative_keccak256(p01, l2));
        assert_eq!(mmr.nodes(), &[l0, l1, p01, l2]);

        assert_eq!(mmr.leaf(0).unwrap(), l0);
        assert_eq!(mmr.leaf(2).unwrap(), l2);
        assert!(mmr.leaf(3).is_err());
    }

    #[test]
    fn test_node_layout_for_four_leaves() {
        let mmr = Mmr::from_leaves(leaves(4)).unwrap();
        let nodes = mmr.nodes();

        assert_eq!(nodes.len(), 7);
        assert_eq!(nodes[2], commutative_keccak256(nodes[0], nodes[1]));
        assert_eq!(nodes[5], commutative_keccak256(nodes[3], nodes[4]));
        assert_eq!(nodes[6], commutative_keccak256(nodes[2], nodes[5]));
        assert_eq!(mmr.root().unwrap(), nodes[6]);
    }

    #[test]
    fn test_commutative_hash() {
        let (a, b) = (leaf(10), leaf(11));
        assert_eq!(commutative_keccak256(a, b), commutative_keccak256(b, a));

        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let mut concatenated = low.to_vec();
        concatenated.extend_from_slice(&high);
        assert_eq!(commutative_keccak256(a, b), keccak::hash(&concatenated).0);
    }

    #[test]
    fn test_root_matches_naive_rebuild() {
        let all = leaves(70);
        let mut mmr = Mmr::new();
        for (n, leaf) in all.iter().enumerate() {
            mmr.append(*leaf).unwrap();
            assert_eq!(mmr.root().unwrap(), naive_root(&all[..=n]), "n = {}", n + 1);
            assert_eq!(mmr.nodes().len() as u64, node_count_for(n as u64 + 1));
        }
    }

    #[test]
    fn test_root_is_independent_of_batching() {
        let all = leaves(23);
        let reference = Mmr::from_leaves(all.clone()).unwrap();

        for split in [1usize, 5, 8, 16, 22] {
            let mut mmr = Mmr::from_leaves(all[..split].to_vec()).unwrap();
            let first = mmr.append_batch(all[split..].to_vec()).unwrap();

            assert_eq!(first, split as u64);
            assert_eq!(mmr, reference);
            assert_eq!(mmr.root().unwrap(), reference.root().unwrap());
        }
    }

    #[test]
    fn test_every_proof_verifies_at_every_count() {
        for n in 1..=40u64 {
            let all = leaves(n);
            let mmr = Mmr::from_leaves(all.clone()).unwrap();
            let root = mmr.root().unwrap();

            for k in 0..n {
                let proof = mmr.generate_proof(k).unwrap();
                assert_eq!(proof.leaf_index, k);
                assert_eq!(proof.total_leaf_count, n);
                assert!(
                    verify_proof(&root, &all[k as usize], &proof).is_ok(),
                    "n = {n}, k = {k}"
                );
            }
        }
    }

    #[test]
    fn test_proof_against_older_root() {
        let all = leaves(12);
        let old = Mmr::from_leaves(all[..7].to_vec()).unwrap();
        let old_root = old.root().unwrap();
        let proof = old.generate_proof(3).unwrap();

        let new = Mmr::from_leaves(all.clone()).unwrap();
        assert!(verify_proof(&old_root, &all[3], &proof).is_ok());
        assert!(verify_proof(&new.root().unwrap(), &all[3], &proof).is_err());
    }

    #[test]
    fn test_proof_length() {
        // 7 leaves = mountains of 4, 2 and 1 leaves.
        let mmr = Mmr::from_leaves(leaves(7)).unwrap();
        assert_eq!(mmr.generate_proof(0).unwrap().proof.len(), 2 + 2);
        assert_eq!(mmr.generate_proof(5).unwrap().proof.len(), 1 + 2);
        assert_eq!(mmr.generate_proof(6).unwrap().proof.len(), 2);
    }

    #[test]
    fn test_tampered_proofs_are_rejected() {
        let all = leaves(11);
        let mmr = Mmr::from_leaves(all.clone()).unwrap();
        let root = mmr.root().unwrap();
        let proof = mmr.generate_proof(4).unwrap();

        let err = verify_proof(&root, &all[5], &proof).unwrap_err();
        assert!(err.to_string().contains("InvalidProof"));

        let mut wrong_sibling = proof.clone();
        wrong_sibling.proof[0] = leaf(99);
        assert!(verify_proof(&root, &all[4], &wrong_sibling).is_err());

        let mut extra = proof.clone();
        extra.proof.push(leaf(99));
        let err = verify_proof(&root, &all[4], &extra).unwrap_err();
        assert!(err.to_string().contains("UnusedProofElementsRemaining"));

        let mut missing_peak = proof.clone();
        missing_peak.proof.pop();
        let err = verify_proof(&root, &all[4], &missing_peak).unwrap_err();
        assert!(err
            .to_string()
            .contains("InsufficientProofElementsForOtherMountainPeaks"));

        let mut short_path = proof.clone();
        short_path.proof.truncate(1);
        let err = verify_proof(&root, &all[4], &short_path).unwrap_err();
        assert!(err
            .to_string()
            .contains("InsufficientProofElementsForIntraMountainPath"));

        let mut wrong_count = proof.clone();
        wrong_count.total_leaf_count = 12;
        assert!(verify_proof(&root, &all[4], &wrong_count).is_err());

        let mut out_of_range = proof;
        out_of_range.leaf_index = 11;
        let err = verify_proof(&root, &all[4], &out_of_range).unwrap_err();
        assert!(err.to_string().contains("InvalidProof"));
    }

    #[test]
    fn test_verify_rejects_empty_leaf_count() {
        let proof = Proof {
            proof: vec![],
            leaf_index: 0,
            total_leaf_count: 0,
        };
        let err = verify_proof(&EMPTY_ROOT, &leaf(0), &proof).unwrap_err();
        assert!(err.to_string().contains("EmptyMmr"));
    }

    #[test]
    fn test_verify_rejects_oversized_leaf_count() {
        for total_leaf_count in [u64::MAX, MAX_LEAF_COUNT + 1] {
            let proof = Proof {
                proof: vec![],
                leaf_index: 0,
                total_leaf_count,
            };
            let err = verify_proof(&EMPTY_ROOT, &leaf(0), &proof).unwrap_err();
            assert!(err.to_string().contains("LeafCountOverflow"));
        }

        // The largest supported shape is walked without overflowing.
        let proof = Proof {
            proof: vec![],
            leaf_index: 0,
            total_leaf_count: MAX_LEAF_COUNT,
        };
        let err = verify_proof(&EMPTY_ROOT, &leaf(0), &proof).unwrap_err();
        assert!(err
            .to_string()
            .contains("InsufficientProofElementsForIntraMountainPath"));
    }

    #[test]
    fn test_peaks_track_full_accumulator() {
        let mut mmr = Mmr::new();
        let mut peaks = MmrPeaks::new();
        assert_eq!(peaks.root().unwrap(), EMPTY_ROOT);

        for (i, leaf) in leaves(70).into_iter().enumerate() {
            assert_eq!(peaks.append(leaf).unwrap(), i as u64);
            mmr.append(leaf).unwrap();

            assert_eq!(peaks, mmr.peaks().unwrap());
            assert_eq!(peaks.root().unwrap(), mmr.root().unwrap());
            assert_eq!(peaks.peaks().len(), peak_positions(mmr.leaf_count()).len());
        }
    }

    #[test]
    fn test_corrupted_peaks() {
        let mut bytes = Vec::new();
        (vec![leaf(0)], 3u64).serialize(&mut bytes).unwrap();
        let mut peaks = MmrPeaks::try_from_slice(&bytes).unwrap();

        let err = peaks.root().unwrap_err();
        assert!(err.to_string().contains("CorruptedNodeSequence"));
        let err = peaks.append(leaf(1)).unwrap_err();
        assert!(err.to_string().contains("CorruptedNodeSequence"));
        assert_eq!(peaks.leaf_count(), 3);
    }

    #[test]
    fn test_generate_proof_errors() {
        let err = Mmr::new().generate_proof(0).unwrap_err();
        assert!(err.to_string().contains("EmptyMmr"));

        let mmr = Mmr::from_leaves(leaves(3)).unwrap();
        let err = mmr.generate_proof(3).unwrap_err();
        assert!(err.to_string().contains("LeafIndexOutOfBounds"));
    }

    #[test]
    fn test_corrupted_node_sequence() {
        let mut bytes = Vec::new();
        (vec![leaf(0)], 2u64).serialize(&mut bytes).unwrap();
        let mut mmr = Mmr::try_from_slice(&bytes).unwrap();

        let err = mmr.root().unwrap_err();
        assert!(err.to_string().contains("CorruptedNodeSequence"));
        let err = mmr.generate_proof(0).unwrap_err();
        assert!(err.to_string().contains("CorruptedNodeSequence"));
        let err = mmr.append(leaf(1)).unwrap_err();
        assert!(err.to_string().contains("CorruptedNodeSequence"));
        assert_eq!(mmr.nodes().len(), 1);
    }

    #[test]
    fn test_position_helpers() {
        assert_eq!(mountain_size(0), 1);
        assert_eq!(mountain_size(1), 3);
        assert_eq!(mountain_size(3), 15);
        assert_eq!(mountain_size(63), u64::MAX);

        assert_eq!(mountain_height_for(0), 0);
        assert_eq!(mountain_height_for(1), 1);
        assert_eq!(mountain_height_for(3), 2);
        assert_eq!(mountain_height_for(4), 0);
        assert_eq!(mountain_height_for(7), 3);

        assert_eq!(node_count_for(0), 0);
        assert_eq!(node_count_for(3), 4);
        assert_eq!(node_count_for(4), 7);
        assert_eq!(node_count_for(7), 11);

        assert!(peak_positions(0).is_empty());
        assert_eq!(peak_positions(1), vec![0]);
        assert_eq!(peak_positions(3), vec![2, 3]);
        assert_eq!(peak_positions(7), vec![6, 9, 10]);

        // Leaves 0 and 1 of the 4-leaf tree sit at positions 0 and 1, their parent at 2.
        assert_eq!(sibling_position(0, 0, false), Some(1));
        assert_eq!(sibling_position(1, 0, true), Some(0));
        assert_eq!(parent_position(0, 0, false), Some(2));
        assert_eq!(parent_position(1, 0, true), Some(2));
        // Subtree peaks 2 and 5 merge into 6.
        assert_eq!(sibling_position(2, 1, false), Some(5));
        assert_eq!(parent_position(5, 1, true), Some(6));
        assert_eq!(sibling_position(0, 1, true), None);
    }

    #[test]
    fn test_mountains() {
        assert_eq!(
            mountains(6),
            vec![
                Mountain {
                    height: 2,
                    leaf_offset: 0,
                    node_offset: 0,
                },
                Mountain {
                    height: 1,
                    leaf_offset: 4,
                    node_offset: 7,
                },
            ]
        );
        assert!(mountains(6)[1].contains_leaf(5));
        assert!(!mountains(6)[1].contains_leaf(3));
    }
}
