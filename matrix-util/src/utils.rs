use fnv::FnvHashMap as HashMap;
use rand::Rng;
use std::hash::Hash;

/// partition membership vector into groups of indexes
/// # Arguments
/// * `membership` - a vector of membership (E.g., cluster assignment)
/// # Returns
/// A hashmap: cluster/group name -> indexes of the elements, in
/// the order they appear in `membership`
pub fn partition_by_membership<T>(membership: &[T]) -> HashMap<T, Vec<usize>>
where
    T: Eq + Hash + Clone,
{
    let mut groups: HashMap<T, Vec<usize>> = HashMap::default();
    for (i, k) in membership.iter().enumerate() {
        groups.entry(k.clone()).or_default().push(i);
    }
    groups
}

/// Draw `nsample` indexes out of `0..ntot` uniformly without
/// replacement. Everything is returned, in order, when `ntot <= nsample`.
/// * `rng` - random source; the draw is reproducible for a seeded one
/// * `ntot` - number of elements
/// * `nsample` - maximum number of elements to keep
pub fn sample_indices<R: Rng + ?Sized>(rng: &mut R, ntot: usize, nsample: usize) -> Vec<usize> {
    if ntot <= nsample {
        return (0..ntot).collect();
    }
    rand::seq::index::sample(rng, ntot, nsample).into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_partition_by_membership() {
        let groups = partition_by_membership(&["a", "b", "a", "c"]);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups["a"], vec![0, 2]);
        assert_eq!(groups["c"], vec![3]);
    }

    #[test]
    fn test_sample_indices_keeps_small_inputs() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(sample_indices(&mut rng, 3, 800), vec![0, 1, 2]);
    }

    #[test]
    fn test_sample_indices_reproducible() {
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            sample_indices(&mut rng, 1000, 10)
        };
        let first = draw(7);
        assert_eq!(first, draw(7));
        assert_eq!(first.len(), 10);

        let mut unique = first.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 10);
        assert!(unique.iter().all(|&i| i < 1000));
    }
}
