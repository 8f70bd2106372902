use rand::Rng;

/// Returns a uniformly shuffled copy of `items` (Fisher-Yates). The input is left untouched.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_shuffle_is_permutation_and_input_untouched() {
        let mut rng = StdRng::seed_from_u64(7);
        let input = vec!["a", "b", "b", "c", "d", "e"];
        let original = input.clone();

        let output = shuffle(&input, &mut rng);

        assert_eq!(input, original);
        let mut sorted_in = input.clone();
        let mut sorted_out = output.clone();
        sorted_in.sort();
        sorted_out.sort();
        assert_eq!(sorted_in, sorted_out);
    }

    #[test]
    fn test_shuffle_empty_and_single() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: Vec<u8> = Vec::new();
        assert!(shuffle(&empty, &mut rng).is_empty());
        assert_eq!(shuffle(&[42], &mut rng), vec![42]);
    }

    #[test]
    fn test_shuffle_reaches_every_permutation() {
        let mut rng = StdRng::seed_from_u64(2024);
        let input = [1, 2, 3];
        let seen: HashSet<Vec<i32>> = (0..600).map(|_| shuffle(&input, &mut rng)).collect();
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_shuffle_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(99);
        let input = [0usize, 1, 2, 3];
        let mut first_position = [0usize; 4];
        let trials = 8000;
        for _ in 0..trials {
            first_position[shuffle(&input, &mut rng)[0]] += 1;
        }
        // Expect ~2000 each; allow wide slack.
        for count in first_position {
            assert!((1600..=2400).contains(&count), "skewed count {count}");
        }
    }
}
