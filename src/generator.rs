//! Instance generator with a known optimal makespan.
//!
//! # Construction
//!
//! For target makespan `cmax` on `m` processors:
//! 1. One unit-duration task.
//! 2. Split the remaining `n - 1` tasks across processors.
//! 3. For each processor, draw durations in `[2, max_duration]` summing
//!    to exactly `cmax - 1`.
//! 4. Shuffle.
//!
//! The total is `m(cmax - 1) + 1`, so `ceil(total / m) = cmax`, and placing
//! the unit task on any processor reaches it. The optimum is exactly `cmax`.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::models::{InstanceError, ProblemInstance};

/// Smallest duration of the rectangle-filling tasks.
const MIN_FILL_DURATION: u64 = 2;

/// Reasons the generator cannot build an instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// `min > max`.
    #[error("empty range [{min}, {max}]")]
    InvalidRange {
        /// Lower bound.
        min: u64,
        /// Upper bound.
        max: u64,
    },
    /// No list of `len` values in `[min, max]` sums to `sum`.
    #[error("{len} values in [{min}, {max}] cannot sum to {sum}")]
    UnreachableSum {
        /// Target sum.
        sum: u64,
        /// List length.
        len: usize,
        /// Lower bound per element.
        min: u64,
        /// Upper bound per element.
        max: u64,
    },
    /// The parameters admit no instance with this optimal makespan.
    #[error(
        "cmax {cmax} is not reachable with {tasks_count} tasks on {processors_count} \
         processors and durations up to {max_duration}"
    )]
    CmaxOutOfRange {
        /// Requested optimal makespan.
        cmax: u64,
        /// Requested task count.
        tasks_count: usize,
        /// Requested processor count.
        processors_count: usize,
        /// Largest allowed duration.
        max_duration: u64,
    },
    /// The resulting instance was rejected.
    #[error(transparent)]
    Instance(#[from] InstanceError),
}

/// Draws `len` integers in `[min, max]` summing to `sum`.
///
/// Each element is drawn so that the rest can still reach the target,
/// so every element stays inside the range.
pub fn list_summing_to<R: Rng + ?Sized>(
    sum: u64,
    len: usize,
    (min, max): (u64, u64),
    rng: &mut R,
) -> Result<Vec<u64>, GeneratorError> {
    if min > max {
        return Err(GeneratorError::InvalidRange { min, max });
    }
    let unreachable = GeneratorError::UnreachableSum { sum, len, min, max };
    let n = len as u64;
    let floor = min.checked_mul(n).ok_or_else(|| unreachable.clone())?;
    let too_large = max.checked_mul(n).is_some_and(|ceiling| sum > ceiling);
    if sum < floor || too_large {
        return Err(unreachable);
    }

    let spread = max - min;
    let mut values = vec![min; len];
    let mut remaining = sum - floor;
    for (i, value) in values.iter_mut().enumerate() {
        let after = (len - i - 1) as u64;
        let low = remaining.saturating_sub(spread.saturating_mul(after));
        let high = remaining.min(spread);
        let increase = rng.random_range(low..=high);
        *value += increase;
        remaining -= increase;
    }
    Ok(values)
}

/// Generates an instance whose optimal makespan is exactly `cmax`.
///
/// Durations other than the single unit task lie in `[2, max_duration]`.
pub fn generate<R: Rng + ?Sized>(
    cmax: u64,
    tasks_count: usize,
    processors_count: usize,
    max_duration: u64,
    rng: &mut R,
) -> Result<ProblemInstance, GeneratorError> {
    let out_of_range = GeneratorError::CmaxOutOfRange {
        cmax,
        tasks_count,
        processors_count,
        max_duration,
    };
    if processors_count == 0 {
        return Err(InstanceError::NoProcessors(processors_count).into());
    }
    if cmax < 1 + MIN_FILL_DURATION || tasks_count < 2 || max_duration < MIN_FILL_DURATION {
        return Err(out_of_range);
    }

    let width = cmax - 1;
    let fill_tasks = (tasks_count - 1) as u64;
    let area = width
        .checked_mul(processors_count as u64)
        .ok_or_else(|| out_of_range.clone())?;
    let fits = MIN_FILL_DURATION * fill_tasks <= area
        && max_duration.checked_mul(fill_tasks).is_none_or(|c| area <= c);
    if !fits {
        return Err(out_of_range);
    }

    let per_processor = (
        width.div_ceil(max_duration),
        width / MIN_FILL_DURATION,
    );
    let counts = list_summing_to(fill_tasks, processors_count, per_processor, rng)?;

    let mut durations = Vec::with_capacity(tasks_count);
    durations.push(1);
    for count in counts {
        let fill = list_summing_to(width, count as usize, (MIN_FILL_DURATION, max_duration), rng)?;
        durations.extend(fill);
    }
    durations.shuffle(rng);

    Ok(ProblemInstance::new(processors_count, durations)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_list_summing_to() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..200 {
            let values = list_summing_to(50, 7, (3, 12), &mut rng).unwrap();
            assert_eq!(values.len(), 7);
            assert_eq!(values.iter().sum::<u64>(), 50);
            assert!(values.iter().all(|&v| (3..=12).contains(&v)));
        }
    }

    #[test]
    fn test_list_summing_to_tight() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(list_summing_to(21, 3, (7, 9), &mut rng).unwrap(), vec![7, 7, 7]);
        assert_eq!(list_summing_to(27, 3, (7, 9), &mut rng).unwrap(), vec![9, 9, 9]);
        assert_eq!(list_summing_to(0, 0, (1, 2), &mut rng).unwrap(), Vec::<u64>::new());
    }

    #[test]
    fn test_list_summing_to_errors() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(matches!(
            list_summing_to(10, 2, (6, 4), &mut rng),
            Err(GeneratorError::InvalidRange { min: 6, max: 4 })
        ));
        assert!(matches!(
            list_summing_to(5, 3, (2, 4), &mut rng),
            Err(GeneratorError::UnreachableSum { .. })
        ));
        assert!(matches!(
            list_summing_to(13, 3, (2, 4), &mut rng),
            Err(GeneratorError::UnreachableSum { .. })
        ));
    }

    #[test]
    fn test_generate_has_known_optimum() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let inst = generate(60, 40, 5, 20, &mut rng).unwrap();
            assert_eq!(inst.task_count(), 40);
            assert_eq!(inst.processors_count(), 5);
            assert_eq!(inst.total_duration(), 5 * 59 + 1);
            assert_eq!(inst.lower_bound(), 60);
            assert_eq!(inst.task_durations().iter().filter(|&&d| d == 1).count(), 1);
            assert!(inst.task_durations().iter().all(|&d| d <= 20));
        }
    }

    #[test]
    fn test_generate_rejects_impossible() {
        let mut rng = SmallRng::seed_from_u64(0);
        // 99 fill tasks of at least 2 cannot fit in 3 × 9.
        assert!(matches!(
            generate(10, 100, 3, 5, &mut rng),
            Err(GeneratorError::CmaxOutOfRange { .. })
        ));
        // 2 fill tasks of at most 3 cannot fill 3 × 9.
        assert!(matches!(
            generate(10, 3, 3, 3, &mut rng),
            Err(GeneratorError::CmaxOutOfRange { .. })
        ));
        assert!(matches!(
            generate(10, 10, 0, 5, &mut rng),
            Err(GeneratorError::Instance(InstanceError::NoProcessors(0)))
        ));
    }
}
