use super::SEQ_THRESHOLD;
use num_cpus;
use num_traits::identities::Zero;

// parallel sum of a slice
pub fn parallel_sum<T>(array: &[T]) -> T
where
    T: Zero + Copy + Send + Sync,
{
    return parallel_reduce(array, T::zero(), &|t: &T| *t, &|a, b| a + b);
}

// parallel reduce: maps each element and folds with an associative operator;
// identity must be the identity of combine_fn
pub fn parallel_reduce<T, R, M, C>(array: &[T], identity: R, map_fn: &M, combine_fn: &C) -> R
where
    T: Sync,
    R: Clone + Send,
    M: Fn(&T) -> R + Sync,
    C: Fn(R, R) -> R + Sync,
{
    return parallel_reduce_tune(
        array,
        identity,
        map_fn,
        combine_fn,
        num_cpus::get(),
        SEQ_THRESHOLD,
    );
}

// parallel reduce with explicit tuning arguments
pub fn parallel_reduce_tune<T, R, M, C>(
    array: &[T],
    identity: R,
    map_fn: &M,
    combine_fn: &C,
    threads: usize,
    seq_threshold: usize,
) -> R
where
    T: Sync,
    R: Clone + Send,
    M: Fn(&T) -> R + Sync,
    C: Fn(R, R) -> R + Sync,
{
    if threads == 0 {
        panic!("threads cannot be zero!");
    }
    if seq_threshold == 0 {
        panic!("seq_threshold cannot be zero!");
    }

    return reduce_split(array, identity, map_fn, combine_fn, threads, seq_threshold);
}

fn reduce_split<T, R, M, C>(
    array: &[T],
    identity: R,
    map_fn: &M,
    combine_fn: &C,
    threads: usize,
    seq_threshold: usize,
) -> R
where
    T: Sync,
    R: Clone + Send,
    M: Fn(&T) -> R + Sync,
    C: Fn(R, R) -> R + Sync,
{
    if threads == 1 || array.len() <= seq_threshold {
        // sequential
        let mut acc = identity;
        for t in array {
            acc = combine_fn(acc, map_fn(t));
        }
        return acc;
    } else {
        // parallel
        let left_threads: usize = threads / 2;
        let right_threads: usize = threads - left_threads;

        let (left, right) = array.split_at(array.len() / 2);
        let left_identity = identity.clone();

        let (left_acc, right_acc) = crossbeam::scope(|scope| {
            let handle = scope.spawn(move |_| {
                reduce_split(
                    left,
                    left_identity,
                    map_fn,
                    combine_fn,
                    left_threads,
                    seq_threshold,
                )
            });
            let right_acc = reduce_split(
                right,
                identity,
                map_fn,
                combine_fn,
                right_threads,
                seq_threshold,
            );
            (handle.join().unwrap(), right_acc)
        })
        .unwrap();

        return combine_fn(left_acc, right_acc);
    }
}
