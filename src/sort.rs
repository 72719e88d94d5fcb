use super::SEQ_THRESHOLD;
use num_cpus;

// parallel quicksort (in place)
pub fn parallel_quicksort<T: Ord + Send>(array: &mut [T]) {
    parallel_quicksort_tune(array, num_cpus::get(), SEQ_THRESHOLD);
}

// parallel quicksort (in place) with explicit tuning arguments; partitions
// below seq_threshold fall back to the sequential sort
pub fn parallel_quicksort_tune<T: Ord + Send>(array: &mut [T], threads: usize, seq_threshold: usize) {
    if threads == 0 {
        panic!("threads cannot be zero!");
    }
    if seq_threshold == 0 {
        panic!("seq_threshold cannot be zero!");
    }

    quicksort_split(array, threads, seq_threshold);
}

fn quicksort_split<T: Ord + Send>(array: &mut [T], threads: usize, seq_threshold: usize) {
    if array.len() <= 1 {
        return;
    }
    if threads == 1 || array.len() <= seq_threshold {
        // sequential
        quicksort(array);
    } else {
        // parallel
        let pivot = partition(array);

        let left_threads: usize = threads / 2;
        let right_threads: usize = threads - left_threads;

        // the pivot already sits at its final index and belongs to neither side
        let (left, rest) = array.split_at_mut(pivot);
        let right = &mut rest[1..];

        crossbeam::scope(|scope| {
            scope.spawn(|_| {
                quicksort_split(left, left_threads, seq_threshold);
            });
            quicksort_split(right, right_threads, seq_threshold);
        })
        .unwrap();
    }
}

// sequential quicksort
fn quicksort<T: Ord>(array: &mut [T]) {
    if array.len() <= 1 {
        return;
    }
    let pivot = partition(array);
    let (left, rest) = array.split_at_mut(pivot);
    quicksort(left);
    quicksort(&mut rest[1..]);
}

// lomuto partition around the last element; returns the pivot's final index
fn partition<T: Ord>(array: &mut [T]) -> usize {
    let last = array.len() - 1;
    let mut store: usize = 0;
    for i in 0..last {
        if array[i] <= array[last] {
            array.swap(i, store);
            store += 1;
        }
    }
    array.swap(store, last);
    return store;
}
