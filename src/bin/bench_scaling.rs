use fssp_engines::*;

fn main() {
    // scaling of the partitioned engine against the sequential oracle
    let rules = Ruleset::from_file("res/countdown.rul.txt").unwrap();
    let threads = std::thread::available_parallelism().map_or(1, |n| n.get());

    for size in [1_000, 100_000, 1_000_000] {
        let limit = default_generation_limit(size);

        let timer = std::time::Instant::now();
        let reference = SequentialEngine::new()
            .run(&rules, Row::first(size, &rules), limit)
            .unwrap();
        println!(
            "size={size}\tsequential\t{:?} gens\t{:.3}s",
            reference.generations,
            timer.elapsed().as_secs_f64()
        );

        for partitions in [1, 2, threads] {
            let timer = std::time::Instant::now();
            let outcome = ParallelEngine::new(partitions)
                .run(&rules, Row::first(size, &rules), limit)
                .unwrap();
            assert_eq!(outcome.row, reference.row);
            println!(
                "size={size}\tparallel p={partitions}\t{:?} gens\t{:.3}s",
                outcome.generations,
                timer.elapsed().as_secs_f64()
            );
        }
    }
}
