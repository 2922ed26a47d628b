//! Randomized checks of the sweep against a per-position brute-force oracle.
//!
//! Inputs are generated from fixed seeds, sorted the way `sort -k1,1 -k2,2n`
//! would sort them, and every position of the generated span is checked.

use bedstack::bed::parse_intervals;
use bedstack::config::{AbsentNamePolicy, EmitMode, MergeConfig};
use bedstack::interval::{GenomicInterval, SubInterval};
use bedstack::merger::sweep_intervals;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

const CHROMS: [&str; 2] = ["chr1", "chr2"];
const NAMES: [&str; 5] = ["A", "B", "C", "D", "E"];
const SPAN: u64 = 300;
const SEEDS: u64 = 40;

fn random_intervals(seed: u64, n: usize) -> Vec<GenomicInterval> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut intervals: Vec<GenomicInterval> = (0..n)
        .map(|_| {
            let chrom = CHROMS[rng.gen_range(0..CHROMS.len())];
            let start: u64 = rng.gen_range(0..250);
            let len: u64 = rng.gen_range(0..40);
            let name_count: usize = rng.gen_range(0..3);
            let names: Vec<&str> = (0..name_count)
                .map(|_| NAMES[rng.gen_range(0..NAMES.len())])
                .collect();
            let score: u32 = rng.gen_range(1..5);
            GenomicInterval::new(chrom, start, start + len)
                .with_names(names)
                .with_score(score as f64)
        })
        .collect();
    intervals.sort_by(|a, b| (a.chrom.as_str(), a.start).cmp(&(b.chrom.as_str(), b.start)));
    intervals
}

fn covering<'a>(inputs: &'a [GenomicInterval], chrom: &str, pos: u64) -> Vec<&'a GenomicInterval> {
    inputs
        .iter()
        .filter(|iv| iv.chrom == chrom && iv.start <= pos && pos < iv.end)
        .collect()
}

fn pieces_at<'a>(output: &'a [SubInterval], chrom: &str, pos: u64) -> Vec<&'a SubInterval> {
    output
        .iter()
        .filter(|s| s.chrom == chrom && s.contains(pos))
        .collect()
}

fn anonymous(mode: EmitMode) -> MergeConfig {
    MergeConfig::new(mode).with_absent_names(AbsentNamePolicy::Anonymous)
}

#[test]
fn test_output_tiles_input_coverage() {
    for seed in 0..SEEDS {
        let inputs = random_intervals(seed, 30);
        for mode in [EmitMode::Names, EmitMode::Coverage, EmitMode::Stack] {
            let output = sweep_intervals(anonymous(mode), inputs.clone()).unwrap();

            for chrom in CHROMS {
                let pieces: Vec<&SubInterval> =
                    output.iter().filter(|s| s.chrom == chrom).collect();
                for piece in &pieces {
                    assert!(!piece.is_empty(), "seed {seed}: empty piece {piece}");
                }
                for pair in pieces.windows(2) {
                    assert!(
                        pair[0].end <= pair[1].start,
                        "seed {seed} {mode}: {} overlaps or precedes {}",
                        pair[0],
                        pair[1]
                    );
                }
                for pos in 0..SPAN {
                    let covered = !covering(&inputs, chrom, pos).is_empty();
                    let hits = pieces_at(&output, chrom, pos).len();
                    assert_eq!(hits, covered as usize, "seed {seed} {mode}: {chrom}:{pos}");
                }
            }
        }
    }
}

#[test]
fn test_chromosomes_are_emitted_in_input_order() {
    for seed in 0..SEEDS {
        let inputs = random_intervals(seed, 30);
        let output = sweep_intervals(anonymous(EmitMode::Coverage), inputs).unwrap();
        let first_chr2 = output.iter().position(|s| s.chrom == "chr2");
        if let Some(idx) = first_chr2 {
            assert!(output[idx..].iter().all(|s| s.chrom == "chr2"), "seed {seed}");
        }
    }
}

#[test]
fn test_coverage_is_conserved() {
    for seed in 0..SEEDS {
        let inputs = random_intervals(seed, 30);
        for policy in [AbsentNamePolicy::Anonymous, AbsentNamePolicy::Synthetic] {
            let config = MergeConfig::new(EmitMode::Coverage).with_absent_names(policy);
            let output = sweep_intervals(config, inputs.clone()).unwrap();

            for chrom in CHROMS {
                for pos in 0..SPAN {
                    let expected: f64 = covering(&inputs, chrom, pos).iter().map(|iv| iv.score).sum();
                    let reported = pieces_at(&output, chrom, pos)
                        .first()
                        .and_then(|s| s.score)
                        .unwrap_or(0.0);
                    assert_eq!(reported, expected, "seed {seed}: {chrom}:{pos}");
                }
            }
        }
    }
}

#[test]
fn test_names_are_complete() {
    for seed in 0..SEEDS {
        let inputs = random_intervals(seed, 30);
        for mode in [EmitMode::Names, EmitMode::Stack] {
            let output = sweep_intervals(anonymous(mode), inputs.clone()).unwrap();

            for chrom in CHROMS {
                for pos in 0..SPAN {
                    let expected: BTreeSet<&str> = covering(&inputs, chrom, pos)
                        .iter()
                        .flat_map(|iv| iv.names.iter().map(String::as_str))
                        .collect();
                    let reported: BTreeSet<&str> = pieces_at(&output, chrom, pos)
                        .first()
                        .map(|s| s.names().into_iter().collect())
                        .unwrap_or_default();
                    assert_eq!(reported, expected, "seed {seed} {mode}: {chrom}:{pos}");
                }
            }
        }
    }
}

/// Names each input contributes under the synthetic policy: its own names,
/// or `chrom:start-end#n` with `n` counting non-empty intervals.
fn synthetic_names(inputs: &[GenomicInterval]) -> Vec<Vec<String>> {
    let mut ordinal = 0;
    inputs
        .iter()
        .map(|iv| {
            if iv.is_empty() {
                return Vec::new();
            }
            ordinal += 1;
            if iv.is_unnamed() {
                vec![format!("{}:{}-{}#{}", iv.chrom, iv.start, iv.end, ordinal)]
            } else {
                iv.names.clone()
            }
        })
        .collect()
}

#[test]
fn test_synthetic_names_are_complete() {
    for seed in 0..SEEDS {
        let inputs = random_intervals(seed, 30);
        let expected_names = synthetic_names(&inputs);
        for mode in [EmitMode::Names, EmitMode::Stack] {
            let output = sweep_intervals(MergeConfig::new(mode), inputs.clone()).unwrap();

            for chrom in CHROMS {
                for pos in 0..SPAN {
                    let expected: BTreeSet<&str> = inputs
                        .iter()
                        .zip(&expected_names)
                        .filter(|(iv, _)| iv.chrom == chrom && iv.start <= pos && pos < iv.end)
                        .flat_map(|(_, names)| names.iter().map(String::as_str))
                        .collect();
                    let reported: BTreeSet<&str> = pieces_at(&output, chrom, pos)
                        .first()
                        .map(|s| s.names().into_iter().collect())
                        .unwrap_or_default();
                    assert_eq!(reported, expected, "seed {seed} {mode}: {chrom}:{pos}");
                }
            }
        }
    }
}

#[test]
fn test_remerge_is_idempotent() {
    for seed in 0..SEEDS {
        let inputs = random_intervals(seed, 30);
        for policy in [AbsentNamePolicy::Anonymous, AbsentNamePolicy::Synthetic] {
            let config = MergeConfig::new(EmitMode::Names).with_absent_names(policy);
            let first = sweep_intervals(config, inputs.clone()).unwrap();

            let text: String = first.iter().map(|s| format!("{}\n", s)).collect();
            let reparsed = parse_intervals(&text).unwrap();
            let second = sweep_intervals(config, reparsed).unwrap();

            assert_eq!(first, second, "seed {seed} {policy:?}");
        }
    }
}

#[test]
fn test_zero_length_inputs_change_nothing() {
    for seed in 0..SEEDS {
        let inputs = random_intervals(seed, 30);
        let non_empty: Vec<GenomicInterval> =
            inputs.iter().filter(|iv| !iv.is_empty()).cloned().collect();

        let config = anonymous(EmitMode::Stack);
        assert_eq!(
            sweep_intervals(config, inputs).unwrap(),
            sweep_intervals(config, non_empty).unwrap(),
            "seed {seed}"
        );
    }
}
