//! Randomized stress runner
//!
//! This module provides the `stress` subcommand. It drives a tree through a
//! long pseudo-random mix of inserts, erases and bound queries, checks the
//! red-black invariants with `Tree::verify`, and cross-checks every answer
//! against a `BTreeMap` model.

use anyhow::{Context, Result, bail, ensure};
use clap::Args;
use rbtree::config::TreeConfig;
use rbtree::tree::{NaturalOrder, Record, RecordFactory, Tree};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::ops::Bound;
use std::path::PathBuf;
use std::time::Instant;

/// Modulus of the generator that picks operations.
const CHOICE_MODULUS: u64 = 1_000_000_007;

/// Arguments for the stress subcommand
#[derive(Args, Debug)]
pub struct StressArgs {
    /// Scenario YAML file path
    #[arg(long, short = 's')]
    pub scenario: Option<PathBuf>,

    /// Number of operations to run
    #[arg(long)]
    pub operations: Option<usize>,

    /// Keys are drawn from 0..key_space
    #[arg(long)]
    pub key_space: Option<u64>,

    /// Generator seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Allow duplicate keys
    #[arg(long)]
    pub multi: bool,

    /// Maximum arena growth span
    #[arg(long)]
    pub max_span: Option<usize>,

    /// Run the full invariant check every N operations (0: only at the end)
    #[arg(long)]
    pub verify_every: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Scenario {
    name: String,
    seed: u64,
    step: u64,
    operations: usize,
    key_space: u64,
    verify_every: usize,
    mix: Mix,
    tree: TreeConfig,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            seed: 23456,
            step: 12345,
            operations: 100_000,
            key_space: 1000,
            verify_every: 1,
            mix: Mix::default(),
            tree: TreeConfig::default(),
        }
    }
}

impl Scenario {
    fn apply(mut self, args: &StressArgs) -> Self {
        if let Some(operations) = args.operations {
            self.operations = operations;
        }
        if let Some(key_space) = args.key_space {
            self.key_space = key_space;
        }
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        if args.multi {
            self.tree.unique = false;
        }
        if let Some(max_span) = args.max_span {
            self.tree = self.tree.with_max_span(max_span);
        }
        if let Some(verify_every) = args.verify_every {
            self.verify_every = verify_every;
        }
        self
    }
}

/// Relative weights of the operations.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct Mix {
    insert: u64,
    erase: u64,
    erase_first: u64,
    bound: u64,
    erase_range: u64,
}

impl Default for Mix {
    fn default() -> Self {
        Self {
            insert: 40,
            erase: 25,
            erase_first: 10,
            bound: 20,
            erase_range: 5,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Operation {
    Insert,
    Erase,
    EraseFirst,
    Bound,
    EraseRange,
}

impl Mix {
    fn total(&self) -> u64 {
        self.insert + self.erase + self.erase_first + self.bound + self.erase_range
    }

    fn pick(&self, roll: u64) -> Operation {
        let mut roll = roll % self.total();
        for (weight, operation) in [
            (self.insert, Operation::Insert),
            (self.erase, Operation::Erase),
            (self.erase_first, Operation::EraseFirst),
            (self.bound, Operation::Bound),
        ] {
            if roll < weight {
                return operation;
            }
            roll -= weight;
        }
        Operation::EraseRange
    }
}

/// Additive congruential generator: `state = (state + add) % modulus`.
struct Lcg {
    state: u64,
    add: u64,
    modulus: u64,
}

impl Lcg {
    const fn new(first: u64, add: u64, modulus: u64) -> Self {
        Self {
            state: first,
            add,
            modulus,
        }
    }

    fn next_value(&mut self) -> u64 {
        self.state = (self.state + self.add) % self.modulus;
        self.state
    }
}

#[derive(Debug)]
struct Entry {
    key: u64,
}

impl Record for Entry {
    type Key = u64;
    fn key(&self) -> &u64 {
        &self.key
    }
}

/// Multiset model: key to number of copies.
#[derive(Default)]
struct Model {
    counts: BTreeMap<u64, usize>,
    len: usize,
}

impl Model {
    fn count(&self, key: u64) -> usize {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    fn insert(&mut self, key: u64) {
        *self.counts.entry(key).or_default() += 1;
        self.len += 1;
    }

    fn remove_all(&mut self, key: u64) -> usize {
        let removed = self.counts.remove(&key).unwrap_or(0);
        self.len -= removed;
        removed
    }

    fn remove_first(&mut self) -> Option<u64> {
        let mut entry = self.counts.first_entry()?;
        let key = *entry.key();
        *entry.get_mut() -= 1;
        if *entry.get() == 0 {
            entry.remove();
        }
        self.len -= 1;
        Some(key)
    }

    fn remove_range(&mut self, low: u64, high: u64) -> usize {
        let keys: Vec<u64> = self.counts.range(low..high).map(|(key, _)| *key).collect();
        keys.into_iter().map(|key| self.remove_all(key)).sum()
    }

    fn lower_bound(&self, key: u64) -> Option<u64> {
        self.counts.range(key..).next().map(|(key, _)| *key)
    }

    fn upper_bound(&self, key: u64) -> Option<u64> {
        self.counts
            .range((Bound::Excluded(key), Bound::Unbounded))
            .next()
            .map(|(key, _)| *key)
    }

    fn expanded(&self) -> Vec<u64> {
        self.counts
            .iter()
            .flat_map(|(key, count)| std::iter::repeat_n(*key, *count))
            .collect()
    }
}

#[derive(Debug, Default)]
struct Stats {
    inserted: usize,
    rejected: usize,
    erased: usize,
    bounds: usize,
}

fn load_scenario(args: &StressArgs) -> Result<Scenario> {
    let Some(path) = &args.scenario else {
        return Ok(Scenario::default().apply(args));
    };
    if !path.exists() {
        bail!("Scenario file not found: {}", path.display());
    }
    let content = fs::read_to_string(path).context("Failed to read scenario file")?;
    let scenario: Scenario =
        serde_yaml::from_str(&content).context("Failed to parse scenario YAML")?;
    Ok(scenario.apply(args))
}

fn check(tree: &Tree<Entry>, model: &Model, step: usize) -> Result<()> {
    tree.verify()
        .with_context(|| format!("invariant broken after operation {step}"))?;
    ensure!(
        tree.len() == model.len,
        "length {} differs from model {} after operation {step}",
        tree.len(),
        model.len
    );
    Ok(())
}

/// Run the stress workload
pub fn run(args: StressArgs) -> Result<()> {
    let scenario = load_scenario(&args)?;
    ensure!(scenario.key_space > 0, "key_space must be positive");
    ensure!(scenario.mix.total() > 0, "operation mix has no weight");

    let config = scenario.tree.validate().context("Invalid tree settings")?;
    let unique = config.unique;
    let mut tree: Tree<Entry> = Tree::with_config(config, NaturalOrder, RecordFactory)?;
    let mut model = Model::default();
    let mut keys = Lcg::new(scenario.seed, scenario.step, scenario.key_space);
    let mut choices = Lcg::new(scenario.seed, scenario.step, CHOICE_MODULUS);
    let mut stats = Stats::default();

    tracing::info!(
        scenario = %scenario.name,
        operations = scenario.operations,
        key_space = scenario.key_space,
        unique,
        max_span = config.max_span,
        "stress run starting"
    );
    let started = Instant::now();

    for step in 0..scenario.operations {
        let key = keys.next_value();
        let operation = scenario.mix.pick(choices.next_value());
        tracing::trace!(step, key, ?operation, "operation");

        match operation {
            Operation::Insert => {
                let (_, inserted) = tree.insert(Entry { key });
                let expected = !(unique && model.count(key) > 0);
                ensure!(
                    inserted == expected,
                    "insert of {key} returned {inserted} at operation {step}"
                );
                if inserted {
                    model.insert(key);
                    stats.inserted += 1;
                } else {
                    stats.rejected += 1;
                }
            }
            Operation::Erase => {
                let erased = tree.erase(&key);
                let expected = model.remove_all(key);
                ensure!(
                    erased == expected,
                    "erase of {key} removed {erased}, model removed {expected} at operation {step}"
                );
                stats.erased += erased;
            }
            Operation::EraseFirst => {
                let begin = tree.begin();
                let first = tree.key(begin).copied();
                ensure!(
                    first == model.remove_first(),
                    "first key mismatch at operation {step}"
                );
                if first.is_some() {
                    tree.erase_at(begin);
                    stats.erased += 1;
                }
            }
            Operation::Bound => {
                let lower = tree.key(tree.lower_bound(&key)).copied();
                let upper = tree.key(tree.upper_bound(&key)).copied();
                ensure!(
                    lower == model.lower_bound(key),
                    "lower_bound({key}) = {lower:?} at operation {step}"
                );
                ensure!(
                    upper == model.upper_bound(key),
                    "upper_bound({key}) = {upper:?} at operation {step}"
                );
                ensure!(
                    tree.count(&key) == model.count(key),
                    "count({key}) mismatch at operation {step}"
                );
                stats.bounds += 1;
            }
            Operation::EraseRange => {
                let other = keys.next_value();
                let (low, high) = (key.min(other), key.max(other));
                let begin = tree.lower_bound(&low);
                let end = tree.lower_bound(&high);
                let erased = tree.erase_range(begin, end);
                let expected = model.remove_range(low, high);
                ensure!(
                    erased == expected,
                    "erase_range({low}..{high}) removed {erased}, model removed {expected} at operation {step}"
                );
                stats.erased += erased;
            }
        }

        if scenario.verify_every > 0 && (step + 1) % scenario.verify_every == 0 {
            check(&tree, &model, step)?;
        }
    }

    check(&tree, &model, scenario.operations)?;
    let stored: Vec<u64> = tree.iter().map(|entry| entry.key).collect();
    ensure!(
        stored == model.expanded(),
        "final contents differ from model"
    );

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis(),
        len = tree.len(),
        capacity = tree.capacity(),
        inserted = stats.inserted,
        rejected = stats.rejected,
        erased = stats.erased,
        bounds = stats.bounds,
        "stress run passed"
    );
    Ok(())
}
