//! Deduplication and grouping of one batch call.

use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Distinct strings translated concurrently per group.
    pub group_size: usize,
    /// Pause between consecutive groups (not after the last one).
    pub group_delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            group_size: 10,
            group_delay: Duration::from_millis(500),
        }
    }
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_group_size(mut self, s: usize) -> Self {
        self.group_size = s.max(1);
        self
    }
    pub fn with_group_delay(mut self, d: Duration) -> Self {
        self.group_delay = d;
        self
    }
}

/// Per-call working state: the distinct inputs in first-seen order, and for every original
/// position the index of its distinct string.
#[derive(Debug)]
pub struct BatchPlan<'a> {
    distinct: Vec<&'a str>,
    slots: Vec<usize>,
}

impl<'a> BatchPlan<'a> {
    pub fn new<S: AsRef<str>>(texts: &'a [S]) -> Self {
        let mut index: HashMap<&'a str, usize> = HashMap::with_capacity(texts.len());
        let mut distinct = Vec::new();
        let slots: Vec<usize> = texts
            .iter()
            .map(|t| {
                let t = t.as_ref();
                *index.entry(t).or_insert_with(|| {
                    distinct.push(t);
                    distinct.len() - 1
                })
            })
            .collect();
        Self { distinct, slots }
    }

    pub fn distinct(&self) -> &[&'a str] {
        &self.distinct
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Distinct strings in fixed-size groups, each paired with the distinct index of its first member.
    pub fn groups(&self, size: usize) -> impl Iterator<Item = (usize, &[&'a str])> + '_ {
        let size = size.max(1);
        self.distinct
            .chunks(size)
            .enumerate()
            .map(move |(i, chunk)| (i * size, chunk))
    }

    pub fn group_count(&self, size: usize) -> usize {
        let size = size.max(1);
        (self.distinct.len() + size - 1) / size
    }

    /// Expand one result per distinct string back to one result per original position.
    pub fn fan_out<T: Clone>(&self, per_distinct: &[T]) -> Vec<T> {
        self.slots.iter().map(|&i| per_distinct[i].clone()).collect()
    }
}
