//! Synthetic sequential numbers
//!
//! Persistent IDs are unwieldy at the prompt, so listings hand out small
//! per-kind numbers (1, 2, 3, ...) that later commands accept in place of
//! full IDs. Numbers are advisory: they map to whatever the last numbering
//! epoch assigned, and resetting a kind starts a fresh epoch. The map is
//! persisted as a store sidecar so numbers printed by one invocation resolve
//! in the next.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;
use thiserror::Error;

use crate::core::identity::{EntityId, EntityKind};
use crate::core::store::{NumberData, Store, StoreError};

#[derive(Debug, Default)]
struct KindNumbers {
    forward: BTreeMap<u32, EntityId>,
    reverse: HashMap<EntityId, u32>,
    next: u32,
}

impl KindNumbers {
    fn assign(&mut self, id: EntityId) -> u32 {
        if let Some(number) = self.reverse.get(&id) {
            return *number;
        }
        let number = self.next.max(1);
        self.forward.insert(number, id);
        self.reverse.insert(id, number);
        self.next = number + 1;
        number
    }
}

/// Per-kind map between synthetic numbers and persistent IDs
pub struct NumberMap {
    store: Rc<dyn Store>,
    data: Option<BTreeMap<EntityKind, KindNumbers>>,
    dirty: bool,
}

impl NumberMap {
    pub fn new(store: Rc<dyn Store>) -> Self {
        Self {
            store,
            data: None,
            dirty: false,
        }
    }

    fn ensure_loaded(
        &mut self,
    ) -> Result<&mut BTreeMap<EntityKind, KindNumbers>, StoreError> {
        if self.data.is_none() {
            let raw = self.store.load_numbers()?;
            let mut data: BTreeMap<EntityKind, KindNumbers> = BTreeMap::new();
            for (kind, numbers) in raw {
                let slot = data.entry(kind).or_default();
                for (number, id_str) in numbers {
                    // stale or hand-edited entries that no longer parse are
                    // simply forgotten; numbers are advisory
                    if let Ok(id) = EntityId::parse(&id_str) {
                        slot.forward.insert(number, id);
                        slot.reverse.insert(id, number);
                        slot.next = slot.next.max(number + 1);
                    }
                }
            }
            self.data = Some(data);
        }
        Ok(self.data.get_or_insert_with(BTreeMap::new))
    }

    /// Number an ID within the current epoch. Re-numbering the same ID
    /// returns its existing number.
    pub fn assign(&mut self, id: EntityId) -> Result<u32, StoreError> {
        let data = self.ensure_loaded()?;
        let number = data.entry(id.kind()).or_default().assign(id);
        self.dirty = true;
        Ok(number)
    }

    /// Look up the ID behind a number, if the current epoch assigned it
    pub fn resolve(&mut self, kind: EntityKind, number: u32) -> Result<Option<EntityId>, StoreError> {
        let data = self.ensure_loaded()?;
        Ok(data
            .get(&kind)
            .and_then(|numbers| numbers.forward.get(&number))
            .copied())
    }

    /// Start a fresh numbering epoch for a kind. Old numbers stop resolving.
    pub fn reset(&mut self, kind: EntityKind) -> Result<(), StoreError> {
        let data = self.ensure_loaded()?;
        if data.remove(&kind).is_some() {
            self.dirty = true;
        }
        Ok(())
    }

    /// Write the map back if it changed. Returns whether a write happened.
    pub fn flush(&mut self) -> Result<bool, StoreError> {
        if !self.dirty {
            return Ok(false);
        }
        let data = self.ensure_loaded()?;
        let mut raw = NumberData::new();
        for (kind, numbers) in data.iter() {
            let entries: BTreeMap<u32, String> = numbers
                .forward
                .iter()
                .map(|(number, id)| (*number, id.to_string()))
                .collect();
            raw.insert(*kind, entries);
        }
        self.store.store_numbers(&raw)?;
        self.dirty = false;
        Ok(true)
    }
}

/// Errors from parsing a number selection like `1,3-5,8`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeParseError {
    #[error("invalid number '{0}' (expected selections like '3' or '1,3-5,8')")]
    InvalidNumber(String),

    #[error("reversed range {0}-{1} (the smaller number goes first)")]
    Reversed(u32, u32),

    #[error("empty selection")]
    Empty,
}

/// Parse a comma-separated selection of numbers and inclusive ranges.
///
/// Results keep first-occurrence order and drop repeats, so `1,3-5,3`
/// yields `[1, 3, 4, 5]`.
pub fn parse_id_range(input: &str) -> Result<Vec<u32>, RangeParseError> {
    let mut result = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |n: u32, result: &mut Vec<u32>| {
        if seen.insert(n) {
            result.push(n);
        }
    };

    for piece in input.split(',') {
        let piece = piece.trim();
        if piece.is_empty() {
            return Err(RangeParseError::Empty);
        }
        if let Some((lo, hi)) = piece.split_once('-') {
            let lo: u32 = lo
                .trim()
                .parse()
                .map_err(|_| RangeParseError::InvalidNumber(piece.to_string()))?;
            let hi: u32 = hi
                .trim()
                .parse()
                .map_err(|_| RangeParseError::InvalidNumber(piece.to_string()))?;
            if lo > hi {
                return Err(RangeParseError::Reversed(lo, hi));
            }
            for n in lo..=hi {
                push(n, &mut result);
            }
        } else {
            let n: u32 = piece
                .parse()
                .map_err(|_| RangeParseError::InvalidNumber(piece.to_string()))?;
            push(n, &mut result);
        }
    }

    if result.is_empty() {
        return Err(RangeParseError::Empty);
    }
    Ok(result)
}
