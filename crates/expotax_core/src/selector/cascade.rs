//! Cascading selector state machine.
//!
//! # Responsibility
//! - Own the selected code and valid-option list per chain level.
//! - Reset and refilter every dependent level when an ancestor changes.
//! - Support a terminal auto-assign level whose value is derived from the
//!   selected parent node instead of picked by the user (e.g. a group's
//!   bound teacher, or the city list's department).
//!
//! # Invariants
//! - Invalidation flows strictly downward: `select(level, ..)` never
//!   touches levels shallower than `level`.
//! - Level 0 offers the full root listing; level `k > 0` offers exactly the
//!   children of the level `k - 1` selection, or nothing while that
//!   selection is absent.
//! - Auto-assign levels are terminal and reject direct selection.

use crate::model::node::{Level, Node};
use crate::search::index::HierarchyIndex;
use crate::store::taxonomy_store::TaxonomyStore;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by selector operations.
pub type SelectorResult<T> = Result<T, SelectorError>;

/// Errors from selection-chain transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// Level is outside the chain bound at construction.
    LevelOutOfChain { level: Level, chain_len: usize },
    /// Code is not among the currently valid options for the level.
    OptionNotAvailable { level: Level, code: String },
    /// Level is auto-assigned and cannot be selected directly.
    AutoAssignedLevel(Level),
    /// Auto-assign mode is only supported on the deepest chain level.
    AutoAssignNotLast { level: Level, chain_len: usize },
}

impl Display for SelectorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LevelOutOfChain { level, chain_len } => {
                write!(f, "level {level} is outside selection chain of {chain_len}")
            }
            Self::OptionNotAvailable { level, code } => {
                write!(f, "code `{code}` is not selectable at level {level}")
            }
            Self::AutoAssignedLevel(level) => {
                write!(f, "level {level} is auto-assigned and not user-selectable")
            }
            Self::AutoAssignNotLast { level, chain_len } => write!(
                f,
                "auto-assign requires the deepest level, got {level} of {chain_len}"
            ),
        }
    }
}

impl Error for SelectorError {}

/// Derives an auto-assigned value from the selected parent node.
pub type DeriveFn = Box<dyn Fn(&Node) -> Option<String>>;

enum SlotMode {
    /// User picks from the valid-options list.
    Pick,
    /// Value is copied off the selected parent node.
    Auto(DeriveFn),
}

struct Slot {
    mode: SlotMode,
    selected: Option<String>,
    options: Vec<String>,
}

impl Slot {
    fn pick() -> Self {
        Self {
            mode: SlotMode::Pick,
            selected: None,
            options: Vec::new(),
        }
    }
}

/// State machine over one ordered chain of dependent pickers.
///
/// The chain may cover fewer levels than the backing tree depth; slots
/// beyond the backing data simply keep empty option lists.
pub struct CascadingSelector {
    slots: Vec<Slot>,
}

impl CascadingSelector {
    /// Creates an unbound chain of `chain_len` pick levels.
    ///
    /// Call [`CascadingSelector::refresh`] after binding to a store/index
    /// pair to populate the root options.
    pub fn new(chain_len: usize) -> Self {
        Self {
            slots: (0..chain_len).map(|_| Slot::pick()).collect(),
        }
    }

    /// Returns the number of chain levels.
    pub fn chain_len(&self) -> usize {
        self.slots.len()
    }

    /// Switches one level to auto-assign mode.
    ///
    /// Only the deepest chain level may be derived; every shallower level
    /// stays a user pick.
    pub fn auto_assign(&mut self, level: Level, derive: DeriveFn) -> SelectorResult<()> {
        let chain_len = self.slots.len();
        let slot = self
            .slots
            .get_mut(usize::from(level))
            .ok_or(SelectorError::LevelOutOfChain { level, chain_len })?;
        if usize::from(level) + 1 != chain_len {
            return Err(SelectorError::AutoAssignNotLast { level, chain_len });
        }
        slot.mode = SlotMode::Auto(derive);
        slot.selected = None;
        slot.options = Vec::new();
        Ok(())
    }

    /// Returns the currently valid codes a picker at `level` may offer.
    ///
    /// Auto-assign levels always report an empty list.
    pub fn options_for(&self, level: Level) -> &[String] {
        self.slots
            .get(usize::from(level))
            .map(|slot| slot.options.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the current selection at `level`, if any.
    pub fn selected_code(&self, level: Level) -> Option<&str> {
        self.slots
            .get(usize::from(level))?
            .selected
            .as_deref()
    }

    /// Selects `code` at `level` and invalidates every deeper level.
    ///
    /// The code must be among the currently valid options; deeper
    /// selections are cleared unconditionally, then option lists and
    /// auto-assigned values are recomputed.
    pub fn select(
        &mut self,
        store: &TaxonomyStore,
        index: &HierarchyIndex,
        level: Level,
        code: &str,
    ) -> SelectorResult<()> {
        let chain_len = self.slots.len();
        let idx = usize::from(level);
        let slot = self
            .slots
            .get(idx)
            .ok_or(SelectorError::LevelOutOfChain { level, chain_len })?;
        if matches!(slot.mode, SlotMode::Auto(_)) {
            return Err(SelectorError::AutoAssignedLevel(level));
        }

        let valid = self.options_from_index(index, level);
        if !valid.iter().any(|option| option == code) {
            return Err(SelectorError::OptionNotAvailable {
                level,
                code: code.to_string(),
            });
        }

        self.slots[idx].selected = Some(code.to_string());
        for slot in self.slots.iter_mut().skip(idx + 1) {
            slot.selected = None;
        }
        self.recompute(store, index);
        Ok(())
    }

    /// Clears selections from `from_level` downward.
    ///
    /// Shallower levels are untouched; option lists below `from_level`
    /// empty out since their governing selection is gone.
    pub fn reset(&mut self, from_level: Level) {
        let from = usize::from(from_level);
        for (idx, slot) in self.slots.iter_mut().enumerate().skip(from) {
            slot.selected = None;
            if idx > from {
                slot.options = Vec::new();
            }
        }
    }

    /// Revalidates the chain against the current store/index state.
    ///
    /// Used after external mutations: option lists are refiltered, a
    /// selection whose node disappeared is dropped together with its
    /// descendants, and auto-assigned values are re-derived.
    pub fn refresh(&mut self, store: &TaxonomyStore, index: &HierarchyIndex) {
        self.recompute(store, index);
    }

    fn recompute(&mut self, store: &TaxonomyStore, index: &HierarchyIndex) {
        for idx in 0..self.slots.len() {
            let level = idx as Level;
            if matches!(self.slots[idx].mode, SlotMode::Auto(_)) {
                let derived = self.derive_auto_value(store, level);
                let slot = &mut self.slots[idx];
                slot.selected = derived;
                slot.options = Vec::new();
                continue;
            }

            let options = self.options_from_index(index, level);
            let still_valid = self.slots[idx]
                .selected
                .as_ref()
                .is_some_and(|code| options.iter().any(|option| option == code));
            if !still_valid {
                self.slots[idx].selected = None;
            }
            self.slots[idx].options = options;
        }
    }

    /// Computes the valid options for one pick level from the index:
    /// the full root listing at level 0, the children of the upstream
    /// selection otherwise.
    fn options_from_index(&self, index: &HierarchyIndex, level: Level) -> Vec<String> {
        if level == 0 {
            return index.level_codes(0);
        }
        let parent_level = level - 1;
        match self.selected_code(parent_level) {
            Some(parent_code) => index.children(parent_level, parent_code).to_vec(),
            None => Vec::new(),
        }
    }

    fn derive_auto_value(&self, store: &TaxonomyStore, level: Level) -> Option<String> {
        let SlotMode::Auto(derive) = &self.slots[usize::from(level)].mode else {
            return None;
        };
        let parent_level = level.checked_sub(1)?;
        let parent_code = self.selected_code(parent_level)?;
        let parent = store.get(parent_level, parent_code)?;
        derive(parent)
    }
}
