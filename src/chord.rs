//! Canonical chord identifiers.
//!
//! A chord is one or more held modifiers plus exactly one trigger.  Its
//! canonical text form is the modifier names in ascending byte order,
//! followed by the trigger, separated by single spaces:
//!
//! ```text
//! Shift_L Super_L w
//! Control_L F3
//! F5
//! ```
//!
//! The same form is produced by [`ChordEncoder`] from live key state and by
//! [`Chord::from_symbols`] from configuration, so a binding matches
//! regardless of the order its keys were declared or pressed in.

use crate::keys::is_modifier;
use crate::tracker::KeyStateTracker;
use crate::traits::SymbolTranslator;
use std::fmt;

/// A key set that is not a valid chord.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChordError {
    #[error("no keys given")]
    Empty,
    #[error("no trigger key among {0:?}")]
    NoTrigger(Vec<String>),
    #[error("more than one trigger key: {0:?}")]
    MultipleTriggers(Vec<String>),
}

/// A validated chord: sorted, duplicate-free modifiers and one trigger.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chord {
    modifiers: Vec<String>,
    trigger: String,
}

impl Chord {
    /// Build a chord from symbol names in any order.
    ///
    /// Repeated modifiers collapse to one; repeated triggers count as one.
    pub fn from_symbols<I, S>(symbols: I) -> Result<Self, ChordError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut modifiers = Vec::new();
        let mut triggers: Vec<String> = Vec::new();
        for symbol in symbols {
            let symbol = symbol.as_ref();
            if is_modifier(symbol) {
                modifiers.push(symbol.to_string());
            } else if !triggers.iter().any(|t| t == symbol) {
                triggers.push(symbol.to_string());
            }
        }

        match triggers.len() {
            1 => {}
            0 if modifiers.is_empty() => return Err(ChordError::Empty),
            0 => return Err(ChordError::NoTrigger(modifiers)),
            _ => return Err(ChordError::MultipleTriggers(triggers)),
        }

        modifiers.sort_unstable();
        modifiers.dedup();
        Ok(Self {
            modifiers,
            trigger: triggers.remove(0),
        })
    }

    /// Parse a canonical (or any whitespace-separated) chord string.
    pub fn parse(s: &str) -> Result<Self, ChordError> {
        Self::from_symbols(s.split_whitespace())
    }

    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.modifiers {
            write!(f, "{} ", m)?;
        }
        f.write_str(&self.trigger)
    }
}

/// Turns the live pressed-key set into a [`Chord`].
pub struct ChordEncoder<T> {
    translator: T,
}

impl<T: SymbolTranslator> ChordEncoder<T> {
    pub fn new(translator: T) -> Self {
        Self { translator }
    }

    /// Symbol name for a single keycode.
    pub fn symbol(&self, code: crate::keys::KeyCode) -> Option<String> {
        self.translator.resolve(code)
    }

    /// Encode the keys currently held in `tracker`.
    ///
    /// Returns `None` unless exactly one held key is a trigger: either the
    /// chord is still being built, or two triggers make it ambiguous.
    /// Triggers are counted per key, so two keys sharing a symbol name are
    /// still two triggers.  Keys without a symbol are skipped.
    pub fn encode(&self, tracker: &KeyStateTracker) -> Option<Chord> {
        let mut symbols = Vec::with_capacity(tracker.len());
        let mut trigger_keys = 0usize;
        for symbol in tracker.iter().filter_map(|code| self.translator.resolve(code)) {
            if !is_modifier(&symbol) {
                trigger_keys += 1;
            }
            symbols.push(symbol);
        }
        if trigger_keys != 1 {
            return None;
        }
        Chord::from_symbols(&symbols).ok()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::keys::KeyCode;
    use proptest::prelude::*;
    use std::collections::HashMap;

    /// A translator over a fixed table, shared with other modules' tests.
    pub(crate) struct TableTranslator(pub HashMap<u32, &'static str>);

    impl TableTranslator {
        pub(crate) fn standard() -> Self {
            Self(HashMap::from([
                (50, "Shift_L"),
                (37, "Control_L"),
                (64, "Alt_L"),
                (133, "Super_L"),
                (62, "Shift_R"),
                (66, "Caps_Lock"),
                (25, "w"),
                (38, "a"),
                (10, "1"),
                (11, "2"),
                (69, "F3"),
                (71, "F5"),
                (75, "F9"),
            ]))
        }
    }

    impl SymbolTranslator for TableTranslator {
        fn resolve(&self, code: KeyCode) -> Option<String> {
            self.0.get(&code.0).map(|s| s.to_string())
        }
    }

    fn held(codes: &[u32]) -> KeyStateTracker {
        let mut tracker = KeyStateTracker::new(16);
        for &c in codes {
            tracker.on_press(KeyCode(c)).unwrap();
        }
        tracker
    }

    #[test]
    fn encodes_modifiers_sorted_then_trigger() {
        let encoder = ChordEncoder::new(TableTranslator::standard());
        let chord = encoder.encode(&held(&[50, 133, 25])).unwrap();
        assert_eq!(chord.to_string(), "Shift_L Super_L w");
        assert_eq!(chord.modifiers(), ["Shift_L", "Super_L"]);
        assert_eq!(chord.trigger(), "w");
    }

    #[test]
    fn lone_trigger_encodes_to_its_name() {
        let encoder = ChordEncoder::new(TableTranslator::standard());
        assert_eq!(encoder.encode(&held(&[71])).unwrap().to_string(), "F5");
    }

    #[test]
    fn modifiers_only_do_not_encode() {
        let encoder = ChordEncoder::new(TableTranslator::standard());
        assert!(encoder.encode(&held(&[50, 37])).is_none());
        assert!(encoder.encode(&held(&[])).is_none());
    }

    #[test]
    fn two_triggers_do_not_encode() {
        let encoder = ChordEncoder::new(TableTranslator::standard());
        assert!(encoder.encode(&held(&[133, 10, 11])).is_none());
        assert!(encoder.encode(&held(&[10, 11])).is_none());
    }

    #[test]
    fn two_keys_with_the_same_trigger_name_do_not_encode() {
        let encoder = ChordEncoder::new(TableTranslator(HashMap::from([
            (36, "Return"),
            (104, "Return"),
            (37, "Control_L"),
        ])));
        assert!(encoder.encode(&held(&[37, 36, 104])).is_none());
        assert!(encoder.encode(&held(&[36, 104])).is_none());
        assert_eq!(
            encoder.encode(&held(&[37, 104])).unwrap().to_string(),
            "Control_L Return"
        );
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let encoder = ChordEncoder::new(TableTranslator::standard());
        let chord = encoder.encode(&held(&[37, 999, 69])).unwrap();
        assert_eq!(chord.to_string(), "Control_L F3");
    }

    #[test]
    fn encoding_is_stable_on_requery() {
        let encoder = ChordEncoder::new(TableTranslator::standard());
        let tracker = held(&[64, 37, 38]);
        let first = encoder.encode(&tracker);
        let second = encoder.encode(&tracker);
        assert_eq!(first, second);
        assert_eq!(first.unwrap().to_string(), "Alt_L Control_L a");
    }

    #[test]
    fn from_symbols_normalises_declaration_order() {
        let a = Chord::from_symbols(["Super_L", "Shift_L", "w"]).unwrap();
        let b = Chord::from_symbols(["w", "Shift_L", "Super_L"]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Shift_L Super_L w");
    }

    #[test]
    fn from_symbols_collapses_repeats() {
        let chord = Chord::from_symbols(["Control_L", "x", "Control_L", "x"]).unwrap();
        assert_eq!(chord.to_string(), "Control_L x");
    }

    #[test]
    fn from_symbols_rejects_invalid_sets() {
        assert_eq!(Chord::from_symbols(Vec::<&str>::new()), Err(ChordError::Empty));
        assert_eq!(
            Chord::from_symbols(["Control_L"]),
            Err(ChordError::NoTrigger(vec!["Control_L".into()]))
        );
        assert_eq!(
            Chord::from_symbols(["a", "b"]),
            Err(ChordError::MultipleTriggers(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn parse_accepts_canonical_text() {
        let chord = Chord::parse("Control_L F3").unwrap();
        assert_eq!(chord.to_string(), "Control_L F3");
        assert!(Chord::parse("  ").is_err());
    }

    proptest! {
        #[test]
        fn modifier_press_order_does_not_matter(
            order in Just(vec![50u32, 37, 64, 133, 62]).prop_shuffle()
        ) {
            let encoder = ChordEncoder::new(TableTranslator::standard());
            let mut codes = order.clone();
            codes.push(25);
            let chord = encoder.encode(&held(&codes)).unwrap();
            prop_assert_eq!(chord.to_string(), "Alt_L Control_L Shift_L Shift_R Super_L w");
        }
    }
}
