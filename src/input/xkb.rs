//! [`SymbolTranslator`] backed by the system XKB keymap.
//!
//! The keymap is compiled from the default RMLVO names (honouring the
//! `XKB_DEFAULT_*` environment variables).  The state is never updated with
//! key transitions, so every key resolves to its base-level symbol: holding
//! Shift and pressing `a` reads as `Shift_L a`, not `Shift_L A`.

use crate::keys::KeyCode;
use crate::traits::SymbolTranslator;
use xkbcommon::xkb;

#[derive(Debug, thiserror::Error)]
#[error("failed to compile the XKB keymap")]
pub struct XkbError;

pub struct XkbTranslator {
    state: xkb::State,
}

impl XkbTranslator {
    pub fn new() -> Result<Self, XkbError> {
        let context = xkb::Context::new(xkb::CONTEXT_NO_FLAGS);
        let keymap = xkb::Keymap::new_from_names(
            &context,
            "",   // rules
            "",   // model
            "",   // layout
            "",   // variant
            None, // options
            xkb::KEYMAP_COMPILE_NO_FLAGS,
        )
        .ok_or(XkbError)?;
        Ok(Self {
            state: xkb::State::new(&keymap),
        })
    }
}

impl SymbolTranslator for XkbTranslator {
    fn resolve(&self, code: KeyCode) -> Option<String> {
        let keysym = self.state.key_get_one_sym(xkb::Keycode::new(code.0));
        if keysym.raw() == xkb::keysyms::KEY_NoSymbol {
            return None;
        }
        Some(xkb::keysym_get_name(keysym))
    }
}
