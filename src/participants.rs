//! Participant address list — extraction and rendering.
//!
//! The deployment tooling expects the full participant set as a single
//! bracketed literal (`["0x...", "0x..."]`) in the `ALL_PARTICIPANTS`
//! environment variable of the `deploy build` / `deploy run` processes.
//! The list is a plain ordered container internally; the literal form is
//! produced only at the boundary by [`AddressList::render`].

use crate::keys::ParticipantKey;

/// Environment variable consumed by the deployment build/run steps.
pub const ALL_PARTICIPANTS_ENV: &str = "ALL_PARTICIPANTS";

/// Ordered list of participant addresses.
///
/// Order is the order records appear in the keys file. Duplicates are
/// kept, and addresses are not validated — any string is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressList(Vec<String>);

impl AddressList {
    /// Extract addresses from key records, preserving source order.
    #[must_use]
    pub fn from_keys(keys: &[ParticipantKey]) -> Self {
        Self(keys.iter().map(|k| k.address.clone()).collect())
    }

    /// Number of addresses in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no addresses were extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Addresses in source order.
    #[must_use]
    pub fn addresses(&self) -> &[String] {
        &self.0
    }

    /// Render the bracketed literal: each address double-quoted, entries
    /// joined with `", "`, no trailing separator. The empty list renders
    /// as `[]` — a defined value, not an error.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("[");
        for (i, addr) in self.0.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push('"');
            out.push_str(addr);
            out.push('"');
        }
        out.push(']');
        out
    }
}
