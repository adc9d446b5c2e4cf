//! Access-network labels.
//!
//! A work's `allowed_network` names the network context that may access it.
//! The label set is deployment specific (see the `networks` configuration
//! section); the two below are always understood by the media server.

/// Works visible from everywhere.
pub const GLOBAL: &str = "global";

/// Works that must not be delivered at all.
pub const DISABLED: &str = "disabled";

/// Label assigned to freshly constructed works.
pub const DEFAULT: &str = GLOBAL;
