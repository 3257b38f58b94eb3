pub(crate) mod date;
pub(crate) mod debug;

pub(crate) use date::{parse_date, parse_gate_timestamp};
pub(crate) use debug::{parse_debug_enabled, set_parse_debug};
