use serde::{Deserialize, Serialize};

/// Compilation options shared by every generator rendering a query.
///
/// Options are plain data so a host can load them from its own configuration
/// file:
///
/// ```
/// # use vsql_core::{NullOrder, Options};
/// let options: Options = serde_json::from_str(r#"{ "nulls": "first" }"#).unwrap();
/// assert_eq!(options.nulls, NullOrder::First);
/// assert!(options.tiebreak);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Append the root table's key field as a final ascending sort key when
    /// the query is sorted or paged. Without it, rows that tie on every sort
    /// key come back in an engine-specific order.
    pub tiebreak: bool,

    /// Where NULL sorts for ascending keys. Descending keys use the mirror
    /// position.
    pub nulls: NullOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullOrder {
    /// NULL sorts before every value.
    First,

    /// NULL sorts after every value.
    #[default]
    Last,
}

impl NullOrder {
    /// Returns `true` if NULLs come first for a key sorted in the given
    /// direction.
    pub fn nulls_first(self, ascending: bool) -> bool {
        match self {
            NullOrder::First => ascending,
            NullOrder::Last => !ascending,
        }
    }
}

impl Default for Options {
    fn default() -> Options {
        Options {
            tiebreak: true,
            nulls: NullOrder::default(),
        }
    }
}
