//! Operator method-name table.
//!
//! Maps operator tokens to the instance methods that implement them. The
//! defaults follow the naming used by `BigInteger`/`BigDecimal`-style value
//! classes:
//!
//! | Token | Method | | Token | Method |
//! |-------|--------|-|-------|--------|
//! | `+`   | `add`        | | `++` (prefix) | `increment` |
//! | `-`   | `subtract`   | | `--` (prefix) | `decrement` |
//! | `*`   | `multiply`   | | `-` (prefix)  | `negate`    |
//! | `/`   | `divide`     | | `+` (prefix)  | `plus`      |
//! | `%`   | `remainder`  | | `~` (prefix)  | `not`       |
//! | `&`   | `and`        | | `!` (prefix)  | `not`       |
//! | `\|`  | `or`         | | `<` `>` `<=` `>=` | `compareTo` |
//! | `^`   | `xor`        | | `a[i]`        | `get`       |
//! | `<<`  | `shiftLeft`  | | `a[i] = v`    | `set`, `put` |
//! | `>>`  | `shiftRight` | | conversion    | `valueOf`   |
//! | `>>>` | `shiftRightUnsigned` | | | |
//!
//! A table is immutable once built. [`OperatorTable::standard`] is the
//! process-wide default; hosts needing different names build their own with
//! [`crate::OperatorConfig`].

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// Default binary operator names.
pub const DEFAULT_BINARY: [(&str, &str); 11] = [
    ("+", "add"),
    ("-", "subtract"),
    ("*", "multiply"),
    ("/", "divide"),
    ("%", "remainder"),
    ("&", "and"),
    ("|", "or"),
    ("^", "xor"),
    ("<<", "shiftLeft"),
    (">>", "shiftRight"),
    (">>>", "shiftRightUnsigned"),
];

/// Default prefix operator names.
pub const DEFAULT_UNARY: [(&str, &str); 6] = [
    ("++", "increment"),
    ("--", "decrement"),
    ("-", "negate"),
    ("+", "plus"),
    ("~", "not"),
    ("!", "not"),
];

/// Default relational operator names.
pub const DEFAULT_COMPARISON: [(&str, &str); 4] = [
    ("<", "compareTo"),
    (">", "compareTo"),
    ("<=", "compareTo"),
    (">=", "compareTo"),
];

/// Default index-get candidates, in lookup order.
pub const DEFAULT_INDEX_GET: [&str; 1] = ["get"];

/// Default index-set candidates, in lookup order.
pub const DEFAULT_INDEX_SET: [&str; 2] = ["set", "put"];

/// Default conversion factory.
pub const DEFAULT_VALUE_OF: &str = "valueOf";

static STANDARD: LazyLock<OperatorTable> = LazyLock::new(OperatorTable::default);

/// Token to method-name lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorTable {
    pub(crate) binary: FxHashMap<String, String>,
    pub(crate) unary: FxHashMap<String, String>,
    pub(crate) comparison: FxHashMap<String, String>,
    pub(crate) index_get: Vec<String>,
    pub(crate) index_set: Vec<String>,
    pub(crate) value_of: String,
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self {
            binary: owned_map(&DEFAULT_BINARY),
            unary: owned_map(&DEFAULT_UNARY),
            comparison: owned_map(&DEFAULT_COMPARISON),
            index_get: DEFAULT_INDEX_GET.iter().map(|s| s.to_string()).collect(),
            index_set: DEFAULT_INDEX_SET.iter().map(|s| s.to_string()).collect(),
            value_of: DEFAULT_VALUE_OF.to_string(),
        }
    }
}

fn owned_map(entries: &[(&str, &str)]) -> FxHashMap<String, String> {
    entries
        .iter()
        .map(|(token, name)| (token.to_string(), name.to_string()))
        .collect()
}

impl OperatorTable {
    /// The shared default table.
    pub fn standard() -> &'static OperatorTable {
        &STANDARD
    }

    /// Method implementing binary `token`.
    #[inline]
    pub fn name_for_binary(&self, token: &str) -> Option<&str> {
        self.binary.get(token).map(String::as_str)
    }

    /// Method implementing prefix `token`.
    #[inline]
    pub fn name_for_unary(&self, token: &str) -> Option<&str> {
        self.unary.get(token).map(String::as_str)
    }

    /// Method implementing relational `token`.
    #[inline]
    pub fn name_for_comparison(&self, token: &str) -> Option<&str> {
        self.comparison.get(token).map(String::as_str)
    }

    /// Index-get method names, tried in order.
    #[inline]
    pub fn index_get_candidates(&self) -> &[String] {
        &self.index_get
    }

    /// Index-set method names, tried in order.
    #[inline]
    pub fn index_set_candidates(&self) -> &[String] {
        &self.index_set
    }

    /// Conversion factory consulted for implicit conversions.
    #[inline]
    pub fn value_of_name(&self) -> &str {
        &self.value_of
    }

    /// Whether `token` is a relational operator in this table.
    #[inline]
    pub fn is_comparison(&self, token: &str) -> bool {
        self.comparison.contains_key(token)
    }
}
