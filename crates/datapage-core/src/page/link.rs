use serde::Serialize;
use std::fmt;

///
/// UrlBuilder
///
/// Collaborator that turns query parameters into a URL.
/// Route resolution and host handling live entirely on the far side.
///

pub trait UrlBuilder {
    /// Build a relative URL, or an absolute one when `absolute` is set.
    fn build(&self, params: &[(String, String)], absolute: bool) -> String;
}

impl<F> UrlBuilder for F
where
    F: Fn(&[(String, String)], bool) -> String,
{
    fn build(&self, params: &[(String, String)], absolute: bool) -> String {
        self(params, absolute)
    }
}

///
/// LinkRel
///
/// Relation names of the navigation links.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkRel {
    #[serde(rename = "self")]
    Current,
    First,
    Prev,
    Next,
    Last,
}

impl LinkRel {
    pub const ALL: [Self; 5] = [
        Self::Current,
        Self::First,
        Self::Prev,
        Self::Next,
        Self::Last,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Current => "self",
            Self::First => "first",
            Self::Prev => "prev",
            Self::Next => "next",
            Self::Last => "last",
        }
    }
}

impl fmt::Display for LinkRel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
