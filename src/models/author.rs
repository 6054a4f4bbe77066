//! Author names as stored in the bibliographic database.
//!
//! A stored author is `"firstname | initials | surname | prefix"` and an
//! author list joins those with `" # "`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One author's name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub firstname: String,

    /// Space-separated initials, not repeating the first name
    #[serde(default)]
    pub initials: String,

    #[serde(default)]
    pub surname: String,

    /// Nobiliary particle, e.g. "van de"
    #[serde(default)]
    pub prefix: String,
}

impl Author {
    pub fn new(
        firstname: impl Into<String>,
        initials: impl Into<String>,
        surname: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        let mut author = Self {
            firstname: firstname.into(),
            initials: initials.into(),
            surname: surname.into(),
            prefix: prefix.into(),
        };
        author.promote_initial();
        author
    }

    /// Parse the stored `first | initials | surname | prefix` form.
    /// Missing trailing parts are left empty.
    pub fn from_db_string(s: &str) -> Self {
        let mut parts = s.split('|').map(str::trim);
        let mut next = || parts.next().unwrap_or("").to_string();
        let (firstname, initials, surname, prefix) = (next(), next(), next(), next());
        Self::new(firstname, initials, surname, prefix)
    }

    /// The stored form
    pub fn to_db_string(&self) -> String {
        [
            self.firstname.as_str(),
            self.initials.as_str(),
            self.surname.as_str(),
            self.prefix.as_str(),
        ]
        .join(" | ")
    }

    /// Without a first name, the first initial stands in for it
    fn promote_initial(&mut self) {
        if !self.firstname.trim().is_empty() {
            return;
        }
        let mut initials = self.initials.split_whitespace();
        if let Some(first) = initials.next() {
            self.firstname = first.to_string();
            self.initials = initials.collect::<Vec<_>>().join(" ");
        }
    }
}

impl fmt::Display for Author {
    /// Short form used for search strings: "van de Geek J P"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first_initial = self
            .firstname
            .trim()
            .chars()
            .next()
            .map(String::from)
            .unwrap_or_default();
        let parts = [
            self.prefix.trim(),
            self.surname.trim(),
            first_initial.as_str(),
            self.initials.trim(),
        ];
        let joined: Vec<&str> = parts.into_iter().filter(|p| !p.is_empty()).collect();
        f.write_str(&joined.join(" "))
    }
}

/// Ordered list of authors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorList(Vec<Author>);

impl AuthorList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the `#`-separated stored form
    pub fn from_db_string(s: &str) -> Self {
        if s.trim().is_empty() {
            return Self::new();
        }
        Self(s.split('#').map(Author::from_db_string).collect())
    }

    pub fn to_db_string(&self) -> String {
        self.0
            .iter()
            .map(Author::to_db_string)
            .collect::<Vec<_>>()
            .join(" # ")
    }

    pub fn push(&mut self, author: Author) {
        self.0.push(author);
    }

    pub fn first(&self) -> Option<&Author> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Author> {
        self.0.iter()
    }
}

impl fmt::Display for AuthorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(|a| a.to_string()).collect();
        f.write_str(&names.join(", "))
    }
}

impl From<Vec<Author>> for AuthorList {
    fn from(authors: Vec<Author>) -> Self {
        Self(authors)
    }
}

impl FromIterator<Author> for AuthorList {
    fn from_iter<I: IntoIterator<Item = Author>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a AuthorList {
    type Item = &'a Author;
    type IntoIter = std::slice::Iter<'a, Author>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
