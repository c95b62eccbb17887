use crate::types::RowValues;

/// An ordered set of named statement parameters.
///
/// The same parameter set binds inline SQL placeholders and stored-procedure
/// arguments. Keys that do not appear as placeholders in the executed
/// statement are inert; a placeholder with no matching key fails the
/// statement. Insertion order is preserved (procedure call text is rendered
/// in it), and setting a name twice overwrites the earlier value in place.
///
/// ```rust
/// use viewproc::params::ParamSet;
///
/// let params = ParamSet::new().set("RoleId", 3).set("TeamCode", "T01");
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSet {
    entries: Vec<(String, RowValues)>,
}

impl ParamSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or overwrite a parameter, keeping the original position on
    /// overwrite.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RowValues>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RowValues> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<N: Into<String>, V: Into<RowValues>> FromIterator<(N, V)> for ParamSet {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut params = ParamSet::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}
