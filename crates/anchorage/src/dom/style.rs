use std::{collections::BTreeMap, fmt};

/// An inline style record: CSS property names mapped to their values. This is
/// what a template binds to an element's `style` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleMap {
    /// Property name to value.
    props: BTreeMap<String, String>,
}

impl StyleMap {
    /// An empty style record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any previous value.
    pub fn set(&mut self, prop: impl Into<String>, value: impl Into<String>) {
        self.props.insert(prop.into(), value.into());
    }

    /// Builder-style variant of [`StyleMap::set`].
    pub fn with(mut self, prop: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(prop, value);
        self
    }

    /// Get a property value.
    pub fn get(&self, prop: &str) -> Option<&str> {
        self.props.get(prop).map(String::as_str)
    }

    /// Parse a pixel value such as `"530px"`.
    pub fn px(&self, prop: &str) -> Option<f64> {
        self.get(prop)?.strip_suffix("px")?.parse().ok()
    }

    /// Remove a property, returning its old value.
    pub fn remove(&mut self, prop: &str) -> Option<String> {
        self.props.remove(prop)
    }

    /// Is this style hiding the element?
    pub fn is_display_none(&self) -> bool {
        self.get("display") == Some("none")
    }

    /// Number of properties set.
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// True if no properties are set.
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Iterate over properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for StyleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (k, v) in self.iter() {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{k}: {v};")?;
            first = false;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            props: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
