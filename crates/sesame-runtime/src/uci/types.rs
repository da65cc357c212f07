//! Package, section and option records.

/// Value of a section option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// `option name 'value'`
    Scalar(String),
    /// One or more `list name 'value'` lines.
    List(Vec<String>),
}

impl OptionValue {
    /// Returns the scalar value, or `None` for lists.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::List(_) => None,
        }
    }

    /// Returns the list values, or `None` for scalars.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Scalar(_) => None,
            Self::List(values) => Some(values),
        }
    }
}

/// One `config <type> ['<name>']` block.
///
/// Options keep their file order. Anonymous sections are named
/// `@<type>[<index>]` after their position among sections of that type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UciSection {
    name: String,
    section_type: String,
    anonymous: bool,
    options: Vec<(String, OptionValue)>,
}

impl UciSection {
    /// Creates a named section.
    #[must_use]
    pub fn new(section_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            section_type: section_type.into(),
            anonymous: false,
            options: Vec::new(),
        }
    }

    pub(crate) fn anonymous(section_type: impl Into<String>, index: usize) -> Self {
        let section_type = section_type.into();
        Self {
            name: format!("@{section_type}[{index}]"),
            section_type,
            anonymous: true,
            options: Vec::new(),
        }
    }

    /// Adds or replaces a scalar option.
    #[must_use]
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_option(name.into(), value.into());
        self
    }

    /// Appends values to a list option.
    #[must_use]
    pub fn with_list<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        for value in values {
            self.add_list(name.clone(), value.into());
        }
        self
    }

    /// Sets a scalar option, replacing any previous value of either kind.
    pub fn set_option(&mut self, name: String, value: String) {
        match self.options.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = OptionValue::Scalar(value),
            None => self.options.push((name, OptionValue::Scalar(value))),
        }
    }

    /// Appends one list value. A scalar of the same name becomes the
    /// first element of the list.
    pub fn add_list(&mut self, name: String, value: String) {
        match self.options.iter_mut().find(|(n, _)| *n == name) {
            Some((_, OptionValue::List(values))) => values.push(value),
            Some((_, existing)) => {
                let first = match existing {
                    OptionValue::Scalar(s) => std::mem::take(s),
                    OptionValue::List(_) => String::new(),
                };
                *existing = OptionValue::List(vec![first, value]);
            }
            None => self.options.push((name, OptionValue::List(vec![value]))),
        }
    }

    /// Returns the section name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared section type.
    #[must_use]
    pub fn section_type(&self) -> &str {
        &self.section_type
    }

    /// Returns `true` if the section had no name in the file.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    /// Looks up an option of either kind.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Returns all options in file order.
    pub fn options(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.options.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Returns list-valued options in file order.
    pub fn lists(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.options
            .iter()
            .filter_map(|(n, v)| v.as_list().map(|values| (n.as_str(), values)))
    }
}

/// A loaded configuration package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UciPackage {
    name: String,
    sections: Vec<UciSection>,
}

impl UciPackage {
    /// Creates an empty package.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sections: Vec::new(),
        }
    }

    /// Appends a section.
    #[must_use]
    pub fn with_section(mut self, section: UciSection) -> Self {
        self.sections.push(section);
        self
    }

    /// Appends `section`, or reopens an earlier section with the same name.
    /// A reopened section keeps its original type. Returns its index.
    pub(crate) fn open_section(&mut self, section: UciSection) -> usize {
        if let Some(index) = self.sections.iter().position(|s| s.name() == section.name()) {
            return index;
        }
        self.sections.push(section);
        self.sections.len() - 1
    }

    pub(crate) fn section_mut(&mut self, index: usize) -> Option<&mut UciSection> {
        self.sections.get_mut(index)
    }

    /// Returns the package name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all sections in file order.
    #[must_use]
    pub fn sections(&self) -> &[UciSection] {
        &self.sections
    }

    /// Returns the sections of one type, in file order.
    pub fn sections_of_type<'a>(
        &'a self,
        section_type: &'a str,
    ) -> impl Iterator<Item = &'a UciSection> + 'a {
        self.sections
            .iter()
            .filter(move |s| s.section_type() == section_type)
    }

    /// Counts sections of one type (used to name anonymous sections).
    pub(crate) fn count_of_type(&self, section_type: &str) -> usize {
        self.sections_of_type(section_type).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_replaces_previous_value() {
        let section = UciSection::new("access", "a")
            .with_option("user", "alice")
            .with_option("user", "bob");
        assert_eq!(
            section.option("user").and_then(OptionValue::as_scalar),
            Some("bob")
        );
        assert_eq!(section.options().count(), 1);
    }

    #[test]
    fn list_appends_and_absorbs_scalar() {
        let section = UciSection::new("access", "a")
            .with_option("read", "first")
            .with_list("read", ["second", "third"]);
        assert_eq!(
            section.option("read").and_then(OptionValue::as_list),
            Some(&["first".to_string(), "second".to_string(), "third".to_string()][..])
        );
    }

    #[test]
    fn lists_skips_scalars() {
        let section = UciSection::new("access", "a")
            .with_option("user", "alice")
            .with_list("write", ["*"]);
        let names: Vec<&str> = section.lists().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["write"]);
    }

    #[test]
    fn sections_of_type_filters() {
        let package = UciPackage::new("luci")
            .with_section(UciSection::new("core", "main"))
            .with_section(UciSection::new("access", "a"))
            .with_section(UciSection::new("access", "b"));
        let names: Vec<&str> = package.sections_of_type("access").map(UciSection::name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn anonymous_section_name() {
        let section = UciSection::anonymous("access", 2);
        assert!(section.is_anonymous());
        assert_eq!(section.name(), "@access[2]");
    }
}
