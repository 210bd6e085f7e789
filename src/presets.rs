use crate::category::CharClass;
use crate::constraint::Constraint;
use crate::generator::Generator;
use crate::range::CharRange;
use anyhow::{Result, bail};
use std::collections::HashMap;

/// Caller-owned registry of named generators. Constructed once at
/// startup and passed by reference; there is no process-wide state.
#[derive(Debug, Default)]
pub struct Registry {
    list: Vec<Generator>,
    lookup: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the stock presets.
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::new();

        registry.add(Generator::new(
            "Decimal",
            ranges(&[('0', '9')])?,
            None,
            Vec::new(),
        ))?;
        registry.add(Generator::new(
            "Hexadecimal",
            ranges(&[('0', '9'), ('A', 'F')])?,
            None,
            Vec::new(),
        ))?;
        registry.add(Generator::new(
            "Alphanumeric",
            ranges(&[('0', '9'), ('A', 'Z'), ('a', 'z')])?,
            None,
            Vec::new(),
        ))?;
        registry.add(Generator::new(
            "NCName",
            ranges(&[
                ('0', '9'),
                ('A', 'Z'),
                ('a', 'z'),
                ('_', '_'),
                ('.', '.'),
                ('-', '-'),
            ])?,
            Some(ranges(&[('A', 'Z'), ('a', 'z'), ('_', '_')])?),
            letter_digit_constraints(),
        ))?;
        registry.add(Generator::new(
            "QWERTY",
            ranges(&[('!', '~')])?,
            None,
            full_constraints(),
        ))?;
        registry.add(Generator::new(
            "Latin-1",
            ranges(&[('!', '~'), ('\u{A1}', '\u{FF}')])?,
            None,
            full_constraints(),
        ))?;
        registry.add(Generator::new(
            "LGC",
            ranges(&[
                ('!', '~'),
                ('\u{A1}', '\u{17F}'),
                ('\u{391}', '\u{3A1}'),
                ('\u{3A3}', '\u{3C9}'),
                ('\u{400}', '\u{4FF}'),
            ])?,
            None,
            full_constraints(),
        ))?;
        registry.add(Generator::new(
            "xml:id",
            name_chars()?,
            Some(name_start_chars()?),
            letter_digit_constraints(),
        ))?;
        registry.add(Generator::new(
            "Nmtoken",
            name_chars()?,
            None,
            letter_digit_constraints(),
        ))?;

        Ok(registry)
    }

    /// Adds a generator; its index in the list is returned. Names are
    /// case-insensitive and must be unique.
    pub fn add(&mut self, generator: Generator) -> Result<usize> {
        let key = generator.name().to_lowercase();
        if self.lookup.contains_key(&key) {
            bail!("Generator named \"{}\" already added", generator.name());
        }
        let index = self.list.len();
        self.lookup.insert(key, index);
        self.list.push(generator);
        Ok(index)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Generator> {
        match self.list.get(index) {
            Some(generator) => Ok(generator),
            None => bail!("Index {} out of range: [0,{})", index, self.list.len()),
        }
    }

    pub fn find(&self, name: &str) -> Result<&Generator> {
        match self.lookup.get(&name.to_lowercase()) {
            Some(&index) => Ok(&self.list[index]),
            None => bail!("Generator named \"{}\" not found", name),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Generator> {
        self.list.iter()
    }
}

fn ranges(pairs: &[(char, char)]) -> Result<Vec<CharRange>> {
    pairs
        .iter()
        .map(|&(min, max)| CharRange::new(min, max))
        .collect()
}

fn letter_digit_constraints() -> Vec<Constraint> {
    vec![
        Constraint::at_least_one(CharClass::Lu),
        Constraint::at_least_one(CharClass::Ll),
        Constraint::at_least_one(CharClass::No),
    ]
}

fn full_constraints() -> Vec<Constraint> {
    vec![
        Constraint::at_least_one(CharClass::Lu),
        Constraint::at_least_one(CharClass::Ll),
        Constraint::at_least_one(CharClass::No),
        Constraint::at_least_one(CharClass::Po),
        Constraint::at_least_one(CharClass::So),
    ]
}

// XML 1.0 NameStartChar, restricted to the Basic Multilingual Plane and
// therefore free of the surrogate block.
fn name_start_chars() -> Result<Vec<CharRange>> {
    ranges(&[
        ('A', 'Z'),
        ('_', '_'),
        ('a', 'z'),
        ('\u{C0}', '\u{D6}'),
        ('\u{D8}', '\u{F6}'),
        ('\u{F8}', '\u{2FF}'),
        ('\u{370}', '\u{37D}'),
        ('\u{37F}', '\u{1FFF}'),
        ('\u{200C}', '\u{200D}'),
        ('\u{2070}', '\u{218F}'),
        ('\u{2C00}', '\u{2FEF}'),
        ('\u{3001}', '\u{D7FF}'),
        ('\u{F900}', '\u{FDCF}'),
        ('\u{FDF0}', '\u{FFFD}'),
    ])
}

// XML 1.0 NameChar: NameStartChar plus digits, '-', '.', middle dot and
// the combining ranges.
fn name_chars() -> Result<Vec<CharRange>> {
    let mut chars = ranges(&[
        ('-', '-'),
        ('.', '.'),
        ('0', '9'),
        ('\u{B7}', '\u{B7}'),
        ('\u{300}', '\u{36F}'),
        ('\u{203F}', '\u{2040}'),
    ])?;
    chars.extend(name_start_chars()?);
    Ok(chars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range;

    #[test]
    fn test_default_presets_registered() {
        let registry = Registry::with_defaults().unwrap();
        assert_eq!(registry.len(), 9);
        for name in [
            "Decimal",
            "Hexadecimal",
            "Alphanumeric",
            "NCName",
            "QWERTY",
            "Latin-1",
            "LGC",
            "xml:id",
            "Nmtoken",
        ] {
            assert!(registry.contains(name), "Missing preset: {}", name);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = Registry::with_defaults().unwrap();
        assert_eq!(registry.find("qwerty").unwrap().name(), "QWERTY");
        assert_eq!(registry.find("ncname").unwrap().name(), "NCName");
        assert_eq!(registry.find("XML:ID").unwrap().name(), "xml:id");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = Registry::with_defaults().unwrap();
        let dup = Generator::new(
            "decimal",
            ranges(&[('0', '9')]).unwrap(),
            None,
            Vec::new(),
        );
        let result = registry.add(dup);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already added"));
    }

    #[test]
    fn test_unknown_name_error_names_the_preset() {
        let registry = Registry::with_defaults().unwrap();
        let result = registry.find("rot13");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("rot13"));
    }

    #[test]
    fn test_index_out_of_range() {
        let registry = Registry::with_defaults().unwrap();
        assert!(registry.get(0).is_ok());
        let result = registry.get(registry.len());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("out of range"));
    }

    #[test]
    fn test_add_returns_list_position() {
        let mut registry = Registry::new();
        let first = registry
            .add(Generator::new(
                "Binary",
                ranges(&[('0', '1')]).unwrap(),
                None,
                Vec::new(),
            ))
            .unwrap();
        let second = registry
            .add(Generator::new(
                "Octal",
                ranges(&[('0', '7')]).unwrap(),
                None,
                Vec::new(),
            ))
            .unwrap();
        assert_eq!((first, second), (0, 1));
        assert_eq!(registry.get(1).unwrap().name(), "Octal");
    }

    #[test]
    fn test_xml_id_shape() {
        let registry = Registry::with_defaults().unwrap();
        let xmlid = registry.find("xml:id").unwrap();
        let first = xmlid.first_ranges().expect("xml:id restricts first char");
        // First set must reject digits but accept letters.
        assert!(range::index_of(first, '7').is_none());
        assert!(range::index_of(first, 'x').is_some());
        assert!(range::index_of(xmlid.ranges(), '7').is_some());
        // No preset range may straddle the surrogate block.
        for r in xmlid.ranges() {
            assert!(r.max() < 0xD800 || r.min() > 0xDFFF);
        }
    }
}
