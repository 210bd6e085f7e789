use anyhow::{Result, bail};
use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

/// Unicode general categories, as reported by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Cc,
    Cf,
    Cn,
    Co,
    Cs,
    LC,
    Ll,
    Lm,
    Lo,
    Lt,
    Lu,
    Mc,
    Me,
    Mn,
    Nd,
    Nl,
    No,
    Pc,
    Pd,
    Pe,
    Pf,
    Pi,
    Po,
    Ps,
    Sc,
    Sk,
    Sm,
    So,
    Zl,
    Zp,
    Zs,
}

// One table, indexed both ways, so symbol, enum and description cannot
// drift apart.
const CATEGORY_TABLE: &[(Category, &str, &str)] = &[
    (Category::Cc, "Cc", "Other, Control"),
    (Category::Cf, "Cf", "Other, Format"),
    (Category::Cn, "Cn", "Other, Not Assigned"),
    (Category::Co, "Co", "Other, Private Use"),
    (Category::Cs, "Cs", "Other, Surrogate"),
    (Category::LC, "LC", "Letter, Cased"),
    (Category::Ll, "Ll", "Letter, Lowercase"),
    (Category::Lm, "Lm", "Letter, Modifier"),
    (Category::Lo, "Lo", "Letter, Other"),
    (Category::Lt, "Lt", "Letter, Titlecase"),
    (Category::Lu, "Lu", "Letter, Uppercase"),
    (Category::Mc, "Mc", "Mark, Spacing Combining"),
    (Category::Me, "Me", "Mark, Enclosing"),
    (Category::Mn, "Mn", "Mark, Nonspacing"),
    (Category::Nd, "Nd", "Number, Decimal Digit"),
    (Category::Nl, "Nl", "Number, Letter"),
    (Category::No, "No", "Number, Other"),
    (Category::Pc, "Pc", "Punctuation, Connector"),
    (Category::Pd, "Pd", "Punctuation, Dash"),
    (Category::Pe, "Pe", "Punctuation, Close"),
    (Category::Pf, "Pf", "Punctuation, Final quote"),
    (Category::Pi, "Pi", "Punctuation, Initial quote"),
    (Category::Po, "Po", "Punctuation, Other"),
    (Category::Ps, "Ps", "Punctuation, Open"),
    (Category::Sc, "Sc", "Symbol, Currency"),
    (Category::Sk, "Sk", "Symbol, Modifier"),
    (Category::Sm, "Sm", "Symbol, Math"),
    (Category::So, "So", "Symbol, Other"),
    (Category::Zl, "Zl", "Separator, Line"),
    (Category::Zp, "Zp", "Separator, Paragraph"),
    (Category::Zs, "Zs", "Separator, Space"),
];

impl Category {
    pub fn symbol(&self) -> &'static str {
        CATEGORY_TABLE
            .iter()
            .find(|(cat, _, _)| cat == self)
            .map(|(_, sym, _)| *sym)
            .unwrap_or("Cn")
    }

    pub fn description(&self) -> &'static str {
        CATEGORY_TABLE
            .iter()
            .find(|(cat, _, _)| cat == self)
            .map(|(_, _, desc)| *desc)
            .unwrap_or("Other, Not Assigned")
    }

    pub fn from_symbol(symbol: &str) -> Result<Self> {
        match CATEGORY_TABLE.iter().find(|(_, sym, _)| *sym == symbol) {
            Some((cat, _, _)) => Ok(*cat),
            None => bail!("Unknown Unicode category symbol: \"{}\"", symbol),
        }
    }
}

/// General category of a character.
pub fn classify(c: char) -> Category {
    match c.general_category() {
        GeneralCategory::UppercaseLetter => Category::Lu,
        GeneralCategory::LowercaseLetter => Category::Ll,
        GeneralCategory::TitlecaseLetter => Category::Lt,
        GeneralCategory::ModifierLetter => Category::Lm,
        GeneralCategory::OtherLetter => Category::Lo,
        GeneralCategory::NonspacingMark => Category::Mn,
        GeneralCategory::SpacingMark => Category::Mc,
        GeneralCategory::EnclosingMark => Category::Me,
        GeneralCategory::DecimalNumber => Category::Nd,
        GeneralCategory::LetterNumber => Category::Nl,
        GeneralCategory::OtherNumber => Category::No,
        GeneralCategory::ConnectorPunctuation => Category::Pc,
        GeneralCategory::DashPunctuation => Category::Pd,
        GeneralCategory::OpenPunctuation => Category::Ps,
        GeneralCategory::ClosePunctuation => Category::Pe,
        GeneralCategory::InitialPunctuation => Category::Pi,
        GeneralCategory::FinalPunctuation => Category::Pf,
        GeneralCategory::OtherPunctuation => Category::Po,
        GeneralCategory::MathSymbol => Category::Sm,
        GeneralCategory::CurrencySymbol => Category::Sc,
        GeneralCategory::ModifierSymbol => Category::Sk,
        GeneralCategory::OtherSymbol => Category::So,
        GeneralCategory::SpaceSeparator => Category::Zs,
        GeneralCategory::LineSeparator => Category::Zl,
        GeneralCategory::ParagraphSeparator => Category::Zp,
        GeneralCategory::Control => Category::Cc,
        GeneralCategory::Format => Category::Cf,
        GeneralCategory::Surrogate => Category::Cs,
        GeneralCategory::PrivateUse => Category::Co,
        GeneralCategory::Unassigned => Category::Cn,
    }
}

/// Simplified character class used by complexity constraints. `Co` is
/// the catch-all; it has no substitute alphabet and is never enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    Lu,
    Ll,
    No,
    Po,
    So,
    Co,
}

/// Collapses the fine-grained category into the six-way class set.
pub fn simplify(category: Category) -> CharClass {
    match category {
        Category::Lu | Category::Lt => CharClass::Lu,
        Category::Ll | Category::Lo => CharClass::Ll,
        Category::Nd | Category::Nl | Category::No => CharClass::No,
        Category::Pe
        | Category::Pc
        | Category::Pd
        | Category::Pf
        | Category::Pi
        | Category::Ps
        | Category::Po => CharClass::Po,
        Category::Sc | Category::Sk | Category::Sm | Category::So => CharClass::So,
        _ => CharClass::Co,
    }
}

/// Simplified class of a character.
pub fn class_of(c: char) -> CharClass {
    simplify(classify(c))
}

/// ASCII alphabet that repair draws from when it needs to manufacture a
/// character of the given class. `None` for the catch-all class.
pub fn substitute_alphabet(class: CharClass) -> Option<&'static str> {
    match class {
        CharClass::Lu => Some("ABCDEFGHIJKLMNOPQRSTUVWXYZ"),
        CharClass::Ll => Some("abcdefghijklmnopqrstuvwxyz"),
        CharClass::No => Some("0123456789"),
        CharClass::Po => Some("!\"#%&'()*,-./:;?@[\\]_{}"),
        CharClass::So => Some("$+<=>^`|~"),
        CharClass::Co => None,
    }
}

/// Per-class occurrence tally. Preserves insertion order (order of
/// first appearance), which the repair donor selection depends on.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClassCounts {
    entries: Vec<(CharClass, u32)>,
}

impl ClassCounts {
    pub fn get(&self, class: CharClass) -> u32 {
        self.entries
            .iter()
            .find(|(c, _)| *c == class)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn add(&mut self, class: CharClass) {
        match self.entries.iter_mut().find(|(c, _)| *c == class) {
            Some((_, n)) => *n += 1,
            None => self.entries.push((class, 1)),
        }
    }

    pub fn sub(&mut self, class: CharClass) {
        if let Some((_, n)) = self.entries.iter_mut().find(|(c, _)| *c == class) {
            *n = n.saturating_sub(1);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CharClass, u32)> + '_ {
        self.entries.iter().copied()
    }
}

/// Tallies simplified classes over a string.
pub fn count_classes(s: &str) -> ClassCounts {
    count_classes_of(s.chars())
}

/// Tallies simplified classes over a character sequence.
pub fn count_classes_of<I: IntoIterator<Item = char>>(chars: I) -> ClassCounts {
    let mut counts = ClassCounts::default();
    for c in chars {
        counts.add(class_of(c));
    }
    counts
}
