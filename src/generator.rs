use crate::category::{self, CharClass, ClassCounts};
use crate::constraint::Constraint;
use crate::range::{self, CharRange};
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};
use zeroize::Zeroizing;

// 31-bit rolling hash over the candidate string. This is the sole
// source of repair randomness; the seed is fixed so repair is fully
// reproducible from the input bytes alone.
const HASH_SEED: u32 = 0x6e25_b2b1;
const HASH_ROTATE: u32 = 19;
const HASH_MASK: u32 = 0x7fff_ffff;

/// A named password generator: an allowed character set, an optional
/// separate set for the first character, and zero or more complexity
/// constraints. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Generator {
    name: String,
    ranges: Vec<CharRange>,
    first_ranges: Option<Vec<CharRange>>,
    constraints: Vec<Constraint>,
}

impl Generator {
    pub fn new(
        name: impl Into<String>,
        ranges: Vec<CharRange>,
        first_ranges: Option<Vec<CharRange>>,
        constraints: Vec<Constraint>,
    ) -> Self {
        Self {
            name: name.into(),
            ranges,
            first_ranges,
            constraints,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ranges(&self) -> &[CharRange] {
        &self.ranges
    }

    pub fn first_ranges(&self) -> Option<&[CharRange]> {
        self.first_ranges.as_deref()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    fn ranges_for(&self, position: usize) -> &[CharRange] {
        match (&self.first_ranges, position) {
            (Some(first), 0) => first,
            _ => &self.ranges,
        }
    }

    /// Number of output characters needed to carry `bits` bits of
    /// entropy. Rounds up only; the result never undershoots the
    /// requested entropy.
    pub fn length_of(&self, bits: u32) -> usize {
        let mut count = 0usize;
        let mut remaining = bits as f64;
        if let Some(first) = &self.first_ranges {
            remaining -= (range::size_of(first) as f64).log2();
            count += 1;
        }
        if remaining > 0.0 {
            let per_char = (range::size_of(&self.ranges) as f64).log2();
            count += (remaining / per_char).ceil() as usize;
        }
        count
    }

    /// Decomposes the buffer's integer value into per-position digit
    /// indices, least significant digit first. The first digit uses the
    /// first-range set's size as its radix when one is configured.
    pub fn partition(&self, buffer: &[u8]) -> Vec<u64> {
        let digit_count = self.length_of(buffer.len() as u32 * 8);
        let mut value = magnitude(buffer);
        let mut digits = Vec::with_capacity(digit_count);
        if let Some(first) = &self.first_ranges
            && digit_count > 0
        {
            value = extract_digit(value, range::size_of(first), &mut digits);
        }
        let radix = range::size_of(&self.ranges);
        while digits.len() < digit_count {
            value = extract_digit(value, radix, &mut digits);
        }
        digits
    }

    /// Maps the buffer's digits to characters. Digit order equals
    /// output order; this is load-bearing for reproducibility.
    pub fn encode(&self, buffer: &[u8]) -> String {
        let digits = self.partition(buffer);
        let mut out = String::with_capacity(digits.len());
        for (position, &digit) in digits.iter().enumerate() {
            if let Some(c) = range::char_at(self.ranges_for(position), digit) {
                out.push(c);
            }
        }
        out
    }

    /// Encodes the buffer and repairs the result so that it satisfies
    /// every constraint.
    pub fn generate(&self, buffer: &[u8]) -> Zeroizing<String> {
        Zeroizing::new(self.make_acceptable(&self.encode(buffer)))
    }

    /// True when every character belongs to the applicable range set
    /// and every enforceable constraint's minimum count is met.
    /// Constraints on classes without a substitute alphabet can never
    /// be satisfied by repair and are not enforced.
    pub fn is_acceptable(&self, candidate: &str) -> bool {
        let chars: Vec<char> = candidate.chars().collect();
        for (position, &c) in chars.iter().enumerate() {
            if range::index_of(self.ranges_for(position), c).is_none() {
                return false;
            }
        }
        if self.constraints.is_empty() {
            return true;
        }
        let counts = category::count_classes_of(chars.iter().copied());
        self.constraints.iter().all(|constraint| {
            category::substitute_alphabet(constraint.class()).is_none()
                || counts.get(constraint.class()) >= constraint.min_count()
        })
    }

    /// Rewrites a candidate in place until it satisfies range
    /// membership and every constraint, consuming no entropy beyond
    /// the candidate itself. May grow the string when donors run out.
    pub fn make_acceptable(&self, candidate: &str) -> String {
        let mut chars: Vec<char> = candidate.chars().collect();
        let mut hash = hash_chars(chars.iter().copied());

        // Pass 1: put every out-of-range character back into its set.
        for position in 0..chars.len() {
            let ranges = self.ranges_for(position);
            if range::index_of(ranges, chars[position]).is_none() {
                let index = hash as u64 % range::size_of(ranges);
                if let Some(c) = range::char_at(ranges, index) {
                    chars[position] = c;
                }
                hash = advance(hash);
            }
        }

        hash = hash_chars(chars.iter().copied());
        let mut counts = category::count_classes_of(chars.iter().copied());

        // Pass 2: per-constraint donor substitution.
        for constraint in &self.constraints {
            let Some(alphabet) = category::substitute_alphabet(constraint.class()) else {
                continue;
            };
            while counts.get(constraint.class()) < constraint.min_count() {
                let Some(donor) = self.pick_donor(&counts, constraint.class()) else {
                    break;
                };
                let target = hash % counts.get(donor);
                // Position 0 is never a substitution site. Scan the
                // rest for the target-th donor occurrence, falling back
                // to the last one seen when the index overshoots. The
                // tallies are adjusted even when no occurrence exists
                // past position 0 and nothing is substituted; pass 3
                // recounts from the actual string, so repair still
                // converges.
                let mut found = None;
                let mut seen = 0u32;
                for position in 1..chars.len() {
                    if category::class_of(chars[position]) == donor {
                        found = Some(position);
                        if seen == target {
                            break;
                        }
                        seen += 1;
                    }
                }
                if let Some(position) = found {
                    chars[position] = pick(alphabet, hash);
                }
                counts.sub(donor);
                counts.add(constraint.class());
                hash = advance(hash);
            }
        }

        // Pass 3: append substitutes for anything still unmet.
        let mut counts = category::count_classes_of(chars.iter().copied());
        for constraint in &self.constraints {
            let Some(alphabet) = category::substitute_alphabet(constraint.class()) else {
                continue;
            };
            while counts.get(constraint.class()) < constraint.min_count() {
                chars.push(pick(alphabet, hash));
                hash = advance(hash);
                counts.add(constraint.class());
            }
        }

        chars.into_iter().collect()
    }

    fn configured_min(&self, class: CharClass) -> Option<u32> {
        self.constraints
            .iter()
            .find(|c| c.class() == class)
            .map(|c| c.min_count())
    }

    // Donor: the constrained class with the greatest surplus over its
    // own minimum; when none has a surplus, the unconstrained class
    // with the greatest raw count. Ties resolve to the earliest tally
    // entry (order of first appearance in the string).
    fn pick_donor(&self, counts: &ClassCounts, target: CharClass) -> Option<CharClass> {
        let mut donor = None;
        let mut best: i64 = 0;
        for (class, count) in counts.iter() {
            if class == target || count == 0 {
                continue;
            }
            if let Some(min) = self.configured_min(class) {
                let surplus = count as i64 - min as i64;
                if surplus > best {
                    best = surplus;
                    donor = Some(class);
                }
            }
        }
        if donor.is_some() {
            return donor;
        }
        let mut best: u32 = 0;
        for (class, count) in counts.iter() {
            if class == target || count == 0 || self.configured_min(class).is_some() {
                continue;
            }
            if count > best {
                best = count;
                donor = Some(class);
            }
        }
        donor
    }

    /// 31-bit rolling hash of a string.
    pub fn hash_of(s: &str) -> u32 {
        hash_chars(s.chars())
    }
}

/// Absolute magnitude of the buffer read as a little-endian integer.
/// A set top bit means two's-complement negation, so the value fed to
/// the radix-division loop is never negative.
fn magnitude(buffer: &[u8]) -> BigUint {
    let value = BigUint::from_bytes_le(buffer);
    match buffer.last() {
        Some(&msb) if msb & 0x80 != 0 => (BigUint::one() << (8 * buffer.len())) - value,
        _ => value,
    }
}

fn extract_digit(value: BigUint, radix: u64, digits: &mut Vec<u64>) -> BigUint {
    let radix = BigUint::from(radix);
    let remainder = &value % &radix;
    digits.push(remainder.to_u64().unwrap_or(0));
    value / radix
}

fn hash_chars<I: IntoIterator<Item = char>>(chars: I) -> u32 {
    let mut hash = HASH_SEED;
    for c in chars {
        hash = hash.rotate_left(HASH_ROTATE) ^ (c as u32);
    }
    hash & HASH_MASK
}

fn advance(hash: u32) -> u32 {
    hash.rotate_left(HASH_ROTATE) & HASH_MASK
}

fn pick(alphabet: &str, hash: u32) -> char {
    alphabet.as_bytes()[hash as usize % alphabet.len()] as char
}
