use anyhow::{Result, bail};
use rand::RngCore;
use sha1::Sha1;
use zeroize::Zeroizing;

fn byte_len(bits: u32) -> usize {
    bits.div_ceil(8) as usize
}

/// Fills a buffer of `ceil(bits/8)` bytes from the operating system's
/// secure random source.
pub fn random_bytes(bits: u32) -> Zeroizing<Vec<u8>> {
    let mut buf = Zeroizing::new(vec![0u8; byte_len(bits)]);
    rand::rng().fill_bytes(&mut buf);
    buf
}

/// Derives `ceil(bits/8)` bytes from a password and salt with
/// PBKDF2-HMAC-SHA1. Reproducible: the same inputs always yield the
/// same buffer.
pub fn derive_bytes(
    bits: u32,
    password: &str,
    salt: &str,
    iterations: u32,
) -> Result<Zeroizing<Vec<u8>>> {
    if iterations < 1 {
        bail!("Invalid iteration count: {}; must be >= 1", iterations);
    }
    let mut buf = Zeroizing::new(vec![0u8; byte_len(bits)]);
    pbkdf2::pbkdf2_hmac::<Sha1>(password.as_bytes(), salt.as_bytes(), iterations, &mut buf);
    Ok(buf)
}

/// Entropy buffer that may or may not be password-derived. PBKDF2 is
/// used only when password, salt and iteration count are all present.
pub fn entropy(
    bits: u32,
    password: Option<&str>,
    salt: Option<&str>,
    iterations: Option<u32>,
) -> Result<Zeroizing<Vec<u8>>> {
    match (password, salt, iterations) {
        (Some(password), Some(salt), Some(iterations)) => {
            derive_bytes(bits, password, salt, iterations)
        }
        _ => Ok(random_bytes(bits)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_length_rounds_up() {
        assert_eq!(random_bytes(8).len(), 1);
        assert_eq!(random_bytes(9).len(), 2);
        assert_eq!(random_bytes(88).len(), 11);
        assert_eq!(
            derive_bytes(33, "p", "s", 1).unwrap().len(),
            5,
            "33 bits should round up to 5 bytes"
        );
    }

    #[test]
    fn test_derivation_deterministic() {
        let a = derive_bytes(64, "user", "site", 100).unwrap();
        let b = derive_bytes(64, "user", "site", 100).unwrap();
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_regression_pbkdf2_vector() {
        let buf = derive_bytes(32, "user", "https://site.io/", 1000).unwrap();
        assert_eq!(buf.as_slice(), &[130, 71, 100, 134]);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let result = derive_bytes(32, "user", "site", 0);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid iteration count")
        );
    }

    #[test]
    fn test_entropy_dispatch() {
        let derived = entropy(32, Some("user"), Some("https://site.io/"), Some(1000)).unwrap();
        assert_eq!(derived.as_slice(), &[130, 71, 100, 134]);

        // Missing any PBKDF2 input falls back to the random source.
        let random = entropy(32, Some("user"), None, Some(1000)).unwrap();
        assert_eq!(random.len(), 4);
    }

    #[test]
    fn test_random_buffers_differ() {
        let a = random_bytes(128);
        let b = random_bytes(128);
        assert_ne!(a.as_slice(), b.as_slice());
    }
}
