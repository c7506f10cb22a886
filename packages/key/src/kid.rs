//! Key set identifiers
//!
//! A kid is the 32-character lowercase hex ("simple") form of a random
//! UUID version 4. Anything else is rejected before it reaches storage.

use uuid::{Uuid, Variant, Version};

/// Length of a kid in characters
pub const KID_LEN: usize = 32;

/// Fresh random key set identifier
pub fn new_kid() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Whether `kid` is a well-formed key set identifier
pub fn is_valid_kid(kid: &str) -> bool {
    if kid.len() != KID_LEN {
        return false;
    }
    match Uuid::try_parse(kid) {
        Ok(uuid) => {
            uuid.get_version() == Some(Version::Random)
                && uuid.get_variant() == Variant::RFC4122
                && uuid.simple().to_string() == kid
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_kids_are_valid_and_distinct() {
        let a = new_kid();
        let b = new_kid();
        assert!(is_valid_kid(&a));
        assert!(is_valid_kid(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_other_shapes() {
        let kid = new_kid();
        let hyphenated = Uuid::try_parse(&kid).map(|u| u.hyphenated().to_string()).unwrap();

        assert!(!is_valid_kid("../etc"));
        assert!(!is_valid_kid(""));
        assert!(!is_valid_kid(&hyphenated));
        assert!(!is_valid_kid(&kid.to_uppercase()));
        // nil UUID has the right shape but is not version 4
        assert!(!is_valid_kid("00000000000000000000000000000000"));
        assert!(!is_valid_kid(&format!("{}/", &kid[..31])));
        // version 4 nibble but not the RFC 4122 variant
        assert!(!is_valid_kid("ffffffffffff4fffffffffffffffffff"));
        assert!(is_valid_kid("ffffffffffff4fffbfffffffffffffff"));
    }
}
