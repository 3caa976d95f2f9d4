//! Identifier casing between SQL storage names and C# host names.

/// `CreatedDate` -> `created_date`. Already snake-cased input is unchanged.
pub fn storage_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `created_date` -> `CreatedDate`.
pub fn pascal_name(name: &str) -> String {
    host_name(name, false)
}

/// `created_date` -> `createdDate`.
pub fn camel_name(name: &str) -> String {
    host_name(name, true)
}

/// Drops everything but letters and digits; the first letter takes the
/// requested case and any character after an underscore is upper-cased.
fn host_name(name: &str, first_lower: bool) -> String {
    let mut out = String::with_capacity(name.len());
    let mut used_first = false;
    let mut after_underscore = false;

    for c in name.chars() {
        if !used_first && c.is_alphabetic() {
            if first_lower {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            used_first = true;
        } else if c.is_alphanumeric() {
            if after_underscore {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
        }
        after_underscore = c == '_';
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_storage_name() {
        assert_eq!(storage_name("CreatedDate"), "created_date");
        assert_eq!(storage_name("user_id"), "user_id");
        assert_eq!(storage_name("User"), "user");
        assert_eq!(storage_name("id"), "id");
    }

    #[test]
    fn test_pascal_name() {
        assert_eq!(pascal_name("user_id"), "UserId");
        assert_eq!(pascal_name("created_date"), "CreatedDate");
        assert_eq!(pascal_name("CreatedDate"), "CreatedDate");
        assert_eq!(pascal_name("order-line"), "Orderline");
    }

    #[test]
    fn test_camel_name() {
        assert_eq!(camel_name("user_id"), "userId");
        assert_eq!(camel_name("Id"), "id");
        assert_eq!(camel_name("customer"), "customer");
    }

    proptest! {
        #[test]
        fn pascal_survives_storage_round_trip(name in "[a-z][a-z0-9]{0,6}(_[a-z][a-z0-9]{0,6}){0,3}") {
            let pascal = pascal_name(&name);
            prop_assert_eq!(storage_name(&pascal), name.clone());
            prop_assert_eq!(pascal_name(&storage_name(&pascal)), pascal);
        }

        #[test]
        fn camel_differs_from_pascal_only_in_first_letter(name in "[a-z][a-z0-9_]{0,12}") {
            let pascal = pascal_name(&name);
            let camel = camel_name(&name);
            prop_assert_eq!(pascal.to_lowercase(), camel.to_lowercase());
            prop_assert_eq!(&pascal[1..], &camel[1..]);
        }
    }
}
