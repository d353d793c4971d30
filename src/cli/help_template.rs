use indoc::indoc;

// Help text template with placeholder
pub const HELP_TEMPLATE: &str = indoc! {r#"
    Examples:
      # Storing ID 17 under a raw hash code
      %BINARY_NAME% values.hash store 17 --hash 42

      # Storing ID 18 under the hash of a key
      %BINARY_NAME% values.hash store 18 --key "http://example.org/resource"

      # Listing the IDs stored under a hash code (hex as printed by `dump`)
      %BINARY_NAME% values.hash lookup --hash 0x0000002a

      # Displaying hash file info
      %BINARY_NAME% values.hash info

      # Dumping every bucket
      %BINARY_NAME% values.hash dump

      # Removing all stored IDs
      %BINARY_NAME% values.hash clear
"#};
